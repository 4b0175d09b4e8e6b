//! Daemon mode – minimal JSON-RPC-ish protocol over Unix socket.
//!
//! One controller lives for the lifetime of the daemon. Connections are
//! served one after another and requests apply strictly in arrival order.

use std::io;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use vehicle_engine::types::*;
use vehicle_engine::{Controller, Dispatcher};

pub async fn run_daemon(socket_path: &Path, dispatcher: Dispatcher) -> io::Result<()> {
    // Remove stale socket if it exists
    let _ = std::fs::remove_file(socket_path);

    let listener = UnixListener::bind(socket_path)?;
    tracing::info!(socket = %socket_path.display(), "vehiclectl daemon listening");

    let mut controller = Controller::new();

    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let (reader, mut writer) = stream.into_split();
                let mut lines = BufReader::new(reader).lines();

                while let Ok(Some(line)) = lines.next_line().await {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let response = handle_request(&line, &dispatcher, &mut controller);
                    let mut resp_json =
                        serde_json::to_string(&response).unwrap_or_else(|_| "{}".into());
                    resp_json.push('\n');
                    if writer.write_all(resp_json.as_bytes()).await.is_err() {
                        break;
                    }
                }
                tracing::debug!("client disconnected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "accept error");
            }
        }
    }
}

pub fn handle_request(
    line: &str,
    dispatcher: &Dispatcher,
    controller: &mut Controller,
) -> DaemonResponse {
    let req: DaemonRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            return error_response("unknown", format!("invalid JSON request: {}", e));
        }
    };

    let result = match req.method.as_str() {
        "call" => {
            let Some(cmd) = req.params.get("cmd").and_then(|v| v.as_str()) else {
                return error_response(&req.id, "missing 'cmd' string param".to_string());
            };
            dispatcher.execute(cmd, controller)
        }
        "state" => state_result("state", controller),
        "reset" => {
            controller.reset();
            state_result("reset", controller)
        }
        "list" => {
            let mut r = result_ok("list", "commands", &new_run_id(), 0);
            r.data = Some(serde_json::json!(dispatcher.list()));
            r
        }
        other => {
            return error_response(&req.id, format!("unknown method: {}", other));
        }
    };

    DaemonResponse {
        id: req.id,
        result: Some(result),
        error: None,
    }
}

fn state_result(command: &str, controller: &Controller) -> CommandResult {
    let mut r = result_ok(command, "vehicle", &new_run_id(), 0);
    r.data = serde_json::to_value(controller.snapshot()).ok();
    r
}

fn error_response(id: &str, message: String) -> DaemonResponse {
    DaemonResponse {
        id: id.to_string(),
        result: None,
        error: Some(ErrorInfo {
            code: ErrorCode::InvalidInput,
            message,
            details: serde_json::Value::Null,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::UnixStream;

    fn call(line: &str, ctrl: &mut Controller) -> DaemonResponse {
        handle_request(line, &Dispatcher::new(), ctrl)
    }

    #[test]
    fn test_call_applies_to_shared_controller() {
        let mut ctrl = Controller::new();
        let r = call(r#"{"id":"1","method":"call","params":{"cmd":"UNLOCK"}}"#, &mut ctrl);
        assert_eq!(r.id, "1");
        assert_eq!(r.result.unwrap().status, Status::Pass);

        let r = call(r#"{"id":"2","method":"call","params":{"cmd":"TRUNK_OPEN"}}"#, &mut ctrl);
        let data = r.result.unwrap().data.unwrap();
        assert_eq!(data["trunk_closed"], false);
        assert!(!ctrl.trunk_status());
    }

    #[test]
    fn test_state_and_reset() {
        let mut ctrl = Controller::new();
        call(r#"{"id":"1","method":"call","params":{"cmd":"SOS"}}"#, &mut ctrl);

        let r = call(r#"{"id":"2","method":"state"}"#, &mut ctrl);
        assert_eq!(r.result.unwrap().data.unwrap()["left_door"], "OPEN");

        let r = call(r#"{"id":"3","method":"reset"}"#, &mut ctrl);
        assert_eq!(r.result.unwrap().data.unwrap()["vehicle_locked"], true);
        assert!(ctrl.is_vehicle_locked());
    }

    #[test]
    fn test_list_method() {
        let mut ctrl = Controller::new();
        let r = call(r#"{"id":"l","method":"list"}"#, &mut ctrl);
        let data = r.result.unwrap().data.unwrap();
        assert_eq!(data.as_array().unwrap().len(), 16);
    }

    #[test]
    fn test_bad_requests() {
        let mut ctrl = Controller::new();

        let r = call("not json", &mut ctrl);
        assert_eq!(r.id, "unknown");
        assert_eq!(r.error.unwrap().code, ErrorCode::InvalidInput);

        let r = call(r#"{"id":"x","method":"fly"}"#, &mut ctrl);
        assert!(r.error.unwrap().message.contains("unknown method"));

        let r = call(r#"{"id":"y","method":"call","params":{}}"#, &mut ctrl);
        assert!(r.result.is_none());
        assert!(r.error.is_some());
    }

    #[tokio::test]
    async fn test_daemon_round_trip_over_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("vehiclectl.sock");

        let server_socket = socket.clone();
        let server =
            tokio::spawn(async move { run_daemon(&server_socket, Dispatcher::new()).await });

        let mut stream = None;
        for _ in 0..50 {
            if let Ok(s) = UnixStream::connect(&socket).await {
                stream = Some(s);
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let stream = stream.expect("daemon did not come up");
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        writer
            .write_all(b"{\"id\":\"a\",\"method\":\"call\",\"params\":{\"cmd\":\"UNLOCK\"}}\n")
            .await
            .unwrap();
        let line = lines.next_line().await.unwrap().unwrap();
        let resp: DaemonResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(resp.id, "a");
        assert_eq!(resp.result.unwrap().status, Status::Pass);

        writer
            .write_all(b"{\"id\":\"b\",\"method\":\"state\"}\n")
            .await
            .unwrap();
        let line = lines.next_line().await.unwrap().unwrap();
        let resp: DaemonResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(resp.result.unwrap().data.unwrap()["vehicle_locked"], false);

        server.abort();
    }
}
