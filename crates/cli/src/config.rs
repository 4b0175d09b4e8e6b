use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Built-in defaults, always loaded first.
const DEFAULT_CONFIG: &str = include_str!("../vehiclectl.yaml");

/// Picked up from the working directory when no `--config` is given.
const LOCAL_CONFIG: &str = "vehiclectl.yaml";

const ENV_PREFIX: &str = "VEHICLECTL";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub format: LoggingFormatConfig,
    pub levels: LoggingLevelsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingFormatConfig {
    pub show_time: bool,
    pub location: LoggingLocationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingLocationConfig {
    pub show_file: bool,
    pub show_line: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingLevelsConfig {
    pub debug: bool,
    pub info: bool,
    pub warning: bool,
    pub error: bool,
    pub critical: bool,
}

impl LoggingLevelsConfig {
    /// The most verbose enabled level, as an `EnvFilter` directive.
    pub fn filter_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.info {
            "info"
        } else if self.warning {
            "warn"
        } else if self.error || self.critical {
            "error"
        } else {
            "off"
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: bool,
    #[serde(default)]
    pub artifacts_dir: Option<PathBuf>,
}

/// Load configuration: embedded defaults, then the user file, then
/// `VEHICLECTL__*` environment variables.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder =
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Yaml));

    builder = match path {
        Some(p) => builder.add_source(File::from(p).required(true)),
        None => builder.add_source(File::with_name(LOCAL_CONFIG).required(false)),
    };

    builder
        // Map nested env vars like VEHICLECTL__OUTPUT__JSON=true
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
