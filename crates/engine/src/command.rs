//! The fixed command set and its string tags.

use crate::state::Side;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Sos,
    Lock,
    Unlock,
    DoorLock(Side),
    DoorUnlock(Side),
    DoorOpen(Side),
    DoorClose(Side),
    EngineButton,
    Accelerate,
    Brake,
    TrunkOpen,
    TrunkClose,
}

impl Command {
    pub const ALL: [Command; 16] = [
        Command::Sos,
        Command::Lock,
        Command::Unlock,
        Command::DoorLock(Side::Left),
        Command::DoorLock(Side::Right),
        Command::DoorUnlock(Side::Left),
        Command::DoorUnlock(Side::Right),
        Command::DoorOpen(Side::Left),
        Command::DoorOpen(Side::Right),
        Command::DoorClose(Side::Left),
        Command::DoorClose(Side::Right),
        Command::EngineButton,
        Command::Accelerate,
        Command::Brake,
        Command::TrunkOpen,
        Command::TrunkClose,
    ];

    /// Canonical tag, e.g. `LEFT_DOOR_LOCK`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Sos => "SOS",
            Command::Lock => "LOCK",
            Command::Unlock => "UNLOCK",
            Command::DoorLock(Side::Left) => "LEFT_DOOR_LOCK",
            Command::DoorLock(Side::Right) => "RIGHT_DOOR_LOCK",
            Command::DoorUnlock(Side::Left) => "LEFT_DOOR_UNLOCK",
            Command::DoorUnlock(Side::Right) => "RIGHT_DOOR_UNLOCK",
            Command::DoorOpen(Side::Left) => "LEFT_DOOR_OPEN",
            Command::DoorOpen(Side::Right) => "RIGHT_DOOR_OPEN",
            Command::DoorClose(Side::Left) => "LEFT_DOOR_CLOSE",
            Command::DoorClose(Side::Right) => "RIGHT_DOOR_CLOSE",
            Command::EngineButton => "ENGINE_BTN",
            Command::Accelerate => "ACCELERATE",
            Command::Brake => "BRAKE",
            Command::TrunkOpen => "TRUNK_OPEN",
            Command::TrunkClose => "TRUNK_CLOSE",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let cmd = match tag {
            "SOS" => Command::Sos,
            "LOCK" => Command::Lock,
            "UNLOCK" => Command::Unlock,
            "LEFT_DOOR_LOCK" => Command::DoorLock(Side::Left),
            "RIGHT_DOOR_LOCK" => Command::DoorLock(Side::Right),
            "LEFT_DOOR_UNLOCK" => Command::DoorUnlock(Side::Left),
            "RIGHT_DOOR_UNLOCK" => Command::DoorUnlock(Side::Right),
            "LEFT_DOOR_OPEN" => Command::DoorOpen(Side::Left),
            "RIGHT_DOOR_OPEN" => Command::DoorOpen(Side::Right),
            "LEFT_DOOR_CLOSE" => Command::DoorClose(Side::Left),
            "RIGHT_DOOR_CLOSE" => Command::DoorClose(Side::Right),
            "ENGINE_BTN" => Command::EngineButton,
            "ACCELERATE" => Command::Accelerate,
            "BRAKE" => Command::Brake,
            "TRUNK_OPEN" => Command::TrunkOpen,
            "TRUNK_CLOSE" => Command::TrunkClose,
            _ => return Err(CommandError::UnknownCommand(tag.to_string())),
        };
        Ok(cmd)
    }
}
