//! Engine crate – the vehicle state machine shared by the CLI and tests.
//!
//! A [`Controller`] owns one [`VehicleState`] and applies [`Command`]s to it
//! under guard conditions. Callers usually go through
//! [`dispatch::execute_command`] with a string tag, or through a
//! [`Dispatcher`] when they want a [`CommandResult`] describing the outcome.

pub mod command;
pub mod controller;
pub mod dispatch;
pub mod scenario;
pub mod state;
pub mod types;

// Re-exports for convenience
pub use command::{Command, CommandError};
pub use controller::{Controller, GuardError, Transition};
pub use dispatch::{execute_command, Dispatcher};
pub use state::{DoorStatus, LockStatus, Side, VehicleSnapshot, VehicleState};
pub use types::{CommandResult, ErrorCode, ErrorInfo, Status};
