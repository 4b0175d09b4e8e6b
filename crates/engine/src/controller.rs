//! Controller – exclusive owner of a [`VehicleState`] and the guarded
//! transitions applied to it.

use crate::command::Command;
use crate::state::{DoorStatus, LockStatus, Side, VehicleSnapshot, VehicleState};

/// Why a command's guard refused it. The state is untouched when one of
/// these is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("vehicle is locked")]
    VehicleLocked,
    #[error("{0} door is open")]
    DoorOpen(Side),
    #[error("{0} door is locked")]
    DoorLocked(Side),
    #[error("vehicle is moving")]
    VehicleMoving,
    #[error("engine is off")]
    EngineOff,
    #[error("trunk is already open")]
    TrunkAlreadyOpen,
    #[error("trunk is already closed")]
    TrunkAlreadyClosed,
}

/// Outcome of [`Controller::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Rejected(GuardError),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }
}

#[derive(Debug, Default)]
pub struct Controller {
    state: VehicleState,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: VehicleState) -> Self {
        Self { state }
    }

    /// Apply a command, swallowing guard failures.
    pub fn apply(&mut self, cmd: Command) -> Transition {
        match self.try_apply(cmd) {
            Ok(()) => {
                tracing::trace!(command = %cmd, speed = self.state.speed, "applied");
                Transition::Applied
            }
            Err(reason) => {
                tracing::debug!(command = %cmd, %reason, "command rejected");
                Transition::Rejected(reason)
            }
        }
    }

    /// Check the guard for `cmd` and apply its effect, or report which guard
    /// failed without touching the state.
    pub fn try_apply(&mut self, cmd: Command) -> Result<(), GuardError> {
        let s = &mut self.state;
        match cmd {
            Command::Sos => {
                s.speed = 0;
                for side in Side::BOTH {
                    s.set_door_open(side, true);
                    s.set_door_locked(side, false);
                }
                s.vehicle_locked = false;
                s.trunk_closed = false;
            }
            Command::Lock => s.vehicle_locked = true,
            Command::Unlock => s.vehicle_locked = false,
            Command::DoorLock(side) => {
                if s.vehicle_locked {
                    return Err(GuardError::VehicleLocked);
                }
                if s.door_open(side) {
                    return Err(GuardError::DoorOpen(side));
                }
                s.set_door_locked(side, true);
            }
            Command::DoorUnlock(side) => {
                if s.vehicle_locked {
                    return Err(GuardError::VehicleLocked);
                }
                if s.speed != 0 {
                    return Err(GuardError::VehicleMoving);
                }
                s.set_door_locked(side, false);
            }
            Command::DoorOpen(side) => {
                if s.door_locked(side) {
                    return Err(GuardError::DoorLocked(side));
                }
                s.set_door_open(side, true);
            }
            Command::DoorClose(side) => s.set_door_open(side, false),
            Command::EngineButton => {
                s.engine_on = !s.engine_on;
                if !s.engine_on {
                    s.speed = 0;
                }
            }
            Command::Accelerate => {
                if !s.engine_on {
                    return Err(GuardError::EngineOff);
                }
                s.speed = s.speed.saturating_add(1);
                if s.speed > 0 {
                    for side in Side::BOTH {
                        s.set_door_locked(side, true);
                    }
                }
            }
            Command::Brake => s.speed = s.speed.saturating_sub(1),
            Command::TrunkOpen => {
                if s.vehicle_locked {
                    return Err(GuardError::VehicleLocked);
                }
                if s.speed != 0 {
                    return Err(GuardError::VehicleMoving);
                }
                if !s.trunk_closed {
                    return Err(GuardError::TrunkAlreadyOpen);
                }
                s.trunk_closed = false;
            }
            Command::TrunkClose => {
                if s.vehicle_locked {
                    return Err(GuardError::VehicleLocked);
                }
                if s.trunk_closed {
                    return Err(GuardError::TrunkAlreadyClosed);
                }
                s.trunk_closed = true;
            }
        }
        Ok(())
    }

    /// Back to a parked, locked vehicle.
    pub fn reset(&mut self) {
        self.state = VehicleState::default();
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        self.state.snapshot()
    }

    pub fn speed(&self) -> u32 {
        self.state.speed
    }

    pub fn left_door_status(&self) -> DoorStatus {
        self.state.door_status(Side::Left)
    }

    pub fn right_door_status(&self) -> DoorStatus {
        self.state.door_status(Side::Right)
    }

    pub fn left_door_lock(&self) -> LockStatus {
        self.state.lock_status(Side::Left)
    }

    pub fn right_door_lock(&self) -> LockStatus {
        self.state.lock_status(Side::Right)
    }

    /// `true` means the trunk is closed.
    pub fn trunk_status(&self) -> bool {
        self.state.trunk_closed
    }

    pub fn engine_on(&self) -> bool {
        self.state.engine_on
    }

    pub fn is_vehicle_locked(&self) -> bool {
        self.state.vehicle_locked
    }
}
