//! Vehicle state – the passive record mutated by the controller.
//!
//! Nothing in this module validates transitions; guards live in
//! [`crate::controller`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which door a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "LEFT",
            Side::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoorStatus {
    Open,
    Closed,
}

impl DoorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoorStatus::Open => "OPEN",
            DoorStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for DoorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockStatus {
    Locked,
    Unlocked,
}

impl LockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockStatus::Locked => "LOCKED",
            LockStatus::Unlocked => "UNLOCKED",
        }
    }
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every controllable attribute of the vehicle.
///
/// `trunk_closed == true` means the trunk is shut. A fresh vehicle is parked:
/// stopped, engine off, doors closed and locked, trunk closed, vehicle locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleState {
    pub speed: u32,
    pub left_door_open: bool,
    pub right_door_open: bool,
    pub left_door_locked: bool,
    pub right_door_locked: bool,
    pub trunk_closed: bool,
    pub engine_on: bool,
    pub vehicle_locked: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            speed: 0,
            left_door_open: false,
            right_door_open: false,
            left_door_locked: true,
            right_door_locked: true,
            trunk_closed: true,
            engine_on: false,
            vehicle_locked: true,
        }
    }
}

impl VehicleState {
    pub fn door_open(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left_door_open,
            Side::Right => self.right_door_open,
        }
    }

    pub fn set_door_open(&mut self, side: Side, open: bool) {
        match side {
            Side::Left => self.left_door_open = open,
            Side::Right => self.right_door_open = open,
        }
    }

    pub fn door_locked(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left_door_locked,
            Side::Right => self.right_door_locked,
        }
    }

    pub fn set_door_locked(&mut self, side: Side, locked: bool) {
        match side {
            Side::Left => self.left_door_locked = locked,
            Side::Right => self.right_door_locked = locked,
        }
    }

    pub fn door_status(&self, side: Side) -> DoorStatus {
        if self.door_open(side) {
            DoorStatus::Open
        } else {
            DoorStatus::Closed
        }
    }

    pub fn lock_status(&self, side: Side) -> LockStatus {
        if self.door_locked(side) {
            LockStatus::Locked
        } else {
            LockStatus::Unlocked
        }
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            speed: self.speed,
            left_door: self.door_status(Side::Left),
            right_door: self.door_status(Side::Right),
            left_door_lock: self.lock_status(Side::Left),
            right_door_lock: self.lock_status(Side::Right),
            trunk_closed: self.trunk_closed,
            engine_on: self.engine_on,
            vehicle_locked: self.vehicle_locked,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot – what callers see in JSON output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub speed: u32,
    pub left_door: DoorStatus,
    pub right_door: DoorStatus,
    pub left_door_lock: LockStatus,
    pub right_door_lock: LockStatus,
    pub trunk_closed: bool,
    pub engine_on: bool,
    pub vehicle_locked: bool,
}
