// Hand model: fingers, sides, gestures, and the controller.

mod controller;
mod gesture;

pub use controller::{GoalCommand, HandController, HandState};
pub use gesture::{FingerTarget, Gesture, CLOSE_SPEED, MAX_SPEED};

use serde::{Deserialize, Serialize};

use crate::bus::MotorId;
use crate::error::HandError;

/// The four actuated fingers. Each is driven by a pair of servos
/// working in opposition through the linkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Thumb,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Thumb];

    /// The servo pair driving this finger, in command order.
    pub fn motor_pair(self) -> (MotorId, MotorId) {
        match self {
            Finger::Index => (MotorId(1), MotorId(2)),
            Finger::Middle => (MotorId(3), MotorId(4)),
            Finger::Ring => (MotorId(5), MotorId(6)),
            Finger::Thumb => (MotorId(7), MotorId(8)),
        }
    }
}

/// Which hand the mechanism is assembled as. Poses mirror between
/// sides, so gesture tables depend on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    /// Map the conventional numeric flag: 1 is right, 2 is left.
    pub fn from_flag(flag: u8) -> Result<Self, HandError> {
        match flag {
            1 => Ok(Side::Right),
            2 => Ok(Side::Left),
            other => Err(HandError::SideFlag(other)),
        }
    }
}
