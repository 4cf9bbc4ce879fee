// Per-motor calibration offsets.
//
// Assembly tolerance in the finger linkages leaves each servo a few
// degrees off its nominal zero. The offsets here are added to every
// commanded angle before conversion to ticks, so gesture tables can be
// written against an ideal hand.

use serde::{Deserialize, Serialize};

use crate::bus::{MotorId, MAX_MOTOR_ID};
use crate::error::HandError;

/// Trim offsets measured on the reference hand, in degrees.
const DEFAULT_OFFSETS: [i16; MAX_MOTOR_ID as usize] = [3, 0, -5, -8, -2, 5, -12, 0];

/// One trim offset per motor, indexed by motor id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationTable([i16; MAX_MOTOR_ID as usize]);

impl CalibrationTable {
    pub fn new(offsets: [i16; MAX_MOTOR_ID as usize]) -> Self {
        Self(offsets)
    }

    /// Build a table from a runtime-sized list, as read from a config
    /// file or command line. The list must cover all eight motors.
    pub fn from_slice(offsets: &[i16]) -> Result<Self, HandError> {
        let offsets: [i16; MAX_MOTOR_ID as usize] = offsets
            .try_into()
            .map_err(|_| HandError::Calibration(offsets.len()))?;
        Ok(Self(offsets))
    }

    /// Trim offset for one motor, in degrees.
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside `1..=8`.
    pub fn offset_deg(&self, id: MotorId) -> f32 {
        self.0[(id.0 - 1) as usize] as f32
    }
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self(DEFAULT_OFFSETS)
    }
}
