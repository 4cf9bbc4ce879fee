// Telemetry records reported by the hand.

use serde::{Deserialize, Serialize};

/// One motor's full telemetry sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorReading {
    pub id: u8,
    /// Present position in the servo frame, degrees from center.
    pub position_deg: f32,
    /// Signed speed in raw encoder units per second.
    pub speed: i16,
    /// Signed load, roughly per-mille of stall torque.
    pub load: i16,
    pub voltage_v: f32,
    pub temperature_c: u8,
}

/// Telemetry for one motor, or the reason it could not be read. A
/// status sweep reports every motor either way, so one dead servo does
/// not hide the other seven.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MotorStatus {
    Ok(MotorReading),
    Failed { id: u8, error: String },
}

impl MotorStatus {
    pub fn id(&self) -> u8 {
        match self {
            MotorStatus::Ok(reading) => reading.id,
            MotorStatus::Failed { id, .. } => *id,
        }
    }

    pub fn reading(&self) -> Option<&MotorReading> {
        match self {
            MotorStatus::Ok(reading) => Some(reading),
            MotorStatus::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MotorStatus::Ok(_) => None,
            MotorStatus::Failed { error, .. } => Some(error),
        }
    }
}
