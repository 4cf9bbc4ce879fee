// Connection and timing configuration for the hand.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bus::scs::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT};
use crate::calibration::CalibrationTable;
use crate::hand::Side;

// Pause between consecutive commands on the half-duplex bus. The
// SCS0009 drops packets that arrive while it is still clocking out its
// previous status reply.
pub const INTER_COMMAND_SPACING: Duration = Duration::from_millis(10);

// Pause after the last write of a finger move, giving the servo time to
// latch both goal registers before the next command.
pub const SETTLE_DELAY: Duration = Duration::from_millis(5);

/// Settings for one hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandConfig {
    /// Serial device, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout: Duration,
    pub side: Side,
    pub calibration: CalibrationTable,
    pub inter_command_spacing: Duration,
    pub settle_delay: Duration,
}

impl HandConfig {
    /// Settings for a right hand on the given port, with the reference
    /// calibration and default pacing.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            side: Side::Right,
            calibration: CalibrationTable::default(),
            inter_command_spacing: INTER_COMMAND_SPACING,
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_calibration(mut self, calibration: CalibrationTable) -> Self {
        self.calibration = calibration;
        self
    }

    /// Zero out the pacing delays. Useful against a scripted bus, where
    /// there is no wire to pace.
    pub fn without_delays(mut self) -> Self {
        self.inter_command_spacing = Duration::ZERO;
        self.settle_delay = Duration::ZERO;
        self
    }
}
