//! Serial SDK for an eight-servo robotic hand.
//!
//! The hand has four fingers, each driven by an antagonistic pair of
//! Feetech SCS0009 servos on a shared half-duplex serial bus. This
//! crate owns the wire protocol and layers a small controller on top:
//! torque lifecycle, calibrated finger moves, gesture presets, and
//! telemetry.
//!
//! ```no_run
//! use amazing_hand::{HandConfig, HandController, HandError, Side};
//!
//! fn main() -> Result<(), HandError> {
//!     let config = HandConfig::new("/dev/ttyUSB0").with_side(Side::Right);
//!     let mut hand = HandController::connect(config)?;
//!
//!     hand.start()?;
//!     hand.victory()?;
//!     hand.stop()?;
//!     Ok(())
//! }
//! ```

pub mod bus;
pub mod calibration;
pub mod config;
pub mod error;
pub mod hand;
pub mod status;

pub use bus::scs::ScsBus;
pub use bus::{MotorId, ServoBus};
pub use calibration::CalibrationTable;
pub use config::HandConfig;
pub use error::{BusError, ConnectionError, HandError};
pub use hand::{Finger, Gesture, HandController, HandState, Side};
pub use status::{MotorReading, MotorStatus};
