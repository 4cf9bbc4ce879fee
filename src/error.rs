// Error taxonomy for the hand SDK.
//
// Three layers: ConnectionError (construction only), BusError (one per
// bus transaction), HandError (controller level, wraps the others).

use thiserror::Error;

use crate::bus::protocol;
use crate::hand::HandState;

/// The serial device could not be opened. Raised only while constructing
/// a bus or controller; not recoverable by retrying the same call.
#[derive(Debug, Error)]
#[error("cannot open servo bus on {port}: {source}")]
pub struct ConnectionError {
    pub port: String,
    #[source]
    pub source: serialport::Error,
}

/// Failure of a single bus transaction. No retries happen anywhere in
/// this crate; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum BusError {
    /// Motor id outside the hand's chain. Checked before any bytes are
    /// written to the port.
    #[error("motor id {id} outside supported range 1..=8")]
    InvalidId { id: u8 },

    /// No (or an incomplete) status packet arrived within the read
    /// timeout.
    #[error("timeout waiting for reply from motor {id}")]
    Timeout { id: u8 },

    /// The reply frame failed header, id, length or checksum validation.
    #[error("malformed reply from motor {id}: {reason}")]
    MalformedResponse { id: u8, reason: String },

    /// A structurally valid reply carried no data bytes. Distinct from a
    /// reading of zero, so callers can tell a silent sensor from a motor
    /// that really reports 0.
    #[error("reply from motor {id} carried no data")]
    EmptyResponse { id: u8 },

    /// The motor flagged alarm bits in its status packet.
    #[error("motor {id} reports fault: {}", protocol::describe_faults(*bits))]
    MotorFault { id: u8, bits: u8 },

    #[error("i/o error on servo bus: {0}")]
    Io(#[from] std::io::Error),
}

/// Controller-level failure.
#[derive(Debug, Error)]
pub enum HandError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Bus(#[from] BusError),

    /// The requested operation is not legal in the current lifecycle
    /// state (e.g. moving a finger before `start`).
    #[error("cannot {operation} while the hand is {state:?}")]
    IllegalState {
        state: HandState,
        operation: &'static str,
    },

    #[error("calibration table needs exactly 8 offsets, got {0}")]
    Calibration(usize),

    #[error("side flag must be 1 (right) or 2 (left), got {0}")]
    SideFlag(u8),
}
