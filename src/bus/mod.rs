// Servo bus: wire protocol, serial transport, and unit conversions.

pub mod protocol;
pub mod scs;
pub mod units;

use crate::error::BusError;
use protocol::Register;

/// Highest motor id present on the hand. Ids start at 1.
pub const MAX_MOTOR_ID: u8 = 8;

/// Bus address of one servo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MotorId(pub u8);

impl MotorId {
    /// Every motor on the hand, in ascending bus order.
    pub const ALL: [MotorId; MAX_MOTOR_ID as usize] = [
        MotorId(1),
        MotorId(2),
        MotorId(3),
        MotorId(4),
        MotorId(5),
        MotorId(6),
        MotorId(7),
        MotorId(8),
    ];
}

impl std::fmt::Display for MotorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Register-level access to the servo chain. The hand controller talks
/// through this seam so tests can substitute a scripted bus.
pub trait ServoBus {
    /// Write a register value. Single-byte registers take the low byte.
    fn write_register(&mut self, id: MotorId, register: Register, value: u16)
        -> Result<(), BusError>;

    /// Read a register value, zero-extended to 16 bits for single-byte
    /// registers.
    fn read_register(&mut self, id: MotorId, register: Register) -> Result<u16, BusError>;

    /// Check whether a motor answers on the bus.
    fn ping(&mut self, id: MotorId) -> Result<bool, BusError>;
}
