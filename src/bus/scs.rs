// Serial transport for SCS-series servos.
//
// Owns the request/reply cycle: frame an instruction, push it out the
// port, read the status packet back, surface faults as errors. The bus
// is generic over the byte stream so tests can drive it with scripted
// replies instead of hardware.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{self, SerialPort};
use tracing::debug;

use crate::bus::protocol::{self, Instruction, Register, StatusReply, HEADER};
use crate::bus::{MotorId, ServoBus, MAX_MOTOR_ID};
use crate::error::{BusError, ConnectionError};

/// Default serial configuration for the hand's servo chain.
pub const DEFAULT_BAUD_RATE: u32 = 1_000_000;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Half-duplex servo bus over a serial port (or any byte stream).
pub struct ScsBus<IO = Box<dyn SerialPort>> {
    io: IO,
}

impl ScsBus {
    /// Open the bus on a serial port with default settings.
    pub fn open(port_name: &str) -> Result<Self, ConnectionError> {
        Self::open_with(port_name, DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT)
    }

    /// Open with custom baud rate and read timeout.
    pub fn open_with(
        port_name: &str,
        baud_rate: u32,
        read_timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(read_timeout)
            .open()
            .map_err(|source| ConnectionError {
                port: port_name.to_string(),
                source,
            })?;

        Ok(Self { io: port })
    }
}

impl<IO: Read + Write> ScsBus<IO> {
    /// Wrap an already-open byte stream.
    pub fn with_io(io: IO) -> Self {
        Self { io }
    }

    fn check_id(id: MotorId) -> Result<u8, BusError> {
        if (1..=MAX_MOTOR_ID).contains(&id.0) {
            Ok(id.0)
        } else {
            Err(BusError::InvalidId { id: id.0 })
        }
    }

    fn send_packet(&mut self, packet: &[u8]) -> Result<(), BusError> {
        self.io.write_all(packet)?;
        self.io.flush()?;
        Ok(())
    }

    fn read_exact_or_timeout(&mut self, id: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.io.read_exact(buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                BusError::Timeout { id }
            } else {
                BusError::Io(e)
            }
        })
    }

    /// Read one status packet, validate it, and reject motor faults.
    fn read_status(&mut self, expected_id: u8) -> Result<StatusReply, BusError> {
        let mut header = [0u8; 2];
        self.read_exact_or_timeout(expected_id, &mut header)?;

        if header != HEADER {
            return Err(BusError::MalformedResponse {
                id: expected_id,
                reason: format!("bad header {header:02X?}"),
            });
        }

        let mut id_length = [0u8; 2];
        self.read_exact_or_timeout(expected_id, &mut id_length)?;
        let length = id_length[1] as usize;

        // Remaining bytes: error + params + checksum = length bytes
        let mut frame = vec![0u8; 2 + length];
        frame[..2].copy_from_slice(&id_length);
        self.read_exact_or_timeout(expected_id, &mut frame[2..])?;

        let reply = protocol::decode_status(expected_id, &frame)?;
        if reply.fault_bits != 0 {
            return Err(BusError::MotorFault {
                id: reply.id,
                bits: reply.fault_bits,
            });
        }
        Ok(reply)
    }

    fn transact(
        &mut self,
        id: u8,
        instruction: Instruction,
        params: &[u8],
    ) -> Result<StatusReply, BusError> {
        let packet = protocol::instruction_packet(id, instruction, params);
        self.send_packet(&packet)?;
        self.read_status(id)
    }

    /// Ping a motor to check if it's connected. A silent bus means the
    /// motor is absent, not that the call failed.
    pub fn ping(&mut self, id: MotorId) -> Result<bool, BusError> {
        let id = Self::check_id(id)?;
        let packet = protocol::instruction_packet(id, Instruction::Ping, &[]);
        self.send_packet(&packet)?;

        match self.read_status(id) {
            Ok(_) => Ok(true),
            Err(BusError::Timeout { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Write a register and wait for the acknowledgement. Two-byte
    /// registers go out high byte first; single-byte registers take the
    /// low byte of `value`.
    pub fn write_register(
        &mut self,
        id: MotorId,
        register: Register,
        value: u16,
    ) -> Result<(), BusError> {
        let id = Self::check_id(id)?;

        let mut params = vec![register as u8];
        match register.width() {
            1 => params.push(value as u8),
            _ => params.extend_from_slice(&protocol::encode_u16(value)),
        }

        debug!("write motor {}: {:?} = {}", id, register, value);
        self.transact(id, Instruction::Write, &params)?;
        Ok(())
    }

    /// Read a register, zero-extended to 16 bits for single-byte
    /// registers.
    pub fn read_register(&mut self, id: MotorId, register: Register) -> Result<u16, BusError> {
        let id = Self::check_id(id)?;

        let width = register.width();
        let params = [register as u8, width];
        let reply = self.transact(id, Instruction::Read, &params)?;

        if reply.params.is_empty() {
            return Err(BusError::EmptyResponse { id });
        }
        if reply.params.len() < width as usize {
            return Err(BusError::MalformedResponse {
                id,
                reason: format!(
                    "{} data bytes where {} were requested",
                    reply.params.len(),
                    width
                ),
            });
        }

        Ok(match width {
            1 => reply.params[0] as u16,
            _ => protocol::decode_u16(reply.params[0], reply.params[1]),
        })
    }
}

impl<IO: Read + Write> ServoBus for ScsBus<IO> {
    fn write_register(
        &mut self,
        id: MotorId,
        register: Register,
        value: u16,
    ) -> Result<(), BusError> {
        ScsBus::write_register(self, id, register, value)
    }

    fn read_register(&mut self, id: MotorId, register: Register) -> Result<u16, BusError> {
        ScsBus::read_register(self, id, register)
    }

    fn ping(&mut self, id: MotorId) -> Result<bool, BusError> {
        ScsBus::ping(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::protocol::FAULT_OVERLOAD;
    use std::collections::VecDeque;
    use std::io;

    /// Byte stream with scripted replies. Reading past the script acts
    /// like an idle serial port and times out.
    struct MockSerial {
        tx: Vec<u8>,
        rx: VecDeque<u8>,
    }

    impl MockSerial {
        fn new(rx: &[u8]) -> Self {
            Self {
                tx: Vec::new(),
                rx: rx.iter().copied().collect(),
            }
        }

        fn silent() -> Self {
            Self::new(&[])
        }
    }

    impl Read for MockSerial {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.rx.is_empty() {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "scripted bus idle"));
            }
            let n = buf.len().min(self.rx.len());
            for slot in &mut buf[..n] {
                *slot = self.rx.pop_front().unwrap();
            }
            Ok(n)
        }
    }

    impl Write for MockSerial {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn status_frame(id: u8, fault: u8, params: &[u8]) -> Vec<u8> {
        let mut frame = vec![0xFF, 0xFF, id, (params.len() + 2) as u8, fault];
        frame.extend_from_slice(params);
        let check = protocol::checksum(&frame[2..]);
        frame.push(check);
        frame
    }

    #[test]
    fn test_write_u16_register_wire_bytes() {
        let mut bus = ScsBus::with_io(MockSerial::new(&status_frame(1, 0, &[])));
        bus.write_register(MotorId(1), Register::GoalPosition, 402)
            .unwrap();

        assert_eq!(
            bus.io.tx,
            vec![0xFF, 0xFF, 0x01, 0x05, 0x03, 0x2A, 0x01, 0x92, 0x39]
        );
    }

    #[test]
    fn test_write_u8_register_wire_bytes() {
        let mut bus = ScsBus::with_io(MockSerial::new(&status_frame(1, 0, &[])));
        bus.write_register(MotorId(1), Register::TorqueEnable, 1)
            .unwrap();

        assert_eq!(bus.io.tx, vec![0xFF, 0xFF, 0x01, 0x04, 0x03, 0x28, 0x01, 0xCE]);
    }

    #[test]
    fn test_read_register_decodes_high_byte_first() {
        let mut bus = ScsBus::with_io(MockSerial::new(&status_frame(1, 0, &[0x01, 0x92])));
        let value = bus
            .read_register(MotorId(1), Register::PresentPosition)
            .unwrap();

        assert_eq!(value, 402);
        // Request frame: read 2 bytes from address 56
        assert_eq!(bus.io.tx, vec![0xFF, 0xFF, 0x01, 0x04, 0x02, 0x38, 0x02, 0xBE]);
    }

    #[test]
    fn test_read_single_byte_register() {
        let mut bus = ScsBus::with_io(MockSerial::new(&status_frame(2, 0, &[74])));
        let value = bus
            .read_register(MotorId(2), Register::PresentVoltage)
            .unwrap();
        assert_eq!(value, 74);
    }

    #[test]
    fn test_empty_reply_is_an_error() {
        let mut bus = ScsBus::with_io(MockSerial::new(&status_frame(1, 0, &[])));
        let err = bus
            .read_register(MotorId(1), Register::PresentPosition)
            .unwrap_err();
        assert!(matches!(err, BusError::EmptyResponse { id: 1 }));
    }

    #[test]
    fn test_short_reply_is_an_error() {
        let mut bus = ScsBus::with_io(MockSerial::new(&status_frame(1, 0, &[0x01])));
        let err = bus
            .read_register(MotorId(1), Register::PresentPosition)
            .unwrap_err();
        assert!(matches!(err, BusError::MalformedResponse { id: 1, .. }));
    }

    #[test]
    fn test_fault_bits_surface_as_error() {
        let mut bus = ScsBus::with_io(MockSerial::new(&status_frame(3, FAULT_OVERLOAD, &[])));
        let err = bus
            .write_register(MotorId(3), Register::TorqueEnable, 1)
            .unwrap_err();
        assert!(matches!(err, BusError::MotorFault { id: 3, bits: 32 }));
    }

    #[test]
    fn test_silent_bus_times_out() {
        let mut bus = ScsBus::with_io(MockSerial::silent());
        let err = bus
            .read_register(MotorId(5), Register::PresentPosition)
            .unwrap_err();
        assert!(matches!(err, BusError::Timeout { id: 5 }));
    }

    #[test]
    fn test_ping_maps_timeout_to_absent() {
        let mut bus = ScsBus::with_io(MockSerial::silent());
        assert!(!bus.ping(MotorId(4)).unwrap());

        let mut bus = ScsBus::with_io(MockSerial::new(&status_frame(4, 0, &[])));
        assert!(bus.ping(MotorId(4)).unwrap());
    }

    #[test]
    fn test_out_of_range_ids_rejected_before_io() {
        let mut bus = ScsBus::with_io(MockSerial::silent());
        for bad in [0u8, 9, 254] {
            let err = bus
                .write_register(MotorId(bad), Register::GoalPosition, 512)
                .unwrap_err();
            assert!(matches!(err, BusError::InvalidId { id } if id == bad));
        }
        assert!(bus.io.tx.is_empty());
    }

    #[test]
    fn test_garbage_header_rejected() {
        let mut bus = ScsBus::with_io(MockSerial::new(&[0x00, 0xFF, 0x01, 0x02, 0x00, 0xFC]));
        let err = bus
            .read_register(MotorId(1), Register::PresentPosition)
            .unwrap_err();
        assert!(matches!(err, BusError::MalformedResponse { id: 1, .. }));
    }

    #[test]
    fn test_reply_from_wrong_motor_rejected() {
        let mut bus = ScsBus::with_io(MockSerial::new(&status_frame(2, 0, &[0x01, 0x92])));
        let err = bus
            .read_register(MotorId(1), Register::PresentPosition)
            .unwrap_err();
        assert!(matches!(err, BusError::MalformedResponse { id: 1, .. }));
    }
}
