// Feetech SCS-series serial protocol: packet framing and field coding.
//
// Framing is the same as Dynamixel protocol 1.0:
//   instruction: [0xFF, 0xFF, ID, Length, Instruction, Params..., Checksum]
//   status:      [0xFF, 0xFF, ID, Length, Error, Params..., Checksum]
// with Length = params + 2 and Checksum = ~(ID + Length + ... + Params).
//
// One family quirk matters a lot: SCS servos (unlike the STS series)
// send 16-bit register values HIGH byte first. Getting this backwards
// commands wild positions, so the byte order lives here with tests.

/// Packet header bytes.
pub const HEADER: [u8; 2] = [0xFF, 0xFF];

/// Id that addresses every device on the chain at once. Broadcast
/// instructions get no status reply.
pub const BROADCAST_ID: u8 = 0xFE;

/// Alarm bits of the status-packet error byte.
pub const FAULT_VOLTAGE: u8 = 1;
pub const FAULT_ANGLE: u8 = 2;
pub const FAULT_OVERHEAT: u8 = 4;
pub const FAULT_OVERCURRENT: u8 = 8;
pub const FAULT_OVERLOAD: u8 = 32;

/// Instruction set.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Ping = 0x01,
    Read = 0x02,
    Write = 0x03,
    RegWrite = 0x04,
    Action = 0x05,
    SyncRead = 0x82,
    SyncWrite = 0x83,
}

/// Register map for the SCS0009 servo.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    // EEPROM area (persists across power cycles)
    Id = 5,       // 1 byte
    BaudRate = 6, // 1 byte

    // RAM area (volatile)
    TorqueEnable = 40,       // 1 byte: see TorqueMode
    GoalPosition = 42,       // 2 bytes
    GoalTime = 44,           // 2 bytes
    GoalSpeed = 46,          // 2 bytes
    Lock = 48,               // 1 byte: 0=unlocked, 1=locked
    PresentPosition = 56,    // 2 bytes, read-only
    PresentSpeed = 58,       // 2 bytes, read-only (sign bit 15)
    PresentLoad = 60,        // 2 bytes, read-only (sign bit 10)
    PresentVoltage = 62,     // 1 byte, decivolts, read-only
    PresentTemperature = 63, // 1 byte, degrees C, read-only
}

impl Register {
    /// Width of the register in bytes.
    pub fn width(self) -> u8 {
        match self {
            Register::GoalPosition
            | Register::GoalTime
            | Register::GoalSpeed
            | Register::PresentPosition
            | Register::PresentSpeed
            | Register::PresentLoad => 2,
            _ => 1,
        }
    }
}

/// Values of the TorqueEnable register. `Free` leaves the motor powered
/// but mechanically slack, which is the safe resting state for the
/// finger linkage.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TorqueMode {
    Off = 0,
    On = 1,
    Free = 3,
}

/// A decoded status packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReply {
    pub id: u8,
    pub fault_bits: u8,
    pub params: Vec<u8>,
}

/// Checksum over everything after the header.
pub fn checksum(data: &[u8]) -> u8 {
    let sum: u32 = data.iter().map(|&b| b as u32).sum();
    (!sum & 0xFF) as u8
}

/// Frame an instruction packet for one motor.
pub fn instruction_packet(id: u8, instruction: Instruction, params: &[u8]) -> Vec<u8> {
    let length = (params.len() + 2) as u8; // params + instruction + checksum
    let mut packet = Vec::with_capacity(6 + params.len());

    packet.extend_from_slice(&HEADER);
    packet.push(id);
    packet.push(length);
    packet.push(instruction as u8);
    packet.extend_from_slice(params);

    // Checksum over id, length, instruction, params
    let check = checksum(&packet[2..]);
    packet.push(check);

    packet
}

/// Decode a status packet body: everything after the two header bytes,
/// i.e. `[id, length, error, params..., checksum]`. Validates id,
/// length and checksum; the fault byte is returned, not judged, so the
/// caller decides whether data next to an alarm is still usable.
pub fn decode_status(expected_id: u8, frame: &[u8]) -> Result<StatusReply, crate::error::BusError> {
    use crate::error::BusError;

    if frame.len() < 4 {
        return Err(BusError::MalformedResponse {
            id: expected_id,
            reason: format!("truncated frame ({} bytes)", frame.len()),
        });
    }

    let id = frame[0];
    if id != expected_id {
        return Err(BusError::MalformedResponse {
            id: expected_id,
            reason: format!("reply came from id {id}"),
        });
    }

    let length = frame[1] as usize;
    if frame.len() != length + 2 {
        return Err(BusError::MalformedResponse {
            id,
            reason: format!("length field {} does not match frame of {} bytes", length, frame.len()),
        });
    }

    let expected_check = checksum(&frame[..frame.len() - 1]);
    let received_check = frame[frame.len() - 1];
    if expected_check != received_check {
        return Err(BusError::MalformedResponse {
            id,
            reason: format!("checksum mismatch (got 0x{received_check:02X}, want 0x{expected_check:02X})"),
        });
    }

    Ok(StatusReply {
        id,
        fault_bits: frame[2],
        params: frame[3..frame.len() - 1].to_vec(),
    })
}

/// Split a 16-bit register value into wire order (high byte first on the
/// SCS series).
pub fn encode_u16(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

/// Reassemble a 16-bit register value from wire order.
pub fn decode_u16(hi: u8, lo: u8) -> u16 {
    u16::from_be_bytes([hi, lo])
}

/// Decode a sign-magnitude field: the bit at `sign_bit` is the
/// direction flag, the bits below it the magnitude. Present speed uses
/// bit 15, present load bit 10.
pub fn decode_sign_magnitude(raw: u16, sign_bit: u32) -> i16 {
    let mask = 1u16 << sign_bit;
    let magnitude = (raw & (mask - 1)) as i16;
    if raw & mask != 0 { -magnitude } else { magnitude }
}

/// Comma-separated names of the set alarm bits, for error messages.
pub fn describe_faults(bits: u8) -> String {
    const NAMES: [(u8, &str); 5] = [
        (FAULT_VOLTAGE, "voltage"),
        (FAULT_ANGLE, "angle"),
        (FAULT_OVERHEAT, "overheat"),
        (FAULT_OVERCURRENT, "overcurrent"),
        (FAULT_OVERLOAD, "overload"),
    ];

    let set: Vec<&str> = NAMES
        .iter()
        .filter(|(bit, _)| bits & bit != 0)
        .map(|(_, name)| *name)
        .collect();

    if set.is_empty() {
        format!("0x{bits:02X}")
    } else {
        format!("{} (0x{bits:02X})", set.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BusError;

    #[test]
    fn test_checksum() {
        // ID=1, Length=4, Instruction=WRITE, Addr=30, Data=0, 2
        let data = [1u8, 4, 0x03, 30, 0, 2];
        // ~(1+4+3+30+0+2) = ~40 = 215
        assert_eq!(checksum(&data), 215);
    }

    #[test]
    fn test_ping_packet_layout() {
        let packet = instruction_packet(1, Instruction::Ping, &[]);
        // Header (2) + ID (1) + Length (1) + Instruction (1) + Checksum (1)
        assert_eq!(packet.len(), 6);
        assert_eq!(packet[0], 0xFF);
        assert_eq!(packet[1], 0xFF);
        assert_eq!(packet[2], 1); // ID
        assert_eq!(packet[3], 2); // Length (instruction + checksum)
        assert_eq!(packet[4], 0x01); // PING
        assert_eq!(packet[5], checksum(&packet[2..5]));
    }

    #[test]
    fn test_write_packet_is_high_byte_first() {
        // Goal position 402 = 0x0192 for motor 1
        let mut params = vec![Register::GoalPosition as u8];
        params.extend_from_slice(&encode_u16(402));
        let packet = instruction_packet(1, Instruction::Write, &params);

        assert_eq!(&packet[..8], &[0xFF, 0xFF, 1, 5, 0x03, 42, 0x01, 0x92]);
        assert_eq!(packet[8], checksum(&packet[2..8]));
    }

    #[test]
    fn test_u16_wire_order_roundtrip() {
        assert_eq!(encode_u16(0x0192), [0x01, 0x92]);
        assert_eq!(decode_u16(0x01, 0x92), 0x0192);
        for v in [0u16, 1, 255, 256, 402, 631, 1023, 0xFFFF] {
            let [hi, lo] = encode_u16(v);
            assert_eq!(decode_u16(hi, lo), v);
        }
    }

    #[test]
    fn test_instruction_values() {
        assert_eq!(Instruction::Ping as u8, 0x01);
        assert_eq!(Instruction::Read as u8, 0x02);
        assert_eq!(Instruction::Write as u8, 0x03);
        assert_eq!(Instruction::SyncWrite as u8, 0x83);
    }

    #[test]
    fn test_register_widths() {
        assert_eq!(Register::TorqueEnable.width(), 1);
        assert_eq!(Register::PresentVoltage.width(), 1);
        assert_eq!(Register::GoalPosition.width(), 2);
        assert_eq!(Register::PresentLoad.width(), 2);
    }

    #[test]
    fn test_decode_status_ok() {
        // id=1, len=4, err=0, params=[0x01, 0x92], chk
        let mut frame = vec![1u8, 4, 0, 0x01, 0x92];
        frame.push(checksum(&frame));

        let reply = decode_status(1, &frame).unwrap();
        assert_eq!(reply.id, 1);
        assert_eq!(reply.fault_bits, 0);
        assert_eq!(reply.params, vec![0x01, 0x92]);
    }

    #[test]
    fn test_decode_status_bad_checksum() {
        let mut frame = vec![1u8, 4, 0, 0x01, 0x92];
        frame.push(checksum(&frame) ^ 0xFF);

        match decode_status(1, &frame) {
            Err(BusError::MalformedResponse { id: 1, reason }) => {
                assert!(reason.contains("checksum"), "reason: {reason}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_decode_status_wrong_id() {
        let mut frame = vec![2u8, 2, 0];
        frame.push(checksum(&frame));

        match decode_status(1, &frame) {
            Err(BusError::MalformedResponse { id: 1, reason }) => {
                assert!(reason.contains("id 2"), "reason: {reason}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_decode_status_length_mismatch() {
        // length field claims 5 but only 2 bytes follow the id/length pair
        let frame = [1u8, 5, 0, 0xFC];
        assert!(matches!(
            decode_status(1, &frame),
            Err(BusError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_decode_status_carries_fault_bits() {
        let mut frame = vec![3u8, 2, FAULT_OVERHEAT | FAULT_OVERLOAD];
        frame.push(checksum(&frame));

        let reply = decode_status(3, &frame).unwrap();
        assert_eq!(reply.fault_bits, 36);
        assert!(reply.params.is_empty());
    }

    #[test]
    fn test_sign_magnitude_bit15() {
        assert_eq!(decode_sign_magnitude(0, 15), 0);
        assert_eq!(decode_sign_magnitude(100, 15), 100);
        assert_eq!(decode_sign_magnitude(0x8064, 15), -100);
        assert_eq!(decode_sign_magnitude(0x8001, 15), -1);
    }

    #[test]
    fn test_sign_magnitude_bit10() {
        assert_eq!(decode_sign_magnitude(0, 10), 0);
        assert_eq!(decode_sign_magnitude(300, 10), 300);
        assert_eq!(decode_sign_magnitude(0x400 | 300, 10), -300);
        // bits above the sign bit are ignored
        assert_eq!(decode_sign_magnitude(0x8000 | 300, 10), 300);
    }

    #[test]
    fn test_describe_faults() {
        assert_eq!(describe_faults(FAULT_VOLTAGE), "voltage (0x01)");
        assert_eq!(
            describe_faults(FAULT_OVERHEAT | FAULT_OVERLOAD),
            "overheat, overload (0x24)"
        );
        assert_eq!(describe_faults(0x40), "0x40");
    }
}
