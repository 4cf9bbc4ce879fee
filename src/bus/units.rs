// Unit conversions between servo register values and physical units.
//
// The SCS0009 sweeps 300 degrees across a 10-bit encoder, with tick 512
// at the center of travel. Degrees here are signed and centered, so the
// usable command range is -150..=+150.

/// Encoder positions per full register range.
pub const ENCODER_STEPS: u16 = 1024;

/// Mechanical travel covered by the encoder range, in degrees.
pub const RANGE_DEG: f32 = 300.0;

const HALF_RANGE_DEG: f32 = RANGE_DEG / 2.0;
const MAX_TICKS: f32 = (ENCODER_STEPS - 1) as f32;

/// Convert a centered angle in degrees to encoder ticks, clamped to the
/// register range. Out-of-range angles saturate rather than wrap.
pub fn deg_to_ticks(deg: f32) -> u16 {
    let ticks = (deg + HALF_RANGE_DEG) * MAX_TICKS / RANGE_DEG;
    ticks.round().clamp(0.0, MAX_TICKS) as u16
}

/// Convert encoder ticks back to a centered angle in degrees.
pub fn ticks_to_deg(ticks: u16) -> f32 {
    ticks as f32 * RANGE_DEG / MAX_TICKS - HALF_RANGE_DEG
}

/// PresentVoltage is reported in tenths of a volt.
pub fn volts_from_raw(raw: u8) -> f32 {
    raw as f32 / 10.0
}
