//! Fixed-point to floating-point conversion.
//!
//! The console's geometry pipeline stores unit-range values as 16-bit
//! fixed-point words with a 12-bit fractional part (one unit = 4096).
//! Two encodings appear in the asset files:
//!
//! - packed normal components: 1 sign bit, 3 integral bits, 12 fractional
//!   bits, sign-magnitude (not two's complement);
//! - animation weight samples: plain unsigned 4.12 values, nominally in
//!   `[0, 16)`.

/// One unit in 4.12 fixed point
pub const FIXED_ONE: f32 = 4096.0;

/// Convert a packed sign-magnitude normal component to `f32`.
///
/// Layout: bit 15 sign, bits 12-14 integral part, bits 0-11 fractional
/// part. The result is `sign * (integral + fractional / 4096)`, so
/// `0x1000` is exactly `1.0` and `0x8000` is negative zero.
pub fn normal_to_f32(raw: u16) -> f32 {
    let integral = ((raw >> 12) & 0x7) as f32;
    let fractional = (raw & 0x0FFF) as f32 / FIXED_ONE;

    let magnitude = integral + fractional;
    if raw & 0x8000 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Convert an unsigned 4.12 weight sample to `f32` by dividing by 4096
pub fn weight_to_f32(raw: u16) -> f32 {
    f32::from(raw) / FIXED_ONE
}
