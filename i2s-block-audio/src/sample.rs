//! Fixed-point ↔ float sample conversion.
//!
//! The peripheral word is a signed 32-bit integer carrying a 24-bit sample in
//! its upper bits; the low 8 bits are always zero. Upstream processing works
//! on `f32` in the nominal range `[-1.0, 1.0)`.
//!
//! ```text
//!  31                      8 7        0
//! ┌─────────────────────────┬──────────┐
//! │  24-bit signed sample   │ 00000000 │
//! └─────────────────────────┴──────────┘
//! ```
//!
//! None of these functions allocate or keep state, so they are safe to call
//! from an ISR.

/// A peripheral sample word: 24 significant bits, left-justified in 32.
pub type FixedSample = i32;

/// `1 / 2^31`: maps the full `i32` range onto `[-1.0, 1.0)`.
pub const SCALE_FIXED_TO_FLOAT: f32 = 1.0 / 2_147_483_648.0;

/// `2^23`: maps `[-1.0, 1.0)` onto the 24-bit integer range.
pub const SCALE_FLOAT_TO_FIXED: f32 = 8_388_608.0;

/// Largest 24-bit sample magnitude, before the 8-bit alignment shift.
pub const FIXED_MAX: i32 = (1 << 23) - 1;

/// Smallest 24-bit sample value, before the 8-bit alignment shift.
pub const FIXED_MIN: i32 = -(1 << 23);

/// Left shift aligning a 24-bit value to the peripheral word.
pub const ALIGN_SHIFT: u32 = 8;

/// Convert a peripheral word to a normalized float.
#[inline]
pub fn to_float(sample: FixedSample) -> f32 {
    sample as f32 * SCALE_FIXED_TO_FLOAT
}

/// Convert a normalized float to a peripheral word.
///
/// Rounds to the nearest 24-bit step (ties away from zero) and saturates
/// anything outside `[-1.0, 1.0 - 2^-23]`. NaN becomes silence.
#[inline]
pub fn to_fixed(sample: f32) -> FixedSample {
    if sample.is_nan() {
        return 0;
    }
    let scaled = libm::roundf(sample * SCALE_FLOAT_TO_FIXED);
    let clamped = scaled.clamp(FIXED_MIN as f32, FIXED_MAX as f32) as i32;
    clamped << ALIGN_SHIFT
}

/// Convert `src` into `dst` with [`to_float`], over the shorter of the two.
pub fn to_float_slice(src: &[FixedSample], dst: &mut [f32]) {
    for (d, &s) in dst.iter_mut().zip(src.iter()) {
        *d = to_float(s);
    }
}

/// Convert `src` into `dst` with [`to_fixed`], over the shorter of the two.
pub fn to_fixed_slice(src: &[f32], dst: &mut [FixedSample]) {
    for (d, &s) in dst.iter_mut().zip(src.iter()) {
        *d = to_fixed(s);
    }
}
