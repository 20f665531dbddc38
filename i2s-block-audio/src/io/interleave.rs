//! Channel interleave/deinterleave for 24-in-32 sample blocks.
//!
//! A block holds `frames × channels` words in slot order:
//!
//! ```text
//! [ ch0 ch1 … chN-1 | ch0 ch1 … chN-1 | … ]
//!    frame 0           frame 1
//! ```
//!
//! With two channels, `ch0` is left and `ch1` is right, matching the
//! peripheral's `RightLeft` slot layout.

use crate::sample::{to_fixed, to_float, FixedSample};

/// Copy channel `channel` of the interleaved `src` into `dst` as floats.
///
/// Returns the number of frames written: the smaller of `dst.len()` and the
/// frames in `src`. Returns 0 when `channel >= channels`.
pub fn deinterleave_f32(
    src: &[FixedSample],
    channels: usize,
    channel: usize,
    dst: &mut [f32],
) -> usize {
    if channels == 0 || channel >= channels {
        return 0;
    }
    let mut frames = 0;
    for (d, frame) in dst.iter_mut().zip(src.chunks_exact(channels)) {
        *d = to_float(frame[channel]);
        frames += 1;
    }
    frames
}

/// Write `src` floats into channel `channel` of the interleaved `dest`.
///
/// Other channels are left untouched. Returns the number of frames written.
pub fn interleave_f32(
    dest: &mut [FixedSample],
    channels: usize,
    channel: usize,
    src: &[f32],
) -> usize {
    if channels == 0 || channel >= channels {
        return 0;
    }
    let mut frames = 0;
    for (frame, &s) in dest.chunks_exact_mut(channels).zip(src.iter()) {
        frame[channel] = to_fixed(s);
        frames += 1;
    }
    frames
}

/// Fill a block with silence.
pub fn silence(dest: &mut [FixedSample]) {
    dest.fill(0);
}
