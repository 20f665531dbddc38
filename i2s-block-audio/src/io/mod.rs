//! Block-level I/O helpers.
//!
//! The driver exchanges whole interleaved blocks with the peripheral; these
//! helpers move one channel at a time between a block and a float buffer.
//!
//! - [`interleave`]: per-channel float interleave/deinterleave

pub mod interleave;

pub use interleave::{deinterleave_f32, interleave_f32, silence};
