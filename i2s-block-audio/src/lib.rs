//! # i2s-block-audio
//!
//! A `no_std`, zero-allocation driver that moves fixed-size blocks of
//! interleaved audio between an I²S peripheral and a block-based processing
//! loop, converting between the peripheral's 24-in-32-bit fixed-point words
//! and normalized `f32` samples.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Samples | [`sample`] | Fixed-point ↔ float conversion with saturation |
//! | Memory | [`block`] | Driver-owned read/write block buffers |
//! | Config | [`config`] | Driver and peripheral configuration |
//! | Seam | [`bus`] | [`I2sBus`](bus::I2sBus) trait over the vendor peripheral |
//! | I/O | [`io`] | Channel interleave/deinterleave helpers |
//! | Driver | [`driver`] | [`AudioDriver`](driver::AudioDriver): setup, power, block I/O, teardown |
//! | Codec | [`codec`] | AK4556 operating-mode table (feature-gated) |
//!
//! ## Quick start
//!
//! ```ignore
//! use i2s_block_audio::config::{DriverConfig, PinAssignment};
//! use i2s_block_audio::driver::AudioDriver;
//!
//! let mut audio: AudioDriver<_, _, _, 512> = AudioDriver::new(i2s, power_pin, delay);
//! let report = audio.setup(
//!     DriverConfig::new(48_000, 2, PinAssignment::new(26, 25, 22, 35)).with_block_size(256),
//! );
//! assert!(report.is_ok());
//! audio.enable(true)?;
//!
//! // Once per block, from the audio task:
//! let _ = audio.read_block();
//! let frames = audio.read_channel_f32(0, &mut left);
//! // ... process ...
//! audio.write_channel_f32(0, &left[..frames]);
//! let _ = audio.write_block();
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `ak4556` | yes | AK4556 mode table and MCLK ratio lookup |
//! | `log` | yes | Diagnostics through the `log` facade |
//! | `defmt` | no | Diagnostics through `defmt`, `defmt::Format` on public types |
//!
//! ## Audio parameters
//!
//! - **Sample format:** 24 significant bits, left-justified in `i32`
//! - **Block:** `channels × block_size` interleaved samples
//!   ([`constants::DEFAULT_BLOCK_SIZE`] frames by default)
//! - **Transfer timeout:** [`constants::DEFAULT_TIMEOUT_MS`] ms per block

#![no_std]

#[macro_use]
mod fmt;

pub mod constants;
pub mod sample;
pub mod block;
pub mod config;
pub mod error;
pub mod bus;
pub mod io;
pub mod driver;

#[cfg(feature = "ak4556")]
pub mod codec;

#[cfg(test)]
mod mock;

#[cfg(test)]
mod integration_tests;
