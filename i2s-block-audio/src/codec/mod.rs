//! Codec support.
//!
//! The attached codec is strapped rather than programmed, so this module only
//! describes what each strapping implies for the driver configuration.
//!
//! # Feature gate
//!
//! This module is available when the `ak4556` feature is enabled (on by default).

mod ak4556;

pub use ak4556::{Ak4556Mode, MclkRequirement, SerialFormat, SpeedMode};
