//! Peripheral bus seam.
//!
//! [`I2sBus`] is everything the driver needs from the vendor I2S peripheral.
//! Implement it over the HAL of the target chip; the driver never touches
//! registers itself.

use crate::config::{BusConfig, PinAssignment};
use crate::sample::FixedSample;

/// A duplex I2S peripheral with staging buffers and bounded-timeout transfers.
pub trait I2sBus {
    /// Error type reported by every bus operation.
    type Error: core::fmt::Debug;

    /// Number of peripheral instances; valid ports are `0..port_count()`.
    fn port_count(&self) -> u8;

    /// Install the peripheral driver with `config`.
    fn install(&mut self, config: &BusConfig) -> Result<(), Self::Error>;

    /// Route the serial lines to `pins`.
    fn set_pins(&mut self, pins: &PinAssignment) -> Result<(), Self::Error>;

    /// Program the sample rate.
    fn set_sample_rate(&mut self, sample_rate: u32) -> Result<(), Self::Error>;

    /// Clear the staging buffers so nothing stale is transmitted.
    fn zero_staging(&mut self) -> Result<(), Self::Error>;

    /// Output the master clock on `pin`.
    fn route_master_clock(&mut self, pin: u8, mclk_hz: u32) -> Result<(), Self::Error>;

    /// Receive into `words`, waiting at most `timeout_ms`.
    ///
    /// Returns the number of **bytes** received, which may be short.
    fn read(&mut self, words: &mut [FixedSample], timeout_ms: u32) -> Result<usize, Self::Error>;

    /// Queue `words` for transmission, waiting at most `timeout_ms`.
    ///
    /// Returns the number of **bytes** accepted, which may be short.
    fn write(&mut self, words: &[FixedSample], timeout_ms: u32) -> Result<usize, Self::Error>;

    /// Uninstall the peripheral driver and release its resources.
    fn uninstall(&mut self) -> Result<(), Self::Error>;
}
