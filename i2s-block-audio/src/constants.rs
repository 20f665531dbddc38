/// Default number of frames (samples per channel) in one audio block.
pub const DEFAULT_BLOCK_SIZE: usize = 256;

/// Default channel count (interleaved stereo).
pub const DEFAULT_CHANNEL_COUNT: usize = 2;

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Bounded wait for one block read or write, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u32 = 500;

/// Clock stabilisation delay at the end of setup, in milliseconds.
pub const DEFAULT_SETTLE_MS: u32 = 500;

/// Master clock as a multiple of the sample rate.
///
/// Correct for an AK4556 in a slave mode at double speed or in class-2 modes
/// at normal speed. Other chips and modes need a different ratio, see
/// [`DriverConfig::with_mclk_multiple`](crate::config::DriverConfig::with_mclk_multiple).
pub const DEFAULT_MCLK_MULTIPLE: u32 = 384;

/// Number of peripheral staging (DMA) buffers.
pub const STAGING_BUFFER_COUNT: usize = 2;

/// Size of one sample word on the wire, in bytes.
pub const SAMPLE_BYTES: usize = core::mem::size_of::<i32>();
