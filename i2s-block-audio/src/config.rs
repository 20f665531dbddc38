//! Driver and peripheral configuration.
//!
//! [`DriverConfig`] is what the application hands to
//! [`AudioDriver::setup`](crate::driver::AudioDriver::setup). It is copied into
//! the driver and never changes until teardown. [`BusConfig`] is the
//! peripheral-level view derived from it inside `setup` and passed to
//! [`I2sBus::install`](crate::bus::I2sBus::install).

use crate::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_CHANNEL_COUNT, DEFAULT_MCLK_MULTIPLE, DEFAULT_SAMPLE_RATE,
    DEFAULT_SETTLE_MS, DEFAULT_TIMEOUT_MS, STAGING_BUFFER_COUNT,
};

/// Which side generates the bus clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockRole {
    /// The MCU peripheral drives BCLK, WS and MCLK.
    Master,
    /// The attached codec drives the clocks.
    Slave,
}

/// Sample data width on the wire.
///
/// The driver's buffers and converters only handle [`BitDepth::Bits24`];
/// setup rejects the other widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitDepth {
    /// 16-bit samples.
    Bits16,
    /// 24 significant bits in a 32-bit slot.
    Bits24,
    /// Full 32-bit samples.
    Bits32,
}

impl BitDepth {
    /// Number of significant data bits.
    pub const fn data_bits(self) -> u8 {
        match self {
            BitDepth::Bits16 => 16,
            BitDepth::Bits24 => 24,
            BitDepth::Bits32 => 32,
        }
    }

    /// Width of the slot carrying one sample.
    pub const fn slot_bits(self) -> u8 {
        match self {
            BitDepth::Bits16 => 16,
            BitDepth::Bits24 | BitDepth::Bits32 => 32,
        }
    }
}

/// Serial framing standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommFormat {
    /// Philips I2S: MSB first, one BCLK delay after WS.
    I2sMsb,
    /// Left-justified: MSB first, no delay.
    LeftJustified,
}

/// GPIO numbers of the serial audio lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    /// Bit clock (BCLK / SCK).
    pub bit_clock: u8,
    /// Word select (LRCK / WS).
    pub word_select: u8,
    /// Serial data towards the codec DAC.
    pub data_out: u8,
    /// Serial data from the codec ADC.
    pub data_in: u8,
    /// Pin the master clock is routed to when MCLK output is enabled.
    pub master_clock: u8,
}

impl PinAssignment {
    /// Create a pin assignment. The master clock defaults to GPIO0.
    pub const fn new(bit_clock: u8, word_select: u8, data_out: u8, data_in: u8) -> Self {
        Self {
            bit_clock,
            word_select,
            data_out,
            data_in,
            master_clock: 0,
        }
    }

    /// Route the master clock to `pin` instead.
    pub const fn master_clock(mut self, pin: u8) -> Self {
        self.master_clock = pin;
        self
    }
}

/// Application-level driver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channels per frame.
    pub channel_count: usize,
    /// Frames per block.
    pub block_size: usize,
    /// Peripheral instance; clamped to the bus' valid range during setup.
    pub port: u8,
    /// Serial line pins.
    pub pins: PinAssignment,
    /// Sample width.
    pub bit_depth: BitDepth,
    /// Clock mastering mode of the MCU peripheral.
    pub clock_role: ClockRole,
    /// Framing standard.
    pub comm_format: CommFormat,
    /// MCLK = `mclk_multiple` × `sample_rate`.
    pub mclk_multiple: u32,
    /// Drive MCLK out of the MCU, independent of who masters BCLK/WS.
    pub mclk_output: bool,
    /// Bounded wait per block transfer.
    pub timeout_ms: u32,
    /// Delay after clock routing before setup returns.
    pub settle_ms: u32,
}

impl DriverConfig {
    /// Configuration for the reference wiring: 24-bit I2S master, stereo,
    /// default block size, 384 fs MCLK.
    pub const fn new(sample_rate: u32, channel_count: usize, pins: PinAssignment) -> Self {
        Self {
            sample_rate,
            channel_count,
            block_size: DEFAULT_BLOCK_SIZE,
            port: 0,
            pins,
            bit_depth: BitDepth::Bits24,
            clock_role: ClockRole::Master,
            comm_format: CommFormat::I2sMsb,
            mclk_multiple: DEFAULT_MCLK_MULTIPLE,
            mclk_output: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    /// Set the frames per block.
    pub const fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Select the peripheral instance.
    pub const fn with_port(mut self, port: u8) -> Self {
        self.port = port;
        self
    }

    /// Set the clock mastering mode.
    pub const fn with_clock_role(mut self, role: ClockRole) -> Self {
        self.clock_role = role;
        self
    }

    /// Set the MCLK ratio for the attached codec.
    pub const fn with_mclk_multiple(mut self, multiple: u32) -> Self {
        self.mclk_multiple = multiple;
        self
    }

    /// Enable or disable the MCLK output.
    pub const fn with_mclk_output(mut self, enabled: bool) -> Self {
        self.mclk_output = enabled;
        self
    }

    /// Set the per-block transfer timeout.
    pub const fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the clock settle delay.
    pub const fn with_settle_ms(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Samples in one interleaved block.
    pub const fn block_samples(&self) -> usize {
        self.channel_count * self.block_size
    }

    /// Bytes in one interleaved block on the wire.
    pub const fn block_bytes(&self) -> usize {
        self.block_samples() * crate::constants::SAMPLE_BYTES
    }

    /// Master clock frequency in Hz, saturating on overflow.
    pub const fn mclk_hz(&self) -> u32 {
        self.sample_rate.saturating_mul(self.mclk_multiple)
    }

    /// Bit clock frequency in Hz: slot width × channels × sample rate.
    pub const fn bclk_hz(&self) -> u32 {
        (self.bit_depth.slot_bits() as u32)
            .saturating_mul(self.channel_count as u32)
            .saturating_mul(self.sample_rate)
    }

    /// Derive the peripheral configuration, with `port` already clamped.
    pub const fn bus_config(&self, port: u8) -> BusConfig {
        BusConfig {
            port,
            clock_role: self.clock_role,
            sample_rate: self.sample_rate,
            bit_depth: self.bit_depth,
            channel_count: self.channel_count,
            comm_format: self.comm_format,
            staging_buffer_count: STAGING_BUFFER_COUNT,
            staging_buffer_len: self.block_size,
            auto_clear_tx: true,
            mclk_hz: self.mclk_hz(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_SAMPLE_RATE,
            DEFAULT_CHANNEL_COUNT,
            PinAssignment::new(26, 25, 22, 35),
        )
    }
}

/// Peripheral-level configuration passed to the bus on install.
///
/// The peripheral always runs full duplex with channels interleaved in slot
/// order (left, right, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Clamped peripheral instance.
    pub port: u8,
    /// Clock mastering mode.
    pub clock_role: ClockRole,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Sample width.
    pub bit_depth: BitDepth,
    /// Interleaved channels per frame.
    pub channel_count: usize,
    /// Framing standard.
    pub comm_format: CommFormat,
    /// Number of staging (DMA) buffers.
    pub staging_buffer_count: usize,
    /// Frames per staging buffer.
    pub staging_buffer_len: usize,
    /// Transmit silence when the TX staging buffer runs dry.
    pub auto_clear_tx: bool,
    /// Fixed master clock frequency in Hz.
    pub mclk_hz: u32,
}
