//! Block-based I2S audio driver.
//!
//! [`AudioDriver`] owns the peripheral bus, the codec power-enable line, a
//! delay provider and a pair of block buffers. The audio loop calls
//! [`read_block`](AudioDriver::read_block) and
//! [`write_block`](AudioDriver::write_block) once per block; both wait on the
//! peripheral for at most the configured timeout.
//!
//! ## Lifecycle
//!
//! ```text
//!              setup ok              read/write
//! Uninitialized ───────► Configured ───────────► Running ◄─┐
//!      ▲   │ setup err        │ enable(false)     │        │ enable(true)
//!      │   ▼                  └──────────┬────────┘        │
//!      │ Faulted                         ▼                 │
//!      │                             PoweredOff ───────────┘
//!      └──────────── teardown (from any state)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut audio: AudioDriver<_, _, _, 512> = AudioDriver::new(i2s, power_pin, delay);
//! let config = DriverConfig::new(48_000, 2, PinAssignment::new(26, 25, 22, 35))
//!     .with_block_size(256);
//! if !audio.setup(config).is_ok() {
//!     // driver not usable
//! }
//! audio.enable(true)?;
//!
//! loop {
//!     let _ = audio.read_block();
//!     audio.read_channel_f32(0, &mut left);
//!     audio.read_channel_f32(1, &mut right);
//!     process(&mut left, &mut right);
//!     audio.write_channel_f32(0, &left);
//!     audio.write_channel_f32(1, &right);
//!     let _ = audio.write_block();
//! }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::block::BlockBuffers;
use crate::bus::I2sBus;
use crate::config::{BitDepth, DriverConfig};
use crate::constants::SAMPLE_BYTES;
use crate::error::{SetupReport, SetupStage, StageError, TeardownError, TransferError};
use crate::io::interleave::{deinterleave_f32, interleave_f32};
use crate::sample::FixedSample;

/// Lifecycle state of an [`AudioDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// No configuration applied.
    Uninitialized,
    /// Setup succeeded, no block transferred yet.
    Configured,
    /// Steady-state block I/O.
    Running,
    /// Codec powered down; buffers and configuration remain valid.
    PoweredOff,
    /// Setup failed; block I/O is refused until teardown.
    Faulted,
}

/// Block transfer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferStats {
    /// Complete blocks received.
    pub blocks_read: u32,
    /// Blocks handed to the peripheral.
    pub blocks_written: u32,
    /// Failed or short reads.
    pub read_faults: u32,
    /// Failed or empty writes.
    pub write_faults: u32,
}

/// Setup report type of an [`AudioDriver`].
pub type DriverSetupReport<BUS, PIN> =
    SetupReport<<BUS as I2sBus>::Error, <PIN as embedded_hal::digital::ErrorType>::Error>;

/// I2S block driver with `N` samples of buffer capacity per direction.
pub struct AudioDriver<BUS, PIN, D, const N: usize> {
    bus: BUS,
    power: PIN,
    delay: D,
    buffers: BlockBuffers<N>,
    config: Option<DriverConfig>,
    port: u8,
    state: DriverState,
    powered: bool,
    /// An install was attempted and not yet undone.
    installed: bool,
    stats: TransferStats,
}

impl<BUS, PIN, D, const N: usize> AudioDriver<BUS, PIN, D, N>
where
    BUS: I2sBus,
    PIN: OutputPin,
    D: DelayNs,
{
    /// Wrap the hardware resources. Nothing is touched until [`setup`](Self::setup).
    pub fn new(bus: BUS, power: PIN, delay: D) -> Self {
        Self {
            bus,
            power,
            delay,
            buffers: BlockBuffers::new(),
            config: None,
            port: 0,
            state: DriverState::Uninitialized,
            powered: false,
            installed: false,
            stats: TransferStats::default(),
        }
    }

    /// Configure the peripheral and allocate the block buffers.
    ///
    /// The codec is powered down first, whatever the outcome; call
    /// [`enable`](Self::enable) to power it. Every hardware stage runs even if
    /// an earlier one failed, and each failure is recorded in the returned
    /// report. Treat any failure as "driver not usable": the driver moves to
    /// [`DriverState::Faulted`].
    ///
    /// A block that does not fit the `N`-sample buffers, or a sample width
    /// other than 24 bits, is rejected before the peripheral is touched.
    pub fn setup(&mut self, config: DriverConfig) -> DriverSetupReport<BUS, PIN> {
        let mut report = SetupReport::new();

        if let Err(e) = self.power.set_low() {
            report.record(SetupStage::PowerPin, StageError::Pin(e));
        }
        self.powered = false;
        if self.state == DriverState::Running {
            self.state = DriverState::PoweredOff;
        }

        if self.config.is_some() {
            error!("setup called on a configured driver");
            report.record(SetupStage::Lifecycle, StageError::AlreadyConfigured);
            return report;
        }

        if config.bit_depth != BitDepth::Bits24 {
            error!("{}-bit samples not supported", config.bit_depth.data_bits());
            report.record(
                SetupStage::Buffers,
                StageError::UnsupportedBitDepth {
                    bits: config.bit_depth.data_bits(),
                },
            );
            return report;
        }

        let required = config
            .channel_count
            .checked_mul(config.block_size)
            .unwrap_or(usize::MAX);
        if config.channel_count == 0 || config.block_size == 0 || required > N {
            error!("block of {} samples does not fit buffers of {}", required, N);
            report.record(
                SetupStage::Buffers,
                StageError::Geometry {
                    required,
                    capacity: N,
                },
            );
            return report;
        }

        let max_port = self.bus.port_count().saturating_sub(1);
        let port = config.port.min(max_port);
        if port != config.port {
            warn!("I2S port {} out of range, using {}", config.port, port);
        }
        self.port = port;

        let bus_config = config.bus_config(port);
        self.installed = true;
        if let Err(e) = self.bus.install(&bus_config) {
            report.record(SetupStage::Install, StageError::Bus(e));
        }
        if let Err(e) = self.bus.set_pins(&config.pins) {
            report.record(SetupStage::Pins, StageError::Bus(e));
        }
        if let Err(e) = self.bus.set_sample_rate(config.sample_rate) {
            report.record(SetupStage::SampleRate, StageError::Bus(e));
        }
        if let Err(e) = self.bus.zero_staging() {
            report.record(SetupStage::ZeroStaging, StageError::Bus(e));
        }
        if config.mclk_output {
            if let Err(e) = self
                .bus
                .route_master_clock(config.pins.master_clock, bus_config.mclk_hz)
            {
                report.record(SetupStage::ClockOutput, StageError::Bus(e));
            }
        }

        self.delay.delay_ms(config.settle_ms);

        self.buffers.allocate(required);
        self.config = Some(config);
        self.stats = TransferStats::default();

        if report.is_ok() {
            self.state = DriverState::Configured;
            info!(
                "I2S port {} configured: {} Hz, {} ch x {} frames, MCLK {} Hz",
                port,
                config.sample_rate,
                config.channel_count,
                config.block_size,
                bus_config.mclk_hz
            );
        } else {
            self.state = DriverState::Faulted;
            for (stage, _) in report.failures() {
                error!("I2S setup stage '{}' failed", stage.name());
            }
        }

        report
    }

    /// Drive the codec power-enable line.
    pub fn enable(&mut self, power_on: bool) -> Result<(), PIN::Error> {
        self.power.set_state(PinState::from(power_on))?;
        self.powered = power_on;
        self.state = match self.state {
            DriverState::Configured | DriverState::Running | DriverState::PoweredOff => {
                if power_on {
                    DriverState::Running
                } else {
                    DriverState::PoweredOff
                }
            }
            other => other,
        };
        debug!("codec power {}", power_on);
        Ok(())
    }

    /// Receive one block into the read buffer.
    ///
    /// A bus error or a short read is logged and returned, but leaves the
    /// driver usable; the next call simply tries again.
    pub fn read_block(&mut self) -> Result<(), TransferError<BUS::Error>> {
        let timeout_ms = self.transfer_timeout()?;
        let expected = self.buffers.len() * SAMPLE_BYTES;

        let result = self.bus.read(self.buffers.read_mut(), timeout_ms);
        self.mark_running();

        match result {
            Ok(transferred) if transferred >= expected => {
                self.stats.blocks_read = self.stats.blocks_read.wrapping_add(1);
                Ok(())
            }
            Ok(transferred) => {
                self.stats.read_faults = self.stats.read_faults.wrapping_add(1);
                warn!("I2S read error: {} of {} bytes", transferred, expected);
                Err(TransferError::Short {
                    expected,
                    transferred,
                })
            }
            Err(e) => {
                self.stats.read_faults = self.stats.read_faults.wrapping_add(1);
                warn!("I2S read error: bus fault");
                Err(TransferError::Bus(e))
            }
        }
    }

    /// Hand the write buffer to the peripheral.
    ///
    /// Only a bus error or a write of zero bytes is an error; a partial write
    /// means the staging buffers were full and the remainder is dropped.
    pub fn write_block(&mut self) -> Result<(), TransferError<BUS::Error>> {
        let timeout_ms = self.transfer_timeout()?;
        let expected = self.buffers.len() * SAMPLE_BYTES;

        let result = self.bus.write(self.buffers.write(), timeout_ms);
        self.mark_running();

        match result {
            Ok(0) => {
                self.stats.write_faults = self.stats.write_faults.wrapping_add(1);
                warn!("I2S write error: 0 of {} bytes", expected);
                Err(TransferError::Short {
                    expected,
                    transferred: 0,
                })
            }
            Ok(transferred) => {
                if transferred < expected {
                    debug!("I2S partial write: {} of {} bytes", transferred, expected);
                }
                self.stats.blocks_written = self.stats.blocks_written.wrapping_add(1);
                Ok(())
            }
            Err(e) => {
                self.stats.write_faults = self.stats.write_faults.wrapping_add(1);
                warn!("I2S write error: bus fault");
                Err(TransferError::Bus(e))
            }
        }
    }

    /// Power the codec down, uninstall the peripheral and drop the buffers.
    ///
    /// Both hardware steps are attempted even if the first fails. The driver
    /// is [`Uninitialized`](DriverState::Uninitialized) afterwards and can be
    /// set up again.
    pub fn teardown(&mut self) -> Result<(), TeardownError<BUS::Error, PIN::Error>> {
        let power = self.power.set_low().err();
        self.powered = false;

        let bus = if self.installed {
            self.bus.uninstall().err()
        } else {
            None
        };
        self.installed = false;

        self.buffers.release();
        self.config = None;
        self.state = DriverState::Uninitialized;

        if power.is_none() && bus.is_none() {
            info!("I2S port {} released", self.port);
            Ok(())
        } else {
            error!("I2S teardown incomplete");
            Err(TeardownError { power, bus })
        }
    }

    /// Give back the hardware resources.
    ///
    /// Call [`teardown`](Self::teardown) first to leave the peripheral idle.
    pub fn release(self) -> (BUS, PIN, D) {
        (self.bus, self.power, self.delay)
    }

    /// Copy channel `channel` of the last received block into `dst` as floats.
    ///
    /// Returns the number of frames written.
    pub fn read_channel_f32(&self, channel: usize, dst: &mut [f32]) -> usize {
        match self.config {
            Some(config) => deinterleave_f32(self.buffers.read(), config.channel_count, channel, dst),
            None => 0,
        }
    }

    /// Store `src` floats into channel `channel` of the write buffer.
    ///
    /// Out-of-range samples are clamped. Returns the number of frames written.
    pub fn write_channel_f32(&mut self, channel: usize, src: &[f32]) -> usize {
        match self.config {
            Some(config) => {
                interleave_f32(self.buffers.write_mut(), config.channel_count, channel, src)
            }
            None => 0,
        }
    }

    fn transfer_timeout(&self) -> Result<u32, TransferError<BUS::Error>> {
        match (self.state, self.config) {
            (DriverState::Uninitialized | DriverState::Faulted, _) | (_, None) => {
                Err(TransferError::NotConfigured)
            }
            (_, Some(config)) => Ok(config.timeout_ms),
        }
    }

    fn mark_running(&mut self) {
        if self.state == DriverState::Configured {
            debug!("I2S port {} running", self.port);
            self.state = DriverState::Running;
        }
    }
}

impl<BUS, PIN, D, const N: usize> AudioDriver<BUS, PIN, D, N> {
    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Configuration applied by the last successful or failed setup.
    pub fn config(&self) -> Option<&DriverConfig> {
        self.config.as_ref()
    }

    /// Peripheral instance in use, after clamping.
    pub fn port(&self) -> u8 {
        self.port
    }

    /// Last level driven onto the power-enable line.
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Last received block, `channels × block_size` interleaved samples.
    pub fn read_buffer(&self) -> &[FixedSample] {
        self.buffers.read()
    }

    /// Block queued for the next [`write_block`](AudioDriver::write_block).
    pub fn write_buffer(&self) -> &[FixedSample] {
        self.buffers.write()
    }

    /// Mutable access to the write buffer.
    pub fn write_buffer_mut(&mut self) -> &mut [FixedSample] {
        self.buffers.write_mut()
    }

    /// Transfer counters since setup.
    pub fn stats(&self) -> TransferStats {
        self.stats
    }

    /// Clear the transfer counters.
    pub fn reset_stats(&mut self) {
        self.stats = TransferStats::default();
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut BUS {
        &mut self.bus
    }
}
