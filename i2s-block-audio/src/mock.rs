//! Test doubles for the hardware seams.

extern crate std;

use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorType, OutputPin};

use crate::bus::I2sBus;
use crate::config::{BusConfig, PinAssignment};
use crate::error::SetupStage;
use crate::sample::FixedSample;

/// Error returned by [`MockBus`] for injected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault(pub SetupStage);

/// Error returned by the transfer paths of [`MockBus`].
pub const TRANSFER_FAULT: BusFault = BusFault(SetupStage::Lifecycle);

/// How the next transfer behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Move the whole buffer.
    Full,
    /// Move only this many bytes.
    Bytes(usize),
    /// Fail with [`TRANSFER_FAULT`].
    Fail,
}

/// Software I2S peripheral with a loopback wire.
///
/// Written words are kept on the "wire" and returned by the next read, so a
/// write followed by a read behaves like a codec with ADC tied to DAC.
pub struct MockBus {
    pub ports: u8,
    pub installed: Option<BusConfig>,
    pub pins: Option<PinAssignment>,
    pub sample_rate: Option<u32>,
    pub staging_zeroed: bool,
    pub master_clock: Option<(u8, u32)>,
    pub uninstalled: bool,
    /// Stages that should fail.
    pub fail: u32,
    pub read_mode: Transfer,
    pub write_mode: Transfer,
    pub wire: Vec<FixedSample>,
    pub last_timeout: Option<u32>,
    pub calls: Vec<&'static str>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            ports: 2,
            installed: None,
            pins: None,
            sample_rate: None,
            staging_zeroed: false,
            master_clock: None,
            uninstalled: false,
            fail: 0,
            read_mode: Transfer::Full,
            write_mode: Transfer::Full,
            wire: Vec::new(),
            last_timeout: None,
            calls: Vec::new(),
        }
    }

    pub fn failing(stages: &[SetupStage]) -> Self {
        let mut bus = Self::new();
        bus.fail = stages.iter().fold(0, |m, s| m | s.bit());
        bus
    }

    fn step(&mut self, name: &'static str, stage: SetupStage) -> Result<(), BusFault> {
        self.calls.push(name);
        if self.fail & stage.bit() != 0 {
            Err(BusFault(stage))
        } else {
            Ok(())
        }
    }

    fn bytes_for(mode: Transfer, words: usize) -> Result<usize, BusFault> {
        match mode {
            Transfer::Full => Ok(words * 4),
            Transfer::Bytes(n) => Ok(n.min(words * 4)),
            Transfer::Fail => Err(TRANSFER_FAULT),
        }
    }
}

impl I2sBus for MockBus {
    type Error = BusFault;

    fn port_count(&self) -> u8 {
        self.ports
    }

    fn install(&mut self, config: &BusConfig) -> Result<(), Self::Error> {
        self.step("install", SetupStage::Install)?;
        self.installed = Some(*config);
        Ok(())
    }

    fn set_pins(&mut self, pins: &PinAssignment) -> Result<(), Self::Error> {
        self.step("set_pins", SetupStage::Pins)?;
        self.pins = Some(*pins);
        Ok(())
    }

    fn set_sample_rate(&mut self, sample_rate: u32) -> Result<(), Self::Error> {
        self.step("set_sample_rate", SetupStage::SampleRate)?;
        self.sample_rate = Some(sample_rate);
        Ok(())
    }

    fn zero_staging(&mut self) -> Result<(), Self::Error> {
        self.step("zero_staging", SetupStage::ZeroStaging)?;
        self.staging_zeroed = true;
        Ok(())
    }

    fn route_master_clock(&mut self, pin: u8, mclk_hz: u32) -> Result<(), Self::Error> {
        self.step("route_master_clock", SetupStage::ClockOutput)?;
        self.master_clock = Some((pin, mclk_hz));
        Ok(())
    }

    fn read(&mut self, words: &mut [FixedSample], timeout_ms: u32) -> Result<usize, Self::Error> {
        self.calls.push("read");
        self.last_timeout = Some(timeout_ms);
        let bytes = Self::bytes_for(self.read_mode, words.len())?;
        let n = (bytes / 4).min(self.wire.len());
        words[..n].copy_from_slice(&self.wire[..n]);
        Ok(bytes)
    }

    fn write(&mut self, words: &[FixedSample], timeout_ms: u32) -> Result<usize, Self::Error> {
        self.calls.push("write");
        self.last_timeout = Some(timeout_ms);
        let bytes = Self::bytes_for(self.write_mode, words.len())?;
        self.wire.clear();
        self.wire.extend_from_slice(&words[..bytes / 4]);
        Ok(bytes)
    }

    fn uninstall(&mut self) -> Result<(), Self::Error> {
        self.calls.push("uninstall");
        self.uninstalled = true;
        self.installed = None;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Power-enable line that remembers every level driven onto it.
pub struct MockPin {
    pub high: bool,
    pub history: Vec<bool>,
    pub fail: bool,
}

impl MockPin {
    /// A pin left high by whatever ran before the driver.
    pub fn new() -> Self {
        Self {
            high: true,
            history: Vec::new(),
            fail: false,
        }
    }
}

impl ErrorType for MockPin {
    type Error = PinFault;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(PinFault);
        }
        self.high = false;
        self.history.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(PinFault);
        }
        self.high = true;
        self.history.push(true);
        Ok(())
    }
}

/// Delay that only adds up the requested time.
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
