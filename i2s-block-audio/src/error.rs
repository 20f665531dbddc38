//! Setup reports and transfer errors.
//!
//! Setup runs every configuration stage even after an earlier one failed and
//! records each failure in a [`SetupReport`]. Callers that only need a yes/no
//! answer use [`SetupReport::is_ok`] or the aggregate [`SetupReport::code`].

use core::fmt;

/// A configuration step performed by [`AudioDriver::setup`](crate::driver::AudioDriver::setup).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SetupStage {
    /// Driver already configured.
    Lifecycle = 0,
    /// Block geometry against buffer capacity.
    Buffers = 1,
    /// Power-enable line driven to the safe default.
    PowerPin = 2,
    /// Peripheral driver install.
    Install = 3,
    /// Pin routing.
    Pins = 4,
    /// Sample rate programming.
    SampleRate = 5,
    /// Staging buffer clear.
    ZeroStaging = 6,
    /// Master clock output routing.
    ClockOutput = 7,
}

impl SetupStage {
    /// Number of stages.
    pub const COUNT: usize = 8;

    /// All stages in execution order.
    pub const ALL: [SetupStage; Self::COUNT] = [
        SetupStage::Lifecycle,
        SetupStage::Buffers,
        SetupStage::PowerPin,
        SetupStage::Install,
        SetupStage::Pins,
        SetupStage::SampleRate,
        SetupStage::ZeroStaging,
        SetupStage::ClockOutput,
    ];

    /// Bit of this stage in [`SetupReport::code`].
    pub const fn bit(self) -> u32 {
        1 << self as u8
    }

    /// Short name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            SetupStage::Lifecycle => "lifecycle",
            SetupStage::Buffers => "buffers",
            SetupStage::PowerPin => "power pin",
            SetupStage::Install => "install",
            SetupStage::Pins => "pins",
            SetupStage::SampleRate => "sample rate",
            SetupStage::ZeroStaging => "zero staging",
            SetupStage::ClockOutput => "clock output",
        }
    }
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a setup stage failed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StageError<E, P> {
    /// The peripheral bus reported an error.
    Bus(E),
    /// The power-enable pin reported an error.
    Pin(P),
    /// The block does not fit the driver's buffers.
    Geometry {
        /// Samples needed: `channels × block_size`.
        required: usize,
        /// Samples available per buffer.
        capacity: usize,
    },
    /// The configured sample width is not 24-in-32.
    UnsupportedBitDepth {
        /// Requested data bits.
        bits: u8,
    },
    /// `setup` called on a configured driver.
    AlreadyConfigured,
}

impl<E: fmt::Debug, P: fmt::Debug> fmt::Display for StageError<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::Bus(e) => write!(f, "bus error: {e:?}"),
            StageError::Pin(e) => write!(f, "pin error: {e:?}"),
            StageError::Geometry { required, capacity } => write!(
                f,
                "block of {required} samples does not fit buffers of {capacity}"
            ),
            StageError::UnsupportedBitDepth { bits } => {
                write!(f, "{bits}-bit samples not supported, use 24-bit")
            }
            StageError::AlreadyConfigured => f.write_str("driver already configured"),
        }
    }
}

/// One failed stage with its cause.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupError<E, P> {
    /// The stage that failed.
    pub stage: SetupStage,
    /// What went wrong.
    pub error: StageError<E, P>,
}

impl<E: fmt::Debug, P: fmt::Debug> fmt::Display for SetupError<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "setup stage '{}' failed: {}", self.stage, self.error)
    }
}

/// Per-stage outcome of a setup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport<E, P> {
    outcomes: [Option<StageError<E, P>>; SetupStage::COUNT],
}

impl<E, P> SetupReport<E, P> {
    pub(crate) fn new() -> Self {
        Self {
            outcomes: core::array::from_fn(|_| None),
        }
    }

    pub(crate) fn record(&mut self, stage: SetupStage, error: StageError<E, P>) {
        self.outcomes[stage as usize] = Some(error);
    }

    /// Whether every stage succeeded.
    pub fn is_ok(&self) -> bool {
        self.outcomes.iter().all(Option::is_none)
    }

    /// Aggregate status: a bitmask of failed stages, zero on success.
    pub fn code(&self) -> u32 {
        SetupStage::ALL
            .iter()
            .filter(|stage| self.outcomes[**stage as usize].is_some())
            .fold(0, |code, stage| code | stage.bit())
    }

    /// Whether `stage` failed.
    pub fn failed(&self, stage: SetupStage) -> bool {
        self.outcomes[stage as usize].is_some()
    }

    /// Error recorded for `stage`, if any.
    pub fn error(&self, stage: SetupStage) -> Option<&StageError<E, P>> {
        self.outcomes[stage as usize].as_ref()
    }

    /// Failed stages in execution order.
    pub fn failures(&self) -> impl Iterator<Item = (SetupStage, &StageError<E, P>)> + '_ {
        SetupStage::ALL
            .into_iter()
            .filter_map(move |stage| self.error(stage).map(|e| (stage, e)))
    }

    /// Earliest failed stage.
    pub fn first_failure(&self) -> Option<(SetupStage, &StageError<E, P>)> {
        self.failures().next()
    }

    /// Collapse into a `Result` carrying the earliest failure.
    pub fn into_result(self) -> Result<(), SetupError<E, P>> {
        for (stage, outcome) in SetupStage::ALL.into_iter().zip(self.outcomes) {
            if let Some(error) = outcome {
                return Err(SetupError { stage, error });
            }
        }
        Ok(())
    }
}

/// A failed block transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError<E> {
    /// The driver is not configured.
    NotConfigured,
    /// The peripheral bus reported an error.
    Bus(E),
    /// Fewer bytes than a full block were transferred before the timeout.
    Short {
        /// Bytes in a full block.
        expected: usize,
        /// Bytes actually transferred.
        transferred: usize,
    },
}

impl<E: fmt::Debug> fmt::Display for TransferError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::NotConfigured => f.write_str("driver not configured"),
            TransferError::Bus(e) => write!(f, "bus error: {e:?}"),
            TransferError::Short {
                expected,
                transferred,
            } => write!(f, "short transfer: {transferred} of {expected} bytes"),
        }
    }
}

/// Failure while tearing the driver down. Both steps are always attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TeardownError<E, P> {
    /// Result of powering the codec down.
    pub power: Option<P>,
    /// Result of uninstalling the peripheral.
    pub bus: Option<E>,
}

impl<E: fmt::Debug, P: fmt::Debug> fmt::Display for TeardownError<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("teardown failed")?;
        if let Some(e) = &self.power {
            write!(f, "; power pin: {e:?}")?;
        }
        if let Some(e) = &self.bus {
            write!(f, "; bus: {e:?}")?;
        }
        Ok(())
    }
}
