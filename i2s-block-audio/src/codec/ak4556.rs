//! AKM AK4556 operating-mode table.
//!
//! The AK4556 has no control port: its mode is strapped by the CKS3..CKS0
//! pins. The mode fixes the serial format, whether the codec or the MCU
//! masters the clocks, the ADC high-pass filter, and which MCLK/fs ratios
//! are legal at a given speed.
//!
//! | Mode | CKS3..0 | HPF | Role   | MCLK    | Format |
//! |------|---------|-----|--------|---------|--------|
//! | 0    | LLLL    | on  | slave  | class 1 | LJ/RJ  |
//! | 1    | LLLH    | on  | slave  | class 2 | LJ/RJ  |
//! | 2    | LLHL    | off | slave  | class 1 | LJ/RJ  |
//! | 3    | LLHH    | off | slave  | class 2 | LJ/RJ  |
//! | 4    | LHLL    | on  | slave  | class 1 | I2S    |
//! | 5    | LHLH    | on  | slave  | class 2 | I2S    |
//! | 6    | LHHL    | off | slave  | class 1 | I2S    |
//! | 7    | LHHH    | off | slave  | class 2 | I2S    |
//! | 8    | HLLL    | on  | slave  | class 1 | LJ     |
//! | 9    | HLLH    | on  | slave  | class 2 | LJ     |
//! | 10   | HLHL    | off | slave  | class 1 | LJ     |
//! | 11   | HLHH    | off | slave  | class 2 | LJ     |
//! | 12   | HHLL    | on  | master | 256 fs  | I2S    |
//! | 13   | HHLH    | on  | master | 512 fs  | I2S    |
//! | 14   | HHHL    | on  | master | 128 fs  | I2S    |
//! | 15   | HHHH    | on  | master | 256 fs  | I2S    |
//!
//! Class 1: 128/192 fs at quad speed, 256/384 fs at double speed,
//! 512/768 fs at normal speed. Class 2: 256/384/512/768 fs, normal speed only.

use crate::config::{ClockRole, CommFormat, DriverConfig};

/// Sample-rate band of the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedMode {
    /// Up to 48 kHz.
    Normal,
    /// Up to 96 kHz.
    Double,
    /// Up to 192 kHz.
    Quad,
}

impl SpeedMode {
    /// Band for `sample_rate`, or `None` above 192 kHz.
    pub const fn from_sample_rate(sample_rate: u32) -> Option<Self> {
        match sample_rate {
            0..=48_000 => Some(SpeedMode::Normal),
            48_001..=96_000 => Some(SpeedMode::Double),
            96_001..=192_000 => Some(SpeedMode::Quad),
            _ => None,
        }
    }
}

/// Serial format selected by the mode pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialFormat {
    /// Left- or right-justified, chosen by a separate pin.
    LeftOrRightJustified,
    /// Philips I2S.
    I2s,
    /// Left-justified.
    LeftJustified,
}

/// MCLK requirement of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MclkRequirement {
    /// Slave, speed-dependent ratios.
    Class1,
    /// Slave, normal speed only.
    Class2,
    /// Master with one fixed ratio.
    Fixed(u32),
}

const CLASS1_NORMAL: &[u32] = &[512, 768];
const CLASS1_DOUBLE: &[u32] = &[256, 384];
const CLASS1_QUAD: &[u32] = &[128, 192];
const CLASS2_NORMAL: &[u32] = &[256, 384, 512, 768];

/// One of the 16 strapped operating modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ak4556Mode(u8);

impl Ak4556Mode {
    /// Mode from its number, `0..=15`.
    pub const fn new(mode: u8) -> Option<Self> {
        if mode < 16 {
            Some(Ak4556Mode(mode))
        } else {
            None
        }
    }

    /// Mode from the CKS pin levels, `[CKS3, CKS2, CKS1, CKS0]`, `true` = high.
    pub const fn from_cks_pins(pins: [bool; 4]) -> Self {
        Ak4556Mode(
            (pins[0] as u8) << 3 | (pins[1] as u8) << 2 | (pins[2] as u8) << 1 | pins[3] as u8,
        )
    }

    /// Mode number.
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Pin levels to strap, `[CKS3, CKS2, CKS1, CKS0]`.
    pub const fn cks_pins(self) -> [bool; 4] {
        [
            self.0 & 0b1000 != 0,
            self.0 & 0b0100 != 0,
            self.0 & 0b0010 != 0,
            self.0 & 0b0001 != 0,
        ]
    }

    /// Whether the codec generates the serial clocks.
    pub const fn codec_role(self) -> ClockRole {
        if self.0 >= 12 {
            ClockRole::Master
        } else {
            ClockRole::Slave
        }
    }

    /// Clock role the MCU peripheral must take.
    pub const fn mcu_role(self) -> ClockRole {
        match self.codec_role() {
            ClockRole::Master => ClockRole::Slave,
            ClockRole::Slave => ClockRole::Master,
        }
    }

    /// Whether the ADC high-pass filter is on.
    pub const fn high_pass_filter(self) -> bool {
        self.0 >= 12 || self.0 & 0b0010 == 0
    }

    /// Serial format.
    pub const fn format(self) -> SerialFormat {
        match self.0 >> 2 {
            0 => SerialFormat::LeftOrRightJustified,
            1 | 3 => SerialFormat::I2s,
            _ => SerialFormat::LeftJustified,
        }
    }

    /// MCLK requirement.
    pub const fn mclk_requirement(self) -> MclkRequirement {
        match self.0 {
            12 | 15 => MclkRequirement::Fixed(256),
            13 => MclkRequirement::Fixed(512),
            14 => MclkRequirement::Fixed(128),
            n if n & 1 == 0 => MclkRequirement::Class1,
            _ => MclkRequirement::Class2,
        }
    }

    /// Legal MCLK/fs ratios at `speed`. Empty when the mode cannot run there.
    pub fn supported_mclk_multiples(self, speed: SpeedMode) -> &'static [u32] {
        match (self.mclk_requirement(), speed) {
            (MclkRequirement::Fixed(256), _) => &[256],
            (MclkRequirement::Fixed(512), _) => &[512],
            (MclkRequirement::Fixed(128), _) => &[128],
            (MclkRequirement::Fixed(_), _) => &[],
            (MclkRequirement::Class1, SpeedMode::Normal) => CLASS1_NORMAL,
            (MclkRequirement::Class1, SpeedMode::Double) => CLASS1_DOUBLE,
            (MclkRequirement::Class1, SpeedMode::Quad) => CLASS1_QUAD,
            (MclkRequirement::Class2, SpeedMode::Normal) => CLASS2_NORMAL,
            (MclkRequirement::Class2, _) => &[],
        }
    }

    /// Whether `multiple` is legal at `sample_rate`.
    pub fn supports(self, sample_rate: u32, multiple: u32) -> bool {
        SpeedMode::from_sample_rate(sample_rate)
            .map(|speed| self.supported_mclk_multiples(speed).contains(&multiple))
            .unwrap_or(false)
    }

    /// Pick an MCLK/fs ratio: `preferred` if legal, else the first legal one.
    pub fn mclk_multiple(self, sample_rate: u32, preferred: u32) -> Option<u32> {
        let speed = SpeedMode::from_sample_rate(sample_rate)?;
        let table = self.supported_mclk_multiples(speed);
        if table.contains(&preferred) {
            Some(preferred)
        } else {
            table.first().copied()
        }
    }

    /// Adapt `config` to this mode: MCU clock role, framing and MCLK ratio.
    ///
    /// The AK4556 has no oscillator, so MCLK output stays on in every mode;
    /// in master modes the codec only derives BCLK/LRCK from it.
    ///
    /// The configured `mclk_multiple` is kept when the mode allows it.
    /// Returns `None` when the mode cannot run at the configured sample rate.
    pub fn apply(self, config: DriverConfig) -> Option<DriverConfig> {
        let multiple = self.mclk_multiple(config.sample_rate, config.mclk_multiple)?;
        let mut config = config
            .with_clock_role(self.mcu_role())
            .with_mclk_multiple(multiple)
            .with_mclk_output(true);
        config.comm_format = match self.format() {
            SerialFormat::I2s => CommFormat::I2sMsb,
            SerialFormat::LeftJustified | SerialFormat::LeftOrRightJustified => {
                CommFormat::LeftJustified
            }
        };
        Some(config)
    }
}
