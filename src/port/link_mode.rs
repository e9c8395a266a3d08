//! Link mode encoding
//!
//! A [`LinkMode`] is the one byte every status reader produces and the
//! fabric configurator consumes:
//!
//! | Bits  | Meaning                                        |
//! |-------|------------------------------------------------|
//! | 1:0   | speed: 0 = 10M, 1 = 100M, 2 = 1000M, 3 = 2500M  |
//! | 4     | full duplex                                    |
//! | 5     | link partner supports pause frames             |
//! | 7:6   | EEE: 01 = 100M EEE, 10 = 1000M EEE             |
//!
//! `0xFF` means no link. No valid combination reaches it because both EEE
//! bits are never set together.

use core::fmt;

/// Port speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// 10 Mbps
    Mbps10,
    /// 100 Mbps
    Mbps100,
    /// 1 Gbps
    Mbps1000,
    /// 2.5 Gbps
    Mbps2500,
}

impl Speed {
    /// Logical two-bit speed code
    pub const fn code(self) -> u8 {
        match self {
            Self::Mbps10 => 0,
            Self::Mbps100 => 1,
            Self::Mbps1000 => 2,
            Self::Mbps2500 => 3,
        }
    }

    /// Decode a logical two-bit speed code
    pub const fn from_code(code: u8) -> Self {
        match code & LinkMode::SPEED_MASK {
            0 => Self::Mbps10,
            1 => Self::Mbps100,
            2 => Self::Mbps1000,
            _ => Self::Mbps2500,
        }
    }
}

/// Duplex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Duplex {
    /// Half duplex
    Half,
    /// Full duplex
    Full,
}

/// EEE capability reported by the link partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EeeCapability {
    /// No EEE
    #[default]
    None,
    /// EEE at 100 Mbps
    Eee100,
    /// EEE at 1 Gbps
    Eee1000,
}

/// Encoded link mode of one port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct LinkMode(u8);

impl LinkMode {
    /// Speed field
    pub const SPEED_MASK: u8 = 0x03;
    /// Full duplex flag
    pub const FDX: u8 = 0x10;
    /// Partner pause flag
    pub const PAUSE: u8 = 0x20;
    /// 100M EEE flag
    pub const EEE_100: u8 = 0x40;
    /// 1000M EEE flag
    pub const EEE_1000: u8 = 0x80;
    /// Both EEE flags
    pub const EEE_MASK: u8 = Self::EEE_100 | Self::EEE_1000;
    /// Speed plus duplex
    pub const SPEED_AND_FDX_MASK: u8 = Self::SPEED_MASK | Self::FDX;

    /// No link
    pub const DOWN: Self = Self(0xFF);
    /// 10 Mbps half duplex
    pub const HDX_10: Self = Self(0x00);
    /// 10 Mbps full duplex
    pub const FDX_10: Self = Self(0x10);
    /// 100 Mbps half duplex
    pub const HDX_100: Self = Self(0x01);
    /// 100 Mbps full duplex
    pub const FDX_100: Self = Self(0x11);
    /// 1 Gbps full duplex
    pub const FDX_1000: Self = Self(0x12);
    /// 2.5 Gbps full duplex
    pub const FDX_2500: Self = Self(0x13);

    /// Encode a link that is up
    ///
    /// EEE is dropped under half duplex.
    pub const fn new(speed: Speed, duplex: Duplex, pause: bool, eee: EeeCapability) -> Self {
        let mut bits = speed.code();
        if matches!(duplex, Duplex::Full) {
            bits |= Self::FDX;
            bits |= match eee {
                EeeCapability::None => 0,
                EeeCapability::Eee100 => Self::EEE_100,
                EeeCapability::Eee1000 => Self::EEE_1000,
            };
        }
        if pause {
            bits |= Self::PAUSE;
        }
        Self(bits)
    }

    /// Raw value
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Encoded byte
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// No link
    pub const fn is_down(self) -> bool {
        self.0 == Self::DOWN.0
    }

    /// Link present
    pub const fn is_up(self) -> bool {
        !self.is_down()
    }

    /// Speed, `None` when down
    pub const fn speed(self) -> Option<Speed> {
        if self.is_down() {
            None
        } else {
            Some(Speed::from_code(self.0))
        }
    }

    /// Duplex, `None` when down
    pub const fn duplex(self) -> Option<Duplex> {
        if self.is_down() {
            None
        } else if self.0 & Self::FDX != 0 {
            Some(Duplex::Full)
        } else {
            Some(Duplex::Half)
        }
    }

    /// Full duplex link
    pub const fn is_fdx(self) -> bool {
        self.is_up() && self.0 & Self::FDX != 0
    }

    /// Link partner advertised pause (false when down)
    pub const fn pause(self) -> bool {
        self.is_up() && self.0 & Self::PAUSE != 0
    }

    /// EEE capability, only meaningful on a full duplex link
    pub const fn eee(self) -> EeeCapability {
        if !self.is_fdx() {
            EeeCapability::None
        } else if self.0 & Self::EEE_1000 != 0 {
            EeeCapability::Eee1000
        } else if self.0 & Self::EEE_100 != 0 {
            EeeCapability::Eee100
        } else {
            EeeCapability::None
        }
    }

    /// Speed and duplex bits only
    pub const fn speed_and_fdx(self) -> u8 {
        self.0 & Self::SPEED_AND_FDX_MASK
    }

    /// Same mode with the pause flag set
    pub const fn with_pause(self) -> Self {
        if self.is_down() {
            self
        } else {
            Self(self.0 | Self::PAUSE)
        }
    }

    /// Same mode with an EEE capability (ignored unless full duplex)
    pub const fn with_eee(self, eee: EeeCapability) -> Self {
        if !self.is_fdx() {
            return self;
        }
        let bits = self.0 & !Self::EEE_MASK;
        Self(
            bits | match eee {
                EeeCapability::None => 0,
                EeeCapability::Eee100 => Self::EEE_100,
                EeeCapability::Eee1000 => Self::EEE_1000,
            },
        )
    }

    /// 10 Mbps half duplex, the mode the polarity workaround targets
    pub const fn is_hdx_10(self) -> bool {
        self.is_up() && self.speed_and_fdx() == Self::HDX_10.0
    }

    /// Half duplex at 10 or 100 Mbps
    pub const fn is_hdx(self) -> bool {
        self.is_up() && self.0 & Self::FDX == 0
    }

    /// Gigabit MAC mode (1G or 2.5G full duplex)
    pub const fn is_giga(self) -> bool {
        let sf = self.speed_and_fdx();
        self.is_up() && (sf == Self::FDX_1000.0 || sf == Self::FDX_2500.0)
    }

    /// LINK_SPEED field for the port clock register
    ///
    /// 2.5G shares the 1G clock setting.
    pub const fn clock_link_speed(self) -> u32 {
        match self.0 & Self::SPEED_MASK {
            3 => 1,
            s => 3 - s as u32,
        }
    }
}

impl Default for LinkMode {
    fn default() -> Self {
        Self::DOWN
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(speed), Some(duplex)) = (self.speed(), self.duplex()) else {
            return f.write_str("down");
        };
        let speed = match speed {
            Speed::Mbps10 => "10",
            Speed::Mbps100 => "100",
            Speed::Mbps1000 => "1000",
            Speed::Mbps2500 => "2500",
        };
        let duplex = match duplex {
            Duplex::Full => "FDX",
            Duplex::Half => "HDX",
        };
        write!(f, "{speed}{duplex}")?;
        if self.pause() {
            f.write_str(" pause")?;
        }
        match self.eee() {
            EeeCapability::None => Ok(()),
            EeeCapability::Eee100 => f.write_str(" eee100"),
            EeeCapability::Eee1000 => f.write_str(" eee1000"),
        }
    }
}
