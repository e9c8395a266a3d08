//! Port media kinds and port bit masks

use crate::internal::constants::PORT_COUNT;
use crate::serdes::Serdes6gMode;

/// What sits behind a switch port
///
/// Board tables store this as a MIIM code; SFP ports change it at runtime
/// when a module is identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MediaKind {
    /// Copper PHY reached over the given MIIM controller
    Copper {
        /// MIIM controller (0 or 1)
        controller: u8,
    },
    /// SGMII to an external PHY or copper SFP
    Sgmii,
    /// 1000Base-X fiber Serdes
    Serdes1000BaseX,
    /// 2.5G Serdes
    Serdes2G5,
    /// 100Base-FX fiber
    Fiber100Fx,
    /// SFP cage, media decided by module detection
    SfpAuto,
    /// Nothing connected
    Unconnected,
}

impl MediaKind {
    /// Decode a board-table MIIM code
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 | 1 => Self::Copper { controller: code },
            2 => Self::Sgmii,
            8 => Self::Fiber100Fx,
            9 => Self::Serdes1000BaseX,
            0xA => Self::SfpAuto,
            0xB => Self::Serdes2G5,
            _ => Self::Unconnected,
        }
    }

    /// MIIM code of this kind
    pub const fn code(self) -> u8 {
        match self {
            Self::Copper { controller } => controller,
            Self::Sgmii => 2,
            Self::Unconnected => 7,
            Self::Fiber100Fx => 8,
            Self::Serdes1000BaseX => 9,
            Self::SfpAuto => 0xA,
            Self::Serdes2G5 => 0xB,
        }
    }

    /// Port driven through a copper PHY
    pub const fn is_copper(self) -> bool {
        matches!(self, Self::Copper { .. })
    }

    /// Port driven through a Serdes lane and the PCS
    pub const fn is_serdes(self) -> bool {
        matches!(
            self,
            Self::Sgmii
                | Self::Serdes1000BaseX
                | Self::Serdes2G5
                | Self::Fiber100Fx
                | Self::SfpAuto
        )
    }

    /// Serdes macro mode used for this media
    ///
    /// Undetected SFP cages run as 1000Base-X.
    pub const fn serdes_mode(self) -> Serdes6gMode {
        match self {
            Self::Serdes2G5 => Serdes6gMode::Base2G5,
            Self::Sgmii => Serdes6gMode::Sgmii,
            Self::Fiber100Fx => Serdes6gMode::Fx100,
            _ => Serdes6gMode::Base1000X,
        }
    }

    /// Media whose link is negotiated with clause 37
    pub const fn uses_clause37(self) -> bool {
        matches!(self, Self::Sgmii | Self::Serdes1000BaseX)
    }
}

/// One bit per internal port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct PortMask(u32);

impl PortMask {
    /// No ports
    pub const EMPTY: Self = Self(0);

    /// Every internal port
    pub const ALL: Self = Self((1 << PORT_COUNT) - 1);

    /// Wrap raw bits
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Mask with a single port
    pub const fn single(port: u8) -> Self {
        if (port as usize) < 32 {
            Self(1 << port)
        } else {
            Self::EMPTY
        }
    }

    /// Port bit set
    pub const fn contains(self, port: u8) -> bool {
        (port as usize) < 32 && self.0 & (1 << port) != 0
    }

    /// Set or clear one port
    pub fn set(&mut self, port: u8, value: bool) {
        if value {
            self.0 |= Self::single(port).0;
        } else {
            self.0 &= !Self::single(port).0;
        }
    }

    /// Mask without `port`
    #[must_use]
    pub const fn without(self, port: u8) -> Self {
        Self(self.0 & !Self::single(port).0)
    }

    /// Intersection
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// No bits set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of ports in the mask
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Ports in ascending order
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..PORT_COUNT as u8).filter(move |p| self.contains(*p))
    }
}
