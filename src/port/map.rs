//! Board SKUs and their port maps
//!
//! Each SKU wires the 26 switch ports differently. The tables here are the
//! board facts: which front port an internal port drives, which MIIM
//! controller or Serdes reaches it, and the PHY address behind it. They are
//! fixed for the life of the device.

use super::media::{MediaKind, PortMask};
use crate::driver::error::{ConfigError, Result};
use crate::hal::mdio::PhyAddr;
use crate::internal::constants::PORT_COUNT;

/// Board variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sku {
    /// 24 copper + 1 SFP
    L25,
    /// 16 ports
    L16,
    /// 8 copper + 2 SFP
    L10,
}

impl Sku {
    /// Variant selected by the crate feature
    #[cfg(feature = "l16")]
    pub const DEFAULT: Self = Self::L16;
    /// Variant selected by the crate feature
    #[cfg(feature = "l10")]
    pub const DEFAULT: Self = Self::L10;
    /// Variant selected by the crate feature
    #[cfg(not(any(feature = "l16", feature = "l10")))]
    pub const DEFAULT: Self = Self::L25;

    /// Expected value of the chip id register (masked)
    pub const fn chip_id(self) -> u32 {
        match self {
            Self::L25 => 0x0742_20E9,
            Self::L16 => 0x0742_10E9,
            Self::L10 => 0x0742_00E9,
        }
    }

    /// Port table for this variant
    ///
    /// `qsgmii` selects the L16 board with external QSGMII PHYs on ports
    /// 12-15; other variants ignore it.
    pub fn table(self, qsgmii: bool) -> &'static PortTable {
        match self {
            Self::L25 => &L25_TABLE,
            Self::L16 if qsgmii => &L16_QSGMII_TABLE,
            Self::L16 => &L16_TABLE,
            Self::L10 => &L10_TABLE,
        }
    }
}

impl Default for Sku {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Static port wiring of one board
#[derive(Debug)]
pub struct PortTable {
    /// Front port (1-based) per internal port, 0 when unused
    int_to_ext: [u8; PORT_COUNT],
    /// Internal port per front port, indexed by front port - 1
    ext_to_int: &'static [u8],
    /// MIIM code per internal port
    miim: [u8; PORT_COUNT],
    /// PHY address per internal port
    phy_no: [u8; PORT_COUNT],
    /// Physical ports
    all_ports: PortMask,
    /// Serdes lane addresses of the SFP ports
    serdes_lanes: &'static [(u8, u32)],
}

impl PortTable {
    /// Number of front ports
    pub fn front_port_count(&self) -> u8 {
        self.ext_to_int.len() as u8
    }

    /// Front port number for an internal port
    pub fn to_ext(&self, port: u8) -> Option<u8> {
        match self.int_to_ext.get(port as usize) {
            Some(0) | None => None,
            Some(ext) => Some(*ext),
        }
    }

    /// Internal port for a 1-based front port
    pub fn to_int(&self, ext: u8) -> Option<u8> {
        let idx = (ext as usize).checked_sub(1)?;
        self.ext_to_int.get(idx).copied()
    }

    /// Internal ports in front port order
    pub fn ports_in_ext_order(&self) -> impl Iterator<Item = u8> + '_ {
        self.ext_to_int.iter().copied()
    }

    /// Media from the board wiring (before any SFP detection)
    pub fn media(&self, port: u8) -> MediaKind {
        self.miim
            .get(port as usize)
            .map_or(MediaKind::Unconnected, |code| MediaKind::from_code(*code))
    }

    /// MDIO address of the copper PHY on `port`
    pub fn phy_addr(&self, port: u8) -> Result<PhyAddr> {
        match self.media(port) {
            MediaKind::Copper { controller } => {
                PhyAddr::new(controller, self.phy_no[port as usize])
            }
            _ => Err(ConfigError::InvalidPort.into()),
        }
    }

    /// Physical port mask
    pub const fn all_ports(&self) -> PortMask {
        self.all_ports
    }

    /// Port is wired on this board
    pub fn is_valid(&self, port: u8) -> bool {
        self.all_ports.contains(port)
    }

    /// Serdes6G lane address driving an SFP port
    pub fn serdes_lane(&self, port: u8) -> Option<u32> {
        self.serdes_lanes
            .iter()
            .find(|(p, _)| *p == port)
            .map(|(_, addr)| *addr)
    }
}

/// Physical port mask of a variant
pub fn all_ports(sku: Sku, qsgmii: bool) -> PortMask {
    sku.table(qsgmii).all_ports
}

// =============================================================================
// Tables
// =============================================================================

static L25_TABLE: PortTable = PortTable {
    int_to_ext: [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 0,
        25,
    ],
    ext_to_int: &[
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 25,
    ],
    miim: [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 7, 0xB,
    ],
    phy_no: [
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 0,
    ],
    all_ports: PortMask::from_bits(0x02FF_FFFF),
    serdes_lanes: &[(25, 0x1)],
};

static L16_TABLE: PortTable = PortTable {
    int_to_ext: [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 0, 0, 0, 0, 13, 0, 0, 14, 0, 0, 0, 0, 15, 16,
    ],
    ext_to_int: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 16, 19, 24, 25],
    miim: [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 7, 7, 7, 7, 1, 7, 7, 1, 7, 7, 7, 7, 1, 1,
    ],
    phy_no: [
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 2, 3,
    ],
    all_ports: PortMask::from_bits(0x0309_0FFF),
    serdes_lanes: &[],
};

static L16_QSGMII_TABLE: PortTable = PortTable {
    int_to_ext: [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    ext_to_int: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    miim: [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7,
    ],
    phy_no: [
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 1, 2, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    all_ports: PortMask::from_bits(0x0000_FFFF),
    serdes_lanes: &[],
};

static L10_TABLE: PortTable = PortTable {
    int_to_ext: [
        1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 9, 10,
    ],
    ext_to_int: &[0, 1, 2, 3, 4, 5, 6, 7, 24, 25],
    miim: [
        0, 0, 0, 0, 0, 0, 0, 0, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 0xB, 0xB,
    ],
    phy_no: [
        0, 1, 2, 3, 4, 5, 6, 7, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    all_ports: PortMask::from_bits(0x0300_00FF),
    serdes_lanes: &[(24, 0x2), (25, 0x1)],
};
