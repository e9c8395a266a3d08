//! General configuration block: chip identity, resets, GPIO, serial GPIO and
//! the two MIIM (MDIO) controllers.

use super::{GCB_BASE, Reg, field};

// =============================================================================
// Chip Registers
// =============================================================================

/// Chip identification
pub const CHIP_ID: Reg = Reg::at(GCB_BASE, 0x000);

/// Chip id bits compared against the SKU (revision masked off)
pub const CHIP_ID_MASK: u32 = 0x0FFF_FFFF;

/// Soft reset control
pub const SOFT_CHIP_RST: Reg = Reg::at(GCB_BASE, 0x002);

/// SOFT_CHIP_RST fields
pub mod soft_chip_rst {
    /// Reset the internal PHYs while set
    pub const SOFT_PHY_RST: u32 = 1 << 1;
    /// Reset the whole chip
    pub const SOFT_CHIP_RST: u32 = 1 << 0;
}

/// Miscellaneous configuration
pub const MISC_CFG: Reg = Reg::at(GCB_BASE, 0x004);

/// MISC_CFG fields
pub mod misc_cfg {
    use super::field;

    /// Serdes/port mux mode mask
    pub const SW_MODE_MASK: u32 = 0x3 << 2;

    /// Serdes/port mux mode (0: 3xQSGMII+2G5+SGMII, 1: 2x2G5+10xSGMII)
    pub const fn sw_mode(v: u32) -> u32 {
        field(v, 2, 2)
    }
}

/// Miscellaneous status
pub const MISC_STAT: Reg = Reg::at(GCB_BASE, 0x005);

/// MISC_STAT fields
pub mod misc_stat {
    /// Internal PHYs are out of reset and ready
    pub const PHY_READY: u32 = 1 << 3;
}

// =============================================================================
// GPIO
// =============================================================================

/// GPIO output set (write 1 to drive high)
pub const GPIO_OUT_SET: Reg = Reg::at(GCB_BASE, 0x010);

/// GPIO output clear (write 1 to drive low)
pub const GPIO_OUT_CLR: Reg = Reg::at(GCB_BASE, 0x011);

/// GPIO output enable
pub const GPIO_OE: Reg = Reg::at(GCB_BASE, 0x013);

/// GPIO interrupt enable
pub const GPIO_INTR_ENA: Reg = Reg::at(GCB_BASE, 0x015);

/// GPIO input levels
pub const GPIO_IN: Reg = Reg::at(GCB_BASE, 0x017);

/// GPIO alternate function select, two planes
pub const fn gpio_alt(plane: u32) -> Reg {
    Reg::at(GCB_BASE, 0x018 + plane)
}

// =============================================================================
// Serial GPIO
// =============================================================================

/// Serial GPIO input data for bit position `bit`
pub const fn sio_input_data(bit: u32) -> Reg {
    Reg::at(GCB_BASE, 0x020 + bit)
}

/// Serial GPIO per-port output configuration
pub const fn sio_port_config(sgpio: u32) -> Reg {
    Reg::at(GCB_BASE, 0x030 + sgpio)
}

/// Width of one output mode field in SIO_PORT_CONFIG
pub const SIO_BIT_WIDTH: u32 = 3;

// =============================================================================
// MIIM Controllers
// =============================================================================

/// Number of MIIM controllers
pub const MIIM_COUNT: u8 = 2;

#[inline(always)]
const fn miim(controller: u8, word: u32) -> Reg {
    Reg::at(GCB_BASE, 0x0A0 + controller as u32 * 9 + word)
}

/// MIIM controller status
pub const fn mii_status(controller: u8) -> Reg {
    miim(controller, 0)
}

/// MIIM command
pub const fn mii_cmd(controller: u8) -> Reg {
    miim(controller, 2)
}

/// MIIM read data
pub const fn mii_data(controller: u8) -> Reg {
    miim(controller, 3)
}

/// MII_STATUS fields
pub mod mii_status {
    /// Controller busy with an operation
    pub const BUSY: u32 = 1 << 3;
    /// Operation pending in the command register
    pub const OPR_PEND: u32 = 1 << 2;
}

/// MII_CMD fields
pub mod mii_cmd {
    use super::field;

    /// Command valid; starts the operation
    pub const VLD: u32 = 1 << 31;
    /// Write operation
    pub const OPR_WRITE: u32 = 1 << 1;
    /// Read operation
    pub const OPR_READ: u32 = 2 << 1;

    /// PHY address
    pub const fn phyad(v: u32) -> u32 {
        field(v, 25, 5)
    }
    /// Register address
    pub const fn regad(v: u32) -> u32 {
        field(v, 20, 5)
    }
    /// Write data
    pub const fn wrdata(v: u32) -> u32 {
        field(v, 4, 16)
    }
}

/// MII_DATA fields
pub mod mii_data {
    /// Read failed (no PHY answered)
    pub const SUCCESS_MASK: u32 = 0x3 << 16;
    /// Read data mask
    pub const DATA_MASK: u32 = 0xFFFF;
}
