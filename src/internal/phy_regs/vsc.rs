//! VSC PHY Family Vendor Registers
//!
//! Registers 16-31 of the internal 12-port PHY block and the matching
//! external PHYs. Register 31 selects the page: standard, general purpose
//! (GPIO) or the test page holding the polarity override.

/// Vendor register addresses
pub mod vsc_reg {
    /// Extended control 1 (standard page)
    pub const EXT_CTRL: u8 = 18;
    /// Auxiliary control and status (standard page)
    pub const AUX_STATUS: u8 = 28;
    /// Page select
    pub const PAGE: u8 = 31;

    /// GPIO control 1 (GP page)
    pub const GP_GPIO_CTRL: u8 = 13;
    /// GPIO input (GP page)
    pub const GP_GPIO_IN: u8 = 15;
    /// GPIO direction (GP page)
    pub const GP_GPIO_DIR: u8 = 17;

    /// Polarity override (test page)
    pub const TEST_POLARITY: u8 = 5;
    /// Polarity detection control (standard page)
    pub const POLARITY_CTRL: u8 = 0x12;
}

/// Page numbers written to register 31
pub mod page {
    /// Standard registers
    pub const STD: u16 = 0x0000;
    /// General purpose registers
    pub const GP: u16 = 0x0010;
    /// Test registers
    pub const TEST: u16 = 0x2A30;
}

/// Extended control 1 bits
pub mod ext_ctrl {
    /// Enable link-speed auto-downshift
    pub const SPEED_DOWNSHIFT: u16 = 1 << 6;
}

/// Auxiliary status fields
pub mod aux_status {
    /// Full duplex
    pub const FDX: u16 = 1 << 5;
    /// Raw speed field, bits [4:3]
    pub const SPEED_SHIFT: u16 = 3;
    /// Raw speed field mask (after shift)
    pub const SPEED_MASK: u16 = 0x3;
    /// MDI polarity inverted (bits [11:10])
    pub const POL_INVERSE: u16 = 0x0C00;
}

/// Test page polarity override
pub mod polarity {
    /// Override field mask, bits [2:1]
    pub const MASK: u16 = 0x0006;
    /// Force inverted polarity
    pub const FORCE_INVERTED: u16 = 0x0006;
    /// Force normal polarity
    pub const FORCE_NORMAL: u16 = 0x0004;
    /// Release the override
    pub const AUTO: u16 = 0x0000;
    /// Disable automatic polarity detection (register 0x12)
    pub const DETECT_DISABLE: u16 = 1 << 4;
}

/// GP page SFP signal wiring on the port-12 PHY
pub mod sfp_gpio {
    /// GPIO 2-7 under GPIO function control
    pub const CTRL_GPIO_FUNC: u16 = 0x00FC;
    /// GPIO 4 output, GPIO 2-3 input
    pub const DIR_VALUE: u16 = 0x0010;
    /// Direction bits for GPIO 2-4
    pub const DIR_MASK: u16 = 0x001C;
    /// Module absent (active low presence on GPIO 1 input bit)
    pub const MODULE_ABSENT: u16 = 1 << 1;
}

/// Expected PHYIDR1 value of the VSC family
pub const PHY_OUI_MSB: u16 = 0x000F;
