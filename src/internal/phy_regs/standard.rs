//! IEEE 802.3 Clause 22 PHY Registers
//!
//! Standard registers used by the copper PHY driver. Vendor registers of the
//! VSC PHY family live in [`super::vsc`].
//!
//! | Register | Name | Use |
//! |----------|------|-----|
//! | 0 | BMCR | reset, power down, aneg restart |
//! | 1 | BMSR | link status |
//! | 2 | PHYIDR1 | OUI check |
//! | 4 | ANAR | 10/100 advertisement |
//! | 5 | ANLPAR | partner pause ability |
//! | 9 | GBCR | 1000BASE-T advertisement |
//! | 13/14 | MMD | Clause 45 indirect access |

// Complete register definitions, not every bit is referenced
#![allow(dead_code)]

/// Standard PHY register addresses
pub mod phy_reg {
    /// Basic Mode Control Register
    pub const BMCR: u8 = 0;
    /// Basic Mode Status Register
    pub const BMSR: u8 = 1;
    /// PHY Identifier 1
    pub const PHYIDR1: u8 = 2;
    /// PHY Identifier 2
    pub const PHYIDR2: u8 = 3;
    /// Auto-Negotiation Advertisement Register
    pub const ANAR: u8 = 4;
    /// Auto-Negotiation Link Partner Ability Register
    pub const ANLPAR: u8 = 5;
    /// 1000BASE-T Control Register
    pub const GBCR: u8 = 9;
    /// MMD Access Control Register
    pub const MMD_CTRL: u8 = 13;
    /// MMD Access Data Register
    pub const MMD_DATA: u8 = 14;
}

/// BMCR bits
pub mod bmcr {
    /// Soft reset, self-clearing
    pub const RESET: u16 = 1 << 15;
    /// Auto-negotiation enable
    pub const AN_ENABLE: u16 = 1 << 12;
    /// Power down
    pub const POWER_DOWN: u16 = 1 << 11;
    /// Restart auto-negotiation, self-clearing
    pub const AN_RESTART: u16 = 1 << 9;
}

/// BMSR bits
pub mod bmsr {
    /// Auto-negotiation complete
    pub const AN_COMPLETE: u16 = 1 << 5;
    /// Link status
    pub const LINK_STATUS: u16 = 1 << 2;
}

/// ANAR values
pub mod anar {
    /// 10/100 full and half duplex plus symmetric and asymmetric pause
    pub const ALL_10_100_PAUSE: u16 = 0x05E1;
}

/// ANLPAR bits
pub mod anlpar {
    /// Partner supports pause frames
    pub const PAUSE: u16 = 1 << 10;
}

/// GBCR values
pub mod gbcr {
    /// Advertise 1000BASE-T full and half duplex
    pub const ADV_1000: u16 = 0x0600;
}

/// MMD access control
pub mod mmd {
    /// Address function
    pub const FUNC_ADDR: u16 = 0x0000;
    /// Data, no post increment
    pub const FUNC_DATA: u16 = 0x4000;
    /// EEE device
    pub const DEV_AN: u8 = 7;
    /// EEE link partner advertisement (7.61)
    pub const EEE_LP_ADV: u16 = 61;
}

/// EEE link partner advertisement bits (7.61)
pub mod eee_adv {
    /// 100BASE-TX EEE
    pub const EEE_100: u16 = 1 << 1;
    /// 1000BASE-T EEE
    pub const EEE_1000: u16 = 1 << 2;
}
