//! Port device registers (MAC, port clocking, PCS1G, 100FX PCS)
//!
//! Ports 0-9 are GMII devices whose `CLOCK_CFG` uses the [`gmii_clock`]
//! layout; higher ports use the full [`clock`] layout with PCS resets and a
//! link speed field.

use super::{DEV_BASE, DEV_STRIDE, Reg, field};

#[inline(always)]
const fn dev(port: u8, word: u32) -> Reg {
    Reg::at(DEV_BASE + port as u32 * DEV_STRIDE, word)
}

// =============================================================================
// Port Mode
// =============================================================================

/// Port clock and reset control
pub const fn clock_cfg(port: u8) -> Reg {
    dev(port, 0x00)
}

/// CLOCK_CFG fields for ports 10 and up
pub mod clock {
    /// MAC transmit clock domain reset
    pub const MAC_TX_RST: u32 = 1 << 7;
    /// MAC receive clock domain reset
    pub const MAC_RX_RST: u32 = 1 << 6;
    /// PCS transmit clock domain reset
    pub const PCS_TX_RST: u32 = 1 << 5;
    /// PCS receive clock domain reset
    pub const PCS_RX_RST: u32 = 1 << 4;
    /// Whole-port reset
    pub const PORT_RST: u32 = 1 << 3;
    /// External PHY interface reset
    pub const PHY_RST: u32 = 1 << 2;
    /// Link speed field mask
    pub const LINK_SPEED_MASK: u32 = 0x3;

    /// Link speed selector (3 = 10M, 2 = 100M, 1 = 1G/2.5G, 0 = off)
    pub const fn link_speed(v: u32) -> u32 {
        v & LINK_SPEED_MASK
    }
}

/// CLOCK_CFG fields for GMII ports 0-9
pub mod gmii_clock {
    /// MAC transmit clock domain reset
    pub const MAC_TX_RST: u32 = 1 << 3;
    /// MAC receive clock domain reset
    pub const MAC_RX_RST: u32 = 1 << 2;
    /// Whole-port reset
    pub const PORT_RST: u32 = 1 << 1;
}

// =============================================================================
// MAC Configuration
// =============================================================================

/// MAC enable
pub const fn mac_ena_cfg(port: u8) -> Reg {
    dev(port, 0x02)
}

/// MAC_ENA_CFG fields
pub mod mac_ena {
    /// Receiver enable
    pub const RX_ENA: u32 = 1 << 4;
    /// Transmitter enable
    pub const TX_ENA: u32 = 1 << 0;
}

/// MAC speed/duplex mode
pub const fn mac_mode_cfg(port: u8) -> Reg {
    dev(port, 0x03)
}

/// MAC_MODE_CFG fields
pub mod mac_mode {
    /// Gigabit mode (1G and 2.5G)
    pub const GIGA_MODE_ENA: u32 = 1 << 4;
    /// Full duplex
    pub const FDX_ENA: u32 = 1 << 0;
}

/// Maximum accepted frame length
pub const fn mac_maxlen_cfg(port: u8) -> Reg {
    dev(port, 0x04)
}

/// Inter-frame gap timing
pub const fn mac_ifg_cfg(port: u8) -> Reg {
    dev(port, 0x06)
}

/// MAC_IFG_CFG fields
pub mod mac_ifg {
    use super::field;

    /// Transmit inter-frame gap
    pub const fn tx_ifg(v: u32) -> u32 {
        field(v, 8, 5)
    }
    /// First part of the half-duplex receive gap
    pub const fn rx_ifg1(v: u32) -> u32 {
        field(v, 0, 4)
    }
    /// Second part of the half-duplex receive gap
    pub const fn rx_ifg2(v: u32) -> u32 {
        field(v, 4, 4)
    }
}

/// Half-duplex configuration
pub const fn mac_hdx_cfg(port: u8) -> Reg {
    dev(port, 0x07)
}

/// MAC_HDX_CFG fields
pub mod mac_hdx {
    use super::field;

    /// Backoff seed field mask
    pub const SEED_MASK: u32 = 0xFF << 16;
    /// Load the backoff seed
    pub const SEED_LOAD: u32 = 1 << 12;
    /// Retransmit after excessive collisions instead of dropping
    pub const RETRY_AFTER_EXC_COL_ENA: u32 = 1 << 8;
    /// Late collision position mask
    pub const LATE_COL_POS_MASK: u32 = 0x7F;

    /// Random backoff seed
    pub const fn seed(v: u32) -> u32 {
        field(v, 16, 8)
    }
    /// Late collision position in bytes
    pub const fn late_col_pos(v: u32) -> u32 {
        field(v, 0, 7)
    }
}

/// Pause frame generation and reception
pub const fn mac_fc_cfg(port: u8) -> Reg {
    dev(port, 0x09)
}

/// MAC_FC_CFG fields
pub mod mac_fc {
    use super::field;

    /// Send zero-quanta pause when the watermark clears
    pub const ZERO_PAUSE_ENA: u32 = 1 << 18;
    /// Transmit pause frames
    pub const TX_FC_ENA: u32 = 1 << 17;
    /// Obey received pause frames
    pub const RX_FC_ENA: u32 = 1 << 16;

    /// Pause quanta sent in pause frames
    pub const fn pause_val(v: u32) -> u32 {
        field(v, 0, 16)
    }
    /// Flow control reaction latency
    pub const fn fc_latency(v: u32) -> u32 {
        field(v, 19, 6)
    }
}

/// Pause frame source MAC, upper three bytes
pub const fn mac_fc_mac_high_cfg(port: u8) -> Reg {
    dev(port, 0x0A)
}

/// Pause frame source MAC, lower three bytes
pub const fn mac_fc_mac_low_cfg(port: u8) -> Reg {
    dev(port, 0x0B)
}

// =============================================================================
// PCS1G
// =============================================================================

/// PCS1G enable
pub const fn pcs1g_cfg(port: u8) -> Reg {
    dev(port, 0x10)
}

/// PCS1G_CFG fields
pub mod pcs1g {
    /// PCS enable
    pub const PCS_ENA: u32 = 1 << 0;
}

/// PCS1G mode (SGMII vs 1000Base-X)
pub const fn pcs1g_mode_cfg(port: u8) -> Reg {
    dev(port, 0x11)
}

/// PCS1G_MODE_CFG fields
pub mod pcs1g_mode {
    /// SGMII mode
    pub const SGMII_MODE_ENA: u32 = 1 << 0;
}

/// PCS1G signal detect
pub const fn pcs1g_sd_cfg(port: u8) -> Reg {
    dev(port, 0x12)
}

/// PCS1G_SD_CFG fields
pub mod pcs1g_sd {
    /// Signal detect select
    pub const SD_SEL: u32 = 1 << 8;
    /// Signal detect polarity
    pub const SD_POL: u32 = 1 << 4;
    /// Signal detect enable
    pub const SD_ENA: u32 = 1 << 0;
}

/// PCS1G clause 37 auto-negotiation control
pub const fn pcs1g_aneg_cfg(port: u8) -> Reg {
    dev(port, 0x13)
}

/// PCS1G_ANEG_CFG fields
pub mod pcs1g_aneg {
    /// Resolve the negotiation result in software
    pub const SW_RESOLVE_ENA: u32 = 1 << 8;
    /// Advertised ability plus restart and enable bits
    pub const CONTROL_MASK: u32 = 0xFFFF_0003;
    /// SGMII: link partner acknowledge, restart, enable
    pub const CONTROL_SGMII: u32 = 0x0001_0003;
    /// 1000Base-X: FDX + symmetric pause, restart, enable
    pub const CONTROL_1000BASEX: u32 = 0x00A0_0003;
}

/// PCS1G auto-negotiation status
pub const fn pcs1g_aneg_status(port: u8) -> Reg {
    dev(port, 0x18)
}

/// PCS1G_ANEG_STATUS fields
pub mod pcs1g_aneg_status {
    /// Page received
    pub const PR: u32 = 1 << 4;
    /// Auto-negotiation complete
    pub const ANEG_COMPLETE: u32 = 1 << 0;

    /// Link partner advertised ability word
    pub const fn lp_adv_ability(reg: u32) -> u32 {
        reg >> 16
    }
}

/// PCS1G link status
pub const fn pcs1g_link_status(port: u8) -> Reg {
    dev(port, 0x1A)
}

/// PCS1G_LINK_STATUS fields
pub mod pcs1g_link {
    /// Link up
    pub const LINK_STATUS: u32 = 1 << 4;
    /// Synchronized
    pub const SYNC_STATUS: u32 = 1 << 0;
}

/// PCS1G sticky bits, cleared by writing 1
pub const fn pcs1g_sticky(port: u8) -> Reg {
    dev(port, 0x1C)
}

/// PCS1G_STICKY fields
pub mod pcs1g_sticky {
    /// Link went down since last clear
    pub const LINK_DOWN_STICKY: u32 = 1 << 4;
    /// Sync was lost since last clear
    pub const OUT_OF_SYNC_STICKY: u32 = 1 << 0;
}

// =============================================================================
// 100FX PCS
// =============================================================================

/// 100Base-FX PCS configuration
pub const fn pcs_fx100_cfg(port: u8) -> Reg {
    dev(port, 0x30)
}

/// PCS_FX100_CFG fields
pub mod fx100_cfg {
    /// Signal detect select
    pub const SD_SEL: u32 = 1 << 26;
    /// Signal detect polarity
    pub const SD_POL: u32 = 1 << 25;
    /// Signal detect enable
    pub const SD_ENA: u32 = 1 << 24;
    /// PCS enable
    pub const PCS_ENA: u32 = 1 << 0;
}

/// 100Base-FX PCS status, sticky bits cleared by writing 1
pub const fn pcs_fx100_status(port: u8) -> Reg {
    dev(port, 0x31)
}

/// PCS_FX100_STATUS fields
pub mod fx100_status {
    /// Sync lost since last clear
    pub const SYNC_LOST_STICKY: u32 = 1 << 11;
    /// Start-of-stream delimiter error since last clear
    pub const SSD_ERROR_STICKY: u32 = 1 << 10;
    /// Far-end fault found since last clear
    pub const FEF_FOUND_STICKY: u32 = 1 << 9;
    /// Coding error since last clear
    pub const PCS_ERROR_STICKY: u32 = 1 << 8;
    /// Synchronized
    pub const SYNC_STATUS: u32 = 1 << 0;
    /// All sticky error bits
    pub const STICKY_MASK: u32 =
        SYNC_LOST_STICKY | SSD_ERROR_STICKY | FEF_FOUND_STICKY | PCS_ERROR_STICKY;
}
