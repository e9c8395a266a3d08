//! Macro control target: Serdes6G analog/digital configuration, the MCB
//! transfer register, PLL5G and RCOMP calibration.
//!
//! Serdes6G configuration registers are a staging area: values are moved to
//! the lane(s) selected in `SERDES6G_ADDR_CFG` with a write one-shot, and
//! loaded back with a read one-shot.

use super::{MACRO_CTRL_BASE, Reg, field, field_mask};

// =============================================================================
// Calibration and PLL
// =============================================================================

/// RCOMP calibration configuration
pub const RCOMP_CFG0: Reg = Reg::at(MACRO_CTRL_BASE, 0x008);

/// RCOMP_CFG0 fields
pub mod rcomp_cfg0 {
    /// Calibration mode 2 select
    pub const MODE_SEL: u32 = 0x3 << 8;
    /// Run calibration
    pub const RUN_CAL: u32 = 1 << 12;
}

/// RCOMP calibration status
pub const RCOMP_STATUS: Reg = Reg::at(MACRO_CTRL_BASE, 0x009);

/// RCOMP_STATUS fields
pub mod rcomp_status {
    /// Calibration running
    pub const BUSY: u32 = 1 << 12;

    /// Calibrated resistor value
    pub const fn rcomp(reg: u32) -> u32 {
        reg & 0xF
    }
}

/// PLL5G configuration 2
pub const PLL5G_CFG2: Reg = Reg::at(MACRO_CTRL_BASE, 0x002);

/// PLL5G configuration 4
pub const PLL5G_CFG4: Reg = Reg::at(MACRO_CTRL_BASE, 0x004);

/// PLL5G status 0
pub const PLL5G_STATUS0: Reg = Reg::at(MACRO_CTRL_BASE, 0x006);

/// PLL5G_STATUS0 fields
pub mod pll5g_status0 {
    /// PLL locked
    pub const LOCK_STATUS: u32 = 1 << 0;
}

// =============================================================================
// MCB Transfer
// =============================================================================

/// Serdes6G lane select and transfer one-shots
pub const SERDES6G_ADDR_CFG: Reg = Reg::at(MACRO_CTRL_BASE, 0x010);

/// SERDES6G_ADDR_CFG fields
pub mod serdes6g_addr_cfg {
    use super::field;

    /// Copy staged configuration to the selected lanes
    pub const WR_ONE_SHOT: u32 = 1 << 31;
    /// Load configuration from the selected lanes
    pub const RD_ONE_SHOT: u32 = 1 << 30;

    /// Lane bitmask
    pub const fn addr(v: u32) -> u32 {
        field(v, 0, 4)
    }
}

// =============================================================================
// Serdes6G Analog Configuration
// =============================================================================

/// Deserializer configuration
pub const SERDES6G_DES_CFG: Reg = Reg::at(MACRO_CTRL_BASE, 0x020);
/// Input buffer configuration
pub const SERDES6G_IB_CFG: Reg = Reg::at(MACRO_CTRL_BASE, 0x021);
/// Input buffer configuration 1
pub const SERDES6G_IB_CFG1: Reg = Reg::at(MACRO_CTRL_BASE, 0x022);
/// Output buffer configuration
pub const SERDES6G_OB_CFG: Reg = Reg::at(MACRO_CTRL_BASE, 0x023);
/// Output buffer configuration 1
pub const SERDES6G_OB_CFG1: Reg = Reg::at(MACRO_CTRL_BASE, 0x024);
/// Lane PLL configuration
pub const SERDES6G_PLL_CFG: Reg = Reg::at(MACRO_CTRL_BASE, 0x027);
/// Common lane configuration
pub const SERDES6G_COMMON_CFG: Reg = Reg::at(MACRO_CTRL_BASE, 0x029);
/// Digital miscellaneous configuration
pub const SERDES6G_MISC_CFG: Reg = Reg::at(MACRO_CTRL_BASE, 0x02C);

/// SERDES6G_DES_CFG fields
pub mod des_cfg {
    use super::{field, field_mask};

    /// Phase control
    pub const fn phs_ctrl(v: u32) -> u32 {
        field(v, 13, 4)
    }
    /// Phase control mask
    pub const PHS_CTRL_MASK: u32 = field_mask(13, 4);
    /// CDR control
    pub const fn mbtr_ctrl(v: u32) -> u32 {
        field(v, 10, 3)
    }
    /// CDR control mask
    pub const MBTR_CTRL_MASK: u32 = field_mask(10, 3);
    /// 100FX clock/data recovery select
    pub const fn cpmd_sel(v: u32) -> u32 {
        field(v, 8, 2)
    }
    /// 100FX CDR select mask
    pub const CPMD_SEL_MASK: u32 = field_mask(8, 2);
    /// Bandwidth hysteresis
    pub const fn bw_hyst(v: u32) -> u32 {
        field(v, 5, 3)
    }
    /// Bandwidth hysteresis mask
    pub const BW_HYST_MASK: u32 = field_mask(5, 3);
    /// Analog bandwidth
    pub const fn bw_ana(v: u32) -> u32 {
        field(v, 1, 3)
    }
    /// Analog bandwidth mask
    pub const BW_ANA_MASK: u32 = field_mask(1, 3);
}

/// SERDES6G_IB_CFG fields
pub mod ib_cfg {
    use super::{field, field_mask};

    /// AC coupling current
    pub const fn ic_ac(v: u32) -> u32 {
        field(v, 28, 4)
    }
    /// AC coupling mask
    pub const IC_AC_MASK: u32 = field_mask(28, 4);
    /// Termination resistor
    pub const fn rt(v: u32) -> u32 {
        field(v, 24, 4)
    }
    /// Termination mask
    pub const RT_MASK: u32 = field_mask(24, 4);
    /// AC bias voltage
    pub const fn vbac(v: u32) -> u32 {
        field(v, 7, 3)
    }
    /// AC bias mask
    pub const VBAC_MASK: u32 = field_mask(7, 3);
    /// Calibrated resistor control
    pub const fn resistor_ctrl(v: u32) -> u32 {
        field(v, 10, 4)
    }
    /// Resistor control mask
    pub const RESISTOR_CTRL_MASK: u32 = field_mask(10, 4);
    /// Common-mode bias voltage
    pub const fn vbcom(v: u32) -> u32 {
        field(v, 4, 3)
    }
    /// Common-mode bias mask
    pub const VBCOM_MASK: u32 = field_mask(4, 3);
    /// Corner frequency
    pub const fn rf(v: u32) -> u32 {
        field(v, 0, 4)
    }
    /// Corner frequency mask
    pub const RF_MASK: u32 = field_mask(0, 4);
}

/// SERDES6G_IB_CFG1 fields
pub mod ib_cfg1 {
    use super::{field, field_mask};

    /// Equalizer capacitance
    pub const fn ib_c(v: u32) -> u32 {
        field(v, 8, 4)
    }
    /// Equalizer capacitance mask
    pub const IB_C_MASK: u32 = field_mask(8, 4);
    /// High corner frequency
    pub const CHF: u32 = 1 << 7;
    /// Common-mode termination
    pub const CTERM_ENA: u32 = 1 << 5;
    /// Disable equalizer
    pub const DIS_EQ: u32 = 1 << 4;
    /// AC offset compensation
    pub const ENA_OFFSAC: u32 = 1 << 3;
    /// DC offset compensation
    pub const ENA_OFFSDC: u32 = 1 << 2;
    /// 100FX input mode
    pub const FX100_ENA: u32 = 1 << 1;
    /// Input buffer reset
    pub const IB_RST: u32 = 1 << 0;
}

/// SERDES6G_OB_CFG fields
pub mod ob_cfg {
    use super::{field, field_mask};

    /// Output polarity
    pub const POL: u32 = 1 << 29;
    /// Post-cursor emphasis
    pub const fn post0(v: u32) -> u32 {
        field(v, 23, 6)
    }
    /// Post-cursor mask
    pub const POST0_MASK: u32 = field_mask(23, 6);
    /// Slew rate high range
    pub const SR_H: u32 = 1 << 8;
    /// 1V output mode
    pub const ENA1V_MODE: u32 = 1 << 9;
    /// Calibrated resistor value field
    pub const fn resistor_ctrl(v: u32) -> u32 {
        field(v, 4, 4)
    }
    /// Resistor field mask
    pub const RESISTOR_CTRL_MASK: u32 = field_mask(4, 4);
    /// Slew rate
    pub const fn sr(v: u32) -> u32 {
        field(v, 0, 4)
    }
    /// Slew rate mask
    pub const SR_MASK: u32 = field_mask(0, 4);
}

/// SERDES6G_OB_CFG1 fields
pub mod ob_cfg1 {
    use super::{field, field_mask};

    /// Output cascode enable
    pub const fn ena_cas(v: u32) -> u32 {
        field(v, 6, 3)
    }
    /// Cascode mask
    pub const ENA_CAS_MASK: u32 = field_mask(6, 3);
    /// Output level
    pub const fn lev(v: u32) -> u32 {
        field(v, 0, 6)
    }
    /// Output level mask
    pub const LEV_MASK: u32 = field_mask(0, 6);
}

/// SERDES6G_PLL_CFG fields
pub mod pll_cfg {
    use super::{field, field_mask};

    /// Rotation enable (2.5G)
    pub const ENA_ROT: u32 = 1 << 18;
    /// PLL state machine control data
    pub const fn fsm_ctrl_data(v: u32) -> u32 {
        field(v, 8, 8)
    }
    /// Control data mask
    pub const FSM_CTRL_DATA_MASK: u32 = field_mask(8, 8);
    /// PLL state machine enable
    pub const FSM_ENA: u32 = 1 << 7;
}

/// SERDES6G_COMMON_CFG fields
pub mod common_cfg {
    use super::{field, field_mask};

    /// System reset (active low: set releases the PLL)
    pub const SYS_RST: u32 = 1 << 31;
    /// Lane enable
    pub const ENA_LANE: u32 = 1 << 18;
    /// Half rate
    pub const HRATE: u32 = 1 << 7;
    /// Quarter rate
    pub const QRATE: u32 = 1 << 6;
    /// Interface mode
    pub const fn if_mode(v: u32) -> u32 {
        field(v, 4, 2)
    }
    /// Interface mode mask
    pub const IF_MODE_MASK: u32 = field_mask(4, 2);
}

/// SERDES6G_MISC_CFG fields
pub mod misc_cfg {
    /// 100FX clock/data recovery enable
    pub const DES_100FX_CPMD_ENA: u32 = 1 << 8;
    /// Lane reset
    pub const LANE_RST: u32 = 1 << 0;
}
