//! Analyzer target: MAC table access, aging, port group masks and CPU
//! redirection.

use super::{ANA_BASE, Reg, field};

/// Automatic aging period
pub const AUTOAGE: Reg = Reg::at(ANA_BASE, 0x000);

/// AUTOAGE fields
pub mod autoage {
    use super::field;

    /// Seconds between aging passes
    pub const fn age_period(v: u32) -> u32 {
        field(v, 8, 20)
    }
}

/// Selective aging filter
pub const ANAGEFIL: Reg = Reg::at(ANA_BASE, 0x001);

/// ANAGEFIL fields
pub mod anagefil {
    use super::field;

    /// Only age entries for the port group in PID_VAL
    pub const PID_EN: u32 = 1 << 18;
    /// Only age entries for the VLAN in VID_VAL
    pub const VID_EN: u32 = 1 << 17;

    /// Port group to age
    pub const fn pid_val(v: u32) -> u32 {
        field(v, 12, 5)
    }
    /// VLAN to age
    pub const fn vid_val(v: u32) -> u32 {
        field(v, 0, 12)
    }
}

/// Learned entries moved between ports
pub const ANMOVED: Reg = Reg::at(ANA_BASE, 0x010);

/// MAC table command and status
pub const MACACCESS: Reg = Reg::at(ANA_BASE, 0x011);

/// MACACCESS fields
pub mod macaccess {
    use super::field;

    /// Command field mask
    pub const CMD_MASK: u32 = 0x7;

    /// MAC table command
    pub const fn cmd(v: u32) -> u32 {
        field(v, 0, 3)
    }
}

/// Start of destination masks in the PGID table
pub const PGID_DEST_START: u32 = 0;

/// Start of aggregation masks in the PGID table
pub const PGID_AGGR_START: u32 = 64;

/// Start of per-port source masks in the PGID table
pub const PGID_SOURCE_START: u32 = 80;

/// Port group id mask entry
pub const fn pgid(index: u32) -> Reg {
    Reg::at(ANA_BASE, 0x100 + index)
}

// =============================================================================
// CPU Queues
// =============================================================================

/// CPU queue of each frame class
pub const CPUQ_CFG: Reg = Reg::at(ANA_BASE, 0x020);

/// CPUQ_CFG fields, one 3-bit queue number each
pub mod cpuq_cfg {
    use super::field;

    /// MLD frames
    pub const fn mld(q: u32) -> u32 {
        field(q, 27, 3)
    }
    /// IGMP frames
    pub const fn igmp(q: u32) -> u32 {
        field(q, 24, 3)
    }
    /// IP multicast control frames
    pub const fn ipmc_ctrl(q: u32) -> u32 {
        field(q, 21, 3)
    }
    /// All-bridge address frames
    pub const fn allbridge(q: u32) -> u32 {
        field(q, 18, 3)
    }
    /// Frames moving a locked entry
    pub const fn locked_portmove(q: u32) -> u32 {
        field(q, 15, 3)
    }
    /// Source address copies
    pub const fn src_copy(q: u32) -> u32 {
        field(q, 12, 3)
    }
    /// Destination address copies
    pub const fn mac_copy(q: u32) -> u32 {
        field(q, 9, 3)
    }
    /// Learn frames
    pub const fn lrn(q: u32) -> u32 {
        field(q, 6, 3)
    }
    /// Mirrored frames
    pub const fn mirror(q: u32) -> u32 {
        field(q, 3, 3)
    }
    /// sFlow samples
    pub const fn sflow(q: u32) -> u32 {
        field(q, 0, 3)
    }
}

/// Number of reserved 802.1 addresses with a queue entry
pub const CPUQ_8021_COUNT: u32 = 16;

/// CPU queues of the reserved address 01-80-C2-00-00-0x / -2x
pub const fn cpuq_8021_cfg(index: u32) -> Reg {
    Reg::at(ANA_BASE, 0x030 + index)
}

/// CPUQ_8021_CFG fields
pub mod cpuq_8021_cfg {
    use super::field;

    /// Queue of BPDU addresses
    pub const fn bpdu_val(q: u32) -> u32 {
        field(q, 8, 3)
    }
    /// Mask of [`bpdu_val`]
    pub const BPDU_VAL_MASK: u32 = 0x7 << 8;
    /// Queue of GARP addresses
    pub const fn garp_val(q: u32) -> u32 {
        field(q, 4, 3)
    }
    /// Queue of CCM addresses
    pub const fn ccm_val(q: u32) -> u32 {
        field(q, 0, 3)
    }
}

// =============================================================================
// Per-Port Analyzer
// =============================================================================

const fn port_reg(port: u8, word: u32) -> Reg {
    Reg::at(ANA_BASE, 0x200 + port as u32 * 0x10 + word)
}

/// Per-port VLAN classification
pub const fn port_vlan_cfg(port: u8) -> Reg {
    port_reg(port, 0)
}

/// PORT_VLAN_CFG fields
pub mod port_vlan_cfg {
    use super::field;

    /// Classify on the outer tag
    pub const VLAN_AWARE_ENA: u32 = 1 << 20;

    /// Tags popped on ingress
    pub const fn vlan_pop_cnt(v: u32) -> u32 {
        field(v, 18, 2)
    }
    /// Port VLAN
    pub const fn vlan_vid(v: u32) -> u32 {
        field(v, 0, 12)
    }
}

/// Per-port analyzer options
pub const fn port_cfg(port: u8) -> Reg {
    port_reg(port, 1)
}

/// PORT_CFG fields
pub mod port_cfg {
    /// Learn source addresses
    pub const LEARN_ENA: u32 = 1 << 7;
    /// Accept frames from the port
    pub const RECV_ENA: u32 = 1 << 6;
}

/// Per-port CPU redirection of control frames
pub const fn cpu_fwd_cfg(port: u8) -> Reg {
    port_reg(port, 2)
}

/// CPU_FWD_CFG fields
pub mod cpu_fwd_cfg {
    /// Redirect all-bridge address frames
    pub const CPU_ALLBRIDGE_REDIR_ENA: u32 = 1 << 4;
    /// Copy IP multicast control frames
    pub const CPU_IPMC_CTRL_COPY_ENA: u32 = 1 << 3;
    /// Redirect IGMP frames
    pub const CPU_IGMP_REDIR_ENA: u32 = 1 << 2;
    /// Redirect MLD frames
    pub const CPU_MLD_REDIR_ENA: u32 = 1 << 1;
}

/// Per-port CPU redirection of 01-80-C2-00-00-0x, one bit per address
pub const fn cpu_fwd_bpdu_cfg(port: u8) -> Reg {
    port_reg(port, 3)
}

/// CPU_FWD_BPDU_CFG fields
pub mod cpu_fwd_bpdu_cfg {
    /// Redirect every BPDU address
    pub const BPDU_REDIR_MASK: u32 = 0xFFFF;
}

/// Per-port CPU redirection of 01-80-C2-00-00-2x, one bit per address
pub const fn cpu_fwd_garp_cfg(port: u8) -> Reg {
    port_reg(port, 4)
}
