//! System target registers: switch core enable, per-port queue modes,
//! buffer reservation watermarks, pause/ATOP configuration and the
//! statistics counters.

use super::{Reg, SYS_BASE, field, field_mask};

// =============================================================================
// System
// =============================================================================

/// Core and memory reset control
pub const RESET_CFG: Reg = Reg::at(SYS_BASE, 0x000);

/// RESET_CFG fields
pub mod reset_cfg {
    /// Switch core enable
    pub const CORE_ENA: u32 = 1 << 2;
    /// Memory enable
    pub const MEM_ENA: u32 = 1 << 1;
    /// Start memory initialization; self-clears when done
    pub const MEM_INIT: u32 = 1 << 0;
}

/// Per-port queue system mode
pub const fn port_mode(port: u8) -> Reg {
    Reg::at(SYS_BASE, 0x001 + port as u32)
}

/// PORT_MODE fields
pub mod port_mode {
    /// Frames from the port start with an injection header
    pub const INCL_INJ_HDR: u32 = 1 << 3;
    /// Stop dequeuing from the port's egress queues
    pub const DEQUEUE_DIS: u32 = 1 << 1;
}

/// Per-front-port mode
pub const fn front_port_mode(port: u8) -> Reg {
    Reg::at(SYS_BASE, 0x020 + port as u32)
}

/// FRONT_PORT_MODE fields
pub mod front_port_mode {
    /// Half-duplex backpressure
    pub const HDX_MODE: u32 = 1 << 0;
}

/// Per-port switching enable
pub const fn switch_port_mode(port: u8) -> Reg {
    Reg::at(SYS_BASE, 0x040 + port as u32)
}

/// SWITCH_PORT_MODE fields
pub mod switch_port_mode {
    /// Forward frames to and from the port
    pub const PORT_ENA: u32 = 1 << 3;
}

/// Frame aging period, 4 ns units
pub const FRM_AGING: Reg = Reg::at(SYS_BASE, 0x060);

/// Per-port queue status
pub const fn sw_status(port: u8) -> Reg {
    Reg::at(SYS_BASE, 0x061 + port as u32)
}

/// SW_STATUS fields
pub mod sw_status {
    /// Egress queues with frames pending
    pub const EQ_AVAIL_MASK: u32 = 0xFF;
}

// =============================================================================
// Scheduler
// =============================================================================

/// Leaky bucket control
pub const LB_CTRL: Reg = Reg::at(SYS_BASE, 0x080);

/// LB_CTRL fields
pub mod lb_ctrl {
    /// Initialize leaky buckets; self-clears when done
    pub const LB_INIT: u32 = 1 << 0;
}

// =============================================================================
// Pause Configuration
// =============================================================================

/// Per-port pause watermarks
pub const fn pause_cfg(port: u8) -> Reg {
    Reg::at(SYS_BASE, 0x0A0 + port as u32)
}

/// PAUSE_CFG fields
pub mod pause_cfg {
    use super::field;

    /// Generate pause frames
    pub const PAUSE_ENA: u32 = 1 << 0;

    /// Start pausing above this fill level (48-byte units)
    pub const fn pause_start(v: u32) -> u32 {
        field(v, 12, 11)
    }
    /// Stop pausing below this fill level (48-byte units)
    pub const fn pause_stop(v: u32) -> u32 {
        field(v, 1, 11)
    }
}

/// Chip-wide tail-drop watermark
pub const ATOP_TOT_CFG: Reg = Reg::at(SYS_BASE, 0x0C0);

/// Per-port tail-drop watermark
pub const fn atop(port: u8) -> Reg {
    Reg::at(SYS_BASE, 0x0C1 + port as u32)
}

/// Ports that never use the shared buffer, one bit per port
pub const EGR_NO_SHARING: Reg = Reg::at(SYS_BASE, 0x0E0);

/// Ports whose egress frames are dropped instead of pausing ingress
pub const EGR_DROP_FORCE: Reg = Reg::at(SYS_BASE, 0x0E1);

/// CPU queue scheduling
pub const SCH_CPU: Reg = Reg::at(SYS_BASE, 0x0E2);

/// SCH_CPU fields
pub mod sch_cpu {
    use super::{field, field_mask};

    /// Extraction group per CPU queue, one bit per queue
    pub const fn map(v: u32) -> u32 {
        field(v, 2, 8)
    }
    /// Mask of [`map`]
    pub const MAP_MASK: u32 = field_mask(2, 8);
}

// =============================================================================
// Statistics
// =============================================================================

/// Statistics counter at a flat index
pub const fn stat_cnt(index: u32) -> Reg {
    Reg::at(SYS_BASE, 0x1000 + index)
}

// =============================================================================
// Resource Control
// =============================================================================

/// Number of resource watermark entries
pub const RES_CFG_COUNT: u32 = 1024;

/// Shared buffer resource watermark
pub const fn res_cfg(index: u32) -> Reg {
    Reg::at(SYS_BASE, 0x400 + index)
}
