//! Rewriter target: per-port flush, frame-aging and CPU header control.

use super::{REW_BASE, Reg};

/// Per-port rewriter configuration
pub const fn port_cfg(port: u8) -> Reg {
    Reg::at(REW_BASE, port as u32)
}

/// PORT_CFG fields
pub mod port_cfg {
    /// Prepend the extraction header to frames sent to the port
    pub const IFH_INSERT_ENA: u32 = 1 << 3;
    /// Flush the port's egress queues
    pub const FLUSH_ENA: u32 = 1 << 2;
    /// Disable frame aging on the port
    pub const AGE_DIS: u32 = 1 << 1;
}
