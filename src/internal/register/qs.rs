//! CPU queue system target: register based frame extraction and injection.
//!
//! Two extraction groups and two injection groups. Each group is a word
//! FIFO read or written one register access at a time.

use super::{QS_BASE, Reg, field};

// =============================================================================
// Extraction
// =============================================================================

/// Extraction group configuration
pub const fn xtr_grp_cfg(group: u8) -> Reg {
    Reg::at(QS_BASE, 0x000 + group as u32)
}

/// XTR_GRP_CFG fields
pub mod xtr_grp_cfg {
    /// Swap the bytes of every data word
    pub const BYTE_SWAP: u32 = 1 << 0;
}

/// Extraction group map of CPU port `CPU_PORT + index`
pub const fn xtr_map(index: u8) -> Reg {
    Reg::at(QS_BASE, 0x002 + index as u32)
}

/// XTR_MAP fields
pub mod xtr_map {
    /// Extraction group 1 instead of 0
    pub const GRP: u32 = 1 << 4;
    /// Queue mapping enabled
    pub const MAP_ENA: u32 = 1 << 0;
}

/// Extraction data word of a group
pub const fn xtr_rd(group: u8) -> Reg {
    Reg::at(QS_BASE, 0x004 + group as u32)
}

/// Extraction queue flush, one bit per group
pub const XTR_QU_FLUSH: Reg = Reg::at(QS_BASE, 0x00A);

/// Groups holding at least one frame, one bit per group
pub const XTR_DATA_PRESENT: Reg = Reg::at(QS_BASE, 0x00B);

/// Control words returned by [`xtr_rd`] in place of data
pub mod xtr_word {
    /// End of frame, all 4 bytes of the next word valid
    pub const EOF_0: u32 = 0x8000_0000;
    /// End of frame, 3 bytes of the next word valid
    pub const EOF_1: u32 = 0x8000_0001;
    /// End of frame, 2 bytes of the next word valid
    pub const EOF_2: u32 = 0x8000_0002;
    /// End of frame, 1 byte of the next word valid
    pub const EOF_3: u32 = 0x8000_0003;
    /// Frame was pruned; the next word is its last
    pub const PRUNED: u32 = 0x8000_0004;
    /// Frame aborted; the next word carries no data
    pub const ABORT: u32 = 0x8000_0005;
    /// The next word is data that matches a control word
    pub const ESCAPE: u32 = 0x8000_0006;
    /// FIFO empty for now
    pub const NOT_READY: u32 = 0x8000_0007;
}

// =============================================================================
// Injection
// =============================================================================

/// Injection group configuration
pub const fn inj_grp_cfg(group: u8) -> Reg {
    Reg::at(QS_BASE, 0x00D + group as u32)
}

/// INJ_GRP_CFG fields
pub mod inj_grp_cfg {
    /// Swap the bytes of every data word
    pub const BYTE_SWAP: u32 = 1 << 0;
}

/// Injection data word of a group
pub const fn inj_wr(group: u8) -> Reg {
    Reg::at(QS_BASE, 0x00F + group as u32)
}

/// Injection frame control of a group
pub const fn inj_ctrl(group: u8) -> Reg {
    Reg::at(QS_BASE, 0x011 + group as u32)
}

/// INJ_CTRL fields
pub mod inj_ctrl {
    use super::field;

    /// Abort the frame in progress
    pub const ABORT: u32 = 1 << 20;
    /// The next data word is the last one
    pub const EOF: u32 = 1 << 19;
    /// The next data word starts a frame
    pub const SOF: u32 = 1 << 18;

    /// Valid bytes in the last word, 0 meaning all four
    pub const fn vld_bytes(v: u32) -> u32 {
        field(v, 16, 2)
    }
}

/// Injection FIFO status
pub const INJ_STATUS: Reg = Reg::at(QS_BASE, 0x013);

/// INJ_STATUS fields
pub mod inj_status {
    /// FIFO of `group` is above its watermark
    pub const fn wmark_reached(group: u8) -> u32 {
        1 << (4 + group as u32)
    }
    /// FIFO of `group` accepts a frame
    pub const fn fifo_rdy(group: u8) -> u32 {
        1 << (2 + group as u32)
    }
}
