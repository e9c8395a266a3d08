//! Luton26 switch register map
//!
//! Register addresses are byte offsets into the switch register window,
//! grouped by hardware target. Each submodule exposes address functions
//! returning [`Reg`] plus field constants, in the same shape for every
//! target:
//!
//! - [`dev`]: per-port MAC, clocking and PCS registers
//! - [`sys`]: queue system, port modes, pause and buffer reservation
//! - [`ana`]: analyzer (MAC table, port group masks)
//! - [`rew`]: rewriter per-port config
//! - [`gcb`]: chip id, resets, GPIO, serial GPIO, MIIM controllers
//! - [`macro_ctrl`]: Serdes6G macros, PLL and RCOMP calibration
//! - [`qs`]: CPU frame extraction and injection FIFOs

pub mod ana;
pub mod dev;
pub mod gcb;
pub mod macro_ctrl;
pub mod qs;
pub mod rew;
pub mod sys;

pub use crate::hal::regio::Reg;

// =============================================================================
// Target Base Offsets
// =============================================================================

/// System target (queue system, scheduler, pause config)
pub const SYS_BASE: u32 = 0x0001_0000;

/// Analyzer target
pub const ANA_BASE: u32 = 0x0002_0000;

/// Rewriter target
pub const REW_BASE: u32 = 0x0003_0000;

/// General configuration block (chip regs, GPIO, SIO, MIIM)
pub const GCB_BASE: u32 = 0x0007_0000;

/// CPU queue system target (extraction and injection groups)
pub const QS_BASE: u32 = 0x0008_0000;

/// Macro control target (Serdes, PLL, RCOMP)
pub const MACRO_CTRL_BASE: u32 = 0x000A_0000;

/// Port device 0; each further port device follows at [`DEV_STRIDE`]
pub const DEV_BASE: u32 = 0x001E_0000;

/// Distance between consecutive port devices
pub const DEV_STRIDE: u32 = 0x0001_0000;

/// Encode `value` into a field of `width` bits at `shift`
#[inline(always)]
pub const fn field(value: u32, shift: u32, width: u32) -> u32 {
    (value & ((1 << width) - 1)) << shift
}

/// Mask covering a field of `width` bits at `shift`
#[inline(always)]
pub const fn field_mask(shift: u32, width: u32) -> u32 {
    ((1 << width) - 1) << shift
}

/// Extract a field of `width` bits at `shift`
#[inline(always)]
pub const fn field_get(reg: u32, shift: u32, width: u32) -> u32 {
    (reg >> shift) & ((1 << width) - 1)
}
