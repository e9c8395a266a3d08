//! Internal Implementation Details
//!
//! Not part of the public API. Types here may change without notice.
//!
//! - [`register`]: switch register map
//! - [`constants`]: timing bounds, frame and buffer figures
//! - [`phy_regs`]: MIIM-reachable PHY registers

pub(crate) mod constants;
pub(crate) mod phy_regs;
pub(crate) mod register;
