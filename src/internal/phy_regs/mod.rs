//! PHY Register Definitions
//!
//! Registers reached over MIIM rather than the switch register window.
//!
//! - [`standard`] - IEEE 802.3 Clause 22 registers
//! - [`vsc`] - VSC PHY family vendor registers and pages

pub mod standard;
pub mod vsc;
