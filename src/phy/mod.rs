//! Copper PHY drivers
//!
//! The copper ports of every supported board are VSC family PHYs, either
//! inside the switch (ports 0-11) or on external quad PHYs behind QSGMII.
//! They are reached through the switch MIIM controllers via [`MdioBus`].
//!
//! The port state machine decides when to touch a PHY; this module only
//! knows how.
//!
//! # Example
//!
//! ```ignore
//! use ph_luton26_switch::phy::VscPhy;
//!
//! let phy = VscPhy::new(table.phy_addr(port)?);
//! phy.setup_speed_mode(&mut mdio)?;
//! if phy.link_up(&mut mdio)? {
//!     let mode = phy.link_mode(&mut mdio)?;
//! }
//! ```
//!
//! [`MdioBus`]: crate::hal::mdio::MdioBus

pub mod vsc;

pub use vsc::VscPhy;
