//! Serdes lanes and the PCS behind them
//!
//! - [`sd6g`]: Serdes6G macro programming, lane mux and core PLL
//! - [`pcs1g`]: PCS1G/100FX setup and link status readers
//!
//! Everything here is a free function over the register bus so the port
//! state machines and the boot sequence can share it without owning the
//! switch.

pub mod pcs1g;
pub mod sd6g;

pub use sd6g::Serdes6gMode;
