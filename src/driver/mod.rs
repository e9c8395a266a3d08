//! Core driver components for the Luton26 switch fabric.
//!
//! This module contains the building blocks for bringing up the switch core
//! and reconfiguring its ports when links change:
//!
//! - [`config`] - Board and feature configuration
//! - [`error`] - Error types and result aliases
//! - [`switch`] - The switch core: boot sequence, port setup, forwarding masks
//! - [`flow`] - Pause watermarks and tail-drop reservation
//! - [`mactab`] - MAC table clearing and aging
//! - [`buffers`] - Shared buffer reservation
//! - [`rxtx`] - CPU frame extraction and injection
//! - [`stats`] - Per-port statistics counters
//!
//! # Example
//!
//! ```ignore
//! use ph_luton26_switch::driver::{Switch, SwitchConfig};
//! use ph_luton26_switch::port::map::Sku;
//!
//! let config = SwitchConfig::new()
//!     .with_sku(Sku::L10)
//!     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
//! let mut switch = Switch::new(bus, &timer, config)?;
//! ```

// Submodules
pub mod buffers;
pub mod config;
pub mod error;
pub mod flow;
pub mod mactab;
pub mod rxtx;
pub mod stats;
pub mod switch;

// Re-exports for convenience
pub use config::{DEFAULT_MAC_ADDR, SwitchConfig};
pub use error::{
    ConfigError, ConfigResult, Error, HardwareError, HardwareResult, IoError, IoResult, Result,
};
pub use rxtx::{CpuQueueMap, CpuRxConfig, ExtractionHeader, InjectionHeader, RxFrame};
pub use stats::{Counter, PortCounters};
pub use switch::Switch;
