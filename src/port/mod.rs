//! Port Layer
//!
//! Everything that decides what a port is and what state it is in.
//!
//! # Modules
//!
//! - [`map`]: board variants and their port tables
//! - [`media`]: media kinds and port bitmasks
//! - [`link_mode`]: packed speed/duplex/pause/EEE link descriptor
//! - [`sfp`]: SFP module identification and cage signals
//! - [`events`]: link change consumers
//! - [`state`]: per-port state machine states
//! - [`manager`]: the state machines themselves
//!
//! Ports are numbered internally 0-25 throughout; [`map::PortTable`]
//! translates to the front-panel order.

pub mod events;
pub mod link_mode;
pub mod manager;
pub mod map;
pub mod media;
pub mod sfp;
pub mod state;

pub use events::LinkEvents;
pub use link_mode::{Duplex, EeeCapability, LinkMode, Speed};
pub use manager::PortManager;
pub use map::{PortTable, Sku};
pub use media::{MediaKind, PortMask};
pub use sfp::{SfpSignals, detect_media};
pub use state::PortState;
