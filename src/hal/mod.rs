//! Hardware Abstraction Layer
//!
//! Thin abstractions between the switch core and the hardware it drives.
//!
//! # Modules
//!
//! - [`regio`]: switch register bus and its memory-mapped implementation
//! - [`clock`]: millisecond clock and bounded waits
//! - [`mdio`]: MIIM controllers and the MDIO bus trait
//! - [`gpio`]: switch GPIO and serial GPIO
//! - [`i2c`]: SFP management bus
//!
//! # Delay Integration
//!
//! Fixed settle times use `embedded_hal::delay::DelayNs` directly. Pass any
//! delay implementation from your HAL.

pub mod clock;
pub mod gpio;
pub mod i2c;
pub mod mdio;
pub mod regio;

// Re-export commonly used types
pub use clock::{Clock, Deadline, poll_until};
pub use i2c::SfpBus;
pub use mdio::{MdioBus, MdioExt, MiimController, PhyAddr};
pub use regio::{MmioBus, Reg, RegisterBus};
