//! Board-specific wiring.
//!
//! The switch core only knows the chip. Everything that depends on how a
//! board connects the chip to its SFP cages lives here, behind
//! [`SfpSignals`](crate::port::sfp::SfpSignals).
//!
//! # Supported Boards
//!
//! - Luton26 L25, L16 and L10 reference boards ([`luton26::SwitchGpioSignals`])

pub mod luton26;

pub use luton26::SwitchGpioSignals;
