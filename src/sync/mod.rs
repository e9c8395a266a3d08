//! Synchronization Support
//!
//! The only state shared with interrupt context is the set of timer flags.
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability
//! - [`PollFlag`] - a flag the timer ISR raises and the main loop takes
//!
//! # Example
//!
//! ```ignore
//! use ph_luton26_switch::sync::PollFlag;
//!
//! static SEC_1: PollFlag = PollFlag::new();
//!
//! #[interrupt]
//! fn TIMER() {
//!     SEC_1.set();
//! }
//!
//! loop {
//!     if SEC_1.take() {
//!         // once per second
//!     }
//! }
//! ```

mod primitives;

pub use primitives::{CriticalSectionCell, PollFlag};
