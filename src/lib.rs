//! Luton26 Switch Firmware Core
//!
//! A `no_std`, `no_alloc` Rust firmware core for unmanaged Ethernet switches
//! built on the Luton26 switch chip.
//!
//! The core keeps every port's link state machine running, reconfigures the
//! switch fabric whenever a link comes up or goes down, and matches the
//! Serdes lanes of the SFP ports to whatever module is inserted.
//!
//! # Architecture
//!
//! 1. **Port Layer** ([`port`]): per-port state machines, media detection, link events
//! 2. **Driver Layer** ([`driver`]): switch core bring-up, MAC/flow control/forwarding setup
//! 3. **Serdes Layer** ([`serdes`]): 6G Serdes lanes and the 1G/100FX PCS
//! 4. **PHY Layer** ([`phy`]): VSC-family copper PHYs
//! 5. **HAL Layer** ([`hal`]): register bus, clock, MIIM, GPIO, SFP I2C
//!
//! [`system`] ties them together in the boot sequence and the main loop.
//!
//! # Board Variants
//!
//! - `L25`: 24 copper ports plus one 2.5G SFP port
//! - `L16`: 16 copper ports, optionally with QSGMII external PHYs
//! - `L10`: 8 copper ports plus two SFP ports
//!
//! # Features
//!
//! - `l25` (default), `l16`, `l10`: select the default board variant
//! - `defmt`: Enable defmt logging and formatting of public types
//!
//! # Example
//!
//! ```ignore
//! use ph_luton26_switch::{PortManager, Switch, SwitchConfig};
//! use ph_luton26_switch::boards::SwitchGpioSignals;
//! use ph_luton26_switch::hal::{MiimController, MmioBus};
//! use ph_luton26_switch::system::{Supervisor, SystemTimer};
//!
//! static TIMER: SystemTimer = SystemTimer::new();
//!
//! let config = SwitchConfig::new().with_mac_address(mac_from_flash);
//! let switch = Switch::new(unsafe { MmioBus::new(SWITCH_BASE) }, &TIMER, config)?;
//! let miim = MiimController::new(unsafe { MmioBus::new(SWITCH_BASE) }, &TIMER);
//! let signals = SwitchGpioSignals::new(unsafe { MmioBus::new(SWITCH_BASE) }, config.sku);
//! let ports = PortManager::new(switch, miim, sfp_i2c, signals, (eee, leds));
//!
//! let mut supervisor = Supervisor::new(ports, board, &TIMER);
//! supervisor.boot(&mut delay)?;
//! loop {
//!     supervisor.run_once(&mut delay);
//! }
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in clippy.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]
#[cfg(any(
    all(feature = "l25", feature = "l16"),
    all(feature = "l25", feature = "l10"),
    all(feature = "l16", feature = "l10")
))]
compile_error!("Features 'l25', 'l16' and 'l10' are mutually exclusive.");

// =============================================================================
// Modules
// =============================================================================

pub mod boards;
pub mod driver;
pub mod hal;
pub mod phy;
pub mod port;
pub mod serdes;
pub mod sync;
pub mod system;

// Internal implementation details (pub(crate) only)
mod internal;

// Test utilities (only available during testing)
#[cfg(test)]
pub(crate) mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{DEFAULT_MAC_ADDR, SwitchConfig};
pub use driver::error::{
    ConfigError, ConfigResult, Error, HardwareError, HardwareResult, IoError, IoResult, Result,
};
pub use driver::switch::Switch;
pub use phy::VscPhy;
pub use port::{LinkEvents, LinkMode, MediaKind, PortManager, PortMask, PortState, Sku};
pub use system::{FatalCause, Supervisor, SystemControl, SystemTimer};

/// Low-level register accessors for advanced use.
///
/// Backs the raw switch register console commands. Most users should
/// prefer the driver APIs instead of touching registers directly.
pub mod unsafe_registers {
    pub use crate::internal::register::{ana, dev, gcb, macro_ctrl, qs, rew, sys};
}

/// Shared firmware constants.
pub mod constants {
    pub use crate::internal::constants::{
        BUFFER_MEMORY, CPU_PORT, DEFAULT_AGE_TIME_S, FLUSH_TIMEOUT_MS, MAX_FRAME_JUMBO,
        MAX_FRAME_STD, PORT_COUNT,
    };
}
