//! Error types for the Luton26 switch core
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Configuration and port-addressing failures
//! - [`HardwareError`]: Chip, PHY and Serdes bring-up or wait failures
//! - [`IoError`]: Bus transfer failures (MDIO, I2C, GPIO, CPU frame queues)
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and addressing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Port number outside the switch or board range
    InvalidPort,
    /// Invalid configuration parameter
    InvalidConfig,
    /// Invalid PHY address (controller 0-1, address 0-31)
    InvalidPhyAddress,
    /// Operation not supported for the port's media kind
    UnsupportedMedia,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidPort => "invalid port number",
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::InvalidPhyAddress => "invalid PHY address",
            ConfigError::UnsupportedMedia => "unsupported media for port",
        }
    }
}

// =============================================================================
// Hardware Errors
// =============================================================================

/// Hardware bring-up and bounded-wait errors
///
/// `ChipIdMismatch`, `PhyIdMismatch`, `PllNotLocked` and `MemoryInitFailed`
/// are fatal at boot. `Timeout` is returned by every bounded hardware wait
/// except the port flush drain, which only logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareError {
    /// A polled status bit did not reach its expected value in time
    Timeout,
    /// Switch chip identity register does not match the SKU
    ChipIdMismatch,
    /// A copper PHY did not return the expected identifier
    PhyIdMismatch,
    /// Core PLL failed to lock
    PllNotLocked,
    /// Switch memory initialization did not complete
    MemoryInitFailed,
    /// Internal PHYs did not report ready after reset release
    PhyNotReady,
}

impl core::fmt::Display for HardwareError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HardwareError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            HardwareError::Timeout => "hardware wait timed out",
            HardwareError::ChipIdMismatch => "switch chip id mismatch",
            HardwareError::PhyIdMismatch => "PHY id mismatch",
            HardwareError::PllNotLocked => "PLL not locked",
            HardwareError::MemoryInitFailed => "memory init failed",
            HardwareError::PhyNotReady => "PHY not ready",
        }
    }

    /// Returns true if this error must stop the boot sequence
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, HardwareError::Timeout)
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Bus transfer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// MDIO/MIIM transfer failed
    Mdio,
    /// I2C transfer failed or the device did not answer
    I2c,
    /// GPIO/SGPIO access failed
    Gpio,
    /// Switch aborted a frame during extraction
    FrameAborted,
    /// Frame does not fit the buffer or the port's maximum length
    FrameTooLong,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Mdio => "MDIO transfer failed",
            IoError::I2c => "I2C transfer failed",
            IoError::Gpio => "GPIO access failed",
            IoError::FrameAborted => "frame aborted",
            IoError::FrameTooLong => "frame too long",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::InvalidPort)) => { /* ... */ }
///     Err(Error::Hardware(HardwareError::Timeout)) => { /* ... */ }
///     Err(Error::Io(IoError::I2c)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// Hardware error
    Hardware(HardwareError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Hardware(e) => write!(f, "hardware: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Error::Hardware(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for switch operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for hardware operations
pub type HardwareResult<T> = core::result::Result<T, HardwareError>;

/// Result type alias for bus operations
pub type IoResult<T> = core::result::Result<T, IoError>;
