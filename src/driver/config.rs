//! Switch configuration types
//!
//! [`SwitchConfig`] collects the build-time choices of one board: which SKU
//! it is, the base MAC address, jumbo frames, half-duplex collision policy,
//! MAC table aging and the administratively enabled ports.

use super::error::{ConfigError, ConfigResult};
use crate::internal::constants::{
    DEFAULT_AGE_TIME_S, MAX_FRAME_JUMBO, MAX_FRAME_STD, PORT_COUNT,
};
use crate::port::map::{PortTable, Sku};
use crate::port::media::PortMask;

/// Default base MAC address (locally administered)
pub const DEFAULT_MAC_ADDR: [u8; 6] = [0x02, 0x01, 0xC1, 0x00, 0x00, 0x00];

/// Complete switch configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchConfig {
    /// Board variant
    pub sku: Sku,
    /// L16 board with external QSGMII PHYs on ports 12-15
    pub qsgmii_l16: bool,
    /// Base MAC address; pause frames of each port use a derived address
    pub mac_address: [u8; 6],
    /// Accept jumbo frames
    pub jumbo: bool,
    /// Drop frames after excessive collisions in half duplex
    pub exc_col_drop: bool,
    /// MAC table age time in seconds
    pub age_time_s: u32,
    /// Administratively enabled ports (internal numbering)
    pub enabled_ports: PortMask,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitchConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sku: Sku::DEFAULT,
            qsgmii_l16: false,
            mac_address: DEFAULT_MAC_ADDR,
            jumbo: true,
            exc_col_drop: false,
            age_time_s: DEFAULT_AGE_TIME_S,
            enabled_ports: PortMask::ALL,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the board variant
    #[must_use]
    pub const fn with_sku(mut self, sku: Sku) -> Self {
        self.sku = sku;
        self
    }

    /// Select the QSGMII flavour of the L16 board
    #[must_use]
    pub const fn with_qsgmii_l16(mut self, qsgmii: bool) -> Self {
        self.qsgmii_l16 = qsgmii;
        self
    }

    /// Set the base MAC address
    #[must_use]
    pub const fn with_mac_address(mut self, addr: [u8; 6]) -> Self {
        self.mac_address = addr;
        self
    }

    /// Enable or disable jumbo frames
    #[must_use]
    pub const fn with_jumbo(mut self, jumbo: bool) -> Self {
        self.jumbo = jumbo;
        self
    }

    /// Drop or retry frames after excessive collisions
    #[must_use]
    pub const fn with_exc_col_drop(mut self, drop: bool) -> Self {
        self.exc_col_drop = drop;
        self
    }

    /// Set the MAC table age time
    #[must_use]
    pub const fn with_age_time_s(mut self, seconds: u32) -> Self {
        self.age_time_s = seconds;
        self
    }

    /// Set the administratively enabled ports
    #[must_use]
    pub const fn with_enabled_ports(mut self, ports: PortMask) -> Self {
        self.enabled_ports = ports;
        self
    }

    // =========================================================================
    // Derived Values
    // =========================================================================

    /// Port wiring of the configured board
    pub fn table(&self) -> &'static PortTable {
        self.sku.table(self.qsgmii_l16)
    }

    /// Maximum accepted frame length
    pub const fn max_frame_len(&self) -> u32 {
        if self.jumbo {
            MAX_FRAME_JUMBO
        } else {
            MAX_FRAME_STD
        }
    }

    /// Source MAC of pause frames sent by `port`
    ///
    /// The base address plus `port + 1`, carrying into bytes 4 and 3.
    pub const fn pause_mac(&self, port: u8) -> [u8; 6] {
        let mut mac = self.mac_address;
        let add = port.wrapping_add(1);
        let (low, carry) = mac[5].overflowing_add(add);
        mac[5] = low;
        if carry {
            mac[4] = mac[4].wrapping_add(1);
            if mac[4] == 0 {
                mac[3] = mac[3].wrapping_add(1);
            }
        }
        mac
    }

    /// Check the configuration for values the hardware cannot take
    pub fn validate(&self) -> ConfigResult<()> {
        if self.age_time_s == 0 {
            return Err(ConfigError::InvalidConfig);
        }
        if self.enabled_ports.bits() & !PortMask::ALL.bits() != 0 {
            return Err(ConfigError::InvalidPort);
        }
        Ok(())
    }

    /// Port is wired on this board and administratively enabled
    pub fn port_enabled(&self, port: u8) -> bool {
        (port as usize) < PORT_COUNT
            && self.enabled_ports.contains(port)
            && self.table().is_valid(port)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SwitchConfig::default();
        assert_eq!(config.sku, Sku::DEFAULT);
        assert!(config.jumbo);
        assert!(!config.exc_col_drop);
        assert_eq!(config.age_time_s, 300);
        assert_eq!(config.max_frame_len(), 9600);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builder_chain() {
        let config = SwitchConfig::new()
            .with_sku(Sku::L10)
            .with_jumbo(false)
            .with_exc_col_drop(true)
            .with_age_time_s(60)
            .with_enabled_ports(PortMask::from_bits(0x3));
        assert_eq!(config.sku, Sku::L10);
        assert_eq!(config.max_frame_len(), 1518);
        assert!(config.exc_col_drop);
        assert_eq!(config.age_time_s, 60);
        assert!(config.port_enabled(1));
        assert!(!config.port_enabled(2));
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert_eq!(
            SwitchConfig::new().with_age_time_s(0).validate(),
            Err(ConfigError::InvalidConfig)
        );
        assert_eq!(
            SwitchConfig::new()
                .with_enabled_ports(PortMask::from_bits(1 << 27))
                .validate(),
            Err(ConfigError::InvalidPort)
        );
    }

    #[test]
    fn unwired_ports_are_not_enabled() {
        let config = SwitchConfig::new().with_sku(Sku::L25);
        assert!(config.port_enabled(0));
        assert!(!config.port_enabled(24));
        assert!(config.port_enabled(25));
        assert!(!config.port_enabled(26));
    }

    #[test]
    fn pause_mac_offsets_by_port() {
        let config = SwitchConfig::new().with_mac_address([0, 1, 2, 3, 4, 0x10]);
        assert_eq!(config.pause_mac(0), [0, 1, 2, 3, 4, 0x11]);
        assert_eq!(config.pause_mac(25), [0, 1, 2, 3, 4, 0x2A]);
    }

    #[test]
    fn pause_mac_carries() {
        let config = SwitchConfig::new().with_mac_address([0, 1, 2, 3, 4, 0xFF]);
        assert_eq!(config.pause_mac(0), [0, 1, 2, 3, 5, 0x00]);

        let config = SwitchConfig::new().with_mac_address([0, 1, 2, 3, 0xFF, 0xFE]);
        assert_eq!(config.pause_mac(2), [0, 1, 2, 4, 0x00, 0x01]);
    }
}
