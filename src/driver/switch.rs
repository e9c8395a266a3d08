//! Switch fabric configurator
//!
//! [`Switch`] owns the register bus and turns link modes into port
//! configuration. Every link transition goes through [`Switch::setup_port`]:
//! the port is first disabled and flushed, then reprogrammed for the new
//! mode (or left down), and finally the source masks are rebuilt from the
//! link mask.
//!
//! Flow control, MAC table maintenance and the buffer reservation table are
//! further `impl` blocks in [`super::flow`], [`super::mactab`] and
//! [`super::buffers`].
//!
//! # Example
//!
//! ```ignore
//! use ph_luton26_switch::driver::{Switch, SwitchConfig};
//!
//! let mut switch = Switch::new(bus, &timer, SwitchConfig::new())?;
//! switch.post_reset(&mut delay)?;
//! switch.check_chip_id()?;
//! switch.init_ports(&mut delay)?;
//! ```

use embedded_hal::delay::DelayNs;

use super::config::SwitchConfig;
use super::error::{ConfigError, HardwareError, HardwareResult, Result};
use crate::hal::clock::{Clock, poll_until};
use crate::hal::gpio::{GpioMode, gpio_set_mode, gpio_write};
use crate::hal::regio::RegisterBus;
use crate::internal::constants::{
    EXT_PHY_RESET_GPIO, EXT_PHY_RESET_PULSE_MS, EXT_PHY_RESET_SETTLE_MS, FLUSH_TIMEOUT_MS,
    FRAME_AGING_PERIOD, HW_CMD_TIMEOUT_MS, MACTAB_CLEAR_DELAY_MS, MEM_INIT_TIMEOUT_MS,
    PHY_READY_TIMEOUT_MS, PORT_COUNT, PORT_DRAIN_DELAY_MS, SEED_LOAD_DELAY_MS,
};
use crate::internal::register::dev::{self, clock, gmii_clock, mac_ena, mac_hdx, mac_ifg, mac_mode};
use crate::internal::register::{ana, gcb, rew, sys};
use crate::port::link_mode::{LinkMode, Speed};
use crate::port::map::{PortTable, Sku};
use crate::port::media::{MediaKind, PortMask};
use crate::serdes::{pcs1g, sd6g};

/// Last port driven through the GMII clock layout
const LAST_GMII_PORT: u8 = 9;
/// Last port of the internal PHY block
const LAST_INTERNAL_PHY_PORT: u8 = 11;

/// Luton26 switch core
#[derive(Debug)]
pub struct Switch<B: RegisterBus, C: Clock> {
    bus: B,
    clock: C,
    config: SwitchConfig,
    /// Current media per port; SFP ports change it after detection
    media: [MediaKind; PORT_COUNT],
    /// Mode each port was last configured for
    link_modes: [LinkMode; PORT_COUNT],
}

impl<B: RegisterBus, C: Clock> Switch<B, C> {
    /// Create the switch core; nothing is written until a sequence is run
    pub fn new(bus: B, clock: C, config: SwitchConfig) -> Result<Self> {
        config.validate()?;
        let table = config.table();
        let mut media = [MediaKind::Unconnected; PORT_COUNT];
        for (port, slot) in media.iter_mut().enumerate() {
            *slot = table.media(port as u8);
        }
        Ok(Self {
            bus,
            clock,
            config,
            media,
            link_modes: [LinkMode::DOWN; PORT_COUNT],
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Active configuration
    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }

    pub(crate) fn config_mut(&mut self) -> &mut SwitchConfig {
        &mut self.config
    }

    /// Port wiring of the board
    pub fn table(&self) -> &'static PortTable {
        self.config.table()
    }

    /// Register bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Register bus, mutably (raw register console access)
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Millisecond clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Bus and clock borrowed together, for Serdes sequences
    pub fn bus_and_clock(&mut self) -> (&mut B, &C) {
        (&mut self.bus, &self.clock)
    }

    /// Release the bus and clock
    pub fn into_inner(self) -> (B, C) {
        (self.bus, self.clock)
    }

    /// Current media of `port`
    pub fn media(&self, port: u8) -> MediaKind {
        self.media
            .get(port as usize)
            .copied()
            .unwrap_or(MediaKind::Unconnected)
    }

    /// Record the media detected on an SFP port
    pub fn set_media(&mut self, port: u8, media: MediaKind) -> Result<()> {
        let slot = self
            .media
            .get_mut(port as usize)
            .ok_or(ConfigError::InvalidPort)?;
        *slot = media;
        Ok(())
    }

    /// Mode `port` was last configured for
    pub fn link_mode(&self, port: u8) -> LinkMode {
        self.link_modes
            .get(port as usize)
            .copied()
            .unwrap_or(LinkMode::DOWN)
    }

    pub(crate) fn check_port(port: u8) -> Result<()> {
        if port as usize >= PORT_COUNT {
            return Err(ConfigError::InvalidPort.into());
        }
        Ok(())
    }

    // =========================================================================
    // Chip Level
    // =========================================================================

    /// Compare the chip id register with the configured SKU
    pub fn check_chip_id(&mut self) -> HardwareResult<()> {
        let id = self.bus.read(gcb::CHIP_ID) & gcb::CHIP_ID_MASK;
        if id != self.config.sku.chip_id() {
            #[cfg(feature = "defmt")]
            defmt::error!("chip id {=u32:#x}, expected {=u32:#x}", id, self.config.sku.chip_id());
            return Err(HardwareError::ChipIdMismatch);
        }
        Ok(())
    }

    /// Trigger a soft chip reset
    pub fn soft_reset(&mut self) {
        self.bus.set_bits(gcb::SOFT_CHIP_RST, gcb::soft_chip_rst::SOFT_CHIP_RST);
    }

    /// Release the internal PHYs from reset and wait until they are ready
    ///
    /// On the L16 QSGMII board the external PHYs are pulsed through their
    /// reset GPIO as well.
    pub fn phy_hw_init<D: DelayNs + ?Sized>(&mut self, delay: &mut D) -> Result<()> {
        let Self { bus, clock, .. } = self;
        bus.clear_bits(gcb::SOFT_CHIP_RST, gcb::soft_chip_rst::SOFT_PHY_RST);
        poll_until(&*clock, PHY_READY_TIMEOUT_MS, || {
            bus.read(gcb::MISC_STAT) & gcb::misc_stat::PHY_READY != 0
        })
        .map_err(|_| HardwareError::PhyNotReady)?;

        if self.config.sku == Sku::L16 && self.config.qsgmii_l16 {
            gpio_set_mode(&mut self.bus, EXT_PHY_RESET_GPIO, GpioMode::Output);
            gpio_write(&mut self.bus, EXT_PHY_RESET_GPIO, false);
            delay.delay_ms(EXT_PHY_RESET_PULSE_MS);
            gpio_write(&mut self.bus, EXT_PHY_RESET_GPIO, true);
            delay.delay_ms(EXT_PHY_RESET_SETTLE_MS);
        }
        Ok(())
    }

    /// Basic chip bring-up after a reset
    ///
    /// Port mux and Serdes lanes, memory init, core enable, PLL, MAC table,
    /// aging, buffer reservation and leaky buckets, in that order.
    pub fn post_reset<D: DelayNs + ?Sized>(&mut self, delay: &mut D) -> Result<()> {
        {
            let Self {
                bus, clock, config, ..
            } = self;
            sd6g::macro_config(bus, &*clock, delay, config.sku, config.qsgmii_l16)?;

            bus.write(
                sys::RESET_CFG,
                sys::reset_cfg::MEM_ENA | sys::reset_cfg::MEM_INIT,
            );
            poll_until(&*clock, MEM_INIT_TIMEOUT_MS, || {
                bus.read(sys::RESET_CFG) & sys::reset_cfg::MEM_INIT == 0
            })
            .map_err(|_| HardwareError::MemoryInitFailed)?;

            bus.set_bits(sys::RESET_CFG, sys::reset_cfg::CORE_ENA);
            sd6g::pll_lock(bus, delay)?;
        }

        #[cfg(feature = "defmt")]
        defmt::info!("switch core enabled, PLL locked");

        self.clear_mac_table()?;
        delay.delay_ms(MACTAB_CLEAR_DELAY_MS);
        self.set_age_time(self.config.age_time_s);
        self.configure_buffers();

        let Self { bus, clock, .. } = self;
        bus.write(sys::LB_CTRL, sys::lb_ctrl::LB_INIT);
        bus.write(sys::FRM_AGING, FRAME_AGING_PERIOD);
        poll_until(&*clock, HW_CMD_TIMEOUT_MS, || {
            bus.read(sys::LB_CTRL) & sys::lb_ctrl::LB_INIT == 0
        })?;
        bus.write(ana::ANMOVED, 0);
        Ok(())
    }

    // =========================================================================
    // Ports
    // =========================================================================

    /// Clear every source mask and take all ports down
    pub fn init_ports<D: DelayNs + ?Sized>(&mut self, delay: &mut D) -> Result<()> {
        for port in 0..PORT_COUNT as u8 {
            self.bus
                .write(ana::pgid(ana::PGID_SOURCE_START + u32::from(port)), 0);
            self.setup_port(port, LinkMode::DOWN, PortMask::EMPTY, delay)?;
        }

        #[cfg(feature = "defmt")]
        defmt::info!("ports initialized");

        Ok(())
    }

    /// Reconfigure `port` for `mode` and rebuild the source masks
    ///
    /// `link_mask` is the link-up mask the forwarding masks are built from.
    pub fn setup_port<D: DelayNs + ?Sized>(
        &mut self,
        port: u8,
        mode: LinkMode,
        link_mask: PortMask,
        delay: &mut D,
    ) -> Result<()> {
        Self::check_port(port)?;
        self.setup_mac(port, mode, delay)?;
        self.link_modes[port as usize] = mode;

        if mode.is_up() {
            self.bus
                .write(dev::mac_maxlen_cfg(port), self.config.max_frame_len());
            self.setup_flow_control(port, mode);
            self.apply_exc_col_drop(port);
            self.bus.set_bits(
                sys::switch_port_mode(port),
                sys::switch_port_mode::PORT_ENA,
            );
            self.bus.write_masked(
                sys::front_port_mode(port),
                if mode.is_fdx() {
                    0
                } else {
                    sys::front_port_mode::HDX_MODE
                },
                sys::front_port_mode::HDX_MODE,
            );
            let clock_cfg = if port > LAST_GMII_PORT {
                clock::link_speed(mode.clock_link_speed())
            } else {
                0
            };
            self.bus.write(dev::clock_cfg(port), clock_cfg);
            self.bus
                .write(dev::mac_ena_cfg(port), mac_ena::RX_ENA | mac_ena::TX_ENA);
        } else {
            let clock_cfg = if port <= LAST_GMII_PORT {
                gmii_clock::MAC_TX_RST | gmii_clock::MAC_RX_RST | gmii_clock::PORT_RST
            } else if port <= LAST_INTERNAL_PHY_PORT {
                clock::MAC_TX_RST
                    | clock::MAC_RX_RST
                    | clock::PCS_TX_RST
                    | clock::PCS_RX_RST
                    | clock::PORT_RST
            } else {
                clock::link_speed(1)
            };
            self.bus.write(dev::clock_cfg(port), clock_cfg);
        }

        self.update_masks(link_mask);
        Ok(())
    }

    /// Disable and flush `port`, then program its MAC for `mode`
    ///
    /// A port going down also has its MAC table entries flushed. A queue
    /// flush or MAC table aging pass that never completes is logged and the
    /// sequence carries on.
    pub fn setup_mac<D: DelayNs + ?Sized>(
        &mut self,
        port: u8,
        mode: LinkMode,
        delay: &mut D,
    ) -> Result<()> {
        Self::check_port(port)?;
        let media = self.media(port);
        let Self { bus, clock, .. } = self;

        if port > LAST_GMII_PORT {
            bus.clear_bits(dev::clock_cfg(port), clock::PCS_RX_RST);
        }
        bus.clear_bits(dev::mac_ena_cfg(port), mac_ena::RX_ENA);
        bus.clear_bits(sys::switch_port_mode(port), sys::switch_port_mode::PORT_ENA);
        bus.set_bits(sys::port_mode(port), sys::port_mode::DEQUEUE_DIS);

        delay.delay_ms(PORT_DRAIN_DELAY_MS);

        bus.clear_bits(sys::front_port_mode(port), sys::front_port_mode::HDX_MODE);
        bus.set_bits(rew::port_cfg(port), rew::port_cfg::FLUSH_ENA);
        // Dequeuing must run again for the flush to progress
        bus.clear_bits(sys::port_mode(port), sys::port_mode::DEQUEUE_DIS);

        if port > LAST_GMII_PORT {
            if media == MediaKind::Fiber100Fx {
                let bits = clock::MAC_TX_RST | clock::MAC_RX_RST | clock::PHY_RST;
                bus.write_masked(dev::clock_cfg(port), bits, bits);
            } else {
                bus.write(
                    dev::clock_cfg(port),
                    clock::MAC_TX_RST | clock::MAC_RX_RST | clock::PORT_RST,
                );
            }
        } else {
            bus.write(
                dev::clock_cfg(port),
                gmii_clock::MAC_TX_RST | gmii_clock::MAC_RX_RST | gmii_clock::PORT_RST,
            );
        }

        let drained = poll_until(&*clock, FLUSH_TIMEOUT_MS, || {
            bus.read(sys::sw_status(port)) & sys::sw_status::EQ_AVAIL_MASK == 0
        });
        if drained.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("port {}: flush timeout", port);
        }

        bus.clear_bits(rew::port_cfg(port), rew::port_cfg::FLUSH_ENA);

        if mode.is_up() {
            self.configure_mac(port, mode, media, delay);
        } else {
            self.flush_port(port);
        }
        Ok(())
    }

    fn configure_mac<D: DelayNs + ?Sized>(
        &mut self,
        port: u8,
        mode: LinkMode,
        media: MediaKind,
        delay: &mut D,
    ) {
        let bus = &mut self.bus;
        let hdx_10 = mode.is_hdx_10();
        let hdx_100 = mode.is_hdx() && !hdx_10;

        let mac_mode_cfg = if mode.is_giga() {
            mac_mode::FDX_ENA | mac_mode::GIGA_MODE_ENA
        } else if mode.is_fdx() {
            mac_mode::FDX_ENA
        } else {
            0
        };
        bus.write(dev::mac_mode_cfg(port), mac_mode_cfg);

        let fdx_gap = if mode.speed() == Some(Speed::Mbps1000) {
            5
        } else if port <= LAST_GMII_PORT {
            16
        } else if port <= LAST_INTERNAL_PHY_PORT {
            if hdx_10 || hdx_100 { 14 } else { 16 }
        } else {
            15
        };
        let (hdx_gap_1, hdx_gap_2) = if hdx_10 {
            (11, 9)
        } else if hdx_100 {
            (7, 9)
        } else {
            (0, 0)
        };
        bus.write(
            dev::mac_ifg_cfg(port),
            mac_ifg::tx_ifg(fdx_gap) | mac_ifg::rx_ifg1(hdx_gap_1) | mac_ifg::rx_ifg2(hdx_gap_2),
        );

        let late_col_pos = if port <= LAST_INTERNAL_PHY_PORT { 64 } else { 67 };
        bus.write_masked(
            dev::mac_hdx_cfg(port),
            mac_hdx::late_col_pos(late_col_pos) | mac_hdx::seed(u32::from(port)) | mac_hdx::SEED_LOAD,
            mac_hdx::LATE_COL_POS_MASK | mac_hdx::SEED_MASK | mac_hdx::SEED_LOAD,
        );
        // Seed load is sampled in the rx clock domain
        delay.delay_ms(SEED_LOAD_DELAY_MS);
        bus.clear_bits(dev::mac_hdx_cfg(port), mac_hdx::SEED_LOAD);

        if port > LAST_INTERNAL_PHY_PORT
            && !matches!(
                media,
                MediaKind::Serdes1000BaseX
                    | MediaKind::Fiber100Fx
                    | MediaKind::Serdes2G5
                    | MediaKind::Sgmii
            )
        {
            pcs1g::enable(bus, port, media);
        }

        bus.write_masked(
            rew::port_cfg(port),
            if mode.is_hdx() { rew::port_cfg::AGE_DIS } else { 0 },
            rew::port_cfg::AGE_DIS,
        );
    }

    /// Rebuild the per-port source masks from the link-up mask
    ///
    /// Every port may forward to every other port that has link. Always a
    /// full rebuild.
    pub fn update_masks(&mut self, link_mask: PortMask) {
        let all = self.table().all_ports().bits();
        for sport in 0..PORT_COUNT as u8 {
            let member = PortMask::ALL.without(sport).and(link_mask);
            self.bus.write_masked(
                ana::pgid(ana::PGID_SOURCE_START + u32::from(sport)),
                member.bits(),
                all,
            );
        }
    }

    /// Change the excessive collision policy and apply it to every port
    pub fn set_exc_col_drop(&mut self, drop: bool) {
        self.config.exc_col_drop = drop;
        for port in self.table().all_ports().iter() {
            self.apply_exc_col_drop(port);
        }
    }

    fn apply_exc_col_drop(&mut self, port: u8) {
        self.bus.write_masked(
            dev::mac_hdx_cfg(port),
            if self.config.exc_col_drop {
                0
            } else {
                mac_hdx::RETRY_AFTER_EXC_COL_ENA
            },
            mac_hdx::RETRY_AFTER_EXC_COL_ENA,
        );
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
