//! Port manager
//!
//! [`PortManager`] owns one state machine per internal port together with
//! everything those machines drive: the switch core, the MDIO bus of the
//! copper PHYs, the SFP management bus and cage signals, and the link event
//! consumers.
//!
//! The phy task calls [`PortManager::poll`] every 10 ms. Setup states act on
//! every call; the link states only sample hardware when the 100 ms poll
//! flag fired, so link status is never read faster than negotiation can
//! produce an answer.
//!
//! # Example
//!
//! ```ignore
//! use ph_luton26_switch::port::PortManager;
//!
//! let mut ports = PortManager::new(switch, miim, sfp_i2c, signals, (eee, leds));
//! ports.init_states(&mut delay)?;
//! loop {
//!     if timer.ms_10.take() {
//!         ticker.tick();
//!         ports.poll(ticker.phy_poll.take(), &mut delay);
//!     }
//! }
//! ```

use embedded_hal::delay::DelayNs;

use super::events::LinkEvents;
use super::link_mode::LinkMode;
use super::map::Sku;
use super::media::{MediaKind, PortMask};
use super::sfp::{SfpSignals, detect_media};
use super::state::PortState;
use crate::driver::error::{ConfigError, Result};
use crate::driver::switch::Switch;
use crate::hal::clock::Clock;
use crate::hal::i2c::SfpBus;
use crate::hal::mdio::MdioBus;
use crate::hal::regio::RegisterBus;
use crate::internal::constants::{PHY_POWER_UP_DELAY_MS, PHY_RESET_DELAY_MS, PORT_COUNT};
use crate::internal::register::dev::{self, mac_mode};
use crate::phy::VscPhy;
use crate::serdes::{pcs1g, sd6g};

/// Ports whose PHY reset resets the whole PHY block behind them
fn pre_reset_ports(sku: Sku, qsgmii: bool) -> &'static [u8] {
    match sku {
        Sku::L25 => &[0, 12],
        Sku::L16 if qsgmii => &[12],
        Sku::L16 => &[],
        Sku::L10 => &[24, 25],
    }
}

/// Per-port link state machines and their collaborators
#[derive(Debug)]
pub struct PortManager<B, C, M, I, S, E>
where
    B: RegisterBus,
    C: Clock,
    M: MdioBus,
    I: SfpBus,
    S: SfpSignals,
    E: LinkEvents,
{
    switch: Switch<B, C>,
    mdio: M,
    sfp: I,
    signals: S,
    events: E,
    states: [PortState; PORT_COUNT],
    /// Administratively enabled ports
    enabled: PortMask,
    /// Ports with link
    link_mask: PortMask,
    /// Serdes ports whose lane must be reprogrammed
    media_changed: PortMask,
}

impl<B, C, M, I, S, E> PortManager<B, C, M, I, S, E>
where
    B: RegisterBus,
    C: Clock,
    M: MdioBus,
    I: SfpBus,
    S: SfpSignals,
    E: LinkEvents,
{
    /// Take ownership of the collaborators; every port starts disabled
    pub fn new(switch: Switch<B, C>, mdio: M, sfp: I, signals: S, events: E) -> Self {
        let enabled = switch
            .config()
            .enabled_ports
            .and(switch.table().all_ports());
        Self {
            switch,
            mdio,
            sfp,
            signals,
            events,
            states: [PortState::Disabled; PORT_COUNT],
            enabled,
            link_mask: PortMask::EMPTY,
            media_changed: PortMask::EMPTY,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Switch core
    pub fn switch(&self) -> &Switch<B, C> {
        &self.switch
    }

    /// Switch core, mutably
    pub fn switch_mut(&mut self) -> &mut Switch<B, C> {
        &mut self.switch
    }

    /// MDIO bus of the copper PHYs
    pub fn mdio(&self) -> &M {
        &self.mdio
    }

    /// MDIO bus, mutably (raw PHY register console access)
    pub fn mdio_mut(&mut self) -> &mut M {
        &mut self.mdio
    }

    /// SFP management bus
    pub fn sfp(&self) -> &I {
        &self.sfp
    }

    /// SFP cage signals
    pub fn signals(&self) -> &S {
        &self.signals
    }

    /// Link event consumers
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Link event consumers, mutably
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Current state of `port`
    pub fn state(&self, port: u8) -> PortState {
        self.states
            .get(port as usize)
            .copied()
            .unwrap_or(PortState::Disabled)
    }

    fn set_state(&mut self, port: u8, state: PortState) {
        self.states[port as usize] = state;
    }

    fn phy(&self, port: u8) -> Result<VscPhy> {
        Ok(VscPhy::new(self.switch.table().phy_addr(port)?))
    }

    fn copper_ports(&self) -> PortMask {
        let mut mask = PortMask::EMPTY;
        for port in self.switch.table().all_ports().iter() {
            mask.set(port, self.switch.media(port).is_copper());
        }
        mask
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Reset the PHY blocks and power each copper PHY up or down
    ///
    /// All Serdes lanes are marked for reprogramming.
    pub fn phy_init<D: DelayNs + ?Sized>(&mut self, delay: &mut D) -> Result<()> {
        self.link_mask = PortMask::EMPTY;
        delay.delay_ms(PHY_POWER_UP_DELAY_MS);

        let config = self.switch.config();
        for &port in pre_reset_ports(config.sku, config.qsgmii_l16) {
            if self.switch.media(port).is_copper() {
                let phy = self.phy(port)?;
                phy.pre_reset(&mut self.mdio, self.switch.clock())?;
            }
        }
        delay.delay_ms(PHY_RESET_DELAY_MS);

        for port in self.copper_ports().iter() {
            let phy = self.phy(port)?;
            phy.select_std_page(&mut self.mdio)?;
            if self.enabled.contains(port) {
                phy.power_up(&mut self.mdio)?;
            } else {
                phy.power_down(&mut self.mdio)?;
            }
        }

        self.media_changed = PortMask::ALL;
        Ok(())
    }

    /// Verify that every copper PHY answers with the expected identifier
    pub fn check_phys(&mut self) -> Result<()> {
        for port in self.copper_ports().iter() {
            let phy = self.phy(port)?;
            if let Err(err) = phy.expect_id(&mut self.mdio) {
                #[cfg(feature = "defmt")]
                defmt::error!("port {}: PHY id check failed", port);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Bring up the PHYs and cage signals and put each port in its first state
    pub fn init_states<D: DelayNs + ?Sized>(&mut self, delay: &mut D) -> Result<()> {
        self.phy_init(delay)?;
        self.signals.init(&mut self.mdio)?;
        self.check_phys()?;

        for port in 0..PORT_COUNT as u8 {
            let media = self.switch.media(port);
            let state = if self.enabled.contains(port) {
                if media.is_copper() {
                    self.phy(port)?.init(&mut self.mdio)?;
                }
                PortState::initial(media)
            } else {
                PortState::Disabled
            };
            self.set_state(port, state);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("port state machines started");

        Ok(())
    }

    // =========================================================================
    // Polling
    // =========================================================================

    /// Advance every port by at most one transition
    ///
    /// `sample` is the 100 ms poll flag. Ports are processed in internal
    /// order; a port whose hardware access fails stays in its state.
    pub fn poll<D: DelayNs + ?Sized>(&mut self, sample: bool, delay: &mut D) {
        for port in 0..PORT_COUNT as u8 {
            if let Err(_err) = self.step(port, sample, delay) {
                #[cfg(feature = "defmt")]
                defmt::warn!("port {}: {}", port, _err);
            }
        }
    }

    fn step<D: DelayNs + ?Sized>(&mut self, port: u8, sample: bool, delay: &mut D) -> Result<()> {
        let state = self.state(port);
        if state == PortState::Disabled || (state.is_sampled() && !sample) {
            return Ok(());
        }
        let media = self.switch.media(port);
        if media.is_copper() {
            self.step_copper(port, state, delay)
        } else if media.is_serdes() {
            self.step_serdes(port, state, media, delay)
        } else {
            Ok(())
        }
    }

    fn step_copper<D: DelayNs + ?Sized>(
        &mut self,
        port: u8,
        state: PortState,
        delay: &mut D,
    ) -> Result<()> {
        let phy = self.phy(port)?;
        match state {
            PortState::SetupSpeedMode => {
                phy.setup_speed_mode(&mut self.mdio)?;
                self.set_state(port, PortState::WaitingForLink);
            }
            PortState::WaitingForLink => {
                if phy.link_up(&mut self.mdio)? {
                    let mode = phy.link_mode(&mut self.mdio)?;
                    if mode.is_hdx_10() {
                        phy.polarity_fix_apply(&mut self.mdio)?;
                    }
                    self.port_up(port, mode, delay)?;
                }
            }
            PortState::LinkUp => {
                if !phy.link_up(&mut self.mdio)? {
                    self.set_state(port, PortState::WaitingForLink);
                    self.port_down(port, delay)?;
                    phy.polarity_fix_clear(&mut self.mdio)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn step_serdes<D: DelayNs + ?Sized>(
        &mut self,
        port: u8,
        state: PortState,
        media: MediaKind,
        delay: &mut D,
    ) -> Result<()> {
        match state {
            PortState::SigSetup => self.set_state(port, PortState::SetUpMode),
            PortState::SetUpMode => self.set_up_mode(port, delay)?,
            PortState::WaitingForLink => {
                let present = self.signals.module_present(port, &mut self.mdio)?;
                let bus = self.switch.bus_mut();
                let mode = pcs1g::link_status(bus, delay, port, media);
                if mode.is_up() {
                    if media == MediaKind::Sgmii {
                        // The MAC follows the speed carried in-band
                        let value = if mode.is_giga() {
                            mac_mode::GIGA_MODE_ENA | mac_mode::FDX_ENA
                        } else if mode.is_fdx() {
                            mac_mode::FDX_ENA
                        } else {
                            0
                        };
                        bus.write_masked(
                            dev::mac_mode_cfg(port),
                            value,
                            mac_mode::GIGA_MODE_ENA | mac_mode::FDX_ENA,
                        );
                    }
                    self.port_up(port, mode, delay)?;
                } else if !present {
                    if media != MediaKind::Sgmii {
                        self.signals.set_tx_disable(port, true)?;
                    }
                    self.set_state(port, PortState::SetUpMode);
                }
            }
            PortState::LinkUp => {
                let present = self.signals.module_present(port, &mut self.mdio)?;
                let mode = pcs1g::link_status(self.switch.bus_mut(), delay, port, media);
                if !present || mode.is_down() {
                    self.set_state(port, PortState::SetUpMode);
                    self.signals.set_tx_disable(port, true)?;
                    pcs1g::clock_stop(self.switch.bus_mut(), port);
                    self.port_down(port, delay)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Match the Serdes lane to the inserted module
    fn set_up_mode<D: DelayNs + ?Sized>(&mut self, port: u8, delay: &mut D) -> Result<()> {
        let present = self.signals.module_present(port, &mut self.mdio)?;
        if present {
            let detected = detect_media(&mut self.sfp);
            if detected != self.switch.media(port) {
                self.switch.set_media(port, detected)?;
                self.media_changed.set(port, true);
            }
        }

        let media = self.switch.media(port);
        if self.media_changed.contains(port) {
            #[cfg(feature = "defmt")]
            defmt::debug!("port {}: serdes -> {}", port, media);

            if let Some(lane) = self.switch.table().serdes_lane(port) {
                let (bus, clock) = self.switch.bus_and_clock();
                sd6g::change_mode(bus, clock, delay, media.serdes_mode(), lane)?;
            }
            let bus = self.switch.bus_mut();
            pcs1g::setup(bus, port, media);
            if media.uses_clause37() {
                pcs1g::control_set(bus, port, media);
            }
            self.media_changed.set(port, false);
        }

        if !present && media != MediaKind::Sgmii {
            self.signals.set_tx_disable(port, true)?;
        } else {
            self.signals.set_tx_disable(port, false)?;
            self.set_state(port, PortState::WaitingForLink);
        }
        Ok(())
    }

    /// Configure `port` for `mode`, mark it up and notify consumers
    fn port_up<D: DelayNs + ?Sized>(&mut self, port: u8, mode: LinkMode, delay: &mut D) -> Result<()> {
        self.link_mask.set(port, true);
        if let Err(err) = self.switch.setup_port(port, mode, self.link_mask, delay) {
            self.link_mask.set(port, false);
            return Err(err);
        }
        self.set_state(port, PortState::LinkUp);

        #[cfg(feature = "defmt")]
        defmt::info!("port {}: link up {}", port, mode);

        self.events.link_up(port);
        Ok(())
    }

    /// Take `port` down and notify consumers
    fn port_down<D: DelayNs + ?Sized>(&mut self, port: u8, delay: &mut D) -> Result<()> {
        self.link_mask.set(port, false);
        self.switch
            .setup_port(port, LinkMode::DOWN, self.link_mask, delay)?;

        #[cfg(feature = "defmt")]
        defmt::info!("port {}: link down", port);

        self.events.link_down(port);
        Ok(())
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Enable or disable a port
    ///
    /// Disabling takes the port down at once, whatever its state. Setting
    /// the current value again does nothing.
    pub fn set_enable<D: DelayNs + ?Sized>(
        &mut self,
        port: u8,
        enable: bool,
        delay: &mut D,
    ) -> Result<()> {
        if port as usize >= PORT_COUNT || !self.switch.table().is_valid(port) {
            return Err(ConfigError::InvalidPort.into());
        }
        if self.enabled.contains(port) == enable {
            return Ok(());
        }
        self.enabled.set(port, enable);
        let media = self.switch.media(port);

        if enable {
            if media.is_copper() {
                self.phy(port)?.power_up(&mut self.mdio)?;
            }
            if media.is_serdes() {
                self.media_changed.set(port, true);
            }
            self.set_state(port, PortState::initial(media));
            return Ok(());
        }

        self.set_state(port, PortState::Disabled);
        self.port_down(port, delay)?;
        if media.is_copper() {
            self.phy(port)?.power_down(&mut self.mdio)?;
        } else if media.uses_clause37() {
            pcs1g::clock_stop(self.switch.bus_mut(), port);
        }
        Ok(())
    }

    /// Change the excessive collision policy on every port
    pub fn set_exc_col_drop(&mut self, drop: bool) {
        self.switch.set_exc_col_drop(drop);
    }

    // =========================================================================
    // Link Queries
    // =========================================================================

    /// Current link mode of `port`, read from hardware when it has link
    pub fn get_link_mode_raw<D: DelayNs + ?Sized>(&mut self, port: u8, delay: &mut D) -> LinkMode {
        if !self.link_mask.contains(port) {
            return LinkMode::DOWN;
        }
        let media = self.switch.media(port);
        if media.is_copper() {
            self.phy(port)
                .and_then(|phy| phy.link_mode(&mut self.mdio))
                .unwrap_or(LinkMode::DOWN)
        } else {
            pcs1g::link_status(self.switch.bus_mut(), delay, port, media)
        }
    }

    /// Port has link
    pub fn get_link_state(&self, port: u8) -> bool {
        self.link_mask.contains(port)
    }

    /// Ports with link, one bit per internal port
    pub fn get_link_mask(&self) -> PortMask {
        let mut mask = PortMask::EMPTY;
        for port in self.switch.table().ports_in_ext_order() {
            mask.set(port, self.link_mask.contains(port));
        }
        mask
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
