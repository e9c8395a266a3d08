//! PCS1G and 100FX PCS control for Serdes-attached ports
//!
//! Link state readers return a [`LinkMode`]; [`LinkMode::DOWN`] when there is
//! no usable link.

use embedded_hal::delay::DelayNs;

use crate::hal::regio::RegisterBus;
use crate::internal::constants::{ANEG_PR_DELAY_MS, ANEG_PR_POLLS, PCS_RESTART_DELAY_MS};
use crate::internal::register::dev::{
    self, clock, fx100_cfg, fx100_status, mac_mode, pcs1g, pcs1g_aneg, pcs1g_aneg_status,
    pcs1g_link, pcs1g_mode, pcs1g_sd, pcs1g_sticky,
};
use crate::port::link_mode::LinkMode;
use crate::port::media::MediaKind;

/// CLOCK_CFG bits touched when starting or stopping a Serdes port
const CLOCK_PCS_MASK: u32 =
    clock::PCS_TX_RST | clock::PCS_RX_RST | clock::PORT_RST | clock::LINK_SPEED_MASK;

/// Clause 37 base page bits as reported in the link partner ability
mod lp {
    /// Full duplex (1000Base-X)
    pub const BASEX_FDX: u32 = 1 << 5;
    /// Symmetric pause
    pub const PAUSE: u32 = 1 << 7;
    /// SGMII speed field shift
    pub const SGMII_SPEED_SHIFT: u32 = 10;
    /// SGMII speed code with no defined rate
    pub const SGMII_SPEED_RESERVED: u8 = 3;
    /// SGMII duplex
    pub const SGMII_FDX: u32 = 1 << 12;
    /// SGMII link
    pub const SGMII_LINK: u32 = 1 << 15;
}

/// Write the clause 37 advertisement and restart negotiation
pub fn control_set<B: RegisterBus + ?Sized>(bus: &mut B, port: u8, media: MediaKind) {
    let value = if media == MediaKind::Sgmii {
        pcs1g_aneg::CONTROL_SGMII
    } else {
        pcs1g_aneg::CONTROL_1000BASEX
    };
    bus.write_masked(dev::pcs1g_aneg_cfg(port), value, pcs1g_aneg::CONTROL_MASK);
}

/// Hold the PCS and port in reset with the clock stopped
pub fn clock_stop<B: RegisterBus + ?Sized>(bus: &mut B, port: u8) {
    bus.write_masked(
        dev::clock_cfg(port),
        clock::PCS_TX_RST | clock::PCS_RX_RST | clock::PORT_RST,
        CLOCK_PCS_MASK,
    );
}

/// Start the port clock and select the PCS for `media`
///
/// 2.5G ports run the 1000Base-X PCS at the faster lane rate.
pub fn setup<B: RegisterBus + ?Sized>(bus: &mut B, port: u8, media: MediaKind) {
    match media {
        MediaKind::Sgmii => {
            bus.write_masked(dev::clock_cfg(port), clock::link_speed(1), CLOCK_PCS_MASK);
            // MAC mode follows the negotiated speed
            bus.write(dev::pcs1g_cfg(port), pcs1g::PCS_ENA);
            bus.write(dev::pcs1g_mode_cfg(port), pcs1g_mode::SGMII_MODE_ENA);
            bus.set_bits(dev::pcs1g_aneg_cfg(port), pcs1g_aneg::SW_RESOLVE_ENA);
            bus.clear_bits(dev::pcs_fx100_cfg(port), fx100_cfg::PCS_ENA);
        }
        MediaKind::Fiber100Fx => {
            bus.write_masked(dev::clock_cfg(port), clock::link_speed(2), CLOCK_PCS_MASK);
            bus.write_masked(
                dev::mac_mode_cfg(port),
                mac_mode::FDX_ENA,
                mac_mode::GIGA_MODE_ENA | mac_mode::FDX_ENA,
            );
            bus.clear_bits(dev::pcs1g_aneg_cfg(port), pcs1g_aneg::SW_RESOLVE_ENA);
            bus.write_masked(
                dev::pcs_fx100_cfg(port),
                fx100_cfg::PCS_ENA,
                fx100_cfg::SD_SEL | fx100_cfg::SD_POL | fx100_cfg::SD_ENA | fx100_cfg::PCS_ENA,
            );
        }
        MediaKind::Serdes1000BaseX | MediaKind::Serdes2G5 | MediaKind::SfpAuto => {
            bus.write_masked(dev::clock_cfg(port), clock::link_speed(1), CLOCK_PCS_MASK);
            bus.write_masked(
                dev::mac_mode_cfg(port),
                mac_mode::GIGA_MODE_ENA | mac_mode::FDX_ENA,
                mac_mode::GIGA_MODE_ENA | mac_mode::FDX_ENA,
            );
            bus.write(dev::pcs1g_cfg(port), pcs1g::PCS_ENA);
            bus.write(dev::pcs1g_mode_cfg(port), 0);
            bus.write(dev::pcs1g_sd_cfg(port), 0);
            bus.clear_bits(dev::pcs1g_aneg_cfg(port), pcs1g_aneg::SW_RESOLVE_ENA);
            bus.clear_bits(dev::pcs_fx100_cfg(port), fx100_cfg::PCS_ENA);
        }
        MediaKind::Copper { .. } | MediaKind::Unconnected => {}
    }
}

/// Enable the PCS in front of a QSGMII/SGMII attached PHY
///
/// Used by the MAC setup for ports above the GMII range.
pub fn enable<B: RegisterBus + ?Sized>(bus: &mut B, port: u8, media: MediaKind) {
    if media == MediaKind::Fiber100Fx {
        bus.write_masked(
            dev::pcs_fx100_cfg(port),
            fx100_cfg::PCS_ENA | fx100_cfg::SD_POL,
            fx100_cfg::PCS_ENA | fx100_cfg::SD_POL,
        );
        return;
    }
    let sgmii_mode = matches!(media, MediaKind::Copper { .. } | MediaKind::Sgmii);
    bus.write(
        dev::pcs1g_mode_cfg(port),
        if sgmii_mode { pcs1g_mode::SGMII_MODE_ENA } else { 0 },
    );
    bus.write(
        dev::pcs1g_aneg_cfg(port),
        if sgmii_mode { pcs1g_aneg::SW_RESOLVE_ENA } else { 0 },
    );
    bus.write(dev::pcs1g_sd_cfg(port), pcs1g_sd::SD_POL);
    bus.write(dev::pcs1g_cfg(port), pcs1g::PCS_ENA);
}

/// Link state of a clause 37 (SGMII or 1000Base-X) port
///
/// Clears the link-down stickies when the link held since the last call.
/// On 1000Base-X the PCS is restarted when negotiation completes without
/// full duplex or stalls while the lane is in sync.
pub fn clause37_status<B, D>(bus: &mut B, delay: &mut D, port: u8, media: MediaKind) -> LinkMode
where
    B: RegisterBus + ?Sized,
    D: DelayNs + ?Sized,
{
    let sticky = bus.read(dev::pcs1g_sticky(port));
    let mut link = sticky & pcs1g_sticky::LINK_DOWN_STICKY == 0;
    let mut status = bus.read(dev::pcs1g_link_status(port));

    if link {
        bus.write(
            dev::pcs1g_sticky(port),
            pcs1g_sticky::LINK_DOWN_STICKY | pcs1g_sticky::OUT_OF_SYNC_STICKY,
        );
    } else {
        status = bus.read(dev::pcs1g_link_status(port));
        link = status & pcs1g_link::LINK_STATUS != 0 && status & pcs1g_link::SYNC_STATUS != 0;
    }
    let synced = status & pcs1g_link::SYNC_STATUS != 0;

    let mut aneg = bus.read(dev::pcs1g_aneg_status(port));
    for _ in 0..ANEG_PR_POLLS {
        if aneg & pcs1g_aneg_status::PR != 0 {
            break;
        }
        delay.delay_ms(ANEG_PR_DELAY_MS);
        aneg = bus.read(dev::pcs1g_aneg_status(port));
    }
    let mut complete = aneg & pcs1g_aneg_status::ANEG_COMPLETE != 0;

    if media == MediaKind::Serdes1000BaseX {
        let lp_fdx = pcs1g_aneg_status::lp_adv_ability(aneg) & lp::BASEX_FDX != 0;
        if (complete && !lp_fdx) || (synced && !complete) {
            #[cfg(feature = "defmt")]
            defmt::debug!("pcs1g: port {} aneg restart", port);

            bus.clear_bits(dev::pcs1g_cfg(port), pcs1g::PCS_ENA);
            bus.write(dev::pcs1g_cfg(port), pcs1g::PCS_ENA);
            control_set(bus, port, media);
            delay.delay_ms(PCS_RESTART_DELAY_MS);
            aneg = bus.read(dev::pcs1g_aneg_status(port));
            complete = aneg & pcs1g_aneg_status::ANEG_COMPLETE != 0;
        }
    }

    let ability = pcs1g_aneg_status::lp_adv_ability(aneg);
    if media == MediaKind::Sgmii {
        if !link || ability & lp::SGMII_LINK == 0 {
            return LinkMode::DOWN;
        }
        let mut bits = ((ability >> lp::SGMII_SPEED_SHIFT) & 0x3) as u8;
        if bits == lp::SGMII_SPEED_RESERVED {
            return LinkMode::DOWN;
        }
        if ability & lp::SGMII_FDX != 0 {
            bits |= LinkMode::FDX;
        }
        if ability & lp::PAUSE != 0 {
            bits |= LinkMode::PAUSE;
        }
        LinkMode::from_bits(bits)
    } else if link && complete {
        if ability & lp::PAUSE != 0 {
            LinkMode::FDX_1000.with_pause()
        } else {
            LinkMode::FDX_1000
        }
    } else {
        LinkMode::DOWN
    }
}

/// Link state of a 100Base-FX port
///
/// Any error sticky means the link dropped since the last call; the
/// stickies are cleared and the status sampled again.
pub fn fx100_status<B: RegisterBus + ?Sized>(bus: &mut B, port: u8) -> LinkMode {
    let mut status = bus.read(dev::pcs_fx100_status(port));
    if status & fx100_status::STICKY_MASK != 0 {
        bus.write(dev::pcs_fx100_status(port), 0xFFFF);
        status = bus.read(dev::pcs_fx100_status(port));
    }
    if status & fx100_status::SYNC_STATUS != 0 && status & fx100_status::STICKY_MASK == 0 {
        LinkMode::FDX_100
    } else {
        LinkMode::DOWN
    }
}

/// Link state of a 2.5G port
pub fn status_2g5<B: RegisterBus + ?Sized>(bus: &mut B, port: u8) -> LinkMode {
    let status = bus.read(dev::pcs1g_link_status(port));
    if status & pcs1g_link::LINK_STATUS != 0 && status & pcs1g_link::SYNC_STATUS != 0 {
        LinkMode::FDX_2500
    } else {
        LinkMode::DOWN
    }
}

/// Link state reader for the port's current media
pub fn link_status<B, D>(bus: &mut B, delay: &mut D, port: u8, media: MediaKind) -> LinkMode
where
    B: RegisterBus + ?Sized,
    D: DelayNs + ?Sized,
{
    match media {
        MediaKind::Serdes2G5 => status_2g5(bus, port),
        MediaKind::Sgmii | MediaKind::Serdes1000BaseX => {
            clause37_status(bus, delay, port, media)
        }
        _ => fx100_status(bus, port),
    }
}
