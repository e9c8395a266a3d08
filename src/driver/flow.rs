//! IEEE 802.3x flow control
//!
//! This module extends [`Switch`] with per-port pause configuration. Each
//! port that comes up gets pause watermarks and a tail-drop reservation
//! sized for whether pause was negotiated, and the chip-wide tail-drop
//! watermark is recomputed from the reservations of all ports.
//!
//! # Overview
//!
//! 1. Pause start/stop watermarks decide when the port sends pause frames
//! 2. The per-port tail-drop reservation keeps room for frames in flight
//! 3. The chip-wide watermark is what is left of the shared memory
//!
//! A port that is down counts as a port without flow control.

use super::buffers::wm_encode;
use super::switch::Switch;
use crate::hal::clock::Clock;
use crate::hal::regio::RegisterBus;
use crate::internal::constants::{
    BUFFER_CELL_SIZE, BUFFER_MEMORY, FC_LATENCY, PAUSE_VALUE, PORT_COUNT,
};
use crate::internal::register::dev::{self, mac_fc};
use crate::internal::register::sys::{self, pause_cfg};
use crate::port::link_mode::LinkMode;

/// Watermark value that never triggers
const WM_DISABLED: u32 = 0x7FF;

/// Watermarks of one port, in 48-byte cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Watermarks {
    pause_start: u32,
    pause_stop: u32,
    atop: u32,
}

impl Watermarks {
    const fn select(jumbo: bool, fc: bool) -> Self {
        match (jumbo, fc) {
            (true, true) => Self {
                pause_start: 221,
                pause_stop: 158,
                atop: 284,
            },
            (true, false) => Self {
                pause_start: WM_DISABLED,
                pause_stop: WM_DISABLED,
                atop: 250,
            },
            (false, true) => Self {
                pause_start: 190,
                pause_stop: 127,
                atop: 253,
            },
            (false, false) => Self {
                pause_start: WM_DISABLED,
                pause_stop: WM_DISABLED,
                atop: 0,
            },
        }
    }
}

/// Bytes one port holds back from the shared memory
const fn port_reservation(jumbo: bool, fc: bool) -> u32 {
    match (jumbo, fc) {
        (true, true) => 13_662,
        (true, false) => 12_000,
        (false, true) => 12_144,
        (false, false) => 0,
    }
}

// =============================================================================
// Flow Control Implementation
// =============================================================================

impl<B: RegisterBus, C: Clock> Switch<B, C> {
    /// Program pause and tail-drop watermarks of `port` for `mode`
    ///
    /// Also refreshes the chip-wide tail-drop watermark and the pause frame
    /// source address of the port.
    pub fn setup_flow_control(&mut self, port: u8, mode: LinkMode) {
        let jumbo = self.config().jumbo;
        let fc = mode.pause();
        let wm = Watermarks::select(jumbo, fc);
        let atop_total = self.atop_total(port, fc);
        let mac = self.config().pause_mac(port);

        let bus = self.bus_mut();
        bus.write(
            sys::pause_cfg(port),
            pause_cfg::pause_start(wm.pause_start)
                | pause_cfg::pause_stop(wm.pause_stop)
                | if fc { pause_cfg::PAUSE_ENA } else { 0 },
        );
        bus.write(sys::ATOP_TOT_CFG, atop_total);
        bus.write(sys::atop(port), wm.atop);

        bus.write(
            dev::mac_fc_mac_high_cfg(port),
            u32::from(mac[0]) << 16 | u32::from(mac[1]) << 8 | u32::from(mac[2]),
        );
        bus.write(
            dev::mac_fc_mac_low_cfg(port),
            u32::from(mac[3]) << 16 | u32::from(mac[4]) << 8 | u32::from(mac[5]),
        );

        let fc_ena = if fc {
            mac_fc::TX_FC_ENA | mac_fc::RX_FC_ENA
        } else {
            0
        };
        bus.write(
            dev::mac_fc_cfg(port),
            mac_fc::ZERO_PAUSE_ENA
                | fc_ena
                | mac_fc::pause_val(PAUSE_VALUE)
                | mac_fc::fc_latency(FC_LATENCY),
        );

        #[cfg(feature = "defmt")]
        defmt::debug!("port {}: flow control {}", port, fc);
    }

    /// Chip-wide tail-drop watermark with `port` about to use `fc`
    fn atop_total(&self, port: u8, fc: bool) -> u32 {
        let jumbo = self.config().jumbo;
        let reserved: u32 = (0..PORT_COUNT as u8)
            .map(|p| {
                let port_fc = if p == port {
                    fc
                } else {
                    self.link_mode(p).pause()
                };
                port_reservation(jumbo, port_fc)
            })
            .sum();
        wm_encode(BUFFER_MEMORY.saturating_sub(reserved) / BUFFER_CELL_SIZE)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::config::SwitchConfig;
    use crate::port::media::PortMask;
    use crate::test_utils::{MockClock, MockDelay, MockRegisterBus};

    fn switch(jumbo: bool) -> Switch<MockRegisterBus, MockClock> {
        Switch::new(
            MockRegisterBus::responsive(),
            MockClock::with_step(1),
            SwitchConfig::new()
                .with_jumbo(jumbo)
                .with_mac_address([0x00, 0x01, 0xC1, 0x00, 0x10, 0x20]),
        )
        .unwrap()
    }

    #[test]
    fn test_pause_enabled_jumbo() {
        let mut sw = switch(true);
        sw.setup_flow_control(4, LinkMode::FDX_1000.with_pause());
        let bus = sw.bus();

        assert_eq!(
            bus.get(sys::pause_cfg(4)),
            pause_cfg::pause_start(221) | pause_cfg::pause_stop(158) | pause_cfg::PAUSE_ENA
        );
        assert_eq!(bus.get(sys::atop(4)), 284);
        // 25 ports without pause plus this one
        let total = 25 * 12_000 + 13_662;
        assert_eq!(bus.get(sys::ATOP_TOT_CFG), (512_000 - total) / 48);

        let fc = bus.get(dev::mac_fc_cfg(4));
        assert_ne!(fc & mac_fc::TX_FC_ENA, 0);
        assert_ne!(fc & mac_fc::RX_FC_ENA, 0);
        assert_ne!(fc & mac_fc::ZERO_PAUSE_ENA, 0);
        assert_eq!(fc & 0xFFFF, 0xFF);
    }

    #[test]
    fn test_pause_disabled_non_jumbo() {
        let mut sw = switch(false);
        sw.setup_flow_control(0, LinkMode::FDX_100);
        let bus = sw.bus();

        assert_eq!(
            bus.get(sys::pause_cfg(0)),
            pause_cfg::pause_start(0x7FF) | pause_cfg::pause_stop(0x7FF)
        );
        assert_eq!(bus.get(sys::atop(0)), 0);
        // Nothing reserved: 10666 cells, compressed
        assert_eq!(bus.get(sys::ATOP_TOT_CFG), 1024 + 10_666 / 16);
        assert_eq!(
            bus.get(dev::mac_fc_cfg(0)) & (mac_fc::TX_FC_ENA | mac_fc::RX_FC_ENA),
            0
        );
    }

    #[test]
    fn test_down_port_counts_as_no_pause() {
        let mut sw = switch(false);
        sw.setup_flow_control(2, LinkMode::DOWN);
        assert_eq!(sw.bus().get(sys::pause_cfg(2)) & pause_cfg::PAUSE_ENA, 0);
    }

    #[test]
    fn test_total_follows_other_ports() {
        let mut sw = switch(false);
        let mut delay = MockDelay::new();
        sw.setup_port(1, LinkMode::FDX_1000.with_pause(), PortMask::EMPTY, &mut delay)
            .unwrap();
        sw.setup_flow_control(2, LinkMode::FDX_100.with_pause());
        assert_eq!(
            sw.bus().get(sys::ATOP_TOT_CFG),
            (512_000 - 2 * 12_144) / 48
        );
    }

    #[test]
    fn test_pause_source_mac() {
        let mut sw = switch(true);
        sw.setup_flow_control(3, LinkMode::FDX_100);
        assert_eq!(sw.bus().get(dev::mac_fc_mac_high_cfg(3)), 0x0001C1);
        assert_eq!(sw.bus().get(dev::mac_fc_mac_low_cfg(3)), 0x001024);
    }
}
