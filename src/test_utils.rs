//! Testing utilities and mock implementations
//!
//! Mocks for every hardware seam of the switch core so the state machines
//! and configuration sequences run on the host.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::vec;
use std::vec::Vec;

use crate::driver::error::{IoError, Result};
use crate::hal::clock::Clock;
use crate::hal::i2c::SfpBus;
use crate::hal::mdio::{MdioBus, PhyAddr};
use crate::hal::regio::{Reg, RegisterBus};
use crate::internal::constants::PORT_COUNT;
use crate::internal::phy_regs::standard::{bmsr, phy_reg};
use crate::internal::phy_regs::vsc::{PHY_OUI_MSB, page, vsc_reg};
use crate::port::events::LinkEvents;
use crate::port::sfp::SfpSignals;
use crate::system::SystemControl;

// =============================================================================
// Mock Register Bus
// =============================================================================

/// Mock switch register bus
///
/// Registers read back what was last written unless a read sequence or
/// stuck/self-clearing bits say otherwise. Every write is logged in order.
///
/// # Example
///
/// ```ignore
/// let bus = MockRegisterBus::new();
/// bus.self_clear(sys::RESET_CFG, reset_cfg::MEM_INIT);
/// bus.stick_bits(macro_ctrl::PLL5G_STATUS0, pll5g_status0::LOCK_STATUS);
/// ```
#[derive(Debug, Default)]
pub struct MockRegisterBus {
    registers: RefCell<HashMap<Reg, u32>>,
    write_log: RefCell<Vec<(Reg, u32)>>,
    read_sequences: RefCell<HashMap<Reg, VecDeque<u32>>>,
    stuck: RefCell<HashMap<Reg, u32>>,
    self_clearing: RefCell<HashMap<Reg, u32>>,
}

impl MockRegisterBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus on which every "start and wait" bit used at boot completes at once
    pub fn responsive() -> Self {
        use crate::internal::register::{ana, macro_ctrl, sys};

        let bus = Self::new();
        bus.self_clear(sys::RESET_CFG, sys::reset_cfg::MEM_INIT);
        bus.self_clear(sys::LB_CTRL, sys::lb_ctrl::LB_INIT);
        bus.self_clear(ana::MACACCESS, ana::macaccess::CMD_MASK);
        bus.self_clear(
            macro_ctrl::SERDES6G_ADDR_CFG,
            macro_ctrl::serdes6g_addr_cfg::WR_ONE_SHOT | macro_ctrl::serdes6g_addr_cfg::RD_ONE_SHOT,
        );
        bus.stick_bits(
            macro_ctrl::PLL5G_STATUS0,
            macro_ctrl::pll5g_status0::LOCK_STATUS,
        );
        bus
    }

    /// Preset a register value without logging a write
    pub fn set(&self, reg: Reg, value: u32) {
        self.registers.borrow_mut().insert(reg, value);
    }

    /// Stored register value (stuck bits excluded)
    pub fn get(&self, reg: Reg) -> u32 {
        self.registers.borrow().get(&reg).copied().unwrap_or(0)
    }

    /// Queue values returned by successive reads before falling back to storage
    pub fn push_reads(&self, reg: Reg, values: &[u32]) {
        self.read_sequences
            .borrow_mut()
            .entry(reg)
            .or_default()
            .extend(values.iter().copied());
    }

    /// Bits that always read back as set
    pub fn stick_bits(&self, reg: Reg, bits: u32) {
        *self.stuck.borrow_mut().entry(reg).or_default() |= bits;
    }

    /// Bits that hardware clears as soon as they are written
    pub fn self_clear(&self, reg: Reg, bits: u32) {
        *self.self_clearing.borrow_mut().entry(reg).or_default() |= bits;
    }

    /// All writes in order
    pub fn writes(&self) -> Vec<(Reg, u32)> {
        self.write_log.borrow().clone()
    }

    /// Writes to one register in order
    pub fn writes_to(&self, reg: Reg) -> Vec<u32> {
        self.write_log
            .borrow()
            .iter()
            .filter(|(r, _)| *r == reg)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Index in the write log of the first write to `reg` matching `pred`
    pub fn first_write(&self, reg: Reg, pred: impl Fn(u32) -> bool) -> Option<usize> {
        self.write_log
            .borrow()
            .iter()
            .position(|(r, v)| *r == reg && pred(*v))
    }

    pub fn clear_writes(&self) {
        self.write_log.borrow_mut().clear();
    }
}

impl RegisterBus for MockRegisterBus {
    fn read(&mut self, reg: Reg) -> u32 {
        let stuck = self.stuck.borrow().get(&reg).copied().unwrap_or(0);
        if let Some(value) = self
            .read_sequences
            .borrow_mut()
            .get_mut(&reg)
            .and_then(VecDeque::pop_front)
        {
            return value | stuck;
        }
        self.get(reg) | stuck
    }

    fn write(&mut self, reg: Reg, value: u32) {
        self.write_log.borrow_mut().push((reg, value));
        let clearing = self.self_clearing.borrow().get(&reg).copied().unwrap_or(0);
        self.registers.borrow_mut().insert(reg, value & !clearing);
    }
}

// =============================================================================
// Mock Clock
// =============================================================================

/// Millisecond clock advancing by `step` on every read
#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<u32>,
    step: u32,
}

impl MockClock {
    /// Frozen clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: u32) -> Self {
        Self {
            now: Cell::new(ms),
            step: 0,
        }
    }

    pub fn with_step(step: u32) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
    /// Individual delay calls in nanoseconds
    calls: RefCell<Vec<u64>>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total milliseconds that were "delayed"
    pub fn total_ms(&self) -> u64 {
        self.total_ns() / 1_000_000
    }

    /// Individual delays, in milliseconds
    pub fn calls_ms(&self) -> Vec<u64> {
        self.calls.borrow().iter().map(|ns| ns / 1_000_000).collect()
    }

    /// Reset the delay counter
    pub fn reset(&self) {
        *self.total_ns.borrow_mut() = 0;
        self.calls.borrow_mut().clear();
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
        self.calls.borrow_mut().push(ns as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_ns(ms.saturating_mul(1_000_000));
    }
}

// =============================================================================
// Mock MDIO Bus
// =============================================================================

#[derive(Debug, Default, Clone, Copy)]
struct MmdState {
    devad: u8,
    addr: u16,
    data_mode: bool,
}

/// Mock MDIO bus with paged registers and Clause 45 emulation
///
/// Register 31 selects the page of subsequent accesses, as on VSC PHYs.
/// Registers 13/14 on the standard page behave as the MMD access pair.
#[derive(Debug, Default)]
pub struct MockMdioBus {
    /// (phy, page, reg) -> value
    registers: RefCell<HashMap<(PhyAddr, u16, u8), u16>>,
    pages: RefCell<HashMap<PhyAddr, u16>>,
    mmd: RefCell<HashMap<(PhyAddr, u8, u16), u16>>,
    mmd_state: RefCell<HashMap<PhyAddr, MmdState>>,
    /// Record of writes: (phy, reg, value)
    write_log: RefCell<Vec<(PhyAddr, u8, u16)>>,
    busy: Cell<bool>,
    fail: Cell<bool>,
    /// Page whose selection fails on one PHY
    fail_page: Cell<Option<(PhyAddr, u16)>>,
}

impl MockMdioBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a standard-page register
    pub fn set_register(&self, phy: PhyAddr, reg: u8, value: u16) {
        self.set_paged_register(phy, page::STD, reg, value);
    }

    pub fn set_paged_register(&self, phy: PhyAddr, page: u16, reg: u8, value: u16) {
        self.registers.borrow_mut().insert((phy, page, reg), value);
    }

    pub fn get_register(&self, phy: PhyAddr, reg: u8) -> Option<u16> {
        self.get_paged_register(phy, page::STD, reg)
    }

    pub fn get_paged_register(&self, phy: PhyAddr, page: u16, reg: u8) -> Option<u16> {
        self.registers.borrow().get(&(phy, page, reg)).copied()
    }

    /// Currently selected page of a PHY
    pub fn current_page(&self, phy: PhyAddr) -> u16 {
        self.pages.borrow().get(&phy).copied().unwrap_or(page::STD)
    }

    pub fn set_mmd(&self, phy: PhyAddr, devad: u8, reg: u16, value: u16) {
        self.mmd.borrow_mut().insert((phy, devad, reg), value);
    }

    pub fn get_writes(&self) -> Vec<(PhyAddr, u8, u16)> {
        self.write_log.borrow().clone()
    }

    /// Writes to one PHY in order
    pub fn writes_for(&self, phy: PhyAddr) -> Vec<(u8, u16)> {
        self.write_log
            .borrow()
            .iter()
            .filter(|w| w.0 == phy)
            .map(|w| (w.1, w.2))
            .collect()
    }

    pub fn clear_writes(&self) {
        self.write_log.borrow_mut().clear();
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }

    /// Make every access fail with an MDIO error
    pub fn set_fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    /// Make selecting `page` on `phy` fail with an MDIO error
    pub fn set_fail_on_page(&self, phy: PhyAddr, page: u16) {
        self.fail_page.set(Some((phy, page)));
    }

    /// VSC PHY identity, link down
    pub fn setup_vsc(&self, phy: PhyAddr) {
        self.set_register(phy, phy_reg::PHYIDR1, PHY_OUI_MSB);
        self.set_register(phy, phy_reg::BMSR, 0x7949);
    }

    /// Link up with the given auxiliary status and partner ability words
    pub fn simulate_link_up(&self, phy: PhyAddr, aux_status: u16, anlpar: u16) {
        let bmsr_val = self.get_register(phy, phy_reg::BMSR).unwrap_or(0);
        self.set_register(phy, phy_reg::BMSR, bmsr_val | bmsr::LINK_STATUS | bmsr::AN_COMPLETE);
        self.set_register(phy, vsc_reg::AUX_STATUS, aux_status);
        self.set_register(phy, phy_reg::ANLPAR, anlpar);
    }

    pub fn simulate_link_down(&self, phy: PhyAddr) {
        let bmsr_val = self.get_register(phy, phy_reg::BMSR).unwrap_or(0);
        self.set_register(
            phy,
            phy_reg::BMSR,
            bmsr_val & !(bmsr::LINK_STATUS | bmsr::AN_COMPLETE),
        );
        self.set_register(phy, phy_reg::ANLPAR, 0);
    }
}

impl MdioBus for MockMdioBus {
    fn read(&mut self, phy: PhyAddr, reg: u8) -> Result<u16> {
        if self.fail.get() {
            return Err(IoError::Mdio.into());
        }
        let page = self.current_page(phy);
        if page == page::STD && reg == phy_reg::MMD_DATA {
            let state = self.mmd_state.borrow().get(&phy).copied().unwrap_or_default();
            if state.data_mode {
                return Ok(self
                    .mmd
                    .borrow()
                    .get(&(phy, state.devad, state.addr))
                    .copied()
                    .unwrap_or(0));
            }
        }
        Ok(self.get_paged_register(phy, page, reg).unwrap_or(0))
    }

    fn write(&mut self, phy: PhyAddr, reg: u8, value: u16) -> Result<()> {
        if self.fail.get() {
            return Err(IoError::Mdio.into());
        }
        if reg == vsc_reg::PAGE && self.fail_page.get() == Some((phy, value)) {
            return Err(IoError::Mdio.into());
        }
        self.write_log.borrow_mut().push((phy, reg, value));

        if reg == vsc_reg::PAGE {
            self.pages.borrow_mut().insert(phy, value);
            return Ok(());
        }

        let page = self.current_page(phy);
        if page == page::STD {
            let mut states = self.mmd_state.borrow_mut();
            let state = states.entry(phy).or_default();
            if reg == phy_reg::MMD_CTRL {
                state.devad = (value & 0x1F) as u8;
                state.data_mode = value & 0xC000 != 0;
            } else if reg == phy_reg::MMD_DATA && !state.data_mode {
                state.addr = value;
            }
        }

        // Self-clearing BMCR bits settle immediately
        let stored = if page == page::STD && reg == phy_reg::BMCR {
            value & !0x8200
        } else {
            value
        };
        self.registers.borrow_mut().insert((phy, page, reg), stored);
        Ok(())
    }

    fn is_busy(&mut self, _controller: u8) -> bool {
        self.busy.get()
    }
}

// =============================================================================
// Mock SFP Bus
// =============================================================================

/// Mock SFP management bus holding one 256-byte image per device address
///
/// Bytes never set read as 0xFF, like an empty cage.
#[derive(Debug, Default)]
pub struct MockSfpBus {
    images: RefCell<HashMap<u8, [u8; 256]>>,
    reads: Cell<u32>,
    fail: Cell<bool>,
}

impl MockSfpBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bytes(&self, dev: u8, reg: u8, bytes: &[u8]) {
        let mut images = self.images.borrow_mut();
        let image = images.entry(dev).or_insert([0xFF; 256]);
        for (i, b) in bytes.iter().enumerate() {
            image[(reg as usize + i) & 0xFF] = *b;
        }
    }

    /// Module EEPROM with the given rate byte and transceiver code
    pub fn insert_module(&self, rate: u8, transceiver: u8) {
        self.set_bytes(0x50, 0, &[0x03; 40]);
        self.set_bytes(0x50, 6, &[transceiver]);
        self.set_bytes(0x50, 12, &[rate]);
    }

    pub fn remove_module(&self) {
        self.images.borrow_mut().clear();
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn read_count(&self) -> u32 {
        self.reads.get()
    }
}

impl SfpBus for MockSfpBus {
    fn read(&mut self, dev: u8, reg: u8, buf: &mut [u8]) -> Result<()> {
        self.reads.set(self.reads.get() + 1);
        if self.fail.get() {
            return Err(IoError::I2c.into());
        }
        let images = self.images.borrow();
        for (i, b) in buf.iter_mut().enumerate() {
            *b = images
                .get(&dev)
                .map_or(0xFF, |image| image[(reg as usize + i) & 0xFF]);
        }
        Ok(())
    }
}

// =============================================================================
// Mock SFP Signals
// =============================================================================

/// Mock presence and TX disable lines
#[derive(Debug)]
pub struct MockSignals {
    present: RefCell<[bool; PORT_COUNT]>,
    tx_disabled: RefCell<[Option<bool>; PORT_COUNT]>,
    tx_log: RefCell<Vec<(u8, bool)>>,
    init_calls: Cell<u32>,
}

impl Default for MockSignals {
    fn default() -> Self {
        Self {
            present: RefCell::new([false; PORT_COUNT]),
            tx_disabled: RefCell::new([None; PORT_COUNT]),
            tx_log: RefCell::new(Vec::new()),
            init_calls: Cell::new(0),
        }
    }
}

impl MockSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_present(&self, port: u8, present: bool) {
        self.present.borrow_mut()[port as usize] = present;
    }

    pub fn tx_disabled(&self, port: u8) -> Option<bool> {
        self.tx_disabled.borrow()[port as usize]
    }

    pub fn tx_log(&self) -> Vec<(u8, bool)> {
        self.tx_log.borrow().clone()
    }

    pub fn init_calls(&self) -> u32 {
        self.init_calls.get()
    }
}

impl SfpSignals for MockSignals {
    fn init<M: MdioBus>(&mut self, _mdio: &mut M) -> Result<()> {
        self.init_calls.set(self.init_calls.get() + 1);
        Ok(())
    }

    fn module_present<M: MdioBus>(&mut self, port: u8, _mdio: &mut M) -> Result<bool> {
        Ok(self.present.borrow()[port as usize])
    }

    fn set_tx_disable(&mut self, port: u8, disable: bool) -> Result<()> {
        self.tx_disabled.borrow_mut()[port as usize] = Some(disable);
        self.tx_log.borrow_mut().push((port, disable));
        Ok(())
    }
}

// =============================================================================
// Recording Event Sink
// =============================================================================

/// Link event as seen by a consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Up(u8),
    Down(u8),
}

/// Event sink that records every link transition
#[derive(Debug, Default)]
pub struct RecordingEvents {
    events: Vec<LinkEvent>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[LinkEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl LinkEvents for RecordingEvents {
    fn link_up(&mut self, port: u8) {
        self.events.push(LinkEvent::Up(port));
    }

    fn link_down(&mut self, port: u8) {
        self.events.push(LinkEvent::Down(port));
    }
}

// =============================================================================
// Mock System Control
// =============================================================================

/// Counts reboot and hang requests instead of acting on them
#[derive(Debug, Default)]
pub struct MockSystemControl {
    pub reboots: u32,
    pub hangs: u32,
}

impl SystemControl for MockSystemControl {
    fn reboot(&mut self) {
        self.reboots += 1;
    }

    fn hang(&mut self) {
        self.hangs += 1;
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// PHY address shorthand for tests
pub const fn phy(controller: u8, addr: u8) -> PhyAddr {
    PhyAddr { controller, addr }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::delay::DelayNs;

    #[test]
    fn mock_bus_sequences_then_storage() {
        let mut bus = MockRegisterBus::new();
        bus.set(Reg(0x10), 7);
        bus.push_reads(Reg(0x10), &[1, 2]);
        assert_eq!(bus.read(Reg(0x10)), 1);
        assert_eq!(bus.read(Reg(0x10)), 2);
        assert_eq!(bus.read(Reg(0x10)), 7);
    }

    #[test]
    fn mock_bus_self_clearing_and_stuck_bits() {
        let mut bus = MockRegisterBus::new();
        bus.self_clear(Reg(0x20), 0x1);
        bus.stick_bits(Reg(0x24), 0x8);
        bus.write(Reg(0x20), 0x3);
        bus.write(Reg(0x24), 0x0);
        assert_eq!(bus.read(Reg(0x20)), 0x2);
        assert_eq!(bus.read(Reg(0x24)), 0x8);
        assert_eq!(bus.writes(), vec![(Reg(0x20), 0x3), (Reg(0x24), 0x0)]);
    }

    #[test]
    fn mock_mdio_pages_are_separate() {
        let mut mdio = MockMdioBus::new();
        let p = phy(1, 0);
        mdio.set_paged_register(p, page::GP, 15, 0x0002);
        assert_eq!(mdio.read(p, 15).unwrap(), 0);
        mdio.write(p, vsc_reg::PAGE, page::GP).unwrap();
        assert_eq!(mdio.read(p, 15).unwrap(), 0x0002);
        mdio.write(p, vsc_reg::PAGE, page::STD).unwrap();
        assert_eq!(mdio.current_page(p), page::STD);
    }

    #[test]
    fn mock_delay_tracking() {
        let mut delay = MockDelay::new();

        delay.delay_ns(1000);
        delay.delay_ns(2000);

        assert_eq!(delay.total_ns(), 3000);
        assert_eq!(delay.total_ms(), 0); // Less than 1ms

        delay.delay_ms(2);
        assert_eq!(delay.total_ms(), 2);
        assert_eq!(delay.calls_ms(), vec![0, 0, 2]);
    }

    #[test]
    fn mock_clock_steps_on_read() {
        let clock = MockClock::with_step(5);
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(clock.now_ms(), 5);
        clock.advance(10);
        assert_eq!(clock.now_ms(), 20);
    }
}
