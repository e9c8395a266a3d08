//! System timer and supervisor
//!
//! The firmware runs one cooperative loop. A 1 ms hardware timer interrupt
//! calls [`SystemTimer::tick`], which only raises flags; the loop in
//! [`Supervisor::run_once`] consumes them and runs the port state machines
//! and the periodic health check.
//!
//! # Example
//!
//! ```ignore
//! use ph_luton26_switch::system::{Supervisor, SystemTimer};
//!
//! static TIMER: SystemTimer = SystemTimer::new();
//!
//! #[interrupt]
//! fn TIMER0() {
//!     TIMER.tick();
//! }
//!
//! let mut supervisor = Supervisor::new(ports, board, &TIMER);
//! supervisor.boot(&mut delay)?;
//! loop {
//!     supervisor.run_once(&mut delay);
//! }
//! ```

use embedded_hal::delay::DelayNs;

use crate::driver::error::Result;
use crate::driver::rxtx::CpuRxConfig;
use crate::hal::clock::Clock;
use crate::hal::i2c::SfpBus;
use crate::hal::mdio::MdioBus;
use crate::hal::regio::RegisterBus;
use crate::internal::constants::BOOT_SETTLE_DELAY_MS;
use crate::port::events::LinkEvents;
use crate::port::manager::PortManager;
use crate::port::sfp::SfpSignals;
use crate::sync::{CriticalSectionCell, PollFlag};

/// 10 ms ticks between two link status samples
const PHY_POLL_TICKS: u8 = 10;

// =============================================================================
// Timer
// =============================================================================

/// Millisecond counter with cascaded periodic flags
///
/// Lives in a `static`; the timer interrupt calls [`Self::tick`] and the
/// main loop takes the flags. Also serves as the [`Clock`] of every bounded
/// hardware wait.
#[derive(Debug)]
pub struct SystemTimer {
    ms: CriticalSectionCell<u32>,
    /// Raised every 10 ms
    pub ms_10: PollFlag,
    /// Raised every 100 ms
    pub ms_100: PollFlag,
    /// Raised every second
    pub sec_1: PollFlag,
}

impl SystemTimer {
    /// Timer at zero with all flags lowered
    pub const fn new() -> Self {
        Self {
            ms: CriticalSectionCell::new(0),
            ms_10: PollFlag::new(),
            ms_100: PollFlag::new(),
            sec_1: PollFlag::new(),
        }
    }

    /// Advance by one millisecond; called from the 1 ms interrupt
    pub fn tick(&self) {
        let now = self.ms.with(|ms| {
            *ms = ms.wrapping_add(1);
            *ms
        });
        if now.is_multiple_of(10) {
            self.ms_10.set();
            if now.is_multiple_of(100) {
                self.ms_100.set();
                if now.is_multiple_of(1000) {
                    self.sec_1.set();
                }
            }
        }
    }
}

impl Default for SystemTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemTimer {
    fn now_ms(&self) -> u32 {
        self.ms.with(|ms| *ms)
    }
}

/// Derives the link sampling flag from the 10 ms loop ticks
#[derive(Debug, Default)]
pub struct PollTicker {
    count: u8,
    /// Raised on every tenth tick
    pub phy_poll: PollFlag,
}

impl PollTicker {
    /// Ticker with the poll flag lowered
    pub const fn new() -> Self {
        Self {
            count: 0,
            phy_poll: PollFlag::new(),
        }
    }

    /// Count one 10 ms tick
    pub fn tick(&mut self) {
        self.count += 1;
        if self.count >= PHY_POLL_TICKS {
            self.count = 0;
            self.phy_poll.set();
        }
    }
}

// =============================================================================
// System Control
// =============================================================================

/// Board level reactions to fatal conditions
pub trait SystemControl {
    /// Restart the system; does not return on hardware
    fn reboot(&mut self);

    /// Stop in a failure indication until power cycled; does not return on
    /// hardware
    fn hang(&mut self);
}

/// Health check that failed at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FatalCause {
    /// Chip id register no longer matches the board
    ChipId,
    /// A copper PHY stopped answering with its identifier
    Phy,
}

// =============================================================================
// Supervisor
// =============================================================================

/// Boot sequence and main loop body
#[derive(Debug)]
pub struct Supervisor<'t, B, C, M, I, S, E, Y>
where
    B: RegisterBus,
    C: Clock,
    M: MdioBus,
    I: SfpBus,
    S: SfpSignals,
    E: LinkEvents,
    Y: SystemControl,
{
    ports: PortManager<B, C, M, I, S, E>,
    system: Y,
    timer: &'t SystemTimer,
    ticker: PollTicker,
    fatal: Option<FatalCause>,
}

impl<'t, B, C, M, I, S, E, Y> Supervisor<'t, B, C, M, I, S, E, Y>
where
    B: RegisterBus,
    C: Clock,
    M: MdioBus,
    I: SfpBus,
    S: SfpSignals,
    E: LinkEvents,
    Y: SystemControl,
{
    /// Supervise `ports`, driven by the flags of `timer`
    pub fn new(ports: PortManager<B, C, M, I, S, E>, system: Y, timer: &'t SystemTimer) -> Self {
        Self {
            ports,
            system,
            timer,
            ticker: PollTicker::new(),
            fatal: None,
        }
    }

    /// Port manager
    pub fn ports(&self) -> &PortManager<B, C, M, I, S, E> {
        &self.ports
    }

    /// Port manager, mutably
    pub fn ports_mut(&mut self) -> &mut PortManager<B, C, M, I, S, E> {
        &mut self.ports
    }

    /// Board control
    pub fn system(&self) -> &Y {
        &self.system
    }

    /// Pending fatal condition
    pub fn fatal(&self) -> Option<FatalCause> {
        self.fatal
    }

    /// Schedule a reboot for the next loop iteration
    pub fn raise_fatal(&mut self, cause: FatalCause) {
        self.fatal = Some(cause);
    }

    /// Bring the chip, the PHYs and the port state machines up
    ///
    /// Any failure hangs the system; the error is returned for hosts where
    /// [`SystemControl::hang`] comes back.
    pub fn boot<D: DelayNs + ?Sized>(&mut self, delay: &mut D) -> Result<()> {
        delay.delay_ms(BOOT_SETTLE_DELAY_MS);
        match self.bring_up(delay) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("boot complete");
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::error!("boot failed: {}", err);
                self.system.hang();
                Err(err)
            }
        }
    }

    fn bring_up<D: DelayNs + ?Sized>(&mut self, delay: &mut D) -> Result<()> {
        let switch = self.ports.switch_mut();
        switch.post_reset(delay)?;
        switch.check_chip_id()?;
        switch.phy_hw_init(delay)?;
        switch.init_ports(delay)?;
        switch.cpu_rx_init(&CpuRxConfig::new());
        self.ports.init_states(delay)
    }

    /// One iteration of the main loop
    pub fn run_once<D: DelayNs + ?Sized>(&mut self, delay: &mut D) {
        if let Some(_cause) = self.fatal {
            #[cfg(feature = "defmt")]
            defmt::error!("fatal: {}, rebooting", _cause);
            self.ports.switch_mut().soft_reset();
            self.system.reboot();
            return;
        }

        if self.timer.ms_10.take() {
            self.ticker.tick();
            let sample = self.ticker.phy_poll.take();
            self.ports.poll(sample, delay);
        }

        if self.timer.sec_1.take() {
            self.error_check();
        }
    }

    /// Verify that the chip and the copper PHYs still answer
    ///
    /// A failure is recorded and acted on by the next [`Self::run_once`].
    pub fn error_check(&mut self) -> Option<FatalCause> {
        let cause = if self.ports.switch_mut().check_chip_id().is_err() {
            Some(FatalCause::ChipId)
        } else if self.ports.check_phys().is_err() {
            Some(FatalCause::Phy)
        } else {
            None
        };
        if let Some(cause) = cause {
            #[cfg(feature = "defmt")]
            defmt::error!("health check failed: {}", cause);
            self.fatal = Some(cause);
        }
        cause
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::config::SwitchConfig;
    use crate::driver::error::{Error, HardwareError};
    use crate::driver::switch::Switch;
    use crate::internal::phy_regs::standard::phy_reg;
    use crate::internal::constants::CPU_PORT;
    use crate::internal::register::{ana, gcb};
    use crate::port::map::Sku;
    use crate::port::state::PortState;
    use crate::test_utils::{
        LinkEvent, MockClock, MockDelay, MockMdioBus, MockRegisterBus, MockSfpBus, MockSignals,
        MockSystemControl, RecordingEvents, phy,
    };

    type TestSupervisor<'t> = Supervisor<
        't,
        MockRegisterBus,
        MockClock,
        MockMdioBus,
        MockSfpBus,
        MockSignals,
        RecordingEvents,
        MockSystemControl,
    >;

    const L25_CHIP_ID: u32 = 0x1742_20E9;

    fn supervisor(timer: &SystemTimer) -> TestSupervisor<'_> {
        let switch = Switch::new(
            MockRegisterBus::responsive(),
            MockClock::with_step(1),
            SwitchConfig::new().with_sku(Sku::L25),
        )
        .unwrap();
        switch.bus().set(gcb::CHIP_ID, L25_CHIP_ID);
        switch
            .bus()
            .stick_bits(gcb::MISC_STAT, gcb::misc_stat::PHY_READY);
        let mdio = MockMdioBus::new();
        for port in 0..24 {
            mdio.setup_vsc(switch.table().phy_addr(port).unwrap());
        }
        let ports = PortManager::new(
            switch,
            mdio,
            MockSfpBus::new(),
            MockSignals::new(),
            RecordingEvents::new(),
        );
        Supervisor::new(ports, MockSystemControl::default(), timer)
    }

    fn tick_ms(timer: &SystemTimer, ms: u32) {
        for _ in 0..ms {
            timer.tick();
        }
    }

    // =========================================================================
    // Timer
    // =========================================================================

    #[test]
    fn test_timer_cascade() {
        let timer = SystemTimer::new();
        tick_ms(&timer, 9);
        assert!(!timer.ms_10.is_set());

        tick_ms(&timer, 1);
        assert!(timer.ms_10.take());
        assert!(!timer.ms_100.is_set());

        tick_ms(&timer, 90);
        assert!(timer.ms_100.take());
        assert!(!timer.sec_1.is_set());

        tick_ms(&timer, 900);
        assert!(timer.sec_1.take());
        assert_eq!(timer.now_ms(), 1000);
    }

    #[test]
    fn test_ticker_every_tenth() {
        let mut ticker = PollTicker::new();
        for _ in 0..9 {
            ticker.tick();
            assert!(!ticker.phy_poll.take());
        }
        ticker.tick();
        assert!(ticker.phy_poll.take());
        for _ in 0..9 {
            ticker.tick();
        }
        assert!(!ticker.phy_poll.is_set());
    }

    // =========================================================================
    // Boot
    // =========================================================================

    #[test]
    fn test_boot_starts_state_machines() {
        let timer = SystemTimer::new();
        let mut sup = supervisor(&timer);
        let mut delay = MockDelay::new();
        sup.boot(&mut delay).unwrap();

        assert_eq!(sup.system().hangs, 0);
        assert_eq!(sup.ports().state(0), PortState::SetupSpeedMode);
        assert_eq!(sup.ports().state(25), PortState::SigSetup);
        assert_eq!(delay.calls_ms()[0], 20);
        let bus = sup.ports().switch().bus();
        assert_eq!(bus.get(ana::pgid(CPU_PORT as u32)), 1 << CPU_PORT);
        assert_eq!(
            bus.get(ana::port_cfg(CPU_PORT)),
            ana::port_cfg::RECV_ENA
        );
    }

    #[test]
    fn test_boot_hangs_on_wrong_chip() {
        let timer = SystemTimer::new();
        let mut sup = supervisor(&timer);
        sup.ports().switch().bus().set(gcb::CHIP_ID, 0x0742_10E9);
        let mut delay = MockDelay::new();
        assert_eq!(
            sup.boot(&mut delay),
            Err(Error::Hardware(HardwareError::ChipIdMismatch))
        );
        assert_eq!(sup.system().hangs, 1);
        assert_eq!(sup.ports().state(0), PortState::Disabled);
    }

    #[test]
    fn test_boot_hangs_on_missing_phy() {
        let timer = SystemTimer::new();
        let mut sup = supervisor(&timer);
        sup.ports().mdio().set_register(phy(0, 4), phy_reg::PHYIDR1, 0);
        let mut delay = MockDelay::new();
        assert!(sup.boot(&mut delay).is_err());
        assert_eq!(sup.system().hangs, 1);
    }

    // =========================================================================
    // Main Loop
    // =========================================================================

    #[test]
    fn test_loop_samples_links_every_100ms() {
        let timer = SystemTimer::new();
        let mut sup = supervisor(&timer);
        let mut delay = MockDelay::new();
        sup.boot(&mut delay).unwrap();

        // First 10 ms pass leaves copper ports waiting for link
        tick_ms(&timer, 10);
        sup.run_once(&mut delay);
        assert_eq!(sup.ports().state(2), PortState::WaitingForLink);

        sup.ports().mdio().simulate_link_up(phy(0, 2), 0x28, 0);
        for _ in 0..8 {
            tick_ms(&timer, 10);
            sup.run_once(&mut delay);
        }
        assert_eq!(sup.ports().state(2), PortState::WaitingForLink);

        tick_ms(&timer, 10);
        sup.run_once(&mut delay);
        assert_eq!(sup.ports().state(2), PortState::LinkUp);
        assert_eq!(sup.ports().events().events(), [LinkEvent::Up(2)]);
    }

    #[test]
    fn test_loop_idle_without_ticks() {
        let timer = SystemTimer::new();
        let mut sup = supervisor(&timer);
        let mut delay = MockDelay::new();
        sup.boot(&mut delay).unwrap();
        for _ in 0..50 {
            sup.run_once(&mut delay);
        }
        assert_eq!(sup.ports().state(0), PortState::SetupSpeedMode);
    }

    #[test]
    fn test_health_check_reboots() {
        let timer = SystemTimer::new();
        let mut sup = supervisor(&timer);
        let mut delay = MockDelay::new();
        sup.boot(&mut delay).unwrap();

        tick_ms(&timer, 1000);
        sup.run_once(&mut delay);
        assert_eq!(sup.fatal(), None);

        sup.ports().mdio().set_register(phy(1, 3), phy_reg::PHYIDR1, 0x1234);
        tick_ms(&timer, 1000);
        sup.run_once(&mut delay);
        assert_eq!(sup.fatal(), Some(FatalCause::Phy));
        assert_eq!(sup.system().reboots, 0);

        sup.run_once(&mut delay);
        assert_eq!(sup.system().reboots, 1);
        assert_ne!(
            sup.ports().switch().bus().get(gcb::SOFT_CHIP_RST) & gcb::soft_chip_rst::SOFT_CHIP_RST,
            0
        );
    }

    #[test]
    fn test_chip_id_loss_is_fatal() {
        let timer = SystemTimer::new();
        let mut sup = supervisor(&timer);
        let mut delay = MockDelay::new();
        sup.boot(&mut delay).unwrap();
        sup.ports().switch().bus().set(gcb::CHIP_ID, 0);
        assert_eq!(sup.error_check(), Some(FatalCause::ChipId));
    }
}
