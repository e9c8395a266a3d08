//! MAC table maintenance
//!
//! Learning is done by hardware. Software only clears the table at boot,
//! sets the automatic aging period and ages out the entries of a port whose
//! link went down.

use super::error::HardwareResult;
use super::switch::Switch;
use crate::hal::clock::{Clock, poll_until};
use crate::hal::regio::RegisterBus;
use crate::internal::constants::HW_CMD_TIMEOUT_MS;
use crate::internal::register::ana::{self, anagefil, autoage, macaccess};

/// MACACCESS commands
const CMD_AGE: u32 = 3;
const CMD_CLEAR: u32 = 5;

impl<B: RegisterBus, C: Clock> Switch<B, C> {
    fn mac_table_command(&mut self, cmd: u32) -> HardwareResult<()> {
        let (bus, clock) = self.bus_and_clock();
        bus.write(ana::MACACCESS, macaccess::cmd(cmd));
        poll_until(clock, HW_CMD_TIMEOUT_MS, || {
            bus.read(ana::MACACCESS) & macaccess::CMD_MASK == 0
        })
    }

    /// Remove every entry from the MAC table
    pub fn clear_mac_table(&mut self) -> HardwareResult<()> {
        self.mac_table_command(CMD_CLEAR)
    }

    /// Run one aging pass restricted to entries learned on `port`
    pub fn age_port(&mut self, port: u8) -> HardwareResult<()> {
        self.bus_mut().write(
            ana::ANAGEFIL,
            anagefil::PID_EN | anagefil::pid_val(u32::from(port)),
        );
        let result = self.mac_table_command(CMD_AGE);
        self.bus_mut().write(ana::ANAGEFIL, 0);
        result
    }

    /// Remove all entries learned on `port`
    ///
    /// An entry survives one aging pass, so two are run. A pass that never
    /// completes is logged; the port still goes down.
    pub fn flush_port(&mut self, port: u8) {
        for _ in 0..2 {
            if self.age_port(port).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("port {}: MAC table aging timeout", port);
            }
        }
    }

    /// Set the MAC table age time
    ///
    /// Hardware ages an entry after two periods without traffic.
    pub fn set_age_time(&mut self, seconds: u32) {
        self.bus_mut()
            .write(ana::AUTOAGE, autoage::age_period(seconds / 2));
        self.config_mut().age_time_s = seconds;
    }
}
