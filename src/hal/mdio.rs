//! MDIO (Management Data Input/Output) HAL
//!
//! PHYs hang off the switch's two MIIM controllers: controller 0 reaches the
//! internal 12-port PHY block, controller 1 the external PHYs. A PHY is
//! therefore addressed by the pair ([`PhyAddr`]) rather than a bare 5-bit
//! address.
//!
//! [`MiimController`] implements [`MdioBus`] on top of the GCB MIIM
//! registers. [`MdioExt`] adds the masked write, page select and Clause 45
//! indirect read every PHY driver here needs.

use crate::driver::error::{ConfigError, IoError, Result};
use crate::hal::clock::{Clock, poll_until};
use crate::hal::regio::RegisterBus;
use crate::internal::constants::HW_CMD_TIMEOUT_MS;
use crate::internal::phy_regs::standard::{mmd, phy_reg};
use crate::internal::phy_regs::vsc::vsc_reg;
use crate::internal::register::gcb;

// =============================================================================
// MDIO Constants
// =============================================================================

/// Maximum valid PHY address (5-bit field)
pub const MAX_PHY_ADDR: u8 = 31;

/// Maximum valid register address (5-bit field)
pub const MAX_REG_ADDR: u8 = 31;

// =============================================================================
// PHY Address
// =============================================================================

/// PHY location: MIIM controller plus 5-bit address on that controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyAddr {
    /// MIIM controller (0 or 1)
    pub controller: u8,
    /// Address on the controller (0-31)
    pub addr: u8,
}

impl PhyAddr {
    /// Create a validated PHY address
    pub const fn new(controller: u8, addr: u8) -> Result<Self> {
        if controller >= gcb::MIIM_COUNT || addr > MAX_PHY_ADDR {
            return Err(crate::driver::error::Error::Config(ConfigError::InvalidPhyAddress));
        }
        Ok(Self { controller, addr })
    }
}

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// Implemented by [`MiimController`] on hardware and by mocks in tests, so
/// the PHY driver and the port state machine never touch MIIM registers.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy: PhyAddr, reg: u8) -> Result<u16>;

    /// Write a PHY register
    fn write(&mut self, phy: PhyAddr, reg: u8, value: u16) -> Result<()>;

    /// Check if a controller is busy
    fn is_busy(&mut self, controller: u8) -> bool;
}

impl<T: MdioBus + ?Sized> MdioBus for &mut T {
    fn read(&mut self, phy: PhyAddr, reg: u8) -> Result<u16> {
        (**self).read(phy, reg)
    }

    fn write(&mut self, phy: PhyAddr, reg: u8, value: u16) -> Result<()> {
        (**self).write(phy, reg, value)
    }

    fn is_busy(&mut self, controller: u8) -> bool {
        (**self).is_busy(controller)
    }
}

/// Helpers built from plain reads and writes
pub trait MdioExt: MdioBus {
    /// Read-modify-write: only bits set in `mask` take their value from `value`
    fn write_masked(&mut self, phy: PhyAddr, reg: u8, value: u16, mask: u16) -> Result<()> {
        let current = self.read(phy, reg)?;
        self.write(phy, reg, (current & !mask) | (value & mask))
    }

    /// Select a register page through register 31
    fn set_page(&mut self, phy: PhyAddr, page: u16) -> Result<()> {
        self.write(phy, vsc_reg::PAGE, page)
    }

    /// Clause 45 read tunnelled through Clause 22 registers 13/14
    fn mmd_read(&mut self, phy: PhyAddr, devad: u8, reg: u16) -> Result<u16> {
        let devad = u16::from(devad) & 0x1F;
        self.write(phy, phy_reg::MMD_CTRL, mmd::FUNC_ADDR | devad)?;
        self.write(phy, phy_reg::MMD_DATA, reg)?;
        self.write(phy, phy_reg::MMD_CTRL, mmd::FUNC_DATA | devad)?;
        self.read(phy, phy_reg::MMD_DATA)
    }
}

impl<T: MdioBus + ?Sized> MdioExt for T {}

// =============================================================================
// MIIM Controller
// =============================================================================

/// MDIO access through the switch's MIIM controllers
///
/// Every transfer waits for the controller to go idle first and then for
/// the command to complete, each bounded by the millisecond clock.
#[derive(Debug)]
pub struct MiimController<B: RegisterBus, C: Clock> {
    bus: B,
    clock: C,
    timeout_ms: u32,
}

impl<B: RegisterBus, C: Clock> MiimController<B, C> {
    /// Create a controller over the switch register bus
    pub fn new(bus: B, clock: C) -> Self {
        Self {
            bus,
            clock,
            timeout_ms: HW_CMD_TIMEOUT_MS,
        }
    }

    /// Set the per-transfer timeout
    pub fn set_timeout_ms(&mut self, timeout_ms: u32) {
        self.timeout_ms = timeout_ms;
    }

    /// Release the register bus
    pub fn into_inner(self) -> (B, C) {
        (self.bus, self.clock)
    }

    fn wait_not_busy(&mut self, controller: u8) -> Result<()> {
        let Self {
            bus,
            clock,
            timeout_ms,
        } = self;
        poll_until(&*clock, *timeout_ms, || {
            bus.read(gcb::mii_status(controller)) & gcb::mii_status::BUSY == 0
        })?;
        Ok(())
    }

    fn check_reg(reg: u8) -> Result<()> {
        if reg > MAX_REG_ADDR {
            return Err(ConfigError::InvalidConfig.into());
        }
        Ok(())
    }

    const fn command(phy: PhyAddr, reg: u8) -> u32 {
        gcb::mii_cmd::VLD | gcb::mii_cmd::phyad(phy.addr as u32) | gcb::mii_cmd::regad(reg as u32)
    }
}

impl<B: RegisterBus, C: Clock> MdioBus for MiimController<B, C> {
    fn read(&mut self, phy: PhyAddr, reg: u8) -> Result<u16> {
        Self::check_reg(reg)?;
        self.wait_not_busy(phy.controller)?;

        self.bus.write(
            gcb::mii_cmd(phy.controller),
            Self::command(phy, reg) | gcb::mii_cmd::OPR_READ,
        );
        self.wait_not_busy(phy.controller)?;

        let data = self.bus.read(gcb::mii_data(phy.controller));
        if data & gcb::mii_data::SUCCESS_MASK != 0 {
            return Err(IoError::Mdio.into());
        }
        Ok((data & gcb::mii_data::DATA_MASK) as u16)
    }

    fn write(&mut self, phy: PhyAddr, reg: u8, value: u16) -> Result<()> {
        Self::check_reg(reg)?;
        self.wait_not_busy(phy.controller)?;

        self.bus.write(
            gcb::mii_cmd(phy.controller),
            Self::command(phy, reg) | gcb::mii_cmd::wrdata(value as u32) | gcb::mii_cmd::OPR_WRITE,
        );
        self.wait_not_busy(phy.controller)
    }

    fn is_busy(&mut self, controller: u8) -> bool {
        self.bus.read(gcb::mii_status(controller)) & gcb::mii_status::BUSY != 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::error::{Error, HardwareError};
    use crate::test_utils::{MockClock, MockMdioBus, MockRegisterBus};

    const PHY: PhyAddr = PhyAddr {
        controller: 1,
        addr: 3,
    };

    #[test]
    fn phy_addr_validation() {
        assert!(PhyAddr::new(0, 31).is_ok());
        assert_eq!(
            PhyAddr::new(2, 0),
            Err(Error::Config(ConfigError::InvalidPhyAddress))
        );
        assert_eq!(
            PhyAddr::new(0, 32),
            Err(Error::Config(ConfigError::InvalidPhyAddress))
        );
    }

    #[test]
    fn miim_read_issues_command_and_returns_data() {
        let mut bus = MockRegisterBus::new();
        bus.set(gcb::mii_data(1), 0x1234);
        let mut miim = MiimController::new(&mut bus, MockClock::with_step(1));

        assert_eq!(miim.read(PHY, 2), Ok(0x1234));

        let cmd = bus.get(gcb::mii_cmd(1));
        assert_ne!(cmd & gcb::mii_cmd::VLD, 0);
        assert_eq!(cmd & gcb::mii_cmd::phyad(0x1F), gcb::mii_cmd::phyad(3));
        assert_eq!(cmd & gcb::mii_cmd::regad(0x1F), gcb::mii_cmd::regad(2));
        assert_eq!(cmd & (3 << 1), gcb::mii_cmd::OPR_READ);
    }

    #[test]
    fn miim_read_failure_reports_mdio_error() {
        let mut bus = MockRegisterBus::new();
        bus.set(gcb::mii_data(0), 0x0001_FFFF);
        let mut miim = MiimController::new(&mut bus, MockClock::with_step(1));
        let phy = PhyAddr::new(0, 0).unwrap();
        assert_eq!(miim.read(phy, 1), Err(Error::Io(IoError::Mdio)));
    }

    #[test]
    fn miim_write_encodes_data() {
        let mut bus = MockRegisterBus::new();
        let mut miim = MiimController::new(&mut bus, MockClock::with_step(1));
        miim.write(PHY, 4, 0x05E1).unwrap();

        let cmd = bus.get(gcb::mii_cmd(1));
        assert_eq!(cmd & gcb::mii_cmd::wrdata(0xFFFF), gcb::mii_cmd::wrdata(0x05E1));
        assert_eq!(cmd & (3 << 1), gcb::mii_cmd::OPR_WRITE);
    }

    #[test]
    fn miim_stuck_busy_times_out() {
        let mut bus = MockRegisterBus::new();
        bus.stick_bits(gcb::mii_status(0), gcb::mii_status::BUSY);
        let mut miim = MiimController::new(&mut bus, MockClock::with_step(1));
        let phy = PhyAddr::new(0, 5).unwrap();
        assert!(miim.is_busy(0));
        assert_eq!(
            miim.write(phy, 0, 0),
            Err(Error::Hardware(HardwareError::Timeout))
        );
    }

    #[test]
    fn miim_rejects_register_out_of_range() {
        let mut bus = MockRegisterBus::new();
        let mut miim = MiimController::new(&mut bus, MockClock::new());
        assert_eq!(
            miim.read(PHY, 32),
            Err(Error::Config(ConfigError::InvalidConfig))
        );
    }

    #[test]
    fn write_masked_preserves_other_bits() {
        let mut mdio = MockMdioBus::new();
        mdio.set_register(PHY, 18, 0x8001);
        mdio.write_masked(PHY, 18, 0x0040, 0x0040).unwrap();
        assert_eq!(mdio.get_register(PHY, 18), Some(0x8041));
    }

    #[test]
    fn mmd_read_uses_indirect_sequence() {
        let mut mdio = MockMdioBus::new();
        mdio.set_mmd(PHY, 7, 61, 0x0006);
        assert_eq!(mdio.mmd_read(PHY, 7, 61), Ok(0x0006));

        let writes = mdio.get_writes();
        assert_eq!(writes[0], (PHY, phy_reg::MMD_CTRL, 0x0007));
        assert_eq!(writes[1], (PHY, phy_reg::MMD_DATA, 61));
        assert_eq!(writes[2], (PHY, phy_reg::MMD_CTRL, 0x4007));
    }
}
