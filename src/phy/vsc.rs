//! VSC copper PHY driver
//!
//! Driver for the 12-port internal PHY blocks of the Luton26 and the
//! matching external quad PHYs behind QSGMII. All of them share the IEEE
//! register set plus the vendor registers in
//! [`crate::internal::phy_regs::vsc`].
//!
//! The driver is stateless: every method takes the MDIO bus and works on the
//! PHY address the driver was created with.
//!
//! # Link mode decoding
//!
//! | Source | Bits |
//! |--------|------|
//! | Aux status (28) [4:3] | speed: 00 = 10M, 01 = 100M, 10 = 1000M, 11 = 10M |
//! | Aux status (28) [5] | full duplex |
//! | Partner ability (5) [10] | pause |
//! | MMD 7.61 [1] / [2] | partner EEE at 100M / 1000M (full duplex only) |

use crate::driver::error::{HardwareError, Result};
use crate::hal::clock::{Clock, poll_until};
use crate::hal::mdio::{MdioBus, MdioExt, PhyAddr};
use crate::internal::constants::PHY_SOFT_RESET_TIMEOUT_MS;
use crate::internal::phy_regs::standard::{anar, anlpar, bmcr, bmsr, eee_adv, gbcr, mmd, phy_reg};
use crate::internal::phy_regs::vsc::{
    PHY_OUI_MSB, aux_status, ext_ctrl, page, polarity, vsc_reg,
};
use crate::port::link_mode::{Duplex, EeeCapability, LinkMode, Speed};

/// Raw aux status speed field to link speed
const PHY_SPEED_REMAP: [Speed; 4] = [Speed::Mbps10, Speed::Mbps100, Speed::Mbps1000, Speed::Mbps10];

/// VSC copper PHY at one MDIO address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VscPhy {
    addr: PhyAddr,
}

impl VscPhy {
    /// Create a driver for the PHY at `addr`
    pub const fn new(addr: PhyAddr) -> Self {
        Self { addr }
    }

    /// MDIO address of this PHY
    pub const fn address(&self) -> PhyAddr {
        self.addr
    }

    /// PHY identifier matches the VSC family
    pub fn check_id<M: MdioBus>(&self, mdio: &mut M) -> Result<bool> {
        Ok(mdio.read(self.addr, phy_reg::PHYIDR1)? == PHY_OUI_MSB)
    }

    /// Fail with [`HardwareError::PhyIdMismatch`] unless [`Self::check_id`] holds
    pub fn expect_id<M: MdioBus>(&self, mdio: &mut M) -> Result<()> {
        if self.check_id(mdio)? {
            Ok(())
        } else {
            Err(HardwareError::PhyIdMismatch.into())
        }
    }

    /// Soft reset through BMCR, bounded by the clock
    pub fn pre_reset<M: MdioBus, C: Clock + ?Sized>(&self, mdio: &mut M, clock: &C) -> Result<()> {
        mdio.write(self.addr, phy_reg::BMCR, bmcr::RESET)?;

        let mut result = Ok(());
        poll_until(clock, PHY_SOFT_RESET_TIMEOUT_MS, || {
            match mdio.read(self.addr, phy_reg::BMCR) {
                Ok(v) => v & bmcr::RESET == 0,
                Err(e) => {
                    result = Err(e);
                    true
                }
            }
        })?;
        result
    }

    /// Return to the standard register page
    pub fn select_std_page<M: MdioBus>(&self, mdio: &mut M) -> Result<()> {
        mdio.set_page(self.addr, page::STD)
    }

    /// Enable speed downshift; done once before the port state machine starts
    pub fn init<M: MdioBus>(&self, mdio: &mut M) -> Result<()> {
        mdio.write_masked(
            self.addr,
            vsc_reg::EXT_CTRL,
            ext_ctrl::SPEED_DOWNSHIFT,
            ext_ctrl::SPEED_DOWNSHIFT,
        )
    }

    /// Advertise 10/100/1000 with pause and restart negotiation
    pub fn setup_speed_mode<M: MdioBus>(&self, mdio: &mut M) -> Result<()> {
        mdio.write(self.addr, phy_reg::ANAR, anar::ALL_10_100_PAUSE)?;
        mdio.write(self.addr, phy_reg::GBCR, gbcr::ADV_1000)?;
        self.restart_aneg(mdio)
    }

    /// Enable and restart auto-negotiation
    pub fn restart_aneg<M: MdioBus>(&self, mdio: &mut M) -> Result<()> {
        mdio.write_masked(
            self.addr,
            phy_reg::BMCR,
            bmcr::AN_ENABLE | bmcr::AN_RESTART,
            bmcr::AN_ENABLE | bmcr::AN_RESTART,
        )
    }

    /// Power the PHY down
    pub fn power_down<M: MdioBus>(&self, mdio: &mut M) -> Result<()> {
        mdio.write_masked(self.addr, phy_reg::BMCR, bmcr::POWER_DOWN, bmcr::POWER_DOWN)
    }

    /// Power the PHY up and restart negotiation
    pub fn power_up<M: MdioBus>(&self, mdio: &mut M) -> Result<()> {
        mdio.write_masked(
            self.addr,
            phy_reg::BMCR,
            bmcr::AN_ENABLE | bmcr::AN_RESTART,
            bmcr::POWER_DOWN | bmcr::AN_ENABLE | bmcr::AN_RESTART,
        )
    }

    /// Link status bit of BMSR
    pub fn link_up<M: MdioBus>(&self, mdio: &mut M) -> Result<bool> {
        Ok(mdio.read(self.addr, phy_reg::BMSR)? & bmsr::LINK_STATUS != 0)
    }

    /// Negotiated speed and duplex, without pause or EEE
    pub fn speed_and_duplex<M: MdioBus>(&self, mdio: &mut M) -> Result<LinkMode> {
        let aux = mdio.read(self.addr, vsc_reg::AUX_STATUS)?;
        let speed = PHY_SPEED_REMAP[((aux >> aux_status::SPEED_SHIFT) & aux_status::SPEED_MASK) as usize];
        let duplex = if aux & aux_status::FDX != 0 {
            Duplex::Full
        } else {
            Duplex::Half
        };
        Ok(LinkMode::new(speed, duplex, false, EeeCapability::None))
    }

    /// Full link mode of an established link
    pub fn link_mode<M: MdioBus>(&self, mdio: &mut M) -> Result<LinkMode> {
        let mut mode = self.speed_and_duplex(mdio)?;
        if mdio.read(self.addr, phy_reg::ANLPAR)? & anlpar::PAUSE != 0 {
            mode = mode.with_pause();
        }
        // EEE is only defined for full duplex
        if !mode.is_fdx() {
            return Ok(mode);
        }

        let eee = mdio.mmd_read(self.addr, mmd::DEV_AN, mmd::EEE_LP_ADV)?;
        let cap = if eee & eee_adv::EEE_1000 != 0 {
            EeeCapability::Eee1000
        } else if eee & eee_adv::EEE_100 != 0 {
            EeeCapability::Eee100
        } else {
            EeeCapability::None
        };
        Ok(mode.with_eee(cap))
    }

    /// Pin MDI polarity for a 10M half duplex link
    ///
    /// Forces the polarity the PHY currently detects and stops detection,
    /// so idle periods on the wire cannot flip it.
    pub fn polarity_fix_apply<M: MdioBus>(&self, mdio: &mut M) -> Result<()> {
        let aux = mdio.read(self.addr, vsc_reg::AUX_STATUS)?;
        let force = if aux & aux_status::POL_INVERSE != 0 {
            polarity::FORCE_INVERTED
        } else {
            polarity::FORCE_NORMAL
        };
        mdio.set_page(self.addr, page::TEST)?;
        mdio.write_masked(self.addr, vsc_reg::TEST_POLARITY, force, polarity::MASK)?;
        mdio.set_page(self.addr, page::STD)?;
        mdio.write_masked(
            self.addr,
            vsc_reg::POLARITY_CTRL,
            polarity::DETECT_DISABLE,
            polarity::DETECT_DISABLE,
        )
    }

    /// Undo [`Self::polarity_fix_apply`]
    pub fn polarity_fix_clear<M: MdioBus>(&self, mdio: &mut M) -> Result<()> {
        mdio.set_page(self.addr, page::TEST)?;
        mdio.write_masked(self.addr, vsc_reg::TEST_POLARITY, polarity::AUTO, polarity::MASK)?;
        mdio.set_page(self.addr, page::STD)?;
        mdio.write_masked(self.addr, vsc_reg::POLARITY_CTRL, 0, polarity::DETECT_DISABLE)
    }
}
