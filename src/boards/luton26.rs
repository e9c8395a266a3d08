//! Luton26 reference boards
//!
//! SFP cage wiring of the boards built around the chip. The L25 board
//! reads module presence through a GPIO of the external PHY behind port 12
//! and gates the transmitter with chip GPIO 15. The L10 board routes both
//! cages through the serial GPIO chain. The L16 board has no cages.

use crate::driver::error::Result;
use crate::hal::gpio::{GpioMode, SgpioMode, gpio_set_mode, gpio_write, sgpio_read, sgpio_write};
use crate::hal::mdio::{MdioBus, MdioExt, PhyAddr};
use crate::hal::regio::RegisterBus;
use crate::internal::phy_regs::vsc::{page, sfp_gpio, vsc_reg};
use crate::port::map::Sku;
use crate::port::sfp::SfpSignals;

/// L25: PHY whose GP page carries the presence input
pub const L25_SFP_GPIO_PHY: PhyAddr = PhyAddr {
    controller: 1,
    addr: 0,
};

/// L25: chip GPIO driving TX disable of the cage on port 25
pub const L25_SFP_TX_DISABLE_GPIO: u8 = 15;

/// L10: SGPIO positions of the presence inputs for ports 24 and 25
pub const L10_SFP_PRESENT_SGPIO: [u8; 2] = [26, 27];

/// L10: SGPIO positions of the TX disable outputs for ports 24 and 25
pub const L10_SFP_TX_DISABLE_SGPIO: [u8; 2] = [30, 31];

/// Serial GPIO bit carrying presence (active low)
const SGPIO_PRESENT_BIT: u8 = 1;

/// Serial GPIO bit carrying TX disable
const SGPIO_TX_BIT: u8 = 0;

/// SFP cage signals wired to switch and PHY GPIOs
///
/// Owns a register bus instance of its own; the switch core keeps another.
#[derive(Debug)]
pub struct SwitchGpioSignals<B: RegisterBus> {
    bus: B,
    sku: Sku,
}

impl<B: RegisterBus> SwitchGpioSignals<B> {
    /// Signals of the `sku` board
    pub fn new(bus: B, sku: Sku) -> Self {
        Self { bus, sku }
    }

    /// Register bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Release the register bus
    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Index of an L10 cage
    fn l10_cage(port: u8) -> Option<usize> {
        match port {
            24 => Some(0),
            25 => Some(1),
            _ => None,
        }
    }
}

impl<B: RegisterBus> SfpSignals for SwitchGpioSignals<B> {
    fn init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        match self.sku {
            Sku::L25 => {
                let phy = L25_SFP_GPIO_PHY;
                mdio.set_page(phy, page::GP)?;
                mdio.write_masked(
                    phy,
                    vsc_reg::GP_GPIO_CTRL,
                    sfp_gpio::CTRL_GPIO_FUNC,
                    sfp_gpio::CTRL_GPIO_FUNC,
                )?;
                mdio.write_masked(
                    phy,
                    vsc_reg::GP_GPIO_DIR,
                    sfp_gpio::DIR_VALUE,
                    sfp_gpio::DIR_MASK,
                )?;
                mdio.set_page(phy, page::STD)?;

                gpio_set_mode(&mut self.bus, L25_SFP_TX_DISABLE_GPIO, GpioMode::Output);
                gpio_write(&mut self.bus, L25_SFP_TX_DISABLE_GPIO, true);
            }
            Sku::L10 => {
                for sgpio in L10_SFP_TX_DISABLE_SGPIO {
                    sgpio_write(&mut self.bus, sgpio, SGPIO_TX_BIT, SgpioMode::Off);
                }
            }
            Sku::L16 => {}
        }
        Ok(())
    }

    fn module_present<M: MdioBus>(&mut self, port: u8, mdio: &mut M) -> Result<bool> {
        match self.sku {
            Sku::L25 if port == 25 => {
                let phy = L25_SFP_GPIO_PHY;
                mdio.set_page(phy, page::GP)?;
                let input = mdio.read(phy, vsc_reg::GP_GPIO_IN);
                mdio.set_page(phy, page::STD)?;
                Ok(input? & sfp_gpio::MODULE_ABSENT == 0)
            }
            Sku::L10 => Ok(Self::l10_cage(port).is_some_and(|cage| {
                !sgpio_read(&mut self.bus, L10_SFP_PRESENT_SGPIO[cage], SGPIO_PRESENT_BIT)
            })),
            _ => Ok(false),
        }
    }

    fn set_tx_disable(&mut self, port: u8, disable: bool) -> Result<()> {
        match self.sku {
            Sku::L25 if port == 25 => {
                gpio_write(&mut self.bus, L25_SFP_TX_DISABLE_GPIO, disable);
            }
            Sku::L10 => {
                if let Some(cage) = Self::l10_cage(port) {
                    let mode = if disable {
                        SgpioMode::On
                    } else {
                        SgpioMode::Off
                    };
                    sgpio_write(&mut self.bus, L10_SFP_TX_DISABLE_SGPIO[cage], SGPIO_TX_BIT, mode);
                }
            }
            _ => {}
        }
        Ok(())
    }
}
