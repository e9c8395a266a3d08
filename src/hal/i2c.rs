//! SFP management bus
//!
//! SFP modules answer on two I2C addresses: the identification EEPROM at
//! [`SFP_EEPROM_ADDR`] and, on copper SFPs, the module PHY at
//! [`SFP_PHY_ADDR`]. The bus driver itself lives outside this crate; it only
//! needs to implement [`SfpBus`].

use crate::driver::error::{IoError, Result};

/// SFP identification EEPROM (SFF-8472 A0h)
pub const SFP_EEPROM_ADDR: u8 = 0x50;

/// Copper SFP module PHY
pub const SFP_PHY_ADDR: u8 = 0x56;

/// Byte-addressed reads from an SFP cage
pub trait SfpBus {
    /// Read `buf.len()` bytes from `dev` starting at register `reg`
    fn read(&mut self, dev: u8, reg: u8, buf: &mut [u8]) -> Result<()>;
}

impl<T: SfpBus + ?Sized> SfpBus for &mut T {
    fn read(&mut self, dev: u8, reg: u8, buf: &mut [u8]) -> Result<()> {
        (**self).read(dev, reg, buf)
    }
}

/// Read and reject an all-0xFF answer, which is what an empty cage returns
pub fn read_checked<I: SfpBus + ?Sized>(bus: &mut I, dev: u8, reg: u8, buf: &mut [u8]) -> Result<()> {
    bus.read(dev, reg, buf)?;
    if buf.iter().all(|&b| b == 0xFF) {
        return Err(IoError::I2c.into());
    }
    Ok(())
}
