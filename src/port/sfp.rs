//! SFP module identification and cage signals
//!
//! [`detect_media`] picks the Serdes interface for an inserted module from
//! its identification EEPROM and, for 1G copper modules, from the module
//! PHY. [`SfpSignals`] abstracts the board's presence and TX disable lines.

use crate::driver::error::Result;
use crate::hal::i2c::{SFP_EEPROM_ADDR, SFP_PHY_ADDR, SfpBus, read_checked};
use crate::hal::mdio::MdioBus;

use super::media::MediaKind;

/// EEPROM byte: transceiver compliance codes
const EEPROM_TRANSCEIVER: u8 = 6;
/// EEPROM byte: nominal bit rate in 100 Mbit/s units
const EEPROM_RATE: u8 = 12;
/// EEPROM bytes 40-47: vendor part number
const EEPROM_VENDOR_PN: u8 = 40;

/// Copper SFP part numbers with a fixed host interface
const KNOWN_COPPER_MODULES: [(&[u8; 8], MediaKind); 2] = [
    (b"AXGT-R1T", MediaKind::Sgmii),
    (b"AXGT-R15", MediaKind::Serdes1000BaseX),
];

/// Module PHY OUI of a VSC PHY strapped for Serdes
const OUI_VSC_SERDES: u32 = 0x3F1;
/// Module PHY OUI of a Marvell PHY
const OUI_MARVELL: u32 = 0x5043;
/// Marvell host interface byte value selecting SGMII
const MARVELL_HOST_SGMII: u8 = 0x11;

/// Identify the module in an SFP cage
///
/// Unreadable or unknown modules fall back to 1000Base-X.
pub fn detect_media<I: SfpBus + ?Sized>(bus: &mut I) -> MediaKind {
    let mut rate = [0u8; 1];
    if read_checked(bus, SFP_EEPROM_ADDR, EEPROM_RATE, &mut rate).is_err() {
        return MediaKind::Serdes1000BaseX;
    }

    let media = match rate[0] {
        1..=2 => MediaKind::Fiber100Fx,
        25..=u8::MAX => MediaKind::Serdes2G5,
        10..=22 => detect_1g(bus),
        _ => {
            let mut code = [0u8; 1];
            match read_checked(bus, SFP_EEPROM_ADDR, EEPROM_TRANSCEIVER, &mut code) {
                Ok(()) if code[0] & 0x0F == 0 => MediaKind::Fiber100Fx,
                _ => MediaKind::Serdes1000BaseX,
            }
        }
    };

    #[cfg(feature = "defmt")]
    defmt::debug!("sfp: rate {} -> {}", rate[0], media);

    media
}

fn detect_1g<I: SfpBus + ?Sized>(bus: &mut I) -> MediaKind {
    let mut pn = [0u8; 8];
    if read_checked(bus, SFP_EEPROM_ADDR, EEPROM_VENDOR_PN, &mut pn).is_ok() {
        if let Some((_, media)) = KNOWN_COPPER_MODULES.iter().find(|(m, _)| **m == pn) {
            return *media;
        }
    }

    // Unknown vendor: ask the module PHY, if there is one
    let mut id = [0u8; 8];
    if read_checked(bus, SFP_PHY_ADDR, 0, &mut id).is_err() {
        return MediaKind::Serdes1000BaseX;
    }
    let id1 = u32::from(u16::from_be_bytes([id[4], id[5]]));
    let id2 = u32::from(u16::from_be_bytes([id[6], id[7]]));
    let oui = (id1 << 6) | ((id2 >> 10) & 0x3F);

    match oui {
        OUI_VSC_SERDES => MediaKind::Serdes1000BaseX,
        OUI_MARVELL => {
            let mut regs = [0u8; 22];
            let sgmii = read_checked(bus, SFP_PHY_ADDR, 0, &mut regs).is_ok()
                && read_checked(bus, SFP_PHY_ADDR, 22, &mut regs).is_ok()
                && regs[20] == MARVELL_HOST_SGMII;
            if sgmii {
                MediaKind::Sgmii
            } else {
                MediaKind::Serdes1000BaseX
            }
        }
        _ => MediaKind::Serdes1000BaseX,
    }
}

/// Board lines of the SFP cages
///
/// Presence may sit behind a PHY GPIO, so the MDIO bus is passed in.
pub trait SfpSignals {
    /// Configure the presence inputs and TX disable outputs
    fn init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()>;

    /// A module is seated in the cage of `port`
    fn module_present<M: MdioBus>(&mut self, port: u8, mdio: &mut M) -> Result<bool>;

    /// Drive the TX disable line of `port`
    fn set_tx_disable(&mut self, port: u8, disable: bool) -> Result<()>;
}

impl<T: SfpSignals + ?Sized> SfpSignals for &mut T {
    fn init<M: MdioBus>(&mut self, mdio: &mut M) -> Result<()> {
        (**self).init(mdio)
    }

    fn module_present<M: MdioBus>(&mut self, port: u8, mdio: &mut M) -> Result<bool> {
        (**self).module_present(port, mdio)
    }

    fn set_tx_disable(&mut self, port: u8, disable: bool) -> Result<()> {
        (**self).set_tx_disable(port, disable)
    }
}

/// Boards without SFP cages
impl SfpSignals for () {
    fn init<M: MdioBus>(&mut self, _mdio: &mut M) -> Result<()> {
        Ok(())
    }

    fn module_present<M: MdioBus>(&mut self, _port: u8, _mdio: &mut M) -> Result<bool> {
        Ok(false)
    }

    fn set_tx_disable(&mut self, _port: u8, _disable: bool) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockSfpBus;

    #[test]
    fn empty_cage_falls_back_to_1000basex() {
        let mut bus = MockSfpBus::new();
        assert_eq!(detect_media(&mut bus), MediaKind::Serdes1000BaseX);
        assert_eq!(bus.read_count(), 1);
    }

    #[test]
    fn bus_error_falls_back_to_1000basex() {
        let mut bus = MockSfpBus::new();
        bus.insert_module(1, 0);
        bus.set_fail(true);
        assert_eq!(detect_media(&mut bus), MediaKind::Serdes1000BaseX);
    }

    #[test]
    fn rate_class_selects_media() {
        let mut bus = MockSfpBus::new();
        bus.insert_module(1, 0x03);
        assert_eq!(detect_media(&mut bus), MediaKind::Fiber100Fx);
        bus.insert_module(25, 0x03);
        assert_eq!(detect_media(&mut bus), MediaKind::Serdes2G5);
        bus.insert_module(13, 0x03);
        assert_eq!(detect_media(&mut bus), MediaKind::Serdes1000BaseX);
    }

    #[test]
    fn other_rates_use_transceiver_code() {
        let mut bus = MockSfpBus::new();
        bus.insert_module(5, 0x10);
        assert_eq!(detect_media(&mut bus), MediaKind::Fiber100Fx);
        bus.insert_module(5, 0x01);
        assert_eq!(detect_media(&mut bus), MediaKind::Serdes1000BaseX);
    }

    #[test]
    fn known_copper_part_numbers() {
        let mut bus = MockSfpBus::new();
        bus.insert_module(12, 0);
        bus.set_bytes(SFP_EEPROM_ADDR, EEPROM_VENDOR_PN, b"AXGT-R1T");
        assert_eq!(detect_media(&mut bus), MediaKind::Sgmii);
        bus.set_bytes(SFP_EEPROM_ADDR, EEPROM_VENDOR_PN, b"AXGT-R15");
        assert_eq!(detect_media(&mut bus), MediaKind::Serdes1000BaseX);
    }

    #[test]
    fn marvell_phy_host_mode() {
        let mut bus = MockSfpBus::new();
        bus.insert_module(12, 0);
        // PHYID 0x0141 / 0x0CC0 -> OUI 0x5043
        bus.set_bytes(SFP_PHY_ADDR, 0, &[0, 0, 0, 0, 0x01, 0x41, 0x0C, 0xC0]);
        bus.set_bytes(SFP_PHY_ADDR, 8, &[0; 14]);
        bus.set_bytes(SFP_PHY_ADDR, 22, &[0; 22]);
        bus.set_bytes(SFP_PHY_ADDR, 42, &[MARVELL_HOST_SGMII]);
        assert_eq!(detect_media(&mut bus), MediaKind::Sgmii);

        bus.set_bytes(SFP_PHY_ADDR, 42, &[0x00]);
        assert_eq!(detect_media(&mut bus), MediaKind::Serdes1000BaseX);
    }

    #[test]
    fn vsc_phy_runs_serdes() {
        let mut bus = MockSfpBus::new();
        bus.insert_module(12, 0);
        // OUI 0x3F1 -> PHYID1 0x000F, PHYID2 top bits 0b110001
        bus.set_bytes(SFP_PHY_ADDR, 0, &[0, 0, 0, 0, 0x00, 0x0F, 0xC4, 0x00]);
        assert_eq!(detect_media(&mut bus), MediaKind::Serdes1000BaseX);
    }
}
