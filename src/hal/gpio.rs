//! Switch GPIO and Serial GPIO access
//!
//! The switch exposes 32 parallel GPIOs in the general configuration block
//! plus a serial GPIO (SGPIO) chain of up to 32 positions with four bits
//! each. Board glue uses them for SFP presence and TX disable lines.
//!
//! | Operation | Registers |
//! |-----------|-----------|
//! | [`gpio_set_mode`] | GPIO_INTR_ENA, GPIO_ALT, GPIO_OE |
//! | [`gpio_write`] | GPIO_OUT_SET / GPIO_OUT_CLR |
//! | [`gpio_read`] | GPIO_IN |
//! | [`sgpio_read`] | SIO_INPUT_DATA |
//! | [`sgpio_write`] | SIO_PORT_CONFIG |

use crate::hal::regio::RegisterBus;
use crate::internal::register::gcb;

/// Number of parallel GPIOs
pub const GPIO_COUNT: u8 = 32;

/// GPIO pin direction / function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioMode {
    /// Plain input
    Input,
    /// Plain output
    Output,
    /// Alternate function 1
    Alt0,
}

/// Serial GPIO output drive mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SgpioMode {
    /// Driven low
    Off = 0,
    /// Driven high
    On = 1,
}

/// Configure a GPIO's direction or alternate function
///
/// The pin's interrupt is disabled first.
pub fn gpio_set_mode<B: RegisterBus + ?Sized>(bus: &mut B, gpio: u8, mode: GpioMode) {
    let bit = 1u32 << (gpio % GPIO_COUNT);
    bus.clear_bits(gcb::GPIO_INTR_ENA, bit);
    match mode {
        GpioMode::Input | GpioMode::Output => {
            bus.clear_bits(gcb::gpio_alt(0), bit);
            bus.clear_bits(gcb::gpio_alt(1), bit);
            if mode == GpioMode::Output {
                bus.set_bits(gcb::GPIO_OE, bit);
            } else {
                bus.clear_bits(gcb::GPIO_OE, bit);
            }
        }
        GpioMode::Alt0 => {
            bus.set_bits(gcb::gpio_alt(0), bit);
            bus.clear_bits(gcb::gpio_alt(1), bit);
        }
    }
}

/// Drive a GPIO output
pub fn gpio_write<B: RegisterBus + ?Sized>(bus: &mut B, gpio: u8, high: bool) {
    let bit = 1u32 << (gpio % GPIO_COUNT);
    if high {
        bus.write(gcb::GPIO_OUT_SET, bit);
    } else {
        bus.write(gcb::GPIO_OUT_CLR, bit);
    }
}

/// Sample a GPIO input
pub fn gpio_read<B: RegisterBus + ?Sized>(bus: &mut B, gpio: u8) -> bool {
    bus.read(gcb::GPIO_IN) & (1 << (gpio % GPIO_COUNT)) != 0
}

/// Sample serial GPIO position `sgpio`, bit `bit`
pub fn sgpio_read<B: RegisterBus + ?Sized>(bus: &mut B, sgpio: u8, bit: u8) -> bool {
    bus.read(gcb::sio_input_data(u32::from(bit))) & (1 << (sgpio % 32)) != 0
}

/// Set the output mode of serial GPIO position `sgpio`, bit `bit`
pub fn sgpio_write<B: RegisterBus + ?Sized>(bus: &mut B, sgpio: u8, bit: u8, mode: SgpioMode) {
    let shift = u32::from(bit) * gcb::SIO_BIT_WIDTH;
    bus.write_masked(
        gcb::sio_port_config(u32::from(sgpio)),
        (mode as u32) << shift,
        0x7 << shift,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockRegisterBus;

    #[test]
    fn output_mode_enables_driver_and_clears_alt() {
        let mut bus = MockRegisterBus::new();
        bus.set(gcb::gpio_alt(0), 1 << 15);
        bus.set(gcb::GPIO_INTR_ENA, 1 << 15);
        gpio_set_mode(&mut bus, 15, GpioMode::Output);
        assert_eq!(bus.get(gcb::GPIO_OE), 1 << 15);
        assert_eq!(bus.get(gcb::gpio_alt(0)), 0);
        assert_eq!(bus.get(gcb::GPIO_INTR_ENA), 0);
    }

    #[test]
    fn input_mode_releases_driver() {
        let mut bus = MockRegisterBus::new();
        bus.set(gcb::GPIO_OE, 0xFFFF_FFFF);
        gpio_set_mode(&mut bus, 3, GpioMode::Input);
        assert_eq!(bus.get(gcb::GPIO_OE), !(1 << 3));
    }

    #[test]
    fn gpio_write_uses_set_and_clear_registers() {
        let mut bus = MockRegisterBus::new();
        gpio_write(&mut bus, 15, true);
        gpio_write(&mut bus, 15, false);
        assert_eq!(
            bus.writes(),
            [(gcb::GPIO_OUT_SET, 1 << 15), (gcb::GPIO_OUT_CLR, 1 << 15)]
        );
    }

    #[test]
    fn sgpio_read_selects_bit_plane() {
        let mut bus = MockRegisterBus::new();
        bus.set(gcb::sio_input_data(1), 1 << 26);
        assert!(sgpio_read(&mut bus, 26, 1));
        assert!(!sgpio_read(&mut bus, 27, 1));
        assert!(!sgpio_read(&mut bus, 26, 0));
    }

    #[test]
    fn sgpio_write_touches_only_its_field() {
        let mut bus = MockRegisterBus::new();
        bus.set(gcb::sio_port_config(30), 0xFFF);
        sgpio_write(&mut bus, 30, 0, SgpioMode::Off);
        assert_eq!(bus.get(gcb::sio_port_config(30)), 0xFF8);
        sgpio_write(&mut bus, 30, 1, SgpioMode::On);
        assert_eq!(bus.get(gcb::sio_port_config(30)), 0xFC8);
    }
}
