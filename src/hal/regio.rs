//! Switch register access layer
//!
//! All switch configuration goes through the [`RegisterBus`] trait. The
//! production implementation, [`MmioBus`], performs volatile 32-bit accesses
//! onto the memory-mapped register window and brackets every single access in
//! a critical section, so the 1 ms timer interrupt can never observe a
//! half-finished read-modify-write.
//!
//! Multi-register sequences (port setup, Serdes programming) are not atomic
//! as a whole and must only run from the main polling loop.

// =============================================================================
// Register Address
// =============================================================================

/// Byte offset of a 32-bit switch register relative to the register window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reg(pub u32);

impl Reg {
    /// Create a register address from a target base and word index
    #[inline(always)]
    pub const fn at(base: u32, word: u32) -> Self {
        Self(base + word * 4)
    }

    /// Byte offset of the register
    #[inline(always)]
    pub const fn offset(self) -> u32 {
        self.0
    }
}

// =============================================================================
// Register Bus Trait
// =============================================================================

/// Trait for switch register access
///
/// Implementors provide raw word reads and writes. The masked variants are
/// provided on top of them.
pub trait RegisterBus {
    /// Read a 32-bit register
    fn read(&mut self, reg: Reg) -> u32;

    /// Write a 32-bit register
    fn write(&mut self, reg: Reg, value: u32);

    /// Read-modify-write: only bits set in `mask` take their value from `value`
    fn write_masked(&mut self, reg: Reg, value: u32, mask: u32) {
        let current = self.read(reg);
        self.write(reg, (current & !mask) | (value & mask));
    }

    /// Set bits in a register
    fn set_bits(&mut self, reg: Reg, bits: u32) {
        self.write_masked(reg, bits, bits);
    }

    /// Clear bits in a register
    fn clear_bits(&mut self, reg: Reg, bits: u32) {
        self.write_masked(reg, 0, bits);
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    fn read(&mut self, reg: Reg) -> u32 {
        (**self).read(reg)
    }

    fn write(&mut self, reg: Reg, value: u32) {
        (**self).write(reg, value);
    }

    fn write_masked(&mut self, reg: Reg, value: u32, mask: u32) {
        (**self).write_masked(reg, value, mask);
    }
}

// =============================================================================
// Memory-Mapped Implementation
// =============================================================================

/// Memory-mapped register bus
#[derive(Debug)]
pub struct MmioBus {
    base: usize,
}

impl MmioBus {
    /// Create a bus over the switch register window at `base`
    ///
    /// # Safety
    ///
    /// `base` must be the start of the switch register window, valid for
    /// volatile 32-bit accesses at every offset produced by the register map.
    /// Several instances may cover the window (the switch, the MIIM
    /// controllers and the board signals each own one) as long as all of
    /// them are driven from the main loop only.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[inline(always)]
    fn addr(&self, reg: Reg) -> usize {
        self.base + reg.offset() as usize
    }
}

impl RegisterBus for MmioBus {
    fn read(&mut self, reg: Reg) -> u32 {
        let addr = self.addr(reg);
        critical_section::with(|_| {
            // SAFETY: the constructor contract guarantees the window is valid
            unsafe { core::ptr::read_volatile(addr as *const u32) }
        })
    }

    fn write(&mut self, reg: Reg, value: u32) {
        let addr = self.addr(reg);
        critical_section::with(|_| {
            // SAFETY: the constructor contract guarantees the window is valid
            unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
        });
    }

    fn write_masked(&mut self, reg: Reg, value: u32, mask: u32) {
        let addr = self.addr(reg);
        // The whole read-modify-write runs with interrupts masked
        critical_section::with(|_| {
            // SAFETY: the constructor contract guarantees the window is valid
            unsafe {
                let current = core::ptr::read_volatile(addr as *const u32);
                core::ptr::write_volatile(addr as *mut u32, (current & !mask) | (value & mask));
            }
        });
    }
}
