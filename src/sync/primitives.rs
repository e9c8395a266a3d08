//! Synchronization primitives for ISR-safe access.
//!
//! The timer interrupt raises flags that the main loop consumes.

use core::cell::RefCell;
use critical_section::Mutex;

/// Cell providing interior mutability with critical section protection.
///
/// Combines `critical_section::Mutex` with `RefCell` for safe mutable access
/// from both normal code and interrupt handlers.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Create a new cell (const, suitable for static initialization).
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Execute a closure with exclusive mutable access.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow_ref_mut(cs);
            f(&mut value)
        })
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .try_borrow_mut()
                .ok()
                .map(|mut value| f(&mut value))
        })
    }
}

// SAFETY: CriticalSectionCell uses critical sections to protect all access.
unsafe impl<T> Sync for CriticalSectionCell<T> {}

impl<T: core::fmt::Debug + Copy> core::fmt::Debug for CriticalSectionCell<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let value = self.with(|v| *v);
        f.debug_tuple("CriticalSectionCell").field(&value).finish()
    }
}

/// Event flag raised from interrupt context and consumed by the main loop
///
/// Raising an already raised flag is not counted: a main loop that falls
/// behind sees one event, not a backlog.
#[derive(Debug)]
pub struct PollFlag {
    raised: CriticalSectionCell<bool>,
}

impl PollFlag {
    /// Create a lowered flag (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            raised: CriticalSectionCell::new(false),
        }
    }

    /// Raise the flag
    #[inline]
    pub fn set(&self) {
        self.raised.with(|raised| *raised = true);
    }

    /// Lower the flag, returning whether it was raised
    #[inline]
    pub fn take(&self) -> bool {
        self.raised.with(|raised| core::mem::replace(raised, false))
    }

    /// Peek without consuming
    pub fn is_set(&self) -> bool {
        self.raised.with(|raised| *raised)
    }
}

impl Default for PollFlag {
    fn default() -> Self {
        Self::new()
    }
}
