//! Millisecond clock and bounded waits
//!
//! Every hardware wait in the switch core is bounded: it either observes its
//! condition or gives up once a [`Deadline`] expires. Nothing here sleeps;
//! the caller's loop spins on a free-running millisecond counter, normally
//! the one maintained by [`crate::system::SystemTimer`].
//!
//! # Example
//!
//! ```ignore
//! use ph_luton26_switch::hal::clock::{poll_until, Clock};
//!
//! poll_until(&timer, 100, || bus.read(RESET_CFG) & MEM_INIT == 0)?;
//! ```

use crate::driver::error::{HardwareError, HardwareResult};

// =============================================================================
// Clock Trait
// =============================================================================

/// Free-running millisecond time source
///
/// The counter is allowed to wrap; all comparisons use wrapping arithmetic.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch
    fn now_ms(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

// =============================================================================
// Deadline
// =============================================================================

/// Point in time after which a wait is abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    start: u32,
    duration_ms: u32,
}

impl Deadline {
    /// Deadline `duration_ms` from now
    pub fn after<C: Clock + ?Sized>(clock: &C, duration_ms: u32) -> Self {
        Self {
            start: clock.now_ms(),
            duration_ms,
        }
    }

    /// Milliseconds elapsed since the deadline was armed
    pub fn elapsed<C: Clock + ?Sized>(&self, clock: &C) -> u32 {
        clock.now_ms().wrapping_sub(self.start)
    }

    /// True once the full duration has passed
    pub fn expired<C: Clock + ?Sized>(&self, clock: &C) -> bool {
        self.elapsed(clock) >= self.duration_ms
    }
}

/// Spin until `done` returns true or `timeout_ms` elapses
///
/// The condition is always evaluated at least once, so an already-satisfied
/// condition succeeds even with a zero timeout.
pub fn poll_until<C, F>(clock: &C, timeout_ms: u32, mut done: F) -> HardwareResult<()>
where
    C: Clock + ?Sized,
    F: FnMut() -> bool,
{
    let deadline = Deadline::after(clock, timeout_ms);
    loop {
        if done() {
            return Ok(());
        }
        if deadline.expired(clock) {
            return Err(HardwareError::Timeout);
        }
    }
}
