//! Link change notifications
//!
//! The port state machine reports every confirmed link transition. EEE,
//! LLDP and LED handling live outside this crate and subscribe through
//! [`LinkEvents`]; a tuple of handlers fans one event out to each of them
//! in order.

/// Receiver of link transitions (internal port numbers)
pub trait LinkEvents {
    /// Port came up; the switch port is already configured for the new mode
    fn link_up(&mut self, port: u8);

    /// Port went down; the switch port is already disabled
    fn link_down(&mut self, port: u8);
}

impl LinkEvents for () {
    fn link_up(&mut self, _port: u8) {}

    fn link_down(&mut self, _port: u8) {}
}

impl<T: LinkEvents + ?Sized> LinkEvents for &mut T {
    fn link_up(&mut self, port: u8) {
        (**self).link_up(port);
    }

    fn link_down(&mut self, port: u8) {
        (**self).link_down(port);
    }
}

impl<A: LinkEvents, B: LinkEvents> LinkEvents for (A, B) {
    fn link_up(&mut self, port: u8) {
        self.0.link_up(port);
        self.1.link_up(port);
    }

    fn link_down(&mut self, port: u8) {
        self.0.link_down(port);
        self.1.link_down(port);
    }
}

impl<A: LinkEvents, B: LinkEvents, C: LinkEvents> LinkEvents for (A, B, C) {
    fn link_up(&mut self, port: u8) {
        self.0.link_up(port);
        self.1.link_up(port);
        self.2.link_up(port);
    }

    fn link_down(&mut self, port: u8) {
        self.0.link_down(port);
        self.1.link_down(port);
        self.2.link_down(port);
    }
}
