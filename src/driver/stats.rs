//! Per-port statistics counters
//!
//! The queue system keeps three banks of 32-bit counters: receive, transmit
//! and drop. Each bank lays its ports out with its own stride, so a counter
//! is addressed by bank offset plus `stride * port`.
//!
//! Packet totals are not kept by the hardware; they are the sum of the six
//! frame size bins.

use super::error::Result;
use super::switch::Switch;
use crate::hal::clock::Clock;
use crate::hal::regio::RegisterBus;
use crate::internal::register::sys;

/// Counters per port in the receive bank
const RX_STRIDE: u32 = 43;
/// Counters per port in the transmit bank
const TX_STRIDE: u32 = 31;
/// Counters per port in the drop bank
const DROP_STRIDE: u32 = 18;

const TX_BANK: u32 = 0x800;
const DROP_BANK: u32 = 0xC00;

/// One port counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
#[allow(missing_docs)]
pub enum Counter {
    RxOctets = 0x00,
    /// Sum of the receive size bins
    RxPkts = 0x01,
    RxMcast = 0x02,
    RxBcast = 0x03,
    RxUndersize = 0x04,
    RxFragments = 0x05,
    RxJabbers = 0x06,
    RxCrcAlign = 0x07,
    Rx64 = 0x08,
    Rx65To127 = 0x09,
    Rx128To255 = 0x0A,
    Rx256To511 = 0x0B,
    Rx512To1023 = 0x0C,
    Rx1024To1526 = 0x0D,
    RxOversize = 0x0E,
    RxPause = 0x0F,
    RxCtrl = 0x10,
    RxLong = 0x11,
    RxCatDrop = 0x12,

    TxOctets = 0x800,
    /// Sum of the transmit size bins
    TxPkts = 0x801,
    TxMcast = 0x802,
    TxBcast = 0x803,
    TxCollisions = 0x804,
    TxDrop = 0x805,
    TxPause = 0x806,
    Tx64 = 0x807,
    Tx65To127 = 0x808,
    Tx128To255 = 0x809,
    Tx256To511 = 0x80A,
    Tx512To1023 = 0x80B,
    Tx1024To1526 = 0x80C,
    TxOversize = 0x80D,
    TxAged = 0x81E,

    DropLocal = 0xC00,
    DropTail = 0xC01,
}

const RX_BINS: [Counter; 6] = [
    Counter::Rx64,
    Counter::Rx65To127,
    Counter::Rx128To255,
    Counter::Rx256To511,
    Counter::Rx512To1023,
    Counter::Rx1024To1526,
];

const TX_BINS: [Counter; 6] = [
    Counter::Tx64,
    Counter::Tx65To127,
    Counter::Tx128To255,
    Counter::Tx256To511,
    Counter::Tx512To1023,
    Counter::Tx1024To1526,
];

impl Counter {
    /// Flat counter index of this counter on `port`
    pub const fn index(self, port: u8) -> u32 {
        let id = self as u32;
        let stride = if id >= DROP_BANK {
            DROP_STRIDE
        } else if id >= TX_BANK {
            TX_STRIDE
        } else {
            RX_STRIDE
        };
        id + stride * port as u32
    }
}

/// Counters most callers want, read in one go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct PortCounters {
    pub rx_octets: u32,
    pub rx_pkts: u32,
    pub rx_errors: u32,
    pub tx_octets: u32,
    pub tx_pkts: u32,
    pub tx_collisions: u32,
    pub drops: u32,
}

impl<B: RegisterBus, C: Clock> Switch<B, C> {
    /// Read one counter of `port`; wraps at 2^32
    pub fn counter(&mut self, port: u8, counter: Counter) -> Result<u32> {
        Self::check_port(port)?;
        let bins = match counter {
            Counter::RxPkts => &RX_BINS,
            Counter::TxPkts => &TX_BINS,
            _ => return Ok(self.read_counter(port, counter)),
        };
        Ok(bins
            .iter()
            .fold(0u32, |sum, &bin| sum.wrapping_add(self.read_counter(port, bin))))
    }

    /// Snapshot of the usual counters of `port`
    pub fn port_counters(&mut self, port: u8) -> Result<PortCounters> {
        let mut rx_errors = 0u32;
        for counter in [
            Counter::RxCrcAlign,
            Counter::RxUndersize,
            Counter::RxOversize,
            Counter::RxFragments,
            Counter::RxJabbers,
        ] {
            rx_errors = rx_errors.wrapping_add(self.counter(port, counter)?);
        }

        Ok(PortCounters {
            rx_octets: self.counter(port, Counter::RxOctets)?,
            rx_pkts: self.counter(port, Counter::RxPkts)?,
            rx_errors,
            tx_octets: self.counter(port, Counter::TxOctets)?,
            tx_pkts: self.counter(port, Counter::TxPkts)?,
            tx_collisions: self.counter(port, Counter::TxCollisions)?,
            drops: self
                .counter(port, Counter::DropLocal)?
                .wrapping_add(self.counter(port, Counter::DropTail)?),
        })
    }

    fn read_counter(&mut self, port: u8, counter: Counter) -> u32 {
        self.bus_mut().read(sys::stat_cnt(counter.index(port)))
    }
}
