//! Shared buffer reservation
//!
//! The queue system keeps 1024 watermarks: four banks of 256 (ingress
//! memory, ingress references, egress memory, egress references), each
//! indexed by `port * 8 + priority`, with per-priority shared entries at 216,
//! per-port shared entries at 224 and per-drop-precedence entries at 254.

use super::switch::Switch;
use crate::hal::clock::Clock;
use crate::hal::regio::RegisterBus;
use crate::internal::constants::{BUFFER_CELL_SIZE, BUFFER_MEMORY, BUFFER_REFERENCES, QS_PORT_COUNT};
use crate::internal::register::sys;

/// Offset of each watermark bank
const BANK_INGRESS_MEM: u32 = 0;
const BANK_INGRESS_REF: u32 = 256;
const BANK_EGRESS_MEM: u32 = 512;
const BANK_EGRESS_REF: u32 = 768;

/// Per-priority shared area
const PRIO_SHARED_BASE: u32 = 216;
/// Per-port shared area
const PORT_SHARED_BASE: u32 = 224;
/// Per-drop-precedence area
const DP_SHARED_BASE: u32 = 254;

/// Priorities per port
const PRIO_COUNT: u32 = 8;

/// Reserved bytes per port, all queues
const PORT_RESERVED_BYTES: u32 = 15_600;
/// Reserved references per port, all queues
const PORT_RESERVED_REFS: u32 = 168;
/// Extra bytes taken from the shared area per priority step
const PRIO_BYTES_STEP: u32 = 7000;
/// Extra references taken from the shared area per priority step
const PRIO_REFS_STEP: u32 = 50;
/// Egress port share in bytes
const PORT_SHARE_BYTES: u32 = 10_000;
/// Drop precedence watermark, effectively unlimited
const DP_UNLIMITED: u32 = 0x7FF;

/// Encode a watermark into the 11-bit register format
///
/// Values from 1024 up are stored in units of 16.
pub(crate) const fn wm_encode(value: u32) -> u32 {
    if value >= 1024 {
        1024 + value / 16
    } else {
        value
    }
}

impl<B: RegisterBus, C: Clock> Switch<B, C> {
    /// Program the reservation watermarks of every port and priority
    pub fn configure_buffers(&mut self) {
        let bus = self.bus_mut();
        for index in 0..sys::RES_CFG_COUNT {
            bus.write(sys::res_cfg(index), 0);
        }

        // Per port and priority reservation
        for port in 0..QS_PORT_COUNT {
            for prio in 0..PRIO_COUNT {
                let index = port * PRIO_COUNT + prio;
                bus.write(sys::res_cfg(index + BANK_INGRESS_MEM), 10);
                bus.write(sys::res_cfg(index + BANK_INGRESS_REF), 8);
                bus.write(sys::res_cfg(index + BANK_EGRESS_MEM), 4);
                bus.write(sys::res_cfg(index + BANK_EGRESS_REF), 8);
            }
        }

        // Shared area per priority, higher priorities get more
        let shared_mem = BUFFER_MEMORY - QS_PORT_COUNT * PORT_RESERVED_BYTES;
        let shared_refs = BUFFER_REFERENCES - QS_PORT_COUNT * PORT_RESERVED_REFS;
        for prio in 0..PRIO_COUNT {
            let step = PRIO_COUNT - 1 - prio;
            let mem = wm_encode((shared_mem - step * PRIO_BYTES_STEP) / BUFFER_CELL_SIZE);
            let refs = shared_refs - step * PRIO_REFS_STEP;
            let index = prio + PRIO_SHARED_BASE;
            bus.write(sys::res_cfg(index + BANK_INGRESS_MEM), mem);
            bus.write(sys::res_cfg(index + BANK_INGRESS_REF), refs);
            bus.write(sys::res_cfg(index + BANK_EGRESS_MEM), mem);
            bus.write(sys::res_cfg(index + BANK_EGRESS_REF), refs);
        }

        // Egress share per port
        for port in 0..QS_PORT_COUNT {
            let index = port + PORT_SHARED_BASE;
            bus.write(sys::res_cfg(index + BANK_INGRESS_MEM), 0);
            bus.write(sys::res_cfg(index + BANK_INGRESS_REF), 20);
            bus.write(
                sys::res_cfg(index + BANK_EGRESS_MEM),
                PORT_SHARE_BYTES / BUFFER_CELL_SIZE,
            );
            bus.write(sys::res_cfg(index + BANK_EGRESS_REF), 20);
        }

        for dp in 0..2 {
            let index = dp + DP_SHARED_BASE;
            for bank in [BANK_INGRESS_MEM, BANK_INGRESS_REF, BANK_EGRESS_MEM, BANK_EGRESS_REF] {
                bus.write(sys::res_cfg(index + bank), DP_UNLIMITED);
            }
        }
    }
}
