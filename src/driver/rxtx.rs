//! CPU frame injection and extraction
//!
//! This module extends [`Switch`] with the register based frame path of the
//! queue system. Frames are moved one 32-bit word at a time through the
//! data registers of one of two extraction or injection groups, each frame
//! preceded by a two-word internal frame header (IFH).
//!
//! # Overview
//!
//! 1. [`Switch::cpu_rx_init`] enables the CPU ports and maps control
//!    frames to CPU queues
//! 2. [`Switch::cpu_rx_frame`] copies one pending frame into a caller buffer
//! 3. [`Switch::cpu_tx_frame`] sends a frame out of one front port,
//!    bypassing the analyzer
//!
//! Data words are big-endian: the first byte on the wire is the most
//! significant byte of the word.

use embedded_hal::delay::DelayNs;

use super::error::{ConfigError, HardwareError, HardwareResult, IoError, Result};
use super::switch::Switch;
use crate::hal::clock::{Clock, poll_until};
use crate::hal::regio::RegisterBus;
use crate::internal::constants::{CPU_PORT, HW_CMD_TIMEOUT_MS};
use crate::internal::register::qs::{
    self, inj_ctrl, inj_grp_cfg, inj_status, xtr_map, xtr_word,
};
use crate::internal::register::{ana, rew, sys};
use crate::port::media::PortMask;

/// Extraction and injection groups
pub const GROUP_COUNT: u8 = 2;

/// Shortest frame the injector accepts without padding, FCS excluded
const MIN_FRAME_LEN: usize = 60;

/// Words in a minimum size frame
const MIN_FRAME_WORDS: u32 = (MIN_FRAME_LEN / 4) as u32;

/// Word index of the frame at which an injected VLAN tag goes
const TAG_WORD: usize = 3;

/// C-tag protocol identifier
const TPID: u32 = 0x8100;

/// Reserved BPDU addresses (01-80-C2-00-00-00 to -0F)
pub const BPDU_ADDR_COUNT: u8 = 16;

/// BPDU address used by LLDP (01-80-C2-00-00-0E)
pub const LLDP_ADDR: u8 = 0x0E;

/// Time the extraction flush bit is held
const XTR_FLUSH_MS: u32 = 20;

// =============================================================================
// Internal Frame Header
// =============================================================================

/// Header prepended to an injected frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InjectionHeader {
    /// Skip the analyzer and send to `dest` directly
    pub bypass: bool,
    /// Destination ports
    pub dest: PortMask,
    /// VLAN tags popped before transmission
    pub pop_cnt: u8,
}

impl InjectionHeader {
    /// Header sending a frame out of `port` as is
    pub const fn to_port(port: u8) -> Self {
        Self {
            bypass: true,
            dest: PortMask::single(port),
            pop_cnt: 3,
        }
    }

    /// The two header words, most significant first
    pub const fn words(&self) -> [u32; 2] {
        let mut ifh0 = self.dest.bits() & 0x03FF_FFFF;
        if self.bypass {
            ifh0 |= 1 << 31;
        }
        let ifh1 = (self.pop_cnt as u32 & 0x3) << 28;
        [ifh0, ifh1]
    }
}

/// Header in front of an extracted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExtractionHeader {
    /// Port the frame was received on
    pub src_port: u8,
    /// CPU queues the frame was copied to, one bit per queue
    pub cpu_queues: u8,
    /// Classified priority
    pub pcp: u8,
    /// Classified drop eligibility
    pub dei: bool,
    /// Classified VLAN
    pub vid: u16,
}

impl ExtractionHeader {
    /// Decode the two header words
    pub const fn from_words(ifh0: u32, ifh1: u32) -> Self {
        Self {
            src_port: ((ifh0 >> 10) & 0x1F) as u8,
            cpu_queues: ((ifh1 >> 20) & 0xFF) as u8,
            pcp: ((ifh1 >> 13) & 0x7) as u8,
            dei: ifh1 & (1 << 12) != 0,
            vid: (ifh1 & 0xFFF) as u16,
        }
    }
}

/// A frame copied out of an extraction group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxFrame {
    #[allow(missing_docs)]
    pub header: ExtractionHeader,
    /// Bytes written to the buffer, FCS included
    pub len: usize,
    /// The queue system cut the frame short
    pub pruned: bool,
}

// =============================================================================
// Queue Configuration
// =============================================================================

/// CPU queue of each kind of redirected frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub struct CpuQueueMap {
    pub bpdu: u8,
    pub garp: u8,
    pub lldp: u8,
    pub igmp: u8,
    pub ipmc_ctrl: u8,
    pub mac_copy: u8,
    pub learn: u8,
}

impl CpuQueueMap {
    #[allow(missing_docs)]
    pub const fn new() -> Self {
        Self {
            bpdu: 6,
            garp: 6,
            lldp: 7,
            igmp: 5,
            ipmc_ctrl: 5,
            mac_copy: 4,
            learn: 3,
        }
    }
}

impl Default for CpuQueueMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Extraction setup applied by [`Switch::cpu_rx_init`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CpuRxConfig {
    #[allow(missing_docs)]
    pub queues: CpuQueueMap,
    /// Redirect every reserved BPDU address to the CPU
    pub bpdu_redirect: bool,
}

impl CpuRxConfig {
    #[allow(missing_docs)]
    pub const fn new() -> Self {
        Self {
            queues: CpuQueueMap::new(),
            bpdu_redirect: true,
        }
    }

    /// Queues served by extraction group 1; LLDP stays on group 0
    pub const fn group1_queues(&self) -> u32 {
        0xFF & !(1 << (self.queues.lldp & 0x7))
    }
}

impl Default for CpuRxConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Extraction
// =============================================================================

impl<B: RegisterBus, C: Clock> Switch<B, C> {
    /// Set up both CPU ports and the CPU queue classification
    pub fn cpu_rx_init(&mut self, rx: &CpuRxConfig) {
        let cpu = CPU_PORT;
        let ports = self.table().all_ports();
        let bus = self.bus_mut();

        bus.write(qs::xtr_map(0), xtr_map::MAP_ENA);
        bus.write(qs::xtr_map(1), xtr_map::GRP | xtr_map::MAP_ENA);
        for group in 0..GROUP_COUNT {
            bus.write(qs::xtr_grp_cfg(group), 0);
            bus.set_bits(qs::inj_grp_cfg(group), inj_grp_cfg::BYTE_SWAP);
        }
        for port in [cpu, cpu + 1] {
            bus.set_bits(rew::port_cfg(port), rew::port_cfg::IFH_INSERT_ENA);
            bus.set_bits(sys::port_mode(port), sys::port_mode::INCL_INJ_HDR);
        }

        bus.write(
            ana::port_vlan_cfg(cpu),
            ana::port_vlan_cfg::VLAN_AWARE_ENA
                | ana::port_vlan_cfg::vlan_pop_cnt(1)
                | ana::port_vlan_cfg::vlan_vid(1),
        );
        bus.write(ana::port_cfg(cpu), ana::port_cfg::RECV_ENA);
        bus.set_bits(sys::switch_port_mode(cpu), sys::switch_port_mode::PORT_ENA);
        bus.clear_bits(sys::pause_cfg(cpu), sys::pause_cfg::PAUSE_ENA);
        bus.write(sys::atop(cpu), 0);
        bus.set_bits(sys::EGR_DROP_FORCE, 1 << cpu);
        bus.set_bits(sys::EGR_NO_SHARING, 1 << cpu);
        // Second CPU port unused for extraction
        bus.set_bits(rew::port_cfg(cpu + 1), rew::port_cfg::FLUSH_ENA);

        let bpdu = if rx.bpdu_redirect {
            ana::cpu_fwd_bpdu_cfg::BPDU_REDIR_MASK
        } else {
            0
        };
        for port in ports.iter() {
            bus.write(ana::cpu_fwd_cfg(port), 0);
            bus.write(ana::cpu_fwd_bpdu_cfg(port), bpdu);
            bus.write(ana::cpu_fwd_garp_cfg(port), 0);
        }

        let q = rx.queues;
        bus.write(
            ana::CPUQ_CFG,
            ana::cpuq_cfg::mld(q.igmp as u32)
                | ana::cpuq_cfg::igmp(q.igmp as u32)
                | ana::cpuq_cfg::ipmc_ctrl(q.ipmc_ctrl as u32)
                | ana::cpuq_cfg::allbridge(q.bpdu as u32)
                | ana::cpuq_cfg::mac_copy(q.mac_copy as u32)
                | ana::cpuq_cfg::src_copy(q.mac_copy as u32)
                | ana::cpuq_cfg::lrn(q.learn as u32),
        );
        for addr in 0..ana::CPUQ_8021_COUNT {
            let bpdu_q = if addr == LLDP_ADDR as u32 { q.lldp } else { q.bpdu };
            bus.write(
                ana::cpuq_8021_cfg(addr),
                ana::cpuq_8021_cfg::bpdu_val(bpdu_q as u32)
                    | ana::cpuq_8021_cfg::garp_val(q.garp as u32)
                    | ana::cpuq_8021_cfg::ccm_val(0),
            );
        }
        bus.write_masked(
            sys::SCH_CPU,
            sys::sch_cpu::map(rx.group1_queues()),
            sys::sch_cpu::MAP_MASK,
        );
        bus.write(ana::pgid(cpu as u32), 1 << cpu);

        #[cfg(feature = "defmt")]
        defmt::debug!("cpu rx: lldp queue {}", q.lldp);
    }

    /// Redirect (or stop redirecting) one reserved BPDU address to the CPU
    /// on every front port
    pub fn cpu_bpdu_redirect(&mut self, addr: u8, enable: bool) -> Result<()> {
        if addr >= BPDU_ADDR_COUNT {
            return Err(ConfigError::InvalidConfig.into());
        }
        let ports = self.table().all_ports();
        let bit = 1u32 << addr;
        let bus = self.bus_mut();
        for port in ports.iter() {
            bus.write_masked(ana::cpu_fwd_bpdu_cfg(port), if enable { bit } else { 0 }, bit);
        }
        Ok(())
    }

    /// Whether `group` holds at least one frame
    pub fn cpu_frame_pending(&mut self, group: u8) -> bool {
        group < GROUP_COUNT && self.bus_mut().read(qs::XTR_DATA_PRESENT) & (1 << group) != 0
    }

    /// Copy the next frame of `group` into `buf`
    ///
    /// Returns `Ok(None)` when the group is empty. A frame longer than `buf`
    /// is drained from the group and reported as [`IoError::FrameTooLong`].
    pub fn cpu_rx_frame(&mut self, group: u8, buf: &mut [u8]) -> Result<Option<RxFrame>> {
        if group >= GROUP_COUNT {
            return Err(ConfigError::InvalidConfig.into());
        }
        if !self.cpu_frame_pending(group) {
            return Ok(None);
        }

        let ifh0 = self.bus_mut().read(qs::xtr_rd(group));
        let ifh1 = self.bus_mut().read(qs::xtr_rd(group));
        let header = ExtractionHeader::from_words(ifh0, ifh1);

        let mut len = 0usize;
        let mut pruned = false;
        let mut overflow = false;
        loop {
            let word = self.xtr_next(group)?;
            let (data, valid, last) = match word {
                xtr_word::ABORT => {
                    self.bus_mut().read(qs::xtr_rd(group));
                    #[cfg(feature = "defmt")]
                    defmt::warn!("group {}: frame aborted", group);
                    return Err(IoError::FrameAborted.into());
                }
                xtr_word::EOF_0..=xtr_word::EOF_3 => {
                    let unused = (word - xtr_word::EOF_0) as usize;
                    (self.bus_mut().read(qs::xtr_rd(group)), 4 - unused, true)
                }
                xtr_word::PRUNED => {
                    pruned = true;
                    (self.bus_mut().read(qs::xtr_rd(group)), 4, true)
                }
                xtr_word::ESCAPE => (self.bus_mut().read(qs::xtr_rd(group)), 4, false),
                _ => (word, 4, false),
            };

            let bytes = data.to_be_bytes();
            match buf.get_mut(len..len + valid) {
                Some(dst) if !overflow => dst.copy_from_slice(&bytes[..valid]),
                _ => overflow = true,
            }
            len += valid;
            if last {
                break;
            }
        }

        if overflow {
            #[cfg(feature = "defmt")]
            defmt::warn!("group {}: {} byte frame dropped", group, len);
            return Err(IoError::FrameTooLong.into());
        }
        Ok(Some(RxFrame {
            header,
            len,
            pruned,
        }))
    }

    /// Drop the next frame of `group`; returns whether there was one
    pub fn cpu_rx_discard(&mut self, group: u8) -> Result<bool> {
        if !self.cpu_frame_pending(group) {
            return Ok(false);
        }
        loop {
            match self.xtr_next(group)? {
                xtr_word::EOF_0..=xtr_word::ABORT => {
                    self.bus_mut().read(qs::xtr_rd(group));
                    return Ok(true);
                }
                xtr_word::ESCAPE => {
                    self.bus_mut().read(qs::xtr_rd(group));
                }
                _ => {}
            }
        }
    }

    /// Throw away everything queued in `group`
    pub fn cpu_rx_flush<D: DelayNs + ?Sized>(&mut self, group: u8, delay: &mut D) {
        if group >= GROUP_COUNT {
            return;
        }
        self.bus_mut().set_bits(qs::XTR_QU_FLUSH, 1 << group);
        delay.delay_ms(XTR_FLUSH_MS);
        self.bus_mut().clear_bits(qs::XTR_QU_FLUSH, 1 << group);
    }

    /// Next word of `group` that is not [`xtr_word::NOT_READY`]
    fn xtr_next(&mut self, group: u8) -> HardwareResult<u32> {
        let (bus, clock) = self.bus_and_clock();
        let mut word = xtr_word::NOT_READY;
        poll_until(clock, HW_CMD_TIMEOUT_MS, || {
            word = bus.read(qs::xtr_rd(group));
            word != xtr_word::NOT_READY
        })?;
        Ok(word)
    }

    // =========================================================================
    // Injection
    // =========================================================================

    /// Send `frame` (FCS excluded) out of `port`
    ///
    /// With `vid` set a C-tag is inserted after the source address. Frames
    /// shorter than the minimum are padded with zeros.
    pub fn cpu_tx_frame(&mut self, port: u8, frame: &[u8], vid: Option<u16>) -> Result<()> {
        Self::check_port(port)?;
        if frame.len() > self.config().max_frame_len() as usize {
            return Err(IoError::FrameTooLong.into());
        }
        let group = self.inj_group()?;
        let [ifh0, ifh1] = InjectionHeader::to_port(port).words();
        let bus = self.bus_mut();

        bus.write(qs::inj_ctrl(group), inj_ctrl::SOF);
        bus.write(qs::inj_wr(group), ifh0);
        bus.write(qs::inj_wr(group), ifh1);

        let mut words = 0u32;
        for (index, chunk) in frame.chunks(4).enumerate() {
            if index == TAG_WORD && chunk.len() == 4 {
                if let Some(vid) = vid {
                    bus.write(qs::inj_wr(group), TPID << 16 | (vid as u32 & 0xFFF));
                    words += 1;
                }
            }
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            bus.write(qs::inj_wr(group), u32::from_be_bytes(word));
            words += 1;
        }
        while words < MIN_FRAME_WORDS {
            bus.write(qs::inj_wr(group), 0);
            words += 1;
        }

        let vld = if frame.len() < MIN_FRAME_LEN {
            0
        } else {
            (frame.len() % 4) as u32
        };
        bus.write(qs::inj_ctrl(group), inj_ctrl::vld_bytes(vld) | inj_ctrl::EOF);
        // FCS placeholder, recomputed by the MAC
        bus.write(qs::inj_wr(group), 0);
        Ok(())
    }

    /// First injection group ready for a frame and below its watermark
    fn inj_group(&mut self) -> HardwareResult<u8> {
        let (bus, clock) = self.bus_and_clock();
        let mut ready = None;
        poll_until(clock, HW_CMD_TIMEOUT_MS, || {
            let status = bus.read(qs::INJ_STATUS);
            ready = (0..GROUP_COUNT).find(|&g| {
                status & inj_status::fifo_rdy(g) != 0 && status & inj_status::wmark_reached(g) == 0
            });
            ready.is_some()
        })?;
        ready.ok_or(HardwareError::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::config::SwitchConfig;
    use crate::driver::error::Error;
    use crate::test_utils::{MockClock, MockDelay, MockRegisterBus};

    type TestSwitch = Switch<MockRegisterBus, MockClock>;

    fn switch() -> TestSwitch {
        Switch::new(MockRegisterBus::new(), MockClock::with_step(1), SwitchConfig::new()).unwrap()
    }

    fn queue_frame(sw: &TestSwitch, group: u8, words: &[u32]) {
        sw.bus().set(qs::XTR_DATA_PRESENT, 1 << group);
        sw.bus().push_reads(qs::xtr_rd(group), words);
    }

    #[test]
    fn test_injection_header_targets_one_port() {
        let [ifh0, ifh1] = InjectionHeader::to_port(5).words();
        assert_eq!(ifh0, 1 << 31 | 1 << 5);
        assert_eq!(ifh1, 3 << 28);
    }

    #[test]
    fn test_extraction_header_fields() {
        let ifh0 = 0x0040_0000 | 17 << 10;
        let ifh1 = 0x40 << 20 | 5 << 13 | 1 << 12 | 100;
        let header = ExtractionHeader::from_words(ifh0, ifh1);
        assert_eq!(header.src_port, 17);
        assert_eq!(header.cpu_queues, 0x40);
        assert_eq!(header.pcp, 5);
        assert!(header.dei);
        assert_eq!(header.vid, 100);
    }

    #[test]
    fn test_rx_empty_group() {
        let mut sw = switch();
        let mut buf = [0u8; 64];
        assert_eq!(sw.cpu_rx_frame(0, &mut buf), Ok(None));
        assert_eq!(sw.cpu_rx_discard(1), Ok(false));
    }

    #[test]
    fn test_rx_partial_last_word() {
        let mut sw = switch();
        queue_frame(
            &sw,
            1,
            &[3 << 10, 0, 0x0102_0304, xtr_word::EOF_2, 0x0506_FFFF],
        );
        let mut buf = [0u8; 16];
        let frame = sw.cpu_rx_frame(1, &mut buf).unwrap().unwrap();
        assert_eq!(frame.len, 6);
        assert_eq!(frame.header.src_port, 3);
        assert!(!frame.pruned);
        assert_eq!(buf[..6], [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_rx_escaped_control_word_is_data() {
        let mut sw = switch();
        queue_frame(
            &sw,
            0,
            &[0, 0, xtr_word::ESCAPE, xtr_word::ABORT, xtr_word::EOF_0, 0xAABB_CCDD],
        );
        let mut buf = [0u8; 8];
        let frame = sw.cpu_rx_frame(0, &mut buf).unwrap().unwrap();
        assert_eq!(frame.len, 8);
        assert_eq!(buf, [0x80, 0, 0, 0x05, 0xAA, 0xBB, 0xCC, 0xDD]);
    }

    #[test]
    fn test_rx_pruned_frame() {
        let mut sw = switch();
        queue_frame(&sw, 0, &[0, 0, 0x1111_1111, xtr_word::PRUNED, 0x2222_2222]);
        let mut buf = [0u8; 8];
        let frame = sw.cpu_rx_frame(0, &mut buf).unwrap().unwrap();
        assert!(frame.pruned);
        assert_eq!(frame.len, 8);
    }

    #[test]
    fn test_rx_waits_out_not_ready() {
        let mut sw = switch();
        queue_frame(
            &sw,
            0,
            &[0, 0, xtr_word::NOT_READY, xtr_word::NOT_READY, 0x0A0B_0C0D, xtr_word::EOF_3, 0x0E00_0000],
        );
        let mut buf = [0u8; 8];
        let frame = sw.cpu_rx_frame(0, &mut buf).unwrap().unwrap();
        assert_eq!(frame.len, 5);
        assert_eq!(buf[..5], [0x0A, 0x0B, 0x0C, 0x0D, 0x0E]);
    }

    #[test]
    fn test_rx_stalled_fifo_times_out() {
        let mut sw = switch();
        queue_frame(&sw, 0, &[0, 0, 0x1234_5678]);
        sw.bus().set(qs::xtr_rd(0), xtr_word::NOT_READY);
        let mut buf = [0u8; 64];
        assert_eq!(
            sw.cpu_rx_frame(0, &mut buf),
            Err(Error::Hardware(HardwareError::Timeout))
        );
    }

    #[test]
    fn test_rx_aborted_frame() {
        let mut sw = switch();
        queue_frame(&sw, 0, &[0, 0, 0x1234_5678, xtr_word::ABORT, 0]);
        let mut buf = [0u8; 64];
        assert_eq!(
            sw.cpu_rx_frame(0, &mut buf),
            Err(Error::Io(IoError::FrameAborted))
        );
    }

    #[test]
    fn test_rx_oversized_frame_is_drained() {
        let mut sw = switch();
        queue_frame(
            &sw,
            0,
            &[0, 0, 0x0102_0304, 0x0506_0708, xtr_word::EOF_0, 0x090A_0B0C],
        );
        sw.bus().set(qs::xtr_rd(0), 0x5A5A_5A5A);
        let mut buf = [0u8; 4];
        assert_eq!(
            sw.cpu_rx_frame(0, &mut buf),
            Err(Error::Io(IoError::FrameTooLong))
        );
        // Every word of the frame was consumed
        assert_eq!(sw.bus_mut().read(qs::xtr_rd(0)), 0x5A5A_5A5A);
    }

    #[test]
    fn test_rx_discard_drains_to_eof() {
        let mut sw = switch();
        queue_frame(
            &sw,
            1,
            &[0, 0, xtr_word::ESCAPE, xtr_word::EOF_1, 0x0102_0304, xtr_word::EOF_1, 0],
        );
        sw.bus().set(qs::xtr_rd(1), 0x5A5A_5A5A);
        assert_eq!(sw.cpu_rx_discard(1), Ok(true));
        assert_eq!(sw.bus_mut().read(qs::xtr_rd(1)), 0x5A5A_5A5A);
    }

    #[test]
    fn test_rx_invalid_group() {
        let mut sw = switch();
        let mut buf = [0u8; 4];
        assert_eq!(
            sw.cpu_rx_frame(GROUP_COUNT, &mut buf),
            Err(Error::Config(ConfigError::InvalidConfig))
        );
    }

    #[test]
    fn test_rx_flush_pulses_group_bit() {
        let mut sw = switch();
        let mut delay = MockDelay::new();
        sw.cpu_rx_flush(1, &mut delay);
        assert_eq!(sw.bus().writes_to(qs::XTR_QU_FLUSH), [1 << 1, 0]);
        assert_eq!(delay.total_ms(), XTR_FLUSH_MS as u64);
    }

    #[test]
    fn test_tx_full_frame() {
        let mut sw = switch();
        sw.bus().set(qs::INJ_STATUS, inj_status::fifo_rdy(0));
        let frame: [u8; 64] = core::array::from_fn(|i| i as u8);
        sw.cpu_tx_frame(3, &frame, None).unwrap();

        let words = sw.bus().writes_to(qs::inj_wr(0));
        assert_eq!(words.len(), 2 + 16 + 1);
        assert_eq!(words[0], 1 << 31 | 1 << 3);
        assert_eq!(words[2], 0x0001_0203);
        assert_eq!(words[17], 0x3C3D_3E3F);
        assert_eq!(words[18], 0);
        assert_eq!(
            sw.bus().writes_to(qs::inj_ctrl(0)),
            [inj_ctrl::SOF, inj_ctrl::EOF | inj_ctrl::vld_bytes(0)]
        );
    }

    #[test]
    fn test_tx_partial_last_word() {
        let mut sw = switch();
        sw.bus().set(qs::INJ_STATUS, inj_status::fifo_rdy(0));
        let frame = [0xEEu8; 62];
        sw.cpu_tx_frame(0, &frame, None).unwrap();
        let words = sw.bus().writes_to(qs::inj_wr(0));
        assert_eq!(words[2 + 15], 0xEEEE_0000);
        assert_eq!(
            sw.bus().writes_to(qs::inj_ctrl(0))[1],
            inj_ctrl::EOF | inj_ctrl::vld_bytes(2)
        );
    }

    #[test]
    fn test_tx_short_frame_with_tag_is_padded() {
        let mut sw = switch();
        sw.bus().set(qs::INJ_STATUS, inj_status::fifo_rdy(0));
        let frame = [0x11u8; 20];
        sw.cpu_tx_frame(7, &frame, Some(10)).unwrap();

        let words = sw.bus().writes_to(qs::inj_wr(0));
        // IFH, 15 frame words, FCS
        assert_eq!(words.len(), 2 + 15 + 1);
        assert_eq!(words[2 + TAG_WORD], 0x8100_000A);
        assert_eq!(words[2 + TAG_WORD + 1], 0x1111_1111);
        assert_eq!(words[2 + 6], 0);
        assert_eq!(
            sw.bus().writes_to(qs::inj_ctrl(0))[1],
            inj_ctrl::EOF | inj_ctrl::vld_bytes(0)
        );
    }

    #[test]
    fn test_tx_skips_group_at_watermark() {
        let mut sw = switch();
        sw.bus().set(
            qs::INJ_STATUS,
            inj_status::fifo_rdy(0) | inj_status::wmark_reached(0) | inj_status::fifo_rdy(1),
        );
        sw.cpu_tx_frame(1, &[0u8; 60], None).unwrap();
        assert!(sw.bus().writes_to(qs::inj_wr(0)).is_empty());
        assert_eq!(sw.bus().writes_to(qs::inj_wr(1)).len(), 2 + 15 + 1);
    }

    #[test]
    fn test_tx_times_out_without_ready_group() {
        let mut sw = switch();
        assert_eq!(
            sw.cpu_tx_frame(1, &[0u8; 60], None),
            Err(Error::Hardware(HardwareError::Timeout))
        );
        assert!(sw.bus().writes_to(qs::inj_ctrl(0)).is_empty());
        assert!(sw.bus().writes_to(qs::inj_ctrl(1)).is_empty());
    }

    #[test]
    fn test_tx_rejects_bad_arguments() {
        let mut sw = switch();
        sw.bus().set(qs::INJ_STATUS, inj_status::fifo_rdy(0));
        assert_eq!(
            sw.cpu_tx_frame(CPU_PORT, &[0u8; 60], None),
            Err(Error::Config(ConfigError::InvalidPort))
        );
        let big = [0u8; 1519];
        let mut small = Switch::new(
            MockRegisterBus::new(),
            MockClock::with_step(1),
            SwitchConfig::new().with_jumbo(false),
        )
        .unwrap();
        assert_eq!(
            small.cpu_tx_frame(0, &big, None),
            Err(Error::Io(IoError::FrameTooLong))
        );
        assert!(sw.bus().writes().is_empty());
    }

    #[test]
    fn test_rx_init_cpu_ports() {
        let mut sw = switch();
        let rx = CpuRxConfig::new();
        sw.cpu_rx_init(&rx);
        let bus = sw.bus();

        assert_eq!(bus.get(qs::xtr_map(0)), xtr_map::MAP_ENA);
        assert_eq!(bus.get(qs::xtr_map(1)), xtr_map::GRP | xtr_map::MAP_ENA);
        for port in [CPU_PORT, CPU_PORT + 1] {
            assert_ne!(bus.get(rew::port_cfg(port)) & rew::port_cfg::IFH_INSERT_ENA, 0);
            assert_ne!(bus.get(sys::port_mode(port)) & sys::port_mode::INCL_INJ_HDR, 0);
        }
        assert_ne!(bus.get(rew::port_cfg(CPU_PORT + 1)) & rew::port_cfg::FLUSH_ENA, 0);
        assert_eq!(bus.get(ana::port_cfg(CPU_PORT)), ana::port_cfg::RECV_ENA);
        assert_eq!(bus.get(ana::pgid(CPU_PORT as u32)), 1 << CPU_PORT);
        assert_eq!(bus.get(sys::EGR_DROP_FORCE), 1 << CPU_PORT);
        assert_eq!(
            bus.get(ana::cpu_fwd_bpdu_cfg(0)),
            ana::cpu_fwd_bpdu_cfg::BPDU_REDIR_MASK
        );
    }

    #[test]
    fn test_rx_init_lldp_queue_on_group_zero() {
        let mut sw = switch();
        let rx = CpuRxConfig::new();
        sw.cpu_rx_init(&rx);
        let bus = sw.bus();

        let lldp = rx.queues.lldp as u32;
        assert_eq!(
            bus.get(ana::cpuq_8021_cfg(LLDP_ADDR as u32)) & ana::cpuq_8021_cfg::BPDU_VAL_MASK,
            ana::cpuq_8021_cfg::bpdu_val(lldp)
        );
        assert_eq!(
            bus.get(ana::cpuq_8021_cfg(0)) & ana::cpuq_8021_cfg::BPDU_VAL_MASK,
            ana::cpuq_8021_cfg::bpdu_val(rx.queues.bpdu as u32)
        );
        let map = bus.get(sys::SCH_CPU) & sys::sch_cpu::MAP_MASK;
        assert_eq!(map & sys::sch_cpu::map(1 << lldp), 0);
        assert_eq!(map, sys::sch_cpu::map(0xFF & !(1 << lldp)));
    }

    #[test]
    fn test_rx_init_without_bpdu_redirect() {
        let mut sw = switch();
        let rx = CpuRxConfig {
            bpdu_redirect: false,
            ..CpuRxConfig::new()
        };
        sw.cpu_rx_init(&rx);
        assert_eq!(sw.bus().writes_to(ana::cpu_fwd_bpdu_cfg(0)), [0]);
    }

    #[test]
    fn test_bpdu_redirect_single_address() {
        let mut sw = switch();
        sw.bus().set(ana::cpu_fwd_bpdu_cfg(2), 0x0001);
        sw.cpu_bpdu_redirect(LLDP_ADDR, true).unwrap();
        assert_eq!(sw.bus().get(ana::cpu_fwd_bpdu_cfg(2)), 0x0001 | 1 << LLDP_ADDR);
        sw.cpu_bpdu_redirect(0, false).unwrap();
        assert_eq!(sw.bus().get(ana::cpu_fwd_bpdu_cfg(2)), 1 << LLDP_ADDR);
        assert_eq!(
            sw.cpu_bpdu_redirect(BPDU_ADDR_COUNT, true),
            Err(Error::Config(ConfigError::InvalidConfig))
        );
    }
}
