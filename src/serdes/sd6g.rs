//! Serdes6G analog macro configuration
//!
//! The macro is programmed through a shadow register set in MACRO_CTRL: the
//! CPU writes the shadow registers, then a one-shot transfer on the macro
//! configuration bus (MCB) moves them into the lane(s) selected by the lane
//! address bitmap.
//!
//! [`configure`] follows the three-step bring-up the PLL needs:
//!
//! 1. write every analog register with lane and PLL held in reset, transfer
//! 2. release the PLL reset, transfer
//! 3. release the digital resets, transfer
//!
//! Every transfer is followed by a short settle delay.

use embedded_hal::delay::DelayNs;

use crate::driver::error::{HardwareError, Result};
use crate::hal::clock::{Clock, poll_until};
use crate::hal::regio::RegisterBus;
use crate::internal::constants::{
    HW_CMD_TIMEOUT_MS, PLL_STEP_DELAY_MS, SD6G_CHANGE_DELAY_MS, SD6G_POST_CHANGE_DELAY_MS,
    SD6G_XFER_DELAY_MS,
};
use crate::internal::register::gcb;
use crate::internal::register::macro_ctrl::{
    self, common_cfg, des_cfg, ib_cfg, ib_cfg1, misc_cfg, ob_cfg, ob_cfg1, pll_cfg, rcomp_cfg0,
    rcomp_status, serdes6g_addr_cfg,
};
use crate::port::map::Sku;

/// Serdes6G operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Serdes6gMode {
    /// Lane powered down
    Disable,
    /// SGMII (1.25 Gbaud)
    Sgmii,
    /// QSGMII (5 Gbaud)
    Qsgmii,
    /// 1000Base-X (1.25 Gbaud)
    Base1000X,
    /// 100Base-FX
    Fx100,
    /// 2.5G (3.125 Gbaud)
    Base2G5,
}

/// Analog settings of one mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ModeParams {
    ob_post0: u32,
    ob_sr: u32,
    ob_ena_cas: u32,
    ob_lev: u32,
    ib_ic_ac: u32,
    ib_vbac: u32,
    ib_rf: u32,
    ib_vbcom: u32,
    ib_c: u32,
    ib_chf: bool,
    ena_rot: bool,
    pll_ctrl_data: u32,
    if_mode: u32,
    qrate: bool,
    hrate: bool,
    fx100: bool,
}

const BASE_PARAMS: ModeParams = ModeParams {
    ob_post0: 0,
    ob_sr: 7,
    ob_ena_cas: 2,
    ob_lev: 48,
    ib_ic_ac: 0,
    ib_vbac: 5,
    ib_rf: 15,
    ib_vbcom: 4,
    ib_c: 15,
    ib_chf: false,
    ena_rot: false,
    pll_ctrl_data: 60,
    if_mode: 1,
    qrate: true,
    hrate: false,
    fx100: false,
};

impl Serdes6gMode {
    /// Output buffer runs in 1V mode on the supported boards
    const OB_ENA1V: bool = true;

    const fn params(self) -> ModeParams {
        match self {
            Self::Base2G5 => ModeParams {
                ob_post0: 2,
                ob_ena_cas: 1,
                ib_ic_ac: 2,
                ib_vbac: 4,
                ib_rf: 2,
                ib_vbcom: 4,
                ib_c: 6,
                ib_chf: true,
                ena_rot: true,
                pll_ctrl_data: 48,
                qrate: false,
                hrate: true,
                ..BASE_PARAMS
            },
            Self::Qsgmii => ModeParams {
                ob_sr: 0,
                ob_post0: 2,
                ob_ena_cas: 1,
                ob_lev: 24,
                ib_rf: 4,
                ib_c: 4,
                pll_ctrl_data: 120,
                if_mode: 3,
                qrate: false,
                ..BASE_PARAMS
            },
            Self::Sgmii | Self::Base1000X => BASE_PARAMS,
            Self::Fx100 => ModeParams {
                ob_ena_cas: 1,
                fx100: true,
                ..BASE_PARAMS
            },
            Self::Disable => ModeParams {
                ob_lev: 0,
                ob_ena_cas: 0,
                ib_rf: 0,
                ib_vbcom: 0,
                pll_ctrl_data: 0,
                qrate: false,
                ..BASE_PARAMS
            },
        }
    }
}

// =============================================================================
// Macro configuration bus
// =============================================================================

fn mcb_transfer<B, C, D>(bus: &mut B, clock: &C, delay: &mut D, lane: u32, one_shot: u32) -> Result<()>
where
    B: RegisterBus + ?Sized,
    C: Clock + ?Sized,
    D: DelayNs + ?Sized,
{
    bus.write(
        macro_ctrl::SERDES6G_ADDR_CFG,
        serdes6g_addr_cfg::addr(lane) | one_shot,
    );
    poll_until(clock, HW_CMD_TIMEOUT_MS, || {
        bus.read(macro_ctrl::SERDES6G_ADDR_CFG) & one_shot == 0
    })?;
    delay.delay_ms(SD6G_XFER_DELAY_MS);
    Ok(())
}

/// Push the shadow registers into the lanes in `lane`
pub fn mcb_write<B, C, D>(bus: &mut B, clock: &C, delay: &mut D, lane: u32) -> Result<()>
where
    B: RegisterBus + ?Sized,
    C: Clock + ?Sized,
    D: DelayNs + ?Sized,
{
    mcb_transfer(bus, clock, delay, lane, serdes6g_addr_cfg::WR_ONE_SHOT)
}

/// Load the shadow registers from the lanes in `lane`
pub fn mcb_read<B, C, D>(bus: &mut B, clock: &C, delay: &mut D, lane: u32) -> Result<()>
where
    B: RegisterBus + ?Sized,
    C: Clock + ?Sized,
    D: DelayNs + ?Sized,
{
    mcb_transfer(bus, clock, delay, lane, serdes6g_addr_cfg::RD_ONE_SHOT)
}

/// Run RCOMP calibration and return the resistor code
fn rcomp_calibrate<B, C>(bus: &mut B, clock: &C) -> Result<u32>
where
    B: RegisterBus + ?Sized,
    C: Clock + ?Sized,
{
    bus.write(macro_ctrl::RCOMP_CFG0, rcomp_cfg0::MODE_SEL);
    bus.write(
        macro_ctrl::RCOMP_CFG0,
        rcomp_cfg0::MODE_SEL | rcomp_cfg0::RUN_CAL,
    );
    poll_until(clock, HW_CMD_TIMEOUT_MS, || {
        bus.read(macro_ctrl::RCOMP_STATUS) & rcomp_status::BUSY == 0
    })?;
    Ok(rcomp_status::rcomp(bus.read(macro_ctrl::RCOMP_STATUS)))
}

// =============================================================================
// Configuration
// =============================================================================

/// Configure the lanes in `lane` for `mode`
pub fn configure<B, C, D>(
    bus: &mut B,
    clock: &C,
    delay: &mut D,
    mode: Serdes6gMode,
    lane: u32,
) -> Result<()>
where
    B: RegisterBus + ?Sized,
    C: Clock + ?Sized,
    D: DelayNs + ?Sized,
{
    let p = mode.params();
    let ena1v = Serdes6gMode::OB_ENA1V;
    let rcomp = rcomp_calibrate(bus, clock)?;

    // 1. Configure macro with resets applied
    bus.write_masked(
        macro_ctrl::SERDES6G_OB_CFG,
        ob_cfg::POL
            | ob_cfg::resistor_ctrl(rcomp + 1)
            | ob_cfg::sr(p.ob_sr)
            | ob_cfg::post0(p.ob_post0)
            | ob_cfg::SR_H
            | if ena1v { ob_cfg::ENA1V_MODE } else { 0 },
        ob_cfg::POL
            | ob_cfg::RESISTOR_CTRL_MASK
            | ob_cfg::SR_MASK
            | ob_cfg::POST0_MASK
            | ob_cfg::SR_H
            | ob_cfg::ENA1V_MODE,
    );
    bus.write_masked(
        macro_ctrl::SERDES6G_OB_CFG1,
        ob_cfg1::ena_cas(p.ob_ena_cas) | ob_cfg1::lev(p.ob_lev),
        ob_cfg1::ENA_CAS_MASK | ob_cfg1::LEV_MASK,
    );
    bus.write_masked(
        macro_ctrl::SERDES6G_IB_CFG,
        ib_cfg::ic_ac(p.ib_ic_ac)
            | ib_cfg::rt(15)
            | ib_cfg::vbac(p.ib_vbac)
            | ib_cfg::resistor_ctrl(rcomp + 2)
            | ib_cfg::vbcom(p.ib_vbcom)
            | ib_cfg::rf(p.ib_rf),
        ib_cfg::IC_AC_MASK
            | ib_cfg::RT_MASK
            | ib_cfg::VBAC_MASK
            | ib_cfg::RESISTOR_CTRL_MASK
            | ib_cfg::VBCOM_MASK
            | ib_cfg::RF_MASK,
    );
    bus.write_masked(
        macro_ctrl::SERDES6G_IB_CFG1,
        ib_cfg1::CTERM_ENA
            | if p.ib_chf { ib_cfg1::CHF } else { 0 }
            | ib_cfg1::ib_c(p.ib_c)
            | ib_cfg1::DIS_EQ
            | ib_cfg1::ENA_OFFSAC
            | ib_cfg1::ENA_OFFSDC
            | if p.fx100 { ib_cfg1::FX100_ENA } else { 0 }
            | ib_cfg1::IB_RST,
        ib_cfg1::CHF
            | ib_cfg1::CTERM_ENA
            | ib_cfg1::IB_C_MASK
            | ib_cfg1::DIS_EQ
            | ib_cfg1::ENA_OFFSAC
            | ib_cfg1::ENA_OFFSDC
            | ib_cfg1::FX100_ENA
            | ib_cfg1::IB_RST,
    );
    bus.write_masked(
        macro_ctrl::SERDES6G_DES_CFG,
        des_cfg::phs_ctrl(6)
            | des_cfg::mbtr_ctrl(2)
            | if p.fx100 { des_cfg::cpmd_sel(2) } else { 0 }
            | des_cfg::bw_hyst(5)
            | des_cfg::bw_ana(5),
        des_cfg::PHS_CTRL_MASK
            | des_cfg::MBTR_CTRL_MASK
            | des_cfg::CPMD_SEL_MASK
            | des_cfg::BW_HYST_MASK
            | des_cfg::BW_ANA_MASK,
    );
    bus.write_masked(
        macro_ctrl::SERDES6G_PLL_CFG,
        pll_cfg::fsm_ctrl_data(p.pll_ctrl_data)
            | pll_cfg::FSM_ENA
            | if p.ena_rot { pll_cfg::ENA_ROT } else { 0 },
        pll_cfg::FSM_CTRL_DATA_MASK | pll_cfg::FSM_ENA | pll_cfg::ENA_ROT,
    );
    // Masked so the recovered clock select fields survive
    bus.write_masked(
        macro_ctrl::SERDES6G_COMMON_CFG,
        common_cfg::ENA_LANE
            | if p.hrate { common_cfg::HRATE } else { 0 }
            | if p.qrate { common_cfg::QRATE } else { 0 }
            | common_cfg::if_mode(p.if_mode),
        common_cfg::SYS_RST
            | common_cfg::ENA_LANE
            | common_cfg::HRATE
            | common_cfg::QRATE
            | common_cfg::IF_MODE_MASK,
    );
    let cpmd = if p.fx100 { misc_cfg::DES_100FX_CPMD_ENA } else { 0 };
    bus.write_masked(
        macro_ctrl::SERDES6G_MISC_CFG,
        cpmd,
        misc_cfg::DES_100FX_CPMD_ENA,
    );
    bus.write_masked(
        macro_ctrl::SERDES6G_MISC_CFG,
        cpmd | misc_cfg::LANE_RST,
        misc_cfg::DES_100FX_CPMD_ENA | misc_cfg::LANE_RST,
    );
    mcb_write(bus, clock, delay, lane)?;

    // 2. Release PLL reset
    bus.set_bits(macro_ctrl::SERDES6G_COMMON_CFG, common_cfg::SYS_RST);
    mcb_write(bus, clock, delay, lane)?;

    // 3. Release digital reset
    bus.clear_bits(macro_ctrl::SERDES6G_IB_CFG1, ib_cfg1::IB_RST);
    bus.clear_bits(macro_ctrl::SERDES6G_MISC_CFG, misc_cfg::LANE_RST);
    mcb_write(bus, clock, delay, lane)
}

/// Reconfigure a running lane for a new mode
pub fn change_mode<B, C, D>(
    bus: &mut B,
    clock: &C,
    delay: &mut D,
    mode: Serdes6gMode,
    lane: u32,
) -> Result<()>
where
    B: RegisterBus + ?Sized,
    C: Clock + ?Sized,
    D: DelayNs + ?Sized,
{
    #[cfg(feature = "defmt")]
    defmt::debug!("sd6g: lane {=u32:#x} -> {}", lane, mode);

    mcb_read(bus, clock, delay, lane)?;
    delay.delay_ms(SD6G_CHANGE_DELAY_MS);
    configure(bus, clock, delay, mode, lane)?;
    mcb_write(bus, clock, delay, lane)?;
    delay.delay_ms(SD6G_POST_CHANGE_DELAY_MS);
    if mode == Serdes6gMode::Fx100 {
        enable_100fx_cpmd(bus, clock, delay, lane)?;
    }
    Ok(())
}

fn enable_100fx_cpmd<B, C, D>(bus: &mut B, clock: &C, delay: &mut D, lane: u32) -> Result<()>
where
    B: RegisterBus + ?Sized,
    C: Clock + ?Sized,
    D: DelayNs + ?Sized,
{
    mcb_read(bus, clock, delay, lane)?;
    bus.set_bits(macro_ctrl::SERDES6G_MISC_CFG, misc_cfg::DES_100FX_CPMD_ENA);
    bus.set_bits(macro_ctrl::SERDES6G_IB_CFG1, ib_cfg1::FX100_ENA);
    bus.write_masked(
        macro_ctrl::SERDES6G_DES_CFG,
        des_cfg::cpmd_sel(2),
        des_cfg::CPMD_SEL_MASK,
    );
    mcb_write(bus, clock, delay, lane)
}

/// Select the port mux and bring up the fixed Serdes lanes of a board
pub fn macro_config<B, C, D>(
    bus: &mut B,
    clock: &C,
    delay: &mut D,
    sku: Sku,
    qsgmii: bool,
) -> Result<()>
where
    B: RegisterBus + ?Sized,
    C: Clock + ?Sized,
    D: DelayNs + ?Sized,
{
    // Mux mode 0: 3x QSGMII, 1x 2G5, 1x SGMII. Mode 1: 2x 2G5, 10x SGMII.
    let (sw_mode, lanes): (u32, &[(Serdes6gMode, u32)]) = match sku {
        Sku::L25 => (0, &[(Serdes6gMode::Qsgmii, 0xE), (Serdes6gMode::Sgmii, 0x1)]),
        Sku::L16 if qsgmii => (0, &[(Serdes6gMode::Qsgmii, 0xF)]),
        Sku::L16 => (1, &[(Serdes6gMode::Sgmii, 0xF)]),
        Sku::L10 => (1, &[(Serdes6gMode::Sgmii, 0x3)]),
    };
    bus.write_masked(
        gcb::MISC_CFG,
        gcb::misc_cfg::sw_mode(sw_mode),
        gcb::misc_cfg::SW_MODE_MASK,
    );
    for (mode, lane) in lanes {
        configure(bus, clock, delay, *mode, *lane)?;
    }
    Ok(())
}

/// Program the 5G PLL and check that it locked
pub fn pll_lock<B, D>(bus: &mut B, delay: &mut D) -> Result<()>
where
    B: RegisterBus + ?Sized,
    D: DelayNs + ?Sized,
{
    const CFG4: u32 = 0x0000_7AE0;
    const CFG2_STEPS: [u32; 4] = [0x0061_0400, 0x0061_0C00, 0x0061_0800, 0x0061_0000];

    bus.write(macro_ctrl::PLL5G_CFG4, CFG4);
    delay.delay_ms(PLL_STEP_DELAY_MS);
    for step in CFG2_STEPS {
        bus.write(macro_ctrl::PLL5G_CFG2, step);
        delay.delay_ms(PLL_STEP_DELAY_MS);
    }

    if bus.read(macro_ctrl::PLL5G_STATUS0) & macro_ctrl::pll5g_status0::LOCK_STATUS == 0 {
        return Err(HardwareError::PllNotLocked.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::driver::error::Error;
    use crate::internal::register::field_get;
    use crate::test_utils::{MockClock, MockDelay, MockRegisterBus};

    fn last_write(bus: &MockRegisterBus, reg: crate::hal::regio::Reg) -> u32 {
        *bus.writes_to(reg).last().unwrap()
    }

    #[test]
    fn configure_1000basex_programs_rates_and_releases_resets() {
        let mut bus = MockRegisterBus::responsive();
        bus.set(macro_ctrl::RCOMP_STATUS, 0x7);
        let clock = MockClock::with_step(1);
        let mut delay = MockDelay::new();

        configure(&mut bus, &clock, &mut delay, Serdes6gMode::Base1000X, 0x1).unwrap();

        let common = bus.get(macro_ctrl::SERDES6G_COMMON_CFG);
        assert_ne!(common & common_cfg::QRATE, 0);
        assert_eq!(common & common_cfg::HRATE, 0);
        assert_ne!(common & common_cfg::SYS_RST, 0);
        assert_eq!(bus.get(macro_ctrl::SERDES6G_IB_CFG1) & ib_cfg1::IB_RST, 0);
        assert_eq!(bus.get(macro_ctrl::SERDES6G_MISC_CFG) & misc_cfg::LANE_RST, 0);

        // RCOMP feeds both resistor fields
        let ob = bus.get(macro_ctrl::SERDES6G_OB_CFG);
        assert_eq!(field_get(ob, 4, 4), 8);
        let ib = bus.get(macro_ctrl::SERDES6G_IB_CFG);
        assert_eq!(field_get(ib, 10, 4), 9);

        // Three transfers to lane 1
        let xfers = bus.writes_to(macro_ctrl::SERDES6G_ADDR_CFG);
        assert_eq!(xfers.len(), 3);
        assert!(xfers.iter().all(|v| *v == (serdes6g_addr_cfg::WR_ONE_SHOT | 0x1)));
        assert_eq!(delay.total_ms(), 3 * SD6G_XFER_DELAY_MS as u64);
    }

    #[test]
    fn pll_reset_released_before_digital_reset() {
        let mut bus = MockRegisterBus::responsive();
        let clock = MockClock::with_step(1);
        configure(&mut bus, &clock, &mut MockDelay::new(), Serdes6gMode::Sgmii, 0x1).unwrap();

        let pll_release = bus
            .first_write(macro_ctrl::SERDES6G_COMMON_CFG, |v| v & common_cfg::SYS_RST != 0)
            .unwrap();
        let lane_release = bus
            .writes()
            .iter()
            .rposition(|(r, v)| *r == macro_ctrl::SERDES6G_MISC_CFG && v & misc_cfg::LANE_RST == 0)
            .unwrap();
        assert!(pll_release < lane_release);
    }

    #[test]
    fn fx100_enables_cpmd() {
        let mut bus = MockRegisterBus::responsive();
        let clock = MockClock::with_step(1);
        change_mode(&mut bus, &clock, &mut MockDelay::new(), Serdes6gMode::Fx100, 0x2).unwrap();

        assert_ne!(
            bus.get(macro_ctrl::SERDES6G_MISC_CFG) & misc_cfg::DES_100FX_CPMD_ENA,
            0
        );
        assert_ne!(bus.get(macro_ctrl::SERDES6G_IB_CFG1) & ib_cfg1::FX100_ENA, 0);
        assert_eq!(
            bus.get(macro_ctrl::SERDES6G_DES_CFG) & des_cfg::CPMD_SEL_MASK,
            des_cfg::cpmd_sel(2)
        );
    }

    #[test]
    fn change_mode_reads_lane_first() {
        let mut bus = MockRegisterBus::responsive();
        let clock = MockClock::with_step(1);
        let mut delay = MockDelay::new();
        change_mode(&mut bus, &clock, &mut delay, Serdes6gMode::Base2G5, 0x1).unwrap();

        let xfers = bus.writes_to(macro_ctrl::SERDES6G_ADDR_CFG);
        assert_eq!(xfers[0], serdes6g_addr_cfg::RD_ONE_SHOT | 0x1);
        assert_eq!(delay.calls_ms()[1], SD6G_CHANGE_DELAY_MS as u64);
        let common = bus.get(macro_ctrl::SERDES6G_COMMON_CFG);
        assert_ne!(common & common_cfg::HRATE, 0);
        assert_ne!(bus.get(macro_ctrl::SERDES6G_PLL_CFG) & pll_cfg::ENA_ROT, 0);
    }

    #[test]
    fn stuck_transfer_times_out() {
        let mut bus = MockRegisterBus::new();
        bus.stick_bits(macro_ctrl::SERDES6G_ADDR_CFG, serdes6g_addr_cfg::WR_ONE_SHOT);
        let clock = MockClock::with_step(1);
        assert_eq!(
            mcb_write(&mut bus, &clock, &mut MockDelay::new(), 0x1),
            Err(Error::Hardware(HardwareError::Timeout))
        );
    }

    #[test]
    fn macro_config_selects_mux_per_sku() {
        let mut bus = MockRegisterBus::responsive();
        let clock = MockClock::with_step(1);
        macro_config(&mut bus, &clock, &mut MockDelay::new(), Sku::L10, false).unwrap();
        assert_eq!(
            bus.get(gcb::MISC_CFG) & gcb::misc_cfg::SW_MODE_MASK,
            gcb::misc_cfg::sw_mode(1)
        );
        assert_eq!(last_write(&bus, macro_ctrl::SERDES6G_ADDR_CFG) & 0xF, 0x3);

        let mut bus = MockRegisterBus::responsive();
        macro_config(&mut bus, &clock, &mut MockDelay::new(), Sku::L25, false).unwrap();
        let lanes: std::vec::Vec<u32> = bus
            .writes_to(macro_ctrl::SERDES6G_ADDR_CFG)
            .iter()
            .map(|v| v & 0xF)
            .collect();
        assert_eq!(lanes, [0xE, 0xE, 0xE, 0x1, 0x1, 0x1]);
    }

    #[test]
    fn pll_lock_sequence() {
        let mut bus = MockRegisterBus::new();
        bus.stick_bits(macro_ctrl::PLL5G_STATUS0, 1);
        let mut delay = MockDelay::new();
        pll_lock(&mut bus, &mut delay).unwrap();
        assert_eq!(
            bus.writes_to(macro_ctrl::PLL5G_CFG2),
            [0x0061_0400, 0x0061_0C00, 0x0061_0800, 0x0061_0000]
        );
        assert_eq!(delay.total_ms(), 10);
    }

    #[test]
    fn pll_unlocked_is_reported() {
        let mut bus = MockRegisterBus::new();
        assert_eq!(
            pll_lock(&mut bus, &mut MockDelay::new()),
            Err(Error::Hardware(HardwareError::PllNotLocked))
        );
    }
}
