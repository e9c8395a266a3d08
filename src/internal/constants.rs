//! Centralized Constants
//!
//! Timing bounds, frame sizes and buffer figures used across the switch core.
//! Register bit definitions stay in [`super::register`].

// =============================================================================
// Ports
// =============================================================================

/// Internal switch ports (0-based), including unconnected ones
pub const PORT_COUNT: usize = 26;

/// Ports counted by the queue system (front ports plus CPU)
pub const QS_PORT_COUNT: u32 = 27;

/// Port number used for the pause-MAC and source mask helpers of the CPU port
pub const CPU_PORT: u8 = 26;

// =============================================================================
// Frame Sizes
// =============================================================================

/// Maximum frame length with jumbo frames enabled
pub const MAX_FRAME_JUMBO: u32 = 9600;

/// Maximum standard frame length including VLAN tag
pub const MAX_FRAME_STD: u32 = 1518;

// =============================================================================
// Timing (milliseconds)
// =============================================================================

/// Egress drain wait before flushing, sized for a jumbo frame at 10 Mbit
pub const PORT_DRAIN_DELAY_MS: u32 = 10;

/// Upper bound on queue flush completion
pub const FLUSH_TIMEOUT_MS: u32 = 2000;

/// Settle time after loading the half-duplex backoff seed
pub const SEED_LOAD_DELAY_MS: u32 = 2;

/// Bound on switch memory initialization
pub const MEM_INIT_TIMEOUT_MS: u32 = 100;

/// Settle time after each PLL configuration step
pub const PLL_STEP_DELAY_MS: u32 = 2;

/// Settle time after clearing the MAC table at boot
pub const MACTAB_CLEAR_DELAY_MS: u32 = 40;

/// Bound on MAC table commands, leaky bucket init and MIIM transfers
pub const HW_CMD_TIMEOUT_MS: u32 = 100;

/// Settle time after a Serdes6G configuration transfer
pub const SD6G_XFER_DELAY_MS: u32 = 2;

/// Settle time between reading and reprogramming a Serdes6G lane
pub const SD6G_CHANGE_DELAY_MS: u32 = 20;

/// Settle time after a Serdes6G mode change
pub const SD6G_POST_CHANGE_DELAY_MS: u32 = 1;

/// Delay between aneg-in-progress samples
pub const ANEG_PR_DELAY_MS: u32 = 5;

/// Number of aneg-in-progress samples
pub const ANEG_PR_POLLS: u32 = 3;

/// Settle time after the PCS erratum restart
pub const PCS_RESTART_DELAY_MS: u32 = 50;

/// Wait before touching PHYs after power-up
pub const PHY_POWER_UP_DELAY_MS: u32 = 30;

/// Wait for the PHYs to come out of reset
pub const PHY_RESET_DELAY_MS: u32 = 2000;

/// Bound on a PHY soft reset
pub const PHY_SOFT_RESET_TIMEOUT_MS: u32 = 100;

/// Bound on the internal PHYs leaving reset
pub const PHY_READY_TIMEOUT_MS: u32 = 1000;

/// Reset pulse width for external QSGMII PHYs
pub const EXT_PHY_RESET_PULSE_MS: u32 = 20;

/// Wait after releasing external QSGMII PHYs from reset
pub const EXT_PHY_RESET_SETTLE_MS: u32 = 120;

/// GPIO driving the external PHY reset on the L16 QSGMII board
pub const EXT_PHY_RESET_GPIO: u8 = 15;

/// Power rail settle time before chip bring-up
pub const BOOT_SETTLE_DELAY_MS: u32 = 20;

// =============================================================================
// Buffers and Flow Control
// =============================================================================

/// Shared packet memory in bytes
pub const BUFFER_MEMORY: u32 = 512_000;

/// Buffer cell size in bytes
pub const BUFFER_CELL_SIZE: u32 = 48;

/// Frame references available
pub const BUFFER_REFERENCES: u32 = 5500;

/// Default MAC table age time in seconds
pub const DEFAULT_AGE_TIME_S: u32 = 300;

/// Frame aging period written to FRM_AGING (4 ns units, 2 s)
pub const FRAME_AGING_PERIOD: u32 = 0x1DCD_6500;

/// Pause value advertised in generated pause frames
pub const PAUSE_VALUE: u32 = 0xFF;

/// Pause frame latency compensation
pub const FC_LATENCY: u32 = 63;
