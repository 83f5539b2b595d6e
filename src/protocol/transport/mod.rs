//! CAN transport layer: 11-bit identifier handling, the in-memory frame
//! representation, and the peripheral/timer/serial abstraction traits.
//!
//! ## Timing constants
//!
//! Defaults for the bounded waits of one bridge cycle. Every value can be
//! overridden through [`BridgeConfig`](crate::config::BridgeConfig).

pub mod can_frame;
pub mod can_id;
pub mod traits;

/// Period between two bridge cycles (ms).
///
/// The shunt emits one telemetry block per second; ticking at ~30 Hz keeps
/// the serial FIFO drained and the outbound frames fresh.
pub const DEFAULT_TICK_PERIOD_MS: u64 = 33;

/// Maximum time a poll waits for an armed alert (ms).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Maximum time a transmit waits for TX queue space (ms).
///
/// Transmission is best-effort: a frame that cannot be queued within this
/// bound is dropped and counted, never retried.
pub const DEFAULT_TRANSMIT_TIMEOUT_MS: u64 = 10;

/// Delay between cycles once the bus controller failed to come up (ms).
pub const DEFAULT_FAILED_INIT_BACKOFF_MS: u64 = 1000;

/// Identifier of the voltage / current / state-of-charge frame.
pub const BATTERY_LEVELS_ID: u16 = 0x23;

/// Identifier of the power / time-to-go frame.
pub const POWER_TTG_ID: u16 = 0x24;
