//! Contract with the CAN peripheral driver (ESP32 TWAI, bxCAN, a desktop
//! adapter, or a test double). The bus controller is the only caller and
//! owns the driver exclusively.
//!
//! Every wait is bounded by the timeout passed in: implementations **MUST**
//! return once it elapses, whatever the state of the bus.
use embassy_time::Duration;
use futures_util::Future;

use crate::config::BitRate;
use crate::protocol::bus::alerts::{AlertSet, BusStatus};
use crate::protocol::transport::can_frame::CanFrame;

/// Operating mode requested at installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverMode {
    /// Regular node: transmitted frames require an acknowledgment.
    Normal,
    /// Frames are sent without waiting for acknowledgment from other nodes.
    NoAck,
    /// Receive only, never drive the bus.
    ListenOnly,
}

/// Single acceptance filter (code/mask pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcceptanceFilter {
    pub code: u32,
    /// Bits set to `1` are "don't care".
    pub mask: u32,
    pub single_filter: bool,
}

impl AcceptanceFilter {
    /// Filter that lets every identifier through.
    pub const fn accept_all() -> Self {
        Self {
            code: 0,
            mask: 0xFFFF_FFFF,
            single_filter: true,
        }
    }

    /// Whether a raw identifier passes the filter.
    pub const fn accepts(&self, raw_id: u32) -> bool {
        (raw_id ^ self.code) & !self.mask == 0
    }
}

/// Everything the driver needs to install itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverSettings {
    pub rx_pin: u8,
    pub tx_pin: u8,
    pub bit_rate: BitRate,
    pub mode: DriverMode,
    pub filter: AcceptanceFilter,
}

/// Low-level CAN peripheral operations.
pub trait CanDriver {
    type Error: core::fmt::Debug;

    /// Configure mode, timing and acceptance filter. Does not start the peripheral.
    fn install(&mut self, settings: &DriverSettings) -> Result<(), Self::Error>;

    /// Release the peripheral after a partial bring-up.
    fn uninstall(&mut self) -> Result<(), Self::Error>;

    /// Replace the set of alerts `read_alerts` reports.
    fn reconfigure_alerts(&mut self, alerts: AlertSet) -> Result<(), Self::Error>;

    /// Start participating in bus traffic.
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Queue one frame, waiting at most `timeout` for TX queue space.
    fn transmit<'a>(
        &'a mut self,
        frame: &'a CanFrame,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;

    /// Wait at most `timeout` for any armed alert and return the alerts raised
    /// since the last call. An empty set means the wait timed out.
    fn read_alerts<'a>(
        &'a mut self,
        timeout: Duration,
    ) -> impl Future<Output = Result<AlertSet, Self::Error>> + 'a;

    /// Current error and queue counters.
    fn status(&mut self) -> Result<BusStatus, Self::Error>;

    /// Pop one received frame without waiting.
    fn try_receive(&mut self) -> Option<CanFrame>;
}
