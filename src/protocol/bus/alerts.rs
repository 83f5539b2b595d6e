//! Alert bitmask and status counters reported by the CAN peripheral.
//!
//! Bit positions follow the ESP32 TWAI alert register so a TWAI-backed
//! driver can pass its raw value straight through.

//==================================================================================ALERT_SET
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Set of alert conditions raised during one poll interval.
pub struct AlertSet(pub u32);

impl AlertSet {
    /// One or more frames are waiting in the RX queue.
    pub const RX_DATA: AlertSet = AlertSet(0x0000_0004);
    /// A bit, stuff, CRC, form or ACK error occurred on the bus.
    pub const BUS_ERROR: AlertSet = AlertSet(0x0000_0200);
    /// The RX queue was full and a received frame was lost.
    pub const RX_QUEUE_FULL: AlertSet = AlertSet(0x0000_0800);
    /// The controller became error passive.
    pub const ERR_PASS: AlertSet = AlertSet(0x0000_1000);

    /// Alerts the bridge subscribes to.
    pub const BRIDGE_ALERTS: AlertSet = AlertSet(
        Self::RX_DATA.0 | Self::ERR_PASS.0 | Self::BUS_ERROR.0 | Self::RX_QUEUE_FULL.0,
    );

    pub const fn empty() -> Self {
        AlertSet(0)
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// `true` when every bit of `other` is set in `self`.
    pub const fn contains(&self, other: AlertSet) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn union(self, other: AlertSet) -> Self {
        AlertSet(self.0 | other.0)
    }

    /// Keep only the bits also present in `mask`.
    pub const fn intersection(self, mask: AlertSet) -> Self {
        AlertSet(self.0 & mask.0)
    }
}

impl core::ops::BitOr for AlertSet {
    type Output = AlertSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

//==================================================================================BUS_STATUS
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Counters read from the peripheral after each alert wait.
pub struct BusStatus {
    /// Frames currently waiting in the RX queue.
    pub rx_queued: u32,
    /// Total bus errors seen by the controller.
    pub bus_error_count: u32,
    /// Frames lost because the RX queue was full.
    pub rx_missed_count: u32,
    /// Frames lost because the hardware FIFO overran.
    pub rx_overrun_count: u32,
}
