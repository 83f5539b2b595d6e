//! Diagnostic reporting: counters kept by the bus controller and the sink
//! through which faults, received frames and dropped transmissions surface.
//!
//! Nothing here can fail or block; the bridge runs unattended and every
//! hardware problem degrades to a diagnostic.
use crate::error::BusFault;
use crate::protocol::bus::alerts::BusStatus;
use crate::protocol::telemetry::line_buffer::LineDiscard;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;

//==================================================================================DIAGNOSTIC
/// Event reported to a [`DiagnosticSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic<'a> {
    /// Peripheral fault alert, with the counters read in the same poll.
    Fault { fault: BusFault, status: BusStatus },
    /// Frame drained from the RX queue.
    FrameReceived(&'a CanFrame),
    /// Outbound frame dropped (queue full or timeout).
    TransmitFailed(CanId),
    /// Bus controller is not running; the cycle skipped bus work.
    BusUnavailable,
    /// The status or alert read failed this cycle.
    StatusUnavailable,
    /// An incoming telemetry line was dropped before decoding.
    LineDiscarded(LineDiscard),
    /// A telemetry line was decoded only up to its first non-UTF-8 byte.
    LineTruncated,
    /// The serial source returned an error.
    SerialReadFailed,
}

/// Consumer of diagnostic events (logger, LED, counter, test recorder).
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic<'_>);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(Diagnostic<'_>),
{
    fn report(&mut self, diagnostic: Diagnostic<'_>) {
        self(diagnostic)
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&mut self, _diagnostic: Diagnostic<'_>) {}
}

//==================================================================================COUNTERS
/// Running counters maintained by the bus controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusDiagnostics {
    pub frames_transmitted: u32,
    pub transmit_failures: u32,
    pub frames_received: u32,
    pub bus_error_alerts: u32,
    pub error_passive_alerts: u32,
    pub rx_queue_full_alerts: u32,
    /// Counters read during the most recent poll.
    pub last_status: BusStatus,
}

impl BusDiagnostics {
    /// Count one occurrence of `fault`.
    pub fn record_fault(&mut self, fault: BusFault) {
        let counter = match fault {
            BusFault::BusError => &mut self.bus_error_alerts,
            BusFault::ErrorPassive => &mut self.error_passive_alerts,
            BusFault::ReceiveQueueOverflow => &mut self.rx_queue_full_alerts,
        };
        *counter = counter.wrapping_add(1);
    }
}
