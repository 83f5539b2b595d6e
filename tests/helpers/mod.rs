/// Test doubles to simulate the CAN peripheral, the serial link and the timer
/// during integration tests.
use shunt_can_bridge::{
    error::BusFault,
    protocol::{
        bus::{
            alerts::{AlertSet, BusStatus},
            diagnostics::{Diagnostic, DiagnosticSink},
        },
        telemetry::line_buffer::LineDiscard,
        transport::{
            can_frame::CanFrame,
            can_id::CanId,
            traits::{
                bridge_timer::BridgeTimer,
                can_driver::{CanDriver, DriverSettings},
                serial_source::SerialSource,
            },
        },
    },
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration, Instant};

/// Highest GPIO number the simulated chip can route to the CAN controller.
#[allow(dead_code)]
pub const MAX_PIN: u8 = 39;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum FakeError {
    InvalidPin,
    NotInstalled,
    AlertsRejected,
    StartRejected,
    TxTimeout,
}

#[derive(Debug, Default)]
#[allow(dead_code)]
/// Scripted CAN peripheral that records every call made by the controller.
pub struct FakeCanDriver {
    pub settings: Option<DriverSettings>,
    pub armed: AlertSet,
    pub started: bool,
    pub install_calls: usize,
    pub uninstall_calls: usize,
    pub start_calls: usize,
    pub transmit_calls: usize,
    pub transmitted: Vec<CanFrame>,
    pub poll_timeouts: Vec<embassy_time::Duration>,
    /// Alerts returned by successive polls; an empty queue makes the poll
    /// wait for its whole timeout.
    pub pending_alerts: VecDeque<AlertSet>,
    pub rx_queue: VecDeque<CanFrame>,
    pub status: BusStatus,
    /// Zero-based transmit attempts that time out.
    pub failing_transmits: Vec<usize>,
    pub reject_alerts: bool,
    pub reject_start: bool,
}

#[allow(dead_code)]
impl FakeCanDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CanDriver for FakeCanDriver {
    type Error = FakeError;

    fn install(&mut self, settings: &DriverSettings) -> Result<(), Self::Error> {
        self.install_calls += 1;
        if settings.rx_pin > MAX_PIN || settings.tx_pin > MAX_PIN {
            return Err(FakeError::InvalidPin);
        }
        self.settings = Some(*settings);
        Ok(())
    }

    fn uninstall(&mut self) -> Result<(), Self::Error> {
        self.uninstall_calls += 1;
        self.settings.take().map(|_| ()).ok_or(FakeError::NotInstalled)
    }

    fn reconfigure_alerts(&mut self, alerts: AlertSet) -> Result<(), Self::Error> {
        if self.reject_alerts {
            return Err(FakeError::AlertsRejected);
        }
        self.armed = alerts;
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        self.start_calls += 1;
        if self.reject_start {
            return Err(FakeError::StartRejected);
        }
        if self.settings.is_none() {
            return Err(FakeError::NotInstalled);
        }
        self.started = true;
        Ok(())
    }

    async fn transmit<'a>(
        &'a mut self,
        frame: &'a CanFrame,
        timeout: embassy_time::Duration,
    ) -> Result<(), Self::Error> {
        let attempt = self.transmit_calls;
        self.transmit_calls += 1;
        if self.failing_transmits.contains(&attempt) {
            sleep(Duration::from_millis(timeout.as_millis())).await;
            return Err(FakeError::TxTimeout);
        }
        self.transmitted.push(frame.clone());
        Ok(())
    }

    async fn read_alerts<'a>(
        &'a mut self,
        timeout: embassy_time::Duration,
    ) -> Result<AlertSet, Self::Error> {
        self.poll_timeouts.push(timeout);
        match self.pending_alerts.pop_front() {
            Some(alerts) => Ok(alerts.intersection(self.armed)),
            None => {
                sleep(Duration::from_millis(timeout.as_millis())).await;
                Ok(AlertSet::empty())
            }
        }
    }

    fn status(&mut self) -> Result<BusStatus, Self::Error> {
        Ok(BusStatus {
            rx_queued: self.rx_queue.len() as u32,
            ..self.status
        })
    }

    fn try_receive(&mut self) -> Option<CanFrame> {
        self.rx_queue.pop_front()
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// In-memory serial link; the test keeps a clone to push bytes into it.
pub struct MockSerial {
    inbox: Arc<Mutex<VecDeque<u8>>>,
    fail_next: Arc<Mutex<bool>>,
}

#[allow(dead_code)]
impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, bytes: &[u8]) {
        self.inbox.lock().unwrap().extend(bytes.iter().copied());
    }

    pub fn fail_next_read(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    pub fn pending(&self) -> usize {
        self.inbox.lock().unwrap().len()
    }
}

impl SerialSource for MockSerial {
    type Error = ();

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(());
        }
        let mut inbox = self.inbox.lock().unwrap();
        let count = buf.len().min(inbox.len());
        for (slot, byte) in buf.iter_mut().zip(inbox.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time` so tests can run on a paused clock.
pub struct MockTimer {
    origin: Instant,
}

#[allow(dead_code)]
impl MockTimer {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl BridgeTimer for MockTimer {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    async fn delay_ms<'a>(&'a mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
/// Owned copy of a [`Diagnostic`], so events outlive the borrowed frame.
pub enum Event {
    Fault(BusFault),
    FrameReceived(CanFrame),
    TransmitFailed(CanId),
    BusUnavailable,
    StatusUnavailable,
    LineDiscarded(LineDiscard),
    LineTruncated,
    SerialReadFailed,
}

#[derive(Debug, Default)]
#[allow(dead_code)]
/// Sink that keeps every reported event in order.
pub struct Recorder {
    pub events: Vec<Event>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn count(&self, event: &Event) -> usize {
        self.events.iter().filter(|seen| *seen == event).count()
    }
}

impl DiagnosticSink for Recorder {
    fn report(&mut self, diagnostic: Diagnostic<'_>) {
        let event = match diagnostic {
            Diagnostic::Fault { fault, .. } => Event::Fault(fault),
            Diagnostic::FrameReceived(frame) => Event::FrameReceived(frame.clone()),
            Diagnostic::TransmitFailed(id) => Event::TransmitFailed(id),
            Diagnostic::BusUnavailable => Event::BusUnavailable,
            Diagnostic::StatusUnavailable => Event::StatusUnavailable,
            Diagnostic::LineDiscarded(discard) => Event::LineDiscarded(discard),
            Diagnostic::LineTruncated => Event::LineTruncated,
            Diagnostic::SerialReadFailed => Event::SerialReadFailed,
        };
        self.events.push(event);
    }
}
