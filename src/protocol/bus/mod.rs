//! CAN peripheral lifecycle: bring-up, best-effort transmission and
//! alert-driven receive/error handling.
//!
//! The controller walks `Uninitialized → Configured → Running` and never goes
//! back. Anything other than `initialize` attempted before the peripheral is
//! running fails fast with [`BusError::NotReady`] without touching hardware.
use embassy_time::Duration;

use crate::config::BusConfig;
use crate::error::{BusError, BusFault, InitStage};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_driver::{
    AcceptanceFilter, CanDriver, DriverMode, DriverSettings,
};

pub mod alerts;
pub mod diagnostics;

use alerts::{AlertSet, BusStatus};
use diagnostics::{BusDiagnostics, Diagnostic, DiagnosticSink};

/// Upper bound on frames drained by one poll, so a flooded bus cannot stall
/// the cycle. Remaining frames are picked up by the next poll, whether or not
/// a new RX alert is raised.
pub const MAX_FRAMES_PER_POLL: usize = 64;

/// Fault alerts in the order they are reported.
const FAULT_ALERTS: [(AlertSet, BusFault); 3] = [
    (AlertSet::ERR_PASS, BusFault::ErrorPassive),
    (AlertSet::BUS_ERROR, BusFault::BusError),
    (AlertSet::RX_QUEUE_FULL, BusFault::ReceiveQueueOverflow),
];

/// Lifecycle state of the peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    Uninitialized,
    Configured,
    Running,
}

/// Outcome of one [`BusController::poll`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollReport {
    /// Armed alerts raised during the interval; empty when the wait timed out.
    pub alerts: AlertSet,
    /// Counters read right after the wait.
    pub status: BusStatus,
    /// Frames drained from the RX queue and handed to the sink.
    pub frames_received: usize,
}

/// Sole owner of the CAN peripheral driver.
pub struct BusController<D: CanDriver> {
    driver: D,
    state: BusState,
    diagnostics: BusDiagnostics,
}

impl<D: CanDriver> BusController<D> {
    /// Wrap a driver; nothing is configured until [`initialize`](Self::initialize).
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            state: BusState::Uninitialized,
            diagnostics: BusDiagnostics::default(),
        }
    }

    pub fn state(&self) -> BusState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == BusState::Running
    }

    /// Counters accumulated since construction.
    pub fn diagnostics(&self) -> &BusDiagnostics {
        &self.diagnostics
    }

    /// Borrow the underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Install the driver in no-ack mode with an accept-all filter and arm the
    /// bridge alerts.
    ///
    /// On failure the controller stays `Uninitialized`; a driver that was
    /// installed before alert arming failed is uninstalled again.
    pub fn initialize(&mut self, config: &BusConfig) -> Result<(), BusError<D::Error>> {
        if self.state != BusState::Uninitialized {
            return Err(BusError::AlreadyInitialized);
        }
        if !config.has_valid_pins() {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "Invalid CAN pins: rx {} / tx {}",
                config.rx_pin,
                config.tx_pin
            );
            return Err(BusError::InvalidPinConfiguration {
                rx: config.rx_pin,
                tx: config.tx_pin,
            });
        }

        let settings = DriverSettings {
            rx_pin: config.rx_pin,
            tx_pin: config.tx_pin,
            bit_rate: config.bit_rate,
            mode: DriverMode::NoAck,
            filter: AcceptanceFilter::accept_all(),
        };

        if let Err(err) = self.driver.install(&settings) {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to install CAN driver");
            return Err(BusError::InitializationFailure(InitStage::Install, err));
        }
        #[cfg(feature = "defmt")]
        defmt::info!("CAN driver installed");

        if let Err(err) = self.driver.reconfigure_alerts(AlertSet::BRIDGE_ALERTS) {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to reconfigure CAN alerts");
            // Leave the peripheral as we found it.
            let _ = self.driver.uninstall();
            return Err(BusError::InitializationFailure(InitStage::ArmAlerts, err));
        }
        #[cfg(feature = "defmt")]
        defmt::info!("CAN alerts armed");

        self.state = BusState::Configured;
        Ok(())
    }

    /// Start the peripheral. Only valid once, right after a successful
    /// [`initialize`](Self::initialize).
    pub fn start(&mut self) -> Result<(), BusError<D::Error>> {
        if self.state != BusState::Configured {
            return Err(BusError::NotReady);
        }
        if let Err(err) = self.driver.start() {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to start CAN driver");
            return Err(BusError::InitializationFailure(InitStage::Start, err));
        }
        #[cfg(feature = "defmt")]
        defmt::info!("CAN driver started");

        self.state = BusState::Running;
        Ok(())
    }

    /// [`initialize`](Self::initialize) followed by [`start`](Self::start).
    pub fn bring_up(&mut self, config: &BusConfig) -> Result<(), BusError<D::Error>> {
        self.initialize(config)?;
        self.start()
    }

    /// Queue one frame, waiting at most `timeout`. Single attempt, no retry;
    /// failures are counted in [`BusDiagnostics::transmit_failures`].
    pub async fn transmit(
        &mut self,
        frame: &CanFrame,
        timeout: Duration,
    ) -> Result<(), BusError<D::Error>> {
        self.ensure_running()?;
        match self.driver.transmit(frame, timeout).await {
            Ok(()) => {
                self.diagnostics.frames_transmitted =
                    self.diagnostics.frames_transmitted.wrapping_add(1);
                Ok(())
            }
            Err(err) => {
                self.diagnostics.transmit_failures =
                    self.diagnostics.transmit_failures.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("Failed to queue frame for transmission");
                Err(BusError::TransmitFailure(err))
            }
        }
    }

    /// Wait at most `interval` for an armed alert, refresh the status counters,
    /// report fault alerts and drain the RX queue into `sink`.
    ///
    /// The queue is drained when `RX_DATA` is raised or the status still
    /// reports queued frames. Draining never waits: only frames already
    /// queued are read.
    pub async fn poll<S: DiagnosticSink>(
        &mut self,
        interval: Duration,
        sink: &mut S,
    ) -> Result<PollReport, BusError<D::Error>> {
        self.ensure_running()?;

        let raised = self
            .driver
            .read_alerts(interval)
            .await
            .map_err(BusError::StatusUnavailable)?;
        let alerts = raised.intersection(AlertSet::BRIDGE_ALERTS);
        let status = self.driver.status().map_err(BusError::StatusUnavailable)?;
        self.diagnostics.last_status = status;

        for (alert, fault) in FAULT_ALERTS {
            if alerts.contains(alert) {
                self.diagnostics.record_fault(fault);
                log_fault(fault, &status);
                sink.report(Diagnostic::Fault { fault, status });
            }
        }

        // RX_DATA only fires for new arrivals; frames left behind by a capped
        // drain are picked up through the queued counter.
        let mut frames_received = 0;
        if alerts.contains(AlertSet::RX_DATA) || status.rx_queued > 0 {
            while frames_received < MAX_FRAMES_PER_POLL {
                let Some(frame) = self.driver.try_receive() else {
                    break;
                };
                frames_received += 1;
                self.diagnostics.frames_received =
                    self.diagnostics.frames_received.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::trace!("RX frame, dlc {}", frame.len);
                sink.report(Diagnostic::FrameReceived(&frame));
            }
        }

        Ok(PollReport {
            alerts,
            status,
            frames_received,
        })
    }

    fn ensure_running(&self) -> Result<(), BusError<D::Error>> {
        if self.is_running() {
            Ok(())
        } else {
            Err(BusError::NotReady)
        }
    }
}

#[cfg(feature = "defmt")]
fn log_fault(fault: BusFault, status: &BusStatus) {
    match fault {
        BusFault::ErrorPassive => defmt::warn!("Alert: CAN controller became error passive"),
        BusFault::BusError => defmt::warn!(
            "Alert: bus error occurred, count {}",
            status.bus_error_count
        ),
        BusFault::ReceiveQueueOverflow => defmt::warn!(
            "Alert: RX queue full, queued {} missed {} overrun {}",
            status.rx_queued,
            status.rx_missed_count,
            status.rx_overrun_count
        ),
    }
}

#[cfg(not(feature = "defmt"))]
fn log_fault(_fault: BusFault, _status: &BusStatus) {}
