//! Periodic bridge cycle.
//!
//! Each tick:
//! 1. drains every complete line from the serial source into the decoder;
//! 2. polls the bus controller (bounded by `poll_interval`) and reports
//!    alerts and received frames to the diagnostic sink;
//! 3. encodes and transmits the battery levels frame, then the power frame,
//!    each bounded by `transmit_timeout`. Failures are reported, never retried.
//!
//! Both frames of a tick are encoded from one copy of the snapshot taken
//! right after step 1.
use crate::config::BridgeConfig;
use crate::core::TelemetrySnapshot;
use crate::error::BusError;
use crate::infra::codec::frames::FrameCodec;
use crate::protocol::bus::diagnostics::{Diagnostic, DiagnosticSink};
use crate::protocol::bus::{BusController, PollReport};
use crate::protocol::telemetry::decoder::{DecoderStats, TelemetryDecoder};
use crate::protocol::telemetry::line_buffer::{LineAssembler, DEFAULT_LINE_CAPACITY};
use crate::protocol::transport::traits::{
    bridge_timer::BridgeTimer, can_driver::CanDriver, serial_source::SerialSource,
};

/// Bytes requested from the serial source per read.
const SERIAL_CHUNK_LEN: usize = 64;

/// Reads per tick before yielding to the bus work, even if bytes remain.
pub const MAX_SERIAL_READS_PER_TICK: usize = 32;

/// Summary of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Complete lines handed to the decoder.
    pub lines: usize,
    /// Present when the bus was running and the poll succeeded.
    pub poll: Option<PollReport>,
    pub frames_sent: u8,
    pub frames_dropped: u8,
}

/// Drives the serial → snapshot → CAN pipeline on a fixed period.
pub struct CycleScheduler<D, S, T, const N: usize = DEFAULT_LINE_CAPACITY>
where
    D: CanDriver,
    S: SerialSource,
    T: BridgeTimer,
{
    config: BridgeConfig,
    bus: BusController<D>,
    serial: S,
    timer: T,
    codec: FrameCodec,
    decoder: TelemetryDecoder,
    lines: LineAssembler<N>,
    snapshot: TelemetrySnapshot,
    last_tick_ms: Option<u64>,
}

impl<D, S, T, const N: usize> CycleScheduler<D, S, T, N>
where
    D: CanDriver,
    S: SerialSource,
    T: BridgeTimer,
{
    pub fn new(config: BridgeConfig, driver: D, serial: S, timer: T) -> Self {
        Self {
            codec: FrameCodec::new(config.battery_levels_id, config.power_ttg_id),
            config,
            bus: BusController::new(driver),
            serial,
            timer,
            decoder: TelemetryDecoder::new(),
            lines: LineAssembler::new(),
            snapshot: TelemetrySnapshot::new(),
            last_tick_ms: None,
        }
    }

    /// Initialize and start the bus controller with the configured pins and
    /// bit rate. On failure the scheduler keeps decoding but skips bus work.
    pub fn bring_up(&mut self) -> Result<(), BusError<D::Error>> {
        self.bus.bring_up(&self.config.bus)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn bus(&self) -> &BusController<D> {
        &self.bus
    }

    /// Latest decoded telemetry.
    pub fn snapshot(&self) -> &TelemetrySnapshot {
        &self.snapshot
    }

    pub fn decoder_stats(&self) -> &DecoderStats {
        self.decoder.stats()
    }

    /// Whether a tick is due at `now_ms`. The first tick is always due.
    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_tick_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= self.config.tick_period.as_millis(),
        }
    }

    /// Run one tick if the period has elapsed.
    pub async fn step<K: DiagnosticSink>(&mut self, sink: &mut K) -> Option<TickReport> {
        let now = self.timer.now_ms();
        if !self.is_due(now) {
            return None;
        }
        self.last_tick_ms = Some(now);
        Some(self.tick(sink).await)
    }

    /// Run one full cycle now, regardless of the period.
    pub async fn tick<K: DiagnosticSink>(&mut self, sink: &mut K) -> TickReport {
        let lines = self.drain_serial(sink);
        let frozen = self.snapshot;

        let mut report = TickReport {
            lines,
            ..TickReport::default()
        };

        if !self.bus.is_running() {
            sink.report(Diagnostic::BusUnavailable);
            return report;
        }

        match self.bus.poll(self.config.poll_interval, sink).await {
            Ok(poll) => report.poll = Some(poll),
            Err(_) => sink.report(Diagnostic::StatusUnavailable),
        }

        let frames = [
            self.codec.encode_voltage_current_soc(&frozen),
            self.codec.encode_power_ttg(&frozen),
        ];
        for frame in &frames {
            match self.bus.transmit(frame, self.config.transmit_timeout).await {
                Ok(()) => report.frames_sent += 1,
                Err(_) => {
                    report.frames_dropped += 1;
                    if let Some(id) = frame.standard_id() {
                        sink.report(Diagnostic::TransmitFailed(id));
                    }
                }
            }
        }

        report
    }

    /// Tick forever at the configured period. Once the bus controller is
    /// known to be down, each cycle also waits `failed_init_backoff`.
    pub async fn run<K: DiagnosticSink>(&mut self, sink: &mut K) -> ! {
        loop {
            if self.step(sink).await.is_some() {
                if !self.bus.is_running() {
                    let backoff = self.config.failed_init_backoff.as_millis();
                    self.timer.delay_ms(clamp_ms(backoff)).await;
                }
                continue;
            }
            let elapsed = self
                .last_tick_ms
                .map(|last| self.timer.now_ms().wrapping_sub(last))
                .unwrap_or(0);
            let remaining = self
                .config
                .tick_period
                .as_millis()
                .saturating_sub(elapsed)
                .max(1);
            self.timer.delay_ms(clamp_ms(remaining)).await;
        }
    }

    /// Feed every byte the serial source has ready through the line
    /// assembler and decoder. Returns the number of complete lines.
    fn drain_serial<K: DiagnosticSink>(&mut self, sink: &mut K) -> usize {
        let Self {
            serial,
            lines: assembler,
            decoder,
            snapshot,
            ..
        } = self;

        let mut chunk = [0u8; SERIAL_CHUNK_LEN];
        let mut lines = 0;
        for _ in 0..MAX_SERIAL_READS_PER_TICK {
            let read = match serial.read_available(&mut chunk) {
                Ok(0) => break,
                Ok(read) => read.min(chunk.len()),
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Serial read failed");
                    decoder.record_serial_error();
                    sink.report(Diagnostic::SerialReadFailed);
                    break;
                }
            };

            assembler.feed(&chunk[..read], |line| match line {
                Ok(bytes) => {
                    lines += 1;
                    if decoder.decode_bytes(bytes, snapshot).truncated {
                        sink.report(Diagnostic::LineTruncated);
                    }
                }
                Err(discard) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Telemetry line discarded: {}", discard);
                    decoder.record_discard(discard);
                    sink.report(Diagnostic::LineDiscarded(discard));
                }
            });
        }
        lines
    }
}

fn clamp_ms(millis: u64) -> u32 {
    u32::try_from(millis).unwrap_or(u32::MAX)
}
