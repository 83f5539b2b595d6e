//! Host quickstart: feeds a few monitor lines through the bridge and prints
//! the CAN frames it would put on the bus.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use std::collections::VecDeque;

use embassy_time::Duration;
use shunt_can_bridge::{
    config::BridgeConfig,
    infra::codec::frames::{FrameCodec, InboundFrame},
    protocol::{
        bus::{
            alerts::{AlertSet, BusStatus},
            diagnostics::Diagnostic,
        },
        scheduler::CycleScheduler,
        transport::{
            can_frame::CanFrame,
            traits::{
                bridge_timer::BridgeTimer,
                can_driver::{CanDriver, DriverSettings},
                serial_source::SerialSource,
            },
        },
    },
};

// ============================================================================
// Console "peripheral": decodes and prints every transmitted frame
// ============================================================================

struct ConsoleCan {
    codec: FrameCodec,
}

impl CanDriver for ConsoleCan {
    type Error = ();

    fn install(&mut self, settings: &DriverSettings) -> Result<(), Self::Error> {
        println!(
            "  install: rx {} tx {} @ {} bit/s, {:?}",
            settings.rx_pin,
            settings.tx_pin,
            settings.bit_rate.bits_per_second(),
            settings.mode
        );
        Ok(())
    }

    fn uninstall(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn reconfigure_alerts(&mut self, alerts: AlertSet) -> Result<(), Self::Error> {
        println!("  alerts armed: {:#06x}", alerts.0);
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        println!("  started\n");
        Ok(())
    }

    async fn transmit<'a>(
        &'a mut self,
        frame: &'a CanFrame,
        _timeout: Duration,
    ) -> Result<(), Self::Error> {
        let id = frame.standard_id().map(|id| id.raw()).unwrap_or_default();
        print!("  TX {:#05x} {:02X?}", id, frame.payload());
        match self.codec.decode(frame) {
            Ok(Some(InboundFrame::BatteryLevels(levels))) => println!(
                "  -> {}.{:02} V, {}{}.{:02} A, {}.{:02} %",
                levels.voltage.whole,
                levels.voltage.hundredths,
                if levels.current.negative { "-" } else { "" },
                levels.current.magnitude.whole,
                levels.current.magnitude.hundredths,
                levels.state_of_charge.whole,
                levels.state_of_charge.hundredths
            ),
            Ok(Some(InboundFrame::PowerTtg(power))) => println!(
                "  -> {}{} W, ttg {} min",
                if power.power.negative { "-" } else { "" },
                power.power.magnitude,
                power.time_to_go.0
            ),
            _ => println!(),
        }
        Ok(())
    }

    async fn read_alerts<'a>(&'a mut self, timeout: Duration) -> Result<AlertSet, Self::Error> {
        tokio::time::sleep(std::time::Duration::from_millis(timeout.as_millis())).await;
        Ok(AlertSet::empty())
    }

    fn status(&mut self) -> Result<BusStatus, Self::Error> {
        Ok(BusStatus::default())
    }

    fn try_receive(&mut self) -> Option<CanFrame> {
        None
    }
}

// ============================================================================
// Scripted serial link and tokio timer
// ============================================================================

struct ScriptedSerial {
    lines: VecDeque<&'static [u8]>,
}

impl SerialSource for ScriptedSerial {
    type Error = ();

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        // One line per read so each tick sees fresh telemetry.
        let Some(line) = self.lines.pop_front() else {
            return Ok(0);
        };
        let len = line.len().min(buf.len());
        buf[..len].copy_from_slice(&line[..len]);
        Ok(len)
    }
}

struct TokioTimer {
    origin: tokio::time::Instant,
}

impl BridgeTimer for TokioTimer {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    async fn delay_ms<'a>(&'a mut self, millis: u32) {
        tokio::time::sleep(std::time::Duration::from_millis(millis as u64)).await;
    }
}

#[tokio::main]
async fn main() {
    println!("=== Shunt CAN bridge quickstart ===\n");

    let config = BridgeConfig::builder().poll_interval_ms(20).build();
    let driver = ConsoleCan {
        codec: FrameCodec::new(config.battery_levels_id, config.power_ttg_id),
    };
    let serial = ScriptedSerial {
        lines: VecDeque::from([
            &b"V\t12800\tI\t-500\tSOC\t950\n"[..],
            &b"P\t-6\tTTG\t-1\n"[..],
            &b"V\t12750\tI\t1520\tPID\t0x203\n"[..],
            &b"SOC\t948\tP\t19\tTTG\t2410\n"[..],
        ]),
    };
    let timer = TokioTimer {
        origin: tokio::time::Instant::now(),
    };

    println!("1. Bringing up the bus:");
    let mut bridge: CycleScheduler<_, _, _> = CycleScheduler::new(config, driver, serial, timer);
    if let Err(err) = bridge.bring_up() {
        println!("  bus unavailable: {err}");
    }

    println!("2. Running four cycles:");
    let mut sink = |diagnostic: Diagnostic<'_>| println!("  diagnostic: {diagnostic:?}");
    let mut ticks = 0;
    while ticks < 4 {
        if bridge.step(&mut sink).await.is_some() {
            ticks += 1;
        } else {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }

    println!("\n3. Final snapshot: {:?}", bridge.snapshot());
    println!("   Decoder stats: {:?}", bridge.decoder_stats());
}
