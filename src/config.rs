//! Bridge configuration: pin assignment, bit rate, bounded waits and frame
//! identifiers. Defaults reproduce the reference wiring (RX 13, TX 15,
//! 500 kbit/s) and timing (33 ms tick, 100 ms poll, 10 ms transmit).
use embassy_time::Duration;

use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::{
    BATTERY_LEVELS_ID, DEFAULT_FAILED_INIT_BACKOFF_MS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_TICK_PERIOD_MS, DEFAULT_TRANSMIT_TIMEOUT_MS, POWER_TTG_ID,
};

/// Reference RX pin.
pub const DEFAULT_RX_PIN: u8 = 13;
/// Reference TX pin.
pub const DEFAULT_TX_PIN: u8 = 15;

//==================================================================================BIT_RATE
/// Nominal bus bit rates supported by common CAN controllers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitRate {
    Kbps25,
    Kbps50,
    Kbps100,
    Kbps125,
    Kbps250,
    #[default]
    Kbps500,
    Kbps800,
    Mbps1,
}

impl BitRate {
    /// Bits per second.
    pub const fn bits_per_second(self) -> u32 {
        match self {
            BitRate::Kbps25 => 25_000,
            BitRate::Kbps50 => 50_000,
            BitRate::Kbps100 => 100_000,
            BitRate::Kbps125 => 125_000,
            BitRate::Kbps250 => 250_000,
            BitRate::Kbps500 => 500_000,
            BitRate::Kbps800 => 800_000,
            BitRate::Mbps1 => 1_000_000,
        }
    }
}

//==================================================================================BUS_CONFIG
/// Physical bus parameters handed to the bus controller at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    pub rx_pin: u8,
    pub tx_pin: u8,
    pub bit_rate: BitRate,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            rx_pin: DEFAULT_RX_PIN,
            tx_pin: DEFAULT_TX_PIN,
            bit_rate: BitRate::default(),
        }
    }
}

impl BusConfig {
    pub const fn new(rx_pin: u8, tx_pin: u8, bit_rate: BitRate) -> Self {
        Self {
            rx_pin,
            tx_pin,
            bit_rate,
        }
    }

    /// RX and TX must be routed to distinct pins.
    pub const fn has_valid_pins(&self) -> bool {
        self.rx_pin != self.tx_pin
    }
}

//==================================================================================BRIDGE_CONFIG
/// Complete runtime configuration of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    pub bus: BusConfig,
    /// Period between two cycles.
    pub tick_period: Duration,
    /// Upper bound of the alert wait in each cycle.
    pub poll_interval: Duration,
    /// Upper bound of each frame's wait for TX queue space.
    pub transmit_timeout: Duration,
    /// Delay between cycles when the bus controller never came up.
    pub failed_init_backoff: Duration,
    /// Identifier of the voltage / current / SOC frame.
    pub battery_levels_id: CanId,
    /// Identifier of the power / time-to-go frame.
    pub power_ttg_id: CanId,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            tick_period: Duration::from_millis(DEFAULT_TICK_PERIOD_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            transmit_timeout: Duration::from_millis(DEFAULT_TRANSMIT_TIMEOUT_MS),
            failed_init_backoff: Duration::from_millis(DEFAULT_FAILED_INIT_BACKOFF_MS),
            battery_levels_id: CanId::from_masked(BATTERY_LEVELS_ID),
            power_ttg_id: CanId::from_masked(POWER_TTG_ID),
        }
    }
}

impl BridgeConfig {
    /// Start a builder seeded with the defaults.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }
}

/// Fluent builder for [`BridgeConfig`].
#[derive(Debug, Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    /// RX/TX pin assignment.
    pub fn pins(mut self, rx_pin: u8, tx_pin: u8) -> Self {
        self.config.bus.rx_pin = rx_pin;
        self.config.bus.tx_pin = tx_pin;
        self
    }

    pub fn bit_rate(mut self, bit_rate: BitRate) -> Self {
        self.config.bus.bit_rate = bit_rate;
        self
    }

    pub fn tick_period_ms(mut self, millis: u64) -> Self {
        self.config.tick_period = Duration::from_millis(millis);
        self
    }

    pub fn poll_interval_ms(mut self, millis: u64) -> Self {
        self.config.poll_interval = Duration::from_millis(millis);
        self
    }

    pub fn transmit_timeout_ms(mut self, millis: u64) -> Self {
        self.config.transmit_timeout = Duration::from_millis(millis);
        self
    }

    pub fn failed_init_backoff_ms(mut self, millis: u64) -> Self {
        self.config.failed_init_backoff = Duration::from_millis(millis);
        self
    }

    /// Override both outbound identifiers.
    pub fn identifiers(mut self, battery_levels: CanId, power_ttg: CanId) -> Self {
        self.config.battery_levels_id = battery_levels;
        self.config.power_ttg_id = power_ttg;
        self
    }

    pub fn build(self) -> BridgeConfig {
        self.config
    }
}
