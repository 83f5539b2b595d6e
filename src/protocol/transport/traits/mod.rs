//! Abstraction traits used by the bridge (CAN peripheral, timer, serial input).
pub mod bridge_timer;
pub mod can_driver;
pub mod serial_source;
