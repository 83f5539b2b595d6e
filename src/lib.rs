//! `shunt-can-bridge` library: republishes the text telemetry of a battery
//! monitor as periodic CAN frames in a `no_std` environment. The crate
//! exposes the shared data model, the payload codec, and the protocol
//! components (bus controller, telemetry decoder, cycle scheduler) over
//! driver/timer/serial traits supplied by the firmware.
#![no_std]
//==================================================================================
/// Bridge configuration (pins, bit rate, bounded waits, identifiers).
pub mod config;
/// Telemetry snapshot and the fixed-point value types it is built from.
pub mod core;
/// Bus lifecycle, identifier and payload errors.
pub mod error;
/// Payload codec and numeric conversions.
pub mod infra;
/// Bridge protocol: CAN transport, bus controller, telemetry decoding,
/// and the cycle scheduler.
pub mod protocol;
//==================================================================================
