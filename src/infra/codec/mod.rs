//! Conversions between typed telemetry values and fixed-layout CAN payloads.
pub mod frames;
pub mod numeric;
pub mod traits;
