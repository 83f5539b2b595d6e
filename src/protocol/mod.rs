//! High-level components of the bridge: CAN transport, peripheral
//! lifecycle, telemetry decoding and the periodic cycle.
pub mod bus;
pub mod scheduler;
pub mod telemetry;
pub mod transport;
