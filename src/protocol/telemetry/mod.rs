//! Telemetry side of the bridge: line assembly from the serial byte stream,
//! tag/value splitting, and the dispatch that keeps the snapshot current.
//!
//! Input lines look like `V\t12800\tI\t-500\tSOC\t950`: tags and values
//! alternate, separated by single tabs. No checksum is validated.
pub mod decoder;
pub mod line_buffer;
pub mod pairs;
pub mod shared;
pub mod tags;
