//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (bus lifecycle, CAN
//! identifier construction, inbound payload decoding).
use thiserror_no_std::Error;

//==================================================================================BUS_ERROR
/// Peripheral step at which bring-up failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStage {
    /// Driver installation (mode, timing, acceptance filter).
    Install,
    /// Alert subscription.
    ArmAlerts,
    /// Peripheral start.
    Start,
}

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors returned by the bus controller. `E` is the peripheral driver error.
pub enum BusError<E: core::fmt::Debug> {
    /// The peripheral refused its configuration or failed to start.
    #[error("Initialization failed at {0:?}: {1:?}")]
    InitializationFailure(InitStage, E),
    /// RX and TX pins cannot be routed as requested.
    #[error("Invalid pin configuration: rx {rx}, tx {tx}")]
    InvalidPinConfiguration { rx: u8, tx: u8 },
    /// Operation attempted in a state that does not allow it.
    #[error("Bus controller not ready")]
    NotReady,
    /// `initialize` called on a controller that is already configured.
    #[error("Bus controller already initialized")]
    AlreadyInitialized,
    /// Frame could not be queued before the timeout elapsed.
    #[error("Transmit failed: {0:?}")]
    TransmitFailure(E),
    /// Status counters could not be read from the peripheral.
    #[error("Status unavailable: {0:?}")]
    StatusUnavailable(E),
}

//==================================================================================BUS_FAULT
/// Fault conditions reported by the peripheral through its alert set.
/// Surfaced as diagnostics, never returned as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFault {
    /// Bit, stuff, CRC, form or ACK error on the bus.
    BusError,
    /// The controller entered the error-passive state.
    ErrorPassive,
    /// The receive queue was full and a frame was lost.
    ReceiveQueueOverflow,
}

//==================================================================================CAN_ID_ERROR
#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur while building an 11-bit CAN identifier.
pub enum CanIdError {
    /// Value does not fit in 11 bits.
    #[error("Identifier out of range: {0:#x}")]
    OutOfRange(u16),
}

//==================================================================================PAYLOAD_ERROR
#[derive(Error, Debug, PartialEq, Eq)]
/// Failures while writing or reading a fixed-layout payload.
pub enum PayloadError {
    /// Buffer or frame length does not match the layout.
    #[error("Invalid data length -> expected: {expected}, actual: {actual}")]
    InvalidDataLength { expected: usize, actual: usize },
    /// Frame carries an identifier other than the one this layout uses.
    #[error("Unexpected identifier -> expected: {expected:#x}, actual: {actual:#x}")]
    UnexpectedIdentifier { expected: u16, actual: u16 },
    /// Frame carries a 29-bit identifier; both layouts use standard ones.
    #[error("Extended identifier where a standard one was expected")]
    ExtendedIdentifier,
    /// Sign byte holds a value outside the layout's two markers.
    #[error("Invalid sign byte {0:#x}")]
    InvalidSignByte(u8),
}
