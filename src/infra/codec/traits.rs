//! Public traits exposed by the codec. They decouple the typed frame
//! structures from buffer handling and give upper layers a uniform API.
use crate::error::PayloadError;

//==================================================================================TO_PAYLOAD
/// Serialize a data structure into a sequence of bytes.
///
/// Implemented by every outbound frame layout.
pub trait ToPayload {
    /// Serialize the structure into the provided buffer.
    ///
    /// * `buffer`: destination buffer for serialized bytes.
    ///
    /// Returns the number of bytes written on success.
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, PayloadError>;
    /// Serialized payload length for this structure.
    fn payload_len(&self) -> usize;
}
//==================================================================================FROM_PAYLOAD
/// Deserialize a sequence of bytes into a data structure.
///
/// Rebuilds typed values from a frame received on the bus.
pub trait FromPayload: Sized {
    /// Deserialize a byte slice to produce a new instance.
    fn from_payload(bytes_slice: &[u8]) -> Result<Self, PayloadError>;
}

/// Reject buffers whose length differs from a fixed layout.
pub(crate) fn check_len(expected: usize, actual: usize) -> Result<(), PayloadError> {
    if expected == actual {
        Ok(())
    } else {
        Err(PayloadError::InvalidDataLength { expected, actual })
    }
}
