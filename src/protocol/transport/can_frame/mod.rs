//! In-memory representation of a classic CAN frame as handed to, or read
//! from, the peripheral driver.
use embedded_can::{Frame, Id};

use crate::protocol::transport::can_id::CanId;

/// Classic CAN payload capacity.
pub const MAX_DATA_LEN: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Raw CAN frame. Outbound frames are always standard data frames; inbound
/// frames may carry any identifier the acceptance filter lets through.
pub struct CanFrame {
    /// Standard or extended identifier.
    pub id: Id,
    /// Payload buffer. Bytes past `len` are zero.
    pub data: [u8; MAX_DATA_LEN],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
    /// Remote transmission request flag.
    pub remote: bool,
}

impl CanFrame {
    /// Build a standard data frame. Returns `None` when `data` exceeds eight bytes.
    pub fn standard(id: CanId, data: &[u8]) -> Option<Self> {
        <Self as Frame>::new(id, data)
    }

    /// Identifier as an 11-bit [`CanId`], `None` for extended frames.
    pub fn standard_id(&self) -> Option<CanId> {
        match self.id {
            Id::Standard(id) => Some(CanId::from(id)),
            Id::Extended(_) => None,
        }
    }

    /// Populated payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > MAX_DATA_LEN {
            return None;
        }
        let mut payload = [0u8; MAX_DATA_LEN];
        payload[..data.len()].copy_from_slice(data);
        Some(Self {
            id: id.into(),
            data: payload,
            len: data.len(),
            remote: false,
        })
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_DATA_LEN {
            return None;
        }
        Some(Self {
            id: id.into(),
            data: [0u8; MAX_DATA_LEN],
            len: dlc,
            remote: true,
        })
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        if self.remote {
            &[]
        } else {
            self.payload()
        }
    }
}
