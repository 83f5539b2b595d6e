//! Creation and validation of the 11-bit (standard) CAN identifiers used by
//! the bridge's outbound frames.
use embedded_can::{Id, StandardId};

use crate::error::CanIdError;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Standard (non-extended) CAN identifier, guaranteed to fit in 11 bits.
pub struct CanId(u16);

impl CanId {
    /// Largest value an 11-bit identifier can hold.
    pub const MAX: u16 = 0x7FF;

    /// Validate a raw identifier.
    pub const fn new(raw: u16) -> Result<Self, CanIdError> {
        if raw > Self::MAX {
            Err(CanIdError::OutOfRange(raw))
        } else {
            Ok(Self(raw))
        }
    }

    /// Build from a constant already known to be in range; out-of-range bits
    /// are masked off.
    pub const fn from_masked(raw: u16) -> Self {
        Self(raw & Self::MAX)
    }

    /// Raw 11-bit value.
    pub const fn raw(&self) -> u16 {
        self.0
    }

    /// Lower identifiers win arbitration.
    pub fn has_priority_over(&self, other: &CanId) -> bool {
        self.0 < other.0
    }
}

impl From<StandardId> for CanId {
    fn from(id: StandardId) -> Self {
        Self(id.as_raw())
    }
}

impl From<CanId> for StandardId {
    fn from(id: CanId) -> Self {
        // Always in range: `CanId` never holds more than 11 bits.
        StandardId::new(id.0).unwrap_or(StandardId::ZERO)
    }
}

impl From<CanId> for Id {
    fn from(id: CanId) -> Self {
        Id::Standard(id.into())
    }
}

impl TryFrom<u16> for CanId {
    type Error = CanIdError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}
