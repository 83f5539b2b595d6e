//! Outbound frame layouts and the codec that maps a telemetry snapshot onto
//! them.
//!
//! Battery levels frame (7 bytes):
//! ```text
//! [0] voltage whole      [1] voltage hundredths
//! [2] current sign (0|1) [3] current whole      [4] current hundredths
//! [5] SOC whole          [6] SOC hundredths
//! ```
//!
//! Power / time-to-go frame (5 bytes):
//! ```text
//! [0] power sign (0x00|0xFF) [1] power MSB [2] power LSB
//! [3] TTG MSB                [4] TTG LSB
//! ```
//!
//! Whole parts travel as a single byte: only their low eight bits are kept.
use crate::core::{Hundredths, PowerReading, SignedHundredths, TelemetrySnapshot, TimeToGo};
use crate::error::PayloadError;
use crate::infra::codec::traits::{check_len, FromPayload, ToPayload};
use crate::protocol::transport::can_frame::{CanFrame, MAX_DATA_LEN};
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::{BATTERY_LEVELS_ID, POWER_TTG_ID};

//==================================================================================BATTERY_LEVELS
/// Voltage, signed current and state of charge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryLevelsFrame {
    pub voltage: Hundredths,
    pub current: SignedHundredths,
    pub state_of_charge: Hundredths,
}

impl BatteryLevelsFrame {
    pub const LEN: usize = 7;

    pub fn from_snapshot(snapshot: &TelemetrySnapshot) -> Self {
        Self {
            voltage: snapshot.voltage,
            current: snapshot.current,
            state_of_charge: snapshot.state_of_charge,
        }
    }
}

impl ToPayload for BatteryLevelsFrame {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, PayloadError> {
        let actual = buffer.len();
        let out = buffer
            .get_mut(..Self::LEN)
            .ok_or(PayloadError::InvalidDataLength {
                expected: Self::LEN,
                actual,
            })?;
        out.copy_from_slice(&[
            low_byte(self.voltage.whole),
            self.voltage.hundredths,
            self.current.sign_flag(),
            low_byte(self.current.magnitude.whole),
            self.current.magnitude.hundredths,
            low_byte(self.state_of_charge.whole),
            self.state_of_charge.hundredths,
        ]);
        Ok(Self::LEN)
    }

    fn payload_len(&self) -> usize {
        Self::LEN
    }
}

impl FromPayload for BatteryLevelsFrame {
    fn from_payload(bytes_slice: &[u8]) -> Result<Self, PayloadError> {
        check_len(Self::LEN, bytes_slice.len())?;
        let negative = match bytes_slice[2] {
            0 => false,
            1 => true,
            other => return Err(PayloadError::InvalidSignByte(other)),
        };
        Ok(Self {
            voltage: Hundredths::new(bytes_slice[0] as u32, bytes_slice[1]),
            current: SignedHundredths {
                negative,
                magnitude: Hundredths::new(bytes_slice[3] as u32, bytes_slice[4]),
            },
            state_of_charge: Hundredths::new(bytes_slice[5] as u32, bytes_slice[6]),
        })
    }
}

//==================================================================================POWER_TTG
/// Sign/magnitude power and time to go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerTtgFrame {
    pub power: PowerReading,
    pub time_to_go: TimeToGo,
}

impl PowerTtgFrame {
    pub const LEN: usize = 5;

    pub fn from_snapshot(snapshot: &TelemetrySnapshot) -> Self {
        Self {
            power: snapshot.power,
            time_to_go: snapshot.time_to_go,
        }
    }
}

impl ToPayload for PowerTtgFrame {
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, PayloadError> {
        let actual = buffer.len();
        let out = buffer
            .get_mut(..Self::LEN)
            .ok_or(PayloadError::InvalidDataLength {
                expected: Self::LEN,
                actual,
            })?;
        out.copy_from_slice(&[
            self.power.sign_byte(),
            self.power.msb(),
            self.power.lsb(),
            self.time_to_go.msb(),
            self.time_to_go.lsb(),
        ]);
        Ok(Self::LEN)
    }

    fn payload_len(&self) -> usize {
        Self::LEN
    }
}

impl FromPayload for PowerTtgFrame {
    fn from_payload(bytes_slice: &[u8]) -> Result<Self, PayloadError> {
        check_len(Self::LEN, bytes_slice.len())?;
        let negative = match bytes_slice[0] {
            PowerReading::POSITIVE_MARKER => false,
            PowerReading::NEGATIVE_MARKER => true,
            other => return Err(PayloadError::InvalidSignByte(other)),
        };
        Ok(Self {
            power: PowerReading {
                negative,
                magnitude: u16::from_be_bytes([bytes_slice[1], bytes_slice[2]]),
            },
            time_to_go: TimeToGo(u16::from_be_bytes([bytes_slice[3], bytes_slice[4]])),
        })
    }
}

//==================================================================================CODEC
/// Frame decoded from the bus by [`FrameCodec::decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InboundFrame {
    BatteryLevels(BatteryLevelsFrame),
    PowerTtg(PowerTtgFrame),
}

/// Pure mapping between a [`TelemetrySnapshot`] and the two outbound frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCodec {
    battery_levels_id: CanId,
    power_ttg_id: CanId,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(
            CanId::from_masked(BATTERY_LEVELS_ID),
            CanId::from_masked(POWER_TTG_ID),
        )
    }
}

impl FrameCodec {
    pub const fn new(battery_levels_id: CanId, power_ttg_id: CanId) -> Self {
        Self {
            battery_levels_id,
            power_ttg_id,
        }
    }

    pub fn battery_levels_id(&self) -> CanId {
        self.battery_levels_id
    }

    pub fn power_ttg_id(&self) -> CanId {
        self.power_ttg_id
    }

    /// Standard 7-byte data frame with voltage, current and state of charge.
    pub fn encode_voltage_current_soc(&self, snapshot: &TelemetrySnapshot) -> CanFrame {
        build_frame(
            self.battery_levels_id,
            &BatteryLevelsFrame::from_snapshot(snapshot),
        )
    }

    /// Standard 5-byte data frame with power and time to go.
    pub fn encode_power_ttg(&self, snapshot: &TelemetrySnapshot) -> CanFrame {
        build_frame(self.power_ttg_id, &PowerTtgFrame::from_snapshot(snapshot))
    }

    /// Decode a received frame carrying one of the two layouts.
    ///
    /// Returns `Ok(None)` for extended, remote or foreign-identifier frames.
    pub fn decode(&self, frame: &CanFrame) -> Result<Option<InboundFrame>, PayloadError> {
        if frame.remote {
            return Ok(None);
        }
        let Some(id) = frame.standard_id() else {
            return Ok(None);
        };
        if id == self.battery_levels_id {
            BatteryLevelsFrame::from_payload(frame.payload())
                .map(|levels| Some(InboundFrame::BatteryLevels(levels)))
        } else if id == self.power_ttg_id {
            PowerTtgFrame::from_payload(frame.payload())
                .map(|power| Some(InboundFrame::PowerTtg(power)))
        } else {
            Ok(None)
        }
    }
}

/// Decode a battery levels frame, checking its identifier first.
pub fn decode_battery_levels(
    frame: &CanFrame,
    expected: CanId,
) -> Result<BatteryLevelsFrame, PayloadError> {
    check_identifier(frame, expected)?;
    BatteryLevelsFrame::from_payload(frame.payload())
}

/// Decode a power / time-to-go frame, checking its identifier first.
pub fn decode_power_ttg(frame: &CanFrame, expected: CanId) -> Result<PowerTtgFrame, PayloadError> {
    check_identifier(frame, expected)?;
    PowerTtgFrame::from_payload(frame.payload())
}

fn check_identifier(frame: &CanFrame, expected: CanId) -> Result<(), PayloadError> {
    match frame.standard_id() {
        Some(id) if id == expected => Ok(()),
        Some(id) => Err(PayloadError::UnexpectedIdentifier {
            expected: expected.raw(),
            actual: id.raw(),
        }),
        None => Err(PayloadError::ExtendedIdentifier),
    }
}

fn build_frame<P: ToPayload>(id: CanId, layout: &P) -> CanFrame {
    let mut data = [0u8; MAX_DATA_LEN];
    // Both layouts fit in a classic frame, so the write cannot fail.
    let len = layout.to_payload(&mut data).unwrap_or(0);
    CanFrame {
        id: id.into(),
        data,
        len,
        remote: false,
    }
}

const fn low_byte(value: u32) -> u8 {
    (value & 0xFF) as u8
}
