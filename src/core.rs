//! Shared data model: the telemetry snapshot fed by the decoder and read by
//! the frame codec, plus the fixed-point value types it is made of.

//==================================================================================SCALE
/// Scale factor between the integer carried on the serial link and the
/// physical unit published on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scale {
    /// ×0.001 (millivolts → volts, milliamps → amps).
    Milli,
    /// ×0.1 (per-mille → percent).
    Deci,
}

impl Scale {
    /// Number of raw units in one whole unit.
    pub const fn divisor(self) -> u32 {
        match self {
            Scale::Milli => 1000,
            Scale::Deci => 10,
        }
    }
}

//==================================================================================FIXED_POINT
/// Non-negative value split into a whole part and two decimal digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hundredths {
    /// Integer part, truncated toward zero.
    pub whole: u32,
    /// Fractional part in hundredths (0..=99).
    pub hundredths: u8,
}

impl Hundredths {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(whole: u32, hundredths: u8) -> Self {
        Self { whole, hundredths }
    }
}

/// Fixed-point value whose sign travels separately from its magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignedHundredths {
    /// `true` when the source reading was strictly below zero.
    pub negative: bool,
    pub magnitude: Hundredths,
}

impl SignedHundredths {
    pub const ZERO: Self = Self {
        negative: false,
        magnitude: Hundredths::ZERO,
    };

    /// Sign flag as carried on the wire: `1` for negative, `0` otherwise.
    pub const fn sign_flag(&self) -> u8 {
        if self.negative {
            1
        } else {
            0
        }
    }
}

//==================================================================================POWER
/// Instantaneous power in watts as a sign/magnitude pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerReading {
    pub negative: bool,
    /// Absolute value clipped to 16 bits.
    pub magnitude: u16,
}

impl PowerReading {
    /// Marker byte for negative power.
    pub const NEGATIVE_MARKER: u8 = 0xFF;
    /// Marker byte for zero or positive power.
    pub const POSITIVE_MARKER: u8 = 0x00;

    /// Build from the raw signed reading.
    pub const fn from_raw(raw: i32) -> Self {
        Self {
            negative: raw < 0,
            magnitude: (raw.unsigned_abs() & 0xFFFF) as u16,
        }
    }

    pub const fn sign_byte(&self) -> u8 {
        if self.negative {
            Self::NEGATIVE_MARKER
        } else {
            Self::POSITIVE_MARKER
        }
    }

    pub const fn msb(&self) -> u8 {
        (self.magnitude >> 8) as u8
    }

    pub const fn lsb(&self) -> u8 {
        (self.magnitude & 0xFF) as u8
    }
}

//==================================================================================TIME_TO_GO
/// Remaining battery time in minutes, as the low 16 bits of the reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeToGo(pub u16);

impl TimeToGo {
    /// Keep the low 16 bits; `-1` ("infinite") becomes `0xFFFF`.
    pub const fn from_raw(raw: i32) -> Self {
        Self((raw & 0xFFFF) as u16)
    }

    pub const fn msb(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn lsb(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

//==================================================================================SNAPSHOT
/// Latest known value for every tag that feeds the outbound frames.
///
/// Each field is replaced as a whole when its tag is decoded, so readers
/// never observe a half-written value. `Copy` lets a transmit cycle take one
/// immutable copy and encode every frame from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetrySnapshot {
    /// Battery voltage in volts (`V`, millivolts on the wire).
    pub voltage: Hundredths,
    /// Shunt current in amps (`I`, milliamps on the wire).
    pub current: SignedHundredths,
    /// State of charge in percent (`SOC`, per-mille on the wire).
    pub state_of_charge: Hundredths,
    /// Instantaneous power in watts (`P`).
    pub power: PowerReading,
    /// Time to go in minutes (`TTG`).
    pub time_to_go: TimeToGo,
}

impl TelemetrySnapshot {
    /// Snapshot with every field at zero, usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            voltage: Hundredths::ZERO,
            current: SignedHundredths::ZERO,
            state_of_charge: Hundredths::ZERO,
            power: PowerReading {
                negative: false,
                magnitude: 0,
            },
            time_to_go: TimeToGo(0),
        }
    }
}
