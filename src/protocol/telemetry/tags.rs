//! Recognized telemetry tags.
//!
//! Only five tags feed the outbound frames. The monitor emits many others;
//! they are recognized so they can be traced, but never touch the snapshot.

/// Classification of a tag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tag {
    /// `V`: battery voltage, mV.
    Voltage,
    /// `I`: shunt current, mA.
    Current,
    /// `SOC`: state of charge, ‰.
    StateOfCharge,
    /// `P`: instantaneous power, W.
    Power,
    /// `TTG`: time to go, minutes.
    TimeToGo,
    /// Known tag with no place in the outbound frames.
    Unmapped(UnmappedTag),
    /// Anything else.
    Unknown,
}

/// Tags the monitor emits that the bridge does not republish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnmappedTag {
    /// `VPV`: panel voltage.
    PanelVoltage,
    /// `PPV`: panel power.
    PanelPower,
    /// `CE`: consumed amp-hours.
    ConsumedAmpHours,
    /// `Alarm`: alarm condition active.
    Alarm,
    /// `AR`: alarm reason.
    AlarmReason,
    /// `Relay`: relay state.
    Relay,
    /// `H1`..`H18`: history counters.
    History(u8),
    /// `BMV`: model description.
    Model,
    /// `FW`: firmware version.
    Firmware,
    /// `PID`: product id.
    ProductId,
}

/// History register numbers the monitor reports.
const HISTORY_REGISTERS: [u8; 14] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 17, 18];

impl Tag {
    /// Classify a tag token. Matching is case-sensitive.
    pub fn parse(token: &str) -> Tag {
        match token {
            "V" => Tag::Voltage,
            "I" => Tag::Current,
            "SOC" => Tag::StateOfCharge,
            "P" => Tag::Power,
            "TTG" => Tag::TimeToGo,
            "VPV" => Tag::Unmapped(UnmappedTag::PanelVoltage),
            "PPV" => Tag::Unmapped(UnmappedTag::PanelPower),
            "CE" => Tag::Unmapped(UnmappedTag::ConsumedAmpHours),
            "Alarm" => Tag::Unmapped(UnmappedTag::Alarm),
            "AR" => Tag::Unmapped(UnmappedTag::AlarmReason),
            "Relay" => Tag::Unmapped(UnmappedTag::Relay),
            "BMV" => Tag::Unmapped(UnmappedTag::Model),
            "FW" => Tag::Unmapped(UnmappedTag::Firmware),
            "PID" => Tag::Unmapped(UnmappedTag::ProductId),
            other => parse_history(other)
                .map(|n| Tag::Unmapped(UnmappedTag::History(n)))
                .unwrap_or(Tag::Unknown),
        }
    }

    /// Whether decoding this tag writes to the snapshot.
    pub fn is_mapped(&self) -> bool {
        !matches!(self, Tag::Unmapped(_) | Tag::Unknown)
    }
}

fn parse_history(token: &str) -> Option<u8> {
    let digits = token.strip_prefix('H')?;
    // Reject forms such as "H01" or "H+1" that `str::parse` would accept.
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let number: u8 = digits.parse().ok()?;
    HISTORY_REGISTERS.contains(&number).then_some(number)
}

//==================================================================================TESTS
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_tags() {
        assert_eq!(Tag::parse("V"), Tag::Voltage);
        assert_eq!(Tag::parse("I"), Tag::Current);
        assert_eq!(Tag::parse("SOC"), Tag::StateOfCharge);
        assert_eq!(Tag::parse("P"), Tag::Power);
        assert_eq!(Tag::parse("TTG"), Tag::TimeToGo);
        assert!(Tag::parse("SOC").is_mapped());
    }

    #[test]
    fn unmapped_tags() {
        assert_eq!(Tag::parse("CE"), Tag::Unmapped(UnmappedTag::ConsumedAmpHours));
        assert_eq!(Tag::parse("H7"), Tag::Unmapped(UnmappedTag::History(7)));
        assert_eq!(Tag::parse("H18"), Tag::Unmapped(UnmappedTag::History(18)));
        assert!(!Tag::parse("BMV").is_mapped());
    }

    #[test]
    fn unknown_tags() {
        assert_eq!(Tag::parse("v"), Tag::Unknown);
        assert_eq!(Tag::parse("H13"), Tag::Unknown);
        assert_eq!(Tag::parse("H01"), Tag::Unknown);
        assert_eq!(Tag::parse("H"), Tag::Unknown);
        assert_eq!(Tag::parse("Checksum"), Tag::Unknown);
        assert_eq!(Tag::parse(""), Tag::Unknown);
        assert!(!Tag::Unknown.is_mapped());
    }
}
