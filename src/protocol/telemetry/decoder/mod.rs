//! Dispatch from decoded tag/value pairs to the telemetry snapshot.
//!
//! Each mapped tag replaces its snapshot field in one assignment. Unmapped
//! and unknown tags leave the snapshot untouched, and malformed numbers
//! decode as zero rather than aborting the line.
use crate::core::{PowerReading, Scale, TelemetrySnapshot, TimeToGo};
use crate::infra::codec::numeric::{parse_int_or_zero, split_scaled};
use crate::protocol::telemetry::line_buffer::LineDiscard;
use crate::protocol::telemetry::pairs::{decode_line, TagValue};
use crate::protocol::telemetry::tags::{Tag, UnmappedTag};

/// What happened to one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairOutcome {
    /// The snapshot field(s) for this tag were replaced.
    Applied(Tag),
    /// Known tag, not republished.
    Unmapped(UnmappedTag),
    /// Unrecognized tag, ignored.
    Unknown,
}

/// Apply one pair to `snapshot`.
pub fn apply_pair(snapshot: &mut TelemetrySnapshot, pair: &TagValue<'_>) -> PairOutcome {
    let tag = Tag::parse(pair.tag);
    match tag {
        Tag::Voltage => {
            snapshot.voltage = split_scaled(parse_int_or_zero(pair.value), Scale::Milli).magnitude;
        }
        Tag::Current => {
            snapshot.current = split_scaled(parse_int_or_zero(pair.value), Scale::Milli);
        }
        Tag::StateOfCharge => {
            snapshot.state_of_charge =
                split_scaled(parse_int_or_zero(pair.value), Scale::Deci).magnitude;
        }
        Tag::Power => {
            snapshot.power = PowerReading::from_raw(parse_int_or_zero(pair.value));
        }
        Tag::TimeToGo => {
            snapshot.time_to_go = TimeToGo::from_raw(parse_int_or_zero(pair.value));
        }
        Tag::Unmapped(unmapped) => {
            #[cfg(feature = "defmt")]
            defmt::trace!("Unmapped {}: {=str}", unmapped, pair.value);
            return PairOutcome::Unmapped(unmapped);
        }
        Tag::Unknown => return PairOutcome::Unknown,
    }
    #[cfg(feature = "defmt")]
    defmt::trace!("{}: {=str}", tag, pair.value);
    PairOutcome::Applied(tag)
}

//==================================================================================STATS
/// Running counters kept by the [`TelemetryDecoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    pub lines: u32,
    pub pairs_applied: u32,
    pub unmapped_pairs: u32,
    pub unknown_pairs: u32,
    pub oversized_lines: u32,
    /// Lines cut short at their first non-UTF-8 byte (typically the
    /// binary checksum value).
    pub truncated_lines: u32,
    pub serial_read_errors: u32,
}

/// Result of [`TelemetryDecoder::decode_bytes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedLine {
    /// Pairs that updated the snapshot.
    pub applied: usize,
    /// The line held non-UTF-8 bytes and was decoded up to the first one.
    pub truncated: bool,
}

//==================================================================================DECODER
/// Stateless across lines apart from its counters.
#[derive(Debug, Clone, Default)]
pub struct TelemetryDecoder {
    stats: DecoderStats,
}

impl TelemetryDecoder {
    pub const fn new() -> Self {
        Self {
            stats: DecoderStats {
                lines: 0,
                pairs_applied: 0,
                unmapped_pairs: 0,
                unknown_pairs: 0,
                oversized_lines: 0,
                truncated_lines: 0,
                serial_read_errors: 0,
            },
        }
    }

    pub fn stats(&self) -> &DecoderStats {
        &self.stats
    }

    /// Decode one text line into `snapshot`; returns the number of pairs
    /// that updated it.
    pub fn decode_line(&mut self, line: &str, snapshot: &mut TelemetrySnapshot) -> usize {
        self.stats.lines = self.stats.lines.wrapping_add(1);
        let mut applied = 0;
        for pair in decode_line(line) {
            match apply_pair(snapshot, &pair) {
                PairOutcome::Applied(_) => {
                    applied += 1;
                    self.stats.pairs_applied = self.stats.pairs_applied.wrapping_add(1);
                }
                PairOutcome::Unmapped(_) => {
                    self.stats.unmapped_pairs = self.stats.unmapped_pairs.wrapping_add(1);
                }
                PairOutcome::Unknown => {
                    self.stats.unknown_pairs = self.stats.unknown_pairs.wrapping_add(1);
                }
            }
        }
        applied
    }

    /// Decode one raw line. Text after the first non-UTF-8 byte is ignored;
    /// the pairs before it still apply.
    pub fn decode_bytes(&mut self, line: &[u8], snapshot: &mut TelemetrySnapshot) -> DecodedLine {
        match core::str::from_utf8(line) {
            Ok(text) => DecodedLine {
                applied: self.decode_line(text, snapshot),
                truncated: false,
            },
            Err(err) => {
                self.stats.truncated_lines = self.stats.truncated_lines.wrapping_add(1);
                let valid = core::str::from_utf8(&line[..err.valid_up_to()]).unwrap_or("");
                DecodedLine {
                    applied: self.decode_line(valid, snapshot),
                    truncated: true,
                }
            }
        }
    }

    /// Count a line dropped before decoding.
    pub fn record_discard(&mut self, discard: LineDiscard) {
        match discard {
            LineDiscard::Oversized => {
                self.stats.oversized_lines = self.stats.oversized_lines.wrapping_add(1);
            }
        }
    }

    pub fn record_serial_error(&mut self) {
        self.stats.serial_read_errors = self.stats.serial_read_errors.wrapping_add(1);
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
