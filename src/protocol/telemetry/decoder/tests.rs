//! Decoder tests: per-tag isolation, idempotence, malformed values.
use super::*;
use crate::core::{Hundredths, SignedHundredths};

/// Snapshot with every field set to a distinctive non-zero value.
fn populated() -> TelemetrySnapshot {
    TelemetrySnapshot {
        voltage: Hundredths::new(13, 37),
        current: SignedHundredths {
            negative: true,
            magnitude: Hundredths::new(4, 2),
        },
        state_of_charge: Hundredths::new(42, 50),
        power: PowerReading::from_raw(-777),
        time_to_go: TimeToGo(321),
    }
}

#[test]
/// Reference line decodes to the documented parts.
fn test_reference_line() {
    let mut decoder = TelemetryDecoder::new();
    let mut snapshot = TelemetrySnapshot::new();

    let applied = decoder.decode_line("V\t12800\tI\t-500\tSOC\t950", &mut snapshot);

    assert_eq!(applied, 3);
    assert_eq!(snapshot.voltage, Hundredths::new(12, 80));
    assert!(snapshot.current.negative);
    assert_eq!(snapshot.current.sign_flag(), 1);
    assert_eq!(snapshot.current.magnitude, Hundredths::new(0, 50));
    assert_eq!(snapshot.state_of_charge, Hundredths::new(95, 0));
}

#[test]
/// Every mapped tag changes its own field and nothing else.
fn test_each_tag_updates_only_its_field() {
    let cases: [(&str, fn(&TelemetrySnapshot, &TelemetrySnapshot) -> bool); 5] = [
        ("V\t24000", |before, after| {
            after.voltage == Hundredths::new(24, 0)
                && TelemetrySnapshot { voltage: before.voltage, ..*after } == *before
        }),
        ("I\t1500", |before, after| {
            after.current.magnitude == Hundredths::new(1, 50)
                && !after.current.negative
                && TelemetrySnapshot { current: before.current, ..*after } == *before
        }),
        ("SOC\t1000", |before, after| {
            after.state_of_charge == Hundredths::new(100, 0)
                && TelemetrySnapshot { state_of_charge: before.state_of_charge, ..*after } == *before
        }),
        ("P\t250", |before, after| {
            after.power == PowerReading::from_raw(250)
                && TelemetrySnapshot { power: before.power, ..*after } == *before
        }),
        ("TTG\t600", |before, after| {
            after.time_to_go == TimeToGo(600)
                && TelemetrySnapshot { time_to_go: before.time_to_go, ..*after } == *before
        }),
    ];

    for (line, check) in cases {
        let before = populated();
        let mut after = before;
        TelemetryDecoder::new().decode_line(line, &mut after);
        assert!(check(&before, &after), "line {line:?} touched the wrong field");
    }
}

#[test]
/// Unknown and unmapped tags never mutate the snapshot.
fn test_ignored_tags_leave_snapshot_unchanged() {
    let mut decoder = TelemetryDecoder::new();
    let before = populated();
    let mut after = before;

    let applied = decoder.decode_line(
        "Checksum\tx\tBMV\t712 Smart\tH7\t11800\tFW\t0412\tfoo\t1",
        &mut after,
    );

    assert_eq!(applied, 0);
    assert_eq!(after, before);
    assert_eq!(decoder.stats().unmapped_pairs, 3);
    assert_eq!(decoder.stats().unknown_pairs, 2);
}

#[test]
/// Decoding the same line twice is the same as decoding it once.
fn test_idempotent() {
    let line = "V\t12650\tI\t-3210\tP\t-40\tTTG\t900\tSOC\t876";
    let mut once = TelemetrySnapshot::new();
    let mut twice = TelemetrySnapshot::new();
    TelemetryDecoder::new().decode_line(line, &mut once);
    let mut decoder = TelemetryDecoder::new();
    decoder.decode_line(line, &mut twice);
    decoder.decode_line(line, &mut twice);
    assert_eq!(once, twice);
}

#[test]
/// Malformed numbers decode as zero and later pairs still apply.
fn test_malformed_value_is_zero() {
    let mut snapshot = populated();
    let applied = TelemetryDecoder::new().decode_line("V\tabc\tSOC\t500", &mut snapshot);
    assert_eq!(applied, 2);
    assert_eq!(snapshot.voltage, Hundredths::ZERO);
    assert_eq!(snapshot.state_of_charge, Hundredths::new(50, 0));
}

#[test]
/// Power and time-to-go keep sign/magnitude and 16-bit semantics.
fn test_power_and_ttg() {
    let mut snapshot = TelemetrySnapshot::new();
    TelemetryDecoder::new().decode_line("P\t-300\tTTG\t-1", &mut snapshot);
    assert_eq!(snapshot.power.sign_byte(), 0xFF);
    assert_eq!((snapshot.power.msb(), snapshot.power.lsb()), (0x01, 0x2C));
    assert_eq!(snapshot.time_to_go, TimeToGo(0xFFFF));
}

#[test]
/// A binary checksum byte truncates the line; the pairs before it apply.
fn test_non_utf8_line_is_truncated_not_discarded() {
    let mut decoder = TelemetryDecoder::new();
    let mut snapshot = TelemetrySnapshot::new();
    let result = decoder.decode_bytes(b"V\t12000\tChecksum\t\xFF", &mut snapshot);
    assert_eq!(
        result,
        DecodedLine {
            applied: 1,
            truncated: true
        }
    );
    assert_eq!(snapshot.voltage, Hundredths::new(12, 0));
    assert_eq!(decoder.stats().truncated_lines, 1);
    assert_eq!(decoder.stats().oversized_lines, 0);
}

#[test]
/// Plain text lines are neither truncated nor counted as such.
fn test_utf8_line_is_not_truncated() {
    let mut decoder = TelemetryDecoder::new();
    let mut snapshot = TelemetrySnapshot::new();
    let result = decoder.decode_bytes(b"SOC\t950\tP\t-6", &mut snapshot);
    assert_eq!(
        result,
        DecodedLine {
            applied: 2,
            truncated: false
        }
    );
    assert_eq!(decoder.stats().truncated_lines, 0);
}

#[test]
/// Only oversized lines reach the discard counter.
fn test_record_discard_counts_oversized() {
    let mut decoder = TelemetryDecoder::new();
    decoder.record_discard(LineDiscard::Oversized);
    assert_eq!(decoder.stats().oversized_lines, 1);
    assert_eq!(decoder.stats().truncated_lines, 0);
}
