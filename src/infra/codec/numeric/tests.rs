//! Unit tests for integer parsing and fixed-point splitting.
use super::*;

#[test]
/// Plain, signed and padded integers.
fn test_parse_well_formed() {
    assert_eq!(parse_int_or_zero("12800"), 12800);
    assert_eq!(parse_int_or_zero("-500"), -500);
    assert_eq!(parse_int_or_zero("+42"), 42);
    assert_eq!(parse_int_or_zero("  950"), 950);
}

#[test]
/// Malformed text degrades to zero instead of failing.
fn test_parse_malformed_is_zero() {
    assert_eq!(parse_int_or_zero(""), 0);
    assert_eq!(parse_int_or_zero("---"), 0);
    assert_eq!(parse_int_or_zero("ON"), 0);
    assert_eq!(parse_int_or_zero("-"), 0);
    assert_eq!(parse_int_or_zero("0x1F"), 0);
}

#[test]
/// Parsing stops at the first non-digit.
fn test_parse_stops_at_garbage() {
    assert_eq!(parse_int_or_zero("12abc"), 12);
    assert_eq!(parse_int_or_zero("-7\r"), -7);
}

#[test]
/// Out-of-range values saturate at the `i32` bounds.
fn test_parse_saturates() {
    assert_eq!(parse_int_or_zero("99999999999"), i32::MAX);
    assert_eq!(parse_int_or_zero("-99999999999"), i32::MIN);
    assert_eq!(parse_int_or_zero("-2147483648"), i32::MIN);
}

#[test]
/// Millivolts to volts.
fn test_split_milli() {
    let v = split_scaled(12800, Scale::Milli);
    assert!(!v.negative);
    assert_eq!(v.magnitude, Hundredths::new(12, 80));

    // 12.29 V would come out as 12.28 with float truncation.
    let v = split_scaled(12290, Scale::Milli);
    assert_eq!(v.magnitude, Hundredths::new(12, 29));

    // Thousandths are truncated, not rounded.
    let v = split_scaled(13579, Scale::Milli);
    assert_eq!(v.magnitude, Hundredths::new(13, 57));
}

#[test]
/// Negative values keep a non-negative fractional part.
fn test_split_negative() {
    let i = split_scaled(-500, Scale::Milli);
    assert!(i.negative);
    assert_eq!(i.magnitude, Hundredths::new(0, 50));

    let i = split_scaled(-1, Scale::Milli);
    assert!(i.negative);
    assert_eq!(i.sign_flag(), 1);
    assert_eq!(i.magnitude, Hundredths::ZERO);

    let i = split_scaled(-15250, Scale::Milli);
    assert_eq!(i.magnitude, Hundredths::new(15, 25));
}

#[test]
/// Zero is non-negative.
fn test_split_zero() {
    let i = split_scaled(0, Scale::Milli);
    assert!(!i.negative);
    assert_eq!(i.sign_flag(), 0);
}

#[test]
/// Per-mille to percent.
fn test_split_deci() {
    assert_eq!(split_scaled(950, Scale::Deci).magnitude, Hundredths::new(95, 0));
    assert_eq!(split_scaled(1000, Scale::Deci).magnitude, Hundredths::new(100, 0));
    assert_eq!(split_scaled(873, Scale::Deci).magnitude, Hundredths::new(87, 30));
}

#[test]
/// The extreme negative reading does not overflow.
fn test_split_min() {
    let i = split_scaled(i32::MIN, Scale::Milli);
    assert!(i.negative);
    assert_eq!(i.magnitude, Hundredths::new(2_147_483, 64));
}
