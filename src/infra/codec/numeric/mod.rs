//! Numeric helpers: lenient integer parsing of telemetry values and exact
//! splitting of scaled integers into whole/hundredths parts.
use crate::core::{Hundredths, Scale, SignedHundredths};

/// Parse the leading integer of `text`.
///
/// Leading whitespace is skipped, one optional `+`/`-` is accepted, then
/// digits are consumed until the first non-digit. Text without any leading
/// digit yields `0`. Values beyond the `i32` range saturate.
pub fn parse_int_or_zero(text: &str) -> i32 {
    let mut bytes = text.trim_start().bytes().peekable();
    let negative = match bytes.peek() {
        Some(b'-') => {
            bytes.next();
            true
        }
        Some(b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };

    // Accumulate on the negative side so i32::MIN stays reachable.
    let mut acc: i32 = 0;
    for byte in bytes {
        if !byte.is_ascii_digit() {
            break;
        }
        let digit = (byte - b'0') as i32;
        acc = acc.saturating_mul(10).saturating_sub(digit);
    }

    if negative {
        acc
    } else {
        acc.saturating_neg()
    }
}

/// Apply `scale` to `raw` and split the magnitude into whole units and
/// hundredths, both truncated toward zero. The sign is kept aside.
///
/// Integer arithmetic only: `12800` millivolts is exactly `12` V and `80`
/// hundredths, with no float rounding artefacts.
pub fn split_scaled(raw: i32, scale: Scale) -> SignedHundredths {
    let divisor = scale.divisor();
    let magnitude = raw.unsigned_abs();
    let remainder = magnitude % divisor;
    SignedHundredths {
        negative: raw < 0,
        magnitude: Hundredths {
            whole: magnitude / divisor,
            hundredths: (remainder * 100 / divisor) as u8,
        },
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
