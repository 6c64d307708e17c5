// src/proto/parser.rs

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::Message;

/// Escape sequence the producer substitutes for a literal comma inside a
/// data field, commas being the record separator.
const COMMA_ESCAPE: &str = "%!(PACKER_COMMA)";

/// Decode one raw output line into a [`Message`], or `None` when the line is
/// not a well-formed record.
///
/// Malformed lines (fewer than three fields, non-numeric timestamp) are
/// skipped rather than surfaced as errors so that a single bad line never
/// stops the drain loop.
pub fn parse_line(line: &str) -> Option<Message> {
    // Split with no field-count limit; empty trailing fields count.
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 3 {
        return None;
    }
    let seconds: u64 = fields[0].parse().ok()?;
    let target = fields[1];
    Some(Message {
        timestamp: UNIX_EPOCH + Duration::from_secs(seconds),
        target: (!target.is_empty()).then(|| target.to_string()),
        kind: fields[2].to_string(),
        data: fields[3..].iter().map(|field| unescape(field)).collect(),
    })
}

/// Epoch timestamp helper for building expected messages in tests.
pub fn epoch_seconds(seconds: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(seconds)
}

fn unescape(field: &str) -> String {
    field
        .replace(COMMA_ESCAPE, ",")
        .replace("\\n", "\n")
        .replace("\\r", "\r")
}
