//! Parse a single `.idx` line into an IndexEntry.

use super::{IndexEntry, DATE_PREFIX, FIELD_SEPARATOR, MIN_FIELDS};

/// Parse one index line. Returns `None` when the line has fewer than
/// [`MIN_FIELDS`] fields or the record number / offset are not integers.
pub fn parse_line(line: &str) -> Option<IndexEntry> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }
    let sequence_number = fields[0].parse::<u32>().ok()?;
    let byte_offset = fields[1].parse::<u64>().ok()?;
    let date = fields[2].strip_prefix(DATE_PREFIX).unwrap_or(fields[2]);

    Some(IndexEntry {
        sequence_number,
        byte_offset,
        date: date.to_string(),
        parameter: fields[3].to_string(),
        level: fields[4].to_string(),
        record_kind: fields[5].to_string(),
    })
}
