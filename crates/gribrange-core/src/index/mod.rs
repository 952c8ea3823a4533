//! GRIB2 `.idx` inventory parsing.
//!
//! An index is line-oriented; each line describes one record of the archive:
//! `seq:offset:d=<date>:param:level:kind[:...]`. Malformed lines are skipped,
//! so a slightly irregular index still yields every record that can be read.

mod parse;

use std::io::BufRead;

pub use parse::parse_line;

/// Field separator used by `.idx` files.
pub const FIELD_SEPARATOR: char = ':';

/// Minimum number of fields a line must carry to describe a record.
pub const MIN_FIELDS: usize = 6;

/// Literal prefix of the date field (`d=2024010100`).
pub const DATE_PREFIX: &str = "d=";

/// One record described by the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Record number as declared in the index (informational only).
    pub sequence_number: u32,
    /// Offset of the record's first byte in the archive.
    pub byte_offset: u64,
    /// Reference time label, without the `d=` prefix.
    pub date: String,
    /// Short code of the physical quantity (e.g. `TMP`).
    pub parameter: String,
    /// Vertical level or surface (e.g. `2 m above ground`).
    pub level: String,
    /// Auxiliary type label (e.g. `anl`, `6 hour fcst`).
    pub record_kind: String,
}

/// Failure reading the index text itself. Individual bad lines are not errors.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("failed to read index line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Parses every readable line of `reader`, preserving input order.
///
/// Lines that do not describe a record are dropped; a failure of the reader
/// itself (I/O error, invalid UTF-8) aborts the whole call.
pub fn parse_index<R: BufRead>(reader: R) -> Result<Vec<IndexEntry>, IndexError> {
    let mut entries = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| IndexError::Read { line: i + 1, source })?;
        match parse_line(&line) {
            Some(entry) => entries.push(entry),
            None => tracing::trace!(line = i + 1, "skipping unparsable index line"),
        }
    }
    Ok(entries)
}

/// Convenience wrapper over [`parse_index`] for text already in memory.
pub fn parse_index_str(text: &str) -> Vec<IndexEntry> {
    text.lines().filter_map(parse_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    const SAMPLE: &str = "\
1:0:d=2024010100:PRMSL:mean sea level:anl:
2:990253:d=2024010100:CLMR:1 hybrid level:anl:
3:1079283:d=2024010100:TMP:2 m above ground:anl:
4:1716341:d=2024010100:TMP:850 mb:anl:
";

    #[test]
    fn parses_all_records_in_order() {
        let entries = parse_index(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(entries.len(), 4);
        let offsets: Vec<u64> = entries.iter().map(|e| e.byte_offset).collect();
        assert_eq!(offsets, vec![0, 990253, 1079283, 1716341]);
        assert_eq!(entries[2].parameter, "TMP");
        assert_eq!(entries[2].level, "2 m above ground");
        assert_eq!(entries[2].date, "2024010100");
        assert_eq!(entries[2].record_kind, "anl");
    }

    #[test]
    fn reparsing_is_identical() {
        let a = parse_index(Cursor::new(SAMPLE)).unwrap();
        let b = parse_index(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, parse_index_str(SAMPLE));
    }

    #[test]
    fn malformed_lines_are_dropped_not_errors() {
        let text = "\
garbage
1:0:d=2024010100:TMP:sfc:anl
x:10:d=2024010100:TMP:sfc:anl
2:y:d=2024010100:TMP:sfc:anl
3:20:d=2024010100:TMP:sfc
4:30:d=2024010100:UGRD:10 m above ground:anl:extra:fields

";
        let entries = parse_index(Cursor::new(text)).unwrap();
        let seq: Vec<u32> = entries.iter().map(|e| e.sequence_number).collect();
        assert_eq!(seq, vec![1, 4]);
        assert_eq!(entries[1].record_kind, "anl");
    }

    #[test]
    fn empty_text_yields_no_entries() {
        assert!(parse_index(Cursor::new("")).unwrap().is_empty());
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream died"))
        }
    }

    #[test]
    fn reader_failure_is_fatal() {
        let err = parse_index(io::BufReader::new(FailingReader)).unwrap_err();
        assert!(matches!(err, IndexError::Read { line: 1, .. }));
    }

    #[test]
    fn invalid_utf8_is_fatal() {
        let bytes: &[u8] = b"1:0:d=2024010100:TMP:sfc:anl\n\xff\xfe\n";
        let err = parse_index(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, IndexError::Read { line: 2, .. }));
    }
}
