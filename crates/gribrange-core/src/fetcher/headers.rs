//! Response header bookkeeping for range responses.

/// Record one raw header line from curl. A new status line (redirect or
/// `100 Continue`) discards the headers of the previous response.
pub(crate) fn push_header_line(lines: &mut Vec<String>, data: &[u8]) {
    if let Ok(s) = std::str::from_utf8(data) {
        let line = s.trim_end();
        if line.starts_with("HTTP/") {
            lines.clear();
        }
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
}

/// `Content-Range: bytes start-end/total` of a 206 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ContentRange {
    pub start: u64,
    pub end: u64,
    /// `None` when the server sent `*`.
    pub total: Option<u64>,
}

impl ContentRange {
    /// Bytes covered by the span, `None` if it is malformed.
    pub fn len(&self) -> Option<u64> {
        self.end.checked_sub(self.start)?.checked_add(1)
    }

    /// True when the span stops at the last byte of the resource.
    pub fn reaches_end(&self) -> bool {
        self.total == Some(self.end.saturating_add(1))
    }
}

pub(crate) fn parse_content_range(lines: &[String]) -> Option<ContentRange> {
    lines.iter().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case("content-range") {
            return None;
        }
        let rest = value.trim().strip_prefix("bytes")?.trim_start();
        let (span, total) = rest.split_once('/')?;
        let (start, end) = span.split_once('-')?;
        Some(ContentRange {
            start: start.trim().parse().ok()?,
            end: end.trim().parse().ok()?,
            total: total.trim().parse().ok(),
        })
    })
}
