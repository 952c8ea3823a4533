//! Archive URL and file name derivation from the index URL.

use super::SourceError;

/// Suffix that marks an index next to its archive.
pub const INDEX_SUFFIX: &str = ".idx";

/// The archive URL: the index URL without its `.idx` suffix.
///
/// Query strings are not supported; the suffix must end the URL.
pub fn data_url(index_url: &str) -> Result<String, SourceError> {
    match index_url.strip_suffix(INDEX_SUFFIX) {
        Some(base) if !base.is_empty() && !base.ends_with('/') => Ok(base.to_string()),
        _ => Err(SourceError::NotAnIndexUrl(index_url.to_string())),
    }
}

/// Local file name for the archive: last URL path segment minus `.idx`.
///
/// Returns `None` if the URL cannot be parsed or has no usable final segment.
pub fn file_name_from_index_url(index_url: &str) -> Option<String> {
    let parsed = url::Url::parse(index_url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    let name = segment.strip_suffix(INDEX_SUFFIX).unwrap_or(segment);
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}
