//! Where the index and the archive live.
//!
//! Downloads the `.idx` inventory with a plain GET and derives the archive
//! URL and local file name from the index URL (`x.grib2.idx` → `x.grib2`).

mod path;

use crate::fetcher::{push_header_line, FetchOptions};

pub use path::{data_url, file_name_from_index_url, INDEX_SUFFIX};

/// Failure downloading the index.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("index request failed: {0}")]
    Curl(#[from] curl::Error),
    #[error("index GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },
    #[error("not an index URL (expected a .idx suffix): {0}")]
    NotAnIndexUrl(String),
}

/// GET the whole index at `url`. Only `200 OK` is accepted.
///
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn fetch_index(url: &str, opts: &FetchOptions) -> Result<Vec<u8>, SourceError> {
    let mut body: Vec<u8> = Vec::new();
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    opts.configure(&mut easy, url)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            push_header_line(&mut headers, data);
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if code != 200 {
        return Err(SourceError::Status {
            url: url.to_string(),
            code,
        });
    }
    tracing::debug!(
        url,
        bytes = body.len(),
        status = headers.first().map(String::as_str).unwrap_or(""),
        "index downloaded"
    );
    Ok(body)
}

/// True for `http://` / `https://` locations, false for local paths.
pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
