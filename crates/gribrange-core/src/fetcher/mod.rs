//! Single-range HTTP fetch.
//!
//! Issues one Range GET, insists on `206 Partial Content`, buffers the body,
//! and writes it at the range's start offset through the shared
//! [`RangeWriter`]. The request timeout bounds the network transfer only; the
//! write happens after it completes.

mod error;
mod headers;

use std::time::Duration;

use crate::selector::ByteRange;
use crate::storage::RangeWriter;

pub use error::FetchError;
pub(crate) use headers::push_header_line;

use headers::parse_content_range;

/// Upper bound on the up-front body buffer reservation.
const MAX_BODY_RESERVE: u64 = 8 * 1024 * 1024;

/// libcurl settings shared by the index and range requests.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Limit on establishing the connection.
    pub connect_timeout: Duration,
    /// Limit on the whole request, from connect to last body byte.
    pub request_timeout: Duration,
    /// Optional `User-Agent` header value.
    pub user_agent: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
            user_agent: None,
        }
    }
}

impl FetchOptions {
    /// Apply URL, redirect and timeout settings to a fresh handle.
    pub(crate) fn configure(&self, easy: &mut curl::easy::Easy, url: &str) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.request_timeout)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }
        Ok(())
    }
}

/// Fetch `range` of `url` and write it at `range.start` of the destination.
/// Returns the number of bytes written.
///
/// A shorter body is accepted only when `Content-Range` shows the server
/// clamped the span at the end of the archive (the last record's range runs
/// past it). Anything else short, or anything longer, is an error.
///
/// The whole body is held in memory until the write, so peak memory across a
/// transfer is roughly the sum of the ranges in flight.
pub fn fetch_range(
    url: &str,
    range: ByteRange,
    writer: &RangeWriter,
    opts: &FetchOptions,
) -> Result<u64, FetchError> {
    let expected = range.len();
    let mut body: Vec<u8> = Vec::with_capacity(expected.min(MAX_BODY_RESERVE) as usize);
    let mut headers: Vec<String> = Vec::new();
    let mut oversized = false;

    let mut easy = curl::easy::Easy::new();
    opts.configure(&mut easy, url)?;
    easy.range(&range.curl_range())?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            push_header_line(&mut headers, data);
            true
        })?;
        transfer.write_function(|data| {
            if body.len() as u64 + data.len() as u64 > expected {
                oversized = true;
                // Returning a short count aborts the transfer.
                return Ok(0);
            }
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()
    };

    let code = easy.response_code()?;
    if let Err(e) = performed {
        if oversized {
            return Err(match code {
                206 => FetchError::Oversized { expected },
                other => FetchError::Status(other),
            });
        }
        return Err(FetchError::Curl(e));
    }
    if code != 206 {
        return Err(FetchError::Status(code));
    }
    let content_range = parse_content_range(&headers);
    if let Some(cr) = content_range {
        if cr.start != range.start {
            return Err(FetchError::ContentRangeMismatch {
                requested: range.start,
                received: cr.start,
            });
        }
    }
    let received = body.len() as u64;
    if received < expected {
        // Only the end of the archive may cut a range short.
        let clamped = content_range
            .map(|cr| cr.reaches_end() && cr.len() == Some(received))
            .unwrap_or(false);
        if !clamped {
            return Err(FetchError::PartialTransfer { expected, received });
        }
    }

    writer
        .write_at(range.start, &body)
        .map_err(FetchError::Storage)?;
    tracing::debug!(range = %range, bytes = body.len(), "range written");
    Ok(body.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DestinationBuilder;

    #[test]
    fn default_options() {
        let opts = FetchOptions::default();
        assert_eq!(opts.request_timeout, Duration::from_secs(60));
        assert_eq!(opts.connect_timeout, Duration::from_secs(30));
        assert!(opts.user_agent.is_none());
    }

    #[test]
    fn connection_refused_is_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let mut builder = DestinationBuilder::create(&path).unwrap();
        builder.preallocate(10).unwrap();
        let writer = builder.build();
        let opts = FetchOptions {
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
            user_agent: None,
        };
        let err = fetch_range(
            &format!("http://127.0.0.1:{}/data", port),
            ByteRange::new(0, 9),
            &writer,
            &opts,
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::Curl(_)), "got {:?}", err);
        assert_eq!(std::fs::read(&path).unwrap(), vec![0u8; 10]);
    }
}
