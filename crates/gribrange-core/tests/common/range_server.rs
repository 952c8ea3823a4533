//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves an index text for paths ending in `.idx` and a static archive body
//! for every other path. Range GETs get `206 Partial Content`; selected
//! ranges can be made to fail, ignore the Range header, come back short,
//! or respond slowly.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct RangeServerOptions {
    /// Ranges starting at these offsets get `500 Internal Server Error`.
    pub failing_starts: Vec<u64>,
    /// Ranges starting at these offsets get `200 OK` with the full body.
    pub full_body_starts: Vec<u64>,
    /// Ranges starting at these offsets are answered after `slow_delay`.
    pub slow_starts: Vec<u64>,
    /// Delay for `slow_starts`; 300 ms when unset.
    pub slow_delay: Option<Duration>,
    /// Ranges starting at these offsets get a 206 that covers only the first
    /// half of the requested span, well before the end of the body.
    pub short_starts: Vec<u64>,
    /// If true, every GET ignores Range and returns `200 OK`.
    pub no_ranges: bool,
    /// If true, the index path returns `404 Not Found`.
    pub hide_index: bool,
}

/// Handle to a running server. Runs until the process exits.
pub struct RangeServer {
    base: String,
    ranges_seen: Arc<Mutex<Vec<(u64, u64)>>>,
}

impl RangeServer {
    /// URL for `path` on this server (e.g. `gfs.f000.idx`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Range requests received so far, in arrival order.
    pub fn ranges_seen(&self) -> Vec<(u64, u64)> {
        self.ranges_seen.lock().unwrap().clone()
    }
}

pub fn start(index: &str, body: Vec<u8>) -> RangeServer {
    start_with_options(index, body, RangeServerOptions::default())
}

pub fn start_with_options(index: &str, body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let index = Arc::new(index.as_bytes().to_vec());
    let body = Arc::new(body);
    let opts = Arc::new(opts);
    let ranges_seen = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&ranges_seen);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let index = Arc::clone(&index);
            let body = Arc::clone(&body);
            let opts = Arc::clone(&opts);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &index, &body, &opts, &seen));
        }
    });
    RangeServer {
        base: format!("http://127.0.0.1:{}/", port),
        ranges_seen,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    index: &[u8],
    body: &[u8],
    opts: &RangeServerOptions,
    seen: &Mutex<Vec<(u64, u64)>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path, range) = parse_request(request);
    if !method.eq_ignore_ascii_case("GET") {
        respond(&mut stream, "405 Method Not Allowed", &[], &[]);
        return;
    }

    if path.ends_with(".idx") {
        if opts.hide_index {
            respond(&mut stream, "404 Not Found", &[], b"not found");
        } else {
            respond(&mut stream, "200 OK", &[], index);
        }
        return;
    }

    let total = body.len() as u64;
    let Some((start, end_incl)) = range.filter(|_| !opts.no_ranges) else {
        respond(&mut stream, "200 OK", &[], body);
        return;
    };
    seen.lock().unwrap().push((start, end_incl));

    if opts.slow_starts.contains(&start) {
        thread::sleep(opts.slow_delay.unwrap_or(Duration::from_millis(300)));
    }
    if opts.failing_starts.contains(&start) {
        respond(&mut stream, "500 Internal Server Error", &[], b"boom");
        return;
    }
    if opts.full_body_starts.contains(&start) {
        respond(&mut stream, "200 OK", &[], body);
        return;
    }

    let end_incl = end_incl.min(total.saturating_sub(1));
    if start > end_incl {
        let header = format!("Content-Range: bytes */{}", total);
        respond(&mut stream, "416 Range Not Satisfiable", &[header], &[]);
        return;
    }
    let end_incl = if opts.short_starts.contains(&start) {
        start + (end_incl - start) / 2
    } else {
        end_incl
    };
    let slice = &body[start as usize..=end_incl as usize];
    let header = format!("Content-Range: bytes {}-{}/{}", start, end_incl, total);
    respond(&mut stream, "206 Partial Content", &[header], slice);
}

fn respond(stream: &mut std::net::TcpStream, status: &str, headers: &[String], payload: &[u8]) {
    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nAccept-Ranges: bytes\r\nConnection: close\r\n",
        status,
        payload.len()
    );
    for h in headers {
        head.push_str(h);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(payload);
}

/// Returns (method, path, optional (start, end_inclusive) for `Range: bytes=X-Y`).
fn parse_request(request: &str) -> (&str, &str, Option<(u64, u64)>) {
    let mut method = "";
    let mut path = "";
    let mut range = None;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if method.is_empty() {
            let mut parts = line.split_whitespace();
            method = parts.next().unwrap_or("");
            path = parts.next().unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                let value = value.trim();
                if value.to_lowercase().starts_with("bytes=") {
                    if let Some((a, b)) = value[6..].trim().split_once('-') {
                        let start = a.trim().parse::<u64>().unwrap_or(0);
                        let end = b.trim();
                        let end_incl = if end.is_empty() {
                            u64::MAX
                        } else {
                            end.parse::<u64>().unwrap_or(0)
                        };
                        range = Some((start, end_incl));
                    }
                }
            }
        }
    }
    (method, path, range)
}
