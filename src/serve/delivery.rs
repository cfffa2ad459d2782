//! Content delivery: conditional GET and byte ranges over an [`AssetHandle`].
//!
//! Produces a [`Reply`] without touching the socket, so the negotiation is
//! testable on its own.

use std::io::{self, Read, Seek, SeekFrom};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::request::{HttpRequest, Method};
use crate::asset::AssetHandle;
use crate::utils::mime;

/// A fully negotiated response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
    /// Advertised `Content-Length`; equals `body.len()` except for HEAD.
    pub content_length: usize,
}

impl Reply {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            content_length: 0,
        }
    }

    /// Plain-text reply, e.g. `Reply::text(404, "404 Not Found")`.
    pub fn text(status: u16, message: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", mime::types::PLAIN)
            .with_body(message.as_bytes().to_vec())
    }

    pub fn not_found() -> Self {
        Self::text(404, "404 Not Found")
    }

    pub fn method_not_allowed() -> Self {
        Self::text(405, "405 Method Not Allowed").with_header("Allow", "GET, HEAD")
    }

    pub fn internal_error() -> Self {
        Self::text(500, "500 Internal Server Error")
    }

    pub fn unavailable() -> Self {
        Self::text(503, "503 Service Unavailable")
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.content_length = body.len();
        self.body = body;
        self
    }

    /// Drop the body but keep the advertised length (HEAD).
    pub fn without_body(mut self) -> Self {
        self.body = Vec::new();
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Outcome of parsing a `Range` header against a content length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// No usable range: serve everything.
    Full,
    /// Inclusive `start..=end`.
    Partial(u64, u64),
    /// Syntactically valid but outside the content.
    Unsatisfiable,
}

/// Negotiate and build the response for `handle`.
///
/// `Last-Modified` is omitted for handles with an epoch modification time.
pub fn deliver(mut handle: AssetHandle, request: &HttpRequest) -> io::Result<Reply> {
    let size = handle.content_len();
    let etag = handle.etag();
    let modified = Some(handle.modified()).filter(|t| *t > UNIX_EPOCH);
    let last_modified = modified.map(httpdate::fmt_http_date);

    let with_validators = |mut reply: Reply| {
        reply = reply.with_header("ETag", &*etag);
        if let Some(lm) = &last_modified {
            reply = reply.with_header("Last-Modified", lm.clone());
        }
        reply
    };

    if is_not_modified(request, &etag, modified) {
        return Ok(with_validators(Reply::new(304)));
    }

    let base = with_validators(
        Reply::new(200)
            .with_header("Content-Type", mime::from_path(handle.name()))
            .with_header("Accept-Ranges", "bytes"),
    );

    let range = request
        .header("range")
        .map_or(ByteRange::Full, |r| parse_range(r, size));

    let reply = match range {
        ByteRange::Full => {
            handle.seek(SeekFrom::Start(0))?;
            base.with_body(read_exact_len(&mut handle, size)?)
        }
        ByteRange::Partial(start, end) => {
            handle.seek(SeekFrom::Start(start))?;
            let mut reply = base.with_body(read_exact_len(&mut handle, end - start + 1)?);
            reply.status = 206;
            reply.with_header("Content-Range", format!("bytes {start}-{end}/{size}"))
        }
        ByteRange::Unsatisfiable => {
            let mut reply = Reply::text(416, "416 Range Not Satisfiable");
            reply.headers.push(("Content-Range", format!("bytes */{size}")));
            reply
        }
    };

    Ok(match request.method() {
        Method::Head => reply.without_body(),
        _ => reply,
    })
}

fn read_exact_len(handle: &mut AssetHandle, len: u64) -> io::Result<Vec<u8>> {
    let mut body = Vec::with_capacity(len as usize);
    handle.by_ref().take(len).read_to_end(&mut body)?;
    Ok(body)
}

/// `If-None-Match` wins over `If-Modified-Since`.
fn is_not_modified(request: &HttpRequest, etag: &str, modified: Option<SystemTime>) -> bool {
    if let Some(inm) = request.header("if-none-match") {
        return etag_matches(etag, inm);
    }

    if let Some(ims) = request.header("if-modified-since")
        && let Some(modified) = modified
        && let Ok(since) = httpdate::parse_http_date(ims)
    {
        // HTTP dates have second precision.
        return truncate_to_secs(modified) <= since;
    }

    false
}

/// Weak comparison against an `If-None-Match` list.
fn etag_matches(etag: &str, header: &str) -> bool {
    header.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

fn truncate_to_secs(time: SystemTime) -> SystemTime {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Parse a single `bytes=` range.
///
/// Multiple ranges and malformed values fall back to [`ByteRange::Full`].
pub fn parse_range(header: &str, size: u64) -> ByteRange {
    let Some(ranges) = header.trim().strip_prefix("bytes=") else {
        return ByteRange::Full;
    };
    if ranges.contains(',') {
        return ByteRange::Full;
    }
    let Some((start, end)) = ranges.trim().split_once('-') else {
        return ByteRange::Full;
    };
    let (start, end) = (start.trim(), end.trim());

    match (start.is_empty(), end.is_empty()) {
        // "-500" - last 500 bytes
        (true, false) => match end.parse::<u64>() {
            Ok(0) => ByteRange::Unsatisfiable,
            Ok(_) if size == 0 => ByteRange::Unsatisfiable,
            Ok(suffix) => ByteRange::Partial(size.saturating_sub(suffix), size - 1),
            Err(_) => ByteRange::Full,
        },
        // "0-" - from start to end
        (false, true) => match start.parse::<u64>() {
            Ok(s) if s >= size => ByteRange::Unsatisfiable,
            Ok(s) => ByteRange::Partial(s, size - 1),
            Err(_) => ByteRange::Full,
        },
        // "0-499" - specific range
        (false, false) => match (start.parse::<u64>(), end.parse::<u64>()) {
            (Ok(s), Ok(e)) if s > e => ByteRange::Full,
            (Ok(s), Ok(_)) if s >= size => ByteRange::Unsatisfiable,
            (Ok(s), Ok(e)) => ByteRange::Partial(s, e.min(size - 1)),
            _ => ByteRange::Full,
        },
        (true, true) => ByteRange::Full,
    }
}
