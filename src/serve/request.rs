//! Transport-independent view of an HTTP request.

use std::fmt;

use crate::utils::url::decode_request_path;

/// Request methods the server distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Other,
}

impl Method {
    pub fn is_safe(self) -> bool {
        matches!(self, Self::Get | Self::Head)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Other => "OTHER",
        })
    }
}

impl From<&tiny_http::Method> for Method {
    fn from(method: &tiny_http::Method) -> Self {
        match method {
            tiny_http::Method::Get => Self::Get,
            tiny_http::Method::Head => Self::Head,
            _ => Self::Other,
        }
    }
}

/// Method, decoded path and headers of an incoming request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    url: String,
    path: String,
    headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            path: decode_request_path(url),
            headers: Vec::new(),
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn from_tiny(request: &tiny_http::Request) -> Self {
        let mut req = Self::new(request.method().into(), request.url());
        req.headers = request
            .headers()
            .iter()
            .map(|h| (h.field.as_str().as_str().to_string(), h.value.to_string()))
            .collect();
        req
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Raw request target, including any query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Percent-decoded path without query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
