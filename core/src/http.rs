//! HTTP exchanges described as plain data.
//!
//! # Design
//! `ProductClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network. A [`crate::transport::Transport`]
//! (or a native host, through the FFI crate) performs the actual I/O. Keeping
//! the exchange as data makes every status and body case testable without a
//! server.
//!
//! All fields are owned so values can cross thread and FFI boundaries.

use std::fmt;
use std::time::Duration;

pub const CONTENT_TYPE: &str = "content-type";
pub const ACCEPT: &str = "accept";
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute. `timeout` bounds the whole exchange, from connecting to
/// reading the last body byte.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Headers sent with every catalog request.
    pub fn json_headers() -> Vec<(String, String)> {
        vec![
            (CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
            (ACCEPT.to_string(), APPLICATION_JSON.to_string()),
        ]
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// True when the body holds nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}
