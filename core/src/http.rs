//! HTTP transport types shared by the host, the dispatcher and the client.
//!
//! # Design
//! Requests and responses are plain data. The host owns the sockets and
//! hands the dispatcher an `HttpRequest`; the dispatcher answers with an
//! `HttpResponse` and never touches the network itself. The same types are
//! produced by `FilesClient::build_*` and consumed by its `parse_*` methods.
//!
//! All fields use owned types (`String`, `Vec`) so values move freely between
//! the async host and the blocking dispatcher.

use std::fmt;

/// HTTP method for a request.
///
/// Methods the dapp does not serve still need to reach the dispatcher so it
/// can reject them by name, hence `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Other(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Other(m) => m,
        }
    }
}

impl From<&str> for HttpMethod {
    fn from(s: &str) -> Self {
        match s {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            other => HttpMethod::Other(other.to_string()),
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
/// `target` is the request target as it appeared on the wire: path plus an
/// optional `?query`, or an absolute URL when built by `FilesClient`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub fn new(method: impl Into<HttpMethod>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

pub const CONTENT_TYPE: &str = "content-type";
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";

/// An HTTP response described as plain data.
///
/// Exactly one is produced per dispatched request. Once built it is not
/// mutated; the host copies it onto the wire as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// A plain-text response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(
            status,
            vec![(CONTENT_TYPE.to_string(), TEXT_PLAIN.to_string())],
            body,
        )
    }

    /// A 200 response carrying an already-serialized JSON document.
    pub fn json(body: impl Into<String>) -> Self {
        Self::new(
            200,
            vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())],
            body,
        )
    }

    /// 200 with no body.
    pub fn ok() -> Self {
        Self::new(200, Vec::new(), String::new())
    }

    pub fn internal_error() -> Self {
        Self::text(500, "Internal error")
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}
