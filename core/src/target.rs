//! Request-target parsing as done by the host runtime.
//!
//! Dapp APIs are mounted under `/apis/<dapp>/`. `HostUrlParser` drops those
//! two leading segments so a dapp only ever sees its own resource path, e.g.
//! `/apis/helloworld/files/greeting?v=1` parses to path `["files",
//! "greeting"]` and query `{"v": "1"}`.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use crate::collab::UrlParser;
use crate::error::UrlError;
use crate::http::HttpRequest;

/// Segments preceding the dapp-local path: `apis` and the dapp name.
const HOST_PREFIX_SEGMENTS: usize = 2;

/// A request target split into dapp-local path segments and query options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUrl {
    pub path: Vec<String>,
    pub query: BTreeMap<String, String>,
}

impl ParsedUrl {
    /// The path segment at `index`, or `""` when the path is shorter.
    pub fn segment(&self, index: usize) -> &str {
        self.path.get(index).map(String::as_str).unwrap_or("")
    }
}

/// The parser the host runtime hands to every dapp.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostUrlParser;

impl UrlParser for HostUrlParser {
    fn parse(&self, request: &HttpRequest) -> Result<ParsedUrl, UrlError> {
        let (path, query) = split_target(&request.target);
        let mut path = decode_segments(path)?;
        if path.len() < HOST_PREFIX_SEGMENTS {
            return Err(UrlError::MissingPrefix);
        }
        path.drain(..HOST_PREFIX_SEGMENTS);

        let query = query
            .map(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(ParsedUrl { path, query })
    }
}

/// Name of the dapp a request is addressed to: the segment after `apis`.
pub fn dapp_name(target: &str) -> Result<String, UrlError> {
    let (path, _) = split_target(target);
    decode_segments(path)?
        .into_iter()
        .nth(1)
        .ok_or(UrlError::MissingPrefix)
}

/// Path and query of an origin-form (`/path?query`) or absolute
/// (`http://host/path?query`) target. The fragment is dropped.
fn split_target(target: &str) -> (&str, Option<&str>) {
    let target = target.split_once('#').map_or(target, |(t, _)| t);
    let target = match target.split_once("://") {
        Some((_, rest)) => rest.find(['/', '?']).map_or("", |i| &rest[i..]),
        None => target,
    };
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// Percent-decoded path segments, taken verbatim: `.` and `..` are not
/// resolved and a trailing `/` yields an empty last segment.
fn decode_segments(path: &str) -> Result<Vec<String>, UrlError> {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.split('/')
        .map(|seg| {
            percent_decode_str(seg)
                .decode_utf8()
                .map(|s| s.into_owned())
                .map_err(|_| UrlError::Malformed(format!("path segment is not UTF-8: {seg}")))
        })
        .collect()
}
