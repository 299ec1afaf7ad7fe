//! Stateless HTTP request builder and response parser for the files API.
//!
//! # Design
//! `FilesClient` holds only a `base_url` (e.g. `http://host:3000/apis/helloworld`)
//! and carries no mutable state between calls. Each operation is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the HTTP round-trip.
//!
//! File content travels URI-component encoded, the way the dapp's web page
//! sends it; the client encodes on add and decodes on get.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, CONTENT_TYPE};
use crate::types::{AddFile, FileContent};

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

pub fn decode_component(s: &str) -> Result<String, ApiError> {
    percent_decode_str(s)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Synchronous, stateless client for a dapp's files API.
#[derive(Debug, Clone)]
pub struct FilesClient {
    base_url: String,
}

impl FilesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_add_file(&self, name: &str, content: &str) -> Result<HttpRequest, ApiError> {
        let input = AddFile {
            name: name.to_string(),
            data: encode_component(content),
        };
        let body = serde_json::to_string(&input)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            target: format!("{}/files", self.base_url),
            headers: vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())],
            body,
        })
    }

    pub fn build_get_file(&self, name: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            target: format!("{}/files/{}", self.base_url, encode_component(name)),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn parse_add_file(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    /// Returns the decoded file content.
    pub fn parse_get_file(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, 200)?;
        let content: FileContent = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        decode_component(&content.data)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
