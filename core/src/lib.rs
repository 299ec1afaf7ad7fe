//! Request dispatcher for the hello-world dapp, free of I/O.
//!
//! # Overview
//! A dapp serves HTTP through its host runtime: the host parses nothing,
//! it hands each request to the callback the dapp registered. This crate
//! holds that callback for the hello-world files API (`FilesApi`), the
//! host-side registry that routes to it (`DappRegistry`), and a client for
//! the same API (`FilesClient`).
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`, `HttpResponse`);
//!   sockets belong to the host.
//! - The content store, the ledger and the URL parser are traits injected at
//!   construction, so `FilesApi` holds no mutable state of its own.
//! - Every failure is a `DispatchError` that maps to exactly one response.

pub mod client;
pub mod collab;
pub mod config;
pub mod dispatcher;
pub mod encoding;
pub mod error;
pub mod host;
pub mod http;
pub mod target;
pub mod types;

pub use client::FilesClient;
pub use collab::{ContentStore, Ledger, MessageResult, UrlParser};
pub use config::DappConfig;
pub use dispatcher::FilesApi;
pub use error::{ApiError, CollabError, DispatchError, UrlError};
pub use host::{DappRegistry, DefaultHandler, RequestHandler};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use target::{HostUrlParser, ParsedUrl};
pub use types::{AddFile, FileContent};
