//! The hello-world dapp's request dispatcher.
//!
//! # Design
//! `FilesApi` serves a single resource collection:
//!
//! - `POST /files` with `{"name": .., "data": ..}` stores `data` in the
//!   content store and registers `name -> digest` on the ledger.
//! - `GET /files/{name}` looks the digest up and returns the content as
//!   `{"data": ..}`.
//!
//! Each request is one pass over immutable configuration plus calls into
//! the injected collaborators, so `handle` can run on any number of threads
//! at once. Every step returns `Result<HttpResponse, DispatchError>` and
//! `handle` folds the error side into a response, which guarantees exactly
//! one response per request.
//!
//! The ledger's pending state is shared by everyone talking to it, so the
//! stage/commit pair of `add` runs under `commit_lock`; otherwise one
//! request's `discard` could drop another request's staged registration.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::collab::{ContentStore, Ledger, UrlParser};
use crate::config::DappConfig;
use crate::encoding::{full_address, name_to_key, strip_multihash_header};
use crate::error::DispatchError;
use crate::host::RequestHandler;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::target::HostUrlParser;
use crate::types::{AddFile, FileContent};

/// Request dispatcher for the files API.
#[derive(Debug)]
pub struct FilesApi<S, L, P = HostUrlParser> {
    config: DappConfig,
    store: S,
    ledger: L,
    parser: P,
    commit_lock: Mutex<()>,
}

impl<S: ContentStore, L: Ledger> FilesApi<S, L, HostUrlParser> {
    pub fn new(config: DappConfig, store: S, ledger: L) -> Self {
        Self::with_parser(config, store, ledger, HostUrlParser)
    }
}

impl<S: ContentStore, L: Ledger, P: UrlParser> FilesApi<S, L, P> {
    pub fn with_parser(config: DappConfig, store: S, ledger: L, parser: P) -> Self {
        Self {
            config,
            store,
            ledger,
            parser,
            commit_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &DappConfig {
        &self.config
    }

    /// Answers one request. Failures come back as 4xx/5xx responses.
    pub fn handle(&self, request: &HttpRequest) -> HttpResponse {
        self.route(request).unwrap_or_else(|err| {
            debug!(status = err.status(), error = %err, "request rejected");
            err.into()
        })
    }

    fn route(&self, request: &HttpRequest) -> Result<HttpResponse, DispatchError> {
        let url = self.parser.parse(request)?;
        debug!(method = %request.method, path = ?url.path, "dispatching");

        let resource = url.segment(0);
        if resource != self.config.resource {
            return Err(DispatchError::UnknownResource(resource.to_string()));
        }

        match request.method {
            HttpMethod::Post => {
                if url.path.len() != 1 {
                    return Err(DispatchError::BadPostUrl);
                }
                if request.body.is_empty() {
                    return Err(DispatchError::MissingFilename);
                }
                let input: AddFile = serde_json::from_str(&request.body)
                    .map_err(|_| DispatchError::MissingFilename)?;
                self.add(&input.name, &input.data)
            }
            HttpMethod::Get => {
                if url.path.len() != 2 {
                    return Err(DispatchError::BadGetUrl);
                }
                self.get(url.segment(1))
            }
            ref other => Err(DispatchError::IllegalMethod(other.to_string())),
        }
    }

    /// Stores `data` and registers it under `name`.
    ///
    /// The name is only registered once both the message and the commit
    /// succeed; on any ledger failure the staged state is discarded.
    pub fn add(&self, name: &str, data: &str) -> Result<HttpResponse, DispatchError> {
        let key = name_to_key(name);

        let store_hash = self.store.push(data).map_err(|e| {
            warn!(error = %e, "content store rejected file");
            DispatchError::StoreWrite
        })?;
        let digest = strip_multihash_header(&store_hash).map_err(|e| {
            warn!(error = %e, "content store returned an unusable hash");
            DispatchError::StoreWrite
        })?;

        let payload = [key, digest];
        let _guard = self
            .commit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let tx = self
            .ledger
            .send_message(&self.config.root_contract, &payload)
            .into_result()
            .map_err(|e| {
                warn!(error = %e, contract = %self.config.root_contract, "ledger message failed");
                self.ledger.discard();
                DispatchError::LedgerMessage(e.to_string())
            })?;

        self.ledger.commit().map_err(|e| {
            warn!(error = %e, "ledger commit failed");
            self.ledger.discard();
            DispatchError::LedgerCommit(e.to_string())
        })?;

        debug!(file = name, key = %payload[0], digest = %payload[1], tx = %tx, "file registered");
        Ok(HttpResponse::ok())
    }

    /// Looks up the content registered under `name`.
    ///
    /// Ledger and store failures are reported as not found.
    pub fn get(&self, name: &str) -> Result<HttpResponse, DispatchError> {
        let not_found = || DispatchError::NotFound(name.to_string());
        let key = name_to_key(name);

        let stored = self
            .ledger
            .read_storage(&self.config.root_contract, &key)
            .map_err(|e| {
                debug!(error = %e, key = %key, "ledger read failed");
                not_found()
            })?;
        let address = full_address(&stored).map_err(|e| {
            debug!(error = %e, key = %key, "no usable digest stored");
            not_found()
        })?;

        let data = self.store.fetch(&address).map_err(|e| {
            debug!(error = %e, address = %address, "content store fetch failed");
            not_found()
        })?;
        if data.is_empty() {
            return Err(not_found());
        }

        let body = serde_json::to_string(&FileContent { data }).map_err(|e| {
            warn!(error = %e, "failed to serialize file content");
            not_found()
        })?;
        Ok(HttpResponse::json(body))
    }
}

impl<S: ContentStore, L: Ledger, P: UrlParser> RequestHandler for FilesApi<S, L, P> {
    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        FilesApi::handle(self, request)
    }
}
