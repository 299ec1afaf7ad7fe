//! The host side of the callback hook.
//!
//! # Design
//! A dapp answers HTTP traffic by handing the host a `RequestHandler` once
//! at startup. `DappRegistry` maps dapp names to their handlers and routes
//! each incoming request by the segment after `apis`. Registration happens
//! through `&mut self` before the registry is shared, so serving needs no
//! locks.
//!
//! The registry is the last line of defence: a handler that panics yields
//! a 500 instead of taking the connection down with it.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::http::{HttpRequest, HttpResponse};
use crate::target::dapp_name;

/// Answers one HTTP request on behalf of a dapp.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, request: &HttpRequest) -> HttpResponse;
}

impl<F> RequestHandler for F
where
    F: Fn(&HttpRequest) -> HttpResponse + Send + Sync,
{
    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        self(request)
    }
}

/// What a dapp answers before it registers a handler of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

impl RequestHandler for DefaultHandler {
    fn handle(&self, _request: &HttpRequest) -> HttpResponse {
        HttpResponse::text(200, "")
    }
}

pub const DAPP_NOT_IN_FOCUS: &str = "Dapp not in focus";

/// Routes requests to the handler registered for the addressed dapp.
#[derive(Default)]
pub struct DappRegistry {
    handlers: HashMap<String, Arc<dyn RequestHandler>>,
}

impl DappRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handler` for `dapp`. Returns `true` if it replaced an
    /// earlier registration.
    pub fn register(&mut self, dapp: impl Into<String>, handler: Arc<dyn RequestHandler>) -> bool {
        let dapp = dapp.into();
        info!(dapp = %dapp, "http request callback registered");
        self.handlers.insert(dapp, handler).is_some()
    }

    pub fn is_registered(&self, dapp: &str) -> bool {
        self.handlers.contains_key(dapp)
    }

    pub fn dapps(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Hands `request` to its dapp and returns that dapp's response.
    pub fn dispatch(&self, request: &HttpRequest) -> HttpResponse {
        let dapp = match dapp_name(&request.target) {
            Ok(dapp) => dapp,
            Err(err) => return HttpResponse::text(400, err.to_string()),
        };
        let Some(handler) = self.handlers.get(&dapp) else {
            debug!(dapp = %dapp, "request for unregistered dapp");
            return HttpResponse::text(400, DAPP_NOT_IN_FOCUS);
        };

        match catch_unwind(AssertUnwindSafe(|| handler.handle(request))) {
            Ok(response) => {
                debug!(dapp = %dapp, status = response.status, "request handled");
                response
            }
            Err(_) => {
                error!(dapp = %dapp, target = %request.target, "request handler panicked");
                HttpResponse::internal_error()
            }
        }
    }
}
