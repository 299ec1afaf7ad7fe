//! A host runtime for dapps, served with axum.
//!
//! # Design
//! Everything under `/apis/` is forwarded to a `DappRegistry`. The host
//! turns the axum request into a plain `HttpRequest`, runs the registry on
//! the blocking pool (dapp handlers call into synchronous services), and
//! writes the returned `HttpResponse` back verbatim.

pub mod error;
pub mod memory;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tracing::{error, info};

use dapp_core::{DappConfig, DappRegistry, FilesApi, HttpMethod, HttpRequest, HttpResponse};

pub use error::HostError;
pub use memory::{MemoryLedger, MemoryStore};

pub const HELLO_WORLD: &str = "helloworld";

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<DappRegistry>,
}

pub fn app(registry: DappRegistry) -> Router {
    let state = AppState {
        registry: Arc::new(registry),
    };
    Router::new()
        .route("/apis/{*path}", any(forward))
        .with_state(state)
}

/// A registry with the files API installed as `dapp`, backed by the given
/// in-memory services.
pub fn files_registry(
    dapp: &str,
    config: DappConfig,
    store: Arc<MemoryStore>,
    ledger: Arc<MemoryLedger>,
) -> DappRegistry {
    let api = FilesApi::new(config, store, ledger);
    info!(
        dapp,
        resource = %api.config().resource,
        root_contract = %api.config().root_contract,
        "files api mounted"
    );
    let mut registry = DappRegistry::new();
    registry.register(dapp, Arc::new(api));
    registry
}

pub async fn run(listener: TcpListener, registry: DappRegistry) -> Result<(), HostError> {
    axum::serve(listener, app(registry)).await?;
    Ok(())
}

async fn forward(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let request = HttpRequest {
        method: HttpMethod::from(method.as_str()),
        target: uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string()),
        headers: headers
            .iter()
            .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
            .collect(),
        body,
    };

    let registry = state.registry.clone();
    match tokio::task::spawn_blocking(move || registry.dispatch(&request)).await {
        Ok(response) => DappResponse(response).into_response(),
        Err(e) => {
            error!(error = %e, "dispatch task failed");
            DappResponse(HttpResponse::internal_error()).into_response()
        }
    }
}

/// Writes a dapp's `HttpResponse` onto the wire.
struct DappResponse(HttpResponse);

impl IntoResponse for DappResponse {
    fn into_response(self) -> Response {
        let HttpResponse {
            status,
            headers,
            body,
        } = self.0;
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        for (key, value) in headers {
            match (
                HeaderName::try_from(key.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(k), Ok(v)) => {
                    response.headers_mut().insert(k, v);
                }
                _ => error!(header = %key, "dropping invalid response header"),
            }
        }
        response
    }
}
