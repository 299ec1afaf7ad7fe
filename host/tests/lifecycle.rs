//! Add/get lifecycle against a live host.
//!
//! # Design
//! Starts the host on a random port with the files API mounted, then drives
//! it with `FilesClient` over real HTTP using ureq. This checks that the
//! client's request building and response parsing agree with what the
//! dispatcher actually puts on the wire.

use std::sync::Arc;

use dapp_core::{ApiError, DappConfig, FilesClient, HttpMethod, HttpRequest, HttpResponse};
use dapp_host::{files_registry, MemoryLedger, MemoryStore, HELLO_WORLD};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Status codes are returned as data so the client does the interpreting.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match req.method {
        HttpMethod::Get => agent.get(&req.target).call(),
        HttpMethod::Delete => agent.delete(&req.target).call(),
        HttpMethod::Post => agent
            .post(&req.target)
            .content_type("application/json")
            .send(req.body.as_bytes()),
        HttpMethod::Put => agent
            .put(&req.target)
            .content_type("application/json")
            .send(req.body.as_bytes()),
        HttpMethod::Other(method) => panic!("unsupported method {method}"),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

#[test]
fn files_lifecycle() {
    // Step 1: start the host on a random port.
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let registry = files_registry(
        HELLO_WORLD,
        DappConfig::default(),
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryLedger::new()),
    );
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            dapp_host::run(listener, registry).await
        })
        .unwrap();
    });

    let client = FilesClient::new(&format!("http://{addr}/apis/{HELLO_WORLD}"));

    // Step 2: nothing is registered yet.
    let err = client
        .parse_get_file(execute(client.build_get_file("greeting")))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound), "got {err:?}");

    // Step 3: add a file and read it back.
    let req = client.build_add_file("greeting", "Hello, world!").unwrap();
    client.parse_add_file(execute(req)).unwrap();
    let content = client
        .parse_get_file(execute(client.build_get_file("greeting")))
        .unwrap();
    assert_eq!(content, "Hello, world!");

    // Step 4: content with quotes, newlines and non-ASCII survives.
    let tricky = "line one\n\"quoted\" caf\u{e9} & 100%";
    let req = client.build_add_file("tricky", tricky).unwrap();
    client.parse_add_file(execute(req)).unwrap();
    let content = client
        .parse_get_file(execute(client.build_get_file("tricky")))
        .unwrap();
    assert_eq!(content, tricky);

    // Step 5: a second add under the same name replaces the content.
    let req = client.build_add_file("greeting", "Goodbye").unwrap();
    client.parse_add_file(execute(req)).unwrap();
    let content = client
        .parse_get_file(execute(client.build_get_file("greeting")))
        .unwrap();
    assert_eq!(content, "Goodbye");

    // Step 6: a dapp that was never registered is rejected by the host.
    let other = FilesClient::new(&format!("http://{addr}/apis/otherdapp"));
    let err = other
        .parse_get_file(execute(other.build_get_file("greeting")))
        .unwrap_err();
    match err {
        ApiError::HttpError { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "Dapp not in focus");
        }
        other => panic!("expected HttpError, got {other:?}"),
    }
}
