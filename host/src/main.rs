use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use dapp_core::DappConfig;
use dapp_host::{files_registry, HostError, MemoryLedger, MemoryStore};

/// Serve a dapp's files API over HTTP.
#[derive(Debug, Parser)]
#[command(name = "dapp-host", version, about)]
struct Args {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Name the dapp is mounted under: `/apis/<dapp>/...`.
    #[arg(long, env = "DAPP_NAME", default_value = dapp_host::HELLO_WORLD)]
    dapp: String,

    /// Contract whose storage maps file names to content hashes.
    #[arg(long, env = "ROOT_CONTRACT", default_value = dapp_core::config::DEFAULT_ROOT_CONTRACT)]
    root_contract: String,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format: plain (default) or json.
    #[arg(long, default_value = "plain", value_parser = ["plain", "json"])]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<(), HostError> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    match args.log_format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    };

    let config = DappConfig::default().with_root_contract(args.root_contract);
    let registry = files_registry(
        &args.dapp,
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryLedger::new()),
    );

    let addr = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| HostError::Bind {
            addr: addr.clone(),
            source,
        })?;
    let dapps: Vec<&str> = registry.dapps().collect();
    info!(%addr, ?dapps, "listening");

    tokio::select! {
        result = dapp_host::run(listener, registry) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    }
}
