use clap::Parser;
use ledger_core::{Ledger, MiningConfig, SharedLedger};
use ledger_node::{constants::DEFAULT_LISTEN, router, AppState};
use std::net::SocketAddr;
use tracing::{info, Level};

#[derive(Parser, Debug)]
struct Args {
    /// Address to listen on, e.g. 127.0.0.1:5000
    #[arg(long, default_value = DEFAULT_LISTEN)]
    listen: String,

    /// Search for puzzle solutions on all cores
    #[arg(long)]
    parallel: bool,

    /// Give up on a block after this many puzzle attempts
    #[arg(long)]
    max_attempts: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = MiningConfig {
        parallel: args.parallel,
        max_attempts: args.max_attempts,
    };
    let ledger = SharedLedger::new(Ledger::new(), config);
    info!(?config, "ledger initialised with genesis block");

    let app = router(AppState {
        ledger: ledger.clone(),
    });

    let addr: SocketAddr = args.listen.parse()?;
    info!("ledger-node listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal(ledger))
        .await?;
    Ok(())
}

/// Waits for Ctrl-C, then stops any search so in-flight requests can finish.
async fn shutdown_signal(ledger: SharedLedger) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
    }
    info!("shutting down");
    ledger.cancel_mining();
}
