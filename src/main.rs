use std::sync::Arc;

use clap::Parser;

use portico::config::{Args, Config};
use portico::resolve::{RedirectTable, Resolver};
use portico::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::from_args(Args::parse())?;

    let redirects = RedirectTable::load(&cfg.redirects)?;
    tracing::info!(
        entries = redirects.len(),
        path = %cfg.redirects.display(),
        "Loaded redirect table"
    );

    let resolver = Arc::new(Resolver::new(cfg.root.clone(), redirects));

    tokio::select! {
        res = server::listener::run(&cfg, resolver) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
