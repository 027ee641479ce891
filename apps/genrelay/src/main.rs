use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

mod cli;
mod seed;

use genrelay_core::{
    MemoryDirectory, Orchestrator, UpstreamClientConfig, WreqUpstreamClient,
};
use genrelay_provider::default_adapters;
use genrelay_router::{AppState, TokenAuth, router};

use crate::cli::Cli;
use crate::seed::load_seed;

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("genrelay failed: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let seed = load_seed(&cli.seed)?;
    info!(
        providers = seed.providers.len(),
        tokens = seed.tokens.len(),
        "seed loaded"
    );
    for profile in &seed.providers {
        info!(
            provider_id = profile.id,
            kind = %profile.kind,
            model = %profile.model,
            credential = %profile.masked_credential(),
            enabled = profile.enabled,
            "provider registered"
        );
    }

    let directory = Arc::new(MemoryDirectory::new(seed.providers));
    let auth = Arc::new(TokenAuth::new(
        seed.tokens
            .into_iter()
            .map(|entry| (entry.token, entry.user)),
    ));
    let client = Arc::new(WreqUpstreamClient::new(UpstreamClientConfig::default())?);
    let orchestrator = Arc::new(Orchestrator::new(default_adapters(), directory, client));

    let app = router(AppState { orchestrator, auth });
    let bind = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(bind = %bind, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("genrelay=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
