use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use contact_crawler::api::{AppState, create_router};
use contact_crawler::cli::{Cli, Command};
use contact_crawler::output::render_text;
use contact_crawler::{ApiError, Config, ContactReport, GatewayClient, Query};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::init_global().context("failed to load configuration")?;

    // Also installs the log -> tracing bridge, so log::warn! etc. end up here too.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(true)
        .init();

    if config.credentials.is_none() {
        tracing::warn!("RAPIDAPI_KEY is not set; lookups will fail until it is configured");
    }

    let gateway = GatewayClient::from_config(config)?;

    match cli.command() {
        Command::Serve { bind } => serve(config, gateway, bind.unwrap_or(config.bind_addr)).await,
        Command::Lookup { query, json } => lookup(config, &gateway, &query, json).await,
    }
}

async fn serve(config: &Config, gateway: GatewayClient, addr: SocketAddr) -> Result<()> {
    let state = Arc::new(AppState::new(gateway, config.require_scheme));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("shutdown requested, draining in-flight requests");
                signal.cancel();
            }
            Err(e) => tracing::error!("failed to listen for ctrl-c: {e}"),
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("server error")?;
    Ok(())
}

async fn lookup(config: &Config, gateway: &GatewayClient, input: &str, json: bool) -> Result<()> {
    let query = Query::parse(input, config.require_scheme).map_err(describe)?;
    let result = gateway.fetch_contacts(&query).await.map_err(describe)?;
    let report = ContactReport::from_result(&result);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(query.as_str(), &report));
    }
    Ok(())
}

fn describe(err: ApiError) -> anyhow::Error {
    anyhow!("{} error: {err}", err.category())
}
