use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use broker::models::catalog::Catalog;
use broker::{api, config, AppState};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = cli::Cli::parse();
    let cfg = config::load()?;

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => run_server(cfg, port).await,
        Some(cli::Commands::Catalog) => print_catalog(&cfg),
        None => run_server(cfg, None).await,
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

/// Logs go to stderr so `catalog` output stays clean on stdout.
/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "broker=info,envvars_broker=info,tower_http=info".into()),
    );

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let (text_layer, json_layer) = if json {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .init();
}

async fn run_server(cfg: config::Config, port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or(cfg.port);

    tracing::info!("Running as {}", cfg.app_url);
    tracing::info!(
        service = %cfg.service_name,
        plan = %cfg.service_plan,
        fake_async = cfg.fake_async,
        syslog_drain = cfg.syslog_drain().is_some(),
        "serving catalog entry"
    );

    let state = Arc::new(AppState { config: cfg });
    let app = api::broker_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("envvars broker listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn print_catalog(cfg: &config::Config) -> anyhow::Result<()> {
    let catalog = Catalog::from_config(cfg);
    let json = serde_json::to_string_pretty(&catalog).context("failed to encode catalog")?;
    println!("{}", json);
    Ok(())
}
