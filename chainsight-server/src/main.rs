use chainsight_core::{ChatCompletionClient, InsightConfig};
use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use chainsight_server::http;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "chainsight.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Init logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // Load config
    let config = match InsightConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Credential check at startup. The gateway still starts without a key —
    // the wire contract requires a 500 body for the unconfigured case — but
    // the misconfiguration is surfaced here, once, instead of per request.
    let completion = match ChatCompletionClient::new(&config.openai) {
        Ok(client) => {
            tracing::info!(model = client.model(), "Upstream completions client ready");
            Some(client)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Upstream credential missing — insight requests will fail until OPENAI_API_KEY is set"
            );
            None
        }
    };

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    http::start_http_server(config, completion, tx.subscribe()).await?;

    Ok(())
}
