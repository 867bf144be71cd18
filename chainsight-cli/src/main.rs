//! chainsight-cli — command-line frontend for the Chainsight insight gateway
//!
//! # Subcommands
//! - `analyze <section> [--lang <lang>]`              — run a built-in sample snapshot
//! - `insight --context <text> --data <json> [...]`   — ad-hoc insight request
//! - `status`                                         — show gateway health

use clap::{Parser, Subcommand};

use chainsight_client::InsightClient;

mod samples;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8787";
const DEFAULT_LANG: &str = "English";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "chainsight-cli",
    version,
    about = "Chainsight supply-chain insights — CLI frontend for the insight gateway"
)]
struct Cli {
    /// Gateway URL (overrides CHAINSIGHT_HTTP_URL env var)
    #[arg(long, env = "CHAINSIGHT_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze one of the built-in sample dashboard sections
    Analyze {
        /// Section name (see error output for the list)
        section: String,

        /// Output language for the generated insight
        #[arg(long, default_value = DEFAULT_LANG)]
        lang: String,
    },

    /// Request an insight for an arbitrary data snapshot
    Insight {
        /// Dashboard section label the data belongs to
        #[arg(long)]
        context: String,

        /// Data snapshot: inline JSON, or @path to read a JSON file
        #[arg(long)]
        data: String,

        /// Output language for the generated insight
        #[arg(long, default_value = DEFAULT_LANG)]
        lang: String,
    },

    /// Show gateway health
    Status,
}

// ============================================================================
// Argument helpers
// ============================================================================

/// Parse a `--data` argument: inline JSON, or `@file` to read from disk.
fn parse_data_arg(arg: &str) -> anyhow::Result<serde_json::Value> {
    let raw = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)?,
        None => arg.to_string(),
    };
    Ok(serde_json::from_str(&raw)?)
}

// ============================================================================
// Commands
// ============================================================================

async fn do_analyze(client: &InsightClient, section: &str, lang: &str) {
    let (context, data) = match samples::sample_data(section) {
        Some(s) => s,
        None => {
            eprintln!("chainsight-cli: unknown section '{}'", section);
            eprintln!("Available sections:");
            for name in samples::SECTION_NAMES {
                eprintln!("  {}", name);
            }
            std::process::exit(1);
        }
    };

    let insight = client.generate_insights(context, &data, lang).await;
    println!("{}", insight);
}

async fn do_insight(client: &InsightClient, context: &str, data_arg: &str, lang: &str) {
    let data = match parse_data_arg(data_arg) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("chainsight-cli: invalid --data argument: {}", e);
            std::process::exit(1);
        }
    };

    let insight = client.generate_insights(context, &data, lang).await;
    println!("{}", insight);
}

async fn do_status(client: &InsightClient) {
    match client.health().await {
        Ok(body) => {
            println!("Gateway:    {}", client.base_url());
            println!("Status:     {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:    {}", body["version"].as_str().unwrap_or("?"));
            println!("Model:      {}", body["model"].as_str().unwrap_or("?"));
            println!(
                "Upstream:   {}",
                if body["upstream_configured"].as_bool().unwrap_or(false) {
                    "configured"
                } else {
                    "NOT configured"
                }
            );
        }
        Err(e) => {
            eprintln!("chainsight-cli: cannot reach {} — {}", client.base_url(), e);
            std::process::exit(1);
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = InsightClient::new(&cli.server);

    match cli.command {
        Commands::Analyze { section, lang } => do_analyze(&client, &section, &lang).await,
        Commands::Insight {
            context,
            data,
            lang,
        } => do_insight(&client, &context, &data, &lang).await,
        Commands::Status => do_status(&client).await,
    }
}

// ============================================================================
// Tests
// ============================================================================
