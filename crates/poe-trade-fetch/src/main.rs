//! Trade offer batch fetcher - entry point.
//!
//! Searches the trade API for active offers and prints each detail
//! document to stdout, pretty-printed, pausing between requests as the
//! server's rate-limit headers demand.

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use poe_trade_fetch::config::api;
use poe_trade_fetch::{Config, TradeClient};

#[derive(Parser, Debug)]
#[command(name = "poe-trade-fetch")]
#[command(about = "Fetch active trade offers from the Path of Exile trade API")]
#[command(version)]
struct Cli {
    /// POESESSID cookie value (optional; discovered from response cookies
    /// when the server sets one)
    #[arg(short, long, env = "POESESSID")]
    session: Option<String>,

    /// League to search
    #[arg(long, default_value = api::DEFAULT_LEAGUE)]
    league: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        league = %cli.league,
        has_session = cli.session.is_some(),
        "Starting trade offer fetch"
    );

    let config = Config::new(cli.session, &cli.league);
    let mut client = TradeClient::new(config)?;

    let details = client.fetch_all().await?;
    for detail in &details {
        println!("{}", serde_json::to_string_pretty(detail)?);
    }

    tracing::info!(fetched = details.len(), "Run complete");
    Ok(())
}
