//! Trade offer batch fetcher
//!
//! Polls the Path of Exile trade API: one search call returns an ordered
//! list of active offer identifiers, then each detail record is fetched in
//! turn, pausing between requests as the server's rate-limit headers
//! demand. Single actor, fully sequential, no persistence.
//!
//! # Example
//!
//! ```no_run
//! use poe_trade_fetch::{Config, TradeClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let mut client = TradeClient::new(config)?;
//!
//!     for detail in client.fetch_all().await? {
//!         println!("{}", serde_json::to_string_pretty(&detail)?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;

pub use client::TradeClient;
pub use config::Config;
pub use error::{ClientError, ClientResult};
