//! Configuration for the trade-offer fetcher.

/// API configuration constants.
pub mod api {
    /// Base URL for the trade API.
    pub const TRADE_API: &str = "https://www.pathofexile.com/api/trade2";

    /// Default league searched when none is given.
    pub const DEFAULT_LEAGUE: &str = "Standard";

    /// Realm segment of the search endpoint path.
    pub const REALM: &str = "poe2";

    /// Name of the session cookie attached to authenticated requests.
    pub const SESSION_COOKIE: &str = "POESESSID";

    /// Browser-like user agent the endpoint expects.
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";
}

/// Fetcher configuration.
///
/// All values are fixed for the duration of a run and passed explicitly
/// into the client; nothing here is process-global.
#[derive(Debug, Clone)]
pub struct Config {
    /// Session cookie value (optional).
    pub session: Option<String>,

    /// Search endpoint URL (overridable for testing with mock servers).
    pub search_url: String,

    /// Fetch endpoint base URL, extended with `/{offer_id}` per request.
    pub fetch_url: String,

    /// User agent sent on every request.
    pub user_agent: String,

    /// Search query document posted to the search endpoint.
    pub query: serde_json::Value,

    /// Skip TLS certificate validation on outbound requests.
    ///
    /// On by default, matching how the endpoint has historically been
    /// consumed. Disabled in tests against local mock servers.
    pub accept_invalid_certs: bool,
}

impl Config {
    /// Create a configuration for the given league, with an optional
    /// session cookie value.
    #[must_use]
    pub fn new(session: Option<String>, league: &str) -> Self {
        Self {
            session,
            search_url: format!("{}/search/{}/{}", api::TRADE_API, api::REALM, league),
            fetch_url: format!("{}/fetch", api::TRADE_API),
            user_agent: api::USER_AGENT.to_string(),
            query: default_query(),
            accept_invalid_certs: true,
        }
    }

    /// Create a test configuration pointed at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            session: None,
            search_url: format!(
                "{base_url}/api/trade2/search/{}/{}",
                api::REALM,
                api::DEFAULT_LEAGUE
            ),
            fetch_url: format!("{base_url}/api/trade2/fetch"),
            user_agent: api::USER_AGENT.to_string(),
            query: default_query(),
            accept_invalid_certs: false,
        }
    }

    /// Check if a session cookie is configured.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, api::DEFAULT_LEAGUE)
    }
}

/// Default search query: online sellers, no stat filters, cheapest first.
#[must_use]
pub fn default_query() -> serde_json::Value {
    serde_json::json!({
        "query": {
            "status": {
                "option": "online"
            },
            "stats": [
                {
                    "type": "and",
                    "filters": [],
                    "disabled": "false"
                }
            ]
        },
        "sort": {
            "price": "asc"
        }
    })
}
