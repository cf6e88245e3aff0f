//! Trade API client.
//!
//! Issues the search request and per-offer detail requests, attaching the
//! required headers and capturing rate-limit headers from each response.
//! Requests are fully sequential; the rate governor decides the pause
//! between one response and the next request.

use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, USER_AGENT};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::SearchResponse;
use crate::rate_limit::RateLimitSnapshot;

/// Trade API client.
pub struct TradeClient {
    /// HTTP client with default headers applied.
    client: reqwest::Client,

    /// Immutable run configuration.
    config: Config,

    /// Session cookie value, if known. Starts from the configuration and
    /// may be replaced by a cookie the server sets on a response.
    session: Option<String>,
}

impl TradeClient {
    /// Create a new client with the given configuration.
    ///
    /// No request timeout is applied: a hung network call blocks the run,
    /// matching how the endpoint has historically been consumed.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails or the configured
    /// user agent is not a valid header value.
    pub fn new(config: Config) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, config.user_agent.parse()?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .gzip(true)
            .build()?;

        let session = config.session.clone();
        Ok(Self { client, config, session })
    }

    /// The session cookie value currently held, if any.
    #[must_use]
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Run the search and return the ordered offer-id list plus the
    /// rate-limit snapshot from the response headers.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or any non-2xx status.
    pub async fn search(&mut self) -> ClientResult<(Vec<String>, RateLimitSnapshot)> {
        let mut request = self.client.post(&self.config.search_url).json(&self.config.query);
        if let Some(cookie) = self.cookie_header() {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let response = self.handle_response(response).await?;

        let snapshot = RateLimitSnapshot::from_headers(response.headers());
        self.adopt_session(&response);

        let body: SearchResponse = response.json().await?;
        tracing::debug!(
            query_id = body.id.as_deref().unwrap_or(""),
            total = body.total.unwrap_or(0),
            "Search completed"
        );
        Ok((body.result, snapshot))
    }

    /// Fetch the detail document for one offer identifier.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or any non-2xx status.
    pub async fn fetch_offer(
        &mut self,
        offer_id: &str,
    ) -> ClientResult<(serde_json::Value, RateLimitSnapshot)> {
        let url = format!("{}/{}", self.config.fetch_url, offer_id);

        let mut request = self.client.get(&url);
        if let Some(cookie) = self.cookie_header() {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let response = self.handle_response(response).await?;

        let snapshot = RateLimitSnapshot::from_headers(response.headers());
        self.adopt_session(&response);

        let detail: serde_json::Value = response.json().await?;
        Ok((detail, snapshot))
    }

    /// Run the full batch: search, then fetch each offer in result order,
    /// pausing between requests as the previous response's rate-limit
    /// headers demand.
    ///
    /// # Errors
    ///
    /// Returns error on the first failed request; no partial results are
    /// preserved.
    pub async fn fetch_all(&mut self) -> ClientResult<Vec<serde_json::Value>> {
        let (offer_ids, mut snapshot) = self.search().await?;
        tracing::info!(offers = offer_ids.len(), "Search returned offer list");

        let mut details = Vec::with_capacity(offer_ids.len());
        for offer_id in &offer_ids {
            snapshot.wait().await;
            let (detail, next) = self.fetch_offer(offer_id).await?;
            details.push(detail);
            snapshot = next;
        }

        Ok(details)
    }

    /// Cookie header value for the current session, if one is held.
    fn cookie_header(&self) -> Option<String> {
        self.session.as_ref().map(|s| format!("{}={}", api::SESSION_COOKIE, s))
    }

    /// Take over a session cookie the server set on this response.
    fn adopt_session(&mut self, response: &reqwest::Response) {
        if let Some(cookie) = response.cookies().find(|c| c.name() == api::SESSION_COOKIE) {
            tracing::debug!("Adopted session cookie from response");
            self.session = Some(cookie.value().to_string());
        }
    }

    /// Handle API response status codes.
    ///
    /// Any non-success status is fatal to the run.
    async fn handle_response(&self, response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(ClientError::status(status.as_u16(), message))
    }
}

impl std::fmt::Debug for TradeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeClient")
            .field("search_url", &self.config.search_url)
            .field("has_session", &self.session.is_some())
            .finish()
    }
}
