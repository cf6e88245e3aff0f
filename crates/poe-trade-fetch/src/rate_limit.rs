//! Rate-limit compliance for the trade API.
//!
//! The trade API reports per-IP limits through two response headers:
//! `x-rate-limit-ip` carries the rules and `x-rate-limit-ip-state` the
//! current consumption, each as one or more colon-delimited integer
//! triples. This module parses both headers and computes how long the
//! caller must pause before its next outbound request.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::HeaderMap;

/// Header carrying the server's per-IP rate-limit rules.
pub const RULES_HEADER: &str = "x-rate-limit-ip";

/// Header carrying the current per-IP consumption state.
pub const STATE_HEADER: &str = "x-rate-limit-ip-state";

/// Matches one `int:int:int` triple inside a rate-limit header value.
static TRIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):(\d+):(\d+)").expect("valid rate-limit triple pattern"));

/// One rate-limiting rule, as advertised by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRule {
    /// Requests allowed per window.
    pub max_requests: u64,

    /// Duration of the rolling window, in seconds.
    pub window_seconds: u64,

    /// Cooldown imposed when the window is exceeded, in seconds.
    pub penalty_seconds: u64,
}

/// Current consumption against one rule, as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateState {
    /// Requests already used in the current window.
    pub requests_used: u64,

    /// Seconds elapsed in the current window.
    pub window_elapsed_seconds: u64,

    /// Seconds of an active penalty still remaining.
    pub penalty_remaining_seconds: u64,
}

/// Rate-limit rules and state captured from one response's headers.
///
/// Rules and state are paired positionally: the Nth rule governs the Nth
/// state entry. The server produces both headers with matching dimension
/// ordering; nothing here validates that correspondence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    /// Advertised rules, in header order.
    pub rules: Vec<RateRule>,

    /// Reported consumption state, in header order.
    pub state: Vec<RateState>,
}

/// Extract every `int:int:int` triple from a header value, left to right.
///
/// Text between triples is ignored, and a value with no triples yields an
/// empty sequence. Malformed headers are never an error.
fn parse_triples(value: &str) -> Vec<(u64, u64, u64)> {
    TRIPLE
        .captures_iter(value)
        .filter_map(|caps| {
            let a = caps[1].parse().ok()?;
            let b = caps[2].parse().ok()?;
            let c = caps[3].parse().ok()?;
            Some((a, b, c))
        })
        .collect()
}

/// Parse a rules header value into an ordered rule sequence.
#[must_use]
pub fn parse_rules(value: &str) -> Vec<RateRule> {
    parse_triples(value)
        .into_iter()
        .map(|(max_requests, window_seconds, penalty_seconds)| RateRule {
            max_requests,
            window_seconds,
            penalty_seconds,
        })
        .collect()
}

/// Parse a state header value into an ordered state sequence.
#[must_use]
pub fn parse_state(value: &str) -> Vec<RateState> {
    parse_triples(value)
        .into_iter()
        .map(|(requests_used, window_elapsed_seconds, penalty_remaining_seconds)| RateState {
            requests_used,
            window_elapsed_seconds,
            penalty_remaining_seconds,
        })
        .collect()
}

/// Pause required before the next request for one (rule, state) pair.
///
/// A nonzero remaining penalty takes precedence over the quota check.
#[must_use]
pub fn required_pause(rule: &RateRule, state: &RateState) -> Duration {
    if state.penalty_remaining_seconds != 0 {
        // Remaining portion of the server-imposed penalty. A remainder
        // below zero means the penalty has already elapsed.
        return Duration::from_secs(
            rule.penalty_seconds.saturating_sub(state.penalty_remaining_seconds),
        );
    }

    if state.requests_used >= rule.max_requests
        && state.window_elapsed_seconds <= rule.window_seconds
    {
        // Quota exhausted inside the window: wait out the remainder plus
        // a one-second safety margin.
        return Duration::from_secs(rule.window_seconds - state.window_elapsed_seconds + 1);
    }

    Duration::ZERO
}

impl RateLimitSnapshot {
    /// Capture rules and state from a response header map.
    ///
    /// An absent header parses to an empty sequence, meaning "no constraint
    /// known" rather than "zero requests allowed".
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let rules = headers
            .get(RULES_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(parse_rules)
            .unwrap_or_default();

        let state = headers
            .get(STATE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(parse_state)
            .unwrap_or_default();

        Self { rules, state }
    }

    /// Compute the ordered list of pauses the caller owes, one entry per
    /// rate dimension that currently demands one.
    ///
    /// Pairing is positional and stops at the shorter sequence; a rule with
    /// no reported state (or vice versa) yields no decision for that
    /// dimension.
    #[must_use]
    pub fn pause_schedule(&self) -> Vec<Duration> {
        self.rules
            .iter()
            .zip(&self.state)
            .map(|(rule, state)| required_pause(rule, state))
            .filter(|pause| !pause.is_zero())
            .collect()
    }

    /// Block until every scheduled pause has elapsed.
    ///
    /// Pauses for multiple dimensions are slept one after another, so the
    /// total wait is their sum. This additive stacking mirrors the server
    /// contract as historically honored; do not collapse it to a maximum.
    pub async fn wait(&self) {
        for pause in self.pause_schedule() {
            tracing::info!(pause_secs = pause.as_secs(), "Rate limit engaged, pausing");
            tokio::time::sleep(pause).await;
        }
    }
}
