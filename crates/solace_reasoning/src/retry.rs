//! Backoff for remote providers.
//!
//! Transient failures (408, 429, 5xx, network errors) are retried; any other
//! client error fails on the spot. A `Retry-After` header in seconds replaces
//! the computed delay, capped at `max_delay`.

use anyhow::Result;
use rand::Rng;
use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use std::time::Duration;

/// Upper bound of the random delay added to each backoff step.
const MAX_JITTER_MS: u64 = 500;
/// Characters of an error body kept in logs.
const LOGGED_BODY_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts including the first.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `retry` (1-based), without jitter.
    fn backoff(&self, retry: u32) -> Duration {
        let factor = self.backoff_factor.powi(retry.saturating_sub(1) as i32);
        let secs = self.initial_delay.as_secs_f64() * factor;
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
}

fn retry_after(response: &Response, cap: Duration) -> Option<Duration> {
    let secs: u64 = response.headers().get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Some(Duration::from_secs(secs).min(cap))
}

/// Run `operation` until it returns a success status, fails permanently, or
/// runs out of attempts.
pub async fn with_retry<F, Fut>(
    config: &RetryConfig,
    provider_name: &str,
    operation: F,
) -> Result<Response>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<Response>>,
{
    let mut last_error = String::from("no attempt made");

    for attempt in 1..=config.max_attempts {
        let mut hinted = None;
        match operation().await {
            Ok(response) if response.status().is_success() => {
                if attempt > 1 {
                    tracing::info!("{} succeeded on attempt {}", provider_name, attempt);
                }
                return Ok(response);
            }
            Ok(response) => {
                let status = response.status();
                hinted = retry_after(&response, config.max_delay);
                let body = response.text().await.unwrap_or_default();
                if !is_retryable_status(status) {
                    anyhow::bail!("{} API error ({}): {}", provider_name, status, body);
                }
                tracing::warn!(
                    "{} returned {} on attempt {}/{}: {}",
                    provider_name,
                    status,
                    attempt,
                    config.max_attempts,
                    body.chars().take(LOGGED_BODY_CHARS).collect::<String>()
                );
                last_error = format!("{} ({}): {}", provider_name, status, body);
            }
            Err(e) => {
                tracing::warn!(
                    "{} network error on attempt {}/{}: {:#}",
                    provider_name,
                    attempt,
                    config.max_attempts,
                    e
                );
                last_error = format!("{}: {:#}", provider_name, e);
            }
        }

        if attempt < config.max_attempts {
            let wait = hinted.unwrap_or_else(|| {
                config.backoff(attempt)
                    + Duration::from_millis(rand::thread_rng().gen_range(0..MAX_JITTER_MS))
            });
            tracing::info!("{} retrying in {:.1}s", provider_name, wait.as_secs_f64());
            tokio::time::sleep(wait).await;
        }
    }

    anyhow::bail!(
        "All {} attempts exhausted. Last error: {}",
        config.max_attempts,
        last_error
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::REQUEST_TIMEOUT));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff(1), Duration::from_millis(500));
        assert_eq!(config.backoff(2), Duration::from_secs(1));
        assert_eq!(config.backoff(3), Duration::from_secs(2));
        assert_eq!(config.backoff(10), config.max_delay);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_errors_exhaust_attempts() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig::default();
        let result = with_retry(&config, "Test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<Response, _>(anyhow::anyhow!("connection refused"))
        })
        .await;

        let err = result.unwrap_err().to_string();
        assert!(err.contains("exhausted"));
        assert!(err.contains("connection refused"));
        assert_eq!(calls.load(Ordering::SeqCst), config.max_attempts);
    }
}
