//! HTTP retry policy with exponential backoff.
//!
//! Defaults follow the official OpenAI/Anthropic SDKs:
//!
//! - Max retries: 2 (3 total attempts)
//! - Initial delay: 500ms, doubling per attempt, capped at 8 seconds
//! - Down-jitter up to 25% (multiplier in [0.75, 1.0])
//!
//! Retryable: HTTP 408, 409, 429, 5xx and connection/timeout errors.
//! `x-should-retry: true|false` from the server overrides the status check.
//! `Retry-After-Ms` / `Retry-After` replace the computed delay when in (0, 60s).
//!
//! Every attempt carries the same `Idempotency-Key` and an attempt counter in
//! `X-Stainless-Retry-Count` (0 for the first request).

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::HeaderMap};
use uuid::Uuid;

const RETRY_COUNT_HEADER: &str = "X-Stainless-Retry-Count";
const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";
const MAX_SERVER_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the initial request.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Fraction of the delay that may be shaved off at random.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter_factor: 0.25,
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn within_server_bounds(delay: Duration) -> Option<Duration> {
    (delay > Duration::ZERO && delay < MAX_SERVER_DELAY).then_some(delay)
}

/// Server-requested delay from `Retry-After-Ms` (float millis) or
/// `Retry-After` (integer seconds), if present and in range.
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let from_ms = header_str(headers, "retry-after-ms")
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .map(|ms| Duration::from_secs_f64(ms / 1000.0))
        .and_then(within_server_bounds);
    if from_ms.is_some() {
        return from_ms;
    }

    header_str(headers, "retry-after")
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .and_then(within_server_bounds)
}

#[must_use]
pub fn should_retry(status: StatusCode, headers: &HeaderMap) -> bool {
    match header_str(headers, "x-should-retry") {
        Some(s) if s.eq_ignore_ascii_case("true") => return true,
        Some(s) if s.eq_ignore_ascii_case("false") => return false,
        _ => {}
    }

    matches!(status.as_u16(), 408 | 409 | 429 | 500..=599)
}

/// Delay before retry number `backoff_step + 1`.
#[must_use]
pub fn backoff_delay(backoff_step: u32, config: &RetryConfig, headers: Option<&HeaderMap>) -> Duration {
    if let Some(delay) = headers.and_then(parse_retry_after) {
        return delay;
    }

    let exponential = config.initial_delay.as_secs_f64() * 2.0_f64.powi(backoff_step as i32);
    let capped = exponential.min(config.max_delay.as_secs_f64());
    let jitter = 1.0 - rand::random::<f64>() * config.jitter_factor;
    Duration::from_secs_f64(capped * jitter)
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout() || error.is_request()
}

/// Result of [`send_with_retry`].
///
/// Success and failure are separate variants so an error response can never
/// be mistaken for a usable body.
#[derive(Debug)]
pub enum RetryOutcome {
    /// 2xx response.
    Success(Response),
    /// Non-2xx response that was not (or no longer) retryable.
    HttpError(Response),
    /// Transport failure on the last attempt made.
    ConnectionError { attempts: u32, source: reqwest::Error },
}

/// Sends the request built by `build_request`, retrying per `config`.
///
/// The closure is called once per attempt.
pub async fn send_with_retry<F>(build_request: F, config: &RetryConfig) -> RetryOutcome
where
    F: Fn() -> RequestBuilder,
{
    let idempotency_key = format!("wordwalk-retry-{}", Uuid::new_v4());
    let mut attempt: u32 = 0;

    loop {
        let request = build_request()
            .header(RETRY_COUNT_HEADER, attempt.to_string())
            .header(IDEMPOTENCY_HEADER, idempotency_key.as_str());
        let can_retry = attempt < config.max_retries;

        let delay = match request.send().await {
            Ok(response) if response.status().is_success() => {
                return RetryOutcome::Success(response);
            }
            Ok(response) => {
                if !(can_retry && should_retry(response.status(), response.headers())) {
                    return RetryOutcome::HttpError(response);
                }
                let delay = backoff_delay(attempt, config, Some(response.headers()));
                tracing::debug!(
                    status = %response.status(),
                    retry_count = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying request after error status"
                );
                delay
            }
            Err(e) => {
                if !(can_retry && is_retryable_error(&e)) {
                    return RetryOutcome::ConnectionError {
                        attempts: attempt + 1,
                        source: e,
                    };
                }
                let delay = backoff_delay(attempt, config, None);
                tracing::debug!(
                    error = %e,
                    retry_count = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying request after connection error"
                );
                delay
            }
        };

        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn retry_after_ms_takes_precedence() {
        let h = headers(&[("retry-after-ms", "250"), ("retry-after", "3")]);
        assert_eq!(parse_retry_after(&h), Some(Duration::from_millis(250)));
    }

    #[test]
    fn retry_after_seconds() {
        let h = headers(&[("retry-after", "3")]);
        assert_eq!(parse_retry_after(&h), Some(Duration::from_secs(3)));
    }

    #[test]
    fn retry_after_out_of_range_is_ignored() {
        assert_eq!(parse_retry_after(&headers(&[("retry-after", "0")])), None);
        assert_eq!(parse_retry_after(&headers(&[("retry-after", "120")])), None);
        assert_eq!(parse_retry_after(&headers(&[("retry-after", "soon")])), None);
        assert_eq!(parse_retry_after(&HeaderMap::new()), None);
    }

    #[test]
    fn retryable_statuses() {
        let empty = HeaderMap::new();
        for code in [408, 409, 429, 500, 502, 503, 504, 529] {
            assert!(should_retry(StatusCode::from_u16(code).unwrap(), &empty), "{code}");
        }
        for code in [400, 401, 403, 404, 422] {
            assert!(!should_retry(StatusCode::from_u16(code).unwrap(), &empty), "{code}");
        }
    }

    #[test]
    fn should_retry_header_overrides_status() {
        let force = headers(&[("x-should-retry", "true")]);
        assert!(should_retry(StatusCode::BAD_REQUEST, &force));
        let forbid = headers(&[("x-should-retry", "FALSE")]);
        assert!(!should_retry(StatusCode::SERVICE_UNAVAILABLE, &forbid));
    }

    #[test]
    fn backoff_is_bounded_and_capped() {
        let config = RetryConfig::default();
        for step in 0..3 {
            let delay = backoff_delay(step, &config, None);
            let base = (0.5 * 2.0_f64.powi(step as i32)).min(8.0);
            assert!(delay.as_secs_f64() <= base + 1e-6);
            assert!(delay.as_secs_f64() >= base * 0.75 - 1e-6);
        }
        let capped = backoff_delay(10, &config, None);
        assert!(capped <= Duration::from_secs(8));
    }

    #[test]
    fn backoff_respects_retry_after() {
        let h = headers(&[("retry-after", "2")]);
        let delay = backoff_delay(0, &RetryConfig::default(), Some(&h));
        assert_eq!(delay, Duration::from_secs(2));
    }
}
