//! Retry policy for completion calls.
//!
//! Stateless: [`RetryPolicy::disposition`] maps one failed attempt onto
//! either a terminal [`CompletionError`] or a retry with a delay. The
//! caller owns the attempt counter.

use std::time::Duration;

use lyricsmith_types::completion::{
    AttemptError, CompletionError, STATUS_TOO_MANY_REQUESTS, STATUS_UNAUTHORIZED,
};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default backoff unit between attempts.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(2);

/// What to do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Sleep for `delay`, then try again. If no retries remain, fail with
    /// `exhausted` instead.
    Retry {
        delay: Duration,
        exhausted: CompletionError,
    },
    /// Stop immediately.
    Fail(CompletionError),
}

/// Bounded retry budget with a backoff unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_unit: Duration) -> Self {
        Self {
            max_retries,
            backoff_unit,
        }
    }

    /// Total attempts allowed per call (first attempt plus retries).
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Linear backoff for an unavailable upstream: `retry × unit`.
    /// `retry` is 1-based.
    pub fn unavailable_delay(&self, retry: u32) -> Duration {
        self.backoff_unit.saturating_mul(retry)
    }

    /// Fixed backoff for timeouts and connection failures.
    pub fn transport_delay(&self) -> Duration {
        self.backoff_unit
    }

    /// Classify a failed attempt. `retry` is the 1-based index of the retry
    /// that would follow this attempt.
    ///
    /// Only errors for which [`AttemptError::is_retryable`] holds are retried.
    pub fn disposition(&self, error: AttemptError, retry: u32) -> Disposition {
        if error.is_retryable() {
            return match error {
                AttemptError::Timeout => Disposition::Retry {
                    delay: self.transport_delay(),
                    exhausted: CompletionError::Timeout,
                },
                AttemptError::Connect(_) => Disposition::Retry {
                    delay: self.transport_delay(),
                    exhausted: CompletionError::Connectivity,
                },
                _ => Disposition::Retry {
                    delay: self.unavailable_delay(retry),
                    exhausted: CompletionError::ServiceUnavailable,
                },
            };
        }

        Disposition::Fail(terminal_error(error))
    }
}

/// Map a non-retryable attempt failure onto the user-facing taxonomy.
fn terminal_error(error: AttemptError) -> CompletionError {
    match error {
        AttemptError::Status { status, .. } if status == STATUS_TOO_MANY_REQUESTS => {
            CompletionError::RateLimited
        }
        AttemptError::Status { status, .. } if status == STATUS_UNAUTHORIZED => {
            CompletionError::Auth
        }
        AttemptError::Status { status, body } => CompletionError::Upstream {
            status,
            message: extract_error_message(&body, status),
        },
        AttemptError::Transport(detail) => CompletionError::Network(detail),
        AttemptError::Timeout => CompletionError::Timeout,
        AttemptError::Connect(_) => CompletionError::Connectivity,
    }
}

/// Pull `error.message` out of an error body, falling back to "status N".
pub fn extract_error_message(body: &str, status: u16) -> String {
    serde_json::from_str::<lyricsmith_types::completion::ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16, body: &str) -> AttemptError {
        AttemptError::Status {
            status: code,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_default_budget() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.max_attempts(), 3);
    }

    #[test]
    fn test_bad_gateway_backs_off_linearly() {
        let policy = RetryPolicy::new(3, Duration::from_millis(500));
        for retry in 1..=3 {
            match policy.disposition(status(502, ""), retry) {
                Disposition::Retry { delay, exhausted } => {
                    assert_eq!(delay, Duration::from_millis(500) * retry);
                    assert_eq!(exhausted, CompletionError::ServiceUnavailable);
                }
                other => panic!("expected retry, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_timeout_and_connect_back_off_fixed() {
        let policy = RetryPolicy::new(2, Duration::from_secs(1));
        assert_eq!(
            policy.disposition(AttemptError::Timeout, 2),
            Disposition::Retry {
                delay: Duration::from_secs(1),
                exhausted: CompletionError::Timeout,
            }
        );
        assert_eq!(
            policy.disposition(AttemptError::Connect("refused".into()), 2),
            Disposition::Retry {
                delay: Duration::from_secs(1),
                exhausted: CompletionError::Connectivity,
            }
        );
    }

    #[test]
    fn test_auth_and_rate_limit_fail_immediately() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.disposition(status(401, ""), 1),
            Disposition::Fail(CompletionError::Auth)
        );
        assert_eq!(
            policy.disposition(status(429, ""), 1),
            Disposition::Fail(CompletionError::RateLimited)
        );
    }

    #[test]
    fn test_other_status_uses_error_body_message() {
        let policy = RetryPolicy::default();
        let body = r#"{"error":{"message":"No endpoints found for model","code":404}}"#;
        assert_eq!(
            policy.disposition(status(404, body), 1),
            Disposition::Fail(CompletionError::Upstream {
                status: 404,
                message: "No endpoints found for model".to_string(),
            })
        );
    }

    #[test]
    fn test_other_status_falls_back_to_generic_message() {
        assert_eq!(extract_error_message("<html>oops</html>", 503), "status 503");
        assert_eq!(extract_error_message(r#"{"error":{}}"#, 500), "status 500");
        assert_eq!(extract_error_message(r#"{"error":{"message":"  "}}"#, 400), "status 400");
    }

    #[test]
    fn test_transport_failure_is_network_error() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.disposition(AttemptError::Transport("invalid certificate".into()), 1),
            Disposition::Fail(CompletionError::Network("invalid certificate".into()))
        );
    }

    #[test]
    fn test_retry_arm_follows_is_retryable() {
        let policy = RetryPolicy::default();
        let cases = [
            AttemptError::Timeout,
            AttemptError::Connect("refused".into()),
            AttemptError::Transport("tls".into()),
            status(400, ""),
            status(401, ""),
            status(403, ""),
            status(429, ""),
            status(500, ""),
            status(502, ""),
            status(503, ""),
        ];
        for error in cases {
            let retried = matches!(
                policy.disposition(error.clone(), 1),
                Disposition::Retry { .. }
            );
            assert_eq!(retried, error.is_retryable(), "{error:?}");
        }
    }
}
