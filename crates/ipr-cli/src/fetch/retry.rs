//! Retry policy for InterPro and UniProt requests
//!
//! Two kinds of failure are distinguished. A request timeout reported by the
//! server (HTTP 408) is retried after the retry delay without limit and does
//! not count against the failure budget. Every other failure (transport
//! error, unreadable body, non-success status) counts; once the budget is
//! spent the next failure is fatal.

use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;

// ============================================================================
// Retry Constants
// ============================================================================

/// Counted failures tolerated before giving up (four attempts in total)
pub const MAX_RETRIES: u32 = 3;

/// Pause before any retry
pub const RETRY_DELAY: Duration = Duration::from_secs(61);

/// Pause between consecutive pages
pub const PAGE_DELAY: Duration = Duration::from_secs(1);

/// Why a single attempt failed
#[derive(Debug)]
pub enum AttemptFailure {
    /// Response with a status other than 2xx
    Status(StatusCode),
    /// Connection, TLS, timeout or body-read error
    Transport(reqwest::Error),
}

impl AttemptFailure {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Transport(e) => e.status(),
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "HTTP {}", status),
            Self::Transport(e) => write!(f, "{}", e),
        }
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep, then send the same request again
    Retry { delay: Duration, counted: bool },
    /// Stop and report the failure
    GiveUp,
}

/// Retry and throttling settings for paginated fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub page_delay: Duration,
    /// Statuses retried without limit
    pub uncounted_statuses: Vec<StatusCode>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            retry_delay: RETRY_DELAY,
            page_delay: PAGE_DELAY,
            uncounted_statuses: vec![StatusCode::REQUEST_TIMEOUT],
        }
    }
}

impl RetryPolicy {
    /// Same limits with no sleeping, for tests and local mirrors
    pub fn immediate() -> Self {
        Self {
            retry_delay: Duration::ZERO,
            page_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Decide on a failed attempt given the counted failures so far
    pub fn decide(&self, failure: &AttemptFailure, failures: u32) -> RetryDecision {
        let uncounted = failure
            .status()
            .is_some_and(|status| self.uncounted_statuses.contains(&status));

        if uncounted {
            RetryDecision::Retry {
                delay: self.retry_delay,
                counted: false,
            }
        } else if failures < self.max_retries {
            RetryDecision::Retry {
                delay: self.retry_delay,
                counted: true,
            }
        } else {
            RetryDecision::GiveUp
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn status(code: u16) -> AttemptFailure {
        AttemptFailure::Status(StatusCode::from_u16(code).unwrap())
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.retry_delay, Duration::from_secs(61));
        assert_eq!(policy.page_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_timeout_never_counted() {
        let policy = RetryPolicy::default();
        for failures in [0, 3, 100] {
            assert_eq!(
                policy.decide(&status(408), failures),
                RetryDecision::Retry {
                    delay: RETRY_DELAY,
                    counted: false
                }
            );
        }
    }

    #[test]
    fn test_failure_budget() {
        let policy = RetryPolicy::immediate();
        let failure = status(500);

        let decisions: Vec<_> = (0..=3).map(|n| policy.decide(&failure, n)).collect();
        assert_eq!(
            decisions[..3],
            [RetryDecision::Retry {
                delay: Duration::ZERO,
                counted: true
            }; 3]
        );
        assert_eq!(decisions[3], RetryDecision::GiveUp);
    }

    #[test]
    fn test_client_errors_are_counted() {
        let policy = RetryPolicy::default();
        assert!(matches!(
            policy.decide(&status(404), 0),
            RetryDecision::Retry { counted: true, .. }
        ));
        assert_eq!(policy.decide(&status(429), 3), RetryDecision::GiveUp);
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(status(503).to_string(), "HTTP 503 Service Unavailable");
    }
}
