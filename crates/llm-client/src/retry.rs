//! Retrying execution of fallible backend calls.
//!
//! A [`RetryPolicy`] maps `(failure kind, consecutive fails)` to a [`RetryDecision`];
//! [`RetryExecutor`] runs an operation until it succeeds, the policy says stop, or the fail
//! ceiling is passed. With ceiling `m` the operation runs at most `m + 1` times.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

/// Category of a failed call, as seen by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The backend rejected the query.
    Query,
    /// The backend answered with nothing.
    EmptyResult,
    /// The backend could not be reached.
    Connectivity,
    /// Anything else.
    Unclassified,
}

/// Errors that know which [`FailureKind`] they are.
pub trait Classify {
    fn failure_kind(&self) -> FailureKind;
}

/// What to do after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    pub stop: bool,
    pub delay: Duration,
}

impl RetryDecision {
    pub fn stop() -> Self {
        Self {
            stop: true,
            delay: Duration::ZERO,
        }
    }

    pub fn retry_after(delay: Duration) -> Self {
        Self { stop: false, delay }
    }
}

/// Decides whether to retry after `fails` consecutive failures, the last one of kind `kind`.
pub trait RetryPolicy: Send + Sync {
    fn decide(&self, kind: FailureKind, fails: u32) -> RetryDecision;
}

impl<F> RetryPolicy for F
where
    F: Fn(FailureKind, u32) -> RetryDecision + Send + Sync,
{
    fn decide(&self, kind: FailureKind, fails: u32) -> RetryDecision {
        self(kind, fails)
    }
}

/// One row of a [`RulePolicy`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryRule {
    pub kind: FailureKind,
    /// Stop once this many consecutive failures happened.
    pub max_fails: u32,
    pub delay: Duration,
}

/// Table-driven policy: the first rule matching the failure kind applies; kinds without a rule
/// stop immediately.
#[derive(Debug, Clone, Default)]
pub struct RulePolicy {
    rules: Vec<RetryRule>,
}

impl RulePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, kind: FailureKind, max_fails: u32, delay: Duration) -> Self {
        self.rules.push(RetryRule {
            kind,
            max_fails,
            delay,
        });
        self
    }

    /// Query errors and empty results are retried up to `max_fails` times, query errors after
    /// `query_delay`. Unclassified failures get `other_max_fails` retries one second apart.
    /// Connectivity failures have no rule and stop at once.
    pub fn standard(max_fails: u32, query_delay: Duration, other_max_fails: u32) -> Self {
        Self::new()
            .rule(FailureKind::Query, max_fails, query_delay)
            .rule(FailureKind::EmptyResult, max_fails, Duration::ZERO)
            .rule(FailureKind::Unclassified, other_max_fails, Duration::from_secs(1))
    }

    pub fn rules(&self) -> &[RetryRule] {
        &self.rules
    }
}

impl RetryPolicy for RulePolicy {
    fn decide(&self, kind: FailureKind, fails: u32) -> RetryDecision {
        match self.rules.iter().find(|rule| rule.kind == kind) {
            Some(rule) if fails < rule.max_fails => RetryDecision::retry_after(rule.delay),
            _ => RetryDecision::stop(),
        }
    }
}

/// Runs operations under a [`RetryPolicy`] with a hard ceiling on consecutive failures.
#[derive(Clone)]
pub struct RetryExecutor {
    policy: Arc<dyn RetryPolicy>,
    max_fails: u32,
}

impl RetryExecutor {
    pub fn new(policy: impl RetryPolicy + 'static, max_fails: u32) -> Self {
        Self {
            policy: Arc::new(policy),
            max_fails,
        }
    }

    pub fn max_fails(&self) -> u32 {
        self.max_fails
    }

    /// Calls `op` until it returns `Ok`, or returns the last error once the policy says stop or
    /// the failure count exceeds the ceiling.
    pub async fn execute<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + Display,
    {
        let mut fails: u32 = 0;
        loop {
            match op().await {
                Ok(value) => {
                    if fails > 0 {
                        info!(fails = fails, "Call succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    fails += 1;
                    let kind = e.failure_kind();
                    let decision = self.policy.decide(kind, fails);
                    if decision.stop || fails > self.max_fails {
                        warn!(kind = ?kind, fails = fails, error = %e, "Giving up");
                        return Err(e);
                    }
                    warn!(
                        kind = ?kind,
                        fails = fails,
                        delay_ms = decision.delay.as_millis() as u64,
                        error = %e,
                        "Call failed, retrying"
                    );
                    if !decision.delay.is_zero() {
                        tokio::time::sleep(decision.delay).await;
                    }
                }
            }
        }
    }
}
