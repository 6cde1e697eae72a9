//! Stock retry strategies and backoff hook factories.
//!
//! Two presets cover the classic transient-failure cases: long-haul
//! retries for network trouble and a short linear backoff for database
//! deadlocks. Both are plain [`RetryPolicy`] values installed into a
//! [`Registry`] under well-known names, so applications can override
//! them by registering their own policy under the same name.
//!
//! The backoff factories build `on_retry` hooks that block the calling
//! thread between attempts. The executor is synchronous; a hook that
//! sleeps is the idiomatic place to put delay.

use std::thread;
use std::time::Duration;

use crate::kind::FailureKind;
use crate::policy::RetryPolicy;
use crate::registry::Registry;

/// Name under which the network preset is installed.
pub const NETWORK_ERRORS: &str = "network_errors";

/// Name under which the deadlock preset is installed.
pub const DEADLOCK: &str = "deadlock";

/// Installs the stock strategies into a registry.
///
/// - `"network_errors"`: timeouts, refused or reset connections,
///   truncated streams, and invalid-input errnos surfaced by socket
///   calls. Retries up to 12 attempts, sleeping `10s * n` before the
///   n-th retry.
/// - `"deadlock"`: database deadlocks. Retries up to 10 attempts,
///   sleeping `10ms * n`.
///
/// Calling this on a registry that already holds either name replaces
/// the existing entry.
pub fn install_defaults<E>(registry: &Registry<E>)
where
    E: 'static,
{
    registry.register(
        NETWORK_ERRORS,
        RetryPolicy::for_kinds([
            FailureKind::UnexpectedEof,
            FailureKind::Timeout,
            FailureKind::ConnectionRefused,
            FailureKind::InvalidInput,
            FailureKind::ConnectionReset,
        ])
        .with_max_attempts(12)
        .with_on_retry(linear_backoff(Duration::from_secs(10))),
    );

    registry.register(
        DEADLOCK,
        RetryPolicy::for_kinds(FailureKind::Deadlock)
            .with_max_attempts(10)
            .with_on_retry(linear_backoff(Duration::from_millis(10))),
    );
}

/// Builds a hook that sleeps `step * n` before the n-th retry.
///
/// The delay grows linearly: first retry waits one step, second waits
/// two, and so on. The hook never fails.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use steadfast::{strategies, Failure, FailureKind, RetryPolicy};
///
/// let policy: RetryPolicy<Failure> = RetryPolicy::for_kinds(FailureKind::Network)
///     .with_max_attempts(5)
///     .with_on_retry(strategies::linear_backoff(Duration::from_millis(50)));
/// ```
pub fn linear_backoff<E>(
    step: Duration,
) -> impl Fn(u32, &E) -> Result<(), E> + Send + Sync + 'static
where
    E: 'static,
{
    move |attempt: u32, _failure: &E| {
        thread::sleep(step.saturating_mul(attempt));
        Ok(())
    }
}

/// Builds a hook that sleeps a randomized `step * n`, spread by
/// `factor`.
///
/// The n-th retry waits a duration drawn uniformly from
/// `step * n ± factor * step * n`. A `factor` of `0.3` means the delay
/// varies by up to 30% in either direction; values outside `0.0..=1.0`
/// are clamped. Jitter keeps a herd of callers that failed together
/// from retrying in lockstep.
#[cfg(feature = "jitter")]
pub fn jittered_backoff<E>(
    step: Duration,
    factor: f64,
) -> impl Fn(u32, &E) -> Result<(), E> + Send + Sync + 'static
where
    E: 'static,
{
    let factor = factor.clamp(0.0, 1.0);
    move |attempt: u32, _failure: &E| {
        use rand::Rng;

        let base = step.saturating_mul(attempt).as_secs_f64();
        let spread = base * factor;
        let low = (base - spread).max(0.0);
        let high = base + spread;
        let delay = rand::rng().random_range(low..=high);
        let delay = Duration::try_from_secs_f64(delay).unwrap_or(Duration::MAX);
        thread::sleep(delay);
        Ok(())
    }
}
