//! The retry loop: run an operation under a policy until it succeeds,
//! exhausts its attempt budget, or fails in a way the policy does not
//! cover.
//!
//! Execution is synchronous - [`execute`] blocks the calling thread until
//! it reaches a terminal state, and no registry or other shared state is
//! touched while the operation or its hook runs. The executor recovers
//! exactly one case locally (a qualifying failure with budget remaining);
//! everything else surfaces to the caller as a propagated failure or the
//! explicit [`Outcome::Suppressed`] marker.

use std::sync::Arc;

use crate::failure::Classify;
use crate::policy::RetryPolicy;

/// Terminal result of an execution that did not propagate a failure.
///
/// Suppression is an explicit marker, not a default value: callers can
/// always tell "succeeded with a value" apart from "gave up quietly after
/// exhausting the budget" (the latter only happens under
/// [`with_raise_on_exhaustion(false)`](RetryPolicy::with_raise_on_exhaustion)).
///
/// # Examples
///
/// ```rust
/// use steadfast::Outcome;
///
/// let done: Outcome<i32> = Outcome::Completed(7);
/// assert_eq!(done.into_value(), Some(7));
///
/// let gave_up: Outcome<i32> = Outcome::Suppressed;
/// assert!(gave_up.is_suppressed());
/// assert_eq!(gave_up.into_value(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation produced a value.
    Completed(T),
    /// The budget ran out and the policy suppressed the final failure.
    Suppressed,
}

impl<T> Outcome<T> {
    /// Returns true if the operation produced a value.
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    /// Returns true if the final failure was suppressed.
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Outcome::Suppressed)
    }

    /// Borrow the value, if one was produced.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Suppressed => None,
        }
    }

    /// Extract the value, if one was produced.
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Suppressed => None,
        }
    }

    /// Map the completed value, leaving suppression untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::Suppressed => Outcome::Suppressed,
        }
    }
}

impl<T> From<Outcome<T>> for Option<T> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_value()
    }
}

/// Run `operation` under `policy` until it reaches a terminal state.
///
/// The operation is invoked at most [`max_attempts`](RetryPolicy::max_attempts)
/// times; the same callable is re-invoked each round, never reconstructed.
/// After each qualifying failure short of the budget, the policy's
/// `on_retry` hook (if any) runs with the retry count and the failure that
/// triggered it.
///
/// Terminal states:
///
/// - `Ok(Outcome::Completed(value))` - some attempt succeeded.
/// - `Err(failure)` with the failure untouched, when it never qualified
///   (wrong kind, or message filter mismatch). Filtering is a pass-through,
///   not an exhaustion case; `raise_on_exhaustion` does not apply.
/// - `Err(failure)` with the *last* failure, when the budget ran out and
///   the policy raises on exhaustion.
/// - `Ok(Outcome::Suppressed)` when the budget ran out and the policy
///   suppresses instead.
/// - `Err(hook_failure)` immediately when the hook itself fails; the hook
///   failure is never retried.
///
/// # Examples
///
/// ```rust
/// use steadfast::{execute, Failure, FailureKind, Outcome, RetryPolicy};
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// let policy = RetryPolicy::for_kinds([FailureKind::Timeout]).with_max_attempts(3);
/// let attempts = AtomicU32::new(0);
///
/// let result = execute(&policy, || {
///     if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
///         Err(Failure::new(FailureKind::Timeout, "timed out"))
///     } else {
///         Ok("fresh data")
///     }
/// });
///
/// assert_eq!(result.unwrap(), Outcome::Completed("fresh data"));
/// assert_eq!(attempts.load(Ordering::SeqCst), 3);
/// ```
pub fn execute<T, E, F>(policy: &RetryPolicy<E>, mut operation: F) -> Result<Outcome<T>, E>
where
    E: Classify,
    F: FnMut() -> Result<T, E>,
{
    let mut attempt = 1u32;
    loop {
        match operation() {
            Ok(value) => return Ok(Outcome::Completed(value)),
            Err(failure) => {
                if !policy.qualifies(&failure) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        "failure did not qualify for retry ({:?}), propagating: {}",
                        failure.kind(),
                        failure
                    );
                    return Err(failure);
                }

                if attempt >= policy.max_attempts() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "retry budget exhausted after {} attempts: {}",
                        attempt,
                        failure
                    );
                    return if policy.raise_on_exhaustion() {
                        Err(failure)
                    } else {
                        Ok(Outcome::Suppressed)
                    };
                }

                #[cfg(feature = "tracing")]
                tracing::debug!(
                    "attempt {} of {} failed ({:?}), retrying: {}",
                    attempt,
                    policy.max_attempts(),
                    failure.kind(),
                    failure
                );

                if let Some(hook) = policy.on_retry() {
                    if let Err(hook_failure) = hook(attempt, &failure) {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            "retry hook failed on attempt {}, aborting: {}",
                            attempt,
                            hook_failure
                        );
                        return Err(hook_failure);
                    }
                }

                attempt += 1;
            }
        }
    }
}

/// Wrap an operation so that each call of the returned closure is one full
/// policy-governed execution.
///
/// This is the explicit decorator form: instead of attaching retry
/// behavior to a method definition, compose it at the call site and pass
/// the wrapped operation wherever a plain callable is expected.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use steadfast::{wrap, Failure, FailureKind, Outcome, RetryPolicy};
///
/// let policy = Arc::new(RetryPolicy::<Failure>::for_kinds([FailureKind::Network]));
/// let mut fetch = wrap(policy, || Ok::<_, Failure>(42));
///
/// assert_eq!(fetch().unwrap(), Outcome::Completed(42));
/// assert_eq!(fetch().unwrap(), Outcome::Completed(42));
/// ```
pub fn wrap<T, E, F>(
    policy: Arc<RetryPolicy<E>>,
    mut operation: F,
) -> impl FnMut() -> Result<Outcome<T>, E>
where
    E: Classify,
    F: FnMut() -> Result<T, E>,
{
    move || execute(&policy, &mut operation)
}


#[cfg(all(test, feature = "tracing"))]
mod tracing_tests {
    use super::*;
    use crate::failure::Failure;
    use crate::kind::FailureKind;
    use tracing_test::traced_test;

    fn deadlock() -> Failure {
        Failure::new(FailureKind::Deadlock, "deadlock detected")
    }

    #[traced_test]
    #[test]
    fn exhaustion_emits_a_warning() {
        let policy = RetryPolicy::for_kinds(FailureKind::Deadlock).with_max_attempts(2);
        let result = execute(&policy, || Err::<(), _>(deadlock()));

        assert!(result.is_err());
        assert!(logs_contain("retry budget exhausted after 2 attempts"));
    }

    #[traced_test]
    #[test]
    fn retries_emit_debug_events() {
        let mut remaining = 1;
        let policy = RetryPolicy::for_kinds(FailureKind::Deadlock).with_max_attempts(3);
        let result = execute(&policy, || {
            if remaining > 0 {
                remaining -= 1;
                Err(deadlock())
            } else {
                Ok(())
            }
        });

        assert!(result.is_ok());
        assert!(logs_contain("attempt 1 of 3 failed"));
    }

    #[traced_test]
    #[test]
    fn non_qualifying_failures_log_the_pass_through() {
        let policy = RetryPolicy::for_kinds(FailureKind::Timeout);
        let result = execute(&policy, || Err::<(), _>(deadlock()));

        assert!(result.is_err());
        assert!(logs_contain("failure did not qualify for retry"));
    }
}
