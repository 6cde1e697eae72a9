//! Retry policy values and their builder.
//!
//! Policies are pure data - they describe when an operation is worth
//! re-running and what side effect runs between attempts, but they never
//! execute anything themselves. Construction is deterministic, does no I/O,
//! and touches no registry; every input is sanitized to a default rather
//! than rejected.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::failure::Classify;
use crate::kind::KindSet;

/// Side-effect hook invoked between a qualifying failure and the next
/// attempt.
///
/// Receives the retry count (1 for the retry after the first failure) and
/// the failure that triggered it. The hook may block (sleep, reconnect) and
/// may fail; a hook failure propagates out of the executor immediately,
/// with no further retry.
pub type RetryHook<E> = Arc<dyn Fn(u32, &E) -> Result<(), E> + Send + Sync>;

/// An immutable description of when and how to retry a failing operation.
///
/// A policy pairs a [`KindSet`] (which failure kinds qualify), an attempt
/// budget, an optional message filter, an optional between-attempt hook,
/// and the terminal behavior when the budget runs out. Once built, a policy
/// is never mutated; it is `Send + Sync` for any `E` and can be shared
/// freely across threads and call sites.
///
/// # Defaults
///
/// - kinds: as given; an empty collection becomes `[Any]`
/// - `max_attempts`: 3 (attempt 1 is the first try, not a retry; 0 is
///   sanitized to 1)
/// - `message_filter`: none
/// - `on_retry`: none
/// - `raise_on_exhaustion`: true
///
/// # Examples
///
/// ```rust
/// use steadfast::{Failure, FailureKind, RetryPolicy};
///
/// let policy = RetryPolicy::<Failure>::for_kinds([FailureKind::Timeout])
///     .with_max_attempts(5);
///
/// assert_eq!(policy.max_attempts(), 5);
/// assert_eq!(policy.kinds().primary(), FailureKind::Timeout);
/// assert!(policy.raise_on_exhaustion());
/// ```
pub struct RetryPolicy<E> {
    kinds: KindSet,
    max_attempts: u32,
    message_filter: Option<Regex>,
    on_retry: Option<RetryHook<E>>,
    raise_on_exhaustion: bool,
}

impl<E> RetryPolicy<E> {
    /// Create a policy retrying the given failure kinds, with defaults for
    /// everything else.
    ///
    /// An empty collection is sanitized to `[Any]`, the broadest kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use steadfast::{Failure, FailureKind, RetryPolicy};
    ///
    /// let policy = RetryPolicy::<Failure>::for_kinds(vec![]);
    /// assert_eq!(policy.kinds().primary(), FailureKind::Any);
    /// assert_eq!(policy.max_attempts(), 3);
    /// ```
    pub fn for_kinds(kinds: impl Into<KindSet>) -> Self {
        Self {
            kinds: kinds.into(),
            max_attempts: 3,
            message_filter: None,
            on_retry: None,
            raise_on_exhaustion: true,
        }
    }

    /// Set the total attempt budget.
    ///
    /// `max_attempts = 3` means up to 3 executions of the operation: one
    /// initial try plus two retries. Zero is sanitized to 1 so the
    /// operation always runs at least once.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Scope the policy to failures whose rendered message matches the
    /// pattern.
    ///
    /// With a filter set, a failure must match by kind **and** by message
    /// to qualify; a kind match with a non-matching message propagates
    /// immediately, exactly like a wrong-kind failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use regex::Regex;
    /// use steadfast::{Failure, FailureKind, RetryPolicy};
    ///
    /// let policy = RetryPolicy::<Failure>::for_kinds([FailureKind::Database])
    ///     .with_message_filter(Regex::new("(?i)deadlock").unwrap());
    ///
    /// let deadlock = Failure::new(FailureKind::Deadlock, "Deadlock found; txn rolled back");
    /// let syntax = Failure::new(FailureKind::Deadlock, "syntax error near SELECT");
    /// assert!(policy.qualifies(&deadlock));
    /// assert!(!policy.qualifies(&syntax));
    /// ```
    pub fn with_message_filter(mut self, filter: Regex) -> Self {
        self.message_filter = Some(filter);
        self
    }

    /// Install a hook to run between a qualifying failure and the next
    /// attempt.
    ///
    /// The hook is called with the retry count (starting at 1) and the
    /// failure from the attempt that just failed. It never runs before the
    /// first attempt, and never after a failure that will not be retried.
    /// Returning `Err` aborts the whole execution immediately.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use steadfast::{Failure, FailureKind, RetryPolicy};
    ///
    /// let policy = RetryPolicy::for_kinds([FailureKind::Network])
    ///     .with_on_retry(|attempt: u32, _failure: &Failure| {
    ///         std::thread::sleep(Duration::from_millis(10 * u64::from(attempt)));
    ///         Ok(())
    ///     });
    /// assert!(policy.on_retry().is_some());
    /// ```
    pub fn with_on_retry<H>(mut self, hook: H) -> Self
    where
        H: Fn(u32, &E) -> Result<(), E> + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(hook));
        self
    }

    /// Choose what happens when the attempt budget runs out.
    ///
    /// With `true` (the default) the final failure propagates to the
    /// caller. With `false` it is suppressed and execution yields
    /// [`Outcome::Suppressed`](crate::Outcome::Suppressed) - an explicit
    /// marker, never a default value.
    pub fn with_raise_on_exhaustion(mut self, raise: bool) -> Self {
        self.raise_on_exhaustion = raise;
        self
    }

    /// The kinds this policy retries.
    pub fn kinds(&self) -> &KindSet {
        &self.kinds
    }

    /// The total attempt budget. Always >= 1.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The message filter, if one is set.
    pub fn message_filter(&self) -> Option<&Regex> {
        self.message_filter.as_ref()
    }

    /// The between-attempt hook, if one is set.
    ///
    /// Cached policies hand out the same hook handle on every lookup, so
    /// hook identity is observable with [`Arc::strong_count`] or pointer
    /// comparison in tests.
    pub fn on_retry(&self) -> Option<&RetryHook<E>> {
        self.on_retry.as_ref()
    }

    /// Whether exhaustion propagates the final failure.
    pub fn raise_on_exhaustion(&self) -> bool {
        self.raise_on_exhaustion
    }

    /// Whether a failure qualifies for retry under this policy: its kind
    /// must be subsumed by an entry in the kind set, and its rendered
    /// message must match the filter when one is set.
    pub fn qualifies(&self, failure: &E) -> bool
    where
        E: Classify,
    {
        if !self.kinds.qualifies(failure.kind()) {
            return false;
        }
        match &self.message_filter {
            Some(filter) => filter.is_match(&failure.to_string()),
            None => true,
        }
    }
}

impl<E> Default for RetryPolicy<E> {
    /// The all-defaults policy: retry any failure, 3 attempts, no filter,
    /// no hook, propagate on exhaustion.
    fn default() -> Self {
        Self::for_kinds(KindSet::any())
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            kinds: self.kinds.clone(),
            max_attempts: self.max_attempts,
            message_filter: self.message_filter.clone(),
            on_retry: self.on_retry.clone(),
            raise_on_exhaustion: self.raise_on_exhaustion,
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("kinds", &self.kinds)
            .field("max_attempts", &self.max_attempts)
            .field(
                "message_filter",
                &self.message_filter.as_ref().map(Regex::as_str),
            )
            .field("on_retry", &self.on_retry.as_ref().map(|_| "<hook>"))
            .field("raise_on_exhaustion", &self.raise_on_exhaustion)
            .finish()
    }
}

#[cfg(test)]
mod policy_tests {
    use super::*;
    use crate::failure::Failure;
    use crate::kind::FailureKind;

    #[test]
    fn defaults_match_the_documented_contract() {
        let policy = RetryPolicy::<Failure>::default();
        assert_eq!(policy.kinds().primary(), FailureKind::Any);
        assert_eq!(policy.max_attempts(), 3);
        assert!(policy.message_filter().is_none());
        assert!(policy.on_retry().is_none());
        assert!(policy.raise_on_exhaustion());
    }

    #[test]
    fn zero_attempts_is_sanitized_to_one() {
        let policy = RetryPolicy::<Failure>::default().with_max_attempts(0);
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn qualifies_by_kind_subsumption() {
        let policy = RetryPolicy::<Failure>::for_kinds([FailureKind::Network]);

        let timeout = Failure::new(FailureKind::Timeout, "timed out");
        let deadlock = Failure::new(FailureKind::Deadlock, "deadlock");
        assert!(policy.qualifies(&timeout));
        assert!(!policy.qualifies(&deadlock));
    }

    #[test]
    fn message_filter_narrows_a_kind_match() {
        let policy = RetryPolicy::<Failure>::for_kinds([FailureKind::Any])
            .with_message_filter(Regex::new("gone away").unwrap());

        let matching = Failure::new(FailureKind::Other, "MySQL server has gone away");
        let mismatching = Failure::new(FailureKind::Other, "connection refused");
        assert!(policy.qualifies(&matching));
        assert!(!policy.qualifies(&mismatching));
    }

    #[test]
    fn message_filter_never_widens_a_kind_mismatch() {
        let policy = RetryPolicy::<Failure>::for_kinds([FailureKind::Database])
            .with_message_filter(Regex::new("timeout").unwrap());

        let wrong_kind = Failure::new(FailureKind::Timeout, "timeout waiting for peer");
        assert!(!policy.qualifies(&wrong_kind));
    }

    #[test]
    fn clones_share_the_hook_handle() {
        let policy = RetryPolicy::for_kinds([FailureKind::Any])
            .with_on_retry(|_: u32, _: &Failure| Ok(()));
        let cloned = policy.clone();

        let hook = policy.on_retry().expect("hook should be set");
        assert_eq!(Arc::strong_count(hook), 2);
        assert!(cloned.on_retry().is_some());
    }

    #[test]
    fn debug_shows_structure_without_the_hook_body() {
        let policy = RetryPolicy::for_kinds([FailureKind::Timeout])
            .with_message_filter(Regex::new("slow").unwrap())
            .with_on_retry(|_: u32, _: &Failure| Ok(()));

        let rendered = format!("{:?}", policy);
        assert!(rendered.contains("RetryPolicy"));
        assert!(rendered.contains("slow"));
        assert!(rendered.contains("<hook>"));
    }
}
