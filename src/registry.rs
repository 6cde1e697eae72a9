//! Shared strategy registry with two independent keyspaces.
//!
//! A [`Registry`] is a process-scoped, concurrently readable store of
//! [`RetryPolicy`] values. Policies are handed out as `Arc`s, so every
//! caller that looks up the same strategy shares the same immutable
//! policy. There is no ambient global registry. Construct one, hold it
//! wherever your application keeps shared state, and pass it to the
//! call sites that need it.
//!
//! The two keyspaces never interact:
//!
//! - **Names** (`register` / `lookup`): strategies installed under a
//!   chosen string name, intended for curated, well-known policies.
//! - **Kinds** (`get_or_build`): a build-once cache keyed by the first
//!   failure kind a policy covers, intended for call sites that want
//!   "the policy for this kind of failure" without naming it.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::kind::{FailureKind, KindSet};
use crate::policy::RetryPolicy;

/// Concurrent store of shared retry policies.
///
/// Lookups are lock-free reads; `get_or_build` performs an atomic
/// check-and-insert so concurrent callers racing on the same kind
/// converge on a single cached policy.
///
/// # Example
///
/// ```rust
/// use steadfast::{Failure, FailureKind, Registry, RetryPolicy};
///
/// let registry: Registry<Failure> = Registry::new();
/// registry.register(
///     "flaky_upstream",
///     RetryPolicy::for_kinds(FailureKind::Timeout).with_max_attempts(5),
/// );
///
/// let policy = registry.lookup("flaky_upstream").unwrap();
/// assert_eq!(policy.max_attempts(), 5);
/// ```
pub struct Registry<E> {
    by_name: DashMap<String, Arc<RetryPolicy<E>>>,
    by_kind: DashMap<FailureKind, Arc<RetryPolicy<E>>>,
}

impl<E> Registry<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry {
            by_name: DashMap::new(),
            by_kind: DashMap::new(),
        }
    }

    /// Returns true if no strategy has been registered or cached yet.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.by_kind.is_empty()
    }

    /// Installs a policy under a well-known name.
    ///
    /// Registering a name that is already taken silently replaces the
    /// previous policy. Callers that obtained the old `Arc` keep it;
    /// only future [`lookup`](Registry::lookup) calls see the new one.
    pub fn register(&self, name: impl Into<String>, policy: impl Into<Arc<RetryPolicy<E>>>) {
        let name = name.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(strategy = %name, "registering retry strategy");
        self.by_name.insert(name, policy.into());
    }

    /// Looks up a named strategy, returning a shared handle to it.
    ///
    /// Returns `None` if nothing was registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<Arc<RetryPolicy<E>>> {
        self.by_name.get(name).map(|entry| entry.value().clone())
    }

    /// Returns the cached policy for a kind set, building and caching
    /// it on first use.
    ///
    /// On a cache miss, `configure` receives a fresh default policy for
    /// `kinds` and returns the policy to cache. On a hit, the cached
    /// policy is returned as-is and `configure` is never invoked.
    ///
    /// # Caching caveat
    ///
    /// The cache key is only the **first** kind in `kinds`. Two calls
    /// whose kind sets share a leading kind collide on the same cache
    /// slot, and whichever call runs first decides the cached policy,
    /// remaining kinds, attempt budget, filters, and hooks included.
    /// The later call's `configure` is silently ignored:
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use steadfast::{Failure, FailureKind, Registry};
    ///
    /// let registry: Registry<Failure> = Registry::new();
    /// let first = registry.get_or_build(FailureKind::Timeout, |p| p.with_max_attempts(9));
    /// let second = registry.get_or_build(FailureKind::Timeout, |p| p.with_max_attempts(2));
    ///
    /// // Same cached policy; the second configuration never ran.
    /// assert_eq!(second.max_attempts(), 9);
    /// assert!(Arc::ptr_eq(&first, &second));
    /// ```
    ///
    /// This makes the cache a correctness risk for call sites that need
    /// differing options behind the same leading kind. Those call sites
    /// should build their policies directly with
    /// [`RetryPolicy::for_kinds`] or register them under distinct names
    /// instead of going through the cache.
    pub fn get_or_build<C>(&self, kinds: impl Into<KindSet>, configure: C) -> Arc<RetryPolicy<E>>
    where
        C: FnOnce(RetryPolicy<E>) -> RetryPolicy<E>,
    {
        let kinds = kinds.into();
        let primary = kinds.primary();
        self.by_kind
            .entry(primary)
            .or_insert_with(|| {
                #[cfg(feature = "tracing")]
                tracing::debug!(kind = ?primary, "caching retry strategy");
                Arc::new(configure(RetryPolicy::for_kinds(kinds)))
            })
            .value()
            .clone()
    }
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Registry::new()
    }
}

impl<E> fmt::Debug for Registry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("named_strategies", &self.by_name.len())
            .field("cached_kinds", &self.by_kind.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::Failure;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn registry() -> Registry<Failure> {
        Registry::new()
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = registry();
        assert!(registry.is_empty());
        assert!(registry.lookup("network_errors").is_none());
    }

    #[test]
    fn test_register_and_lookup_round_trip() {
        let registry = registry();
        registry.register(
            "deadlock",
            RetryPolicy::for_kinds(FailureKind::Deadlock).with_max_attempts(10),
        );

        let policy = registry.lookup("deadlock").unwrap();
        assert_eq!(policy.max_attempts(), 10);
        assert_eq!(policy.kinds().primary(), FailureKind::Deadlock);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_lookup_shares_one_policy() {
        let registry = registry();
        registry.register("net", RetryPolicy::for_kinds(FailureKind::Network));

        let first = registry.lookup("net").unwrap();
        let second = registry.lookup("net").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_register_silently_replaces() {
        let registry = registry();
        registry.register("db", RetryPolicy::for_kinds(FailureKind::Database));
        let old = registry.lookup("db").unwrap();

        registry.register(
            "db",
            RetryPolicy::for_kinds(FailureKind::Database).with_max_attempts(7),
        );

        let new = registry.lookup("db").unwrap();
        assert_eq!(new.max_attempts(), 7);
        // The earlier handle is unaffected by the replacement.
        assert_eq!(old.max_attempts(), 3);
    }

    #[test]
    fn test_get_or_build_builds_on_first_use() {
        let registry = registry();
        let policy = registry.get_or_build(FailureKind::Timeout, |p| p.with_max_attempts(4));
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.kinds().primary(), FailureKind::Timeout);
    }

    #[test]
    fn test_get_or_build_hit_returns_cached_policy() {
        let registry = registry();
        let first = registry.get_or_build(FailureKind::Timeout, |p| p.with_max_attempts(9));
        let second = registry.get_or_build(FailureKind::Timeout, |p| p.with_max_attempts(2));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.max_attempts(), 9);
    }

    #[test]
    fn test_get_or_build_hit_never_invokes_configure() {
        let registry = registry();
        let builds = AtomicU32::new(0);

        for _ in 0..5 {
            registry.get_or_build(FailureKind::Deadlock, |p| {
                builds.fetch_add(1, Ordering::SeqCst);
                p
            });
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cache_key_is_first_kind_only() {
        let registry = registry();
        let first = registry.get_or_build(
            vec![FailureKind::Timeout, FailureKind::ConnectionReset],
            |p| p.with_max_attempts(12),
        );
        // Same leading kind, different tail and options: collides.
        let second = registry.get_or_build(
            vec![FailureKind::Timeout, FailureKind::Deadlock],
            |p| p.with_max_attempts(2),
        );

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.max_attempts(), 12);
        assert!(second.kinds().contains(FailureKind::ConnectionReset));
        assert!(!second.kinds().contains(FailureKind::Deadlock));
    }

    #[test]
    fn test_distinct_leading_kinds_get_distinct_policies() {
        let registry = registry();
        let timeout = registry.get_or_build(FailureKind::Timeout, |p| p);
        let reset = registry.get_or_build(FailureKind::ConnectionReset, |p| p);

        assert!(!Arc::ptr_eq(&timeout, &reset));
    }

    #[test]
    fn test_name_and_kind_keyspaces_are_independent() {
        let registry = registry();
        registry.register(
            "timeouts",
            RetryPolicy::for_kinds(FailureKind::Timeout).with_max_attempts(8),
        );

        // The named strategy did not seed the kind cache.
        let built = AtomicU32::new(0);
        let cached = registry.get_or_build(FailureKind::Timeout, |p| {
            built.fetch_add(1, Ordering::SeqCst);
            p.with_max_attempts(2)
        });

        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(cached.max_attempts(), 2);
        assert_eq!(registry.lookup("timeouts").unwrap().max_attempts(), 8);
    }
}
