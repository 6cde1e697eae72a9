//! Testing utilities for retry behavior.
//!
//! This module provides scripted operations for driving the executor
//! through known failure sequences, assertion macros for execution
//! results, and property-based testing support.
//!
//! # Examples
//!
//! ## Scripted operations
//!
//! ```rust
//! use steadfast::testing::Flaky;
//! use steadfast::{execute, Failure, FailureKind, RetryPolicy};
//!
//! let mut op = Flaky::new(
//!     "fresh data",
//!     vec![Failure::new(FailureKind::Timeout, "read timed out")],
//! );
//!
//! let policy = RetryPolicy::for_kinds(FailureKind::Timeout);
//! let result = execute(&policy, || op.call());
//!
//! assert_eq!(result.unwrap().into_value(), Some("fresh data"));
//! assert_eq!(op.invocations(), 2);
//! ```
//!
//! ## Assertion macros
//!
//! ```rust
//! use steadfast::{assert_completed, execute, Failure, FailureKind, RetryPolicy};
//!
//! let policy: RetryPolicy<Failure> = RetryPolicy::for_kinds(FailureKind::Timeout);
//! assert_completed!(execute(&policy, || Ok::<_, Failure>(7)), 7);
//! ```

use std::collections::VecDeque;

/// An operation that fails a scripted number of times, then succeeds.
///
/// `Flaky` consumes its failure script front to back: each call yields
/// the next scripted failure until the script is empty, after which
/// every call succeeds with a clone of the final value. It counts
/// every invocation, which makes attempt-budget assertions direct.
///
/// # Example
///
/// ```rust
/// use steadfast::testing::Flaky;
/// use steadfast::{Failure, FailureKind};
///
/// let mut op = Flaky::new(
///     42,
///     vec![
///         Failure::new(FailureKind::Deadlock, "deadlock detected"),
///         Failure::new(FailureKind::Deadlock, "deadlock detected"),
///     ],
/// );
///
/// assert!(op.call().is_err());
/// assert!(op.call().is_err());
/// assert_eq!(op.call().unwrap(), 42);
/// assert_eq!(op.invocations(), 3);
/// ```
#[derive(Debug)]
pub struct Flaky<T, E> {
    value: T,
    failures: VecDeque<E>,
    invocations: u32,
}

impl<T, E> Flaky<T, E> {
    /// Creates a scripted operation that fails once per entry in
    /// `failures`, then succeeds with `value`.
    pub fn new(value: T, failures: impl IntoIterator<Item = E>) -> Self {
        Flaky {
            value,
            failures: failures.into_iter().collect(),
            invocations: 0,
        }
    }

    /// Number of times [`call`](Flaky::call) has been invoked.
    pub fn invocations(&self) -> u32 {
        self.invocations
    }

    /// Runs the operation once, consuming the next scripted failure if
    /// any remain.
    pub fn call(&mut self) -> Result<T, E>
    where
        T: Clone,
    {
        self.invocations += 1;
        match self.failures.pop_front() {
            Some(failure) => Err(failure),
            None => Ok(self.value.clone()),
        }
    }
}

/// Assert that an execution completed with a value.
///
/// The one-argument form accepts any completion; the two-argument form
/// also checks the completed value. Panics on suppression or a
/// propagated failure.
///
/// # Example
///
/// ```rust
/// use steadfast::{assert_completed, execute, Failure, FailureKind, RetryPolicy};
///
/// let policy: RetryPolicy<Failure> = RetryPolicy::for_kinds(FailureKind::Network);
/// assert_completed!(execute(&policy, || Ok::<_, Failure>("up")), "up");
/// ```
#[macro_export]
macro_rules! assert_completed {
    ($execution:expr) => {
        match $execution {
            Ok($crate::Outcome::Completed(_)) => {}
            Ok($crate::Outcome::Suppressed) => {
                panic!("Expected Completed, got Suppressed");
            }
            Err(failure) => {
                panic!("Expected Completed, got propagated failure: {:?}", failure);
            }
        }
    };
    ($execution:expr, $expected:expr) => {
        match $execution {
            Ok($crate::Outcome::Completed(value)) => {
                assert_eq!(value, $expected);
            }
            Ok($crate::Outcome::Suppressed) => {
                panic!("Expected Completed with {:?}, got Suppressed", $expected);
            }
            Err(failure) => {
                panic!(
                    "Expected Completed with {:?}, got propagated failure: {:?}",
                    $expected, failure
                );
            }
        }
    };
}

/// Assert that an execution exhausted its budget and was suppressed.
///
/// Panics if the execution completed or propagated a failure.
///
/// # Example
///
/// ```rust
/// use steadfast::{assert_suppressed, execute, Failure, FailureKind, RetryPolicy};
///
/// let policy = RetryPolicy::for_kinds(FailureKind::Deadlock)
///     .with_max_attempts(2)
///     .with_raise_on_exhaustion(false);
///
/// let result = execute(&policy, || {
///     Err::<(), _>(Failure::new(FailureKind::Deadlock, "deadlock detected"))
/// });
/// assert_suppressed!(result);
/// ```
#[macro_export]
macro_rules! assert_suppressed {
    ($execution:expr) => {
        match $execution {
            Ok($crate::Outcome::Suppressed) => {}
            Ok($crate::Outcome::Completed(value)) => {
                panic!("Expected Suppressed, got Completed: {:?}", value);
            }
            Err(failure) => {
                panic!("Expected Suppressed, got propagated failure: {:?}", failure);
            }
        }
    };
}

/// Assert that an execution propagated a failure.
///
/// The two-argument form also checks the failure's kind. Panics if the
/// execution completed or was suppressed.
///
/// # Example
///
/// ```rust
/// use steadfast::{assert_propagated, execute, Failure, FailureKind, RetryPolicy};
///
/// let policy = RetryPolicy::for_kinds(FailureKind::Deadlock);
/// let result = execute(&policy, || {
///     Err::<(), _>(Failure::new(FailureKind::Timeout, "read timed out"))
/// });
/// assert_propagated!(result, FailureKind::Timeout);
/// ```
#[macro_export]
macro_rules! assert_propagated {
    ($execution:expr) => {
        match $execution {
            Err(_) => {}
            Ok(outcome) => {
                panic!("Expected a propagated failure, got {:?}", outcome);
            }
        }
    };
    ($execution:expr, $kind:expr) => {
        match $execution {
            Err(failure) => {
                assert_eq!($crate::Classify::kind(&failure), $kind);
            }
            Ok(outcome) => {
                panic!(
                    "Expected a propagated {:?} failure, got {:?}",
                    $kind, outcome
                );
            }
        }
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
use crate::kind::FailureKind;

#[cfg(feature = "proptest")]
impl Arbitrary for FailureKind {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        proptest::sample::select(vec![
            FailureKind::Any,
            FailureKind::Network,
            FailureKind::Timeout,
            FailureKind::ConnectionRefused,
            FailureKind::ConnectionReset,
            FailureKind::UnexpectedEof,
            FailureKind::InvalidInput,
            FailureKind::Database,
            FailureKind::LostConnection,
            FailureKind::Deadlock,
            FailureKind::Other,
        ])
        .boxed()
    }
}
