//! Property-based tests for the retry executor.

use proptest::prelude::*;
use steadfast::testing::Flaky;
use steadfast::{execute, Failure, FailureKind, Outcome, RetryPolicy};

fn deadlock() -> Failure {
    Failure::new(FailureKind::Deadlock, "deadlock detected")
}

proptest! {
    #[test]
    fn prop_exhaustion_invokes_exactly_the_budget(budget in 1u32..50) {
        let policy = RetryPolicy::for_kinds(FailureKind::Deadlock).with_max_attempts(budget);
        let mut op: Flaky<(), Failure> = Flaky::new((), (0..budget + 5).map(|_| deadlock()));

        let result = execute(&policy, || op.call());

        prop_assert!(result.is_err());
        prop_assert_eq!(op.invocations(), budget);
    }

    #[test]
    fn prop_success_before_exhaustion_stops_early(
        budget in 2u32..50,
        scripted in 0u32..50,
    ) {
        let failures = scripted.min(budget - 1);
        let policy = RetryPolicy::for_kinds(FailureKind::Deadlock).with_max_attempts(budget);
        let mut op = Flaky::new(7, (0..failures).map(|_| deadlock()));

        let result = execute(&policy, || op.call());

        prop_assert_eq!(result.unwrap().into_value(), Some(7));
        prop_assert_eq!(op.invocations(), failures + 1);
    }

    #[test]
    fn prop_hook_runs_once_per_retry_with_increasing_numbers(failures in 1u32..30) {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = std::sync::Arc::clone(&seen);
        let policy = RetryPolicy::for_kinds(FailureKind::Deadlock)
            .with_max_attempts(failures + 1)
            .with_on_retry(move |attempt: u32, _failure: &Failure| {
                log.lock().unwrap().push(attempt);
                Ok(())
            });
        let mut op: Flaky<(), Failure> = Flaky::new((), (0..failures).map(|_| deadlock()));

        let result = execute(&policy, || op.call());

        prop_assert!(result.is_ok());
        let attempts = seen.lock().unwrap().clone();
        prop_assert_eq!(attempts, (1..=failures).collect::<Vec<_>>());
    }

    #[test]
    fn prop_suppression_never_leaks_failures(budget in 1u32..30) {
        let policy = RetryPolicy::for_kinds(FailureKind::Deadlock)
            .with_max_attempts(budget)
            .with_raise_on_exhaustion(false);
        let mut op: Flaky<(), Failure> = Flaky::new((), (0..budget + 1).map(|_| deadlock()));

        let result = execute(&policy, || op.call());

        prop_assert!(matches!(result, Ok(Outcome::Suppressed)));
        prop_assert_eq!(op.invocations(), budget);
    }

    #[test]
    fn prop_non_qualifying_kinds_propagate_on_first_attempt(
        kind in prop::sample::select(vec![
            FailureKind::Network,
            FailureKind::Timeout,
            FailureKind::Database,
            FailureKind::LostConnection,
            FailureKind::Other,
        ]),
        budget in 1u32..20,
    ) {
        let policy = RetryPolicy::for_kinds(FailureKind::Deadlock).with_max_attempts(budget);
        let mut op: Flaky<(), Failure> =
            Flaky::new((), vec![Failure::new(kind, "not a deadlock")]);

        let result = execute(&policy, || op.call());

        prop_assert!(result.is_err());
        prop_assert_eq!(op.invocations(), 1);
    }
}
