//! Basic Retry Example
//!
//! Demonstrates driving operations through retry policies.
//! Shows practical patterns including:
//! - Recovering from transient failures within an attempt budget
//! - Exhaustion propagating the final failure
//! - Suppressing exhaustion for best-effort work
//! - Message filters narrowing what qualifies
//! - Observing each retry with a hook
//!
//! Run with: cargo run --example basic_retry

use regex::Regex;
use steadfast::{execute, Failure, FailureKind, Outcome, RetryPolicy};

// ==================== Recovery ====================

/// Example 1: Recovery within the budget
///
/// A flaky read fails twice, then succeeds on the third attempt.
fn example_recovery() {
    println!("\n=== Example 1: Recovery Within Budget ===");

    let policy = RetryPolicy::for_kinds(FailureKind::Timeout).with_max_attempts(5);

    let mut attempts = 0;
    let result = execute(&policy, || {
        attempts += 1;
        println!("  attempt {}", attempts);
        if attempts < 3 {
            Err(Failure::new(FailureKind::Timeout, "read timed out"))
        } else {
            Ok("fresh data")
        }
    });

    println!("  result: {:?}", result);
}

// ==================== Exhaustion ====================

/// Example 2: The budget runs out
///
/// Every attempt fails, so the final failure comes back to the caller.
fn example_exhaustion() {
    println!("\n=== Example 2: Exhaustion Propagates ===");

    let policy = RetryPolicy::for_kinds(FailureKind::Deadlock).with_max_attempts(3);

    let result: Result<Outcome<()>, Failure> = execute(&policy, || {
        Err(Failure::new(FailureKind::Deadlock, "deadlock detected"))
    });

    match result {
        Err(failure) => println!("  gave up: {}", failure),
        Ok(outcome) => println!("  unexpected: {:?}", outcome),
    }
}

/// Example 3: Best-effort work
///
/// With exhaustion suppressed the caller sees a marker, not a failure.
fn example_suppression() {
    println!("\n=== Example 3: Suppressing Exhaustion ===");

    let policy = RetryPolicy::for_kinds(FailureKind::LostConnection)
        .with_max_attempts(2)
        .with_raise_on_exhaustion(false);

    let result: Result<Outcome<()>, Failure> = execute(&policy, || {
        Err(Failure::new(FailureKind::LostConnection, "server went away"))
    });

    match result {
        Ok(Outcome::Suppressed) => println!("  budget spent, moving on"),
        other => println!("  unexpected: {:?}", other),
    }
}

// ==================== Qualification ====================

/// Example 4: Message filters
///
/// Only failures whose message matches the pattern are retried.
fn example_message_filter() {
    println!("\n=== Example 4: Message Filters ===");

    let policy = RetryPolicy::for_kinds(FailureKind::Timeout)
        .with_max_attempts(4)
        .with_message_filter(Regex::new("timed out").unwrap());

    let mut calls = 0;
    let retried = execute(&policy, || {
        calls += 1;
        if calls < 2 {
            Err(Failure::new(FailureKind::Timeout, "read timed out"))
        } else {
            Ok(calls)
        }
    });
    println!("  matching message retried: {:?}", retried);

    let propagated: Result<Outcome<()>, Failure> = execute(&policy, || {
        Err(Failure::new(FailureKind::Timeout, "handshake rejected"))
    });
    println!(
        "  mismatching message propagated immediately: {}",
        propagated.is_err()
    );
}

// ==================== Hooks ====================

/// Example 5: Observing retries
///
/// The hook runs between attempts with the retry number and the
/// failure that caused it.
fn example_retry_hook() {
    println!("\n=== Example 5: Observing Retries ===");

    let policy = RetryPolicy::for_kinds(FailureKind::Network)
        .with_max_attempts(4)
        .with_on_retry(|attempt: u32, failure: &Failure| {
            println!("  retry {} after: {}", attempt, failure);
            Ok(())
        });

    let mut tries = 0;
    let result = execute(&policy, || {
        tries += 1;
        if tries < 3 {
            Err(Failure::new(FailureKind::ConnectionReset, "peer reset"))
        } else {
            Ok("connected")
        }
    });
    println!("  result: {:?}", result);
}

// ==================== Main ====================

fn main() {
    println!("Retry Basics");
    println!("============");

    example_recovery();
    example_exhaustion();
    example_suppression();
    example_message_filter();
    example_retry_hook();

    println!("\n=== All examples completed successfully! ===");
}
