//! Strategy Registry Example
//!
//! Demonstrates sharing tuned retry policies through a registry.
//! Shows practical patterns including:
//! - Registering and looking up named strategies
//! - The stock network and deadlock presets
//! - Build-once caching keyed by the leading failure kind
//! - Wrapping an operation into a reusable retrying closure
//!
//! Run with: cargo run --example strategies

use std::sync::Arc;
use std::time::Duration;

use steadfast::{execute, strategies, wrap, Failure, FailureKind, Registry, RetryPolicy};

// ==================== Named Strategies ====================

/// Example 1: Curated strategies under well-known names
fn example_named_strategies(registry: &Registry<Failure>) {
    println!("\n=== Example 1: Named Strategies ===");

    registry.register(
        "checkout",
        RetryPolicy::for_kinds(FailureKind::Deadlock)
            .with_max_attempts(5)
            .with_on_retry(strategies::linear_backoff(Duration::from_millis(5))),
    );

    let policy = registry.lookup("checkout").expect("just registered");
    println!(
        "  checkout strategy: {} attempts for {:?}",
        policy.max_attempts(),
        policy.kinds().primary()
    );

    let mut deadlocks_left = 2;
    let result = execute(&policy, || {
        if deadlocks_left > 0 {
            deadlocks_left -= 1;
            Err(Failure::new(FailureKind::Deadlock, "deadlock detected"))
        } else {
            Ok("order committed")
        }
    });
    println!("  result: {:?}", result);
}

/// Example 2: The stock presets
fn example_stock_presets(registry: &Registry<Failure>) {
    println!("\n=== Example 2: Stock Presets ===");

    strategies::install_defaults(registry);

    for name in [strategies::NETWORK_ERRORS, strategies::DEADLOCK] {
        let policy = registry.lookup(name).expect("preset installed");
        println!(
            "  {}: {} attempts across {} kinds",
            name,
            policy.max_attempts(),
            policy.kinds().len()
        );
    }
}

// ==================== Cached Strategies ====================

/// Example 3: Build-once caching by leading kind
///
/// The first caller's configuration sticks; later callers share it.
fn example_kind_cache(registry: &Registry<Failure>) {
    println!("\n=== Example 3: Caching By Leading Kind ===");

    let first = registry.get_or_build(FailureKind::LostConnection, |p| p.with_max_attempts(8));
    let second = registry.get_or_build(FailureKind::LostConnection, |p| p.with_max_attempts(2));

    println!("  first caller asked for 8 attempts, got {}", first.max_attempts());
    println!("  second caller asked for 2 attempts, got {}", second.max_attempts());
    println!("  same shared policy: {}", Arc::ptr_eq(&first, &second));
}

// ==================== Wrapped Operations ====================

/// Example 4: Decorating an operation once, calling it many times
fn example_wrapped_operation() {
    println!("\n=== Example 4: Wrapped Operations ===");

    let policy = Arc::new(
        RetryPolicy::for_kinds(FailureKind::Timeout).with_max_attempts(3),
    );

    let mut flaky_reads = 0;
    let mut read_sensor = wrap(policy, move || {
        flaky_reads += 1;
        if flaky_reads % 2 == 1 {
            Err(Failure::new(FailureKind::Timeout, "sensor timed out"))
        } else {
            Ok(flaky_reads)
        }
    });

    for round in 1..=3 {
        println!("  round {}: {:?}", round, read_sensor());
    }
}

// ==================== Main ====================

fn main() {
    println!("Strategy Registry");
    println!("=================");

    let registry: Registry<Failure> = Registry::new();

    example_named_strategies(&registry);
    example_stock_presets(&registry);
    example_kind_cache(&registry);
    example_wrapped_operation();

    println!("\n=== All examples completed successfully! ===");
}
