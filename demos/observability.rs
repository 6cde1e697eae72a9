//! Demonstrates tracing integration with retry execution
//!
//! Run with: cargo run --example observability --features tracing

use std::time::Duration;

use steadfast::{execute, strategies, Failure, FailureKind, Registry, RetryPolicy};

fn main() {
    // Set up tracing subscriber
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    tracing::info!("starting observability demo");

    // Each retry decision emits a debug event; exhaustion warns.
    let policy = RetryPolicy::for_kinds(FailureKind::Network)
        .with_max_attempts(3)
        .with_on_retry(strategies::linear_backoff(Duration::from_millis(25)));

    let mut reads = 0;
    let recovered = execute(&policy, || {
        reads += 1;
        if reads < 3 {
            Err(Failure::new(FailureKind::ConnectionReset, "peer reset"))
        } else {
            Ok("payload")
        }
    });
    tracing::info!(?recovered, "flaky read finished");

    // Exhaustion: watch for the warning event.
    let exhausted: Result<_, Failure> = execute(&policy, || {
        Err::<(), _>(Failure::new(FailureKind::Timeout, "read timed out"))
    });
    tracing::info!(gave_up = exhausted.is_err(), "stubborn read finished");

    // Registry operations log registrations and cache fills.
    let registry: Registry<Failure> = Registry::new();
    strategies::install_defaults(&registry);
    registry.get_or_build(FailureKind::Deadlock, |p| p.with_max_attempts(4));

    tracing::info!("observability demo complete");
}
