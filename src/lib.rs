//! # Steadfast
//!
//! > *"Constant dripping wears away the stone"*
//!
//! A Rust library for declarative retries over classified failures.
//!
//! ## Philosophy
//!
//! **Steadfast** keeps retry behavior out of the operations it protects:
//! - **Stead** = Policies stay in place (immutable, shareable data)
//! - **Fast** = Held firmly (one explicit executor, no ambient state)
//!
//! ## Quick Example
//!
//! ```rust
//! use steadfast::{execute, Failure, FailureKind, Outcome, RetryPolicy};
//!
//! // Retry timeouts up to five attempts in total.
//! let policy = RetryPolicy::for_kinds(FailureKind::Timeout).with_max_attempts(5);
//!
//! let mut attempts = 0;
//! let result = execute(&policy, || {
//!     attempts += 1;
//!     if attempts < 3 {
//!         Err(Failure::new(FailureKind::Timeout, "read timed out"))
//!     } else {
//!         Ok("fresh data")
//!     }
//! });
//!
//! match result {
//!     Ok(Outcome::Completed(value)) => println!("recovered: {}", value),
//!     Ok(Outcome::Suppressed) => println!("budget spent, failure suppressed"),
//!     Err(failure) => println!("gave up: {}", failure),
//! }
//! ```
//!
//! For more examples, see the [demos](https://github.com/iepathos/steadfast/tree/master/demos) directory.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod executor;
pub mod failure;
pub mod kind;
pub mod policy;
pub mod registry;
pub mod strategies;
pub mod testing;

// Re-exports
pub use executor::{execute, wrap, Outcome};
pub use failure::{Classify, Failure};
pub use kind::{FailureKind, KindSet};
pub use policy::{RetryHook, RetryPolicy};
pub use registry::Registry;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::executor::{execute, wrap, Outcome};
    pub use crate::failure::{Classify, Failure};
    pub use crate::kind::{FailureKind, KindSet};
    pub use crate::policy::{RetryHook, RetryPolicy};
    pub use crate::registry::Registry;
}
