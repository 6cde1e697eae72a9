//! The classification contract between operations and policies.
//!
//! The executor never downcasts or inspects error internals. An error type
//! opts into retry by implementing [`Classify`], reporting which
//! [`FailureKind`] it belongs to; its `Display` rendering doubles as the
//! message a policy's message filter runs against.
//!
//! The crate ships [`Failure`], a ready-made classified error, and
//! implements `Classify` for `std::io::Error` so raw I/O operations retry
//! without an adapter type.

use std::error::Error;
use std::fmt;
use std::io;

use crate::kind::FailureKind;

/// Classifies an error into the failure-kind taxonomy.
///
/// Policies match failures by kind subsumption and, optionally, by message;
/// the message is the error's `Display` rendering.
///
/// # Examples
///
/// ```rust
/// use std::fmt;
/// use steadfast::{Classify, FailureKind};
///
/// #[derive(Debug)]
/// struct StaleRead;
///
/// impl fmt::Display for StaleRead {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "read returned stale data")
///     }
/// }
///
/// impl Classify for StaleRead {
///     fn kind(&self) -> FailureKind {
///         FailureKind::Other
///     }
/// }
/// ```
pub trait Classify: fmt::Display {
    /// The kind this failure belongs to.
    fn kind(&self) -> FailureKind;
}

/// A classified failure: a kind, a message, and an optional source error.
///
/// This is the crate's own error type, for operations that do not already
/// have a classified error of their own. `Display` renders the message
/// alone, so message filters match against exactly what was given to
/// [`Failure::new`].
///
/// # Examples
///
/// ```rust
/// use steadfast::{Classify, Failure, FailureKind};
///
/// let failure = Failure::new(FailureKind::Timeout, "read timed out after 30s");
/// assert_eq!(failure.kind(), FailureKind::Timeout);
/// assert_eq!(failure.to_string(), "read timed out after 30s");
/// ```
#[derive(Debug)]
pub struct Failure {
    kind: FailureKind,
    message: String,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl Failure {
    /// Create a failure with a kind and a message.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error this failure classifies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::error::Error;
    /// use steadfast::{Failure, FailureKind};
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "no response");
    /// let failure = Failure::new(FailureKind::Timeout, "upstream timed out").with_source(io);
    /// assert!(failure.source().is_some());
    /// ```
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The message this failure was created with.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

impl Classify for Failure {
    fn kind(&self) -> FailureKind {
        self.kind
    }
}

/// `std::io::Error` classifies along the network branch of the taxonomy.
///
/// The retryable mapping covers the I/O error kinds that correspond to
/// transient transport conditions; everything else is `Other`, which only
/// `[Any]` policies retry.
impl Classify for io::Error {
    fn kind(&self) -> FailureKind {
        match self.kind() {
            io::ErrorKind::TimedOut => FailureKind::Timeout,
            io::ErrorKind::ConnectionRefused => FailureKind::ConnectionRefused,
            io::ErrorKind::ConnectionReset => FailureKind::ConnectionReset,
            io::ErrorKind::UnexpectedEof => FailureKind::UnexpectedEof,
            io::ErrorKind::InvalidInput => FailureKind::InvalidInput,
            _ => FailureKind::Other,
        }
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[test]
    fn display_renders_the_message_alone() {
        let failure = Failure::new(FailureKind::Deadlock, "deadlock found when trying to get lock");
        assert_eq!(
            format!("{}", failure),
            "deadlock found when trying to get lock"
        );
    }

    #[test]
    fn source_chains_to_the_underlying_error() {
        let io = io::Error::new(io::ErrorKind::ConnectionReset, "peer reset");
        let failure = Failure::new(FailureKind::ConnectionReset, "fetch failed").with_source(io);

        let source = failure.source().expect("source should be present");
        assert_eq!(source.to_string(), "peer reset");
    }

    #[test]
    fn source_is_absent_by_default() {
        let failure = Failure::new(FailureKind::Other, "no cause");
        assert!(failure.source().is_none());
    }

    #[test]
    fn io_errors_classify_along_the_network_branch() {
        let cases = [
            (io::ErrorKind::TimedOut, FailureKind::Timeout),
            (io::ErrorKind::ConnectionRefused, FailureKind::ConnectionRefused),
            (io::ErrorKind::ConnectionReset, FailureKind::ConnectionReset),
            (io::ErrorKind::UnexpectedEof, FailureKind::UnexpectedEof),
            (io::ErrorKind::InvalidInput, FailureKind::InvalidInput),
        ];
        for (io_kind, expected) in cases {
            let error = io::Error::new(io_kind, "boom");
            assert_eq!(Classify::kind(&error), expected);
            assert!(FailureKind::Network.subsumes(Classify::kind(&error)));
        }
    }

    #[test]
    fn unmapped_io_errors_fall_back_to_other() {
        let error = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(Classify::kind(&error), FailureKind::Other);
    }
}
