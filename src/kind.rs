//! Failure-kind taxonomy and the ordered kind sets policies match against.
//!
//! Retry decisions never compare error strings or type names; they compare
//! [`FailureKind`] tags through an explicit subsumption relation:
//!
//! ```text
//! Any
//! ├── Network
//! │   ├── Timeout
//! │   ├── ConnectionRefused
//! │   ├── ConnectionReset
//! │   ├── UnexpectedEof
//! │   └── InvalidInput
//! ├── Database
//! │   ├── LostConnection
//! │   └── Deadlock
//! └── Other
//! ```
//!
//! `Any` sits at the root and subsumes every kind, the category kinds
//! (`Network`, `Database`) subsume their leaves, and leaves subsume only
//! themselves.

/// Identifies a category of failure for retry matching.
///
/// Kinds form a small hierarchy with [`FailureKind::Any`] at the root. A
/// policy entry matches a raised failure when the entry's kind
/// [`subsumes`](FailureKind::subsumes) the failure's kind.
///
/// # Examples
///
/// ```rust
/// use steadfast::FailureKind;
///
/// assert!(FailureKind::Any.subsumes(FailureKind::Deadlock));
/// assert!(FailureKind::Network.subsumes(FailureKind::Timeout));
/// assert!(!FailureKind::Timeout.subsumes(FailureKind::Network));
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The broadest kind; matches every failure.
    Any,
    /// Any network-level failure.
    Network,
    /// The peer did not respond in time.
    Timeout,
    /// The peer actively refused the connection.
    ConnectionRefused,
    /// The connection was dropped mid-exchange.
    ConnectionReset,
    /// The stream ended before the expected data arrived.
    UnexpectedEof,
    /// A parameter was rejected before the operation could run.
    InvalidInput,
    /// Any database-level failure.
    Database,
    /// The database session went away between statements.
    LostConnection,
    /// The statement lost a deadlock race and was rolled back.
    Deadlock,
    /// A failure outside the modeled categories.
    Other,
}

impl FailureKind {
    /// The kind that categorizes this one. `Any` is the root and has none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use steadfast::FailureKind;
    ///
    /// assert_eq!(FailureKind::Timeout.parent(), Some(FailureKind::Network));
    /// assert_eq!(FailureKind::Network.parent(), Some(FailureKind::Any));
    /// assert_eq!(FailureKind::Any.parent(), None);
    /// ```
    pub fn parent(self) -> Option<FailureKind> {
        match self {
            FailureKind::Any => None,
            FailureKind::Network | FailureKind::Database | FailureKind::Other => {
                Some(FailureKind::Any)
            }
            FailureKind::Timeout
            | FailureKind::ConnectionRefused
            | FailureKind::ConnectionReset
            | FailureKind::UnexpectedEof
            | FailureKind::InvalidInput => Some(FailureKind::Network),
            FailureKind::LostConnection | FailureKind::Deadlock => Some(FailureKind::Database),
        }
    }

    /// Whether this kind equals `other` or categorizes it, directly or
    /// transitively.
    ///
    /// This is the "is-a-or-subsumes" relation policies match with: a
    /// policy listing `Network` retries a `Timeout` failure, but a policy
    /// listing `Timeout` does not retry a bare `Network` failure.
    pub fn subsumes(self, other: FailureKind) -> bool {
        let mut cursor = Some(other);
        while let Some(kind) = cursor {
            if kind == self {
                return true;
            }
            cursor = kind.parent();
        }
        false
    }
}

/// An ordered, non-empty sequence of failure kinds.
///
/// The order matters in exactly one place: [`primary`](KindSet::primary),
/// the first entry, keys the strategy registry's memo (see
/// [`Registry::get_or_build`](crate::Registry::get_or_build)). Matching
/// itself treats the entries uniformly.
///
/// Conversions from possibly-empty collections sanitize an empty input to
/// the singleton `[Any]`: a policy with no stated kinds retries on any
/// failure.
///
/// # Examples
///
/// ```rust
/// use steadfast::{FailureKind, KindSet};
///
/// let kinds = KindSet::new(FailureKind::Timeout, vec![FailureKind::ConnectionReset]);
/// assert_eq!(kinds.primary(), FailureKind::Timeout);
/// assert!(kinds.qualifies(FailureKind::ConnectionReset));
/// assert!(!kinds.qualifies(FailureKind::Deadlock));
///
/// // Empty input defaults to the broadest kind.
/// let broad = KindSet::from(vec![]);
/// assert_eq!(broad.primary(), FailureKind::Any);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSet {
    head: FailureKind,
    tail: Vec<FailureKind>,
}

impl KindSet {
    /// Create a kind set with a first entry and the remaining entries.
    pub fn new(head: FailureKind, tail: Vec<FailureKind>) -> Self {
        Self { head, tail }
    }

    /// Create a kind set from a single kind.
    pub fn singleton(kind: FailureKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// The broadest set: `[Any]`.
    pub fn any() -> Self {
        Self::singleton(FailureKind::Any)
    }

    /// The first entry. This is the key the strategy registry caches
    /// policies under.
    pub fn primary(&self) -> FailureKind {
        self.head
    }

    /// The number of entries. Always >= 1.
    pub fn len(&self) -> usize {
        1 + self.tail.len()
    }

    /// Always `false`; a `KindSet` is guaranteed non-empty.
    ///
    /// This method exists to satisfy clippy's `len_without_is_empty` lint.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the entries in order, starting with the primary kind.
    pub fn iter(&self) -> impl Iterator<Item = FailureKind> + '_ {
        std::iter::once(self.head).chain(self.tail.iter().copied())
    }

    /// Exact membership, ignoring subsumption.
    pub fn contains(&self, kind: FailureKind) -> bool {
        self.head == kind || self.tail.contains(&kind)
    }

    /// Whether a failure of the given kind qualifies for retry under this
    /// set: true when any entry [`subsumes`](FailureKind::subsumes) it.
    pub fn qualifies(&self, kind: FailureKind) -> bool {
        self.iter().any(|entry| entry.subsumes(kind))
    }
}

impl From<FailureKind> for KindSet {
    fn from(kind: FailureKind) -> Self {
        Self::singleton(kind)
    }
}

impl From<Vec<FailureKind>> for KindSet {
    fn from(kinds: Vec<FailureKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<&[FailureKind]> for KindSet {
    fn from(kinds: &[FailureKind]) -> Self {
        kinds.iter().copied().collect()
    }
}

impl<const N: usize> From<[FailureKind; N]> for KindSet {
    fn from(kinds: [FailureKind; N]) -> Self {
        kinds.into_iter().collect()
    }
}

impl FromIterator<FailureKind> for KindSet {
    /// Collects kinds in order; an empty iterator yields `[Any]`.
    fn from_iter<I: IntoIterator<Item = FailureKind>>(iter: I) -> Self {
        let mut kinds = iter.into_iter();
        match kinds.next() {
            Some(head) => Self::new(head, kinds.collect()),
            None => Self::any(),
        }
    }
}
