//! Error types for slotlru.

/// The result type used throughout slotlru.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for cache operations.
///
/// A missing key is never an error; lookups report it through `Option` or a
/// `bool` flag instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An invalid argument was provided when building a cache.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The slot table or its recency list is in an inconsistent state.
    #[error("Data corruption: {0}")]
    Corruption(String),
}

impl Error {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Creates a new corruption error.
    pub fn corruption(msg: impl Into<String>) -> Self {
        Error::Corruption(msg.into())
    }
}
