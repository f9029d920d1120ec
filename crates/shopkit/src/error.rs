//! Unified error type for the Shopkit framework.

use shopkit_session::{ConfigurationError, RepositoryError};

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `shopkit` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attributes let `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ShopkitError {
    /// A session storage error (misconfiguration, resolver, backend).
    #[error(transparent)]
    Session(#[from] RepositoryError),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl From<ConfigurationError> for ShopkitError {
    fn from(err: ConfigurationError) -> Self {
        Self::Session(err.into())
    }
}

impl ShopkitError {
    /// Returns `true` if the app is misconfigured rather than failing at
    /// runtime. Useful to decide between a 500 page and a crash on boot.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Session(err) if err.is_configuration())
    }
}
