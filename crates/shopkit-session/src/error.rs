//! Error types for the session repository.

use std::fmt;

/// Error type backends and deferred resolvers return.
///
/// Boxed so hosts can bubble up their own error types (database, Redis,
/// HTTP, ...) and later recover them with
/// [`downcast_ref`](std::error::Error::downcast_ref).
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which slot of the repository an error or log event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendRole {
    /// Stores offline, shop-wide sessions. Mandatory.
    Shop,
    /// Stores online, per-user sessions. Optional.
    User,
}

impl fmt::Display for BackendRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shop => write!(f, "shop"),
            Self::User => write!(f, "user"),
        }
    }
}

/// The repository was used in a way its configuration doesn't allow.
///
/// This is a startup mistake, not a runtime failure of some backend, so
/// it is kept apart from the errors backends return.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// A mandatory backend was never assigned (or was cleared) before use.
    /// Only the shop role is mandatory; an empty user slot falls back to
    /// [`NullUserBackend`](crate::NullUserBackend).
    #[error("{0} backend is not configured")]
    NotConfigured(BackendRole),
}

/// Errors returned by [`SessionRepository`](crate::SessionRepository).
///
/// The `Resolve` and `Backend` variants carry the host's error untouched;
/// the repository never rewrites or wraps its message.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The repository is misconfigured.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A deferred backend reference failed to produce a backend.
    #[error(transparent)]
    Resolve(BackendError),

    /// The configured backend itself failed.
    #[error(transparent)]
    Backend(BackendError),
}

impl RepositoryError {
    /// Returns `true` for misconfiguration, as opposed to a failure that
    /// came out of host code.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns the host error for `Resolve` and `Backend` failures.
    pub fn backend_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Configuration(_) => None,
            Self::Resolve(err) | Self::Backend(err) => Some(&**err),
        }
    }
}
