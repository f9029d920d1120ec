//! Backend references: a live backend, or a recipe for getting one later.
//!
//! Hosts often wire the repository up before the backend can exist (the
//! database pool is opened later in `main`, or the backend lives in a
//! plugin that registers itself afterwards). A deferred reference stores a
//! resolver closure instead of the backend and calls it on every use, so
//! whatever the closure returns *now* is what gets the call.

use std::fmt;
use std::sync::Arc;

use crate::{BackendError, ShopBackend, UserBackend};

/// Closure that produces a backend on demand.
pub type Resolver<B> = Arc<dyn Fn() -> Result<Arc<B>, BackendError> + Send + Sync>;

/// A backend slot's content: either the backend itself or a resolver.
///
/// `B` is the trait object for the role, see [`ShopBackendRef`] and
/// [`UserBackendRef`].
pub enum BackendRef<B: ?Sized> {
    /// A backend that already exists.
    Live(Arc<B>),

    /// A backend looked up on every use.
    Deferred(Resolver<B>),
}

/// Reference to a shop backend.
pub type ShopBackendRef = BackendRef<dyn ShopBackend>;

/// Reference to a user backend.
pub type UserBackendRef = BackendRef<dyn UserBackend>;

impl<B: ?Sized> BackendRef<B> {
    /// Wraps an already shared backend.
    pub fn from_arc(backend: Arc<B>) -> Self {
        Self::Live(backend)
    }

    /// Creates a reference that calls `resolver` each time the backend is
    /// needed. Errors from `resolver` reach the caller unchanged.
    pub fn deferred<F>(resolver: F) -> Self
    where
        F: Fn() -> Result<Arc<B>, BackendError> + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(resolver))
    }

    /// Returns `true` if the backend is looked up lazily.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Produces the backend this reference points at.
    ///
    /// Live references hand out another `Arc` to the same backend.
    /// Deferred ones run their resolver; nothing is cached.
    pub fn resolve(&self) -> Result<Arc<B>, BackendError> {
        match self {
            Self::Live(backend) => Ok(Arc::clone(backend)),
            Self::Deferred(resolver) => resolver(),
        }
    }
}

impl ShopBackendRef {
    /// Wraps a concrete shop backend.
    pub fn new<T: ShopBackend + 'static>(backend: T) -> Self {
        Self::Live(Arc::new(backend))
    }
}

impl UserBackendRef {
    /// Wraps a concrete user backend.
    pub fn new<T: UserBackend + 'static>(backend: T) -> Self {
        Self::Live(Arc::new(backend))
    }
}

// Manual impl: `#[derive(Clone)]` would demand `B: Clone`.
impl<B: ?Sized> Clone for BackendRef<B> {
    fn clone(&self) -> Self {
        match self {
            Self::Live(backend) => Self::Live(Arc::clone(backend)),
            Self::Deferred(resolver) => Self::Deferred(Arc::clone(resolver)),
        }
    }
}

impl<B: ?Sized> fmt::Debug for BackendRef<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live(_) => f.write_str("BackendRef::Live(..)"),
            Self::Deferred(_) => f.write_str("BackendRef::Deferred(..)"),
        }
    }
}
