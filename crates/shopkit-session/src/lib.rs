//! Session storage plumbing for Shopkit.
//!
//! An embedded app needs somewhere to keep the OAuth sessions shops grant
//! it. This crate doesn't decide where; it routes calls to backends the
//! host application provides:
//!
//! 1. **Backends** — the host implements [`ShopBackend`] (mandatory) and,
//!    for online tokens, [`UserBackend`]
//! 2. **References** — a backend is registered live or deferred
//!    ([`BackendRef`]), so it can be wired up before it exists
//! 3. **Repository** — [`SessionRepository`] resolves the current backend
//!    and forwards every store/retrieve call to it, unchanged
//!
//! # How it fits in the stack
//!
//! ```text
//! OAuth callback / request auth (above)  ← stores and loads sessions
//!     ↕
//! Session repository (this crate)        ← picks the backend, forwards
//!     ↕
//! Host backends (below)                  ← Postgres, Redis, memory, ...
//! ```

mod backend;
mod error;
mod reference;
mod repository;
mod session;

pub use async_trait::async_trait;
pub use backend::{NullUserBackend, ShopBackend, UserBackend};
pub use error::{BackendError, BackendRole, ConfigurationError, RepositoryError};
pub use reference::{BackendRef, Resolver, ShopBackendRef, UserBackendRef};
pub use repository::{SessionRepository, SessionRepositoryBuilder};
pub use session::{AssociatedUser, Session};
