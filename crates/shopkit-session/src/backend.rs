//! Storage hooks the host application implements.
//!
//! Shopkit doesn't persist sessions itself. That's the host's job (or
//! its database's: Postgres, Redis, DynamoDB, a plain file, ...). The
//! repository only routes calls to one of two traits:
//!
//! - [`ShopBackend`] — offline sessions, one per installed shop
//! - [`UserBackend`] — online sessions, one per staff member
//!
//! The trait *is* the interface check. A type that forgets one of the
//! required operations simply doesn't implement the trait, so it can't be
//! registered:
//!
//! ```rust,compile_fail,E0046
//! use shopkit_session::{async_trait, BackendError, Session, ShopBackend};
//!
//! struct HalfDone;
//!
//! #[async_trait]
//! impl ShopBackend for HalfDone {
//!     async fn store(&self, _session: &Session) -> Result<(), BackendError> {
//!         Ok(())
//!     }
//!
//!     async fn retrieve(&self, _id: &str) -> Result<Option<Session>, BackendError> {
//!         Ok(None)
//!     }
//!     // missing: retrieve_by_domain
//! }
//! ```
//!
//! Same for the user role:
//!
//! ```rust,compile_fail,E0046
//! use shopkit_session::{async_trait, AssociatedUser, BackendError, Session, UserBackend};
//!
//! struct NoLookup;
//!
//! #[async_trait]
//! impl UserBackend for NoLookup {
//!     async fn store(
//!         &self,
//!         _session: &Session,
//!         _user: &AssociatedUser,
//!     ) -> Result<(), BackendError> {
//!         Ok(())
//!     }
//!
//!     async fn retrieve(&self, _id: &str) -> Result<Option<Session>, BackendError> {
//!         Ok(None)
//!     }
//!     // missing: retrieve_by_external_user_id
//! }
//! ```

use async_trait::async_trait;

use crate::{AssociatedUser, BackendError, Session};

/// Persists offline sessions, keyed by id and by shop domain.
///
/// # Trait bounds
///
/// - `Send + Sync` → one backend is shared by every request task.
/// - `#[async_trait]` → methods are object safe, so different backend
///   types can sit behind the same `Arc<dyn ShopBackend>` slot.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// use shopkit_session::{async_trait, BackendError, Session, ShopBackend};
///
/// /// Keeps sessions in memory. Handy in development, lost on restart.
/// #[derive(Default)]
/// struct MemoryShops {
///     sessions: Mutex<HashMap<String, Session>>,
/// }
///
/// #[async_trait]
/// impl ShopBackend for MemoryShops {
///     async fn store(&self, session: &Session) -> Result<(), BackendError> {
///         let mut sessions = self.sessions.lock().map_err(|e| e.to_string())?;
///         sessions.insert(session.id.clone(), session.clone());
///         Ok(())
///     }
///
///     async fn retrieve(&self, id: &str) -> Result<Option<Session>, BackendError> {
///         let sessions = self.sessions.lock().map_err(|e| e.to_string())?;
///         Ok(sessions.get(id).cloned())
///     }
///
///     async fn retrieve_by_domain(
///         &self,
///         domain: &str,
///     ) -> Result<Option<Session>, BackendError> {
///         let sessions = self.sessions.lock().map_err(|e| e.to_string())?;
///         Ok(sessions.values().find(|s| s.shop == domain).cloned())
///     }
/// }
/// ```
#[async_trait]
pub trait ShopBackend: Send + Sync {
    /// Saves (or overwrites) a shop session.
    async fn store(&self, session: &Session) -> Result<(), BackendError>;

    /// Looks a session up by its id.
    ///
    /// # Returns
    /// - `Ok(Some(session))` — found
    /// - `Ok(None)` — no session with that id
    /// - `Err(_)` — the backend itself failed
    async fn retrieve(&self, id: &str) -> Result<Option<Session>, BackendError>;

    /// Looks a session up by the shop's permanent domain
    /// (`acme.myshopify.com`).
    async fn retrieve_by_domain(&self, domain: &str) -> Result<Option<Session>, BackendError>;
}

/// Persists online sessions, keyed by id and by the platform user id.
#[async_trait]
pub trait UserBackend: Send + Sync {
    /// Saves (or overwrites) a session issued for `user`.
    async fn store(&self, session: &Session, user: &AssociatedUser) -> Result<(), BackendError>;

    /// Looks a session up by its id.
    async fn retrieve(&self, id: &str) -> Result<Option<Session>, BackendError>;

    /// Looks a session up by the user's id on the platform.
    async fn retrieve_by_external_user_id(
        &self,
        user_id: u64,
    ) -> Result<Option<Session>, BackendError>;
}

/// The user backend used when the host configured none.
///
/// Stores nothing and finds nothing, so apps that only use offline
/// tokens never have to think about user sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullUserBackend;

#[async_trait]
impl UserBackend for NullUserBackend {
    async fn store(&self, _session: &Session, _user: &AssociatedUser) -> Result<(), BackendError> {
        Ok(())
    }

    async fn retrieve(&self, _id: &str) -> Result<Option<Session>, BackendError> {
        Ok(None)
    }

    async fn retrieve_by_external_user_id(
        &self,
        _user_id: u64,
    ) -> Result<Option<Session>, BackendError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AssociatedUser {
        AssociatedUser {
            id: 7,
            email: "grace@acme.test".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            account_owner: false,
            locale: "en".into(),
        }
    }

    #[tokio::test]
    async fn test_null_user_backend_store_is_noop() {
        let backend = NullUserBackend;
        let session = Session::offline("acme.myshopify.com", "shpat_1");

        backend.store(&session, &user()).await.expect("store never fails");

        // Nothing was kept.
        assert!(backend.retrieve(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_null_user_backend_finds_nothing() {
        let backend = NullUserBackend;

        assert!(backend.retrieve("any").await.unwrap().is_none());
        assert!(backend.retrieve_by_external_user_id(7).await.unwrap().is_none());
    }
}
