//! The session repository: routes session reads and writes to the
//! backends the host configured.
//!
//! It's responsible for:
//! - Holding one shop backend and one user backend
//! - Resolving deferred backend references on use
//! - Falling back to [`NullUserBackend`] when no user backend is set
//! - Passing every call through without touching arguments or results
//!
//! # Concurrency note
//!
//! There is no locking in here. Assignment needs `&mut self` and the
//! delegation methods need `&self`, so a backend can't be swapped while a
//! call is borrowing the repository. Configure it once at startup, then
//! share it behind an `Arc`.

use std::sync::Arc;

use crate::{
    AssociatedUser, BackendError, BackendRef, BackendRole, ConfigurationError, NullUserBackend,
    RepositoryError, Session, ShopBackend, ShopBackendRef, UserBackend, UserBackendRef,
};

/// Routes session storage calls to the configured backends.
///
/// ## Slots
///
/// ```text
///                 set_shop_backend(Some)        set_user_backend(Some)
///   [unconfigured] ─────────────────→ [configured]  (same for user)
///          ↑                               │
///          └──── set_*_backend(None) ──────┘
///                     or reset()
/// ```
///
/// A new assignment always replaces the previous backend; calls never
/// fan out to more than one backend per role.
pub struct SessionRepository {
    /// Mandatory. Delegation fails with a configuration error while empty.
    shop_backend: Option<ShopBackendRef>,

    /// Optional. Empty means [`NullUserBackend`].
    user_backend: Option<UserBackendRef>,

    /// The stand-in handed out while `user_backend` is empty.
    null_user_backend: Arc<dyn UserBackend>,
}

impl SessionRepository {
    /// Creates a repository with both slots empty.
    pub fn new() -> Self {
        Self {
            shop_backend: None,
            user_backend: None,
            null_user_backend: Arc::new(NullUserBackend),
        }
    }

    /// Creates a builder.
    pub fn builder() -> SessionRepositoryBuilder {
        SessionRepositoryBuilder::new()
    }

    // =====================================================================
    // Assignment
    // =====================================================================

    /// Replaces the shop backend. `None` clears the slot.
    ///
    /// Deferred references are stored as-is; their resolver first runs on
    /// the next delegated call.
    pub fn set_shop_backend(&mut self, backend: Option<ShopBackendRef>) {
        log_assignment(BackendRole::Shop, backend.as_ref());
        self.shop_backend = backend;
    }

    /// Replaces the user backend. `None` restores the null backend.
    pub fn set_user_backend(&mut self, backend: Option<UserBackendRef>) {
        log_assignment(BackendRole::User, backend.as_ref());
        self.user_backend = backend;
    }

    /// Clears both slots, as if the repository had just been created.
    pub fn reset(&mut self) {
        self.shop_backend = None;
        self.user_backend = None;
        tracing::debug!("session repository reset");
    }

    /// Returns `true` if a shop backend (live or deferred) is assigned.
    pub fn is_shop_backend_configured(&self) -> bool {
        self.shop_backend.is_some()
    }

    /// Returns `true` if a user backend (live or deferred) is assigned.
    pub fn is_user_backend_configured(&self) -> bool {
        self.user_backend.is_some()
    }

    // =====================================================================
    // Resolution
    // =====================================================================

    /// Returns the shop backend calls are routed to right now.
    ///
    /// # Errors
    /// - [`ConfigurationError::NotConfigured`] if no shop backend is set
    /// - [`RepositoryError::Resolve`] if a deferred resolver fails
    pub fn shop_backend(&self) -> Result<Arc<dyn ShopBackend>, RepositoryError> {
        let reference = self
            .shop_backend
            .as_ref()
            .ok_or(ConfigurationError::NotConfigured(BackendRole::Shop))?;
        resolve(BackendRole::Shop, reference)
    }

    /// Returns the user backend calls are routed to right now.
    ///
    /// Never fails for an empty slot: that yields [`NullUserBackend`].
    ///
    /// # Errors
    /// - [`RepositoryError::Resolve`] if a deferred resolver fails
    pub fn user_backend(&self) -> Result<Arc<dyn UserBackend>, RepositoryError> {
        match &self.user_backend {
            Some(reference) => resolve(BackendRole::User, reference),
            None => Ok(Arc::clone(&self.null_user_backend)),
        }
    }

    // =====================================================================
    // Delegation
    // =====================================================================

    /// Looks up a shop session by id.
    pub async fn retrieve_shop_session(&self, id: &str) -> Result<Option<Session>, RepositoryError> {
        tracing::trace!(role = %BackendRole::Shop, op = "retrieve", id, "delegating");
        let backend = self.shop_backend()?;
        backend.retrieve(id).await.map_err(RepositoryError::Backend)
    }

    /// Looks up a user session by id.
    pub async fn retrieve_user_session(&self, id: &str) -> Result<Option<Session>, RepositoryError> {
        tracing::trace!(role = %BackendRole::User, op = "retrieve", id, "delegating");
        let backend = self.user_backend()?;
        backend.retrieve(id).await.map_err(RepositoryError::Backend)
    }

    /// Looks up a shop session by the shop's permanent domain.
    pub async fn retrieve_shop_session_by_domain(
        &self,
        domain: &str,
    ) -> Result<Option<Session>, RepositoryError> {
        tracing::trace!(role = %BackendRole::Shop, op = "retrieve_by_domain", domain, "delegating");
        let backend = self.shop_backend()?;
        backend
            .retrieve_by_domain(domain)
            .await
            .map_err(RepositoryError::Backend)
    }

    /// Looks up a user session by the platform user id.
    pub async fn retrieve_user_session_by_external_id(
        &self,
        user_id: u64,
    ) -> Result<Option<Session>, RepositoryError> {
        tracing::trace!(
            role = %BackendRole::User,
            op = "retrieve_by_external_user_id",
            user_id,
            "delegating"
        );
        let backend = self.user_backend()?;
        backend
            .retrieve_by_external_user_id(user_id)
            .await
            .map_err(RepositoryError::Backend)
    }

    /// Stores a shop session.
    pub async fn store_shop_session(&self, session: &Session) -> Result<(), RepositoryError> {
        tracing::trace!(role = %BackendRole::Shop, op = "store", id = %session.id, "delegating");
        let backend = self.shop_backend()?;
        backend.store(session).await.map_err(RepositoryError::Backend)
    }

    /// Stores a user session issued for `user`.
    pub async fn store_user_session(
        &self,
        session: &Session,
        user: &AssociatedUser,
    ) -> Result<(), RepositoryError> {
        tracing::trace!(
            role = %BackendRole::User,
            op = "store",
            id = %session.id,
            user_id = user.id,
            "delegating"
        );
        let backend = self.user_backend()?;
        backend
            .store(session, user)
            .await
            .map_err(RepositoryError::Backend)
    }
}

impl Default for SessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRepository")
            .field("shop_backend", &self.shop_backend)
            .field("user_backend", &self.user_backend)
            .finish_non_exhaustive()
    }
}

fn resolve<B: ?Sized>(role: BackendRole, reference: &BackendRef<B>) -> Result<Arc<B>, RepositoryError> {
    reference.resolve().map_err(|err| {
        tracing::warn!(%role, error = %err, "deferred backend failed to resolve");
        RepositoryError::Resolve(err)
    })
}

fn log_assignment<B: ?Sized>(role: BackendRole, backend: Option<&BackendRef<B>>) {
    match backend {
        Some(reference) if reference.is_deferred() => {
            tracing::debug!(%role, "deferred backend assigned");
        }
        Some(_) => tracing::debug!(%role, "backend assigned"),
        None => tracing::debug!(%role, "backend cleared"),
    }
}

// ---------------------------------------------------------------------------
// SessionRepositoryBuilder
// ---------------------------------------------------------------------------

/// Builder for a [`SessionRepository`].
///
/// # Example
///
/// ```rust,ignore
/// let repository = SessionRepository::builder()
///     .shop_backend(PostgresShops::new(pool.clone()))
///     .deferred_user_backend(|| registry.user_sessions())
///     .build();
/// ```
#[derive(Default)]
pub struct SessionRepositoryBuilder {
    shop_backend: Option<ShopBackendRef>,
    user_backend: Option<UserBackendRef>,
}

impl SessionRepositoryBuilder {
    /// Creates a builder with no backends.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shop backend.
    pub fn shop_backend<T: ShopBackend + 'static>(mut self, backend: T) -> Self {
        self.shop_backend = Some(ShopBackendRef::new(backend));
        self
    }

    /// Sets a shop backend that is looked up on every call.
    pub fn deferred_shop_backend<F>(mut self, resolver: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn ShopBackend>, BackendError> + Send + Sync + 'static,
    {
        self.shop_backend = Some(ShopBackendRef::deferred(resolver));
        self
    }

    /// Sets the user backend.
    pub fn user_backend<T: UserBackend + 'static>(mut self, backend: T) -> Self {
        self.user_backend = Some(UserBackendRef::new(backend));
        self
    }

    /// Sets a user backend that is looked up on every call.
    pub fn deferred_user_backend<F>(mut self, resolver: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn UserBackend>, BackendError> + Send + Sync + 'static,
    {
        self.user_backend = Some(UserBackendRef::deferred(resolver));
        self
    }

    /// Builds the repository.
    pub fn build(self) -> SessionRepository {
        let mut repository = SessionRepository::new();
        repository.set_shop_backend(self.shop_backend);
        repository.set_user_backend(self.user_backend);
        repository
    }
}

impl std::fmt::Debug for SessionRepositoryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRepositoryBuilder")
            .field("shop_backend", &self.shop_backend)
            .field("user_backend", &self.user_backend)
            .finish()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionRepository`.
    //!
    //! Naming convention: `test_{function}_{scenario}_{expected}`.
    //! End-to-end scenarios with real in-memory backends live in
    //! `tests/repository.rs`.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    // -- Helpers ----------------------------------------------------------

    /// Shop backend that records which ids it was asked for and always
    /// answers with a session tagged by `name`.
    struct Echo {
        name: &'static str,
        seen: Mutex<Vec<String>>,
    }

    impl Echo {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ShopBackend for Echo {
        async fn store(&self, session: &Session) -> Result<(), BackendError> {
            self.seen.lock().unwrap().push(session.id.clone());
            Ok(())
        }

        async fn retrieve(&self, id: &str) -> Result<Option<Session>, BackendError> {
            self.seen.lock().unwrap().push(id.to_string());
            Ok(Some(Session::offline(self.name, id)))
        }

        async fn retrieve_by_domain(&self, domain: &str) -> Result<Option<Session>, BackendError> {
            self.seen.lock().unwrap().push(domain.to_string());
            Ok(Some(Session::offline(domain, self.name)))
        }
    }

    fn user() -> AssociatedUser {
        AssociatedUser {
            id: 9,
            email: "kim@acme.test".into(),
            first_name: "Kim".into(),
            last_name: "Lee".into(),
            account_owner: false,
            locale: "ko".into(),
        }
    }

    // =====================================================================
    // shop_backend()
    // =====================================================================

    #[test]
    fn test_shop_backend_unconfigured_returns_configuration_error() {
        let repo = SessionRepository::new();

        let result = repo.shop_backend();

        assert!(
            matches!(
                result,
                Err(RepositoryError::Configuration(ConfigurationError::NotConfigured(
                    BackendRole::Shop
                )))
            ),
            "empty shop slot must be a configuration error"
        );
    }

    #[test]
    fn test_shop_backend_after_clear_returns_configuration_error() {
        let mut repo = SessionRepository::new();
        repo.set_shop_backend(Some(ShopBackendRef::new(Echo::new("a"))));
        repo.set_shop_backend(None);

        assert!(!repo.is_shop_backend_configured());
        assert!(repo.shop_backend().err().is_some_and(|e| e.is_configuration()));
    }

    // =====================================================================
    // user_backend()
    // =====================================================================

    #[tokio::test]
    async fn test_user_backend_unconfigured_falls_back_to_null() {
        let repo = SessionRepository::new();

        let backend = repo.user_backend().expect("null backend");

        assert!(backend.retrieve("anything").await.unwrap().is_none());
        assert!(!repo.is_user_backend_configured());
    }

    #[test]
    fn test_user_backend_deferred_failure_is_resolve_error() {
        let mut repo = SessionRepository::new();
        repo.set_user_backend(Some(UserBackendRef::deferred(|| Err("not yet".into()))));

        let err = repo.user_backend().err().expect("resolver fails");

        assert!(matches!(err, RepositoryError::Resolve(_)));
        assert_eq!(err.to_string(), "not yet");
    }

    // =====================================================================
    // set_shop_backend()
    // =====================================================================

    #[tokio::test]
    async fn test_set_shop_backend_twice_routes_to_second_only() {
        let first = Arc::new(Echo::new("first"));
        let second = Arc::new(Echo::new("second"));
        let mut repo = SessionRepository::new();

        repo.set_shop_backend(Some(ShopBackendRef::from_arc(first.clone())));
        repo.set_shop_backend(Some(ShopBackendRef::from_arc(second.clone())));
        let found = repo.retrieve_shop_session("s1").await.unwrap().unwrap();

        assert_eq!(found.shop, "second");
        assert!(first.seen.lock().unwrap().is_empty(), "no fan-out");
        assert_eq!(*second.seen.lock().unwrap(), vec!["s1".to_string()]);
    }

    // =====================================================================
    // reset()
    // =====================================================================

    #[test]
    fn test_reset_clears_both_slots() {
        let mut repo = SessionRepository::builder()
            .shop_backend(Echo::new("a"))
            .user_backend(NullUserBackend)
            .build();
        assert!(repo.is_shop_backend_configured());
        assert!(repo.is_user_backend_configured());

        repo.reset();

        assert!(!repo.is_shop_backend_configured());
        assert!(!repo.is_user_backend_configured());
    }

    // =====================================================================
    // Delegation
    // =====================================================================

    #[tokio::test]
    async fn test_retrieve_shop_session_by_domain_forwards_domain() {
        let echo = Arc::new(Echo::new("echo"));
        let repo = SessionRepository::builder()
            .deferred_shop_backend({
                let echo = echo.clone();
                move || Ok(echo.clone() as Arc<dyn ShopBackend>)
            })
            .build();

        let found = repo
            .retrieve_shop_session_by_domain("acme.myshopify.com")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.shop, "acme.myshopify.com");
        assert_eq!(*echo.seen.lock().unwrap(), vec!["acme.myshopify.com".to_string()]);
    }

    #[tokio::test]
    async fn test_store_shop_session_unconfigured_returns_configuration_error() {
        let repo = SessionRepository::new();
        let session = Session::offline("acme.myshopify.com", "shpat_1");

        let result = repo.store_shop_session(&session).await;

        assert!(result.err().is_some_and(|e| e.is_configuration()));
    }

    #[tokio::test]
    async fn test_user_delegation_with_null_backend_degrades_quietly() {
        let repo = SessionRepository::new();
        let session = Session::offline("acme.myshopify.com", "shpat_1");

        repo.store_user_session(&session, &user()).await.unwrap();

        assert!(repo.retrieve_user_session(&session.id).await.unwrap().is_none());
        assert!(
            repo.retrieve_user_session_by_external_id(user().id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_debug_shows_slot_kinds() {
        let repo = SessionRepository::builder()
            .deferred_shop_backend(|| Err("later".into()))
            .build();

        let debug = format!("{repo:?}");

        assert!(debug.contains("BackendRef::Deferred(..)"));
        assert!(debug.contains("user_backend: None"));
    }

    #[test]
    fn test_builder_debug_shows_slot_kinds() {
        let builder = SessionRepository::builder()
            .shop_backend(Echo::new("a"))
            .deferred_user_backend(|| Err("later".into()));

        let debug = format!("{builder:?}");

        assert!(debug.starts_with("SessionRepositoryBuilder"));
        assert!(debug.contains("shop_backend: Some(BackendRef::Live(..))"));
        assert!(debug.contains("user_backend: Some(BackendRef::Deferred(..))"));
    }
}
