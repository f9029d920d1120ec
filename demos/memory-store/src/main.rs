//! In-memory session storage wired into a Shopkit repository.
//!
//! Run with `RUST_LOG=debug cargo run -p memory-store` to see the
//! repository's assignment and delegation events.
//!
//! The user backend is registered *deferred*: the repository is built
//! before the backend exists, and the first user-session lookup after
//! `USERS.set(..)` finds it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use shopkit::prelude::*;

/// Populated once "the user store finishes booting".
static USERS: OnceLock<Arc<MemoryUsers>> = OnceLock::new();

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryShops {
    sessions: Mutex<HashMap<String, Session>>,
}

#[async_trait]
impl ShopBackend for MemoryShops {
    async fn store(&self, session: &Session) -> Result<(), BackendError> {
        let mut sessions = self.sessions.lock().map_err(|e| e.to_string())?;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn retrieve(&self, id: &str) -> Result<Option<Session>, BackendError> {
        let sessions = self.sessions.lock().map_err(|e| e.to_string())?;
        Ok(sessions.get(id).cloned())
    }

    async fn retrieve_by_domain(&self, domain: &str) -> Result<Option<Session>, BackendError> {
        let sessions = self.sessions.lock().map_err(|e| e.to_string())?;
        Ok(sessions.values().find(|s| s.shop == domain).cloned())
    }
}

#[derive(Default)]
struct MemoryUsers {
    sessions: Mutex<HashMap<u64, Session>>,
}

#[async_trait]
impl UserBackend for MemoryUsers {
    async fn store(&self, session: &Session, user: &AssociatedUser) -> Result<(), BackendError> {
        let mut sessions = self.sessions.lock().map_err(|e| e.to_string())?;
        sessions.insert(user.id, session.clone());
        Ok(())
    }

    async fn retrieve(&self, id: &str) -> Result<Option<Session>, BackendError> {
        let sessions = self.sessions.lock().map_err(|e| e.to_string())?;
        Ok(sessions.values().find(|s| s.id == id).cloned())
    }

    async fn retrieve_by_external_user_id(
        &self,
        user_id: u64,
    ) -> Result<Option<Session>, BackendError> {
        let sessions = self.sessions.lock().map_err(|e| e.to_string())?;
        Ok(sessions.get(&user_id).cloned())
    }
}

fn user_backend() -> Result<Arc<dyn UserBackend>, BackendError> {
    let users = USERS.get().ok_or("user store is still booting")?;
    Ok(users.clone())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), ShopkitError> {
    shopkit::logging::init()?;

    let repository = SessionRepository::builder()
        .shop_backend(MemoryShops::default())
        .deferred_user_backend(user_backend)
        .build();

    // OAuth callback for an offline token.
    let offline = Session::offline("acme.myshopify.com", "shpat_demo");
    repository.store_shop_session(&offline).await?;

    let found = repository
        .retrieve_shop_session_by_domain("acme.myshopify.com")
        .await?;
    tracing::info!(found = ?found.map(|s| s.id), "shop session lookup");

    // The user store isn't up yet: the resolver's error comes back as-is.
    if let Err(e) = repository.retrieve_user_session_by_external_id(42).await {
        tracing::warn!(error = %e, "user sessions unavailable");
    }

    if USERS.set(Arc::new(MemoryUsers::default())).is_err() {
        tracing::error!("user store registered twice");
    }

    let staff = AssociatedUser {
        id: 42,
        email: "owner@acme.test".into(),
        first_name: "Ada".into(),
        last_name: "Owner".into(),
        account_owner: true,
        locale: "en".into(),
    };
    let mut online = Session::offline("acme.myshopify.com", "shpua_demo");
    online.id = format!("acme.myshopify.com_{}", staff.id);
    online.associated_user = Some(staff.clone());
    repository.store_user_session(&online, &staff).await?;

    let found = repository.retrieve_user_session_by_external_id(42).await?;
    tracing::info!(found = ?found.map(|s| s.id), "user session lookup");

    Ok(())
}
