//! Session types: what the backends persist.
//!
//! The repository never builds or inspects these values. It hands them
//! to whichever backend is configured and returns whatever comes back.
//! A session belongs to exactly one shop and, for online access, to one
//! user of that shop's admin.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An OAuth session granted by a shop.
///
/// Shop (offline) sessions carry no `associated_user`. User (online)
/// sessions carry the staff member the token was issued for, and usually
/// an `expires_at`.
///
/// `Serialize`/`Deserialize` are derived so a backend can store the
/// session in whatever format it likes (JSON column, Redis hash, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Backend-facing identifier, e.g. `offline_acme.myshopify.com`.
    pub id: String,

    /// The shop's permanent domain (`acme.myshopify.com`).
    pub shop: String,

    /// Access token used to call the platform's Admin API.
    pub access_token: String,

    /// Comma-separated scopes granted with the token.
    pub scope: Option<String>,

    /// When the token stops being valid. `None` for offline tokens.
    pub expires_at: Option<SystemTime>,

    /// The staff member an online session was issued for.
    pub associated_user: Option<AssociatedUser>,
}

impl Session {
    /// Creates an offline session for `shop` with no scope or expiry.
    pub fn offline(shop: impl Into<String>, access_token: impl Into<String>) -> Self {
        let shop = shop.into();
        Self {
            id: format!("offline_{shop}"),
            shop,
            access_token: access_token.into(),
            scope: None,
            expires_at: None,
            associated_user: None,
        }
    }

    /// Returns `true` if this session was issued for a specific user.
    pub fn is_online(&self) -> bool {
        self.associated_user.is_some()
    }
}

// ---------------------------------------------------------------------------
// AssociatedUser
// ---------------------------------------------------------------------------

/// The platform user an online session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedUser {
    /// The user's id on the platform (not a local database id).
    pub id: u64,

    /// The address the user signs in to the shop admin with.
    pub email: String,

    /// Given name as shown in the shop admin.
    pub first_name: String,

    /// Family name as shown in the shop admin.
    pub last_name: String,

    /// `true` if this user owns the shop's account.
    pub account_owner: bool,

    /// The user's admin language, e.g. `en` or `pt-BR`.
    pub locale: String,
}
