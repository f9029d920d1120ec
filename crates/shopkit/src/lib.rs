//! # Shopkit
//!
//! Building blocks for embedded Shopify apps.
//!
//! Shopkit keeps the OAuth sessions shops grant your app, in storage you
//! choose: implement [`ShopBackend`](prelude::ShopBackend) (and optionally
//! [`UserBackend`](prelude::UserBackend)), register it on a
//! [`SessionRepository`](prelude::SessionRepository), and the rest of
//! your app loads and stores sessions through the repository.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shopkit::prelude::*;
//!
//! // Implement ShopBackend for your storage, then:
//! // let repository = SessionRepository::builder()
//! //     .shop_backend(MyShops::connect(&url).await?)
//! //     .build();
//! // let session = repository
//! //     .retrieve_shop_session_by_domain("acme.myshopify.com")
//! //     .await?;
//! ```

mod error;
pub mod logging;

pub use error::ShopkitError;
pub use shopkit_session as session;

pub mod prelude {
    //! Everything a host needs to implement and register backends.

    pub use crate::ShopkitError;
    pub use shopkit_session::{
        AssociatedUser, BackendError, BackendRef, BackendRole, ConfigurationError,
        NullUserBackend, RepositoryError, Session, SessionRepository, SessionRepositoryBuilder,
        ShopBackend, ShopBackendRef, UserBackend, UserBackendRef, async_trait,
    };
}
