//! Tracing subscriber setup.
//!
//! Shopkit only emits `tracing` events: backend assignments at `debug`,
//! every delegated call at `trace`, resolver failures at `warn`. Apps
//! that already install a subscriber don't need this module.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a global fmt subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_FILTER`].
///
/// # Errors
/// Returns [`ShopkitError::Logging`](crate::ShopkitError::Logging) if a
/// global subscriber is already set.
pub fn init() -> Result<(), crate::ShopkitError> {
    init_with(DEFAULT_FILTER)
}

/// Like [`init`], with a custom fallback filter such as
/// `"shopkit_session=trace"`.
pub fn init_with(default_filter: &str) -> Result<(), crate::ShopkitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| crate::ShopkitError::Logging(e.to_string()))?;

    tracing::info!(default_filter, "logging initialized");
    Ok(())
}
