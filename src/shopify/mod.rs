//! Remote theme assets on the Shopify Admin API.
//!
//! - [`ShopifyClient`]: GraphQL `assetCreate` / `assetDelete` over HTTPS
//! - [`RemoteTheme`]: the seam the watch driver talks to

mod client;
mod error;
mod graphql;

pub use client::{DEFAULT_API_VERSION, DEFAULT_AUTH_HEADER, ShopifyClient, ThemeTarget, endpoint};
pub use error::RemoteError;

use std::future::Future;

/// Upload or delete one asset on the remote theme.
///
/// Each call completes one remote operation; ordering across calls is the
/// caller's responsibility.
pub trait RemoteTheme: Send + Sync + 'static {
    /// Create or replace the asset stored under `key`.
    fn upload(&self, key: &str, content: &str)
    -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Delete the asset stored under `key`.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
