//! Upstream product source
//!
//! The sync pipeline only sees the [`UpstreamClient`] trait. Records come back
//! as raw JSON so that each one can be normalized (and rejected) on its own.

pub mod normalize;
mod woocommerce;

pub use normalize::{normalize, NormalizeError, UpstreamProduct};
pub use woocommerce::WooCommerceClient;

use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Source of upstream product records
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Fetch the full current product list in one request
    async fn fetch_products(&self) -> Result<Vec<serde_json::Value>>;
}

/// Scripted upstream for tests and offline runs
///
/// Returns whatever product list (or failure) it currently holds.
pub struct StaticUpstreamClient {
    response: RwLock<std::result::Result<Vec<serde_json::Value>, String>>,
    delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl StaticUpstreamClient {
    /// Create a client that serves `products`
    pub fn new(products: Vec<serde_json::Value>) -> Self {
        Self {
            response: RwLock::new(Ok(products)),
            delay: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Create a client whose fetch always fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: RwLock::new(Err(message.into())),
            delay: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Sleep for `delay` inside every fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the served product list
    pub async fn set_products(&self, products: Vec<serde_json::Value>) {
        *self.response.write().await = Ok(products);
    }

    /// Make subsequent fetches fail
    pub async fn set_failure(&self, message: impl Into<String>) {
        *self.response.write().await = Err(message.into());
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for StaticUpstreamClient {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl UpstreamClient for StaticUpstreamClient {
    async fn fetch_products(&self) -> Result<Vec<serde_json::Value>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.response
            .read()
            .await
            .clone()
            .map_err(RuntimeError::UpstreamFetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_static_client_serves_products() {
        let client = StaticUpstreamClient::new(vec![json!({"id": 1})]);
        let products = client.fetch_products().await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(client.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_static_client_failure() {
        let client = StaticUpstreamClient::new(vec![]);
        client.set_failure("connection refused").await;

        let err = client.fetch_products().await.unwrap_err();
        assert!(matches!(err, RuntimeError::UpstreamFetch(msg) if msg == "connection refused"));
    }
}
