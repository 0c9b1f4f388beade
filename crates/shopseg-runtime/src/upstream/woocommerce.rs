//! WooCommerce REST client
//!
//! Fetches the product list from `{base_url}/wp-json/wc/v3/products`,
//! authenticating with the consumer key/secret pair as query parameters.

use super::UpstreamClient;
use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use reqwest::Client;

const PRODUCTS_PATH: &str = "/wp-json/wc/v3/products";

/// HTTP client for the WooCommerce products endpoint
#[derive(Clone)]
pub struct WooCommerceClient {
    client: Client,
    base_url: String,
    consumer_key: String,
    consumer_secret: String,
}

impl WooCommerceClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `base_url` - Shop root URL (e.g., "https://shop.example.com")
    /// * `consumer_key` / `consumer_secret` - REST API credentials
    pub fn new(
        base_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self::with_client(Client::new(), base_url, consumer_key, consumer_secret)
    }

    /// Create a client on top of an existing `reqwest::Client`
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Full URL of the product list endpoint
    pub fn products_url(&self) -> String {
        format!("{}{}", self.base_url, PRODUCTS_PATH)
    }
}

impl std::fmt::Debug for WooCommerceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCommerceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UpstreamClient for WooCommerceClient {
    async fn fetch_products(&self) -> Result<Vec<serde_json::Value>> {
        let url = self.products_url();
        tracing::debug!(url = %url, "Fetching upstream products");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("consumer_key", self.consumer_key.as_str()),
                ("consumer_secret", self.consumer_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RuntimeError::UpstreamFetch(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RuntimeError::UpstreamFetch(format!(
                "Upstream returned error status: {}",
                status
            )));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            RuntimeError::UpstreamFetch(format!("Failed to parse product list: {}", e))
        })?;

        match payload {
            serde_json::Value::Array(products) => Ok(products),
            other => Err(RuntimeError::UpstreamFetch(format!(
                "Expected a product array, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn credential_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("consumer_key".into(), "ck_test".into()),
            Matcher::UrlEncoded("consumer_secret".into(), "cs_test".into()),
        ])
    }

    #[tokio::test]
    async fn test_fetch_products_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", PRODUCTS_PATH)
            .match_query(credential_query())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "name": "Mug", "price": "9.00"}, {"id": 2}]"#)
            .create_async()
            .await;

        let client = WooCommerceClient::new(server.url(), "ck_test", "cs_test");
        let products = client.fetch_products().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["name"], "Mug");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_products_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", PRODUCTS_PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"code": "woocommerce_rest_cannot_view"}"#)
            .create_async()
            .await;

        let client = WooCommerceClient::new(server.url(), "bad", "bad");
        let err = client.fetch_products().await.unwrap_err();

        assert!(matches!(err, RuntimeError::UpstreamFetch(ref msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_fetch_products_non_array_payload() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", PRODUCTS_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"products": []}"#)
            .create_async()
            .await;

        let client = WooCommerceClient::new(server.url(), "ck_test", "cs_test");
        let err = client.fetch_products().await.unwrap_err();

        assert!(matches!(err, RuntimeError::UpstreamFetch(ref msg) if msg.contains("object")));
    }

    #[tokio::test]
    async fn test_fetch_products_invalid_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", PRODUCTS_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = WooCommerceClient::new(server.url(), "ck_test", "cs_test");
        let err = client.fetch_products().await.unwrap_err();

        assert!(matches!(err, RuntimeError::UpstreamFetch(_)));
    }

    #[test]
    fn test_products_url_trims_trailing_slash() {
        let client = WooCommerceClient::new("https://shop.example.com/", "k", "s");
        assert_eq!(
            client.products_url(),
            "https://shop.example.com/wp-json/wc/v3/products"
        );
    }
}
