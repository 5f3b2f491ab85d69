use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use shopfront_core::config::CatalogConfig;
use shopfront_core::CatalogSnapshot;
use tracing::debug;

use crate::decode::decode_products;
use crate::{CatalogError, CatalogProvider};

/// Reads `GET {base_url}/products` from the storefront backend.
pub struct HttpCatalogProvider {
    client: Client,
    products_url: String,
    api_token: Option<SecretString>,
}

impl HttpCatalogProvider {
    pub fn new(
        base_url: &str,
        api_token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(CatalogError::Configuration("catalog.base_url is empty".to_string()));
        }
        let products_url = format!("{base_url}/products");

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| CatalogError::Http { url: products_url.clone(), source })?;

        Ok(Self { client, products_url, api_token })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::new(
            &config.base_url,
            config.api_token.clone(),
            Duration::from_secs(config.timeout_secs.max(1)),
        )
    }

    pub fn products_url(&self) -> &str {
        &self.products_url
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogProvider {
    fn source(&self) -> String {
        self.products_url.clone()
    }

    async fn fetch(&self) -> Result<CatalogSnapshot, CatalogError> {
        let mut request = self.client.get(&self.products_url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        debug!(
            event_name = "catalog.http.request",
            url = %self.products_url,
            authenticated = self.api_token.is_some(),
            "requesting catalog"
        );

        let response = request
            .send()
            .await
            .map_err(|source| CatalogError::Http { url: self.products_url.clone(), source })?;

        if !response.status().is_success() {
            return Err(CatalogError::Status {
                url: self.products_url.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| CatalogError::Http { url: self.products_url.clone(), source })?;
        let products = decode_products(&body, &self.products_url)?;

        Ok(CatalogSnapshot::new(products, self.source()))
    }
}
