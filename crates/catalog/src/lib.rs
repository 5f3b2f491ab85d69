//! Catalog providers.
//!
//! The storefront does not own its product data: a backend serves it over
//! HTTP, or a JSON export sits on disk. Providers turn either into a fully
//! materialized [`CatalogSnapshot`] that the search and recommendation
//! engines can run against. A failed fetch never produces a snapshot.

use std::path::PathBuf;

use async_trait::async_trait;
use shopfront_core::config::{CatalogConfig, CatalogSource};
use shopfront_core::{ApplicationError, CatalogSnapshot};
use thiserror::Error;
use tracing::{info, warn};

pub mod decode;
pub mod file;
pub mod http;
pub mod memory;

pub use file::FileCatalogProvider;
pub use http::HttpCatalogProvider;
pub use memory::InMemoryCatalogProvider;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request to `{url}` failed: {source}")]
    Http { url: String, source: reqwest::Error },
    #[error("catalog backend `{url}` returned status {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode catalog from `{origin}`: {message}")]
    Decode { origin: String, message: String },
    #[error("could not read catalog file `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("catalog configuration invalid: {0}")]
    Configuration(String),
}

impl From<CatalogError> for ApplicationError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::Configuration(message) => Self::Configuration(message),
            other => Self::Catalog(other.to_string()),
        }
    }
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Human-readable origin of the data, recorded on the snapshot
    fn source(&self) -> String;

    async fn fetch(&self) -> Result<CatalogSnapshot, CatalogError>;
}

/// Fetches a snapshot and records the outcome.
pub async fn fetch_snapshot(
    provider: &dyn CatalogProvider,
) -> Result<CatalogSnapshot, CatalogError> {
    match provider.fetch().await {
        Ok(snapshot) => {
            info!(
                event_name = "catalog.fetch.succeeded",
                source = %snapshot.source,
                products = snapshot.len(),
                "catalog snapshot fetched"
            );
            Ok(snapshot)
        }
        Err(error) => {
            warn!(
                event_name = "catalog.fetch.failed",
                source = %provider.source(),
                error = %error,
                "catalog snapshot unavailable"
            );
            Err(error)
        }
    }
}

/// Builds the provider selected by `catalog.source`.
pub fn provider_from_config(
    config: &CatalogConfig,
) -> Result<Box<dyn CatalogProvider>, CatalogError> {
    match config.source {
        CatalogSource::Http => Ok(Box::new(HttpCatalogProvider::from_config(config)?)),
        CatalogSource::File => {
            let path = config.path.clone().ok_or_else(|| {
                CatalogError::Configuration(
                    "catalog.path is required when catalog.source is file".to_string(),
                )
            })?;
            Ok(Box::new(FileCatalogProvider::new(path)))
        }
        CatalogSource::Memory => Ok(Box::new(InMemoryCatalogProvider::demo())),
    }
}
