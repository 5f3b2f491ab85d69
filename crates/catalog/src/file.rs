use std::path::PathBuf;

use async_trait::async_trait;
use shopfront_core::CatalogSnapshot;

use crate::decode::decode_products;
use crate::{CatalogError, CatalogProvider};

/// Reads a catalog export from disk, in any shape the backend serves.
pub struct FileCatalogProvider {
    path: PathBuf,
}

impl FileCatalogProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogProvider for FileCatalogProvider {
    fn source(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn fetch(&self) -> Result<CatalogSnapshot, CatalogError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|source| CatalogError::Io { path: self.path.clone(), source })?;
        let products = decode_products(&raw, &self.source())?;
        Ok(CatalogSnapshot::new(products, self.source()))
    }
}
