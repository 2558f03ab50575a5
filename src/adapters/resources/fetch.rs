use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::domain::errors::{DomainError, DomainResult};

/// Dónde vive un recurso estático: en disco o detrás de un GET HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocation {
    File(PathBuf),
    Http(String),
}

impl ResourceLocation {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::InvalidInput("ubicación de recurso vacía".into()));
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(ResourceLocation::Http(raw.to_string()))
        } else {
            Ok(ResourceLocation::File(PathBuf::from(raw)))
        }
    }
}

#[derive(Clone)]
pub struct ResourceFetcher {
    client: reqwest::Client,
}

impl Default for ResourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    pub async fn fetch_bytes(&self, location: &ResourceLocation) -> Result<Vec<u8>> {
        match location {
            ResourceLocation::File(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("no se pudo leer {}", path.display())),
            ResourceLocation::Http(url) => {
                let res = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?
                    .error_for_status()?;
                Ok(res.bytes().await?.to_vec())
            }
        }
    }

    pub async fn fetch_text(&self, location: &ResourceLocation) -> Result<String> {
        let bytes = self.fetch_bytes(location).await?;
        String::from_utf8(bytes).context("el recurso no es UTF-8")
    }
}
