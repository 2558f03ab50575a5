use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::adapters::resources::fetch::{ResourceFetcher, ResourceLocation};
use crate::adapters::onnx::sketch_engine::OnnxSketchEngine;
use crate::application::ports::{ClassifierPort, ModelLoaderPort};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::ModelId;

/// Valida la ubicación del modelo, descarga sus bytes y construye la sesión
/// ONNX fuera del runtime async.
pub struct OnnxModelLoader {
    fetcher: ResourceFetcher,
}

impl OnnxModelLoader {
    pub fn new(fetcher: ResourceFetcher) -> Self {
        Self { fetcher }
    }

    fn validate_model(model: &ModelId) -> DomainResult<ResourceLocation> {
        let location = ResourceLocation::parse(&model.location)?;
        if let ResourceLocation::File(path) = &location {
            if !path.exists() {
                return Err(DomainError::NotFound(format!(
                    "Modelo no encontrado: {}",
                    path.display()
                )));
            }
        }
        Ok(location)
    }
}

#[async_trait]
impl ModelLoaderPort for OnnxModelLoader {
    async fn load_model(&self, model: &ModelId) -> DomainResult<Arc<dyn ClassifierPort>> {
        let location = Self::validate_model(model)?;
        let bytes = self
            .fetcher
            .fetch_bytes(&location)
            .await
            .map_err(|e| DomainError::OperationFailed(format!("Descarga del modelo fallida: {e:#}")))?;
        info!("Modelo '{}' descargado ({} bytes)", model.name, bytes.len());

        let engine = tokio::task::spawn_blocking(move || OnnxSketchEngine::from_bytes(&bytes))
            .await
            .map_err(|e| DomainError::OperationFailed(format!("Tarea de carga abortada: {e}")))?
            .map_err(|e| DomainError::OperationFailed(format!("Modelo ONNX inválido: {e:#}")))?;

        Ok(Arc::new(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(location: &str) -> ModelId {
        ModelId { name: "m".into(), location: location.into() }
    }

    #[test]
    fn empty_location_is_invalid() {
        assert!(matches!(
            OnnxModelLoader::validate_model(&model("  ")),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn missing_local_file_is_not_found() {
        assert!(matches!(
            OnnxModelLoader::validate_model(&model("/definitely/not/here.onnx")),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn remote_location_is_accepted_without_touching_disk() {
        assert!(matches!(
            OnnxModelLoader::validate_model(&model("https://example.com/model.onnx")),
            Ok(ResourceLocation::Http(_))
        ));
    }
}
