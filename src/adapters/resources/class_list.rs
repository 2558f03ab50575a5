use async_trait::async_trait;

use crate::adapters::resources::fetch::{ResourceFetcher, ResourceLocation};
use crate::application::ports::ClassNamesSourcePort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::labels::ClassNames;

/// Lista de clases en texto plano (una por línea), local o por HTTP.
pub struct ClassListSource {
    fetcher: ResourceFetcher,
}

impl ClassListSource {
    pub fn new(fetcher: ResourceFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ClassNamesSourcePort for ClassListSource {
    async fn load_class_names(&self, location: &str) -> DomainResult<ClassNames> {
        let location = ResourceLocation::parse(location)?;
        if let ResourceLocation::File(path) = &location {
            if !path.exists() {
                return Err(DomainError::NotFound(format!(
                    "Lista de clases no encontrada: {}",
                    path.display()
                )));
            }
        }
        let text = self
            .fetcher
            .fetch_text(&location)
            .await
            .map_err(|e| DomainError::OperationFailed(format!("Lectura de clases fallida: {e:#}")))?;
        ClassNames::parse(&text)
    }
}
