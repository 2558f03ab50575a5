use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    errors::DomainResult,
    labels::ClassNames,
    model::ModelId,
    prediction::PredictionFrame,
    preprocess::PreprocessedTensor,
};

/// Modelo ya cargado. La inferencia es síncrona; quien llama decide si la
/// saca del runtime async.
pub trait ClassifierPort: Send + Sync {
    fn predict(&self, tensor: &PreprocessedTensor) -> DomainResult<Vec<f32>>;
}

#[async_trait]
pub trait ModelLoaderPort: Send + Sync {
    async fn load_model(&self, model: &ModelId) -> DomainResult<Arc<dyn ClassifierPort>>;
}

#[async_trait]
pub trait ClassNamesSourcePort: Send + Sync {
    async fn load_class_names(&self, location: &str) -> DomainResult<ClassNames>;
}

pub trait PredictionPresenterPort: Send + Sync {
    fn present(&self, frame: &PredictionFrame);
}
