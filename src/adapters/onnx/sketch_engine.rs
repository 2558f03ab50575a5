use std::sync::Mutex;

use anyhow::{anyhow, Result};
use ndarray::{ArrayViewD, Axis, IxDyn};
use ort::session::Session;
use ort::value::Tensor;

use crate::application::ports::ClassifierPort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::preprocess::PreprocessedTensor;

/// Clasificador de bocetos sobre ONNX Runtime. Entrada NHWC `[1, 28, 28, 1]`,
/// salida `[1, num_clases]` con probabilidades.
pub struct OnnxSketchEngine {
    // `Session::run` necesita `&mut self`.
    session: Mutex<Session>,
}

impl OnnxSketchEngine {
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self> {
        // Modelo de 28x28: un hilo de CPU es suficiente.
        let session = Session::builder()?
            .with_intra_threads(1)?
            .commit_from_memory(model_bytes)?;
        Ok(Self { session: Mutex::new(session) })
    }

    fn run(&self, tensor: &PreprocessedTensor) -> Result<Vec<f32>> {
        let shape: Vec<i64> = tensor.shape().iter().map(|&d| d as i64).collect();
        let input_tensor = Tensor::from_array((shape, tensor.to_vec()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("Lock de sesión ONNX fallido"))?;
        let outputs = session.run(ort::inputs![input_tensor])?;
        let (shape_out, data_out) = outputs[0].try_extract_tensor::<f32>()?;

        let dims: Vec<usize> = shape_out.into_iter().map(|&x| x as usize).collect();
        let array_view = ArrayViewD::from_shape(IxDyn(&dims), data_out)?;
        if array_view.ndim() < 2 {
            return Ok(array_view.iter().copied().collect());
        }
        // Primer (y único) elemento del batch.
        Ok(array_view.index_axis(Axis(0), 0).iter().copied().collect())
    }
}

impl ClassifierPort for OnnxSketchEngine {
    fn predict(&self, tensor: &PreprocessedTensor) -> DomainResult<Vec<f32>> {
        self.run(tensor)
            .map_err(|e| DomainError::OperationFailed(format!("Inferencia fallida: {e:#}")))
    }
}
