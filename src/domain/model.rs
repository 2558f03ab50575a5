use serde::{Deserialize, Serialize};

use super::preprocess::{InkChannel, INPUT_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelId {
    pub name: String,     // nombre lógico, p.ej. "quickdraw-100"
    pub location: String, // ruta local o URL http(s)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchParams {
    pub input_size: usize,        // 28 en el modelo entrenado
    pub top_k: usize,             // 5 filas en la tabla
    pub min_stroke_points: usize, // por debajo no se predice
    pub ink_channel: InkChannel,
}

impl Default for SketchParams {
    fn default() -> Self {
        Self {
            input_size: INPUT_SIZE,
            top_k: 5,
            min_stroke_points: 2,
            ink_channel: InkChannel::Luma,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub model: ModelId,
    pub class_names_location: String,
    pub params: SketchParams,
}
