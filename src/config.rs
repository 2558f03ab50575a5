//! Configuración de la aplicación: valores por defecto + variables de
//! entorno `SKETCH_*`.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::model::{InferenceConfig, ModelId, SketchParams};

/// Pincel inicial y rango del slider de grosor en la página.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrushSettings {
    pub width: u32,
    pub color: String,
    pub min_width: u32,
    pub max_width: u32,
    pub background: String,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            width: 10,
            color: "black".into(),
            min_width: 1,
            max_width: 50,
            background: "#ffffff".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind_addr: String,
    pub static_dir: String,
    pub inference: InferenceConfig,
    pub brush: BrushSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8090".into(),
            static_dir: "static".into(),
            inference: InferenceConfig {
                model: ModelId {
                    name: "doodle".into(),
                    location: "model/model.onnx".into(),
                },
                class_names_location: "model/class_names.txt".into(),
                params: SketchParams::default(),
            },
            brush: BrushSettings::default(),
        }
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("valor inválido en {key}: {raw:?}"))
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Aplica overrides desde `lookup` (normalmente el entorno) y valida.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = lookup("SKETCH_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("SKETCH_STATIC_DIR") {
            self.static_dir = v;
        }
        if let Some(v) = lookup("SKETCH_MODEL") {
            self.inference.model.location = v;
        }
        if let Some(v) = lookup("SKETCH_MODEL_NAME") {
            self.inference.model.name = v;
        }
        if let Some(v) = lookup("SKETCH_CLASS_NAMES") {
            self.inference.class_names_location = v;
        }
        if let Some(v) = lookup("SKETCH_TOP_K") {
            self.inference.params.top_k = parse_var("SKETCH_TOP_K", &v)?;
        }
        if let Some(v) = lookup("SKETCH_MIN_STROKE_POINTS") {
            self.inference.params.min_stroke_points = parse_var("SKETCH_MIN_STROKE_POINTS", &v)?;
        }
        if let Some(v) = lookup("SKETCH_INK_CHANNEL") {
            self.inference.params.ink_channel = parse_var("SKETCH_INK_CHANNEL", &v)?;
        }
        if let Some(v) = lookup("SKETCH_BRUSH_WIDTH") {
            self.brush.width = parse_var("SKETCH_BRUSH_WIDTH", &v)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let params = &self.inference.params;
        if params.input_size == 0 {
            bail!("input_size debe ser mayor que 0");
        }
        if params.top_k == 0 {
            bail!("top_k debe ser al menos 1");
        }
        if params.min_stroke_points < 2 {
            bail!("min_stroke_points debe ser al menos 2");
        }
        if self.inference.model.location.trim().is_empty() {
            bail!("la ubicación del modelo está vacía");
        }
        if self.inference.class_names_location.trim().is_empty() {
            bail!("la ubicación de la lista de clases está vacía");
        }
        let brush = &self.brush;
        if brush.min_width > brush.max_width || !(brush.min_width..=brush.max_width).contains(&brush.width) {
            bail!(
                "grosor de pincel {} fuera del rango {}..={}",
                brush.width,
                brush.min_width,
                brush.max_width
            );
        }
        Ok(())
    }
}
