use serde::{Deserialize, Serialize};

use crate::domain::{prediction::PredictionFrame, stroke::Point};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokePointsRequest {
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokePointsResponse {
    pub recorded: usize,
    pub total: usize,
}

fn default_dpr() -> f32 {
    1.0
}

/// Fin de gesto: instantánea del canvas (PNG en base64, admite prefijo
/// `data:`) y el `devicePixelRatio` del navegador.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeUpRequest {
    pub image: String,
    #[serde(default = "default_dpr")]
    pub device_pixel_ratio: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeUpResponse {
    pub prediction: Option<PredictionFrame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}
