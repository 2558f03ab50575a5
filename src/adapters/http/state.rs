use std::sync::Arc;

use crate::adapters::http::presenter::BroadcastPresenter;
use crate::application::services::RecognitionService;
use crate::config::AppConfig;

/// Estado compartido para los manejadores HTTP de Axum.
#[derive(Clone)]
pub struct HttpState {
    /// Ciclo de vida, sesión de dibujo y pipeline de predicción.
    pub recognition: Arc<RecognitionService>,
    /// Origen de los frames que se empujan por WebSocket.
    pub presenter: Arc<BroadcastPresenter>,
    pub config: Arc<AppConfig>,
}
