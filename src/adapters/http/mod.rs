pub mod canvas;
pub mod presenter;
pub mod routes;
pub mod state;
pub mod ws;

use axum::{routing::{get, post}, Router};
use tower_http::trace::TraceLayer;

use crate::adapters::http::state::HttpState;
use crate::adapters::http::ws::ws_handler;

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/config", get(routes::get_config))
        .route("/api/status", get(routes::get_status))
        .route("/api/stroke/down", post(routes::stroke_down))
        .route("/api/stroke/points", post(routes::stroke_points))
        .route("/api/stroke/up", post(routes::stroke_up))
        .route("/api/erase", post(routes::erase))
        .route("/ws/predictions", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
