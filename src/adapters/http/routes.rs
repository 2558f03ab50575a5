use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use tracing::warn;

use crate::adapters::http::canvas::decode_snapshot;
use crate::adapters::http::state::HttpState;
use crate::application::dto::{
    OkResponse, StrokePointsRequest, StrokePointsResponse, StrokeUpRequest, StrokeUpResponse,
};
use crate::domain::errors::DomainError;

fn error_response(e: DomainError) -> Response {
    let status = match &e {
        DomainError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::InvalidInput(_)
        | DomainError::EmptyStroke
        | DomainError::DegenerateBox { .. } => StatusCode::BAD_REQUEST,
        DomainError::OperationFailed(_)
        | DomainError::IndexOutOfRange { .. }
        | DomainError::ClassCountMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}

pub async fn get_config(State(st): State<HttpState>) -> impl IntoResponse {
    let cfg = &st.config;
    let params = st.recognition.params();
    Json(json!({
        "brush": {
            "width": cfg.brush.width,
            "color": cfg.brush.color,
            "min_width": cfg.brush.min_width,
            "max_width": cfg.brush.max_width,
        },
        "background": cfg.brush.background,
        "top_k": params.top_k,
        "input_size": params.input_size,
        "min_stroke_points": params.min_stroke_points,
    }))
}

pub async fn get_status(State(st): State<HttpState>) -> impl IntoResponse {
    Json(st.recognition.status())
}

pub async fn stroke_down(State(st): State<HttpState>) -> Response {
    match st.recognition.pointer_down() {
        Ok(()) => Json(OkResponse { ok: true }).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn stroke_points(State(st): State<HttpState>, Json(req): Json<StrokePointsRequest>) -> Response {
    match st.recognition.record_points(&req.points) {
        Ok((recorded, total)) => Json(StrokePointsResponse { recorded, total }).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn stroke_up(State(st): State<HttpState>, Json(req): Json<StrokeUpRequest>) -> Response {
    let snapshot = match decode_snapshot(&req.image) {
        Ok(s) => s,
        Err(e) => {
            // El gesto termina igualmente aunque la instantánea sea inválida.
            if let Err(end_err) = st.recognition.end_gesture() {
                return error_response(end_err);
            }
            warn!("Instantánea de canvas rechazada: {e}");
            return error_response(e);
        }
    };

    match st.recognition.pointer_up(&snapshot, req.device_pixel_ratio).await {
        Ok(prediction) => Json(StrokeUpResponse { prediction }).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn erase(State(st): State<HttpState>) -> Response {
    match st.recognition.erase() {
        Ok(()) => Json(OkResponse { ok: true }).into_response(),
        Err(e) => error_response(e),
    }
}
