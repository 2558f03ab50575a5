use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::adapters::http::state::HttpState;
use crate::domain::prediction::WsPredictionMessage;

pub async fn ws_handler(ws: WebSocketUpgrade, State(st): State<HttpState>) -> impl axum::response::IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, st))
}

async fn handle_socket(mut socket: WebSocket, st: HttpState) {
    let mut rx = st.presenter.subscribe();
    debug!("Cliente WebSocket conectado");

    loop {
        let frame = match rx.recv().await {
            Ok(frame) => frame,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Cliente WebSocket lento: {skipped} predicciones descartadas");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        let json = serde_json::to_string(&WsPredictionMessage { r#type: "prediction".into(), frame })
            .unwrap_or_default();
        if socket.send(Message::Text(json)).await.is_err() {
            break;
        }
    }
}
