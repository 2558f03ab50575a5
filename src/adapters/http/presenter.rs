use tokio::sync::broadcast;

use crate::application::ports::PredictionPresenterPort;
use crate::domain::prediction::PredictionFrame;

/// Publica cada predicción en un canal broadcast que consumen los
/// WebSockets del dashboard.
pub struct BroadcastPresenter {
    tx: broadcast::Sender<PredictionFrame>,
}

impl Default for BroadcastPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastPresenter {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PredictionFrame> {
        self.tx.subscribe()
    }
}

impl PredictionPresenterPort for BroadcastPresenter {
    fn present(&self, frame: &PredictionFrame) {
        if self.tx.receiver_count() > 0 {
            let _ = self.tx.send(frame.clone());
        }
    }
}
