use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, RwLock,
};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::{
    application::{
        ports::{ClassNamesSourcePort, ClassifierPort, ModelLoaderPort, PredictionPresenterPort},
        session::{DrawingSession, GestureOutcome},
    },
    domain::{
        errors::{DomainError, DomainResult},
        labels::ClassNames,
        model::{InferenceConfig, ModelId, SketchParams},
        prediction::{summarize_predictions, PredictionFrame},
        preprocess::{ImagePreprocessor, PreprocessedTensor, RawImage},
        ranking::select_top_k,
        stroke::{BoundingBox, Point},
    },
};

#[derive(Clone)]
struct ReadyContext {
    model: ModelId,
    classifier: Arc<dyn ClassifierPort>,
    class_names: Arc<ClassNames>,
}

enum Lifecycle {
    NotReady,
    Ready(ReadyContext),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    NotReady,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub state: ServiceState,
    pub model: Option<String>,
    pub classes: Option<usize>,
    pub error: Option<String>,
}

/// Caso de uso principal: ciclo de vida `NotReady -> Ready` y pipeline
/// trazo -> tensor -> inferencia -> top-K -> etiquetas -> presentación.
///
/// Todas las entradas de dibujo y predicción devuelven
/// [`DomainError::NotReady`] hasta que modelo y lista de clases están
/// cargados y son coherentes entre sí.
pub struct RecognitionService {
    loader: Arc<dyn ModelLoaderPort>,
    class_source: Arc<dyn ClassNamesSourcePort>,
    presenter: Arc<dyn PredictionPresenterPort>,
    params: SketchParams,
    preprocessor: ImagePreprocessor,
    lifecycle: RwLock<Lifecycle>,
    session: Mutex<DrawingSession>,
    latest_request: AtomicU64,
    /// Serializa comprobación de vigencia y presentación.
    present_lock: tokio::sync::Mutex<()>,
}

impl RecognitionService {
    pub fn new(
        loader: Arc<dyn ModelLoaderPort>,
        class_source: Arc<dyn ClassNamesSourcePort>,
        presenter: Arc<dyn PredictionPresenterPort>,
        params: SketchParams,
    ) -> Self {
        Self {
            loader,
            class_source,
            presenter,
            preprocessor: ImagePreprocessor::new(params.input_size, params.ink_channel),
            session: Mutex::new(DrawingSession::new(params.min_stroke_points)),
            params,
            lifecycle: RwLock::new(Lifecycle::NotReady),
            latest_request: AtomicU64::new(0),
            present_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Carga modelo (con calentamiento) y lista de clases. Cualquier fallo
    /// deja el servicio en `Failed` y el dibujo deshabilitado.
    pub async fn initialize(&self, config: &InferenceConfig) -> DomainResult<()> {
        match self.try_initialize(config).await {
            Ok(ctx) => {
                info!(
                    "✅ Modelo '{}' listo con {} clases",
                    ctx.model.name,
                    ctx.class_names.len()
                );
                *self.lifecycle_mut()? = Lifecycle::Ready(ctx);
                Ok(())
            }
            Err(e) => {
                error!("❌ Inicialización fallida: {e}");
                self.fail(e.to_string())?;
                Err(e)
            }
        }
    }

    async fn try_initialize(&self, config: &InferenceConfig) -> DomainResult<ReadyContext> {
        info!("📦 Cargando modelo desde {}", config.model.location);
        let classifier = self.loader.load_model(&config.model).await?;

        let warmup = PreprocessedTensor::zeros(self.params.input_size);
        let output = run_classifier(classifier.clone(), warmup).await?;
        debug!("Calentamiento completado: {} salidas", output.len());

        info!("📜 Cargando lista de clases desde {}", config.class_names_location);
        let class_names = self
            .class_source
            .load_class_names(&config.class_names_location)
            .await?;

        if output.len() != class_names.len() {
            return Err(DomainError::ClassCountMismatch {
                model: output.len(),
                names: class_names.len(),
            });
        }

        Ok(ReadyContext {
            model: config.model.clone(),
            classifier,
            class_names: Arc::new(class_names),
        })
    }

    pub fn status(&self) -> ServiceStatus {
        let Ok(lock) = self.lifecycle.read() else {
            return ServiceStatus {
                state: ServiceState::Failed,
                model: None,
                classes: None,
                error: Some("estado interno corrupto".into()),
            };
        };
        match &*lock {
            Lifecycle::NotReady => ServiceStatus {
                state: ServiceState::NotReady,
                model: None,
                classes: None,
                error: None,
            },
            Lifecycle::Ready(ctx) => ServiceStatus {
                state: ServiceState::Ready,
                model: Some(ctx.model.name.clone()),
                classes: Some(ctx.class_names.len()),
                error: None,
            },
            Lifecycle::Failed(reason) => ServiceStatus {
                state: ServiceState::Failed,
                model: None,
                classes: None,
                error: Some(reason.clone()),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready_context().is_ok()
    }

    pub fn params(&self) -> &SketchParams {
        &self.params
    }

    pub fn pointer_down(&self) -> DomainResult<()> {
        self.ready_context()?;
        self.session()?.pointer_down();
        Ok(())
    }

    /// Devuelve `(añadidos, total)`.
    pub fn record_points(&self, points: &[Point]) -> DomainResult<(usize, usize)> {
        self.ready_context()?;
        let mut session = self.session()?;
        let recorded = points.iter().filter(|p| session.pointer_move(**p)).count();
        Ok((recorded, session.point_count()))
    }

    /// Termina el gesto sin predecir (p.ej. instantánea ilegible).
    pub fn end_gesture(&self) -> DomainResult<()> {
        self.ready_context()?;
        self.session()?.end_gesture();
        Ok(())
    }

    pub fn erase(&self) -> DomainResult<()> {
        self.ready_context()?;
        self.session()?.erase();
        debug!("Sesión de dibujo borrada");
        Ok(())
    }

    /// Termina el gesto y, si hay trazo suficiente, predice sobre la
    /// instantánea del canvas. `Ok(None)` cuando no hay nada que mostrar.
    pub async fn pointer_up(
        &self,
        snapshot: &RawImage,
        device_pixel_ratio: f32,
    ) -> DomainResult<Option<PredictionFrame>> {
        let ctx = self.ready_context()?;
        let outcome = self.session()?.pointer_up()?;

        match outcome {
            GestureOutcome::TooShort { points } => {
                debug!("Trazo demasiado corto ({points} puntos), sin predicción");
                Ok(None)
            }
            GestureOutcome::Complete(bbox) => {
                debug!(
                    "Instantánea {}x{}, caja {:?}",
                    snapshot.width(),
                    snapshot.height(),
                    bbox
                );
                self.predict(ctx, snapshot, bbox, device_pixel_ratio).await
            }
        }
    }

    async fn predict(
        &self,
        ctx: ReadyContext,
        snapshot: &RawImage,
        bbox: BoundingBox,
        device_pixel_ratio: f32,
    ) -> DomainResult<Option<PredictionFrame>> {
        let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;

        let tensor = match self.preprocessor.preprocess(snapshot, &bbox, device_pixel_ratio) {
            Ok(t) => t,
            Err(DomainError::DegenerateBox { width, height }) => {
                debug!("Caja degenerada {width}x{height}, sin predicción");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let t_infer = std::time::Instant::now();
        let probabilities = run_classifier(ctx.classifier.clone(), tensor).await?;
        let infer_ms = t_infer.elapsed().as_secs_f32() * 1000.0;

        let ranked = select_top_k(&probabilities, self.params.top_k);
        let frame = match PredictionFrame::build(request_id, &ranked, &ctx.class_names) {
            Ok(frame) => frame,
            Err(e @ DomainError::IndexOutOfRange { .. }) => {
                // El modelo y la lista de clases no cuadran: error de configuración.
                error!("❌ {e}");
                self.fail(e.to_string())?;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        // Solo se muestra la petición más reciente. Con el lock tomado, una
        // petición anterior no puede mostrarse después de una posterior.
        let _presenting = self.present_lock.lock().await;
        if self.latest_request.load(Ordering::SeqCst) != request_id {
            debug!("Petición {request_id} superada por otra más reciente, descartada");
            return Ok(None);
        }

        info!(
            "🎯 #{request_id} ({infer_ms:.1} ms): {}",
            summarize_predictions(&frame)
        );
        self.presenter.present(&frame);
        Ok(Some(frame))
    }

    fn ready_context(&self) -> DomainResult<ReadyContext> {
        let lock = self
            .lifecycle
            .read()
            .map_err(|_| DomainError::OperationFailed("Lock de estado fallido".into()))?;
        match &*lock {
            Lifecycle::Ready(ctx) => Ok(ctx.clone()),
            _ => Err(DomainError::NotReady),
        }
    }

    fn lifecycle_mut(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, Lifecycle>> {
        self.lifecycle
            .write()
            .map_err(|_| DomainError::OperationFailed("Lock de estado fallido".into()))
    }

    fn fail(&self, reason: String) -> DomainResult<()> {
        *self.lifecycle_mut()? = Lifecycle::Failed(reason);
        Ok(())
    }

    fn session(&self) -> DomainResult<MutexGuard<'_, DrawingSession>> {
        self.session
            .lock()
            .map_err(|_| DomainError::OperationFailed("Lock de sesión fallido".into()))
    }
}

async fn run_classifier(
    classifier: Arc<dyn ClassifierPort>,
    tensor: PreprocessedTensor,
) -> DomainResult<Vec<f32>> {
    tokio::task::spawn_blocking(move || classifier.predict(&tensor))
        .await
        .map_err(|e| DomainError::OperationFailed(format!("Tarea de inferencia abortada: {e}")))?
}
