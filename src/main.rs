use std::sync::Arc;

use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use sketch_recognizer::adapters::{
    http::{presenter::BroadcastPresenter, router, state::HttpState},
    onnx::model_catalog::OnnxModelLoader,
    resources::{class_list::ClassListSource, fetch::ResourceFetcher},
};
use sketch_recognizer::application::services::RecognitionService;
use sketch_recognizer::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logs (RUST_LOG=info por defecto)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 2. Configuración
    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!("🔧 Configuración: {}", serde_json::to_string(&*config)?);

    // 3. Adaptadores de infraestructura
    let fetcher = ResourceFetcher::new();
    let model_loader = Arc::new(OnnxModelLoader::new(fetcher.clone()));
    let class_source = Arc::new(ClassListSource::new(fetcher));
    let presenter = Arc::new(BroadcastPresenter::new());

    // 4. Caso de uso
    let recognition = Arc::new(RecognitionService::new(
        model_loader,
        class_source,
        presenter.clone(),
        config.inference.params.clone(),
    ));

    // 5. Carga en segundo plano: el servidor arranca en NotReady y la página
    // consulta /api/status hasta que el modelo está listo.
    {
        let recognition = recognition.clone();
        let inference = config.inference.clone();
        tokio::spawn(async move {
            if let Err(e) = recognition.initialize(&inference).await {
                tracing::error!("🛑 El reconocimiento queda deshabilitado: {e}");
            }
        });
    }

    // 6. Router + estáticos
    let state = HttpState {
        recognition,
        presenter,
        config: config.clone(),
    };
    let app = router(state).fallback_service(ServeDir::new(&config.static_dir));

    // 7. Servidor
    tracing::info!("🚀 Servidor de bocetos iniciado en http://{}", config.bind_addr);
    tracing::info!("📂 Archivos estáticos servidos desde '{}'", config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
