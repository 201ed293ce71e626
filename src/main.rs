use anyhow::{Context, Result};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use translation_records::{
    config::Config,
    i18n::LanguageCatalog,
    routes::{build_router, AppState},
    service::TranslationService,
    store::{MemoryRecordStore, PgRecordStore, RecordStore},
    translation::GoogleTranslateProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translation_records=info".parse()?),
        )
        .init();

    info!("Starting translation records service");

    let config = Config::from_env()?;

    let store: Arc<dyn RecordStore> = match &config.database_url {
        Some(url) => {
            info!("Connecting to PostgreSQL");
            Arc::new(
                PgRecordStore::connect(url)
                    .await
                    .context("Failed to connect to database")?,
            )
        }
        None => {
            warn!("DATABASE_URL not set, records are kept in memory and lost on restart");
            Arc::new(MemoryRecordStore::new())
        }
    };

    let provider = Arc::new(GoogleTranslateProvider::new(
        reqwest::Client::new(),
        config.google_translate_api_url.clone(),
        config.google_translate_api_key.clone(),
    ));

    info!(
        "Accepting {} language codes",
        LanguageCatalog::get().len()
    );

    let state = AppState {
        service: TranslationService::new(provider, store),
        public_base_url: config.public_base_url.clone(),
    };
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("Server listening on port {}...", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
