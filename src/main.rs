use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;

use vaani::application::ports::{SpeechSynthesizer, StagingStore};
use vaani::application::services::{
    AudioLibrary, AudioRetentionSweeper, NarrationService, RecognizerPool,
};
use vaani::domain::LanguageRegistry;
use vaani::infrastructure::observability::{TracingConfig, init_tracing};
use vaani::infrastructure::ocr::{TesseractConfig, TesseractRecognizerFactory};
use vaani::infrastructure::speech::GoogleTranslateTts;
use vaani::infrastructure::storage::LocalStagingStore;
use vaani::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    let tracing_config = TracingConfig {
        environment: environment.to_string(),
        json_format: settings.logging.enable_json,
        ..TracingConfig::default()
    }
    .with_level(&settings.logging.level);
    init_tracing(&tracing_config);

    let uploads: Arc<dyn StagingStore> = Arc::new(
        LocalStagingStore::new(settings.storage.upload_dir.clone())
            .context("Failed to prepare upload directory")?,
    );
    let audio: Arc<dyn StagingStore> = Arc::new(
        LocalStagingStore::new(settings.storage.audio_dir.clone())
            .context("Failed to prepare audio directory")?,
    );

    let registry = LanguageRegistry::builtin();
    let recognizer_factory = Arc::new(TesseractRecognizerFactory::new(TesseractConfig {
        binary: settings.ocr.tesseract_binary.clone(),
        tessdata_dir: settings.ocr.tessdata_dir.clone(),
    }));
    let recognizers = Arc::new(RecognizerPool::new(registry, recognizer_factory));

    let synthesizer: Arc<dyn SpeechSynthesizer> = match &settings.speech.base_url {
        Some(base_url) => Arc::new(GoogleTranslateTts::new(base_url, settings.speech.timeout())?),
        None => Arc::new(GoogleTranslateTts::for_tld(
            &settings.speech.tld,
            settings.speech.timeout(),
        )?),
    };

    let narration = Arc::new(NarrationService::new(
        registry,
        recognizers,
        synthesizer,
        uploads,
        Arc::clone(&audio),
    ));
    let audio_library = Arc::new(AudioLibrary::new(Arc::clone(&audio)));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper_handle = settings.retention.max_age().map(|max_age| {
        let sweeper =
            AudioRetentionSweeper::new(audio, max_age, settings.retention.sweep_interval());
        tokio::spawn(sweeper.run(shutdown_rx.clone()))
    });

    let state = AppState {
        narration,
        audio_library,
        max_upload_bytes: settings.server.max_upload_bytes(),
    };
    let router = create_router(state);

    let addr = settings
        .server
        .socket_addr()
        .context("Invalid server host/port")?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        languages = ?registry.codes().collect::<Vec<_>>(),
        upload_dir = %settings.storage.upload_dir.display(),
        audio_dir = %settings.storage.audio_dir.display(),
        "Listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    if let Some(handle) = sweeper_handle {
        let _ = handle.await;
    }

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(true);
}
