pub mod logging;
pub mod models;
pub mod services;
pub mod ui;

use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use anyhow::anyhow;
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use tracing::{error, info, warn};

use logging::LogSettings;
use services::{AppConfig, BertBackend, Classifier, ClassifierError, ConfigStore};
use ui::{AuthentiApp, WINDOW_TITLE};

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

fn startup_elapsed_ms() -> u128 {
    PROCESS_START
        .get()
        .map(|t| t.elapsed().as_millis())
        .unwrap_or(0)
}

/// Load the configuration, falling back to defaults when the store is unusable.
pub fn load_config() -> AppConfig {
    let Some(dir) = ConfigStore::default_config_dir() else {
        warn!("No config directory available, using defaults");
        return AppConfig::default();
    };
    let store = ConfigStore::new(dir);
    match store.load_or_init() {
        Ok(config) => {
            info!(path = %store.config_file().display(), "config.loaded");
            config
        }
        Err(e) => {
            warn!(path = %store.config_file().display(), error = %e, "config.fallback_defaults");
            AppConfig::default()
        }
    }
}

/// Load the model described by `config`. Called once per process.
pub fn load_classifier(config: &AppConfig, model_dir: Option<&Path>) -> Result<Classifier, ClassifierError> {
    let dir = model_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.model.resolve_dir());
    info!(dir = %dir.display(), "model.loading");
    let backend = BertBackend::load(&dir, &config.model)?;
    Ok(Classifier::new(backend))
}

fn show_startup_error(message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title("Errore")
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn run() -> anyhow::Result<()> {
    PROCESS_START.get_or_init(Instant::now);

    let logging_t0 = Instant::now();
    logging::init(&LogSettings::from_env());
    info!(startup_ms = startup_elapsed_ms(), logging_ms = logging_t0.elapsed().as_millis(), "logging.initialized");

    let config = load_config();

    // The model is required before any window exists.
    let classifier = match load_classifier(&config, None) {
        Ok(classifier) => classifier,
        Err(e) => {
            error!(error = %e, "startup.model_unavailable");
            show_startup_error(&format!("Impossibile caricare il modello:\n\n{}", e));
            return Err(anyhow!("model unavailable: {}", e));
        }
    };
    info!(startup_ms = startup_elapsed_ms(), backend = classifier.backend_id(), "startup");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([config.window.width, config.window.height])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Box::new(AuthentiApp::new(cc, classifier))),
    )
    .map_err(|e| anyhow!("failed to run window: {}", e))?;

    info!("=== AuthentiAI Exited ===");
    Ok(())
}
