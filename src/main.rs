mod app;
mod cache;
mod chat;
mod config;
mod event;
mod gateway;
mod preview;
mod state;
mod tasks;
mod theme;
mod ui;
mod workspace;

use app::CodepilotApp;
use cache::store::{FileStore, MemoryStore};
use cache::Cache;
use config::AppConfig;
use eframe::egui;
use event::EventSink;
use gateway::BackendGateway;
use state::AppState;
use std::path::PathBuf;
use std::sync::mpsc;
use tasks::TaskRunner;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ui::UiAction;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn open_cache(config: &AppConfig) -> Cache {
    match FileStore::open(config.cache_dir()) {
        Ok(store) => Cache::new(store),
        Err(err) => {
            warn!(error = %err, "cache directory unavailable, keeping state in memory");
            Cache::new(MemoryStore::default())
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let (config, config_error) = AppConfig::load();
    if let Some(err) = config_error {
        warn!(error = %err, "ignoring config file");
    }
    info!(backend = %config.backend_url, data_dir = %config.data_dir.display(), "starting");

    let mut state = AppState::new(open_cache(&config));
    let initial_effects = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) if path.is_dir() => state.handle_action(UiAction::OpenDirectory(path)),
        Some(path) => {
            state.log_diagnostic(format!("{} is not a directory", path.display()));
            Vec::new()
        }
        None => Vec::new(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("codepilot-runtime")
        .build()?;
    let runtime_handle = runtime.handle().clone();
    let gateway = BackendGateway::new(config.backend_url.clone());
    let (tx, rx) = mpsc::channel();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Codepilot",
        native_options,
        Box::new(move |creation_context| {
            let ctx = creation_context.egui_ctx.clone();
            let sink = EventSink::new(tx, Some(ctx.clone()));
            let runner = TaskRunner::new(runtime_handle, sink, gateway);
            Ok(Box::new(CodepilotApp::new(
                &ctx,
                rx,
                state,
                runner,
                initial_effects,
            )))
        }),
    )?;

    drop(runtime);
    Ok(())
}
