use crate::gateway::GatewayError;
use crate::workspace::selection::ReadToken;
use crate::workspace::{PickedFile, ScanError};
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPurpose {
    Selection,
    Preview,
}

#[derive(Debug)]
pub enum AppEvent {
    DirectoryChosen(PathBuf),
    DirectoryScanned {
        root: PathBuf,
        result: Result<Vec<PickedFile>, ScanError>,
    },
    FileRead {
        purpose: ReadPurpose,
        path: String,
        token: ReadToken,
        result: Result<String, String>,
    },
    GenerateFinished(Result<String, GatewayError>),
    ApplyFinished {
        file_path: String,
        result: Result<String, GatewayError>,
    },
}

#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<AppEvent>,
    ctx: Option<egui::Context>,
}

impl EventSink {
    pub fn new(tx: mpsc::Sender<AppEvent>, ctx: Option<egui::Context>) -> Self {
        Self { tx, ctx }
    }

    pub fn send(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("event receiver dropped");
            return;
        }
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
    }
}
