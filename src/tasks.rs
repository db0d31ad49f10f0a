use crate::event::{AppEvent, EventSink, ReadPurpose};
use crate::gateway::BackendGateway;
use crate::state::Effect;
use crate::workspace::scan_directory;
use std::collections::HashMap;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, info};

pub struct TaskRunner {
    runtime_handle: Handle,
    sink: EventSink,
    gateway: BackendGateway,
    selection_reads: HashMap<String, AbortHandle>,
    preview_read: Option<AbortHandle>,
}

impl TaskRunner {
    pub fn new(runtime_handle: Handle, sink: EventSink, gateway: BackendGateway) -> Self {
        Self {
            runtime_handle,
            sink,
            gateway,
            selection_reads: HashMap::new(),
            preview_read: None,
        }
    }

    pub fn gateway(&self) -> &BackendGateway {
        &self.gateway
    }

    pub fn run_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.run(effect);
        }
    }

    pub fn run(&mut self, effect: Effect) {
        match effect {
            Effect::PickDirectory => {
                let sink = self.sink.clone();
                self.runtime_handle.spawn(async move {
                    match rfd::AsyncFileDialog::new().pick_folder().await {
                        Some(folder) => {
                            sink.send(AppEvent::DirectoryChosen(folder.path().to_path_buf()))
                        }
                        None => debug!("directory picker dismissed"),
                    }
                });
            }
            Effect::ScanDirectory(root) => {
                let sink = self.sink.clone();
                self.runtime_handle.spawn(async move {
                    let scan_root = root.clone();
                    let result = match tokio::task::spawn_blocking(move || scan_directory(&scan_root)).await {
                        Ok(result) => result,
                        Err(err) => {
                            debug!(error = %err, "directory scan task ended early");
                            return;
                        }
                    };
                    sink.send(AppEvent::DirectoryScanned { root, result });
                });
            }
            Effect::ReadFile {
                purpose,
                path,
                absolute_path,
                token,
            } => {
                let sink = self.sink.clone();
                let event_path = path.clone();
                let task = self.runtime_handle.spawn(async move {
                    let result = tokio::fs::read(&absolute_path)
                        .await
                        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                        .map_err(|err| err.to_string());
                    sink.send(AppEvent::FileRead {
                        purpose,
                        path: event_path,
                        token,
                        result,
                    });
                });
                let abort = task.abort_handle();
                let previous = match purpose {
                    ReadPurpose::Selection => {
                        self.selection_reads.retain(|_, read| !read.is_finished());
                        self.selection_reads.insert(path, abort)
                    }
                    ReadPurpose::Preview => self.preview_read.replace(abort),
                };
                if let Some(previous) = previous {
                    previous.abort();
                }
            }
            Effect::CancelRead(path) => {
                if let Some(read) = self.selection_reads.remove(&path) {
                    read.abort();
                }
            }
            Effect::CancelAllReads => {
                for (_, read) in self.selection_reads.drain() {
                    read.abort();
                }
                if let Some(read) = self.preview_read.take() {
                    read.abort();
                }
            }
            Effect::Generate {
                prompt,
                file_context,
            } => {
                let sink = self.sink.clone();
                let gateway = self.gateway.clone();
                self.runtime_handle.spawn(async move {
                    let result = gateway.generate(&prompt, &file_context).await;
                    sink.send(AppEvent::GenerateFinished(result));
                });
            }
            Effect::Apply { file_path, code } => {
                info!(file_path = %file_path, "applying code");
                let sink = self.sink.clone();
                let gateway = self.gateway.clone();
                self.runtime_handle.spawn(async move {
                    let result = gateway.apply(&file_path, &code).await;
                    sink.send(AppEvent::ApplyFinished { file_path, result });
                });
            }
        }
    }
}
