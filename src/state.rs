use crate::cache::{Cache, WorkDirectoryInfo};
use crate::chat::{compose_user_message, Sender, Transcript};
use crate::event::{AppEvent, ReadPurpose};
use crate::preview::PreviewState;
use crate::ui::UiAction;
use crate::workspace::folders::FolderStates;
use crate::workspace::selection::{ReadToken, SelectionState};
use crate::workspace::tree::{build_file_tree, FileTreeNode};
use crate::workspace::work_directory_info;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PickDirectory,
    ScanDirectory(PathBuf),
    ReadFile {
        purpose: ReadPurpose,
        path: String,
        absolute_path: PathBuf,
        token: ReadToken,
    },
    CancelRead(String),
    CancelAllReads,
    Generate {
        prompt: String,
        file_context: BTreeMap<String, String>,
    },
    Apply {
        file_path: String,
        code: String,
    },
}

pub struct AppState {
    cache: Cache,
    pub folders: FolderStates,
    pub selection: SelectionState,
    pub preview: PreviewState,
    pub transcript: Transcript,
    pub tree: FileTreeNode,
    pub root: Option<PathBuf>,
    pub last_directory: Option<WorkDirectoryInfo>,
    pub prompt: String,
    pub path_input: String,
    pub diagnostics: Vec<String>,
    pub requests_in_flight: usize,
}

fn timestamp() -> String {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_secs().to_string(),
        Err(_) => "0".to_string(),
    }
}

impl AppState {
    pub fn new(cache: Cache) -> Self {
        let folders = FolderStates::load(&cache);
        let last_directory = cache.load_work_directory();
        Self {
            cache,
            folders,
            selection: SelectionState::default(),
            preview: PreviewState::default(),
            transcript: Transcript::default(),
            tree: FileTreeNode::default(),
            root: None,
            last_directory,
            prompt: String::new(),
            path_input: String::new(),
            diagnostics: Vec::new(),
            requests_in_flight: 0,
        }
    }

    pub fn log_diagnostic(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.diagnostics.push(format!("[{}] {}", timestamp(), message));
    }

    pub fn handle_action(&mut self, action: UiAction) -> Vec<Effect> {
        match action {
            UiAction::PickDirectory => vec![Effect::PickDirectory],
            UiAction::OpenDirectory(path) => vec![Effect::ScanDirectory(path)],
            UiAction::ForgetLastDirectory => {
                if let Err(err) = self.cache.clear_work_directory() {
                    self.log_diagnostic(format!("failed to clear cached directory: {err}"));
                }
                self.last_directory = None;
                Vec::new()
            }
            UiAction::ToggleFolder(folder_path) => {
                match self.folders.toggle(&folder_path, &mut self.cache) {
                    Ok(expanded) => info!(folder = %folder_path, expanded, "folder toggled"),
                    Err(err) => self.log_diagnostic(format!("failed to persist folder state: {err}")),
                }
                Vec::new()
            }
            UiAction::ExpandAll => {
                if let Err(err) = self.folders.reset(&mut self.cache) {
                    self.log_diagnostic(format!("failed to reset folder states: {err}"));
                }
                Vec::new()
            }
            UiAction::PreviewFile {
                path,
                absolute_path,
            } => {
                let token = self.preview.request();
                vec![Effect::ReadFile {
                    purpose: ReadPurpose::Preview,
                    path,
                    absolute_path,
                    token,
                }]
            }
            UiAction::SetFileChecked {
                path,
                absolute_path,
                checked: true,
            } => {
                let token = self.selection.begin_read(&path);
                vec![Effect::ReadFile {
                    purpose: ReadPurpose::Selection,
                    path,
                    absolute_path,
                    token,
                }]
            }
            UiAction::SetFileChecked {
                path,
                checked: false,
                ..
            }
            | UiAction::RemoveSelected(path) => {
                self.selection.deselect(&path);
                vec![Effect::CancelRead(path)]
            }
            UiAction::SubmitPrompt => self.submit_prompt(),
            UiAction::ApplyCode { file_path, code } => {
                self.requests_in_flight += 1;
                vec![Effect::Apply { file_path, code }]
            }
        }
    }

    fn submit_prompt(&mut self) -> Vec<Effect> {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            return Vec::new();
        }
        self.transcript
            .append(Sender::User, compose_user_message(&prompt, self.selection.paths()));
        self.prompt.clear();
        self.requests_in_flight += 1;
        vec![Effect::Generate {
            prompt,
            file_context: self.selection.snapshot(),
        }]
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::DirectoryChosen(root) => vec![Effect::ScanDirectory(root)],
            AppEvent::DirectoryScanned { root, result } => match result {
                Ok(files) if files.is_empty() => {
                    self.log_diagnostic(format!("{} contains no files", root.display()));
                    Vec::new()
                }
                Ok(files) => {
                    info!(root = %root.display(), files = files.len(), "directory opened");
                    self.selection.clear();
                    self.preview.clear();
                    if let Some(info) = work_directory_info(&files) {
                        if let Err(err) = self.cache.save_work_directory(&info) {
                            self.log_diagnostic(format!("failed to cache directory: {err}"));
                        }
                        self.last_directory = Some(info);
                    }
                    self.tree = build_file_tree(&files);
                    self.path_input = root.display().to_string();
                    self.root = Some(root);
                    vec![Effect::CancelAllReads]
                }
                Err(err) => {
                    self.transcript
                        .append(Sender::Error, format!("Could not open directory: {err}"));
                    Vec::new()
                }
            },
            AppEvent::FileRead {
                purpose: ReadPurpose::Selection,
                path,
                token,
                result,
            } => {
                match result {
                    Ok(content) => {
                        self.selection.complete_read(&path, token, content);
                    }
                    Err(err) => {
                        if self.selection.fail_read(&path, token) {
                            self.transcript
                                .append(Sender::Error, format!("Could not read {path}: {err}"));
                        }
                    }
                }
                Vec::new()
            }
            AppEvent::FileRead {
                purpose: ReadPurpose::Preview,
                path,
                token,
                result,
            } => {
                match result {
                    Ok(content) => {
                        self.preview.show(token, &path, content);
                    }
                    Err(err) => {
                        if self.preview.fail(token) {
                            self.transcript
                                .append(Sender::Error, format!("Could not preview {path}: {err}"));
                        }
                    }
                }
                Vec::new()
            }
            AppEvent::GenerateFinished(result) => {
                self.requests_in_flight = self.requests_in_flight.saturating_sub(1);
                match result {
                    Ok(reply) => self.transcript.append(Sender::Assistant, reply),
                    Err(err) => self.transcript.append(Sender::Error, err.user_message()),
                }
                Vec::new()
            }
            AppEvent::ApplyFinished { file_path, result } => {
                self.requests_in_flight = self.requests_in_flight.saturating_sub(1);
                match result {
                    Ok(message) => self.transcript.append(Sender::System, message),
                    Err(err) => {
                        warn!(file_path = %file_path, error = %err, "apply failed");
                        self.transcript.append(Sender::Error, err.user_message());
                    }
                }
                Vec::new()
            }
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.requests_in_flight > 0
    }
}
