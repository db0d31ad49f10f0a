use std::path::PathBuf;

pub mod code;
pub mod file_tree;
pub mod preview;
pub mod selected;
pub mod transcript;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    PickDirectory,
    OpenDirectory(PathBuf),
    ForgetLastDirectory,
    ToggleFolder(String),
    ExpandAll,
    PreviewFile {
        path: String,
        absolute_path: PathBuf,
    },
    SetFileChecked {
        path: String,
        absolute_path: PathBuf,
        checked: bool,
    },
    RemoveSelected(String),
    SubmitPrompt,
    ApplyCode {
        file_path: String,
        code: String,
    },
}
