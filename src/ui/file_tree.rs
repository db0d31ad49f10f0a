use crate::theme::Theme;
use crate::ui::UiAction;
use crate::workspace::folders::FolderStates;
use crate::workspace::selection::SelectionState;
use crate::workspace::tree::{partition_children, FileTreeNode};
use eframe::egui::{self, RichText, Sense};
use std::collections::BTreeMap;

pub fn show_file_tree(
    ui: &mut egui::Ui,
    theme: &Theme,
    tree: &FileTreeNode,
    folders: &FolderStates,
    selection: &SelectionState,
    actions: &mut Vec<UiAction>,
) {
    let FileTreeNode::Directory(children) = tree else {
        return;
    };
    show_level(ui, theme, children, "", folders, selection, actions);
}

fn show_level(
    ui: &mut egui::Ui,
    theme: &Theme,
    children: &BTreeMap<String, FileTreeNode>,
    prefix: &str,
    folders: &FolderStates,
    selection: &SelectionState,
    actions: &mut Vec<UiAction>,
) {
    let partitioned = partition_children(children);

    for (name, grandchildren) in partitioned.folders {
        let full_path = format!("{prefix}{name}");
        let expanded = folders.is_expanded(&full_path);
        ui.horizontal(|ui| {
            let arrow = if expanded { "▼" } else { "▶" };
            let toggle = ui.add(
                egui::Label::new(RichText::new(arrow).color(theme.text_muted)).sense(Sense::click()),
            );
            let label = ui.add(
                egui::Label::new(RichText::new(format!("{name}/")).strong()).sense(Sense::click()),
            );
            if toggle.clicked() || label.clicked() {
                actions.push(UiAction::ToggleFolder(full_path.clone()));
            }
        });
        if expanded {
            let child_prefix = format!("{full_path}/");
            ui.indent(full_path.as_str(), |ui| {
                show_level(ui, theme, grandchildren, &child_prefix, folders, selection, actions);
            });
        }
    }

    for (name, file) in partitioned.files {
        let path = format!("{prefix}{name}");
        ui.horizontal(|ui| {
            let mut checked = selection.is_checked(&path);
            if ui.checkbox(&mut checked, "").changed() {
                actions.push(UiAction::SetFileChecked {
                    path: path.clone(),
                    absolute_path: file.absolute_path.clone(),
                    checked,
                });
            }
            let label = ui
                .add(egui::Label::new(name).sense(Sense::click()))
                .on_hover_text(&file.relative_path);
            if label.clicked() {
                actions.push(UiAction::PreviewFile {
                    path: path.clone(),
                    absolute_path: file.absolute_path.clone(),
                });
            }
            if selection.is_pending(&path) {
                ui.spinner();
            }
        });
    }
}
