use crate::theme::Theme;
use crate::ui::UiAction;
use crate::workspace::selection::SelectionState;
use eframe::egui::{self, RichText};

pub fn show_selected_files(
    ui: &mut egui::Ui,
    theme: &Theme,
    selection: &SelectionState,
    actions: &mut Vec<UiAction>,
) {
    ui.strong(format!("Selected files ({})", selection.len()));
    if selection.is_empty() {
        ui.label(RichText::new("Check files in the tree to send them as context").color(theme.text_muted));
        return;
    }

    for path in selection.paths() {
        ui.horizontal(|ui| {
            let remove = egui::Button::new(RichText::new("×").color(theme.text_on_accent))
                .fill(theme.danger)
                .small();
            if ui.add(remove).on_hover_text("Remove from context").clicked() {
                actions.push(UiAction::RemoveSelected(path.to_string()));
            }
            ui.label(RichText::new(path).monospace());
        });
    }
}
