use eframe::egui;
use egui_extras::syntax_highlighting::{code_view_ui, CodeTheme};

pub fn code_view(ui: &mut egui::Ui, code: &str, language: &str) {
    let theme = CodeTheme::from_memory(ui.ctx(), ui.style());
    code_view_ui(ui, &theme, code, language);
}
