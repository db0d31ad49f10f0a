use crate::preview::PreviewState;
use crate::theme::Theme;
use crate::ui::code::code_view;
use eframe::egui::{self, RichText, ScrollArea};

pub fn show_preview(ui: &mut egui::Ui, theme: &Theme, preview: &PreviewState) {
    ui.heading("Preview");
    ui.separator();

    let Some(document) = preview.document() else {
        if preview.is_loading() {
            ui.spinner();
        } else {
            ui.label(RichText::new("Click a file name to preview it").color(theme.text_muted));
        }
        return;
    };

    ui.horizontal(|ui| {
        ui.label(RichText::new(&document.path).monospace());
        ui.label(RichText::new(document.language).color(theme.text_muted).small());
        if preview.is_loading() {
            ui.spinner();
        }
    });
    ui.add_space(theme.spacing_4);

    theme.code_frame().show(ui, |ui| {
        ScrollArea::both()
            .id_salt("preview_body")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                code_view(ui, &document.content, document.language);
            });
    });
}
