use crate::chat::fence::CodeBlock;
use crate::chat::markdown::{BlockKind, InlineSpan, MarkdownBlock};
use crate::chat::{RenderedPart, Transcript, TranscriptEntry};
use crate::preview::language_for_hint;
use crate::theme::Theme;
use crate::ui::code::code_view;
use crate::ui::UiAction;
use eframe::egui::{self, RichText, ScrollArea};

pub fn show_transcript(
    ui: &mut egui::Ui,
    theme: &Theme,
    transcript: &mut Transcript,
    max_height: f32,
    actions: &mut Vec<UiAction>,
) {
    let scroll_to_bottom = transcript.take_scroll_request();
    ScrollArea::vertical()
        .id_salt("chat_transcript")
        .max_height(max_height)
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            if transcript.entries().is_empty() {
                ui.label(
                    RichText::new("Select files for context, then describe the change you want.")
                        .color(theme.text_muted),
                );
            }
            for entry in transcript.entries() {
                show_entry(ui, theme, entry, actions);
                ui.add_space(theme.spacing_8);
            }
            if scroll_to_bottom {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });
}

fn show_entry(ui: &mut egui::Ui, theme: &Theme, entry: &TranscriptEntry, actions: &mut Vec<UiAction>) {
    theme.card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        let sender = entry.message.sender;
        ui.label(
            RichText::new(sender.label())
                .color(theme.sender_color(sender))
                .strong(),
        );
        for part in &entry.parts {
            match part {
                RenderedPart::Markdown(blocks) => show_markdown(ui, theme, blocks),
                RenderedPart::Code(block) => show_code_block(ui, theme, block, actions),
            }
        }
        if let Some(warning) = entry.warning {
            ui.label(RichText::new(warning.message()).color(theme.warning).small());
        }
    });
}

fn show_code_block(ui: &mut egui::Ui, theme: &Theme, block: &CodeBlock, actions: &mut Vec<UiAction>) {
    theme.code_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            let path_color = if block.has_path() {
                theme.text_primary
            } else {
                theme.text_muted
            };
            ui.label(RichText::new(&block.path).monospace().color(path_color));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let apply = egui::Button::new(RichText::new("Apply").color(theme.text_on_accent))
                    .fill(theme.accent_primary);
                if ui.add(apply).on_hover_text("Send this code to the backend").clicked() {
                    actions.push(UiAction::ApplyCode {
                        file_path: block.path.clone(),
                        code: block.body.clone(),
                    });
                }
            });
        });
        ui.separator();
        code_view(ui, &block.body, block.language);
    });
}

fn show_markdown(ui: &mut egui::Ui, theme: &Theme, blocks: &[MarkdownBlock]) {
    for block in blocks {
        let indent = block.quote_depth as f32 * theme.spacing_12;
        match &block.kind {
            BlockKind::Heading(level) => {
                let size = match *level {
                    1 => 20.0,
                    2 => 18.0,
                    _ => 16.0,
                };
                ui.label(RichText::new(block.plain_text()).size(size).strong());
            }
            BlockKind::Rule => {
                ui.separator();
            }
            BlockKind::CodeBlock { language } => {
                theme.code_frame().show(ui, |ui| {
                    code_view(ui, &block.plain_text(), language_for_hint(language));
                });
            }
            BlockKind::ListItem { depth, marker } => {
                ui.horizontal_wrapped(|ui| {
                    ui.add_space(indent + *depth as f32 * theme.spacing_12);
                    ui.label(RichText::new(marker).color(theme.text_muted));
                    show_spans(ui, theme, &block.spans, block.quote_depth > 0);
                });
            }
            BlockKind::Paragraph => {
                ui.horizontal_wrapped(|ui| {
                    ui.add_space(indent);
                    show_spans(ui, theme, &block.spans, block.quote_depth > 0);
                });
            }
        }
    }
}

fn show_spans(ui: &mut egui::Ui, theme: &Theme, spans: &[InlineSpan], quoted: bool) {
    ui.spacing_mut().item_spacing.x = 0.0;
    for span in spans {
        let mut text = RichText::new(&span.text);
        if span.style.bold {
            text = text.strong();
        }
        if span.style.italic || quoted {
            text = text.italics();
        }
        if span.style.code {
            text = text.code();
        }
        if span.style.strikethrough {
            text = text.strikethrough();
        }
        if span.style.link {
            text = text.underline().color(theme.accent_primary);
        } else if quoted {
            text = text.color(theme.text_muted);
        }
        ui.label(text);
    }
}
