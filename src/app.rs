use crate::event::AppEvent;
use crate::state::{AppState, Effect};
use crate::tasks::TaskRunner;
use crate::theme::Theme;
use crate::ui::file_tree::show_file_tree;
use crate::ui::preview::show_preview;
use crate::ui::selected::show_selected_files;
use crate::ui::transcript::show_transcript;
use crate::ui::UiAction;
use eframe::egui::{self, RichText, ScrollArea};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

pub struct CodepilotApp {
    rx: Receiver<AppEvent>,
    state: AppState,
    runner: TaskRunner,
    theme: Theme,
    actions: Vec<UiAction>,
}

impl CodepilotApp {
    pub fn new(
        ctx: &egui::Context,
        rx: Receiver<AppEvent>,
        state: AppState,
        runner: TaskRunner,
        initial_effects: Vec<Effect>,
    ) -> Self {
        let theme = Theme::default();
        theme.apply_visuals(ctx);
        let mut app = Self {
            rx,
            state,
            runner,
            theme,
            actions: Vec::new(),
        };
        app.runner.run_all(initial_effects);
        app
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    let effects = self.state.handle_event(event);
                    self.runner.run_all(effects);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.state.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_actions(&mut self) {
        for action in std::mem::take(&mut self.actions) {
            let effects = self.state.handle_action(action);
            self.runner.run_all(effects);
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Codepilot");
                ui.separator();
                ui.label(RichText::new(self.runner.gateway().base_url()).color(self.theme.text_muted));
                if self.state.is_waiting() {
                    ui.separator();
                    ui.spinner();
                    ui.label(RichText::new("Waiting for backend...").color(self.theme.warning));
                }
            });
        });
    }

    fn render_left_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("files_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("Files");
                ui.separator();

                if ui.button("Open folder…").clicked() {
                    self.actions.push(UiAction::PickDirectory);
                }
                ui.horizontal(|ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.state.path_input)
                            .desired_width(ui.available_width() - 60.0)
                            .hint_text("/path/to/project"),
                    );
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let path = self.state.path_input.trim();
                    if (ui.button("Open").clicked() || submitted) && !path.is_empty() {
                        self.actions.push(UiAction::OpenDirectory(PathBuf::from(path)));
                    }
                });

                if self.state.root.is_none() {
                    if let Some(last) = &self.state.last_directory {
                        ui.add_space(self.theme.spacing_8);
                        self.theme.card_frame().show(ui, |ui| {
                            ui.label(format!("Last opened directory: {}", last.name));
                            ui.horizontal(|ui| {
                                if ui.button("Reopen…").clicked() {
                                    self.actions.push(UiAction::PickDirectory);
                                }
                                if ui.small_button("Forget").clicked() {
                                    self.actions.push(UiAction::ForgetLastDirectory);
                                }
                            });
                        });
                    }
                }

                ui.separator();
                let tree_height = (ui.available_height() * 0.6).max(120.0);
                if self.state.tree.is_empty() {
                    ui.label(RichText::new("No directory open").color(self.theme.text_muted));
                } else {
                    if ui.small_button("Expand all").clicked() {
                        self.actions.push(UiAction::ExpandAll);
                    }
                    ScrollArea::vertical()
                        .id_salt("file_tree")
                        .max_height(tree_height)
                        .auto_shrink([false; 2])
                        .show(ui, |ui| {
                            show_file_tree(
                                ui,
                                &self.theme,
                                &self.state.tree,
                                &self.state.folders,
                                &self.state.selection,
                                &mut self.actions,
                            );
                        });
                }

                ui.separator();
                ScrollArea::vertical()
                    .id_salt("selected_files")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        show_selected_files(ui, &self.theme, &self.state.selection, &mut self.actions);
                    });
            });
    }

    fn render_right_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("preview_panel")
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| {
                show_preview(ui, &self.theme, &self.state.preview);
            });
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Chat");
            ui.separator();

            let transcript_height = (ui.available_height() - 190.0).max(120.0);
            show_transcript(
                ui,
                &self.theme,
                &mut self.state.transcript,
                transcript_height,
                &mut self.actions,
            );

            ui.separator();
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(90.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in &self.state.diagnostics {
                                ui.label(entry);
                            }
                        });
                });

            ui.separator();
            self.render_composer(ui);
        });
    }

    fn render_composer(&mut self, ui: &mut egui::Ui) {
        let composer_id = egui::Id::new("prompt_composer");
        let focused = ui.memory(|memory| memory.has_focus(composer_id));
        // Plain Enter sends; it has to be consumed before the text edit sees it.
        let mut send_now = focused
            && ui.ctx().input_mut(|i| {
                let pressed = i.key_pressed(egui::Key::Enter) && !i.modifiers.shift;
                if pressed {
                    i.consume_key(egui::Modifiers::NONE, egui::Key::Enter);
                }
                pressed
            });

        self.theme.composer_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.state.prompt)
                        .id(composer_id)
                        .desired_rows(3)
                        .desired_width(ui.available_width() - 70.0)
                        .hint_text("Describe the change... (Shift+Enter for a new line)"),
                );
                let send = egui::Button::new(RichText::new("Send").color(self.theme.text_on_accent))
                    .fill(self.theme.accent_primary);
                send_now |= ui
                    .add_enabled(!self.state.prompt.trim().is_empty(), send)
                    .clicked();
            });
        });

        if send_now {
            self.actions.push(UiAction::SubmitPrompt);
        }
    }
}

impl eframe::App for CodepilotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.render_top_bar(ctx);
        self.render_left_panel(ctx);
        self.render_right_panel(ctx);
        self.render_center_panel(ctx);
        self.apply_actions();
    }
}
