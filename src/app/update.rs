use crate::editor::mode::{EditorMode, FixtureEditMode};
use eframe::egui;

use super::command_palette::{CommandContext, CommandPalette};
use super::help::draw_help_window;
use super::render::{
    draw_axes, draw_background, draw_edit_overlay, draw_fixtures, draw_origin_crosshair,
    pointer_label,
};
use super::StorePlanApp;

/// Keyboard actions read under the input lock and applied after it is released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shortcut {
    Palette,
    Save,
    SaveAs,
    Open,
    Help,
    Editor(EditorMode),
    Deselect,
    AddFixture,
    ToggleMode,
    AddNode,
    Delete,
}

fn read_shortcuts(i: &mut egui::InputState, canvas_keys: bool, active: EditorMode) -> Vec<Shortcut> {
    let cmd = egui::Modifiers::COMMAND;
    let cmd_shift = egui::Modifiers::COMMAND | egui::Modifiers::SHIFT;
    let none = egui::Modifiers::NONE;
    let mut out = Vec::new();

    if i.consume_key(cmd_shift, egui::Key::P) {
        out.push(Shortcut::Palette);
    }
    if i.consume_key(cmd_shift, egui::Key::S) {
        out.push(Shortcut::SaveAs);
    } else if i.consume_key(cmd, egui::Key::S) {
        out.push(Shortcut::Save);
    }
    if i.consume_key(cmd, egui::Key::O) {
        out.push(Shortcut::Open);
    }
    if i.consume_key(none, egui::Key::F1) {
        out.push(Shortcut::Help);
    }
    if !canvas_keys {
        return out;
    }

    for (key, mode) in [
        (egui::Key::Num1, EditorMode::Inventory),
        (egui::Key::Num2, EditorMode::Layout),
        (egui::Key::Num3, EditorMode::ItemMap),
    ] {
        if i.consume_key(none, key) {
            out.push(Shortcut::Editor(mode));
        }
    }
    if i.consume_key(none, egui::Key::Escape) {
        out.push(Shortcut::Deselect);
    }
    if active != EditorMode::Inventory && i.consume_key(none, egui::Key::Tab) {
        out.push(Shortcut::ToggleMode);
    }
    if active != EditorMode::Layout {
        return out;
    }
    if i.consume_key(none, egui::Key::N) {
        out.push(Shortcut::AddFixture);
    }
    if i.consume_key(none, egui::Key::E) {
        out.push(Shortcut::AddNode);
    }
    if i.consume_key(none, egui::Key::Delete) || i.consume_key(none, egui::Key::Backspace) {
        out.push(Shortcut::Delete);
    }
    out
}

impl StorePlanApp {
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let canvas_keys = !ctx.wants_keyboard_input() && !self.command_palette.open;
        let active = self.editor.active_mode();

        let (shortcuts, pasted) = ctx.input_mut(|i| {
            let pasted: Vec<String> = if canvas_keys && active == EditorMode::ItemMap {
                i.events
                    .iter()
                    .filter_map(|event| match event {
                        egui::Event::Paste(text) => Some(text.clone()),
                        _ => None,
                    })
                    .collect()
            } else {
                Vec::new()
            };
            (read_shortcuts(i, canvas_keys, active), pasted)
        });

        for shortcut in shortcuts {
            match shortcut {
                Shortcut::Palette => {
                    if !self.command_palette.open {
                        self.command_palette.open("");
                    }
                }
                Shortcut::Save => self.save_to_path(),
                Shortcut::SaveAs => self.save_as_dialog(),
                Shortcut::Open => self.open_dialog(),
                Shortcut::Help => self.show_help = true,
                Shortcut::Editor(mode) => self.open_editor(mode),
                Shortcut::Deselect => {
                    if self.editor.fixture_mode() == FixtureEditMode::Edit {
                        self.editor.toggle_fixture_mode();
                    }
                    self.editor.deselect();
                    self.selected_cell = None;
                }
                Shortcut::AddFixture => self.add_fixture(),
                Shortcut::ToggleMode => self.toggle_fixture_mode(),
                Shortcut::AddNode => self.add_node(),
                Shortcut::Delete => self.delete_selected(),
            }
        }
        for text in pasted {
            self.paste_item(&text);
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save (⌘S)").clicked() {
                        self.save_to_path();
                        ui.close_menu();
                    }
                    if ui.button("Save As… (⌘⇧S)").clicked() {
                        self.save_as_dialog();
                        ui.close_menu();
                    }
                    if ui.button("Open… (⌘O)").clicked() {
                        self.open_dialog();
                        ui.close_menu();
                    }
                    if ui.button("Reload").clicked() {
                        self.load_from_path();
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.small("Layout file:");
                    if ui.text_edit_singleline(&mut self.layout_path).lost_focus() {
                        self.persist_settings();
                    }
                    ui.small("Product catalog:");
                    if ui.text_edit_singleline(&mut self.catalog_path).lost_focus() {
                        self.persist_settings();
                        self.reload_catalog();
                    }
                    ui.separator();
                    if ui
                        .add_enabled(self.can_edit(), egui::Button::new("Clear Layout"))
                        .clicked()
                    {
                        self.clear_layout();
                        ui.close_menu();
                    }
                    if ui.button("Reload Settings").clicked() {
                        self.reload_settings();
                        ui.close_menu();
                    }
                });
                ui.menu_button("Editor", |ui| {
                    for mode in EditorMode::ALL {
                        let enabled = self.role.can_open(mode);
                        let open = self.editor.modes.is_open(mode);
                        if ui
                            .add_enabled(enabled, egui::Button::new(mode.label()).selected(open))
                            .clicked()
                        {
                            self.open_editor(mode);
                            ui.close_menu();
                        }
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut self.show_axes, "Show axes").changed() {
                        self.persist_settings();
                    }
                    if ui.button("Reset pan").clicked() {
                        self.view = Default::default();
                        ui.close_menu();
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("Shortcuts (F1)").clicked() {
                        self.show_help = true;
                        ui.close_menu();
                    }
                    if ui.button("Command Palette (⌘⇧P)").clicked() {
                        self.command_palette.open("");
                        ui.close_menu();
                    }
                });
                ui.separator();
                ui.label(self.editor.active_mode().label());
            });
        });
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    ui.label(status);
                } else {
                    ui.label("Ready");
                }
                if self.save_worker.as_ref().is_some_and(|w| w.is_saving()) {
                    ui.spinner();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Role: {}", self.role));
                    ui.separator();
                    ui.label(format!("Items: {}", self.editor.placement.item_count()));
                    ui.separator();
                    ui.label(self.fixture_count_label());
                    ui.separator();
                    ui.label(self.editor.fixture_mode().label());
                    if let Some(world) = self.last_pointer_world {
                        ui.separator();
                        ui.monospace(pointer_label(world));
                    }
                });
            });
        });
    }

    fn canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
                let origin = rect.min;
                let painter = ui.painter_at(rect);

                self.handle_canvas_input(ctx, &response, origin);
                self.last_pointer_world = response
                    .hover_pos()
                    .map(|p| self.view.screen_to_world(origin, p));

                draw_background(&painter, rect, &self.view);
                draw_fixtures(&painter, origin, &self.view, &self.editor);
                draw_edit_overlay(
                    &painter,
                    origin,
                    &self.view,
                    &self.editor,
                    self.vertex_handle_radius,
                );
                draw_origin_crosshair(&painter, origin, &self.view, &self.editor);
                if self.show_axes {
                    draw_axes(&painter, rect);
                }
            });
    }
}

impl eframe::App for StorePlanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_saves();
        self.handle_shortcuts(ctx);

        self.menu_bar(ctx);
        self.status_bar(ctx);

        egui::SidePanel::right("right_panel")
            .resizable(true)
            .min_width(240.0)
            .show(ctx, |ui| {
                self.editor_switcher(ui);
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.sidebar(ui);
                });
            });

        if self.editor.active_mode() == EditorMode::ItemMap
            && self.role.can_open(EditorMode::ItemMap)
        {
            egui::TopBottomPanel::bottom("item_map")
                .resizable(true)
                .default_height(260.0)
                .show(ctx, |ui| {
                    self.item_map_panel(ui);
                });
        }

        self.canvas(ctx);

        let cx = CommandContext {
            can_edit: self.can_edit(),
            has_fixture: self.editor.selection().fixture().is_some(),
            has_edge: self.editor.selection().edge().is_some(),
            has_vertex: self.editor.selection().vertex().is_some(),
            edit_mode: self.editor.fixtures.is_edit_mode(),
        };
        if let Some(cmd) = self.command_palette.ui(ctx, cx) {
            CommandPalette::execute(self, ctx, cmd);
        }
        draw_help_window(ctx, &mut self.show_help);

        self.settle_item_drag(ctx);
        if self.save_worker.as_ref().is_some_and(|w| w.is_saving()) {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
