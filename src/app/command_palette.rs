use crate::editor::mode::EditorMode;
use eframe::egui;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::StorePlanApp;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum CommandId {
    OpenInventory,
    OpenLayout,
    OpenItemMap,
    AddFixture,
    DeleteSelection,
    ObjectMode,
    EditMode,
    AddNode,
    DeleteNode,
    AddRow,
    Save,
    SaveAs,
    Open,
    Reload,
    ClearLayout,
    ReloadCatalog,
    ToggleAxes,
    ReloadSettings,
    Help,
}

pub(super) struct CommandSpec {
    pub id: CommandId,
    pub name: &'static str,
    pub search: &'static str,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec { id: CommandId::OpenInventory, name: "Editor: Inventory", search: "inventory editor products open 1" },
    CommandSpec { id: CommandId::OpenLayout, name: "Editor: Layout", search: "layout editor fixtures open 2" },
    CommandSpec { id: CommandId::OpenItemMap, name: "Editor: Item Map", search: "item map editor shelves grid open 3" },
    CommandSpec { id: CommandId::AddFixture, name: "Fixture: Add", search: "add new fixture shelf n" },
    CommandSpec { id: CommandId::DeleteSelection, name: "Fixture: Delete", search: "delete remove fixture" },
    CommandSpec { id: CommandId::ObjectMode, name: "Mode: Object", search: "object mode tab" },
    CommandSpec { id: CommandId::EditMode, name: "Mode: Edit", search: "edit mode vertices edges tab" },
    CommandSpec { id: CommandId::AddNode, name: "Edge: Add node at midpoint", search: "add node vertex edge midpoint split" },
    CommandSpec { id: CommandId::DeleteNode, name: "Vertex: Delete node", search: "delete node vertex remove" },
    CommandSpec { id: CommandId::AddRow, name: "Shelf: Add row", search: "add row shelf grid item map" },
    CommandSpec { id: CommandId::Save, name: "File: Save", search: "save layout json" },
    CommandSpec { id: CommandId::SaveAs, name: "File: Save As", search: "save as layout json file" },
    CommandSpec { id: CommandId::Open, name: "File: Open", search: "open load layout json file" },
    CommandSpec { id: CommandId::Reload, name: "File: Reload", search: "reload revert layout" },
    CommandSpec { id: CommandId::ClearLayout, name: "File: Clear layout", search: "clear reset empty layout" },
    CommandSpec { id: CommandId::ReloadCatalog, name: "Catalog: Reload products", search: "reload catalog products inventory" },
    CommandSpec { id: CommandId::ToggleAxes, name: "View: Toggle axes", search: "axes view toggle scale" },
    CommandSpec { id: CommandId::ReloadSettings, name: "Settings: Reload", search: "settings reload config" },
    CommandSpec { id: CommandId::Help, name: "Help: Shortcuts", search: "help shortcuts keys f1" },
];

#[derive(Default)]
pub(super) struct CommandPalette {
    pub open: bool,
    pub query: String,
    pub selected: usize,
    request_focus: bool,
}

#[derive(Clone, Copy)]
pub(super) struct CommandContext {
    pub can_edit: bool,
    pub has_fixture: bool,
    pub has_edge: bool,
    pub has_vertex: bool,
    pub edit_mode: bool,
}

impl CommandPalette {
    pub fn open(&mut self, query: impl Into<String>) {
        self.open = true;
        self.query = query.into();
        self.selected = 0;
        self.request_focus = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.selected = 0;
        self.request_focus = false;
    }

    fn is_enabled(cx: CommandContext, id: CommandId) -> bool {
        match id {
            CommandId::OpenInventory | CommandId::OpenLayout | CommandId::OpenItemMap => cx.can_edit,
            CommandId::AddFixture => cx.can_edit,
            CommandId::ClearLayout => cx.can_edit,
            CommandId::DeleteSelection => cx.can_edit && cx.has_fixture,
            CommandId::ObjectMode => cx.edit_mode,
            CommandId::EditMode => cx.has_fixture && !cx.edit_mode,
            CommandId::AddNode | CommandId::AddRow => cx.can_edit && cx.has_edge,
            CommandId::DeleteNode => cx.can_edit && cx.has_vertex,
            _ => true,
        }
    }

    pub(super) fn execute(app: &mut StorePlanApp, ctx: &egui::Context, id: CommandId) {
        match id {
            CommandId::OpenInventory => app.open_editor(EditorMode::Inventory),
            CommandId::OpenLayout => app.open_editor(EditorMode::Layout),
            CommandId::OpenItemMap => app.open_editor(EditorMode::ItemMap),
            CommandId::AddFixture => app.add_fixture(),
            CommandId::DeleteSelection => {
                if app.editor.delete_selected_fixture() {
                    app.selected_cell = None;
                }
            }
            CommandId::ObjectMode | CommandId::EditMode => app.toggle_fixture_mode(),
            CommandId::AddNode => app.add_node(),
            CommandId::DeleteNode => {
                if !app.editor.delete_selected_node() {
                    app.status = Some("A fixture needs at least three vertices".to_string());
                }
            }
            CommandId::AddRow => app.add_row(),
            CommandId::Save => app.save_to_path(),
            CommandId::SaveAs => app.save_as_dialog(),
            CommandId::Open => app.open_dialog(),
            CommandId::Reload => app.load_from_path(),
            CommandId::ClearLayout => app.clear_layout(),
            CommandId::ReloadCatalog => app.reload_catalog(),
            CommandId::ToggleAxes => {
                app.show_axes = !app.show_axes;
                app.persist_settings();
            }
            CommandId::ReloadSettings => app.reload_settings(),
            CommandId::Help => app.show_help = true,
        }
        ctx.request_repaint();
    }

    fn filtered(&self) -> Vec<(&'static CommandSpec, i64)> {
        let matcher = SkimMatcherV2::default();
        let q = self.query.trim();
        if q.is_empty() {
            return COMMANDS.iter().map(|c| (c, 0)).collect();
        }
        let mut out = Vec::new();
        for c in COMMANDS {
            if let Some(score) = matcher.fuzzy_match(c.search, q) {
                out.push((c, score));
            }
        }
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.name.cmp(b.0.name)));
        out
    }

    /// Arrow keys move the highlight, Escape closes. Returns whether Enter was pressed.
    fn navigate(&mut self, ctx: &egui::Context, count: usize) -> Option<bool> {
        let (escape, down, up, enter) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::ArrowDown),
                i.key_pressed(egui::Key::ArrowUp),
                i.key_pressed(egui::Key::Enter),
            )
        });
        if escape {
            self.close();
            return None;
        }
        self.selected = self.selected.min(count.saturating_sub(1));
        if count > 0 {
            if down {
                self.selected = (self.selected + 1) % count;
            }
            if up {
                self.selected = self.selected.checked_sub(1).unwrap_or(count - 1);
            }
        }
        Some(enter)
    }

    pub fn ui(&mut self, ctx: &egui::Context, cx: CommandContext) -> Option<CommandId> {
        if !self.open {
            return None;
        }
        let matches = self.filtered();
        let mut run = self.navigate(ctx, matches.len())?;

        let size = egui::vec2(460.0, 300.0);
        let screen = ctx.content_rect();
        egui::Area::new(egui::Id::new("command_palette"))
            .fixed_pos(egui::pos2(screen.center().x - size.x / 2.0, screen.top() + 40.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).inner_margin(8.0).show(ui, |ui| {
                    ui.set_min_size(size);
                    let query = ui.add(
                        egui::TextEdit::singleline(&mut self.query)
                            .desired_width(f32::INFINITY)
                            .hint_text("Type a command"),
                    );
                    if std::mem::take(&mut self.request_focus) {
                        query.request_focus();
                    }
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .max_height(size.y - 56.0)
                        .show(ui, |ui| {
                            for (idx, (command, _)) in matches.iter().enumerate() {
                                let row = ui.add_enabled(
                                    Self::is_enabled(cx, command.id),
                                    egui::Button::new(command.name)
                                        .selected(idx == self.selected)
                                        .min_size(egui::vec2(ui.available_width(), 0.0)),
                                );
                                if row.clicked() {
                                    self.selected = idx;
                                    run = true;
                                }
                            }
                        });
                });
            });

        let (command, _) = matches.get(self.selected).filter(|_| run)?;
        if !Self::is_enabled(cx, command.id) {
            return None;
        }
        let id = command.id;
        self.close();
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> CommandContext {
        CommandContext {
            can_edit: true,
            has_fixture: false,
            has_edge: false,
            has_vertex: false,
            edit_mode: false,
        }
    }

    #[test]
    fn query_ranks_matching_commands() {
        let mut palette = CommandPalette::default();
        palette.open("add node");
        let matches = palette.filtered();
        assert_eq!(matches[0].0.id, CommandId::AddNode);
    }

    #[test]
    fn geometry_commands_follow_selection() {
        let cx = idle();
        assert!(!CommandPalette::is_enabled(cx, CommandId::EditMode));
        assert!(!CommandPalette::is_enabled(cx, CommandId::AddNode));
        let cx = CommandContext {
            has_fixture: true,
            has_edge: true,
            edit_mode: true,
            ..cx
        };
        assert!(CommandPalette::is_enabled(cx, CommandId::AddNode));
        assert!(CommandPalette::is_enabled(cx, CommandId::ObjectMode));
    }

    #[test]
    fn read_only_roles_cannot_edit() {
        let cx = CommandContext {
            can_edit: false,
            ..idle()
        };
        assert!(!CommandPalette::is_enabled(cx, CommandId::OpenLayout));
        assert!(!CommandPalette::is_enabled(cx, CommandId::OpenInventory));
        assert!(CommandPalette::is_enabled(cx, CommandId::Save));
    }
}
