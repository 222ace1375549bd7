use crate::catalog::Catalog;
use crate::editor::mode::EditorMode;
use crate::editor::placement::{DropOutcome, PlacementError};
use crate::persistence::{LayoutRepository, PersistError};

use super::{StorePlanApp, settings};

impl StorePlanApp {
    pub(super) fn open_editor(&mut self, mode: EditorMode) {
        if !self.role.can_open(mode) {
            log::warn!("{} may not open the {}", self.role, mode.label());
            self.status = Some(format!("{} requires a manager or admin", mode.label()));
            return;
        }
        self.editor.toggle_editor(mode);
        self.canvas_drag = None;
    }

    pub(super) fn add_fixture(&mut self) {
        if !self.can_edit() {
            return;
        }
        let id = self.editor.add_fixture();
        self.status = Some(format!("Added fixture {id}"));
    }

    /// Deletes the selected vertex in edit mode, otherwise the selected fixture.
    pub(super) fn delete_selected(&mut self) {
        if !self.can_edit() || self.editor.active_mode() != EditorMode::Layout {
            return;
        }
        if self.editor.fixtures.is_edit_mode() && self.editor.selection().vertex().is_some() {
            if !self.editor.delete_selected_node() {
                self.status = Some("A fixture needs at least three vertices".to_string());
            }
            return;
        }
        if self.editor.delete_selected_fixture() {
            self.selected_cell = None;
        }
    }

    pub(super) fn toggle_fixture_mode(&mut self) {
        if !self.editor.toggle_fixture_mode() {
            self.status = Some("Select a fixture to enter Edit Mode".to_string());
        }
    }

    pub(super) fn add_node(&mut self) {
        if self.editor.add_node_to_selected_edge().is_none() {
            self.status = Some("Select an edge to add a vertex".to_string());
        }
    }

    pub(super) fn save_to_path(&mut self) {
        let layout = self.editor.layout();
        let repo = self.repository();
        let Some(worker) = self.save_worker.as_mut() else {
            self.status = Some(match repo.save(&layout) {
                Ok(()) => format!("Saved {}", self.layout_path),
                Err(e) => format!("Save failed: {e}"),
            });
            return;
        };
        match worker.request_save(Box::new(repo), layout) {
            Ok(()) => self.status = Some(format!("Saving {}…", self.layout_path)),
            Err(e) => {
                log::error!("Dropping save request: {e}");
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }

    /// Surfaces finished background saves. Editor state is never rolled back.
    pub(super) fn poll_saves(&mut self) {
        let Some(worker) = self.save_worker.as_mut() else {
            return;
        };
        for outcome in worker.poll() {
            self.status = Some(match outcome.result {
                Ok(()) => format!("Saved {}", outcome.target),
                Err(e) => format!("Save failed: {e}"),
            });
        }
    }

    pub(super) fn save_as_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("layout.json")
            .add_filter("JSON", &["json"])
            .save_file()
        {
            self.layout_path = path.display().to_string();
            self.persist_settings();
            self.save_to_path();
        }
    }

    pub(super) fn load_from_path(&mut self) {
        match self.repository().load() {
            Ok(layout) => {
                self.editor.load(layout);
                self.canvas_drag = None;
                self.selected_cell = None;
                self.status = Some(format!("Loaded {}", self.layout_path));
            }
            Err(e) => {
                log::error!("Loading {} failed: {e}", self.layout_path);
                self.status = Some(match e {
                    PersistError::Json(_) => format!("Parse failed: {e}"),
                    _ => format!("Read failed: {e}"),
                });
            }
        }
    }

    pub(super) fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            self.layout_path = path.display().to_string();
            self.persist_settings();
            self.load_from_path();
        }
    }

    /// Drops every fixture and placement, then saves the empty layout.
    pub(super) fn clear_layout(&mut self) {
        if !self.can_edit() {
            return;
        }
        self.editor.clear();
        self.canvas_drag = None;
        self.selected_cell = None;
        log::info!("Layout cleared");
        self.save_to_path();
    }

    pub(super) fn reload_catalog(&mut self) {
        match Catalog::load(std::path::Path::new(&self.catalog_path)) {
            Ok(catalog) => self.catalog = catalog,
            Err(e) => {
                log::error!("{e}");
                self.status = Some(format!("Catalog failed: {e}"));
            }
        }
    }

    pub(super) fn add_row(&mut self) {
        if let Some(edge) = self.editor.selected_edge_key() {
            self.editor.placement.add_row(&edge);
        }
    }

    pub(super) fn add_column(&mut self) {
        let (Some(edge), Some((row, _))) = (self.editor.selected_edge_key(), self.selected_cell) else {
            self.status = Some("Select a cell first".to_string());
            return;
        };
        self.editor.placement.add_column(&edge, row);
    }

    pub(super) fn remove_row(&mut self) {
        let (Some(edge), Some((row, _))) = (self.editor.selected_edge_key(), self.selected_cell) else {
            self.status = Some("Select a cell first".to_string());
            return;
        };
        if let Some(removed) = self.editor.placement.remove_row(&edge, row) {
            let lost: usize = removed.iter().map(|cell| cell.len()).sum();
            if lost > 0 {
                self.status = Some(format!("Removed row {row} with {lost} item(s)"));
            }
            self.selected_cell = None;
        }
    }

    pub(super) fn remove_column(&mut self) {
        let (Some(edge), Some((row, col))) = (self.editor.selected_edge_key(), self.selected_cell) else {
            self.status = Some("Select a cell first".to_string());
            return;
        };
        if let Some(removed) = self.editor.placement.remove_column(&edge, row, col) {
            if !removed.is_empty() {
                self.status = Some(format!("Removed column {col} with {} item(s)", removed.len()));
            }
            self.selected_cell = None;
        }
    }

    /// Places an item pasted as JSON into the selected cell.
    pub(super) fn paste_item(&mut self, text: &str) {
        let (Some(edge), Some((row, col))) = (self.editor.selected_edge_key(), self.selected_cell) else {
            return;
        };
        let placement = &mut self.editor.placement;
        let result = placement
            .begin_drag_from_transfer(text)
            .and_then(|()| placement.drop_on_cell(&edge, row, col));
        self.report_drop(result);
    }

    pub(super) fn report_drop(&mut self, result: Result<DropOutcome, PlacementError>) {
        self.status = Some(match result {
            Ok(DropOutcome::Placed { item_id, index }) => format!("Placed {item_id} at position {index}"),
            Ok(DropOutcome::Moved { item_id, index }) => format!("Moved {item_id} to position {index}"),
            Err(e) => e.to_string(),
        });
    }

    pub(super) fn settings_snapshot(&self) -> settings::AppSettings {
        settings::AppSettings {
            layout_path: self.layout_path.clone(),
            catalog_path: self.catalog_path.clone(),
            role: self.role,
            initial_editor: self.editor.active_mode(),
            show_axes: self.show_axes,
            vertex_handle_radius: self.vertex_handle_radius,
            edge_pick_tolerance: self.edge_pick_tolerance,
        }
    }

    pub(super) fn persist_settings(&mut self) {
        let snapshot = self.settings_snapshot();
        if let Err(e) = settings::save_settings(&self.settings_path, &snapshot) {
            self.status = Some(format!("Settings save failed: {e}"));
        }
    }

    pub(super) fn reload_settings(&mut self) {
        let settings = settings::load_settings(&self.settings_path)
            .or_else(|| settings::load_settings("settings.json"))
            .unwrap_or_default();
        self.catalog_path = settings.catalog_path;
        self.role = settings.role;
        self.show_axes = settings.show_axes;
        self.vertex_handle_radius = settings.vertex_handle_radius;
        self.edge_pick_tolerance = settings.edge_pick_tolerance;
        if settings.layout_path != self.layout_path {
            self.layout_path = settings.layout_path;
            self.load_from_path();
        }
        self.reload_catalog();
        self.status = Some(format!("Settings reloaded from {}", self.settings_path));
    }
}
