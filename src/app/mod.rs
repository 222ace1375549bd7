use crate::catalog::Catalog;
use crate::editor::Editor;
use crate::model::{self, Point};
use crate::persistence::{JsonFileRepository, LayoutRepository, SaveWorker};
use crate::session::Role;
use eframe::egui;

mod actions;
mod command_palette;
mod geometry;
mod help;
mod interaction;
mod item_map;
mod render;
mod settings;
mod sidebar;
mod update;

/// Canvas panning. The scale is fixed at [`model::PIXELS_PER_METER`].
#[derive(Clone, Copy, Debug, Default)]
struct View {
    pan_screen: egui::Vec2,
}

impl View {
    fn world_to_screen(&self, origin: egui::Pos2, world: Point) -> egui::Pos2 {
        origin + self.pan_screen + model::world_to_screen(world).to_pos2().to_vec2()
    }

    /// Screen position to unpanned canvas pixels, the unit the editor takes.
    fn screen_to_canvas(&self, origin: egui::Pos2, screen: egui::Pos2) -> Point {
        Point::from_pos2((screen - origin - self.pan_screen).to_pos2())
    }

    fn screen_to_world(&self, origin: egui::Pos2, screen: egui::Pos2) -> Point {
        model::screen_to_world(self.screen_to_canvas(origin, screen))
    }
}

/// What a canvas pointer drag is moving.
#[derive(Clone, Debug)]
enum CanvasDrag {
    Fixture {
        id: String,
        /// Canvas pixels between the pointer and the fixture origin.
        grab_offset: egui::Vec2,
    },
    Vertex {
        fixture_id: String,
        array_index: usize,
    },
    Pan,
}

/// Payload egui carries while a shelf item is dragged. The placement store
/// holds the real drag state.
#[derive(Clone, Copy, Debug)]
struct ItemDrag;

pub struct StorePlanApp {
    editor: Editor,
    catalog: Catalog,
    catalog_query: String,
    view: View,
    canvas_drag: Option<CanvasDrag>,
    /// Selected `(row, col)` in the item map grid of the selected edge.
    selected_cell: Option<(usize, usize)>,
    role: Role,
    layout_path: String,
    catalog_path: String,
    settings_path: String,
    show_axes: bool,
    vertex_handle_radius: f32,
    edge_pick_tolerance: f32,
    status: Option<String>,
    /// Pointer position over the canvas in meters, for the status bar.
    last_pointer_world: Option<Point>,
    save_worker: Option<SaveWorker>,
    command_palette: command_palette::CommandPalette,
    show_help: bool,
}

impl StorePlanApp {
    fn config_path() -> Option<String> {
        if let Some(home) = std::env::var_os("HOME") {
            let path = std::path::PathBuf::from(home)
                .join(".config")
                .join("shelfplan.toml");
            if path.exists() {
                return Some(path.display().to_string());
            }
        }
        if std::path::Path::new("settings.toml").exists() {
            return Some("settings.toml".to_string());
        }
        None
    }

    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path = Self::config_path().unwrap_or_else(|| "settings.toml".to_string());
        let settings = settings::load_settings(&settings_path)
            .or_else(|| settings::load_settings("settings.json"))
            .unwrap_or_default();
        log::info!("Using settings from {settings_path}, role {}", settings.role);

        let save_worker = match SaveWorker::spawn() {
            Ok(worker) => Some(worker),
            Err(e) => {
                log::error!("Saving will block the UI: {e}");
                None
            }
        };

        let mut app = Self {
            editor: Editor::new(),
            catalog: Catalog::default(),
            catalog_query: String::new(),
            view: View::default(),
            canvas_drag: None,
            selected_cell: None,
            role: settings.role,
            layout_path: settings.layout_path,
            catalog_path: settings.catalog_path,
            settings_path,
            show_axes: settings.show_axes,
            vertex_handle_radius: settings.vertex_handle_radius,
            edge_pick_tolerance: settings.edge_pick_tolerance,
            status: None,
            last_pointer_world: None,
            save_worker,
            command_palette: command_palette::CommandPalette::default(),
            show_help: false,
        };
        if app.role.can_open(settings.initial_editor) {
            app.editor.toggle_editor(settings.initial_editor);
        }
        app.reload_catalog();
        app.load_from_path();
        if !app.role.can_open(app.editor.active_mode()) {
            log::info!("{} has no editor access, opening read only", app.role);
            app.status = Some(format!("{} is read only", app.role));
        }
        app
    }

    fn repository(&self) -> JsonFileRepository {
        JsonFileRepository::new(&self.layout_path)
    }

    fn can_edit(&self) -> bool {
        self.role.can_edit_layout()
    }
}

impl Drop for StorePlanApp {
    fn drop(&mut self) {
        if self.save_worker.as_ref().is_some_and(SaveWorker::is_saving) {
            log::info!("Waiting for pending save to {}", self.repository().describe());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_maps_world_meters_through_pan() {
        let view = View {
            pan_screen: egui::vec2(10.0, -20.0),
        };
        let origin = egui::pos2(100.0, 50.0);
        let screen = view.world_to_screen(origin, Point::new(1.0, 2.0));
        assert_eq!(screen, egui::pos2(150.0, 110.0));
        assert_eq!(view.screen_to_canvas(origin, screen), Point::new(40.0, 80.0));
        assert_eq!(view.screen_to_world(origin, screen), Point::new(1.0, 2.0));
    }
}
