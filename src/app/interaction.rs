use crate::editor::mode::{EditorMode, FixtureEditMode};
use crate::model::Point;
use eframe::egui;

use super::geometry::{fixture_points_screen, hit_edge, hit_fixture, hit_vertex};
use super::{CanvasDrag, StorePlanApp};

/// What lies under the pointer, in pick priority order.
#[derive(Clone, Debug, PartialEq)]
enum CanvasHit {
    Vertex { fixture_id: String, index: usize },
    Edge { fixture_id: String, index: usize },
    Fixture { id: String },
}

impl StorePlanApp {
    fn canvas_hit(&self, origin: egui::Pos2, screen: egui::Pos2) -> Option<CanvasHit> {
        let editor = &self.editor;
        if editor.fixtures.is_edit_mode() {
            if let Some(fixture) = editor.fixtures.selected(editor.selection()) {
                let points = fixture_points_screen(origin, &self.view, fixture);
                if let Some(index) = hit_vertex(&points, screen, self.vertex_handle_radius) {
                    return Some(CanvasHit::Vertex {
                        fixture_id: fixture.id.clone(),
                        index,
                    });
                }
                if let Some(index) = hit_edge(&points, screen, self.edge_pick_tolerance) {
                    return Some(CanvasHit::Edge {
                        fixture_id: fixture.id.clone(),
                        index,
                    });
                }
            }
        }
        hit_fixture(editor.fixtures.fixtures(), origin, &self.view, screen)
            .map(|f| CanvasHit::Fixture { id: f.id.clone() })
    }

    fn canvas_editable(&self) -> bool {
        self.can_edit() && self.editor.active_mode() == EditorMode::Layout
    }

    fn canvas_selectable(&self) -> bool {
        self.can_edit() && self.editor.active_mode() != EditorMode::Inventory
    }

    fn click_canvas(&mut self, hit: Option<CanvasHit>) {
        match hit {
            Some(CanvasHit::Vertex { fixture_id, index }) => {
                self.editor.select_vertex(&fixture_id, index);
            }
            Some(CanvasHit::Edge { fixture_id, index }) => {
                if self.editor.select_edge(&fixture_id, index) {
                    self.selected_cell = None;
                }
            }
            Some(CanvasHit::Fixture { id }) => {
                if self.editor.selection().fixture() != Some(id.as_str()) {
                    self.selected_cell = None;
                }
                self.editor.select_fixture(&id);
            }
            None => {
                if self.editor.fixture_mode() == FixtureEditMode::Edit {
                    self.editor.toggle_fixture_mode();
                }
                self.editor.deselect();
                self.selected_cell = None;
            }
        }
    }

    fn start_canvas_drag(&mut self, origin: egui::Pos2, screen: egui::Pos2, hit: Option<CanvasHit>) {
        let canvas = self.view.screen_to_canvas(origin, screen);
        self.canvas_drag = match hit {
            Some(CanvasHit::Vertex { fixture_id, index }) if self.canvas_editable() => {
                self.editor.select_vertex(&fixture_id, index);
                Some(CanvasDrag::Vertex {
                    fixture_id,
                    array_index: index * 2,
                })
            }
            Some(CanvasHit::Fixture { id })
                if self.canvas_editable() && !self.editor.fixtures.is_edit_mode() =>
            {
                self.editor.select_fixture(&id);
                self.editor.fixtures.get(&id).map(|f| {
                    let anchor = crate::model::world_to_screen(f.origin());
                    CanvasDrag::Fixture {
                        id,
                        grab_offset: egui::vec2(canvas.x - anchor.x, canvas.y - anchor.y),
                    }
                })
            }
            Some(hit) => {
                self.click_canvas(Some(hit));
                None
            }
            None => Some(CanvasDrag::Pan),
        };
    }

    fn continue_canvas_drag(&mut self, origin: egui::Pos2, screen: egui::Pos2, delta: egui::Vec2) {
        let canvas = self.view.screen_to_canvas(origin, screen);
        match &self.canvas_drag {
            Some(CanvasDrag::Fixture { id, grab_offset }) => {
                let id = id.clone();
                let target = Point::new(canvas.x - grab_offset.x, canvas.y - grab_offset.y);
                self.editor.drag_fixture(&id, target);
            }
            Some(CanvasDrag::Vertex {
                fixture_id,
                array_index,
            }) => {
                let (fixture_id, array_index) = (fixture_id.clone(), *array_index);
                self.editor.drag_vertex(&fixture_id, array_index, canvas);
            }
            Some(CanvasDrag::Pan) => self.view.pan_screen += delta,
            None => {}
        }
    }

    /// Pointer handling for the canvas.
    pub(super) fn handle_canvas_input(
        &mut self,
        ctx: &egui::Context,
        response: &egui::Response,
        origin: egui::Pos2,
    ) {
        let pointer = ctx.input(|i| i.pointer.interact_pos());

        if response.dragged_by(egui::PointerButton::Middle)
            || response.dragged_by(egui::PointerButton::Secondary)
        {
            self.view.pan_screen += response.drag_delta();
            return;
        }

        let Some(screen) = pointer else {
            return;
        };

        if response.clicked() && self.canvas_selectable() {
            let hit = self.canvas_hit(origin, screen);
            self.click_canvas(hit);
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            let hit = if self.canvas_selectable() {
                self.canvas_hit(origin, screen)
            } else {
                None
            };
            self.start_canvas_drag(origin, screen, hit);
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            self.continue_canvas_drag(origin, screen, response.drag_delta());
        }
        if response.drag_stopped() {
            self.canvas_drag = None;
        }

        if let Some(hit) = response.hover_pos().and_then(|p| {
            self.canvas_selectable()
                .then(|| self.canvas_hit(origin, p))
                .flatten()
        }) {
            let icon = match hit {
                CanvasHit::Vertex { .. } => egui::CursorIcon::Crosshair,
                CanvasHit::Edge { .. } => egui::CursorIcon::PointingHand,
                CanvasHit::Fixture { .. } if self.canvas_editable() => egui::CursorIcon::Grab,
                CanvasHit::Fixture { .. } => egui::CursorIcon::PointingHand,
            };
            ctx.set_cursor_icon(icon);
        }
    }
}
