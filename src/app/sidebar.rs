use crate::editor::fixtures::Axis;
use crate::editor::mode::{EditorMode, FixtureEditMode};
use crate::model::{self, Point};
use eframe::egui;

use super::render::color_row;
use super::{ItemDrag, StorePlanApp};

fn meters_drag(ui: &mut egui::Ui, label: &str, value: f32) -> Option<f32> {
    let mut v = value;
    let changed = ui
        .horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(&mut v).speed(0.05).suffix(" m").max_decimals(3))
                .changed()
        })
        .inner;
    changed.then_some(v)
}

impl StorePlanApp {
    pub(super) fn editor_switcher(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for mode in EditorMode::ALL {
                let open = self.editor.modes.is_open(mode);
                let clicked = ui
                    .add_enabled_ui(self.role.can_open(mode), |ui| {
                        ui.selectable_label(open, mode.label()).clicked()
                    })
                    .inner;
                if clicked {
                    self.open_editor(mode);
                }
            }
        });
    }

    pub(super) fn sidebar(&mut self, ui: &mut egui::Ui) {
        if !self.role.can_open(self.editor.active_mode()) {
            self.read_only_notice(ui);
            return;
        }
        match self.editor.active_mode() {
            EditorMode::Layout => self.layout_sidebar(ui),
            EditorMode::ItemMap => self.item_map_sidebar(ui),
            EditorMode::Inventory => self.inventory_sidebar(ui),
        }
    }

    fn layout_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Layout");
        ui.horizontal(|ui| {
            if ui.button("Add Fixture").clicked() {
                self.add_fixture();
            }
            let mode = self.editor.fixture_mode();
            if ui
                .button(mode.toggled().label())
                .on_hover_text("Tab")
                .clicked()
            {
                self.toggle_fixture_mode();
            }
        });
        ui.label(format!("Mode: {}", self.editor.fixture_mode()));
        ui.separator();

        let Some(fixture) = self.editor.fixtures.selected(self.editor.selection()).cloned() else {
            ui.weak("Click a fixture to select it.");
            ui.weak(Self::default_fixture_hint());
            return;
        };

        ui.label(format!("Fixture {}", fixture.id));
        let mut name = self.editor.fixtures.name().to_string();
        if ui.text_edit_singleline(&mut name).changed() {
            self.editor.rename_selected(&name);
        }
        let mut rgba = fixture.fill();
        if color_row(ui, &mut rgba) {
            self.editor.recolor_selected(&rgba.to_hex());
        }

        ui.label("Position");
        let position = self.editor.fixtures.position();
        if let Some(x) = meters_drag(ui, "X", position.x) {
            self.editor.reposition_selected(Axis::X, x);
        }
        if let Some(y) = meters_drag(ui, "Y", position.y) {
            self.editor.reposition_selected(Axis::Y, y);
        }
        if ui.button("Delete Fixture").clicked() {
            self.delete_selected();
            return;
        }

        if self.editor.fixture_mode() != FixtureEditMode::Edit {
            return;
        }
        ui.separator();
        ui.label(format!("{} vertices", fixture.vertex_count()));

        if let Some(edge) = self.editor.selection().edge() {
            ui.label(format!("Edge {edge}"));
            if ui.button("Add Node").on_hover_text("Insert a vertex at the edge midpoint").clicked() {
                self.add_node();
            }
        }

        if let Some(vertex) = self.editor.selection().vertex() {
            ui.label(format!("Vertex {vertex}"));
            let Point { x, y } = self.editor.vertices.position();
            if let Some(x) = meters_drag(ui, "X", x) {
                self.editor.set_selected_vertex_axis(Axis::X, x);
            }
            if let Some(y) = meters_drag(ui, "Y", y) {
                self.editor.set_selected_vertex_axis(Axis::Y, y);
            }
            if ui.button("Delete Node").clicked() {
                self.delete_selected();
            }
        }
    }

    fn item_map_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Products");
        let mode = self.editor.fixture_mode();
        if self.editor.selection().fixture().is_some()
            && ui.button(mode.toggled().label()).on_hover_text("Tab").clicked()
        {
            self.toggle_fixture_mode();
        }
        ui.add(egui::TextEdit::singleline(&mut self.catalog_query).hint_text("Filter…"));
        ui.weak("Drag products onto a shelf cell.");
        ui.separator();

        let mut started = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for product in self.catalog.filter(&self.catalog_query) {
                let id = egui::Id::new(("catalog_product", &product.barcode));
                let response = ui
                    .dnd_drag_source(id, ItemDrag, |ui| {
                        ui.vertical(|ui| {
                            ui.label(&product.name);
                            let placed = self.editor.placement.locate(&product.barcode);
                            match placed {
                                Some(at) => ui.weak(format!("on {at}")),
                                None => ui.weak(&product.barcode),
                            };
                        });
                    })
                    .response;
                if response.drag_started() {
                    started = Some(product.to_item());
                }
                ui.separator();
            }
        });
        if let Some(item) = started {
            self.editor.placement.begin_drag_from_catalog(item);
        }
    }

    fn inventory_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Inventory");
        ui.add(egui::TextEdit::singleline(&mut self.catalog_query).hint_text("Search…"));
        ui.label(format!(
            "{} products, {} on shelves",
            self.catalog.len(),
            self.editor.placement.item_count()
        ));
        ui.separator();
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("inventory_grid")
                .striped(true)
                .num_columns(4)
                .show(ui, |ui| {
                    ui.strong("Product");
                    ui.strong("Brand");
                    ui.strong("Price");
                    ui.strong("Shelf");
                    ui.end_row();
                    for product in self.catalog.filter(&self.catalog_query) {
                        ui.label(&product.name).on_hover_text(format!(
                            "{}\n{} · {:.2} kg",
                            product.barcode, product.category, product.weight
                        ));
                        ui.label(&product.brand);
                        ui.label(format!("{:.2}", product.price));
                        match self.editor.placement.locate(&product.barcode) {
                            Some(at) => ui.label(at.to_string()),
                            None => ui.weak("-"),
                        };
                        ui.end_row();
                    }
                });
        });
    }

    fn read_only_notice(&self, ui: &mut egui::Ui) {
        ui.heading("Read only");
        ui.label(format!(
            "Signed in as {}. The editors need a manager or admin role.",
            self.role
        ));
        ui.weak(self.fixture_count_label());
    }

    pub(super) fn fixture_count_label(&self) -> String {
        let n = self.editor.fixtures.len();
        if n == 1 {
            "1 fixture".to_string()
        } else {
            format!("{n} fixtures")
        }
    }

    fn default_fixture_hint() -> String {
        format!(
            "New fixtures are {} at ({}, {}) m",
            model::DEFAULT_FIXTURE_NAME,
            model::DEFAULT_FIXTURE_ORIGIN.x,
            model::DEFAULT_FIXTURE_ORIGIN.y
        )
    }
}
