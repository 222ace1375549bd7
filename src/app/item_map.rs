use crate::editor::placement::DragState;
use crate::model::Grid;
use eframe::egui;

use super::{ItemDrag, StorePlanApp};

/// Deferred grid edits collected while the grid is drawn.
enum GridAction {
    SelectCell(usize, usize),
    BeginDrag { row: usize, col: usize, index: usize },
    Drop { row: usize, col: usize },
    RemoveItem { row: usize, col: usize, index: usize },
}

const CELL_MIN_SIZE: egui::Vec2 = egui::vec2(140.0, 56.0);

fn item_chip(
    ui: &mut egui::Ui,
    edge: &str,
    (row, col, index): (usize, usize, usize),
    name: &str,
    actions: &mut Vec<GridAction>,
) {
    let id = egui::Id::new(("shelf_item", edge, row, col, index));
    let response = ui
        .dnd_drag_source(id, ItemDrag, |ui| {
            egui::Frame::new()
                .fill(ui.visuals().widgets.inactive.bg_fill)
                .corner_radius(4.0)
                .inner_margin(egui::Margin::symmetric(6, 2))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(name);
                        if ui.small_button("×").on_hover_text("Remove item").clicked() {
                            actions.push(GridAction::RemoveItem { row, col, index });
                        }
                    });
                });
        })
        .response;
    if response.drag_started() {
        actions.push(GridAction::BeginDrag { row, col, index });
    }
}

fn draw_grid(
    ui: &mut egui::Ui,
    edge: &str,
    grid: &Grid,
    selected_cell: Option<(usize, usize)>,
    actions: &mut Vec<GridAction>,
) {
    for (row, cols) in grid.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(format!("Row {row}"));
            for (col, cell) in cols.iter().enumerate() {
                let selected = selected_cell == Some((row, col));
                let stroke = if selected {
                    egui::Stroke::new(2.0, ui.visuals().selection.stroke.color)
                } else {
                    ui.visuals().widgets.noninteractive.bg_stroke
                };
                let frame = egui::Frame::new()
                    .stroke(stroke)
                    .corner_radius(4.0)
                    .inner_margin(6.0);
                let (inner, dropped) = ui.dnd_drop_zone::<ItemDrag, ()>(frame, |ui| {
                    ui.set_min_size(CELL_MIN_SIZE);
                    ui.vertical(|ui| {
                        if cell.is_empty() {
                            ui.weak("empty");
                        }
                        for (index, item) in cell.iter().enumerate() {
                            item_chip(ui, edge, (row, col, index), &item.name, actions);
                        }
                    });
                });
                if dropped.is_some() {
                    actions.push(GridAction::Drop { row, col });
                }
                if inner.response.interact(egui::Sense::click()).clicked() {
                    actions.push(GridAction::SelectCell(row, col));
                }
            }
        });
    }
}

impl StorePlanApp {
    /// Shelf grid of the selected edge, with drag-and-drop between cells.
    pub(super) fn item_map_panel(&mut self, ui: &mut egui::Ui) {
        let Some(edge) = self.editor.selected_edge_key() else {
            ui.label("Enter Edit Mode on a fixture and click an edge to stock its shelves.");
            return;
        };
        let can_edit = self.can_edit();

        ui.horizontal(|ui| {
            ui.strong(&edge);
            ui.separator();
            let has_cell = self.selected_cell.is_some();
            if ui.add_enabled(can_edit, egui::Button::new("Add Row")).clicked() {
                self.add_row();
            }
            if ui
                .add_enabled(can_edit && has_cell, egui::Button::new("Add Column"))
                .clicked()
            {
                self.add_column();
            }
            if ui
                .add_enabled(can_edit && has_cell, egui::Button::new("Remove Row"))
                .clicked()
            {
                self.remove_row();
            }
            if ui
                .add_enabled(can_edit && has_cell, egui::Button::new("Remove Column"))
                .clicked()
            {
                self.remove_column();
            }
            if let Some((row, col)) = self.selected_cell {
                ui.weak(format!("cell {row}, {col} · paste item JSON with ⌘V"));
            }
            match self.editor.placement.dragging() {
                Some(DragState::Catalog { item }) => {
                    ui.weak(format!("placing {}", item.name));
                }
                Some(DragState::Grid { row, col, .. }) => {
                    ui.weak(format!("moving from row {row} col {col}"));
                }
                None => {}
            }
        });
        ui.separator();

        let grid = self.editor.placement.grid_or_default(&edge);
        let mut actions = Vec::new();
        egui::ScrollArea::both().show(ui, |ui| {
            draw_grid(ui, &edge, &grid, self.selected_cell, &mut actions);
            if let Some((row, col)) = self.selected_cell {
                self.cell_details(ui, &grid, row, col);
            }
        });

        if !can_edit {
            return;
        }
        for action in actions {
            match action {
                GridAction::SelectCell(row, col) => self.selected_cell = Some((row, col)),
                GridAction::BeginDrag { row, col, index } => {
                    self.editor.placement.begin_drag_from_cell(&edge, row, col, index);
                }
                GridAction::Drop { row, col } => {
                    let result = self.editor.placement.drop_on_cell(&edge, row, col);
                    self.report_drop(result);
                }
                GridAction::RemoveItem { row, col, index } => {
                    self.editor.placement.remove_item(&edge, row, col, index);
                }
            }
        }
    }

    fn cell_details(&self, ui: &mut egui::Ui, grid: &Grid, row: usize, col: usize) {
        let Some(cell) = grid.get(row).and_then(|r| r.get(col)) else {
            return;
        };
        if cell.is_empty() {
            return;
        }
        ui.separator();
        egui::Grid::new("cell_details").striped(true).show(ui, |ui| {
            for (index, item) in cell.iter().enumerate() {
                ui.label(format!("{}.", index + 1));
                ui.label(&item.name);
                match self.catalog.find(&item.id) {
                    Some(product) => {
                        ui.label(&product.brand);
                        ui.label(format!("{:.2}", product.price));
                    }
                    None => {
                        ui.weak("not in catalog");
                        ui.label("");
                    }
                }
                ui.end_row();
            }
        });
    }

    /// A drag released outside every cell is a cancel.
    pub(super) fn settle_item_drag(&mut self, ctx: &egui::Context) {
        if self.editor.placement.is_dragging() && !ctx.input(|i| i.pointer.primary_down()) {
            self.editor.placement.cancel_drag();
        }
    }
}
