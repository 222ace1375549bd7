use crate::model;
use eframe::egui;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Help")
        .open(open)
        .resizable(true)
        .default_width(520.0)
        .default_height(460.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Keyboard Shortcuts");
                ui.separator();

                ui.label("General");
                help_row(ui, "⌘⇧P", "Command palette");
                help_row(ui, "⌘S", "Save layout");
                help_row(ui, "⌘⇧S", "Save layout as…");
                help_row(ui, "⌘O", "Open layout");
                help_row(ui, "1 / 2 / 3", "Inventory / Layout / Item Map editor");
                help_row(ui, "F1", "This window");

                ui.add_space(10.0);
                ui.label("Layout Editor");
                help_row(ui, "N", "Add fixture");
                help_row(ui, "Tab", "Switch Object Mode / Edit Mode");
                help_row(ui, "Delete", "Delete vertex (Edit Mode) or fixture");
                help_row(ui, "E", "Add node at selected edge midpoint");
                help_row(ui, "Escape", "Deselect");
                help_row(ui, "Drag empty canvas", "Pan");
                help_row(ui, "Right / middle drag", "Pan");

                ui.add_space(10.0);
                ui.label("Item Map Editor");
                help_row(ui, "Drag product", "Place on a shelf cell");
                help_row(ui, "Drag item", "Move to another cell");
                help_row(ui, "Click cell", "Select for column and row edits");
                help_row(ui, "⌘V", "Paste item JSON into selected cell");

                ui.add_space(20.0);
                ui.heading("Coordinates");
                ui.separator();
                ui.label(format!(
                    "One meter is {} pixels. Positions in the sidebar are meters.",
                    model::PIXELS_PER_METER
                ));
                ui.label("Vertices are stored relative to their fixture's origin.");

                ui.add_space(20.0);
                ui.heading("Settings");
                ui.separator();
                ui.label("Read from ~/.config/shelfplan.toml or ./settings.toml:");
                ui.add_space(5.0);
                ui.code(
                    r##"layout_path = "layout.json"
catalog_path = "products.json"
role = "MANAGER"
initial_editor = "Layout"
show_axes = true
vertex_handle_radius = 6.0
edge_pick_tolerance = 5.0"##,
                );
            });
        });
}

fn help_row(ui: &mut egui::Ui, shortcut: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [140.0, 16.0],
            egui::Label::new(egui::RichText::new(shortcut).monospace().strong()),
        );
        ui.label(description);
    });
}
