use crate::editor::Editor;
use crate::editor::edges;
use crate::model::{self, Fixture, Point};
use eframe::egui;

use super::View;
use super::geometry::{fixture_points_screen, triangulate};

const SELECTION_COLOR: egui::Color32 = egui::Color32::from_rgb(90, 160, 255);
const EDGE_HIGHLIGHT: egui::Color32 = egui::Color32::from_rgb(255, 120, 40);

pub(super) fn color_row(ui: &mut egui::Ui, rgba: &mut model::Rgba) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        let presets = [
            egui::Color32::from_rgb(0xf5, 0xa0, 0x51),
            egui::Color32::from_rgb(200, 80, 80),
            egui::Color32::from_rgb(90, 170, 100),
            egui::Color32::from_rgb(80, 130, 210),
            egui::Color32::from_rgb(150, 150, 150),
            egui::Color32::from_rgb(140, 90, 190),
        ];
        for c in presets {
            if ui
                .add_sized([18.0, 18.0], egui::Button::new("").fill(c))
                .clicked()
            {
                *rgba = model::Rgba::from_color32(c);
                changed = true;
            }
        }
        let mut arr = [rgba.r, rgba.g, rgba.b];
        if ui.color_edit_button_srgb(&mut arr).changed() {
            *rgba = model::Rgba {
                r: arr[0],
                g: arr[1],
                b: arr[2],
                a: 255,
            };
            changed = true;
        }
    });
    changed
}

/// One line every meter, a stronger one every five.
pub(super) fn draw_background(painter: &egui::Painter, rect: egui::Rect, view: &View) {
    let bg = painter.ctx().style().visuals.extreme_bg_color;
    painter.rect_filled(rect, 0.0, bg);
    let minor = egui::Stroke::new(1.0, egui::Color32::from_gray(45));
    let major = egui::Stroke::new(1.0, egui::Color32::from_gray(70));
    let spacing = model::PIXELS_PER_METER;
    let start = rect.min + view.pan_screen;

    let first_x = ((rect.min.x - start.x) / spacing).floor() as i64;
    let mut i = first_x;
    loop {
        let x = start.x + i as f32 * spacing;
        if x >= rect.max.x {
            break;
        }
        let stroke = if i % 5 == 0 { major } else { minor };
        painter.line_segment([egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)], stroke);
        i += 1;
    }
    let first_y = ((rect.min.y - start.y) / spacing).floor() as i64;
    let mut j = first_y;
    loop {
        let y = start.y + j as f32 * spacing;
        if y >= rect.max.y {
            break;
        }
        let stroke = if j % 5 == 0 { major } else { minor };
        painter.line_segment([egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)], stroke);
        j += 1;
    }
}

fn darker(c: egui::Color32) -> egui::Color32 {
    egui::Color32::from_rgb(
        (c.r() as f32 * 0.6) as u8,
        (c.g() as f32 * 0.6) as u8,
        (c.b() as f32 * 0.6) as u8,
    )
}

fn fill_polygon(painter: &egui::Painter, points: &[egui::Pos2], color: egui::Color32) {
    let mut mesh = egui::Mesh::default();
    for p in points {
        mesh.colored_vertex(*p, color);
    }
    for [a, b, c] in triangulate(points) {
        mesh.add_triangle(a, b, c);
    }
    painter.add(egui::Shape::mesh(mesh));
}

fn draw_fixture(
    painter: &egui::Painter,
    origin: egui::Pos2,
    view: &View,
    fixture: &Fixture,
    selected: bool,
) {
    let points = fixture_points_screen(origin, view, fixture);
    if points.len() < 3 {
        return;
    }
    let fill = fixture.fill().to_color32();
    fill_polygon(painter, &points, fill);
    let stroke = if selected {
        egui::Stroke::new(2.5, SELECTION_COLOR)
    } else {
        egui::Stroke::new(1.5, darker(fill))
    };
    painter.add(egui::Shape::closed_line(points, stroke));

    let center = view.world_to_screen(
        origin,
        model::centroid(&fixture.points).offset(fixture.origin()),
    );
    painter.text(
        center,
        egui::Align2::CENTER_CENTER,
        &fixture.name,
        egui::FontId::proportional(12.0),
        egui::Color32::from_gray(20),
    );
}

pub(super) fn draw_fixtures(painter: &egui::Painter, origin: egui::Pos2, view: &View, editor: &Editor) {
    let selected = editor.selection().fixture();
    for fixture in editor.fixtures.fixtures() {
        draw_fixture(painter, origin, view, fixture, selected == Some(fixture.id.as_str()));
    }
}

/// Edges and vertex handles of the selected fixture while in edit mode.
pub(super) fn draw_edit_overlay(
    painter: &egui::Painter,
    origin: egui::Pos2,
    view: &View,
    editor: &Editor,
    handle_radius: f32,
) {
    if !editor.fixtures.is_edit_mode() {
        return;
    }
    let Some(fixture) = editor.fixtures.selected(editor.selection()) else {
        return;
    };
    let selection = editor.selection();
    let fixture_origin = fixture.origin();

    for edge in edges::edges(&fixture.points) {
        let a = view.world_to_screen(origin, edge.start.offset(fixture_origin));
        let b = view.world_to_screen(origin, edge.end.offset(fixture_origin));
        let stroke = if selection.edge() == Some(edge.index) {
            egui::Stroke::new(4.0, EDGE_HIGHLIGHT)
        } else {
            egui::Stroke::new(2.0, SELECTION_COLOR)
        };
        painter.line_segment([a, b], stroke);
        let mid = view.world_to_screen(origin, edge.midpoint().offset(fixture_origin));
        painter.circle_filled(mid, 2.0, stroke.color);
    }

    let handle_stroke = egui::Stroke::new(1.5, SELECTION_COLOR);
    for (i, p) in fixture_points_screen(origin, view, fixture).into_iter().enumerate() {
        let fill = if selection.vertex() == Some(i) {
            EDGE_HIGHLIGHT
        } else {
            egui::Color32::from_rgb(250, 250, 250)
        };
        painter.circle_filled(p, handle_radius, fill);
        painter.circle_stroke(p, handle_radius, handle_stroke);
    }
}

/// Crosshair on the selected fixture's origin.
pub(super) fn draw_origin_crosshair(
    painter: &egui::Painter,
    origin: egui::Pos2,
    view: &View,
    editor: &Editor,
) {
    let Some(fixture) = editor.fixtures.selected(editor.selection()) else {
        return;
    };
    let c = view.world_to_screen(origin, fixture.origin());
    let stroke = egui::Stroke::new(1.0, egui::Color32::from_gray(230));
    let arm = 8.0;
    painter.line_segment([c - egui::vec2(arm, 0.0), c + egui::vec2(arm, 0.0)], stroke);
    painter.line_segment([c - egui::vec2(0.0, arm), c + egui::vec2(0.0, arm)], stroke);
}

/// X/Y arrows, one meter long, in the bottom-left corner. Y grows downward.
pub(super) fn draw_axes(painter: &egui::Painter, rect: egui::Rect) {
    let base = egui::pos2(rect.min.x + 24.0, rect.max.y - 24.0 - model::PIXELS_PER_METER);
    let len = model::PIXELS_PER_METER;
    let x_color = egui::Color32::from_rgb(220, 70, 70);
    let y_color = egui::Color32::from_rgb(70, 200, 90);
    painter.arrow(base, egui::vec2(len, 0.0), egui::Stroke::new(2.0, x_color));
    painter.arrow(base, egui::vec2(0.0, len), egui::Stroke::new(2.0, y_color));
    let font = egui::FontId::monospace(11.0);
    painter.text(
        base + egui::vec2(len + 4.0, 0.0),
        egui::Align2::LEFT_CENTER,
        "x",
        font.clone(),
        x_color,
    );
    painter.text(
        base + egui::vec2(-4.0, len),
        egui::Align2::RIGHT_BOTTOM,
        "y",
        font.clone(),
        y_color,
    );
    painter.text(
        base + egui::vec2(len * 0.5, -4.0),
        egui::Align2::CENTER_BOTTOM,
        "1 m",
        font,
        egui::Color32::from_gray(180),
    );
}

/// Pointer readout in meters.
pub(super) fn pointer_label(world: Point) -> String {
    format!("{:.2} m, {:.2} m", world.x, world.y)
}
