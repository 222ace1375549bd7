use eframe::egui;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canvas pixels per world meter. Shared by every coordinate transform.
pub const PIXELS_PER_METER: f32 = 40.0;

pub const DEFAULT_FIXTURE_NAME: &str = "New Fixture";
pub const DEFAULT_FIXTURE_COLOR: &str = "#f5a051";

/// World offset given to freshly created fixtures, in meters.
pub const DEFAULT_FIXTURE_ORIGIN: Point = Point { x: 12.0, y: 12.0 };

/// Outline of a new fixture: a 1m x 8m rectangle.
pub const DEFAULT_FIXTURE_POINTS: [f32; 8] = [-0.5, -4.0, -0.5, 4.0, 0.5, 4.0, 0.5, -4.0];

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_pos2(p: egui::Pos2) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn to_pos2(self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn offset(self, by: Point) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }

    pub fn relative_to(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Canvas pixels to world meters.
pub fn screen_to_world(p: Point) -> Point {
    Point::new(p.x / PIXELS_PER_METER, p.y / PIXELS_PER_METER)
}

/// World meters to canvas pixels.
pub fn world_to_screen(p: Point) -> Point {
    Point::new(p.x * PIXELS_PER_METER, p.y * PIXELS_PER_METER)
}

/// Arithmetic mean of the (x, y) pairs in a flat coordinate list.
pub fn centroid(points: &[f32]) -> Point {
    let count = points.len() / 2;
    if count == 0 {
        return Point::ZERO;
    }
    let (sum_x, sum_y) = points
        .chunks_exact(2)
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    Point::new(sum_x / count as f32, sum_y / count as f32)
}

/// Shifts every pair so the centroid lands on (0, 0). Returns the removed centroid.
pub fn recenter(points: &mut [f32]) -> Point {
    let c = centroid(points);
    for pair in points.chunks_exact_mut(2) {
        pair[0] -= c.x;
        pair[1] -= c.y;
    }
    c
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }

    pub fn from_color32(c: egui::Color32) -> Self {
        let [r, g, b, a] = c.to_srgba_unmultiplied();
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 && hex.len() != 8 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// A placeable piece of store furniture.
///
/// `points` holds consecutive (x, y) pairs relative to the fixture origin
/// `(x, y)`; together they form a closed polygon.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Fixture {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub points: Vec<f32>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Fixture {
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len() / 2
    }

    /// Fixture-local coordinates of vertex `i`.
    pub fn vertex(&self, i: usize) -> Option<Point> {
        let x = *self.points.get(2 * i)?;
        let y = *self.points.get(2 * i + 1)?;
        Some(Point::new(x, y))
    }

    pub fn vertex_world(&self, i: usize) -> Option<Point> {
        self.vertex(i).map(|p| p.offset(self.origin()))
    }

    pub fn vertices_world(&self) -> Vec<Point> {
        let origin = self.origin();
        self.points
            .chunks_exact(2)
            .map(|p| Point::new(p[0], p[1]).offset(origin))
            .collect()
    }

    pub fn fill(&self) -> Rgba {
        self.color
            .as_deref()
            .and_then(Rgba::from_hex)
            .or_else(|| Rgba::from_hex(DEFAULT_FIXTURE_COLOR))
            .unwrap_or_default()
    }
}

/// An inventory item placed in an edge grid.
///
/// `row`, `col` and `index` mirror the cell the item sits in; the grid
/// nesting is authoritative.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub row: usize,
    #[serde(default)]
    pub col: usize,
    #[serde(default)]
    pub index: usize,
}

impl Item {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            row: 0,
            col: 0,
            index: 0,
        }
    }
}

pub type Cell = Vec<Item>;
pub type GridRow = Vec<Cell>;
pub type Grid = Vec<GridRow>;

/// Edge key -> rows -> columns -> ordered items.
pub type ItemMap = BTreeMap<String, Grid>;

/// Everything that is saved and loaded together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub fixtures: Vec<Fixture>,
    pub item_map: ItemMap,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty() && self.item_map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_world_roundtrip_uses_fixed_scale() {
        let world = screen_to_world(Point::new(480.0, 80.0));
        assert_eq!(world, Point::new(12.0, 2.0));
        assert_eq!(world_to_screen(world), Point::new(480.0, 80.0));
    }

    #[test]
    fn recenter_moves_centroid_to_origin() {
        let mut points = vec![0.0, 0.0, 4.0, 0.0, 4.0, 2.0, 0.0, 2.0];
        let removed = recenter(&mut points);
        assert_eq!(removed, Point::new(2.0, 1.0));
        let c = centroid(&points);
        assert!(c.x.abs() < 1e-6 && c.y.abs() < 1e-6);
    }

    #[test]
    fn centroid_of_empty_list_is_origin() {
        assert_eq!(centroid(&[]), Point::ZERO);
    }

    #[test]
    fn hex_colors_parse_and_format() {
        let c = Rgba::from_hex("#f5a051").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (0xf5, 0xa0, 0x51, 255));
        assert_eq!(c.to_hex(), "#f5a051");
        assert!(Rgba::from_hex("#12").is_none());
        assert!(Rgba::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn fixture_without_color_uses_default_fill() {
        let f = Fixture {
            id: "f1".into(),
            x: 1.0,
            y: 2.0,
            points: DEFAULT_FIXTURE_POINTS.to_vec(),
            name: DEFAULT_FIXTURE_NAME.into(),
            color: None,
        };
        assert_eq!(f.fill().to_hex(), DEFAULT_FIXTURE_COLOR);
        assert_eq!(f.vertex_world(0), Some(Point::new(0.5, -2.0)));
        assert_eq!(f.vertex(4), None);
    }
}
