use crate::model::Fixture;
use eframe::egui;

use super::View;

pub(super) fn distance_to_segment(p: egui::Pos2, a: egui::Pos2, b: egui::Pos2) -> f32 {
    let ab = b - a;
    let ap = p - a;
    let ab_len2 = ab.x * ab.x + ab.y * ab.y;
    if ab_len2 <= f32::EPSILON {
        return (p - a).length();
    }
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len2).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).length()
}

/// Even-odd rule, so self-intersecting outlines still answer sensibly.
pub(super) fn point_in_polygon(p: egui::Pos2, polygon: &[egui::Pos2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

pub(super) fn fixture_points_screen(
    origin: egui::Pos2,
    view: &View,
    fixture: &Fixture,
) -> Vec<egui::Pos2> {
    fixture
        .vertices_world()
        .into_iter()
        .map(|w| view.world_to_screen(origin, w))
        .collect()
}

/// Topmost fixture under the pointer. Later fixtures draw on top.
pub(super) fn hit_fixture<'a>(
    fixtures: &'a [Fixture],
    origin: egui::Pos2,
    view: &View,
    screen: egui::Pos2,
) -> Option<&'a Fixture> {
    fixtures
        .iter()
        .rev()
        .find(|f| point_in_polygon(screen, &fixture_points_screen(origin, view, f)))
}

/// Closest vertex handle within `radius` screen pixels.
pub(super) fn hit_vertex(points: &[egui::Pos2], screen: egui::Pos2, radius: f32) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.distance(screen)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Closest edge within `tolerance` screen pixels.
pub(super) fn hit_edge(points: &[egui::Pos2], screen: egui::Pos2, tolerance: f32) -> Option<usize> {
    let n = points.len();
    if n < 2 {
        return None;
    }
    (0..n)
        .map(|i| (i, distance_to_segment(screen, points[i], points[(i + 1) % n])))
        .filter(|(_, d)| *d <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

fn signed_area(points: &[egui::Pos2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        * 0.5
}

fn cross(o: egui::Pos2, a: egui::Pos2, b: egui::Pos2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn in_triangle(p: egui::Pos2, a: egui::Pos2, b: egui::Pos2, c: egui::Pos2) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Ear-clipping triangulation of a simple polygon, so concave fixtures fill
/// correctly. Falls back to a fan when no ear is found (self-intersection).
pub(super) fn triangulate(points: &[egui::Pos2]) -> Vec<[u32; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let ccw = signed_area(points) > 0.0;
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let (ia, ib, ic) = (remaining[(i + m - 1) % m], remaining[i], remaining[(i + 1) % m]);
            let (a, b, c) = (points[ia], points[ib], points[ic]);
            let turn = cross(a, b, c);
            let convex = if ccw { turn > 0.0 } else { turn < 0.0 };
            convex
                && remaining
                    .iter()
                    .filter(|&&k| k != ia && k != ib && k != ic)
                    .all(|&k| !in_triangle(points[k], a, b, c))
        });
        let Some(i) = ear else {
            break;
        };
        let (ia, ib, ic) = (remaining[(i + m - 1) % m], remaining[i], remaining[(i + 1) % m]);
        triangles.push([ia as u32, ib as u32, ic as u32]);
        remaining.remove(i);
    }

    for k in 1..remaining.len().saturating_sub(1) {
        triangles.push([
            remaining[0] as u32,
            remaining[k] as u32,
            remaining[k + 1] as u32,
        ]);
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<egui::Pos2> {
        vec![
            egui::pos2(0.0, 0.0),
            egui::pos2(10.0, 0.0),
            egui::pos2(10.0, 10.0),
            egui::pos2(0.0, 10.0),
        ]
    }

    /// An L shape, concave at (5, 5).
    fn ell() -> Vec<egui::Pos2> {
        vec![
            egui::pos2(0.0, 0.0),
            egui::pos2(10.0, 0.0),
            egui::pos2(10.0, 5.0),
            egui::pos2(5.0, 5.0),
            egui::pos2(5.0, 10.0),
            egui::pos2(0.0, 10.0),
        ]
    }

    fn area(points: &[egui::Pos2], tris: &[[u32; 3]]) -> f32 {
        tris.iter()
            .map(|t| {
                let [a, b, c] = t.map(|i| points[i as usize]);
                cross(a, b, c).abs() * 0.5
            })
            .sum()
    }

    #[test]
    fn point_in_concave_polygon() {
        let l = ell();
        assert!(point_in_polygon(egui::pos2(2.0, 8.0), &l));
        assert!(!point_in_polygon(egui::pos2(8.0, 8.0), &l));
        assert!(!point_in_polygon(egui::pos2(1.0, 1.0), &l[..2]));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = egui::pos2(0.0, 0.0);
        let b = egui::pos2(10.0, 0.0);
        assert_eq!(distance_to_segment(egui::pos2(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(egui::pos2(13.0, 4.0), a, b), 5.0);
    }

    #[test]
    fn vertex_and_edge_picking() {
        let sq = square();
        assert_eq!(hit_vertex(&sq, egui::pos2(9.0, 9.5), 3.0), Some(2));
        assert_eq!(hit_vertex(&sq, egui::pos2(5.0, 5.0), 3.0), None);
        assert_eq!(hit_edge(&sq, egui::pos2(5.0, 1.0), 2.0), Some(0));
        // closing edge from vertex 3 back to 0
        assert_eq!(hit_edge(&sq, egui::pos2(-1.0, 5.0), 2.0), Some(3));
    }

    #[test]
    fn triangulation_covers_concave_area() {
        let l = ell();
        let tris = triangulate(&l);
        assert_eq!(tris.len(), 4);
        assert!((area(&l, &tris) - 75.0).abs() < 1e-3);

        let mut reversed = l.clone();
        reversed.reverse();
        assert!((area(&reversed, &triangulate(&reversed)) - 75.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_outlines_yield_nothing() {
        assert!(triangulate(&square()[..2]).is_empty());
    }
}
