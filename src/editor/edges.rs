//! Edges are views over a fixture's flat point list, never stored.
//!
//! Edge `i` runs from vertex `i` to vertex `(i + 1) % n`, so inserting or
//! removing a vertex renumbers every later edge on the next read.

use crate::model::Point;

use super::fixtures::FixtureStore;
use super::selection::Selection;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub index: usize,
    /// Fixture-local start vertex.
    pub start: Point,
    /// Fixture-local end vertex.
    pub end: Point,
}

impl Edge {
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }
}

pub fn edge_count(points: &[f32]) -> usize {
    points.len() / 2
}

pub fn edge(points: &[f32], index: usize) -> Option<Edge> {
    let n = edge_count(points);
    if index >= n {
        return None;
    }
    let next = (index + 1) % n;
    Some(Edge {
        index,
        start: Point::new(points[2 * index], points[2 * index + 1]),
        end: Point::new(points[2 * next], points[2 * next + 1]),
    })
}

pub fn edges(points: &[f32]) -> Vec<Edge> {
    (0..edge_count(points)).filter_map(|i| edge(points, i)).collect()
}

/// Key under which an edge's item grid is stored.
pub fn edge_key(fixture_id: &str, edge_index: usize) -> String {
    format!("{fixture_id}-edge-{edge_index}")
}

/// Selects an edge of the selected fixture. Only honored in edit mode.
pub fn select_edge(
    fixtures: &FixtureStore,
    selection: &mut Selection,
    fixture_id: &str,
    edge_index: usize,
) -> bool {
    if !fixtures.is_edit_mode() || !selection.is_fixture(fixture_id) {
        return false;
    }
    let Some(fixture) = fixtures.get(fixture_id) else {
        return false;
    };
    if edge_index >= edge_count(&fixture.points) {
        log::warn!("Edge {edge_index} is out of range for fixture {fixture_id}");
        return false;
    }
    selection.select_edge(edge_index);
    true
}

/// Inserts a vertex at the midpoint of `edge_index` on the selected fixture.
///
/// The new pair lands right after the edge's first vertex, so it becomes
/// vertex `edge_index + 1`. Returns that index.
pub fn add_node_to_edge(
    fixtures: &mut FixtureStore,
    selection: &Selection,
    edge_index: usize,
) -> Option<usize> {
    let id = selection.fixture()?;
    let fixture = fixtures.get_mut(id)?;
    let e = edge(&fixture.points, edge_index)?;

    let origin = fixture.origin();
    let a = e.start.offset(origin);
    let b = e.end.offset(origin);
    let local = a.midpoint(b).relative_to(origin);

    let at = 2 * edge_index + 2;
    fixture.points.splice(at..at, [local.x, local.y]);
    log::debug!(
        "Inserted vertex {} on {} at ({:.3}, {:.3})",
        edge_index + 1,
        id,
        local.x,
        local.y
    );
    Some(edge_index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::mode::FixtureEditMode;

    const SQUARE: [f32; 8] = [0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0];

    fn square_store() -> (FixtureStore, Selection, String) {
        let mut store = FixtureStore::new();
        let id = store.add_fixture();
        let mut sel = Selection::default();
        store.select_fixture(&mut sel, &id);
        store.get_mut(&id).unwrap().points = SQUARE.to_vec();
        (store, sel, id)
    }

    #[test]
    fn edge_count_equals_vertex_count() {
        assert_eq!(edges(&SQUARE).len(), 4);
        assert_eq!(edges(&SQUARE[..6]).len(), 3);
    }

    #[test]
    fn last_edge_wraps_to_first_vertex() {
        let last = edge(&SQUARE, 3).unwrap();
        assert_eq!(last.start, Point::new(0.0, 4.0));
        assert_eq!(last.end, Point::new(0.0, 0.0));
        assert!(edge(&SQUARE, 4).is_none());
    }

    #[test]
    fn edge_keys_combine_fixture_and_index() {
        assert_eq!(edge_key("f1", 0), "f1-edge-0");
    }

    #[test]
    fn midpoint_insertion_on_square() {
        let (mut store, sel, id) = square_store();
        let before = edge(&store.get(&id).unwrap().points, 1).unwrap();

        assert_eq!(add_node_to_edge(&mut store, &sel, 0), Some(1));

        let f = store.get(&id).unwrap();
        assert_eq!(f.vertex_count(), 5);
        assert_eq!(f.vertex(1), Some(Point::new(2.0, 0.0)));
        // old edge 1 is now edge 2
        let shifted = edge(&f.points, 2).unwrap();
        assert_eq!((shifted.start, shifted.end), (before.start, before.end));
    }

    #[test]
    fn inserting_on_closing_edge_appends_vertex() {
        let (mut store, sel, id) = square_store();
        add_node_to_edge(&mut store, &sel, 3);
        let f = store.get(&id).unwrap();
        assert_eq!(f.vertex(4), Some(Point::new(0.0, 2.0)));
        assert_eq!(f.vertex(0), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn add_node_without_selection_is_a_no_op() {
        let (mut store, _, id) = square_store();
        assert_eq!(add_node_to_edge(&mut store, &Selection::default(), 0), None);
        assert_eq!(store.get(&id).unwrap().vertex_count(), 4);
    }

    #[test]
    fn add_node_out_of_range_is_a_no_op() {
        let (mut store, sel, id) = square_store();
        assert_eq!(add_node_to_edge(&mut store, &sel, 9), None);
        assert_eq!(store.get(&id).unwrap().points, SQUARE.to_vec());
    }

    #[test]
    fn edge_selection_needs_edit_mode_and_selected_fixture() {
        let (mut store, mut sel, id) = square_store();
        assert!(!select_edge(&store, &mut sel, &id, 0));

        store.set_mode(&sel, FixtureEditMode::Edit);
        assert!(!select_edge(&store, &mut sel, "other", 0));
        assert!(!select_edge(&store, &mut sel, &id, 4));
        assert!(select_edge(&store, &mut sel, &id, 2));
        assert_eq!(sel.edge(), Some(2));
    }
}
