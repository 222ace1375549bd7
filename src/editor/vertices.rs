use crate::model::{self, Point};

use super::fixtures::{Axis, FixtureStore};
use super::selection::Selection;

/// Fewest vertices a fixture outline may keep.
pub const MIN_VERTICES: usize = 3;

/// Vertex manipulation on a fixture's point list.
///
/// Vertices are addressed by index into the flat list; the only state kept
/// here is the world position shown in the sidebar for the selected vertex.
#[derive(Clone, Debug, Default)]
pub struct VertexStore {
    position: Point,
}

impl VertexStore {
    /// World position of the selected (or last dragged) vertex.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Selects a vertex of the selected fixture. Only honored in edit mode.
    pub fn select_vertex(
        &mut self,
        fixtures: &FixtureStore,
        selection: &mut Selection,
        fixture_id: &str,
        vertex_index: usize,
    ) -> bool {
        if !fixtures.is_edit_mode() || !selection.is_fixture(fixture_id) {
            return false;
        }
        let Some(world) = fixtures.get(fixture_id).and_then(|f| f.vertex_world(vertex_index)) else {
            return false;
        };
        selection.select_vertex(vertex_index);
        self.position = world;
        true
    }

    /// Moves the vertex whose x value lives at `vertex_array_index` to the
    /// canvas pixel position `screen`. The y value is the following slot.
    pub fn handle_node_drag_move(
        &mut self,
        fixtures: &mut FixtureStore,
        selection: &mut Selection,
        fixture_id: &str,
        vertex_array_index: usize,
        screen: Point,
    ) {
        if vertex_array_index % 2 != 0 {
            log::warn!("Vertex array index {vertex_array_index} does not address an x slot");
            return;
        }
        let world = model::screen_to_world(screen);
        let Some(fixture) = fixtures.get_mut(fixture_id) else {
            return;
        };
        if vertex_array_index + 1 >= fixture.points.len() {
            return;
        }
        let local = world.relative_to(fixture.origin());
        fixture.points[vertex_array_index] = local.x;
        fixture.points[vertex_array_index + 1] = local.y;

        if selection.is_fixture(fixture_id) {
            let vertex = vertex_array_index / 2;
            if selection.vertex() != Some(vertex) {
                selection.select_vertex(vertex);
            }
        }
        self.position = world;
    }

    /// Sets one world coordinate of the selected vertex, as typed in the sidebar.
    pub fn set_vertex_axis(
        &mut self,
        fixtures: &mut FixtureStore,
        selection: &Selection,
        axis: Axis,
        world_value: f32,
    ) {
        if !world_value.is_finite() {
            return;
        }
        let (Some(id), Some(vertex)) = (selection.fixture(), selection.vertex()) else {
            return;
        };
        let Some(fixture) = fixtures.get_mut(id) else {
            return;
        };
        let origin = fixture.origin();
        let slot = match axis {
            Axis::X => 2 * vertex,
            Axis::Y => 2 * vertex + 1,
        };
        let Some(value) = fixture.points.get_mut(slot) else {
            return;
        };
        match axis {
            Axis::X => {
                *value = world_value - origin.x;
                self.position.x = world_value;
            }
            Axis::Y => {
                *value = world_value - origin.y;
                self.position.y = world_value;
            }
        }
    }

    /// Removes the selected vertex of `fixture_id`. Later vertices shift down
    /// by one. Refuses to go below a triangle.
    pub fn delete_node(
        &mut self,
        fixtures: &mut FixtureStore,
        selection: &mut Selection,
        fixture_id: &str,
    ) -> bool {
        let Some(vertex) = selection.vertex() else {
            return false;
        };
        let Some(fixture) = fixtures.get_mut(fixture_id) else {
            return false;
        };
        if fixture.vertex_count() <= MIN_VERTICES {
            log::warn!("Fixture {fixture_id} is already a triangle, keeping vertex {vertex}");
            return false;
        }
        if vertex >= fixture.vertex_count() {
            return false;
        }
        fixture.points.drain(2 * vertex..2 * vertex + 2);
        log::debug!("Deleted vertex {vertex} of {fixture_id}");

        selection.clear_vertex();
        self.position = Point::ZERO;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::mode::FixtureEditMode;

    fn editing_square() -> (FixtureStore, Selection, String) {
        let mut store = FixtureStore::new();
        let id = store.add_fixture();
        store.get_mut(&id).unwrap().points = vec![0.0, 0.0, 4.0, 0.0, 4.0, 4.0, 0.0, 4.0];
        let mut sel = Selection::default();
        store.select_fixture(&mut sel, &id);
        store.set_mode(&sel, FixtureEditMode::Edit);
        (store, sel, id)
    }

    #[test]
    fn vertex_selection_reports_world_position() {
        let (store, mut sel, id) = editing_square();
        let mut vertices = VertexStore::default();
        sel.select_edge(0);
        assert!(vertices.select_vertex(&store, &mut sel, &id, 2));
        assert_eq!(sel.vertex(), Some(2));
        assert_eq!(sel.edge(), None);
        assert_eq!(vertices.position(), Point::new(16.0, 16.0));
    }

    #[test]
    fn vertex_selection_outside_edit_mode_is_ignored() {
        let (mut store, mut sel, id) = editing_square();
        store.set_mode(&sel, FixtureEditMode::Object);
        let mut vertices = VertexStore::default();
        assert!(!vertices.select_vertex(&store, &mut sel, &id, 0));
        assert_eq!(sel.vertex(), None);
    }

    #[test]
    fn drag_writes_local_coordinates() {
        let (mut store, mut sel, id) = editing_square();
        let mut vertices = VertexStore::default();
        // 14m, 13m in canvas pixels
        vertices.handle_node_drag_move(&mut store, &mut sel, &id, 2, Point::new(560.0, 520.0));
        let f = store.get(&id).unwrap();
        assert_eq!(f.vertex(1), Some(Point::new(2.0, 1.0)));
        assert_eq!(f.vertex(0), Some(Point::new(0.0, 0.0)));
        assert_eq!(sel.vertex(), Some(1));
        assert_eq!(vertices.position(), Point::new(14.0, 13.0));
    }

    #[test]
    fn drag_on_odd_or_missing_slot_is_ignored() {
        let (mut store, mut sel, id) = editing_square();
        let mut vertices = VertexStore::default();
        let before = store.get(&id).unwrap().points.clone();
        vertices.handle_node_drag_move(&mut store, &mut sel, &id, 3, Point::ZERO);
        vertices.handle_node_drag_move(&mut store, &mut sel, &id, 8, Point::ZERO);
        vertices.handle_node_drag_move(&mut store, &mut sel, "gone", 0, Point::ZERO);
        assert_eq!(store.get(&id).unwrap().points, before);
    }

    #[test]
    fn deleting_vertex_renumbers_later_ones() {
        let (mut store, mut sel, id) = editing_square();
        let mut vertices = VertexStore::default();
        let former_v2 = store.get(&id).unwrap().vertex(2);
        vertices.select_vertex(&store, &mut sel, &id, 1);

        assert!(vertices.delete_node(&mut store, &mut sel, &id));

        let f = store.get(&id).unwrap();
        assert_eq!(f.vertex_count(), 3);
        assert_eq!(f.vertex(1), former_v2);
        assert_eq!(sel.vertex(), None);
        assert_eq!(vertices.position(), Point::ZERO);
    }

    #[test]
    fn delete_without_selected_vertex_is_a_no_op() {
        let (mut store, mut sel, id) = editing_square();
        let mut vertices = VertexStore::default();
        assert!(!vertices.delete_node(&mut store, &mut sel, &id));
        assert_eq!(store.get(&id).unwrap().vertex_count(), 4);
    }

    #[test]
    fn triangle_keeps_its_vertices() {
        let (mut store, mut sel, id) = editing_square();
        let mut vertices = VertexStore::default();
        vertices.select_vertex(&store, &mut sel, &id, 0);
        assert!(vertices.delete_node(&mut store, &mut sel, &id));
        vertices.select_vertex(&store, &mut sel, &id, 0);
        assert!(!vertices.delete_node(&mut store, &mut sel, &id));
        assert_eq!(store.get(&id).unwrap().vertex_count(), 3);
    }

    #[test]
    fn sidebar_axis_edit_converts_world_to_local() {
        let (mut store, mut sel, id) = editing_square();
        let mut vertices = VertexStore::default();
        vertices.select_vertex(&store, &mut sel, &id, 3);
        vertices.set_vertex_axis(&mut store, &sel, Axis::X, 10.0);
        vertices.set_vertex_axis(&mut store, &sel, Axis::Y, f32::INFINITY);
        assert_eq!(store.get(&id).unwrap().vertex(3), Some(Point::new(-2.0, 4.0)));
        assert_eq!(vertices.position().x, 10.0);
    }
}
