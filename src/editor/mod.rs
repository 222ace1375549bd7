//! Editing state for one store layout, independent of any UI.
//!
//! The stores share a single [`Selection`] which this facade owns and lends
//! to each operation, so fixture, edge and vertex views always agree on
//! what is selected.

pub mod edges;
pub mod fixtures;
pub mod mode;
pub mod placement;
pub mod selection;
pub mod vertices;

use crate::model::{Layout, Point};

use self::fixtures::{Axis, FixtureStore};
use self::mode::{EditorMode, EditorModes, FixtureEditMode};
use self::placement::PlacementStore;
use self::selection::Selection;
use self::vertices::VertexStore;

#[derive(Clone, Debug, Default)]
pub struct Editor {
    pub fixtures: FixtureStore,
    pub vertices: VertexStore,
    pub placement: PlacementStore,
    pub modes: EditorModes,
    selection: Selection,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replaces everything with a loaded layout. The open editor is kept.
    pub fn load(&mut self, layout: Layout) {
        log::info!(
            "Loading layout: {} fixtures, {} edge grids",
            layout.fixtures.len(),
            layout.item_map.len()
        );
        self.fixtures.replace_all(&mut self.selection, layout.fixtures);
        self.placement.replace_map(layout.item_map);
        self.vertices = VertexStore::default();
    }

    /// Snapshot of what gets persisted.
    pub fn layout(&self) -> Layout {
        Layout {
            fixtures: self.fixtures.fixtures().to_vec(),
            item_map: self.placement.map().clone(),
        }
    }

    pub fn clear(&mut self) {
        self.load(Layout::default());
    }

    pub fn active_mode(&self) -> EditorMode {
        self.modes.active()
    }

    pub fn toggle_editor(&mut self, target: EditorMode) {
        self.modes.toggle(target);
    }

    pub fn add_fixture(&mut self) -> String {
        self.fixtures.add_fixture()
    }

    pub fn select_fixture(&mut self, id: &str) -> bool {
        self.fixtures.select_fixture(&mut self.selection, id)
    }

    pub fn deselect(&mut self) {
        self.fixtures.deselect(&mut self.selection);
    }

    /// Deletes the selected fixture. Its edge grids stay in the item map.
    pub fn delete_selected_fixture(&mut self) -> bool {
        self.fixtures.delete_fixture(&mut self.selection).is_some()
    }

    pub fn rename_selected(&mut self, name: &str) {
        self.fixtures.rename(&self.selection, name);
    }

    pub fn recolor_selected(&mut self, color: &str) {
        self.fixtures.recolor(&self.selection, color);
    }

    pub fn reposition_selected(&mut self, axis: Axis, value: f32) {
        self.fixtures.reposition_by_axis(&self.selection, axis, value);
    }

    pub fn drag_fixture(&mut self, id: &str, screen: Point) {
        self.fixtures.reposition_by_drag(&self.selection, id, screen);
    }

    pub fn fixture_mode(&self) -> FixtureEditMode {
        self.fixtures.mode()
    }

    pub fn toggle_fixture_mode(&mut self) -> bool {
        let toggled = self.fixtures.toggle_mode(&self.selection);
        if toggled && !self.fixtures.is_edit_mode() {
            self.selection.clear_edge();
            self.selection.clear_vertex();
        }
        toggled
    }

    pub fn select_edge(&mut self, fixture_id: &str, edge_index: usize) -> bool {
        edges::select_edge(&self.fixtures, &mut self.selection, fixture_id, edge_index)
    }

    /// Grid key of the selected edge, if any.
    pub fn selected_edge_key(&self) -> Option<String> {
        let fixture = self.selection.fixture()?;
        let edge = self.selection.edge()?;
        Some(edges::edge_key(fixture, edge))
    }

    pub fn add_node_to_selected_edge(&mut self) -> Option<usize> {
        let edge = self.selection.edge()?;
        edges::add_node_to_edge(&mut self.fixtures, &self.selection, edge)
    }

    pub fn select_vertex(&mut self, fixture_id: &str, vertex_index: usize) -> bool {
        self.vertices
            .select_vertex(&self.fixtures, &mut self.selection, fixture_id, vertex_index)
    }

    pub fn drag_vertex(&mut self, fixture_id: &str, vertex_array_index: usize, screen: Point) {
        self.vertices.handle_node_drag_move(
            &mut self.fixtures,
            &mut self.selection,
            fixture_id,
            vertex_array_index,
            screen,
        );
    }

    pub fn set_selected_vertex_axis(&mut self, axis: Axis, value: f32) {
        self.vertices
            .set_vertex_axis(&mut self.fixtures, &self.selection, axis, value);
    }

    pub fn delete_selected_node(&mut self) -> bool {
        let Some(id) = self.selection.fixture().map(str::to_string) else {
            return false;
        };
        self.vertices
            .delete_node(&mut self.fixtures, &mut self.selection, &id)
    }
}
