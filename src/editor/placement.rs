//! Per-edge shelf grids and drag-and-drop placement of items.
//!
//! Each edge key owns rows of columns of ordered item lists. Rows may have
//! different column counts. An item id lives in at most one cell of the whole
//! map, and items within a cell always carry contiguous indices from 0.

use std::fmt;

use thiserror::Error;

use crate::model::{Cell, Grid, GridRow, Item, ItemMap};

pub const DEFAULT_GRID_ROWS: usize = 3;
pub const DEFAULT_GRID_COLS: usize = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellAddress {
    pub edge: String,
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} row {} col {}", self.edge, self.row, self.col)
    }
}

/// The single in-flight drag.
#[derive(Clone, Debug, PartialEq)]
pub enum DragState {
    /// A new item coming from the product catalog.
    Catalog { item: Item },
    /// An item already on a shelf, remembered by its origin.
    Grid {
        edge: String,
        row: usize,
        col: usize,
        index: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Placed { item_id: String, index: usize },
    Moved { item_id: String, index: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("no item is being dragged")]
    NotDragging,
    #[error("item {id} is already placed at {location}")]
    DuplicateItem { id: String, location: CellAddress },
    #[error("drag source {edge} row {row} col {col} index {index} no longer exists")]
    SourceMissing {
        edge: String,
        row: usize,
        col: usize,
        index: usize,
    },
    #[error("malformed drag payload: {0}")]
    MalformedPayload(String),
}

fn default_grid() -> Grid {
    (0..DEFAULT_GRID_ROWS)
        .map(|_| (0..DEFAULT_GRID_COLS).map(|_| Cell::new()).collect())
        .collect()
}

fn renumber(cell: &mut Cell, row: usize, col: usize) {
    for (index, item) in cell.iter_mut().enumerate() {
        item.row = row;
        item.col = col;
        item.index = index;
    }
}

fn renumber_grid(grid: &mut Grid) {
    for (r, row) in grid.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            renumber(cell, r, c);
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlacementStore {
    map: ItemMap,
    dragging: Option<DragState>,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&self) -> &ItemMap {
        &self.map
    }

    /// Swaps in a loaded map and drops any in-flight drag.
    /// Stored row/col/index fields are rewritten from the nesting.
    pub fn replace_map(&mut self, mut map: ItemMap) {
        map.values_mut().for_each(renumber_grid);
        self.map = map;
        self.dragging = None;
    }

    pub fn grid(&self, edge: &str) -> Option<&Grid> {
        self.map.get(edge)
    }

    /// The stored grid, or the 3x1 empty shape an untouched edge starts with.
    pub fn grid_or_default(&self, edge: &str) -> Grid {
        self.map.get(edge).cloned().unwrap_or_else(default_grid)
    }

    pub fn cell(&self, edge: &str, row: usize, col: usize) -> Option<&Cell> {
        self.map.get(edge)?.get(row)?.get(col)
    }

    pub fn dragging(&self) -> Option<&DragState> {
        self.dragging.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    pub fn item_count(&self) -> usize {
        self.map
            .values()
            .flatten()
            .flatten()
            .map(|cell| cell.len())
            .sum()
    }

    /// Full scan over every edge, row and cell.
    pub fn locate(&self, item_id: &str) -> Option<CellAddress> {
        self.map.iter().find_map(|(edge, grid)| {
            grid.iter().enumerate().find_map(|(row, cols)| {
                cols.iter().enumerate().find_map(|(col, cell)| {
                    cell.iter().any(|item| item.id == item_id).then(|| CellAddress {
                        edge: edge.clone(),
                        row,
                        col,
                    })
                })
            })
        })
    }

    pub fn begin_drag_from_catalog(&mut self, item: Item) {
        log::debug!("Drag start from catalog: {}", item.id);
        self.dragging = Some(DragState::Catalog { item });
    }

    pub fn begin_drag_from_cell(&mut self, edge: &str, row: usize, col: usize, index: usize) {
        log::debug!("Drag start from {edge} row {row} col {col} index {index}");
        self.dragging = Some(DragState::Grid {
            edge: edge.to_string(),
            row,
            col,
            index,
        });
    }

    /// Starts a catalog drag from serialized transfer data (a JSON item).
    /// Unparsable data leaves the drag state untouched.
    pub fn begin_drag_from_transfer(&mut self, data: &str) -> Result<(), PlacementError> {
        let item: Item = serde_json::from_str(data).map_err(|e| {
            log::warn!("Rejecting drag payload: {e}");
            PlacementError::MalformedPayload(e.to_string())
        })?;
        self.begin_drag_from_catalog(item);
        Ok(())
    }

    /// Drag ended without a drop.
    pub fn cancel_drag(&mut self) {
        if self.dragging.take().is_some() {
            log::debug!("Drag cancelled");
        }
    }

    /// Drops the in-flight item onto a cell, creating the edge grid and
    /// growing rows/columns as needed. On error the map is unchanged. The
    /// drag state is cleared either way.
    pub fn drop_on_cell(
        &mut self,
        edge: &str,
        row: usize,
        col: usize,
    ) -> Result<DropOutcome, PlacementError> {
        let dragging = self.dragging.take().ok_or(PlacementError::NotDragging)?;

        match dragging {
            DragState::Catalog { item } => {
                if let Some(location) = self.locate(&item.id) {
                    log::warn!("Item {} already exists at {location}, skipping", item.id);
                    return Err(PlacementError::DuplicateItem {
                        id: item.id,
                        location,
                    });
                }
                let target = self.ensure_cell(edge, row, col);
                let index = target.len();
                let item_id = item.id.clone();
                target.push(Item {
                    row,
                    col,
                    index,
                    ..item
                });
                log::debug!("Placed {item_id} at {edge} row {row} col {col} index {index}");
                Ok(DropOutcome::Placed { item_id, index })
            }
            DragState::Grid {
                edge: src_edge,
                row: src_row,
                col: src_col,
                index: src_index,
            } => {
                let source_ok = self
                    .cell(&src_edge, src_row, src_col)
                    .is_some_and(|cell| src_index < cell.len());
                if !source_ok {
                    log::warn!(
                        "Drag source {src_edge} row {src_row} col {src_col} index {src_index} not found"
                    );
                    return Err(PlacementError::SourceMissing {
                        edge: src_edge,
                        row: src_row,
                        col: src_col,
                        index: src_index,
                    });
                }

                // Remove first so a same-cell move never loses the item.
                let moved = self.take_item(&src_edge, src_row, src_col, src_index);
                let Some(moved) = moved else {
                    return Err(PlacementError::SourceMissing {
                        edge: src_edge,
                        row: src_row,
                        col: src_col,
                        index: src_index,
                    });
                };

                let target = self.ensure_cell(edge, row, col);
                let index = target.len();
                let item_id = moved.id.clone();
                target.push(Item {
                    row,
                    col,
                    index,
                    ..moved
                });
                log::debug!(
                    "Moved {item_id} from {src_edge} row {src_row} col {src_col} to {edge} row {row} col {col} index {index}"
                );
                Ok(DropOutcome::Moved { item_id, index })
            }
        }
    }

    fn ensure_cell(&mut self, edge: &str, row: usize, col: usize) -> &mut Cell {
        let grid = self.map.entry(edge.to_string()).or_insert_with(default_grid);
        while grid.len() <= row {
            grid.push(vec![Cell::new()]);
        }
        let cols = &mut grid[row];
        while cols.len() <= col {
            cols.push(Cell::new());
        }
        &mut cols[col]
    }

    fn take_item(&mut self, edge: &str, row: usize, col: usize, index: usize) -> Option<Item> {
        let cell = self.map.get_mut(edge)?.get_mut(row)?.get_mut(col)?;
        if index >= cell.len() {
            return None;
        }
        let item = cell.remove(index);
        renumber(cell, row, col);
        Some(item)
    }

    /// Removes one item and closes the gap in its cell.
    pub fn remove_item(&mut self, edge: &str, row: usize, col: usize, index: usize) -> Option<Item> {
        let removed = self.take_item(edge, row, col, index);
        match &removed {
            Some(item) => log::debug!("Removed {} from {edge} row {row} col {col}", item.id),
            None => log::warn!("No item at {edge} row {row} col {col} index {index}"),
        }
        removed
    }

    /// Appends a row with one empty column, creating the grid if absent.
    pub fn add_row(&mut self, edge: &str) {
        let grid = self.map.entry(edge.to_string()).or_default();
        grid.push(vec![Cell::new()]);
        log::debug!("{edge} now has {} rows", grid.len());
    }

    pub fn add_column(&mut self, edge: &str, row: usize) -> bool {
        let Some(cols) = self.map.get_mut(edge).and_then(|grid| grid.get_mut(row)) else {
            log::warn!("Cannot add column: {edge} row {row} not found");
            return false;
        };
        cols.push(Cell::new());
        true
    }

    /// Drops the row with everything on it.
    pub fn remove_row(&mut self, edge: &str, row: usize) -> Option<GridRow> {
        let Some(grid) = self.map.get_mut(edge).filter(|grid| row < grid.len()) else {
            log::warn!("Cannot remove row: {edge} row {row} out of bounds");
            return None;
        };
        let removed = grid.remove(row);
        renumber_grid(grid);
        Some(removed)
    }

    /// Drops the column with everything in it.
    pub fn remove_column(&mut self, edge: &str, row: usize, col: usize) -> Option<Cell> {
        let Some(grid) = self
            .map
            .get_mut(edge)
            .filter(|grid| grid.get(row).is_some_and(|cols| col < cols.len()))
        else {
            log::warn!("Cannot remove column: {edge} row {row} col {col} out of bounds");
            return None;
        };
        let removed = grid[row].remove(col);
        renumber_grid(grid);
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.dragging = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(store: &mut PlacementStore, id: &str, edge: &str, row: usize, col: usize) {
        store.begin_drag_from_catalog(Item::new(id, id.to_lowercase()));
        store.drop_on_cell(edge, row, col).unwrap();
    }

    fn ids(cell: &Cell) -> Vec<(&str, usize)> {
        cell.iter().map(|i| (i.id.as_str(), i.index)).collect()
    }

    #[test]
    fn first_drop_creates_default_grid() {
        let mut store = PlacementStore::new();
        place(&mut store, "A", "f1-edge-0", 0, 0);
        let grid = store.grid("f1-edge-0").unwrap();
        assert_eq!(grid.len(), 3);
        assert!(grid.iter().all(|row| row.len() == 1));
        assert_eq!(ids(&grid[0][0]), vec![("A", 0)]);
        assert!(!store.is_dragging());
    }

    #[test]
    fn drop_grows_rows_and_columns_on_demand() {
        let mut store = PlacementStore::new();
        place(&mut store, "A", "e", 4, 2);
        let grid = store.grid("e").unwrap();
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[3].len(), 1);
        assert_eq!(grid[4].len(), 3);
        let item = &grid[4][2][0];
        assert_eq!((item.row, item.col, item.index), (4, 2, 0));
    }

    #[test]
    fn duplicate_catalog_item_is_rejected_everywhere() {
        let mut store = PlacementStore::new();
        place(&mut store, "X", "f1-edge-0", 0, 0);
        let before = store.map().clone();

        store.begin_drag_from_catalog(Item::new("X", "x"));
        let err = store.drop_on_cell("f1-edge-1", 0, 0).unwrap_err();

        assert!(matches!(err, PlacementError::DuplicateItem { ref id, .. } if id == "X"));
        assert_eq!(store.map(), &before);
        assert!(store.grid("f1-edge-1").is_none());
        assert_eq!(
            store.locate("X"),
            Some(CellAddress {
                edge: "f1-edge-0".into(),
                row: 0,
                col: 0
            })
        );
        assert!(!store.is_dragging());
    }

    #[test]
    fn removing_middle_item_renumbers_cell() {
        let mut store = PlacementStore::new();
        for id in ["A", "B", "C"] {
            place(&mut store, id, "e", 1, 0);
        }
        let removed = store.remove_item("e", 1, 0, 1).unwrap();
        assert_eq!(removed.id, "B");
        assert_eq!(ids(store.cell("e", 1, 0).unwrap()), vec![("A", 0), ("C", 1)]);
    }

    #[test]
    fn remove_item_out_of_range_is_a_no_op() {
        let mut store = PlacementStore::new();
        place(&mut store, "A", "e", 0, 0);
        assert!(store.remove_item("e", 0, 0, 5).is_none());
        assert!(store.remove_item("missing", 0, 0, 0).is_none());
        assert_eq!(store.item_count(), 1);
    }

    #[test]
    fn move_between_edges_keeps_total_and_reindexes() {
        let mut store = PlacementStore::new();
        place(&mut store, "A", "edgeA", 0, 0);
        place(&mut store, "B", "edgeA", 0, 0);
        place(&mut store, "T", "edgeB", 1, 2);
        let total = store.item_count();
        let prior_len = store.cell("edgeB", 1, 2).unwrap().len();

        store.begin_drag_from_cell("edgeA", 0, 0, 0);
        let outcome = store.drop_on_cell("edgeB", 1, 2).unwrap();

        assert_eq!(
            outcome,
            DropOutcome::Moved {
                item_id: "A".into(),
                index: prior_len
            }
        );
        assert_eq!(ids(store.cell("edgeA", 0, 0).unwrap()), vec![("B", 0)]);
        let target = store.cell("edgeB", 1, 2).unwrap();
        assert_eq!(ids(target), vec![("T", 0), ("A", 1)]);
        assert_eq!((target[1].row, target[1].col), (1, 2));
        assert_eq!(store.item_count(), total);
    }

    #[test]
    fn move_within_same_cell_sends_item_to_end() {
        let mut store = PlacementStore::new();
        for id in ["A", "B", "C"] {
            place(&mut store, id, "e", 0, 0);
        }
        store.begin_drag_from_cell("e", 0, 0, 0);
        store.drop_on_cell("e", 0, 0).unwrap();
        assert_eq!(
            ids(store.cell("e", 0, 0).unwrap()),
            vec![("B", 0), ("C", 1), ("A", 2)]
        );
    }

    #[test]
    fn stale_grid_source_leaves_map_unchanged() {
        let mut store = PlacementStore::new();
        place(&mut store, "A", "e", 0, 0);
        let before = store.map().clone();
        store.begin_drag_from_cell("e", 0, 0, 3);
        assert!(matches!(
            store.drop_on_cell("other", 0, 0),
            Err(PlacementError::SourceMissing { .. })
        ));
        assert_eq!(store.map(), &before);
        assert!(!store.is_dragging());
    }

    #[test]
    fn drop_without_drag_is_rejected() {
        let mut store = PlacementStore::new();
        assert_eq!(store.drop_on_cell("e", 0, 0), Err(PlacementError::NotDragging));
        assert!(store.map().is_empty());
    }

    #[test]
    fn cancel_resets_to_idle_without_mutation() {
        let mut store = PlacementStore::new();
        store.begin_drag_from_catalog(Item::new("A", "a"));
        store.cancel_drag();
        assert!(!store.is_dragging());
        assert!(store.map().is_empty());
    }

    #[test]
    fn malformed_transfer_is_caught_at_the_boundary() {
        let mut store = PlacementStore::new();
        store.begin_drag_from_cell("e", 0, 0, 0);
        let err = store.begin_drag_from_transfer("{not json").unwrap_err();
        assert!(matches!(err, PlacementError::MalformedPayload(_)));
        assert!(matches!(store.dragging(), Some(DragState::Grid { .. })));

        store
            .begin_drag_from_transfer(r#"{"id":"P001","name":"Coffee"}"#)
            .unwrap();
        assert!(matches!(store.drop_on_cell("e", 0, 0), Ok(DropOutcome::Placed { .. })));
        assert_eq!(store.locate("P001").map(|a| a.edge), Some("e".into()));
    }

    #[test]
    fn add_row_on_fresh_edge_creates_one_empty_column() {
        let mut store = PlacementStore::new();
        store.add_row("e1");
        let grid = store.grid("e1").unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].len(), 1);
        assert!(grid[0][0].is_empty());
    }

    #[test]
    fn add_column_needs_existing_row() {
        let mut store = PlacementStore::new();
        assert!(!store.add_column("e", 0));
        assert!(store.map().is_empty());
        store.add_row("e");
        assert!(store.add_column("e", 0));
        assert!(!store.add_column("e", 1));
        assert_eq!(store.grid("e").unwrap()[0].len(), 2);
    }

    #[test]
    fn removing_structure_discards_items_and_resyncs_hints() {
        let mut store = PlacementStore::new();
        place(&mut store, "A", "e", 0, 0);
        place(&mut store, "B", "e", 1, 0);
        store.add_column("e", 1);
        place(&mut store, "C", "e", 1, 1);

        let removed = store.remove_row("e", 0).unwrap();
        assert_eq!(removed[0][0].id, "A");
        assert!(store.locate("A").is_none());
        let b = &store.cell("e", 0, 0).unwrap()[0];
        assert_eq!((b.id.as_str(), b.row), ("B", 0));

        let col = store.remove_column("e", 0, 0).unwrap();
        assert_eq!(col[0].id, "B");
        let c = &store.cell("e", 0, 0).unwrap()[0];
        assert_eq!((c.id.as_str(), c.row, c.col), ("C", 0, 0));
    }

    #[test]
    fn out_of_bounds_structure_removal_is_a_no_op() {
        let mut store = PlacementStore::new();
        store.add_row("e");
        assert!(store.remove_row("e", 3).is_none());
        assert!(store.remove_column("e", 0, 1).is_none());
        assert!(store.remove_column("nope", 0, 0).is_none());
        assert_eq!(store.grid("e").unwrap().len(), 1);
    }

    #[test]
    fn untouched_edge_displays_default_shape() {
        let store = PlacementStore::new();
        let grid = store.grid_or_default("f9-edge-2");
        assert_eq!((grid.len(), grid[0].len()), (3, 1));
        assert!(store.grid("f9-edge-2").is_none());
    }

    #[test]
    fn loaded_map_takes_positions_from_nesting() {
        let mut a = Item::new("A", "a");
        a.index = 7;
        let b = Item::new("B", "b");
        let mut map = ItemMap::new();
        map.insert("e".to_string(), vec![vec![vec![a, b]], vec![vec![]]]);

        let mut store = PlacementStore::new();
        store.replace_map(map);
        assert_eq!(ids(store.cell("e", 0, 0).unwrap()), vec![("A", 0), ("B", 1)]);

        store.begin_drag_from_cell("e", 0, 0, 1);
        let outcome = store.drop_on_cell("e", 1, 0).unwrap();
        assert_eq!(
            outcome,
            DropOutcome::Moved {
                item_id: "B".to_string(),
                index: 0
            }
        );
        assert_eq!(ids(store.cell("e", 0, 0).unwrap()), vec![("A", 0)]);
        let moved = &store.cell("e", 1, 0).unwrap()[0];
        assert_eq!((moved.row, moved.col), (1, 0));
    }
}
