use serde::{Deserialize, Serialize};
use std::fmt;

/// The three editing surfaces. Exactly one is open at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorMode {
    #[default]
    Inventory,
    Layout,
    ItemMap,
}

impl EditorMode {
    pub const ALL: [EditorMode; 3] = [EditorMode::Inventory, EditorMode::Layout, EditorMode::ItemMap];

    pub fn label(self) -> &'static str {
        match self {
            EditorMode::Inventory => "Inventory Editor",
            EditorMode::Layout => "Layout Editor",
            EditorMode::ItemMap => "Item Map Editor",
        }
    }
}

/// Tracks which editor is open.
///
/// Toggling always opens the target and closes the rest, including when the
/// target is already open, so the set of open editors is never empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorModes {
    active: EditorMode,
}

impl EditorModes {
    pub fn active(&self) -> EditorMode {
        self.active
    }

    pub fn is_open(&self, mode: EditorMode) -> bool {
        self.active == mode
    }

    pub fn toggle(&mut self, target: EditorMode) {
        if self.active != target {
            log::debug!("Switching editor {:?} -> {:?}", self.active, target);
        }
        self.active = target;
    }
}

/// Per-session canvas mode. Edges and vertices are only interactive in `Edit`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FixtureEditMode {
    #[default]
    Object,
    Edit,
}

impl FixtureEditMode {
    pub fn label(self) -> &'static str {
        match self {
            FixtureEditMode::Object => "Object Mode",
            FixtureEditMode::Edit => "Edit Mode",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FixtureEditMode::Object => FixtureEditMode::Edit,
            FixtureEditMode::Edit => FixtureEditMode::Object,
        }
    }
}

impl fmt::Display for FixtureEditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_is_open_initially() {
        let modes = EditorModes::default();
        assert!(modes.is_open(EditorMode::Inventory));
        assert!(!modes.is_open(EditorMode::Layout));
    }

    #[test]
    fn toggle_opens_target_and_closes_rest() {
        let mut modes = EditorModes::default();
        modes.toggle(EditorMode::ItemMap);
        let open: Vec<_> = EditorMode::ALL.iter().filter(|m| modes.is_open(**m)).collect();
        assert_eq!(open, vec![&EditorMode::ItemMap]);
    }

    #[test]
    fn toggling_the_active_editor_keeps_it_open() {
        let mut modes = EditorModes::default();
        modes.toggle(EditorMode::Layout);
        modes.toggle(EditorMode::Layout);
        assert_eq!(modes.active(), EditorMode::Layout);
    }

    #[test]
    fn edit_mode_labels_match_session_names() {
        assert_eq!(FixtureEditMode::Object.to_string(), "Object Mode");
        assert_eq!(FixtureEditMode::Object.toggled(), FixtureEditMode::Edit);
    }
}
