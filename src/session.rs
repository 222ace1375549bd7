use serde::{Deserialize, Serialize};
use std::fmt;

use crate::editor::mode::EditorMode;

/// Role of the signed-in user, supplied by whatever authenticates them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    #[default]
    Manager,
    Cashier,
    Staff,
    Security,
    Supplier,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Manager,
        Role::Cashier,
        Role::Staff,
        Role::Security,
        Role::Supplier,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Cashier => "CASHIER",
            Role::Staff => "STAFF",
            Role::Security => "SECURITY",
            Role::Supplier => "SUPPLIER",
        }
    }

    /// Layout, item-map and inventory editing need an elevated role.
    pub fn can_edit_layout(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    pub fn can_open(self, mode: EditorMode) -> bool {
        match mode {
            EditorMode::Inventory | EditorMode::Layout | EditorMode::ItemMap => {
                self.can_edit_layout()
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_and_manager_edit_layouts() {
        let editors: Vec<_> = Role::ALL.into_iter().filter(|r| r.can_edit_layout()).collect();
        assert_eq!(editors, vec![Role::Admin, Role::Manager]);
    }

    #[test]
    fn every_editor_needs_an_elevated_role() {
        for role in Role::ALL {
            for mode in EditorMode::ALL {
                assert_eq!(role.can_open(mode), role.can_edit_layout(), "{role} {mode:?}");
            }
        }
        assert!(!Role::Cashier.can_open(EditorMode::Inventory));
        assert!(Role::Manager.can_open(EditorMode::Inventory));
    }

    #[test]
    fn roles_use_upper_case_names_in_config() {
        assert_eq!(serde_json::to_string(&Role::Supplier).unwrap(), "\"SUPPLIER\"");
        let parsed: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(parsed, Role::Admin);
        assert_eq!(Role::Security.to_string(), "SECURITY");
    }
}
