use crate::editor::mode::EditorMode;
use crate::session::Role;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub(super) struct AppSettings {
    pub layout_path: String,
    pub catalog_path: String,
    pub role: Role,
    pub initial_editor: EditorMode,
    pub show_axes: bool,
    /// Screen pixels.
    pub vertex_handle_radius: f32,
    /// Screen pixels.
    pub edge_pick_tolerance: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            layout_path: "layout.json".to_string(),
            catalog_path: "products.json".to_string(),
            role: Role::default(),
            initial_editor: EditorMode::default(),
            show_axes: true,
            vertex_handle_radius: 6.0,
            edge_pick_tolerance: 5.0,
        }
    }
}

pub(super) fn load_settings(path: &str) -> Option<AppSettings> {
    let s = std::fs::read_to_string(path).ok()?;
    let parsed = if path.ends_with(".toml") {
        toml::from_str::<AppSettings>(&s)
            .ok()
            .or_else(|| serde_json::from_str::<AppSettings>(&s).ok())
    } else {
        serde_json::from_str::<AppSettings>(&s)
            .ok()
            .or_else(|| toml::from_str::<AppSettings>(&s).ok())
    };
    if parsed.is_none() {
        log::warn!("Ignoring unreadable settings file {path}");
    }
    parsed
}

pub(super) fn save_settings(path: &str, settings: &AppSettings) -> Result<(), String> {
    if path.ends_with(".toml") {
        let toml = toml::to_string_pretty(settings).map_err(|e| e.to_string())?;
        std::fs::write(path, toml).map_err(|e| e.to_string())
    } else {
        let json = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
        std::fs::write(path, json).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "role = \"CASHIER\"\nshow_axes = false\n").unwrap();
        let settings = load_settings(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.role, Role::Cashier);
        assert!(!settings.show_axes);
        assert_eq!(settings.layout_path, "layout.json");
        assert_eq!(settings.initial_editor, EditorMode::Inventory);
    }

    #[test]
    fn json_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let path = path.to_str().unwrap();
        let settings = AppSettings {
            layout_path: "store-12.json".into(),
            initial_editor: EditorMode::Layout,
            ..AppSettings::default()
        };
        save_settings(path, &settings).unwrap();
        let loaded = load_settings(path).unwrap();
        assert_eq!(loaded.layout_path, "store-12.json");
        assert_eq!(loaded.initial_editor, EditorMode::Layout);
    }

    #[test]
    fn garbage_settings_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "role = [").unwrap();
        assert!(load_settings(path.to_str().unwrap()).is_none());
    }
}
