use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::config::get_user_data_dir;

/// Key/value store for visual preferences, written through to a JSON file
/// so they survive restarts. Absence of a key is meaningful (use default)
/// and distinct from an empty string.
pub struct PrefStore {
    path: Option<PathBuf>,
    values: HashMap<String, String>,
}

impl PrefStore {
    /// Opens the store at the default location under the user's data dir.
    pub fn open_default() -> Self {
        let path = get_user_data_dir().map(|dir| dir.join("prefs.json"));
        Self::open(path)
    }

    /// Opens a store backed by the given file, or an in-memory one if `None`.
    /// An unreadable or malformed file starts the store empty.
    pub fn open(path: Option<PathBuf>) -> Self {
        let mut values = HashMap::new();
        if let Some(path) = &path {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(parsed) = serde_json::from_str::<HashMap<String, String>>(&content) {
                    values = parsed;
                }
            }
        }
        PrefStore { path, values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.flush();
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
        self.flush();
    }

    /// Drops every key in the store, including ones this app never wrote.
    pub fn clear(&mut self) {
        self.values.clear();
        self.flush();
    }

    fn flush(&self) {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(&self.values) {
                let _ = fs::write(path, json);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = PrefStore::open(Some(path.clone()));
        assert_eq!(store.get("theme"), None);

        store.set("theme", "pink");
        store.set("opacity", "70");
        assert_eq!(store.get("theme"), Some("pink"));

        // A fresh handle sees the persisted values.
        let reopened = PrefStore::open(Some(path.clone()));
        assert_eq!(reopened.get("theme"), Some("pink"));
        assert_eq!(reopened.get("opacity"), Some("70"));

        store.remove("theme");
        assert_eq!(store.get("theme"), None);
        let reopened = PrefStore::open(Some(path));
        assert_eq!(reopened.get("theme"), None);
    }

    #[test]
    fn empty_string_is_not_absence() {
        let mut store = PrefStore::open(None);
        store.set("wallpaper", "");
        assert_eq!(store.get("wallpaper"), Some(""));
    }

    #[test]
    fn clear_removes_unrelated_keys_too() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = PrefStore::open(Some(path.clone()));
        store.set("theme", "blue");
        store.set("somebody-elses-key", "x");
        store.clear();

        assert_eq!(store.get("theme"), None);
        assert_eq!(store.get("somebody-elses-key"), None);
        let reopened = PrefStore::open(Some(path));
        assert_eq!(reopened.get("somebody-elses-key"), None);
    }

    #[test]
    fn malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json at all").unwrap();

        let store = PrefStore::open(Some(path));
        assert_eq!(store.get("theme"), None);
    }
}
