//! Script store: filesystem discovery and loading of migration units.
//!
//! A unit is one subdirectory of the migrations root holding an `up.sql`
//! (forward) and a `down.sql` (backward) script. The directory is the sole
//! source of truth for what is available to apply; nothing is cached and
//! every load reads the file fresh.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::{MigrateError, MigrateResult};

const FORWARD_SCRIPT: &str = "up.sql";
const BACKWARD_SCRIPT: &str = "down.sql";

pub struct ScriptStore {
    root: PathBuf,
}

impl ScriptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// List unit names in natural (lexical) order.
    ///
    /// A missing migrations root yields an empty list.
    pub fn list_units(&self) -> MigrateResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| MigrateError::Io {
            path: self.root.clone(),
            source: e,
        })?;

        let mut units = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MigrateError::Io {
                path: self.root.clone(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                units.push(name.to_string());
            }
        }

        units.sort();
        Ok(units)
    }

    /// Read the forward (apply) script for a unit.
    pub fn load_forward(&self, unit: &str) -> MigrateResult<String> {
        self.read_script(unit, FORWARD_SCRIPT)
    }

    /// Read the backward (revert) script for a unit.
    pub fn load_backward(&self, unit: &str) -> MigrateResult<String> {
        self.read_script(unit, BACKWARD_SCRIPT)
    }

    fn read_script(&self, unit: &str, file: &str) -> MigrateResult<String> {
        let path = self.root.join(unit).join(file);
        fs::read_to_string(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                MigrateError::ScriptNotFound(path)
            } else {
                MigrateError::Io { path, source: e }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn unit(dir: &TempDir, name: &str, up: &str, down: &str) {
        let unit_dir = dir.path().join(name);
        fs::create_dir_all(&unit_dir).unwrap();
        fs::write(unit_dir.join("up.sql"), up).unwrap();
        fs::write(unit_dir.join("down.sql"), down).unwrap();
    }

    #[test]
    fn lists_units_in_lexical_order() {
        let dir = TempDir::new().unwrap();
        unit(&dir, "002_create_posts", "b", "b");
        unit(&dir, "001_create_users", "a", "a");
        unit(&dir, "010_create_tags", "c", "c");

        let store = ScriptStore::new(dir.path());
        assert_eq!(
            store.list_units().unwrap(),
            vec!["001_create_users", "002_create_posts", "010_create_tags"]
        );
    }

    #[test]
    fn missing_root_yields_empty_list() {
        let store = ScriptStore::new("/nonexistent/migrations/root");
        assert!(store.list_units().unwrap().is_empty());
    }

    #[test]
    fn stray_files_in_root_are_ignored() {
        let dir = TempDir::new().unwrap();
        unit(&dir, "001_create_users", "a", "a");
        fs::write(dir.path().join("README.txt"), "notes").unwrap();

        let store = ScriptStore::new(dir.path());
        assert_eq!(store.list_units().unwrap(), vec!["001_create_users"]);
    }

    #[test]
    fn loads_forward_and_backward_scripts() {
        let dir = TempDir::new().unwrap();
        unit(&dir, "001_create_users", "CREATE TABLE users;", "DROP TABLE users;");

        let store = ScriptStore::new(dir.path());
        assert_eq!(
            store.load_forward("001_create_users").unwrap(),
            "CREATE TABLE users;"
        );
        assert_eq!(
            store.load_backward("001_create_users").unwrap(),
            "DROP TABLE users;"
        );
    }

    #[test]
    fn missing_script_is_not_found() {
        let dir = TempDir::new().unwrap();
        let unit_dir = dir.path().join("001_create_users");
        fs::create_dir_all(&unit_dir).unwrap();
        fs::write(unit_dir.join("up.sql"), "CREATE TABLE users;").unwrap();

        let store = ScriptStore::new(dir.path());
        let err = store.load_backward("001_create_users").unwrap_err();
        assert!(matches!(err, MigrateError::ScriptNotFound(_)));
    }
}
