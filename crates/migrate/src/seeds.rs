//! Seed store: named data-population scripts, applied outside the ledger.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::{MigrateError, MigrateResult};

pub struct SeedStore {
    root: PathBuf,
}

impl SeedStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// List seed unit names (file stems of `*.sql` files) in lexical order.
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
            if path.extension().map_or(false, |ext| ext == "sql") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    units.push(stem.to_string());
                }
            }
        }

        units.sort();
        Ok(units)
    }

    /// Read the SQL payload for a named seed unit.
    pub fn load(&self, unit: &str) -> MigrateResult<String> {
        let path = self.root.join(format!("{}.sql", unit));
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

    #[test]
    fn lists_sql_stems_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("users.sql"), "INSERT INTO users VALUES (1);").unwrap();
        fs::write(dir.path().join("init.sql"), "INSERT INTO a VALUES (1);").unwrap();
        fs::write(dir.path().join("notes.md"), "not a seed").unwrap();

        let store = SeedStore::new(dir.path());
        assert_eq!(store.list_units().unwrap(), vec!["init", "users"]);
    }

    #[test]
    fn missing_root_yields_empty_list() {
        let store = SeedStore::new("/nonexistent/seeders/root");
        assert!(store.list_units().unwrap().is_empty());
    }

    #[test]
    fn loads_seed_by_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("init.sql"), "INSERT INTO a VALUES (1);").unwrap();

        let store = SeedStore::new(dir.path());
        assert_eq!(store.load("init").unwrap(), "INSERT INTO a VALUES (1);");
    }

    #[test]
    fn missing_seed_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = SeedStore::new(dir.path());
        let err = store.load("init").unwrap_err();
        assert!(matches!(err, MigrateError::ScriptNotFound(_)));
    }
}
