//! Access to files in a plugin source tree
//!
//! All paths are relative to the plugin base directory. Optional files
//! distinguish "not there" from "unreadable": only `NotFound` maps to `None`.

use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{ManifestError, Result};

#[derive(Debug, Clone)]
pub struct PluginSource {
    base_path: PathBuf,
}

impl PluginSource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        PluginSource {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.base_path.join(relative)
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.path(relative);
        fs::read_to_string(&path).map_err(|source| ManifestError::Io { path, source })
    }

    pub fn read_optional(&self, relative: &str) -> Result<Option<String>> {
        let path = self.path(relative);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ManifestError::Io { path, source }),
        }
    }

    pub fn read_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T> {
        let contents = self.read(relative)?;
        self.decode_json(relative, &contents)
    }

    pub fn read_json_optional<T: DeserializeOwned>(&self, relative: &str) -> Result<Option<T>> {
        match self.read_optional(relative)? {
            Some(contents) => self.decode_json(relative, &contents).map(Some),
            None => Ok(None),
        }
    }

    fn decode_json<T: DeserializeOwned>(&self, relative: &str, contents: &str) -> Result<T> {
        serde_json::from_str(contents).map_err(|source| ManifestError::Json {
            path: self.path(relative),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    #[test]
    fn test_read_optional_missing_file() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let source = PluginSource::new(temp_dir.path());
        assert!(matches!(source.read_optional("dev/none.json"), Ok(None)));
        assert!(matches!(
            source.read("dev/none.json"),
            Err(ManifestError::Io { .. })
        ));
    }

    #[test]
    fn test_read_json_preserves_key_order() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        if fs::write(temp_dir.path().join("tasks.json"), r#"{"zeta": "P1D", "alpha": "PT1M"}"#)
            .is_err()
        {
            return;
        }
        let source = PluginSource::new(temp_dir.path());
        let tasks: Result<IndexMap<String, String>> = source.read_json("tasks.json");
        let keys: Vec<String> = tasks.map(|t| t.into_keys().collect()).unwrap_or_default();
        assert_eq!(keys, vec!["zeta".to_string(), "alpha".to_string()]);
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        if fs::write(temp_dir.path().join("bad.json"), "{").is_err() {
            return;
        }
        let source = PluginSource::new(temp_dir.path());
        let result: Result<Option<IndexMap<String, String>>> = source.read_json_optional("bad.json");
        assert!(matches!(result, Err(ManifestError::Json { path, .. }) if path.ends_with("bad.json")));
    }
}
