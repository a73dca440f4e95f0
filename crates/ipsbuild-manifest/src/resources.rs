//! Static files shipped inside the manifest
//!
//! Files are collected under `dev/<kind>/`, sorted by path, then read and
//! base64 encoded in parallel. `dev/resources` takes any file that has an
//! extension, except `index.html` placeholders.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::{ManifestError, Result};
use crate::types::ResourceFile;

/// A resource directory and the files taken from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Html,
    Css,
    Js,
    Resources,
}

impl ResourceKind {
    /// Directory name under `dev/`, also the XML element name of each file
    pub fn dir_name(self) -> &'static str {
        match self {
            ResourceKind::Html => "html",
            ResourceKind::Css => "css",
            ResourceKind::Js => "js",
            ResourceKind::Resources => "resources",
        }
    }

    fn accepts(self, path: &Path) -> bool {
        let extension = path.extension().and_then(|s| s.to_str());
        match self {
            ResourceKind::Html => extension == Some("phtml"),
            ResourceKind::Css => extension == Some("css"),
            ResourceKind::Js => extension == Some("js"),
            ResourceKind::Resources => {
                extension.is_some()
                    && path.file_name().and_then(|s| s.to_str()) != Some("index.html")
            }
        }
    }
}

/// Collect and encode every file of `kind` below `base_path/dev/`
pub fn collect(base_path: &Path, kind: ResourceKind) -> Result<Vec<ResourceFile>> {
    let root = base_path.join("dev").join(kind.dir_name());
    if !root.is_dir() {
        debug!("No {} directory at {:?}", kind.dir_name(), root);
        return Ok(Vec::new());
    }

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(|e| ManifestError::Io {
            path: e.path().map_or_else(|| root.clone(), Path::to_path_buf),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || !kind.accepts(entry.path()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(&root) {
            files.push((relative_name(relative), entry.path().to_path_buf()));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    debug!("Encoding {} {} file(s)", files.len(), kind.dir_name());
    files
        .into_par_iter()
        .map(|(filename, path)| {
            let bytes = fs::read(&path).map_err(|source| ManifestError::Io { path, source })?;
            Ok(ResourceFile {
                filename,
                contents: STANDARD.encode(bytes),
            })
        })
        .collect()
}

fn relative_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
