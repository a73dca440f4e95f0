use ipsbuild_php::PhpArrayError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a plugin manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Php {
        path: PathBuf,
        #[source]
        source: PhpArrayError,
    },

    #[error("Failed to find a git tag. Make sure the repo is tagged and was checked out with fetch-depth: 0.")]
    MissingGitTag,

    #[error("Could not find the git executable: {0}")]
    GitNotFound(String),

    #[error("Tag {0} did not match expected format \\d+.\\d+.\\d+")]
    InvalidTag(String),

    #[error("Running on tag {0}, but no versions found in versions.json")]
    NoVersions(String),

    #[error("versions.json doesn't contain an entry for the current version {0}")]
    UnknownVersion(String),

    #[error("versions.json has a non-numeric long version: {0}")]
    InvalidLongVersion(String),

    #[error("File dev/setup/install.php exists and is modified, but you have no version with long id 10000")]
    ModifiedInstallFile,

    #[error("Invalid pattern: {0}")]
    Pattern(String),

    #[error("Failed to write XML: {0}")]
    Xml(String),
}

pub type Result<T> = std::result::Result<T, ManifestError>;

#[cfg(test)]
mod tests {
    use crate::errors::*;

    #[test]
    fn test_io_error_display_includes_path() {
        let err = ManifestError::Io {
            path: PathBuf::from("dev/hooks.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "Failed to read dev/hooks.json: missing");
    }

    #[test]
    fn test_invalid_tag_display() {
        let err = ManifestError::InvalidTag("w1.2.3".to_string());
        assert_eq!(
            err.to_string(),
            "Tag w1.2.3 did not match expected format \\d+.\\d+.\\d+"
        );
    }
}
