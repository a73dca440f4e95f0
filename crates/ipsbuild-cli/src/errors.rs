//! Errors raised by the command layer itself
//!
//! Failures from the library crates are wrapped with `anyhow` context in the
//! command handlers; only conditions the CLI detects on its own live here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Type {0} is not supported")]
    UnsupportedType(String),

    #[error("Plugin directory {} does not exist", .0.display())]
    MissingPluginDir(PathBuf),

    #[error("Plugin name must not be empty")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use crate::errors::*;

    #[test]
    fn test_unsupported_type_display() {
        let err = BuildError::UnsupportedType("application".to_string());
        assert_eq!(err.to_string(), "Type application is not supported");
    }
}
