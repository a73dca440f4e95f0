//! IPS plugin manifest building
//!
//! Reads a plugin source tree (the `dev/` directory plus hook, task and widget
//! code) and produces the single XML file IPS imports a plugin from.
//!
//! The version of the build comes from `git describe --tags` and is resolved
//! against `dev/versions.json`; see [`versions`].

pub mod errors;
pub mod plugin;
pub mod resources;
pub mod source;
pub mod types;
pub mod versions;
pub mod xml_writer;

pub use errors::{ManifestError, Result};
pub use plugin::{Plugin, VersionSummary};
pub use types::{
    Hook, LangWord, PluginAttributes, PluginData, ResourceFile, Setting, Task, VersionEntry, Widget,
};
pub use versions::{version_info, FixedVersion, GitDescribe, VersionInfo, VersionSource};

// Re-export manifest output helpers
pub use xml_writer::{to_xml_string, write_to_path};
