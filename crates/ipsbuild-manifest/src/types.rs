//! Plugin manifest model
//!
//! Two groups of types live here:
//! - the JSON files developers keep under `dev/` (`HooksFile`, `TasksFile`, ...)
//! - the manifest written to XML (`PluginData` and its sections)

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// SOURCE FILES - dev/*.json
// =============================================================================

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HookDefinition {
    #[serde(rename = "type")]
    pub hook_type: String,
    pub class: String,
}

/// `dev/hooks.json`: hook file name -> definition
pub type HooksFile = IndexMap<String, HookDefinition>;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SettingDefinition {
    pub key: String,
    #[serde(default)]
    pub default: Value,
}

/// `dev/settings.json`
pub type SettingsFile = Vec<SettingDefinition>;

/// `dev/tasks.json`: task key -> ISO 8601 frequency
pub type TasksFile = IndexMap<String, String>;

/// `dev/widgets.json`: widget key -> widget attributes
pub type WidgetsFile = IndexMap<String, IndexMap<String, Value>>;

/// `dev/versions.json`: long version id -> human version
pub type VersionsFile = IndexMap<String, String>;

// =============================================================================
// MANIFEST
// =============================================================================

/// Everything written into `<plugin>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginData {
    pub attributes: PluginAttributes,
    pub hooks: Vec<Hook>,
    pub settings: Vec<Setting>,
    pub uninstall: Option<String>,
    pub settings_code: Option<String>,
    pub tasks: Vec<Task>,
    pub widgets: Vec<Widget>,
    pub html_files: Vec<ResourceFile>,
    pub css_files: Vec<ResourceFile>,
    pub js_files: Vec<ResourceFile>,
    pub resource_files: Vec<ResourceFile>,
    pub lang: Vec<LangWord>,
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginAttributes {
    pub name: String,
    pub version_human: String,
    pub version_long: u32,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
    pub filename: String,
    pub hook_type: String,
    pub class: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub key: String,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub key: String,
    pub frequency: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub key: String,
    /// Attributes after `key`, in `widgets.json` order
    pub attributes: Vec<(String, String)>,
    pub code: String,
}

/// A static file, base64 encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    /// Path relative to the resource directory, `/`-separated
    pub filename: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangWord {
    pub key: String,
    pub value: String,
    /// Whether the word comes from `jslang.php`
    pub js: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    pub human: String,
    pub long: u32,
    /// Install or upgrade code from `dev/setup/`
    pub code: Option<String>,
}

/// Render a JSON value as attribute/element text.
///
/// Arrays are joined with `,`; `null` has no text.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| value_text(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}
