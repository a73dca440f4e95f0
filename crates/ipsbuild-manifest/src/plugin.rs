//! Reading a plugin source tree into [`PluginData`]

use ipsbuild_logger as logger;
use ipsbuild_php::parse_associative_array;
use md5::{Digest, Md5};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{ManifestError, Result};
use crate::resources::{self, ResourceKind};
use crate::source::PluginSource;
use crate::types::{
    value_text, Hook, HooksFile, LangWord, PluginAttributes, PluginData, ResourceFile, Setting,
    SettingsFile, Task, TasksFile, VersionEntry, VersionsFile, Widget, WidgetsFile,
};
use crate::versions::{compiled, git_version, is_snapshot, GitDescribe, VersionSource};
use crate::xml_writer;

/// MD5 of the stock `dev/setup/install.php` shipped by IPS 4.4 and 4.5
const STOCK_INSTALL_HASHES: [&str; 2] = [
    "bbf8db70ada6957e837f3633beb0532a",
    "8c377d7437144f4356d2f1e0fad0ea6f",
];

/// Long version whose upgrade code lives in `install.php`
const INSTALL_LONG_VERSION: u32 = 10000;

static WIDGET_NAMESPACE: Lazy<std::result::Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"namespace IPS\\plugins\\[^\\]+\\widgets"));

static WIDGET_PLUGIN_ID: Lazy<std::result::Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"public \$plugin = '\d+';"));

/// Versions section together with the version of the build itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSummary {
    pub versions: Vec<VersionEntry>,
    pub human: String,
    pub long: u32,
}

pub struct Plugin {
    source: PluginSource,
    name: String,
    website: Option<String>,
    version_source: Box<dyn VersionSource>,
}

impl Plugin {
    /// A plugin whose version comes from `git describe`
    pub fn new(
        base_path: impl Into<PathBuf>,
        name: impl Into<String>,
        website: Option<String>,
    ) -> Self {
        Self::with_version_source(base_path, name, website, Box::new(GitDescribe))
    }

    pub fn with_version_source(
        base_path: impl Into<PathBuf>,
        name: impl Into<String>,
        website: Option<String>,
        version_source: Box<dyn VersionSource>,
    ) -> Self {
        Plugin {
            source: PluginSource::new(base_path),
            name: name.into(),
            website,
            version_source,
        }
    }

    pub fn base_path(&self) -> &Path {
        self.source.base_path()
    }

    /// Serialise the whole plugin to manifest XML
    pub fn to_xml(&self) -> Result<String> {
        xml_writer::to_xml_string(&self.data()?)
    }

    pub fn data(&self) -> Result<PluginData> {
        debug!("Reading plugin {} from {:?}", self.name, self.base_path());
        let summary = section("versions", || self.versions())?;

        let data = PluginData {
            attributes: PluginAttributes {
                name: self.name.clone(),
                version_human: summary.human,
                version_long: summary.long,
                website: self.website.clone(),
            },
            hooks: section("hooks", || self.hooks())?,
            settings: section("settings", || self.settings())?,
            uninstall: section("uninstall code", || self.uninstall())?,
            settings_code: section("settings code", || self.settings_code())?,
            tasks: section("tasks", || self.tasks())?,
            widgets: section("widgets", || self.widgets())?,
            html_files: section("html", || self.html_files())?,
            css_files: section("css", || self.css_files())?,
            js_files: section("js", || self.js_files())?,
            resource_files: section("resources", || self.resource_files())?,
            lang: section("lang", || self.lang())?,
            versions: summary.versions,
        };

        info!(
            "Plugin {} {}: {} hook(s), {} task(s), {} widget(s), {} version(s)",
            data.attributes.name,
            data.attributes.version_human,
            data.hooks.len(),
            data.tasks.len(),
            data.widgets.len(),
            data.versions.len()
        );
        Ok(data)
    }

    pub fn hooks(&self) -> Result<Vec<Hook>> {
        let hooks: HooksFile = self.source.read_json("dev/hooks.json")?;
        if hooks.is_empty() {
            logger::warn("dev/hooks.json defines no hooks");
        }
        hooks
            .into_iter()
            .map(|(filename, definition)| {
                let code = self.source.read(&format!("hooks/{}.php", filename))?;
                Ok(Hook {
                    filename,
                    hook_type: definition.hook_type,
                    class: definition.class,
                    code,
                })
            })
            .collect()
    }

    pub fn settings(&self) -> Result<Vec<Setting>> {
        let settings: Option<SettingsFile> = self.source.read_json_optional("dev/settings.json")?;
        Ok(settings
            .unwrap_or_default()
            .into_iter()
            .map(|setting| Setting {
                key: setting.key,
                default: value_text(&setting.default).unwrap_or_default(),
            })
            .collect())
    }

    pub fn tasks(&self) -> Result<Vec<Task>> {
        let tasks: Option<TasksFile> = self.source.read_json_optional("dev/tasks.json")?;
        tasks
            .unwrap_or_default()
            .into_iter()
            .map(|(key, frequency)| {
                let code = self.source.read(&format!("tasks/{}.php", key))?;
                Ok(Task {
                    key,
                    frequency,
                    code,
                })
            })
            .collect()
    }

    pub fn widgets(&self) -> Result<Vec<Widget>> {
        let widgets: Option<WidgetsFile> = self.source.read_json_optional("dev/widgets.json")?;
        widgets
            .unwrap_or_default()
            .into_iter()
            .map(|(key, data)| {
                let raw = self.source.read(&format!("widgets/{}.php", key))?;
                let attributes = data
                    .iter()
                    .filter_map(|(name, value)| value_text(value).map(|text| (name.clone(), text)))
                    .collect();
                Ok(Widget {
                    key,
                    attributes,
                    code: normalise_widget(&raw)?,
                })
            })
            .collect()
    }

    pub fn html_files(&self) -> Result<Vec<ResourceFile>> {
        resources::collect(self.base_path(), ResourceKind::Html)
    }

    pub fn css_files(&self) -> Result<Vec<ResourceFile>> {
        resources::collect(self.base_path(), ResourceKind::Css)
    }

    pub fn js_files(&self) -> Result<Vec<ResourceFile>> {
        resources::collect(self.base_path(), ResourceKind::Js)
    }

    pub fn resource_files(&self) -> Result<Vec<ResourceFile>> {
        resources::collect(self.base_path(), ResourceKind::Resources)
    }

    /// Words from `dev/lang.php`, then those from `dev/jslang.php`
    pub fn lang(&self) -> Result<Vec<LangWord>> {
        let mut words = self.lang_file("dev/lang.php", false)?;
        words.extend(self.lang_file("dev/jslang.php", true)?);
        Ok(words)
    }

    fn lang_file(&self, relative: &str, js: bool) -> Result<Vec<LangWord>> {
        let Some(contents) = self.source.read_optional(relative)? else {
            return Ok(Vec::new());
        };
        let words = parse_associative_array(&contents).map_err(|source| ManifestError::Php {
            path: self.source.path(relative),
            source,
        })?;
        Ok(words
            .into_iter()
            .map(|(key, value)| LangWord { key, value, js })
            .collect())
    }

    pub fn uninstall(&self) -> Result<Option<String>> {
        self.source.read_optional("dev/uninstall.php")
    }

    pub fn settings_code(&self) -> Result<Option<String>> {
        self.source.read_optional("dev/settings.php")
    }

    /// Resolve the build version against `dev/versions.json`
    pub fn versions(&self) -> Result<VersionSummary> {
        let human = git_version(self.version_source.as_ref(), self.base_path())?;
        let Some(file) = self.source.read_json_optional::<VersionsFile>("dev/versions.json")? else {
            return Ok(VersionSummary {
                versions: Vec::new(),
                human,
                long: 0,
            });
        };

        let mut known = file
            .into_iter()
            .map(|(long, human)| {
                long.trim()
                    .parse::<u32>()
                    .map(|long| (long, human))
                    .map_err(|_| ManifestError::InvalidLongVersion(long))
            })
            .collect::<Result<Vec<(u32, String)>>>()?;
        known.sort_by_key(|(long, _)| *long);

        let long = if known.is_empty() {
            if !is_snapshot(&human) && human != "0.0.0" {
                return Err(ManifestError::NoVersions(human));
            }
            0
        } else if is_snapshot(&human) {
            known.last().map_or(0, |(long, _)| *long)
        } else {
            known
                .iter()
                .find(|(_, entry)| *entry == human)
                .map(|(long, _)| *long)
                .ok_or_else(|| ManifestError::UnknownVersion(human.clone()))?
        };

        if !known.is_empty() && !known.iter().any(|(long, _)| *long == INSTALL_LONG_VERSION) {
            self.check_install_file()?;
        }

        let versions = known
            .into_iter()
            .map(|(long, human)| {
                let setup = if long == INSTALL_LONG_VERSION {
                    "dev/setup/install.php".to_string()
                } else {
                    format!("dev/setup/{}.php", long)
                };
                Ok(VersionEntry {
                    human,
                    long,
                    code: self.source.read_optional(&setup)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Resolved version {} ({})", human, long);
        Ok(VersionSummary {
            versions,
            human,
            long,
        })
    }

    /// A modified install file is only picked up for long version 10000
    fn check_install_file(&self) -> Result<()> {
        let Some(contents) = self.source.read_optional("dev/setup/install.php")? else {
            return Ok(());
        };
        let normalised = contents.replace("\r\n", "\n");
        let hash = format!("{:x}", Md5::digest(normalised.as_bytes()));
        if STOCK_INSTALL_HASHES.contains(&hash.as_str()) {
            Ok(())
        } else {
            Err(ManifestError::ModifiedInstallFile)
        }
    }
}

/// Read one manifest section, recording it as a build step
fn section<T>(name: &str, read: impl FnOnce() -> Result<T>) -> Result<T> {
    logger::step(&format!("Reading {}", name));
    read()
}

/// Replace install specific values in widget code with IPS placeholders
fn normalise_widget(code: &str) -> Result<String> {
    let code = compiled(&WIDGET_NAMESPACE)?
        .replace_all(code, NoExpand(r"namespace IPS\plugins\<{LOCATION}>\widgets"));
    let code =
        compiled(&WIDGET_PLUGIN_ID)?.replace_all(&code, NoExpand("public $plugin = '<{ID}>';"));
    Ok(code.replacen("public $app = '';", "", 1))
}

#[cfg(test)]
mod tests {
    use crate::plugin::*;
    use crate::versions::FixedVersion;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = fs::write(path, contents);
    }

    fn plugin(root: &Path, version: &str) -> Plugin {
        Plugin::with_version_source(
            root,
            "Test",
            None,
            Box::new(FixedVersion(version.to_string())),
        )
    }

    #[test]
    fn test_reads_all_hooks_in_order() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let root = temp_dir.path();
        write(
            root,
            "dev/hooks.json",
            r#"{"myCodeHook": {"type": "C", "class": "\\IPS\\Test"},
                "myThemeHook": {"type": "S", "class": "\\IPS\\Theme\\class_test"}}"#,
        );
        write(root, "hooks/myCodeHook.php", "code hook");
        write(root, "hooks/myThemeHook.php", "theme hook");

        let hooks = plugin(root, "1.0.0").hooks().unwrap_or_default();
        assert_eq!(
            hooks,
            vec![
                Hook {
                    filename: "myCodeHook".to_string(),
                    hook_type: "C".to_string(),
                    class: "\\IPS\\Test".to_string(),
                    code: "code hook".to_string(),
                },
                Hook {
                    filename: "myThemeHook".to_string(),
                    hook_type: "S".to_string(),
                    class: "\\IPS\\Theme\\class_test".to_string(),
                    code: "theme hook".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_hooks_file_is_required() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        assert!(matches!(
            plugin(temp_dir.path(), "1.0.0").hooks(),
            Err(ManifestError::Io { .. })
        ));
    }

    #[test]
    fn test_optional_sections_default_to_empty() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let plugin = plugin(temp_dir.path(), "1.0.0");
        assert!(plugin.settings().is_ok_and(|s| s.is_empty()));
        assert!(plugin.tasks().is_ok_and(|t| t.is_empty()));
        assert!(plugin.widgets().is_ok_and(|w| w.is_empty()));
        assert!(plugin.lang().is_ok_and(|l| l.is_empty()));
        assert!(matches!(plugin.uninstall(), Ok(None)));
        assert!(matches!(plugin.settings_code(), Ok(None)));
    }

    #[test]
    fn test_reads_settings_and_tasks() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let root = temp_dir.path();
        write(
            root,
            "dev/settings.json",
            r#"[{"key": "setting 1", "default": "5"}, {"key": "setting 2", "default": ""}]"#,
        );
        write(root, "dev/tasks.json", r#"{"task1": "PT1M", "task2": "P1Y"}"#);
        write(root, "tasks/task1.php", "task 1");
        write(root, "tasks/task2.php", "task 2");

        let plugin = plugin(root, "1.0.0");
        assert_eq!(
            plugin.settings().unwrap_or_default(),
            vec![
                Setting {
                    key: "setting 1".to_string(),
                    default: "5".to_string(),
                },
                Setting {
                    key: "setting 2".to_string(),
                    default: String::new(),
                },
            ]
        );
        let tasks = plugin.tasks().unwrap_or_default();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].key, "task2");
        assert_eq!(tasks[1].frequency, "P1Y");
        assert_eq!(tasks[1].code, "task 2");
    }

    #[test]
    fn test_widget_attributes_join_arrays() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let root = temp_dir.path();
        write(
            root,
            "dev/widgets.json",
            r#"{"myWidget": {"class": "\\IPS\\Widget", "restrict": ["test", "otherTest"], "embeddable": true, "allow_reuse": null}}"#,
        );
        write(root, "widgets/myWidget.php", "my widget");

        let widgets = plugin(root, "1.0.0").widgets().unwrap_or_default();
        assert_eq!(
            widgets,
            vec![Widget {
                key: "myWidget".to_string(),
                attributes: vec![
                    ("class".to_string(), "\\IPS\\Widget".to_string()),
                    ("restrict".to_string(), "test,otherTest".to_string()),
                    ("embeddable".to_string(), "true".to_string()),
                ],
                code: "my widget".to_string(),
            }]
        );
    }

    #[test]
    fn test_widget_code_is_normalised() {
        let code = "<?php\n\
                    namespace IPS\\plugins\\test\\widgets;\n\
                    class MyWidget {\n    public $plugin = '34';\n    public $app = '';\n}\n";
        let expected = "<?php\n\
                        namespace IPS\\plugins\\<{LOCATION}>\\widgets;\n\
                        class MyWidget {\n    public $plugin = '<{ID}>';\n    \n}\n";
        assert!(normalise_widget(code).is_ok_and(|c| c == expected));
    }

    #[test]
    fn test_lang_words_from_both_files() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let root = temp_dir.path();
        write(root, "dev/lang.php", "<?php\n$lang = array('a' => 'A', 'b' => 'B');\n");
        write(root, "dev/jslang.php", "<?php\n$lang = ['c' => \"C\\n\"];\n");

        let words = plugin(root, "1.0.0").lang().unwrap_or_default();
        let flat: Vec<(&str, &str, bool)> = words
            .iter()
            .map(|w| (w.key.as_str(), w.value.as_str(), w.js))
            .collect();
        assert_eq!(flat, vec![("a", "A", false), ("b", "B", false), ("c", "C\n", true)]);
    }

    #[test]
    fn test_bad_lang_file_reports_path() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        write(temp_dir.path(), "dev/lang.php", "<?php\n$lang = array('a' => 'A'\n");
        assert!(matches!(
            plugin(temp_dir.path(), "1.0.0").lang(),
            Err(ManifestError::Php { path, .. }) if path.ends_with("lang.php")
        ));
    }

    #[test]
    fn test_versions_without_file() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let summary = plugin(temp_dir.path(), "v1.2.3").versions();
        assert!(matches!(
            summary,
            Ok(VersionSummary { ref versions, ref human, long: 0 }) if versions.is_empty() && human == "1.2.3"
        ));
    }

    #[test]
    fn test_versions_on_tag() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let root = temp_dir.path();
        write(root, "dev/versions.json", r#"{"10001": "1.0.1", "10000": "1.0.0"}"#);
        write(root, "dev/setup/install.php", "install");
        write(root, "dev/setup/10001.php", "upgrade");

        let Ok(summary) = plugin(root, "1.0.0").versions() else {
            panic!("versions should resolve");
        };
        assert_eq!(summary.long, 10000);
        assert_eq!(
            summary.versions,
            vec![
                VersionEntry {
                    human: "1.0.0".to_string(),
                    long: 10000,
                    code: Some("install".to_string()),
                },
                VersionEntry {
                    human: "1.0.1".to_string(),
                    long: 10001,
                    code: Some("upgrade".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_snapshot_uses_largest_long_version() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let root = temp_dir.path();
        write(root, "dev/versions.json", r#"{"9000": "0.9.0", "10000": "1.0.0"}"#);

        let summary = plugin(root, "1.0.0-3-gabc123").versions();
        assert!(summary.is_ok_and(|s| s.long == 10000 && s.versions[0].long == 9000));
    }

    #[test]
    fn test_version_resolution_errors() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let root = temp_dir.path();
        write(root, "dev/versions.json", "{}");
        assert!(matches!(
            plugin(root, "1.0.0").versions(),
            Err(ManifestError::NoVersions(_))
        ));
        assert!(plugin(root, "0.0.0").versions().is_ok_and(|s| s.long == 0));

        write(root, "dev/versions.json", r#"{"10000": "1.0.0"}"#);
        assert!(matches!(
            plugin(root, "2.0.0").versions(),
            Err(ManifestError::UnknownVersion(_))
        ));

        write(root, "dev/versions.json", r#"{"abc": "1.0.0"}"#);
        assert!(matches!(
            plugin(root, "1.0.0").versions(),
            Err(ManifestError::InvalidLongVersion(_))
        ));
    }

    #[test]
    fn test_modified_install_file_needs_long_version_10000() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let root = temp_dir.path();
        write(root, "dev/versions.json", r#"{"10001": "1.0.1"}"#);
        write(root, "dev/setup/install.php", "<?php\n// changed\n");
        assert!(matches!(
            plugin(root, "1.0.1").versions(),
            Err(ManifestError::ModifiedInstallFile)
        ));
    }

    #[test]
    fn test_to_xml_for_minimal_plugin() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let root = temp_dir.path();
        write(root, "dev/hooks.json", "{}");
        write(root, "dev/css/site.css", "body{}");

        let xml = plugin(root, "0.0.0").to_xml().unwrap_or_default();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <plugin name=\"Test\" version_human=\"0.0.0\" version_long=\"0\">\
             <cssFiles><css filename=\"site.css\">Ym9keXt9</css></cssFiles></plugin>"
        );
    }

    #[test]
    fn test_sections_and_empty_hooks_are_logged() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let root = temp_dir.path();
        let log_path = root.join("build.log");
        assert!(logger::init_with_verbosity(0, Some(log_path.clone())).is_ok());
        write(root, "dev/hooks.json", "{}");

        let data = plugin(root, "0.0.0").data();
        assert!(data.is_ok_and(|d| d.hooks.is_empty()));

        let log = fs::read_to_string(&log_path).unwrap_or_default();
        assert!(log.contains("WARN dev/hooks.json defines no hooks"));
        assert!(log.contains("STEP Reading versions"));
        assert!(log.contains("STEP Reading hooks"));
        assert!(log.contains("STEP Reading lang"));
    }
}
