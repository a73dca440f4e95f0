//! `ipsbuild build`: write the XML manifest of a plugin

use anyhow::{Context, Result};
use clap::Args;
use ipsbuild_config::Config;
use ipsbuild_logger as logger;
use ipsbuild_manifest::{write_to_path, FixedVersion, Plugin};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::BuildError;

/// Set by GitHub Actions to the checkout directory
const WORKSPACE_ENV_VAR: &str = "GITHUB_WORKSPACE";

const SUPPORTED_TYPE: &str = "plugin";

#[derive(Args, Debug, Clone)]
pub struct BuildCommand {
    /// Plugin directory, relative to $GITHUB_WORKSPACE when that is set
    pub path: Option<PathBuf>,

    /// Plugin name, also the default output file name
    #[arg(long)]
    pub name: String,

    /// Package type (only "plugin" is supported)
    #[arg(long = "type", default_value = SUPPORTED_TYPE)]
    pub package_type: String,

    /// Author website written to the manifest
    #[arg(long)]
    pub website: Option<String>,

    /// Output file (default: <path>/<name>.xml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use this version instead of `git describe --tags`
    #[arg(long)]
    pub human_version: Option<String>,
}

/// Build the manifest and return where it was written
pub fn handle_build(cmd: BuildCommand, config: &Config) -> Result<PathBuf> {
    if cmd.package_type != SUPPORTED_TYPE {
        return Err(BuildError::UnsupportedType(cmd.package_type).into());
    }
    if cmd.name.trim().is_empty() {
        return Err(BuildError::EmptyName.into());
    }

    let workspace = std::env::var(WORKSPACE_ENV_VAR).ok();
    let base = resolve_base(workspace.as_deref(), cmd.path.as_deref());
    if !base.is_dir() {
        return Err(BuildError::MissingPluginDir(base).into());
    }
    let output = resolve_output(&base, &cmd.name, cmd.output.as_deref(), config);
    let website = cmd.website.or_else(|| config.website.clone());
    debug!("Plugin base {:?}, output {:?}", base, output);

    logger::debug(&format!("Building plugin {} from {}", cmd.name, base.display()));
    let plugin = match cmd.human_version {
        Some(version) => {
            logger::debug(&format!("Using version {} from the command line", version));
            Plugin::with_version_source(&base, &cmd.name, website, Box::new(FixedVersion(version)))
        }
        None => Plugin::new(&base, &cmd.name, website),
    };

    logger::spinner_start(&format!("Building {}", cmd.name));
    let result = plugin
        .data()
        .with_context(|| format!("Failed to read plugin from {}", base.display()))
        .and_then(|data| {
            write_to_path(&data, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            logger::info(&format!("Manifest written to {}", output.display()));
            Ok(data)
        });

    match result {
        Ok(data) => {
            logger::spinner_success(&format!(
                "Built {} {} to {}",
                data.attributes.name,
                data.attributes.version_human,
                output.display()
            ));
            Ok(output)
        }
        Err(e) => {
            logger::spinner_error(&format!("Building {} failed", cmd.name));
            Err(e)
        }
    }
}

/// The plugin directory: `path` resolved against the workspace (or `.`)
pub fn resolve_base(workspace: Option<&str>, path: Option<&Path>) -> PathBuf {
    let root = workspace
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    match path {
        Some(path) => root.join(path),
        None => root,
    }
}

/// `--output`, else `<output-dir>/<name>.xml` from config, else `<base>/<name>.xml`
pub fn resolve_output(base: &Path, name: &str, output: Option<&Path>, config: &Config) -> PathBuf {
    if let Some(output) = output {
        return output.to_path_buf();
    }
    let file_name = format!("{}.xml", name);
    match &config.output_dir {
        Some(dir) => PathBuf::from(dir).join(file_name),
        None => base.join(file_name),
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::build::*;

    fn command(package_type: &str) -> BuildCommand {
        BuildCommand {
            path: None,
            name: "Test".to_string(),
            package_type: package_type.to_string(),
            website: None,
            output: None,
            human_version: Some("1.0.0".to_string()),
        }
    }

    #[test]
    fn test_resolve_base() {
        assert_eq!(resolve_base(None, None), PathBuf::from("."));
        assert_eq!(
            resolve_base(Some("/work"), Some(Path::new("plugin"))),
            PathBuf::from("/work/plugin")
        );
        assert_eq!(
            resolve_base(Some("/work"), Some(Path::new("/abs/plugin"))),
            PathBuf::from("/abs/plugin")
        );
        assert_eq!(resolve_base(Some(" "), None), PathBuf::from("."));
    }

    #[test]
    fn test_resolve_output() {
        let base = Path::new("/work");
        let mut config = Config::default();
        assert_eq!(
            resolve_output(base, "Test", None, &config),
            PathBuf::from("/work/Test.xml")
        );

        config.output_dir = Some("/dist".to_string());
        assert_eq!(
            resolve_output(base, "Test", None, &config),
            PathBuf::from("/dist/Test.xml")
        );
        assert_eq!(
            resolve_output(base, "Test", Some(Path::new("out.xml")), &config),
            PathBuf::from("out.xml")
        );
    }

    #[test]
    fn test_unsupported_type() {
        let result = handle_build(command("application"), &Config::default());
        assert!(result.is_err_and(|e| e.to_string() == "Type application is not supported"));
    }
}
