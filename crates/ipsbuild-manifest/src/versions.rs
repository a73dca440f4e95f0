//! Versions derived from version control
//!
//! The human version of a build is the output of `git describe --tags`:
//! `1.2.3` on a tag, `1.2.3-4-g2414721` four commits after one (a snapshot).
//! IPS also wants a numeric "long" version, `1.2.3-4` becoming `1020304`.

use ipsbuild_logger as logger;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::errors::{ManifestError, Result};

static STRICT_TAG: Lazy<std::result::Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)(?:-(\d+)-g[a-f0-9]+)?$"));

static SNAPSHOT_SUFFIX: Lazy<std::result::Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"-\d+-g[0-9a-f]+$"));

/// Each component of a long version takes two decimal digits
const COMPONENT_LIMIT: u32 = 100;

pub(crate) fn compiled(
    pattern: &'static Lazy<std::result::Result<Regex, regex::Error>>,
) -> Result<&'static Regex> {
    pattern
        .as_ref()
        .map_err(|e| ManifestError::Pattern(e.to_string()))
}

/// Where the raw version string of a repository comes from
pub trait VersionSource: Send + Sync {
    fn describe(&self, repo: &Path) -> Result<String>;
}

/// Reads the version with `git describe --tags`
#[derive(Debug, Clone, Copy, Default)]
pub struct GitDescribe;

impl VersionSource for GitDescribe {
    fn describe(&self, repo: &Path) -> Result<String> {
        let git = which::which("git").map_err(|e| ManifestError::GitNotFound(e.to_string()))?;
        debug!("Running git describe --tags in {:?}", repo);

        let output = Command::new(git)
            .args(["describe", "--tags"])
            .current_dir(repo)
            .output()
            .map_err(|source| ManifestError::Io {
                path: repo.to_path_buf(),
                source,
            })?;
        logger::capture_output("git describe --tags", &output);

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || stdout.is_empty() {
            return Err(ManifestError::MissingGitTag);
        }
        Ok(stdout)
    }
}

/// A version supplied up front, e.g. from the command line
#[derive(Debug, Clone)]
pub struct FixedVersion(pub String);

impl VersionSource for FixedVersion {
    fn describe(&self, _repo: &Path) -> Result<String> {
        if self.0.trim().is_empty() {
            return Err(ManifestError::MissingGitTag);
        }
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub human: String,
    pub long: u32,
    pub snapshot: bool,
}

/// The repository's version with a leading `v` removed.
///
/// Only loosely checked: it must start with a digit and contain nothing but
/// alphanumerics and `.`, `+`, `-`.
pub fn git_version(source: &dyn VersionSource, repo: &Path) -> Result<String> {
    let raw = source.describe(repo)?;
    let trimmed = raw.trim();
    let version = trimmed.strip_prefix('v').unwrap_or(trimmed);

    let starts_with_digit = version.starts_with(|c: char| c.is_ascii_digit());
    let well_formed = version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'));
    if !starts_with_digit || !well_formed {
        return Err(ManifestError::InvalidTag(trimmed.to_string()));
    }
    Ok(version.to_string())
}

/// Human, long and snapshot flag for the repository
pub fn version_info(source: &dyn VersionSource, repo: &Path) -> Result<VersionInfo> {
    let human = git_version(source, repo)?;
    let long = long_version(&human)?;
    let snapshot = is_snapshot(&human);
    Ok(VersionInfo {
        human,
        long,
        snapshot,
    })
}

/// Whether the version is some commits past a tag
pub fn is_snapshot(human: &str) -> bool {
    compiled(&SNAPSHOT_SUFFIX).is_ok_and(|re| re.is_match(human))
}

/// Convert `X.Y.Z[-N-g<hash>]` to `XXYYZZNN`
pub fn long_version(human: &str) -> Result<u32> {
    let invalid = || ManifestError::InvalidTag(human.to_string());
    let captures = compiled(&STRICT_TAG)?.captures(human).ok_or_else(invalid)?;

    let mut long = 0u32;
    for group in 1..=4 {
        let component = match captures.get(group) {
            Some(m) => m.as_str().parse::<u32>().map_err(|_| invalid())?,
            None => 0,
        };
        if component >= COMPONENT_LIMIT {
            return Err(invalid());
        }
        long = long * COMPONENT_LIMIT + component;
    }
    Ok(long)
}

#[cfg(test)]
mod tests {
    use crate::versions::*;

    fn info(version: &str) -> Result<VersionInfo> {
        version_info(&FixedVersion(format!("{}\n", version)), Path::new("."))
    }

    #[test]
    fn test_directly_on_tag() {
        assert!(matches!(
            info("1.2.3"),
            Ok(VersionInfo { ref human, long: 1020300, snapshot: false }) if human == "1.2.3"
        ));
    }

    #[test]
    fn test_offset_from_tag() {
        assert!(matches!(
            info("1.2.3-4-g2414721"),
            Ok(VersionInfo { long: 1020304, snapshot: true, .. })
        ));
    }

    #[test]
    fn test_tag_starting_with_v() {
        assert!(matches!(
            info("v1.2.3"),
            Ok(VersionInfo { ref human, long: 1020300, snapshot: false }) if human == "1.2.3"
        ));
    }

    #[test]
    fn test_invalid_tags() {
        assert!(matches!(info("w1.2.3"), Err(ManifestError::InvalidTag(_))));
        assert!(matches!(info("1.2.3-z"), Err(ManifestError::InvalidTag(_))));
        assert!(matches!(info("1.2.3-102-g1234"), Err(ManifestError::InvalidTag(_))));
        assert!(matches!(info("1.200.3"), Err(ManifestError::InvalidTag(_))));
    }

    #[test]
    fn test_empty_version_is_missing_tag() {
        assert!(matches!(info("  "), Err(ManifestError::MissingGitTag)));
    }

    #[test]
    fn test_lenient_raw_version() {
        let version = git_version(&FixedVersion("v1.2.3.4-b5".to_string()), Path::new("."));
        assert!(version.is_ok_and(|v| v == "1.2.3.4-b5"));

        let invalid = git_version(&FixedVersion("not a version".to_string()), Path::new("."));
        assert!(matches!(invalid, Err(ManifestError::InvalidTag(_))));
    }

    #[test]
    fn test_is_snapshot() {
        assert!(is_snapshot("1.0.0-3-gabc123"));
        assert!(!is_snapshot("1.0.0"));
        assert!(!is_snapshot("1.0.0-beta"));
    }
}
