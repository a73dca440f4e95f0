//! `ipsbuild version`: show the version a build would get

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use ipsbuild_manifest::{version_info, GitDescribe, VersionInfo};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct VersionCommand {
    /// Repository to describe (default: current directory)
    pub path: Option<PathBuf>,
}

pub fn handle_version(cmd: VersionCommand) -> Result<()> {
    let path = cmd.path.unwrap_or_else(|| PathBuf::from("."));
    let info = version_info(&GitDescribe, &path)
        .with_context(|| format!("Failed to determine version of {}", path.display()))?;
    for (key, value) in fields(&info) {
        println!("{}: {}", key.cyan(), value);
    }
    Ok(())
}

fn fields(info: &VersionInfo) -> [(&'static str, String); 3] {
    [
        ("human", info.human.clone()),
        ("long", info.long.to_string()),
        ("snapshot", info.snapshot.to_string()),
    ]
}
