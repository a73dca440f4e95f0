//! `ipsbuild parse`: show what a PHP array file contains

use anyhow::{Context, Result};
use clap::Args;
use indexmap::IndexMap;
use ipsbuild_php::{parse_array, parse_associative_array};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// PHP file declaring the array
    pub file: PathBuf,

    /// Read `'key' => 'value'` entries instead of a list
    #[arg(short, long)]
    pub associative: bool,
}

pub fn handle_parse(cmd: ParseCommand) -> Result<()> {
    let contents = fs::read_to_string(&cmd.file)
        .with_context(|| format!("Failed to read {}", cmd.file.display()))?;
    let json = render(&contents, cmd.associative)
        .with_context(|| format!("Failed to parse {}", cmd.file.display()))?;
    println!("{}", json);
    Ok(())
}

/// Parse `php` and render the value as pretty JSON
pub fn render(php: &str, associative: bool) -> Result<String> {
    let json = if associative {
        let entries: IndexMap<String, String> = parse_associative_array(php)?;
        serde_json::to_string_pretty(&entries)?
    } else {
        serde_json::to_string_pretty(&parse_array(php)?)?
    };
    Ok(json)
}
