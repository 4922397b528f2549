//! Loading of session configuration and level packs from TOML.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use path_puzzle_core::{LevelSpec, SessionConfig};
use serde::Deserialize;

/// Level pack compiled into the binary.
pub(crate) const DEFAULT_LEVELS: &str = include_str!("../levels/default.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelPack {
    levels: Vec<LevelSpec>,
}

/// Reads the session configuration, falling back to defaults without a path.
pub(crate) fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let contents = read(path)?;
    parse_config(&contents).with_context(|| format!("invalid config at {}", path.display()))
}

/// Reads a level pack, falling back to the embedded pack without a path.
pub(crate) fn load_levels(path: Option<&Path>) -> Result<Vec<LevelSpec>> {
    let Some(path) = path else {
        return parse_levels(DEFAULT_LEVELS).context("embedded level pack is invalid");
    };
    let contents = read(path)?;
    parse_levels(&contents).with_context(|| format!("invalid level pack at {}", path.display()))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parse_config(contents: &str) -> Result<SessionConfig> {
    let config: SessionConfig =
        toml::from_str(contents).context("failed to parse session config toml contents")?;
    config.validate()?;
    Ok(config)
}

fn parse_levels(contents: &str) -> Result<Vec<LevelSpec>> {
    let pack: LevelPack =
        toml::from_str(contents).context("failed to parse level pack toml contents")?;
    if pack.levels.is_empty() {
        bail!("level pack contains no levels");
    }
    Ok(pack.levels)
}

/// Default location of an optional on-disk config next to the working directory.
#[must_use]
pub(crate) fn default_config_path() -> PathBuf {
    PathBuf::from("path-puzzle.toml")
}
