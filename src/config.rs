use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::matrix::{Compiler, MatrixBuilder, Platform, QtRelease, Schema};

/// File picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "qtmatrix.toml";

/// Axis tables and output schema (`qtmatrix.toml`)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatrixConfig {
    #[serde(default)]
    pub schema: Schema,
    #[serde(default)]
    pub qt: Vec<QtRelease>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

/// Where the active tables came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Builtin,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Builtin => f.write_str("built-in tables"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MatrixConfig {
    /// The tables compiled into the binary
    pub fn builtin() -> Self {
        Self {
            schema: Schema::Archives,
            qt: vec![
                QtRelease::new("5.15.2", &["qtbase", "icu", "qtwebsockets"], &[]),
                QtRelease::new("6.2.0", &["qtbase", "icu"], &["qtwebsockets"]),
            ],
            platforms: vec![
                Platform::new("windows", vec![Compiler::unversioned("msvc")]),
                Platform::new("macos", vec![Compiler::unversioned("apple-clang")]),
                Platform::new(
                    "linux",
                    vec![
                        Compiler::versioned("gcc", &["10.3.0", "11.3.0"]),
                        Compiler::versioned("clang", &["11", "14", "15"]),
                    ],
                ),
            ],
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: MatrixConfig = toml::from_str(content)
            .context("Failed to parse matrix tables - check for syntax errors (missing quotes, brackets)")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid matrix config {}", path.display()))
    }

    /// Pick the explicit config, else `qtmatrix.toml` in `dir`, else the built-in tables
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, ConfigSource::File(path.to_path_buf())));
        }

        let local = dir.join(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Ok((Self::load(&local)?, ConfigSource::File(local)));
        }

        Ok((Self::builtin(), ConfigSource::Builtin))
    }

    /// Structural checks only. Platform names are checked during expansion.
    pub fn validate(&self) -> Result<()> {
        if self.qt.is_empty() {
            bail!("No Qt releases declared (add at least one [[qt]] table)");
        }
        if self.platforms.is_empty() {
            bail!("No platforms declared (add at least one [[platforms]] table)");
        }
        if let Some(index) = self.qt.iter().position(|q| q.version.trim().is_empty()) {
            bail!("Qt release #{} has an empty version", index + 1);
        }
        for (index, platform) in self.platforms.iter().enumerate() {
            if platform.name.trim().is_empty() {
                bail!("Platform #{} has an empty name", index + 1);
            }
            if platform.compilers.iter().any(|c| c.name.trim().is_empty()) {
                bail!("Platform '{}' has a compiler with an empty name", platform.name);
            }
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize matrix tables")
    }

    pub fn builder<'a>(&'a self, filter: Option<&'a str>) -> MatrixBuilder<'a> {
        MatrixBuilder::new(&self.qt, &self.platforms)
            .schema(self.schema)
            .filter(filter)
    }
}
