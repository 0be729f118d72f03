use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use booking_core::{Rgb, DEFAULT_CAPACITY};
use serde::{Deserialize, Serialize};

pub const MAX_ROWS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Number of booking slots on the form.
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Initial background colour as `#rrggbb`.
    #[serde(default)]
    pub background: Option<String>,
}

fn default_rows() -> usize {
    DEFAULT_CAPACITY
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            background: None,
        }
    }
}

impl BookingConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("booking")
            .join("config.toml"))
    }

    /// Loads `path`, or the default location when `None`.
    /// A missing file at the default location yields the default config;
    /// an explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Self::config_path()?;
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config at {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.rows > MAX_ROWS {
            bail!("rows must be between 1 and {}, got {}", MAX_ROWS, self.rows);
        }
        self.background()?;
        Ok(())
    }

    pub fn background(&self) -> Result<Rgb> {
        match &self.background {
            Some(hex) => hex
                .parse()
                .with_context(|| format!("Invalid background colour '{}'", hex)),
            None => Ok(Rgb::default()),
        }
    }

    /// Applies a `--rows` override from the command line.
    pub fn with_rows(mut self, rows: Option<usize>) -> Result<Self> {
        if let Some(rows) = rows {
            self.rows = rows;
            self.validate()?;
        }
        Ok(self)
    }
}
