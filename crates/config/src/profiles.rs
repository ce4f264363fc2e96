// Cell option profiles
// Loaded from ~/.config/gridcell/cells.toml (or any .json/.toml path)
//
// A profile file holds a `defaults` option set and named per-column sets:
//
//   [defaults]
//   debounce = 0
//
//   [columns.phone]
//   mask = "(999) 999-9999"
//   debounce = 250

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use gridcell_engine::CellOptions;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellProfiles {
    /// Options for columns without their own entry.
    pub defaults: CellOptions,

    /// Per-column options, keyed by column name.
    pub columns: BTreeMap<String, CellOptions>,
}

impl CellProfiles {
    /// Options for `column`, falling back to the defaults.
    pub fn options_for(&self, column: &str) -> &CellOptions {
        self.columns.get(column).unwrap_or(&self.defaults)
    }

    pub fn with_column(mut self, column: impl Into<String>, options: CellOptions) -> Self {
        self.columns.insert(column.into(), options);
        self
    }

    /// Parse JSON. Lines starting with `//` are comments.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| ConfigError::Parse {
            format: "json",
            message: e.to_string(),
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            format: "toml",
            message: e.to_string(),
        })
    }

    pub fn parse(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Json => Self::from_json_str(contents),
            ConfigFormat::Toml => Self::from_toml_str(contents),
        }
    }

    pub fn to_format_string(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
        }
    }

    /// Load a profile file; the format follows the file extension.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&contents, format)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let contents = self.to_format_string(format)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }

        fs::write(path, contents).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Default profile file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridcell")
            .join("cells.toml")
    }

    /// Load the default profile file, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(profiles) => profiles,
            Err(e) => {
                log::warn!("{e}; using default cell options");
                Self::default()
            }
        }
    }
}
