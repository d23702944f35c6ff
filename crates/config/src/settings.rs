// Studio pricing settings
// Loaded from ~/.config/studiorate/settings.toml, then the environment

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use studiorate_engine::{PackageTier, PriceSchedule};
use tracing::debug;

use crate::error::ConfigError;

/// Where pricing rows come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Live spreadsheet identifier. Absent disables the live feed.
    pub sheets_id: Option<String>,

    /// Tab name inside the spreadsheet
    pub sheets_tab: String,

    /// Local workbook used when the feed is disabled or fails
    pub workbook_path: PathBuf,

    pub gviz_base_url: String,

    /// HTTP timeout for the live feed, in seconds
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            sheets_id: None,
            sheets_tab: "Addons".to_string(),
            workbook_path: PathBuf::from("public/data/addons.xlsx"),
            gviz_base_url: "https://docs.google.com".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub pricing: PriceSchedule,
}

impl Settings {
    /// Default settings file location
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studiorate")
            .join("settings.toml")
    }

    /// Resolve settings: defaults, then the TOML file, then the process environment.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used only when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Self::config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    debug!(path = %default_path.display(), "no settings file, using defaults");
                    Self::default()
                }
            }
        };
        settings.apply_env_from(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings file");
        Self::from_toml(&contents)
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `SHEETS_ID`, `SHEETS_TAB` and `ADDONS_XLS_PATH`. Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(id) = var("SHEETS_ID") {
            self.source.sheets_id = Some(id);
        }
        if let Some(tab) = var("SHEETS_TAB") {
            self.source.sheets_tab = tab;
        }
        if let Some(path) = var("ADDONS_XLS_PATH") {
            self.source.workbook_path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid("source.timeout_secs must be at least 1".into()));
        }
        if self.source.sheets_tab.trim().is_empty() {
            return Err(ConfigError::Invalid("source.sheets_tab must not be empty".into()));
        }

        let rate = self.pricing.unit_rate;
        if !rate.is_finite() || rate < 0.0 {
            return Err(ConfigError::Invalid(format!("pricing.unit_rate must be a non-negative number, got {rate}")));
        }
        for tier in PackageTier::ALL {
            let price = self.pricing.fallback_base.get(tier);
            if !price.is_finite() || price < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "pricing.fallback_base.{tier} must be a non-negative number, got {price}"
                )));
            }
        }
        Ok(())
    }
}
