//! Settings resolution and sheet loading shared by every command.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use studiorate_config::{ConfigError, Settings};
use studiorate_engine::{BuildReport, MatrixBuilder, PricingMatrix};
use studiorate_io::{load_with_fallback, GvizSource, LoadOutcome, SheetSource, WorkbookSource};

use crate::exit_codes::EXIT_CONFIG;
use crate::CliError;

/// Source flags; they override the settings file and the environment.
#[derive(Debug, Clone, Default)]
pub struct SourceOverrides {
    pub config: Option<PathBuf>,
    pub sheets_id: Option<String>,
    pub tab: Option<String>,
    pub file: Option<PathBuf>,
    pub offline: bool,
}

pub fn resolve_settings(overrides: &SourceOverrides) -> Result<Settings, CliError> {
    let mut settings = Settings::load(overrides.config.as_deref()).map_err(config_error)?;

    if let Some(id) = overrides.sheets_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        settings.source.sheets_id = Some(id.to_string());
    }
    if let Some(tab) = overrides.tab.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        settings.source.sheets_tab = tab.to_string();
    }
    if let Some(file) = &overrides.file {
        settings.source.workbook_path = file.clone();
    }
    if overrides.offline {
        settings.source.sheets_id = None;
    }

    settings.validate().map_err(config_error)?;
    Ok(settings)
}

fn config_error(e: ConfigError) -> CliError {
    let hint = match &e {
        ConfigError::Read { .. } => Some(format!("default location: {}", Settings::config_path().display())),
        ConfigError::Parse(_) | ConfigError::Invalid(_) => None,
    };
    CliError { code: EXIT_CONFIG, message: e.to_string(), hint }
}

/// Sources in fallback order: live feed (when configured), then the local file.
pub struct Sources {
    pub feed: Option<GvizSource>,
    pub file: WorkbookSource,
}

impl Sources {
    pub fn from_settings(settings: &Settings) -> Self {
        let src = &settings.source;
        let feed = src.sheets_id.as_ref().map(|id| {
            GvizSource::with_base_url(id.clone(), src.sheets_tab.clone(), src.gviz_base_url.clone())
                .timeout(Duration::from_secs(src.timeout_secs))
        });
        Self { feed, file: WorkbookSource::new(src.workbook_path.clone()) }
    }

    pub fn load(&self) -> LoadOutcome {
        let mut chain: Vec<&dyn SheetSource> = Vec::with_capacity(2);
        if let Some(feed) = &self.feed {
            chain.push(feed);
        }
        chain.push(&self.file);
        load_with_fallback(&chain)
    }

    pub fn report(&self) -> SourceReport {
        SourceReport {
            live_feed: self.feed.as_ref().map(|feed| LiveFeedReport {
                identity: feed.identity(),
                url: feed.feed_url().map(|u| u.to_string()).unwrap_or_default(),
            }),
            workbook_path: self.file.path().display().to_string(),
            workbook_exists: self.file.exists(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeedReport {
    pub identity: String,
    pub url: String,
}

/// Which sources are configured, without loading them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub live_feed: Option<LiveFeedReport>,
    pub workbook_path: String,
    pub workbook_exists: bool,
}

/// Everything a pricing command needs.
pub struct Loaded {
    pub settings: Settings,
    pub outcome: LoadOutcome,
    pub matrix: PricingMatrix,
    pub report: BuildReport,
}

pub fn load_matrix(overrides: &SourceOverrides, snapshots: bool) -> Result<Loaded, CliError> {
    let settings = resolve_settings(overrides)?;
    let outcome = Sources::from_settings(&settings).load();
    let (matrix, report) = MatrixBuilder::new().with_snapshots(snapshots).build(&outcome.rows);
    Ok(Loaded { settings, outcome, matrix, report })
}
