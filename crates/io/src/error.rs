use std::path::PathBuf;

use thiserror::Error;

/// Why a sheet source produced no rows.
///
/// Callers normally absorb these through [`crate::load_with_fallback`];
/// they surface directly only when a single source is loaded on purpose.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid feed URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed gviz response: {0}")]
    MalformedFeed(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open workbook {}: {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("workbook {} has no sheets", .0.display())]
    NoSheets(PathBuf),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}
