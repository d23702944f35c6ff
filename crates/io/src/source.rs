//! Source abstraction and the fail-soft fallback chain.

use serde::Serialize;
use studiorate_engine::RawRow;
use tracing::{info, warn};

use crate::error::LoadError;

/// Anything that can produce header-keyed rows.
pub trait SheetSource {
    /// Stable identity, used for logging and as a cache key.
    fn identity(&self) -> String;

    fn load(&self) -> Result<Vec<RawRow>, LoadError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

/// Result of walking the fallback chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadOutcome {
    pub rows: Vec<RawRow>,
    /// Identity of the source that answered; `None` when every source failed.
    pub source: Option<String>,
    pub failures: Vec<SourceFailure>,
}

/// Try each source in order and return the first one that loads.
///
/// A source that loads successfully but yields no rows still wins. When
/// every source fails the outcome carries an empty row set, never an error.
pub fn load_with_fallback(sources: &[&dyn SheetSource]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for source in sources {
        let identity = source.identity();
        match source.load() {
            Ok(rows) => {
                info!(source = %identity, rows = rows.len(), "sheet loaded");
                outcome.rows = rows;
                outcome.source = Some(identity);
                return outcome;
            }
            Err(e) => {
                warn!(source = %identity, error = %e, "sheet source failed, trying next");
                outcome.failures.push(SourceFailure { source: identity, error: e.to_string() });
            }
        }
    }

    warn!(tried = outcome.failures.len(), "no sheet source available; pricing will be empty");
    outcome
}
