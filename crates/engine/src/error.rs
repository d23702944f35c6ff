use thiserror::Error;

/// Errors raised by the engine's typed entry points.
///
/// Sheet content never produces an error: unrecognized cells and rows are
/// skipped. These only surface when a caller names a tier or addon that
/// does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown package tier '{0}' (expected basic, classic or signature)")]
    UnknownTier(String),

    #[error("unknown addon key '{0}'")]
    UnknownAddon(String),
}
