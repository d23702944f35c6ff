//! Sheet loaders for the pricing engine.
//!
//! Two interchangeable strategies yield the same row shape: the live gviz
//! feed and a local file (binary workbook or delimited text). Both fail
//! soft through [`load_with_fallback`].

pub mod delimited;
pub mod error;
pub mod gviz;
pub mod source;
pub mod workbook;

pub use error::LoadError;
pub use gviz::GvizSource;
pub use source::{load_with_fallback, LoadOutcome, SheetSource, SourceFailure};
pub use workbook::WorkbookSource;
