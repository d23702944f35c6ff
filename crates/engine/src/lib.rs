//! `studiorate-engine`: spreadsheet rows to a queryable pricing matrix.
//!
//! Pure engine crate: receives pre-loaded rows, returns the matrix and
//! quotes over it. No network or file IO; loaders live in `studiorate-io`.

pub mod builder;
pub mod cache;
pub mod calculator;
pub mod cell;
pub mod classify;
pub mod error;
pub mod events;
pub mod header;
pub mod inspect;
pub mod model;
pub mod normalize;

pub use builder::{build_matrix, BuildReport, MatrixBuilder, SkipReason, SkippedRow};
pub use cache::MinPriceCache;
pub use calculator::{
    addon_availability, compute_price, min_base_by_tier, AddonAvailability, OfferedAddon, PriceSchedule, Quote,
    QuoteLine, TierPrices, UNIT_RATE,
};
pub use cell::{CellValue, RawRow};
pub use classify::value_to_rule;
pub use error::EngineError;
pub use events::{match_event_type, resolve_event_type};
pub use header::{header_to_addon_key, is_base_price_header, plan_name_to_slug, ColumnRole, SheetLayout};
pub use inspect::{inspect_rows, SheetInspection};
pub use model::{AddonKey, AddonRule, PackageTier, PricingMatrix};
pub use normalize::normalize;
