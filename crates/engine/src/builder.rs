//! Pricing matrix builder: raw rows → [`PricingMatrix`].

use serde::Serialize;
use tracing::{debug, info};

use crate::cell::RawRow;
use crate::classify::{parse_cell_number, value_to_rule};
use crate::header::{header_to_addon_key, plan_name_to_slug, ColumnRole, SheetLayout};
use crate::model::{AddonKey, AddonRule, PackageTier, PricingMatrix};
use crate::normalize::normalize_cell;

/// Why a row contributed nothing to the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    MissingPlan,
    MissingEvent,
    UnknownPlan(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Zero-based position in the input.
    pub index: usize,
    pub reason: SkipReason,
}

/// Cells of one used row, rendered as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSnapshot {
    pub event: String,
    pub plan: PackageTier,
    pub cells: Vec<(String, String)>,
}

/// Diagnostics collected during a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub base_header: String,
    pub headers: Vec<String>,
    pub rows_count: usize,
    pub rows_used: usize,
    pub skipped: Vec<SkippedRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub row_snapshots: Vec<RowSnapshot>,
}

/// Builds a matrix from loader rows. Rows are never rejected with an error;
/// anything malformed is skipped and recorded in the [`BuildReport`].
#[derive(Debug, Clone, Default)]
pub struct MatrixBuilder {
    snapshots: bool,
}

impl MatrixBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also capture every used row's cells in the report.
    pub fn with_snapshots(mut self, enabled: bool) -> Self {
        self.snapshots = enabled;
        self
    }

    pub fn build(&self, rows: &[RawRow]) -> (PricingMatrix, BuildReport) {
        // Header order comes from the first row, as the loaders key every row alike.
        let headers: Vec<String> = rows
            .first()
            .map(|r| r.headers().map(str::to_string).collect())
            .unwrap_or_default();
        let layout = SheetLayout::detect(&headers);
        let roles: Vec<(String, ColumnRole)> = headers
            .iter()
            .map(|h| (h.clone(), layout.role(h)))
            .collect();

        let mut matrix = PricingMatrix::default();
        let mut report = BuildReport {
            base_header: layout.base_price.clone(),
            headers: headers.clone(),
            rows_count: rows.len(),
            ..BuildReport::default()
        };

        for (index, row) in rows.iter().enumerate() {
            let (event, tier) = match resolve_row(&layout, row) {
                Ok(key) => key,
                Err(reason) => {
                    debug!(index, ?reason, "skipping row");
                    report.skipped.push(SkippedRow { index, reason });
                    continue;
                }
            };

            matrix.register_event(&event);
            apply_row(&mut matrix, &layout, &roles, row, &event, tier);
            report.rows_used += 1;

            if self.snapshots {
                report.row_snapshots.push(RowSnapshot {
                    event: event.clone(),
                    plan: tier,
                    cells: headers
                        .iter()
                        .map(|h| (h.clone(), row.get(h).map(|v| v.to_text()).unwrap_or_default()))
                        .collect(),
                });
            }
        }

        let promoted = promote_included_extras(&mut matrix);

        info!(
            rows = report.rows_count,
            used = report.rows_used,
            skipped = report.skipped.len(),
            events = matrix.event_types().len(),
            promoted,
            base_header = %report.base_header,
            "pricing matrix built"
        );

        (matrix, report)
    }
}

/// Build a matrix without diagnostics. An empty row set yields an empty matrix.
pub fn build_matrix(rows: &[RawRow]) -> PricingMatrix {
    MatrixBuilder::new().build(rows).0
}

fn resolve_row(layout: &SheetLayout, row: &RawRow) -> Result<(String, PackageTier), SkipReason> {
    let plan = layout.plan_value(row).ok_or(SkipReason::MissingPlan)?;
    let event = layout.event_value(row).ok_or(SkipReason::MissingEvent)?;
    let tier = plan_name_to_slug(&plan).ok_or(SkipReason::UnknownPlan(plan))?;
    Ok((event, tier))
}

fn apply_row(
    matrix: &mut PricingMatrix,
    layout: &SheetLayout,
    roles: &[(String, ColumnRole)],
    row: &RawRow,
    event: &str,
    tier: PackageTier,
) {
    // Unparsable or negative base prices leave the previous value in place.
    match layout.base_value(row).and_then(parse_cell_number) {
        Some(price) if price >= 0.0 => matrix.set_base(event, tier, price),
        _ => {}
    }

    if let Some(note) = layout.note_value(row) {
        matrix.set_note(event, tier, &note);
    }

    for (header, role) in roles {
        let Some(cell) = row.get(header) else { continue };
        if cell.is_blank() {
            continue;
        }

        match role {
            ColumnRole::Plan | ColumnRole::Event | ColumnRole::BasePrice | ColumnRole::Note => {}
            ColumnRole::Addon(key) => {
                let Some(rule) = value_to_rule(cell) else {
                    debug!(%event, %tier, %header, "unclassified addon cell");
                    continue;
                };
                // The privacy toggle never carries a price, whatever the sheet says.
                let rule = if *key == AddonKey::DontPublish { AddonRule::free() } else { rule };
                matrix.set_rule(event, tier, *key, rule);
            }
            ColumnRole::Extra => {
                if normalize_cell(cell).contains("ukljuc") {
                    matrix.push_extra(event, tier, header.trim());
                }
            }
        }
    }

    matrix.set_rule_if_absent(event, tier, AddonKey::DontPublish, AddonRule::free());
}

/// Move extras whose label names a canonical addon into the addon map.
///
/// A label is promoted only when its addon has no rule yet; otherwise it
/// stays a free-text extra. Returns the number of promoted labels.
fn promote_included_extras(matrix: &mut PricingMatrix) -> usize {
    let mut promoted = 0;
    let slots: Vec<(String, PackageTier)> = matrix.extras_included.keys().cloned().collect();

    for (event, tier) in slots {
        let labels = matrix
            .extras_included
            .remove(&(event.clone(), tier))
            .unwrap_or_default();

        let mut keep = Vec::with_capacity(labels.len());
        for label in labels {
            match header_to_addon_key(&label) {
                Some(key) if matrix.explicit_rule(&event, tier, key).is_none() => {
                    debug!(%event, %tier, %label, %key, "promoting extra to included addon");
                    matrix.set_rule(&event, tier, key, AddonRule::Included);
                    promoted += 1;
                }
                _ => keep.push(label),
            }
        }
        matrix.extras_included.insert((event, tier), keep);
    }

    promoted
}
