//! Sheet inspection: what the builder will see, without building.

use serde::Serialize;

use crate::cell::{CellValue, RawRow};
use crate::header::{ColumnRole, SheetLayout};
use crate::normalize::{normalize, normalize_cell};

const SAMPLE_ROWS: usize = 5;
const DISTINCT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderInfo {
    pub original: String,
    pub normalized: String,
    pub role: ColumnRole,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSample {
    pub plan: Option<String>,
    pub event: Option<String>,
    pub price: Option<CellValue>,
    pub cells: RawRow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetInspection {
    pub headers: Vec<HeaderInfo>,
    pub base_price_header: String,
    pub sample: Vec<RowSample>,
    pub distinct_plans: Vec<String>,
    pub distinct_events: Vec<String>,
    pub total_rows: usize,
}

/// Summarize raw rows: headers with their detected roles, the first few
/// rows, and the distinct normalized plan and event values.
pub fn inspect_rows(rows: &[RawRow]) -> SheetInspection {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for h in row.headers() {
            if !headers.iter().any(|seen| seen == h) {
                headers.push(h.to_string());
            }
        }
    }

    let layout = SheetLayout::detect(&headers);

    let sample = rows
        .iter()
        .take(SAMPLE_ROWS)
        .map(|row| RowSample {
            plan: layout.plan_value(row),
            event: layout.event_value(row),
            price: layout.base_value(row).cloned(),
            cells: row.clone(),
        })
        .collect();

    SheetInspection {
        headers: headers
            .iter()
            .map(|h| HeaderInfo {
                original: h.clone(),
                normalized: normalize(h),
                role: layout.role(h),
            })
            .collect(),
        base_price_header: layout.base_price.clone(),
        sample,
        distinct_plans: distinct(rows, layout.plan.as_deref()),
        distinct_events: distinct(rows, layout.event.as_deref()),
        total_rows: rows.len(),
    }
}

fn distinct(rows: &[RawRow], column: Option<&str>) -> Vec<String> {
    let Some(column) = column else {
        return Vec::new();
    };
    let mut out: Vec<String> = Vec::new();
    for value in rows.iter().map(|r| r.get(column).map(normalize_cell).unwrap_or_default()) {
        if out.len() == DISTINCT_LIMIT {
            break;
        }
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
