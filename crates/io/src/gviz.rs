//! Live Google Sheets feed via the gviz JSON endpoint.
//!
//! The endpoint wraps its JSON in a JavaScript callback, so the body is
//! sliced from the first `{` to the last `}` before parsing. Each cell's
//! formatted text wins over its raw value: annotations such as
//! "70 uključeno" exist only in the formatted form.

use std::time::Duration;

use serde::Deserialize;
use studiorate_engine::{CellValue, RawRow};
use tracing::debug;
use url::Url;

use crate::error::LoadError;
use crate::source::SheetSource;
use crate::workbook::unique_headers;

pub const DEFAULT_BASE_URL: &str = "https://docs.google.com";
pub const DEFAULT_TAB: &str = "Addons";
const USER_AGENT: &str = concat!("studiorate/", env!("CARGO_PKG_VERSION"));

/// A published spreadsheet tab, fetched with a blocking client.
#[derive(Debug, Clone)]
pub struct GvizSource {
    sheet_id: String,
    tab: String,
    base_url: String,
    timeout: Duration,
}

impl GvizSource {
    pub fn new(sheet_id: impl Into<String>, tab: impl Into<String>) -> Self {
        Self::with_base_url(sheet_id, tab, DEFAULT_BASE_URL)
    }

    /// Point at a different host (tests, proxies).
    pub fn with_base_url(sheet_id: impl Into<String>, tab: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            tab: tab.into(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{base}/spreadsheets/d/{id}/gviz/tq?tqx=out:json&sheet={tab}`
    pub fn feed_url(&self) -> Result<Url, LoadError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| LoadError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| LoadError::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["spreadsheets", "d", self.sheet_id.as_str(), "gviz", "tq"]);
        url.query_pairs_mut()
            .append_pair("tqx", "out:json")
            .append_pair("sheet", &self.tab);
        Ok(url)
    }
}

impl SheetSource for GvizSource {
    fn identity(&self) -> String {
        format!("gviz:{}/{}", self.sheet_id, self.tab)
    }

    fn load(&self) -> Result<Vec<RawRow>, LoadError> {
        let url = self.feed_url()?;
        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        debug!(%url, "fetching gviz feed");
        let resp = http.get(url.clone()).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Status { status: status.as_u16(), url: url.to_string() });
        }
        let body = resp.text()?;
        parse_gviz_response(&body)
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GvizResponse {
    table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    cols: Option<Vec<Option<GvizCol>>>,
    rows: Option<Vec<Option<GvizRow>>>,
}

#[derive(Debug, Deserialize)]
struct GvizCol {
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Option<serde_json::Value>,
    #[serde(default)]
    f: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

impl GvizCell {
    fn to_cell_value(&self) -> CellValue {
        let formatted = self.f.as_deref().or(self.label.as_deref()).unwrap_or("");
        if !formatted.is_empty() {
            return CellValue::from(formatted);
        }
        match &self.v {
            None | Some(serde_json::Value::Null) => CellValue::from(""),
            Some(serde_json::Value::Bool(b)) => CellValue::Bool(*b),
            Some(serde_json::Value::Number(n)) => n.as_f64().map_or(CellValue::from(""), CellValue::Number),
            Some(serde_json::Value::String(s)) => CellValue::from(s.as_str()),
            Some(other) => CellValue::Text(other.to_string()),
        }
    }
}

/// Parse a gviz response body (callback wrapper included) into rows.
pub fn parse_gviz_response(body: &str) -> Result<Vec<RawRow>, LoadError> {
    let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
        return Err(LoadError::MalformedFeed("no JSON object in response".into()));
    };
    if end < start {
        return Err(LoadError::MalformedFeed("no JSON object in response".into()));
    }

    let resp: GvizResponse =
        serde_json::from_str(&body[start..=end]).map_err(|e| LoadError::MalformedFeed(e.to_string()))?;
    let table = resp.table.ok_or_else(|| LoadError::MalformedFeed("missing table".into()))?;
    let (Some(cols), Some(rows)) = (table.cols, table.rows) else {
        return Err(LoadError::MalformedFeed("table has no cols or rows".into()));
    };

    let labels: Vec<String> = cols
        .iter()
        .map(|c| c.as_ref().and_then(|c| c.label.clone()).unwrap_or_default())
        .collect();
    let width = rows
        .iter()
        .map(|r| r.as_ref().map_or(0, |r| r.c.len()))
        .chain([labels.len()])
        .max()
        .unwrap_or(0);
    let headers = unique_headers(&labels, width);
    let header_at = |i: usize| headers.get(i).cloned().unwrap_or_else(|| format!("col_{i}"));

    let out: Vec<RawRow> = rows
        .iter()
        .map(|row| {
            let cells = row.as_ref().map(|r| r.c.as_slice()).unwrap_or(&[]);
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let value = cell.as_ref().map_or(CellValue::from(""), GvizCell::to_cell_value);
                    (header_at(i), value)
                })
                .collect()
        })
        .collect();

    debug!(columns = headers.len(), rows = out.len(), "parsed gviz table");
    Ok(out)
}
