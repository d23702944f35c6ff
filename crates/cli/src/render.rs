//! Human-readable and JSON output for CLI commands.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::{Map, Value};
use studiorate_engine::{AddonAvailability, PackageTier, Quote, SheetInspection, TierPrices};

use crate::context::SourceReport;
use crate::CliError;

/// Print `value` as a JSON object with `"ok": true` as its first key.
///
/// Objects are merged into the envelope; anything else lands under `"result"`.
pub fn emit_json<T: Serialize>(value: &T, compact: bool) -> Result<(), CliError> {
    let mut doc = Map::new();
    doc.insert("ok".into(), Value::Bool(true));
    match serde_json::to_value(value).map_err(|e| CliError::output(format!("cannot serialize output: {e}")))? {
        Value::Object(fields) => doc.extend(fields),
        other => {
            doc.insert("result".into(), other);
        }
    }

    let doc = Value::Object(doc);
    let text = (if compact { serde_json::to_string(&doc) } else { serde_json::to_string_pretty(&doc) })
        .map_err(|e| CliError::output(format!("cannot serialize output: {e}")))?;
    emit_text(|out| writeln!(out, "{text}"))
}

/// Run `f` against a locked stdout and flush.
pub fn emit_text<F>(f: F) -> Result<(), CliError>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    f(&mut out)
        .and_then(|_| out.flush())
        .map_err(|e| CliError::output(format!("cannot write to stdout: {e}")))
}

fn amount(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v:.2}")
    }
}

pub fn quote(out: &mut dyn Write, q: &Quote, unit_rate: f64) -> io::Result<()> {
    writeln!(out, "{} / {}", q.event_type, q.tier)?;
    let base_note = if q.base_from_fallback { "  (default price)" } else { "" };
    writeln!(out, "  {:<34}{:>8}{}", "base", amount(q.base), base_note)?;
    if q.extra_units > 0 {
        let label = format!("extra units ({} x {})", q.extra_units, amount(unit_rate));
        writeln!(out, "  {:<34}{:>8}", label, amount(q.extra_units_charge))?;
    }
    for line in &q.addons {
        let label = format!("+ {} ({})", line.key, line.key.label());
        writeln!(out, "  {:<34}{:>8}", label, amount(line.price))?;
    }
    writeln!(out, "  {:<34}{:>8}", "total", q.total)?;
    if !q.ignored.is_empty() {
        let keys: Vec<&str> = q.ignored.iter().map(|k| k.key()).collect();
        writeln!(out, "  not offered for this package: {}", keys.join(", "))?;
    }
    Ok(())
}

pub fn availability(out: &mut dyn Write, event: &str, tier: PackageTier, a: &AddonAvailability) -> io::Result<()> {
    writeln!(out, "{event} / {tier}")?;
    if a.available.is_empty() {
        writeln!(out, "  available: none")?;
    } else {
        writeln!(out, "  available:")?;
        for offered in &a.available {
            let price = if offered.price > 0.0 { amount(offered.price) } else { "free".to_string() };
            writeln!(out, "    {:<20}{:<28}{:>8}", offered.key.key(), offered.label, price)?;
        }
    }
    if !a.included.is_empty() {
        writeln!(out, "  included:")?;
        for key in &a.included {
            writeln!(out, "    {:<20}{}", key.key(), key.label())?;
        }
    }
    Ok(())
}

pub fn prices(out: &mut dyn Write, p: &TierPrices) -> io::Result<()> {
    writeln!(out, "Starting prices")?;
    for tier in PackageTier::ALL {
        writeln!(out, "  {:<12}{:>8}", tier.slug(), amount(p.get(tier)))?;
    }
    Ok(())
}

pub fn inspection(out: &mut dyn Write, source: &str, i: &SheetInspection) -> io::Result<()> {
    writeln!(out, "source:      {source}")?;
    writeln!(out, "rows:        {}", i.total_rows)?;
    writeln!(out, "price col:   {}", i.base_price_header)?;
    writeln!(out, "headers:")?;
    for h in &i.headers {
        writeln!(out, "  {:<32}{:<32}{}", h.original, h.normalized, h.role)?;
    }
    writeln!(out, "plans:       {}", i.distinct_plans.join(", "))?;
    writeln!(out, "events:      {}", i.distinct_events.join(", "))?;
    Ok(())
}

pub fn sources(out: &mut dyn Write, r: &SourceReport) -> io::Result<()> {
    match &r.live_feed {
        Some(feed) => {
            writeln!(out, "live feed:   {}", feed.identity)?;
            writeln!(out, "  url:       {}", feed.url)?;
        }
        None => writeln!(out, "live feed:   not configured")?,
    }
    let state = if r.workbook_exists { "exists" } else { "missing" };
    writeln!(out, "workbook:    {} ({state})", r.workbook_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use studiorate_engine::{AddonKey, QuoteLine};

    #[test]
    fn amounts_drop_trailing_zeros() {
        assert_eq!(amount(900.0), "900");
        assert_eq!(amount(12.5), "12.50");
    }

    #[test]
    fn quote_lists_lines_and_ignored() {
        let q = Quote {
            event_type: "Svadba".into(),
            tier: PackageTier::Classic,
            base: 900.0,
            base_from_fallback: false,
            extra_units: 2,
            extra_units_charge: 120.0,
            addons: vec![QuoteLine { key: AddonKey::SecondPhotog, price: 150.0 }],
            ignored: vec![AddonKey::Drone],
            total: 1170,
        };
        let mut buf = Vec::new();
        quote(&mut buf, &q, 60.0).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Svadba / classic"));
        assert!(text.contains("extra units (2 x 60)"));
        assert!(text.contains("+ secondPhotog"));
        assert!(text.contains("1170"));
        assert!(text.contains("not offered for this package: drone"));
    }
}
