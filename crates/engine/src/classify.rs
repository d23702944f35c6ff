//! Cell classification: raw spreadsheet cell → addon rule.

use crate::cell::CellValue;
use crate::model::AddonRule;
use crate::normalize::normalize;

/// Text cell as seen by the rules: the trimmed raw text and its normalized form.
pub struct CellText<'a> {
    pub raw: &'a str,
    pub norm: String,
}

/// One text classification rule. Rules run in order; the first `Some` wins.
pub struct CellRule {
    pub name: &'static str,
    pub apply: fn(&CellText<'_>) -> Option<AddonRule>,
}

const NEGATIONS: &[&str] = &["ne", "nije", "no", "n"];
const CHECKMARKS: &[char] = &['✓', '✔', '✅'];
const AFFIRMATIVES: &[&str] = &["da", "yes", "true"];
const CURRENCY_SYMBOLS: &[char] = &['€', '$', '£', '¥', '₽'];

fn negation(cell: &CellText<'_>) -> Option<AddonRule> {
    let negated = NEGATIONS.contains(&cell.norm.as_str()) || cell.norm.contains("nije ukljuc");
    negated.then_some(AddonRule::Hidden)
}

fn checkmark(cell: &CellText<'_>) -> Option<AddonRule> {
    cell.raw.contains(CHECKMARKS).then_some(AddonRule::Included)
}

fn single_mark(cell: &CellText<'_>) -> Option<AddonRule> {
    matches!(cell.raw, "x" | "X" | "+").then_some(AddonRule::Included)
}

fn affirmative_word(cell: &CellText<'_>) -> Option<AddonRule> {
    cell.raw
        .split_whitespace()
        .any(|word| AFFIRMATIVES.iter().any(|a| word.eq_ignore_ascii_case(a)))
        .then_some(AddonRule::Included)
}

fn included_stem(cell: &CellText<'_>) -> Option<AddonRule> {
    cell.norm.contains("ukljuc").then_some(AddonRule::Included)
}

fn plain_number(cell: &CellText<'_>) -> Option<AddonRule> {
    parse_number(cell.raw).and_then(number_rule)
}

/// Text rules in priority order. Symbolic markers first, numbers last.
pub static CELL_RULES: &[CellRule] = &[
    CellRule { name: "negation", apply: negation },
    CellRule { name: "checkmark", apply: checkmark },
    CellRule { name: "single-mark", apply: single_mark },
    CellRule { name: "affirmative", apply: affirmative_word },
    CellRule { name: "included-stem", apply: included_stem },
    CellRule { name: "number", apply: plain_number },
];

/// 0 is an explicit free inclusion; positive amounts are surcharges.
fn number_rule(n: f64) -> Option<AddonRule> {
    if !n.is_finite() || n < 0.0 {
        None
    } else if n == 0.0 {
        Some(AddonRule::Included)
    } else {
        Some(AddonRule::available(n))
    }
}

/// Classify a cell. `None` means the cell says nothing usable about the addon.
pub fn value_to_rule(value: &CellValue) -> Option<AddonRule> {
    match value {
        CellValue::Bool(true) => Some(AddonRule::Included),
        CellValue::Bool(false) => Some(AddonRule::Hidden),
        CellValue::Empty => None,
        CellValue::Number(n) => number_rule(*n),
        CellValue::Text(s) => classify_text(s),
    }
}

/// Run [`CELL_RULES`] over a text cell.
pub fn classify_text(s: &str) -> Option<AddonRule> {
    let raw = s.trim();
    if raw.is_empty() {
        return None;
    }
    let cell = CellText { raw, norm: normalize(raw) };
    CELL_RULES.iter().find_map(|rule| (rule.apply)(&cell))
}

/// Name of the rule that classified `s`, for diagnostics.
pub fn matching_rule(s: &str) -> Option<&'static str> {
    let raw = s.trim();
    if raw.is_empty() {
        return None;
    }
    let cell = CellText { raw, norm: normalize(raw) };
    CELL_RULES
        .iter()
        .find(|rule| (rule.apply)(&cell).is_some())
        .map(|rule| rule.name)
}

/// Parse a purely numeric cell.
///
/// Anything containing a letter or a currency symbol is rejected outright.
/// The first comma is read as the decimal separator. Grouped thousands
/// ("1.200") are not recognized.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_alphabetic() || CURRENCY_SYMBOLS.contains(&c)) {
        return None;
    }
    let s = s.replacen(',', ".", 1);
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric reading of any cell, used for base prices.
pub fn parse_cell_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => n.is_finite().then_some(*n),
        CellValue::Text(s) => parse_number(s),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}
