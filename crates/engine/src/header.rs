//! Column header mapping: canonical addon keys, structural columns, plan names.

use serde::Serialize;

use crate::cell::{CellValue, RawRow};
use crate::model::{AddonKey, PackageTier};
use crate::normalize::normalize;

/// Exact normalized header → addon key. Checked before any fuzzy rule.
const EXACT_HEADERS: &[(&str, AddonKey)] = &[
    ("album", AddonKey::Album),
    ("drugi fotograf", AddonKey::SecondPhotog),
    ("treci fotograf", AddonKey::ThirdPhotog),
    ("dodatni kamerman", AddonKey::SecondVideographer),
    ("ne objavljuj slike na mrezama", AddonKey::DontPublish),
    ("dron", AddonKey::Drone),
    ("video", AddonKey::Video),
    ("raw", AddonKey::Raw),
    ("expres obrada", AddonKey::Express),
    ("ekspres obrada", AddonKey::Express),
    ("izrada foto na licu mesta", AddonKey::PrintOnSite),
    ("4k video", AddonKey::Video4k),
    ("video 4k", AddonKey::Video4k),
    ("usb", AddonKey::Usb),
];

/// One fuzzy header rule: a predicate over the normalized header.
pub struct HeaderRule {
    pub name: &'static str,
    pub key: AddonKey,
    pub matches: fn(&str) -> bool,
}

fn mentions_photographer(h: &str) -> bool {
    h.contains("foto")
}

fn second_photographer(h: &str) -> bool {
    h.contains("drugi") && mentions_photographer(h)
}

fn third_photographer(h: &str) -> bool {
    h.contains("treci") && mentions_photographer(h)
}

fn extra_videographer(h: &str) -> bool {
    h.contains("dodatni") && (h.contains("kam") || h.contains("videograf"))
}

fn privacy(h: &str) -> bool {
    h.contains("objavljuj")
}

fn ultra_hd(h: &str) -> bool {
    h.contains("4k")
}

fn express(h: &str) -> bool {
    h.contains("ekspres") || h.contains("expres")
}

fn raw_files(h: &str) -> bool {
    h.contains("raw")
}

fn drone(h: &str) -> bool {
    h.contains("dron")
}

fn album(h: &str) -> bool {
    h.contains("album")
}

fn usb(h: &str) -> bool {
    h.contains("usb")
}

fn print_on_site(h: &str) -> bool {
    h.contains("izrada") && h.contains("mesta")
}

fn any_video(h: &str) -> bool {
    h.contains("video")
}

/// Fuzzy rules, most specific first. `4k` precedes the generic `video`
/// rule so "4K video" never lands on plain video.
pub static FUZZY_RULES: &[HeaderRule] = &[
    HeaderRule { name: "second-photographer", key: AddonKey::SecondPhotog, matches: second_photographer },
    HeaderRule { name: "third-photographer", key: AddonKey::ThirdPhotog, matches: third_photographer },
    HeaderRule { name: "extra-videographer", key: AddonKey::SecondVideographer, matches: extra_videographer },
    HeaderRule { name: "privacy", key: AddonKey::DontPublish, matches: privacy },
    HeaderRule { name: "4k", key: AddonKey::Video4k, matches: ultra_hd },
    HeaderRule { name: "express", key: AddonKey::Express, matches: express },
    HeaderRule { name: "raw", key: AddonKey::Raw, matches: raw_files },
    HeaderRule { name: "drone", key: AddonKey::Drone, matches: drone },
    HeaderRule { name: "album", key: AddonKey::Album, matches: album },
    HeaderRule { name: "usb", key: AddonKey::Usb, matches: usb },
    HeaderRule { name: "print-on-site", key: AddonKey::PrintOnSite, matches: print_on_site },
    HeaderRule { name: "video", key: AddonKey::Video, matches: any_video },
];

/// Map a human-typed header to its canonical addon key.
///
/// Returns `None` for structural or unrecognized columns.
pub fn header_to_addon_key(header: &str) -> Option<AddonKey> {
    let h = normalize(header);
    if h.is_empty() {
        return None;
    }

    if let Some((_, key)) = EXACT_HEADERS.iter().find(|(exact, _)| *exact == h) {
        return Some(*key);
    }

    FUZZY_RULES.iter().find(|rule| (rule.matches)(&h)).map(|rule| rule.key)
}

/// Base price column: normalized prefix "cena" or anything mentioning "price".
pub fn is_base_price_header(header: &str) -> bool {
    let h = normalize(header);
    !h.is_empty() && (h.starts_with("cena") || h.contains("price"))
}

/// Map a visible plan name to its tier. Legacy names "Početni" and "Classic" still resolve.
pub fn plan_name_to_slug(name: &str) -> Option<PackageTier> {
    let n = normalize(name);
    if n.starts_with("standard") || n == "pocetni" || n == "basic" {
        Some(PackageTier::Basic)
    } else if n.starts_with("premium") || n == "classic" {
        Some(PackageTier::Classic)
    } else if n.starts_with("signature") {
        Some(PackageTier::Signature)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Structural columns
// ---------------------------------------------------------------------------

const PLAN_ALIASES: &[&str] = &["paket", "plan", "package"];
const EVENT_ALIASES: &[&str] = &["vid proslave", "event", "tip"];
const NOTE_ALIASES: &[&str] = &["napomena", "note", "napomene"];

/// What a column means to the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "camelCase")]
pub enum ColumnRole {
    Plan,
    Event,
    BasePrice,
    Note,
    Addon(AddonKey),
    /// Unmapped column; an "included" cell here becomes a free-text extra.
    Extra,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plan => f.write_str("plan"),
            Self::Event => f.write_str("event"),
            Self::BasePrice => f.write_str("basePrice"),
            Self::Note => f.write_str("note"),
            Self::Addon(key) => write!(f, "addon:{key}"),
            Self::Extra => f.write_str("extra"),
        }
    }
}

/// Structural column positions detected from a header list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetLayout {
    pub plan: Option<String>,
    pub event: Option<String>,
    pub note: Option<String>,
    pub base_price: String,
}

fn first_alias(headers: &[String], aliases: &[&str]) -> Option<String> {
    headers
        .iter()
        .find(|h| aliases.contains(&normalize(h).as_str()))
        .cloned()
}

impl SheetLayout {
    /// Locate structural columns.
    ///
    /// The base price column is the first header passing
    /// [`is_base_price_header`], else one normalizing to exactly "cena",
    /// else the third column, else the literal "Cena".
    pub fn detect(headers: &[String]) -> Self {
        let base_price = headers
            .iter()
            .find(|h| is_base_price_header(h))
            .or_else(|| headers.iter().find(|h| normalize(h) == "cena"))
            .or_else(|| headers.get(2))
            .cloned()
            .unwrap_or_else(|| "Cena".to_string());

        Self {
            plan: first_alias(headers, PLAN_ALIASES),
            event: first_alias(headers, EVENT_ALIASES),
            note: first_alias(headers, NOTE_ALIASES),
            base_price,
        }
    }

    /// Role of `header`. Every alias column is structural, even when
    /// values are read from an earlier one.
    pub fn role(&self, header: &str) -> ColumnRole {
        let n = normalize(header);
        let is = |col: &Option<String>, aliases: &[&str]| {
            col.as_deref() == Some(header) || aliases.contains(&n.as_str())
        };
        if is(&self.plan, PLAN_ALIASES) {
            ColumnRole::Plan
        } else if is(&self.event, EVENT_ALIASES) {
            ColumnRole::Event
        } else if self.base_price == header {
            ColumnRole::BasePrice
        } else if is(&self.note, NOTE_ALIASES) {
            ColumnRole::Note
        } else {
            header_to_addon_key(header).map_or(ColumnRole::Extra, ColumnRole::Addon)
        }
    }

    fn cell<'a>(&self, col: &Option<String>, row: &'a RawRow) -> Option<&'a CellValue> {
        col.as_deref().and_then(|h| row.get(h))
    }

    /// Plan cell text, trimmed; `None` when the column or value is missing.
    pub fn plan_value(&self, row: &RawRow) -> Option<String> {
        non_blank_text(self.cell(&self.plan, row))
    }

    pub fn event_value(&self, row: &RawRow) -> Option<String> {
        non_blank_text(self.cell(&self.event, row))
    }

    pub fn note_value(&self, row: &RawRow) -> Option<String> {
        non_blank_text(self.cell(&self.note, row))
    }

    pub fn base_value<'a>(&self, row: &'a RawRow) -> Option<&'a CellValue> {
        row.get(&self.base_price)
    }
}

fn non_blank_text(cell: Option<&CellValue>) -> Option<String> {
    let text = cell?.to_text();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
