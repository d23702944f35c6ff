//! Event-type matching for user- or URL-supplied labels.

use crate::normalize::normalize;

/// Synonyms and plural forms → normalized canonical event label.
const EVENT_ALIASES: &[(&str, &str)] = &[
    ("svadba", "svadba"),
    ("vencanje", "vencanje"),
    ("studio", "studio"),
    ("portret", "studio"),
    ("portreti", "studio"),
    ("rodjendan", "rodjendan"),
    ("rodjendani", "rodjendan"),
    ("rodendan", "rodjendan"),
    ("rodendani", "rodjendan"),
    ("krstenje", "krstenje"),
    ("krstenja", "krstenje"),
    ("drugo", "drugo"),
];

/// Resolve `raw` to one of the `available` event types.
///
/// Tries the alias table, then an exact normalized match, then a prefix
/// match in either direction. Falls back to `fallback` when it is
/// available, otherwise the first available type. `None` only when
/// `available` is empty.
pub fn match_event_type(raw: Option<&str>, available: &[String], fallback: &str) -> Option<String> {
    raw.and_then(|r| resolve_event_type(r, available)).or_else(|| {
        available
            .iter()
            .find(|ev| ev.as_str() == fallback)
            .or_else(|| available.first())
            .cloned()
    })
}

/// Like [`match_event_type`] without the fallback: `None` when nothing matches.
pub fn resolve_event_type(raw: &str, available: &[String]) -> Option<String> {
    let wanted = normalize(raw);
    if wanted.is_empty() {
        return None;
    }

    let normalized: Vec<(String, &String)> = available.iter().map(|ev| (normalize(ev), ev)).collect();

    let aliased = EVENT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == wanted)
        .and_then(|(_, canon)| normalized.iter().find(|(n, _)| n.as_str() == *canon));

    aliased
        .or_else(|| normalized.iter().find(|(n, _)| *n == wanted))
        .or_else(|| {
            normalized
                .iter()
                .find(|(n, _)| !n.is_empty() && (n.starts_with(&wanted) || wanted.starts_with(n.as_str())))
        })
        .map(|(_, ev)| (*ev).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Vec<String> {
        ["Svadba", "Studio", "Rođendan", "Krštenje"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn aliases_resolve_to_canonical_labels() {
        let ev = events();
        assert_eq!(match_event_type(Some("portret"), &ev, "Svadba").as_deref(), Some("Studio"));
        assert_eq!(match_event_type(Some("rodjendani"), &ev, "Svadba").as_deref(), Some("Rođendan"));
        assert_eq!(match_event_type(Some("Krštenja"), &ev, "Svadba").as_deref(), Some("Krštenje"));
    }

    #[test]
    fn exact_and_prefix_matches() {
        let ev = events();
        assert_eq!(match_event_type(Some("SVADBA"), &ev, "Studio").as_deref(), Some("Svadba"));
        assert_eq!(match_event_type(Some("stu"), &ev, "Svadba").as_deref(), Some("Studio"));
        assert_eq!(match_event_type(Some("svadba i veselje"), &ev, "Studio").as_deref(), Some("Svadba"));
    }

    #[test]
    fn falls_back() {
        let ev = events();
        assert_eq!(match_event_type(Some("koncert"), &ev, "Studio").as_deref(), Some("Studio"));
        assert_eq!(match_event_type(Some("koncert"), &ev, "Matura").as_deref(), Some("Svadba"));
        assert_eq!(match_event_type(None, &ev, "Krštenje").as_deref(), Some("Krštenje"));
        assert_eq!(match_event_type(Some("  "), &ev, "Nope").as_deref(), Some("Svadba"));
    }

    #[test]
    fn resolve_without_fallback() {
        let ev = events();
        assert_eq!(resolve_event_type("portreti", &ev).as_deref(), Some("Studio"));
        assert_eq!(resolve_event_type("koncert", &ev), None);
        assert_eq!(resolve_event_type("", &ev), None);
    }

    #[test]
    fn nothing_to_match_against() {
        assert_eq!(match_event_type(Some("Svadba"), &[], "Svadba"), None);
    }
}
