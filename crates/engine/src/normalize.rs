//! Text normalization for header and cell matching.

use unicode_normalization::UnicodeNormalization;

use crate::cell::CellValue;

/// Fold `s` to a canonical matching form.
///
/// Compatibility-decomposes, drops combining marks (U+0300..=U+036F),
/// spells `đ`/`Đ` as `dj`, lowercases, replaces every character outside
/// `[a-z0-9 \-_/]` with a space, then collapses whitespace runs and trims.
/// Idempotent.
pub fn normalize(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    for c in s.nfkd() {
        if ('\u{0300}'..='\u{036F}').contains(&c) {
            continue;
        }
        if c == 'đ' || c == 'Đ' {
            folded.push_str("dj");
            continue;
        }
        for lower in c.to_lowercase() {
            if lower.is_ascii_lowercase() || lower.is_ascii_digit() || matches!(lower, ' ' | '-' | '_' | '/') {
                folded.push(lower);
            } else {
                folded.push(' ');
            }
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a cell's text rendering.
pub fn normalize_cell(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        other => normalize(&other.to_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_serbian_latin() {
        assert_eq!(normalize("  Drugi  Fotograf "), "drugi fotograf");
        assert_eq!(normalize("Đurđevdan"), "djurdjevdan");
        assert_eq!(normalize("Krštenje"), "krstenje");
        assert_eq!(normalize("Uključeno"), "ukljuceno");
        assert_eq!(normalize("Rođendan"), "rodjendan");
    }

    #[test]
    fn strips_punctuation_but_keeps_separators() {
        assert_eq!(normalize("Cena (EUR)"), "cena eur");
        assert_eq!(normalize("4K video"), "4k video");
        assert_eq!(normalize("Foto/Video"), "foto/video");
        assert_eq!(normalize("usb-stick_2"), "usb-stick_2");
        assert_eq!(normalize("Ne objavljuj!"), "ne objavljuj");
    }

    #[test]
    fn empty_and_symbol_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("✓"), "");
        assert_eq!(normalize("€"), "");
    }

    #[test]
    fn compatibility_forms() {
        // Fullwidth and ligature forms decompose to ASCII.
        assert_eq!(normalize("ＣＥＮＡ"), "cena");
        assert_eq!(normalize("ﬁlm"), "film");
    }

    #[test]
    fn idempotent_on_samples() {
        for s in ["Drugi Fotograf", "Đorđe", "Cena (EUR)", "✓ da", "ＵＳＢ"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn cell_normalization() {
        assert_eq!(normalize_cell(&CellValue::Empty), "");
        assert_eq!(normalize_cell(&CellValue::from(150.0)), "150");
        assert_eq!(normalize_cell(&CellValue::from(" DA ")), "da");
    }
}
