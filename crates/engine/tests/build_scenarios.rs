//! End-to-end builder scenarios over realistic sheet rows.

use studiorate_engine::*;

fn sheet(headers: &[&str], rows: &[&[CellValue]]) -> Vec<RawRow> {
    rows.iter()
        .map(|cells| headers.iter().copied().zip(cells.iter().cloned()).collect())
        .collect()
}

fn t(s: &str) -> CellValue {
    CellValue::from(s)
}

const HEADERS: &[&str] = &[
    "Paket",
    "Vid Proslave",
    "Cena",
    "Drugi fotograf",
    "4K video",
    "Video",
    "Dron",
    "Ne objavljuj slike na mrežama",
    "Izrada foto na licu mesta",
    "Foto kutak",
    "Napomena",
];

fn wedding_sheet() -> Vec<RawRow> {
    sheet(
        HEADERS,
        &[
            &[t("Standard"), t("Svadba"), 500.0.into(), t("200"), t("ne"), t("✓"), t(""), t(""), t(""), t(""), t("")],
            &[
                t("Premium"),
                t("Svadba"),
                t("900"),
                t("150"),
                t("250"),
                t("da"),
                t("150"),
                t("x"),
                t("uključeno"),
                t("Uključeno"),
                t("Do ponoći"),
            ],
            &[t("Signature"), t("Svadba"), t("1500"), t("0"), t("0,00"), t("✓"), t("✓"), t(""), t(""), t(""), t("")],
            &[t("Premium"), t(""), t("999"), t("1"), t("1"), t("1"), t("1"), t(""), t(""), t(""), t("")],
        ],
    )
}

#[test]
fn wedding_sheet_resolves_every_axis() {
    let (m, report) = MatrixBuilder::new().build(&wedding_sheet());

    assert_eq!(m.event_types(), ["Svadba".to_string()]);
    assert_eq!(report.rows_used, 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::MissingEvent);

    assert_eq!(m.base_price("Svadba", PackageTier::Basic), Some(500.0));
    assert_eq!(m.base_price("Svadba", PackageTier::Classic), Some(900.0));
    assert_eq!(m.base_price("Svadba", PackageTier::Signature), Some(1500.0));

    assert_eq!(m.rule("Svadba", PackageTier::Basic, AddonKey::Video4k), AddonRule::Hidden);
    assert_eq!(m.rule("Svadba", PackageTier::Classic, AddonKey::Video4k), AddonRule::available(250.0));
    assert_eq!(m.rule("Svadba", PackageTier::Signature, AddonKey::Video4k), AddonRule::Included);
    assert_eq!(m.rule("Svadba", PackageTier::Signature, AddonKey::SecondPhotog), AddonRule::Included);
    assert_eq!(m.rule("Svadba", PackageTier::Basic, AddonKey::Drone), AddonRule::Hidden);
    assert_eq!(m.note("Svadba", PackageTier::Classic), Some("Do ponoći"));
    assert_eq!(m.note("Svadba", PackageTier::Basic), None);
}

#[test]
fn privacy_default_and_override() {
    let m = build_matrix(&wedding_sheet());
    for tier in PackageTier::ALL {
        assert_eq!(
            m.explicit_rule("Svadba", tier, AddonKey::DontPublish),
            Some(AddonRule::available(0.0)),
            "{tier}"
        );
    }
}

#[test]
fn included_print_on_site_is_an_addon_not_an_extra() {
    let m = build_matrix(&sheet(
        &["Paket", "Vid Proslave", "Cena", "Izrada foto na licu mesta", "Foto kutak"],
        &[&[t("Premium"), t("Svadba"), t("900"), t("uključeno"), t("uključeno")]],
    ));
    assert_eq!(m.rule("Svadba", PackageTier::Classic, AddonKey::PrintOnSite), AddonRule::Included);
    assert_eq!(m.extras("Svadba", PackageTier::Classic), ["Foto kutak".to_string()]);
}

#[test]
fn extras_ignore_non_included_cells() {
    let m = build_matrix(&sheet(
        &["Paket", "Vid Proslave", "Cena", "Foto kutak", "Pozivnice"],
        &[&[t("Standard"), t("Studio"), t("300"), t("150"), t("nije uključeno")]],
    ));
    // "nije uključeno" still contains the stem; only the addon classifier knows negation.
    assert_eq!(m.extras("Studio", PackageTier::Basic), ["Pozivnice".to_string()]);
}

#[test]
fn worked_price_example() {
    let m = build_matrix(&wedding_sheet());
    let price = compute_price(&m, "Svadba", PackageTier::Classic, &[AddonKey::Drone], 2);
    assert_eq!(price, 900 + 150 + 120);
}

#[test]
fn missing_event_row_leaves_matrix_untouched() {
    let full = wedding_sheet();
    let without_bad: Vec<RawRow> = full[..3].to_vec();
    assert_eq!(build_matrix(&full), build_matrix(&without_bad));
}

#[test]
fn empty_source_builds_empty_matrix() {
    let m = build_matrix(&[]);
    assert!(m.event_types().is_empty());
    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(json["base"], serde_json::json!({}));
    assert_eq!(json["addons"], serde_json::json!({}));
}

#[test]
fn four_k_header_variants() {
    for h in ["4K video", "4k VIDEO", " video 4k ", "Video-4K"] {
        assert_eq!(header_to_addon_key(h), Some(AddonKey::Video4k), "{h}");
    }
}

#[test]
fn normalization_invariance() {
    assert_eq!(normalize("ŠKOLA"), normalize("skola"));
    assert_eq!(normalize(" Škola "), normalize("skola"));
}

#[test]
fn zero_price_cells_are_included() {
    assert_eq!(value_to_rule(&t("0")), Some(AddonRule::Included));
    assert_eq!(value_to_rule(&t("0,00")), Some(AddonRule::Included));
}

#[test]
fn availability_for_configurator() {
    let m = build_matrix(&wedding_sheet());
    let a = addon_availability(&m, "Svadba", PackageTier::Classic);
    let offered: Vec<_> = a.available.iter().map(|o| o.key).collect();
    assert_eq!(
        offered,
        vec![AddonKey::SecondPhotog, AddonKey::Video4k, AddonKey::Drone, AddonKey::DontPublish]
    );
    assert_eq!(a.included, vec![AddonKey::Video, AddonKey::PrintOnSite]);
}

#[test]
fn starting_prices_and_cache() {
    let m = build_matrix(&wedding_sheet());
    let schedule = PriceSchedule::default();
    let mut cache = MinPriceCache::new();
    let prices = cache.get_or_refresh("file:addons.xlsx", &schedule, || m.clone());
    assert_eq!(prices.basic, 500.0);
    assert_eq!(prices.classic, 900.0);
    assert_eq!(prices.signature, 1500.0);
}
