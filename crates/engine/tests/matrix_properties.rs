// Property-based tests for the pricing engine.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use studiorate_engine::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Arbitrary cell: the shapes a sheet actually produces.
fn arb_cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        1 => Just(CellValue::Empty),
        1 => any::<bool>().prop_map(CellValue::Bool),
        2 => (-1000.0..5000.0f64).prop_map(CellValue::Number),
        2 => r"[0-9]{1,4}(,[0-9]{1,2})?".prop_map(CellValue::Text),
        1 => prop::sample::select(vec!["✓", "x", "+", "da", "ne", "nije", "uključeno", "Nije uključeno", "150€", "po dogovoru", ""])
            .prop_map(CellValue::from),
        2 => any::<String>().prop_map(CellValue::Text),
    ]
}

fn arb_plan() -> impl Strategy<Value = CellValue> {
    prop::sample::select(vec!["Standard", "Premium", "Signature", "Početni", "Classic", "Gold", ""])
        .prop_map(CellValue::from)
}

fn arb_event() -> impl Strategy<Value = CellValue> {
    prop::sample::select(vec!["Svadba", "Rođendan", "Krštenje", "Studio", "", "  "]).prop_map(CellValue::from)
}

const ADDON_HEADERS: &[&str] = &["Dron", "Album", "4K video", "Ne objavljuj slike na mrežama", "Foto kutak", "Izrada foto na licu mesta"];

fn arb_row() -> impl Strategy<Value = RawRow> {
    (arb_plan(), arb_event(), arb_cell(), prop::collection::vec(arb_cell(), ADDON_HEADERS.len())).prop_map(
        |(plan, event, price, cells)| {
            let mut row = RawRow::new();
            row.insert("Paket", plan);
            row.insert("Vid Proslave", event);
            row.insert("Cena", price);
            for (h, c) in ADDON_HEADERS.iter().zip(cells) {
                row.insert(*h, c);
            }
            row
        },
    )
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn normalize_is_idempotent(s in any::<String>()) {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || " -_/".contains(c)));
        prop_assert_eq!(once.trim(), once.as_str());
        prop_assert!(!once.contains("  "));
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn classifier_is_total(cell in arb_cell()) {
        // Any outcome is fine; it must not panic and prices stay non-negative.
        if let Some(AddonRule::Available { price: Some(p) }) = value_to_rule(&cell) {
            prop_assert!(p > 0.0 && p.is_finite());
        }
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn build_is_deterministic(rows in prop::collection::vec(arb_row(), 0..20)) {
        let a = build_matrix(&rows);
        let b = build_matrix(&rows);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn privacy_always_free_opt_in(rows in prop::collection::vec(arb_row(), 0..20)) {
        let (m, report) = MatrixBuilder::new().with_snapshots(true).build(&rows);
        prop_assert_eq!(report.row_snapshots.len(), report.rows_used);
        for used in &report.row_snapshots {
            prop_assert_eq!(
                m.explicit_rule(&used.event, used.plan, AddonKey::DontPublish),
                Some(AddonRule::free())
            );
        }
    }
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn quote_ignores_non_available_selections(
        rows in prop::collection::vec(arb_row(), 1..20),
        picks in prop::collection::vec(prop::sample::select(AddonKey::ALL.to_vec()), 0..12),
        extra in 0u32..10,
    ) {
        let m = build_matrix(&rows);
        let schedule = PriceSchedule::default();
        for event in m.event_types() {
            for tier in PackageTier::ALL {
                let q = schedule.quote(&m, event, tier, &picks, extra);
                for line in &q.addons {
                    prop_assert!(m.rule(event, tier, line.key).is_available());
                }
                for key in &q.ignored {
                    prop_assert!(!m.rule(event, tier, *key).is_available());
                }
                let none = schedule.compute_price(&m, event, tier, &[], extra);
                prop_assert!(q.total >= none);
            }
        }
    }
}
