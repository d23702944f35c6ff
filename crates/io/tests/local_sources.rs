//! Local file strategies against real files on disk.

use std::path::Path;

use rust_xlsxwriter::Workbook;
use studiorate_engine::{build_matrix, AddonKey, AddonRule, CellValue, PackageTier};
use studiorate_io::{load_with_fallback, GvizSource, SheetSource, WorkbookSource};

fn write_addons_xlsx(path: &Path) {
    let mut workbook = Workbook::new();

    let pricing = workbook.add_worksheet();
    pricing.set_name("Addons").unwrap();
    let headers = ["Paket", "Vid Proslave", "Cena", "Dron", "4K video", "Foto kutak"];
    for (col, h) in headers.iter().enumerate() {
        pricing.write_string(0, col as u16, *h).unwrap();
    }
    pricing.write_string(1, 0, "Premium").unwrap();
    pricing.write_string(1, 1, "Svadba").unwrap();
    pricing.write_number(1, 2, 900.0).unwrap();
    pricing.write_number(1, 3, 150.0).unwrap();
    pricing.write_boolean(1, 4, true).unwrap();
    pricing.write_string(1, 5, "uključeno").unwrap();

    pricing.write_string(3, 0, "Standard").unwrap();
    pricing.write_string(3, 1, "Svadba").unwrap();
    pricing.write_number(3, 2, 500.0).unwrap();
    pricing.write_string(3, 4, "ne").unwrap();

    // Second sheet must be ignored.
    let other = workbook.add_worksheet();
    other.write_string(0, 0, "Paket").unwrap();
    other.write_string(1, 0, "Signature").unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn xlsx_first_sheet_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("addons.xlsx");
    write_addons_xlsx(&path);

    let rows = WorkbookSource::new(&path).load().unwrap();
    assert_eq!(rows.len(), 2, "blank row 3 is skipped");
    assert_eq!(rows[0].get("Cena"), Some(&CellValue::Number(900.0)));
    assert_eq!(rows[0].get("4K video"), Some(&CellValue::Bool(true)));
    assert_eq!(rows[1].get("Dron"), Some(&CellValue::from("")));
}

#[test]
fn xlsx_builds_matrix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("addons.xlsx");
    write_addons_xlsx(&path);

    let rows = WorkbookSource::new(&path).load().unwrap();
    let m = build_matrix(&rows);
    assert_eq!(m.base_price("Svadba", PackageTier::Classic), Some(900.0));
    assert_eq!(m.rule("Svadba", PackageTier::Classic, AddonKey::Drone), AddonRule::available(150.0));
    assert_eq!(m.rule("Svadba", PackageTier::Classic, AddonKey::Video4k), AddonRule::Included);
    assert_eq!(m.rule("Svadba", PackageTier::Basic, AddonKey::Video4k), AddonRule::Hidden);
    assert_eq!(m.extras("Svadba", PackageTier::Classic), ["Foto kutak".to_string()]);
}

#[test]
fn csv_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("addons.CSV");
    std::fs::write(&path, "Paket;Vid Proslave;Cena\nSignature;Krštenje;1200\n").unwrap();

    let rows = WorkbookSource::new(&path).load().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Vid Proslave"), Some(&CellValue::from("Krštenje")));
}

#[test]
fn tsv_forces_tab() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("addons.tsv");
    std::fs::write(&path, "Paket\tNapomena\nPremium\tDo ponoći, uz doplatu\n").unwrap();

    let rows = WorkbookSource::new(&path).load().unwrap();
    assert_eq!(rows[0].get("Napomena"), Some(&CellValue::from("Do ponoći, uz doplatu")));
}

#[test]
fn corrupt_workbook_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("addons.xlsx");
    std::fs::write(&path, b"not a zip file").unwrap();
    assert!(WorkbookSource::new(&path).load().is_err());
}

#[test]
fn unreachable_feed_falls_back_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("addons.csv");
    std::fs::write(&path, "Paket,Event,Cena\nStandard,Studio,300\n").unwrap();

    // Nothing listens on port 9; the feed fails fast and the file answers.
    let feed = GvizSource::with_base_url("abc", "Addons", "http://127.0.0.1:9")
        .timeout(std::time::Duration::from_secs(2));
    let file = WorkbookSource::new(&path);

    let outcome = load_with_fallback(&[&feed, &file]);
    assert_eq!(outcome.source, Some(file.identity()));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.rows.len(), 1);
}

#[test]
fn both_sources_missing_gives_empty_rows() {
    let feed = GvizSource::with_base_url("abc", "Addons", "not a url");
    let file = WorkbookSource::new("/no/such/addons.xlsx");

    let outcome = load_with_fallback(&[&feed, &file]);
    assert!(outcome.rows.is_empty());
    assert_eq!(outcome.source, None);
    assert!(build_matrix(&outcome.rows).is_empty());
}
