use std::path::PathBuf;

use courtside::data::columns::{CLUB, FIRST_NAME, SEASON};
use courtside::data::filter::season_bounds;
use courtside::data::loader::{load_file, LoadError};
use courtside::data::model::CellValue;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn csv_headers_are_trimmed_and_typed() {
    let ds = load_file(&fixture_path("players.csv")).expect("fixture should load");
    assert_eq!(ds.len(), 4);

    // " First Name " in the file arrives trimmed.
    assert!(ds.has_column(FIRST_NAME));
    assert!(!ds.column_names.iter().any(|c| c != c.trim()));

    let first = &ds.records[0];
    assert_eq!(first.full_name.as_deref(), Some("Alice Anderson"));
    assert_eq!(first.get(SEASON), Some(&CellValue::Integer(2020)));
    assert_eq!(first.get("PTS"), Some(&CellValue::Integer(110)));
    assert_eq!(
        first.get(CLUB),
        Some(&CellValue::String("Melbourne Falcons".into()))
    );

    // Empty REB cell on the last row is null, not zero.
    assert_eq!(ds.records[3].get("REB"), Some(&CellValue::Null));

    // Wholly numeric seasons enable the range filter.
    assert_eq!(season_bounds(&ds), Some((2020, 2021)));
}

#[test]
fn json_records_load_with_mixed_season_types() {
    let ds = load_file(&fixture_path("players.json")).expect("fixture should load");
    assert_eq!(ds.len(), 2);

    assert_eq!(ds.records[0].full_name.as_deref(), Some("Alice Anderson"));
    assert_eq!(ds.records[0].get("PTS"), Some(&CellValue::Float(10.5)));
    assert_eq!(ds.records[1].get("GP"), Some(&CellValue::Null));

    // One season is a string, so the range filter must be disabled.
    assert_eq!(
        ds.records[1].get(SEASON),
        Some(&CellValue::String("2021/22".into()))
    );
    assert_eq!(season_bounds(&ds), None);
}

#[test]
fn xlsx_round_trips_through_the_loader() {
    use rust_xlsxwriter::Workbook;

    let path = std::env::temp_dir().join("courtside_loader_roundtrip.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    // Padded headers must arrive trimmed, like every other format.
    sheet.write_string(0, 0, " First Name ").unwrap();
    sheet.write_string(0, 1, "Family Name").unwrap();
    sheet.write_string(0, 2, "Season").unwrap();
    sheet.write_string(0, 3, "PTS").unwrap();
    sheet.write_string(1, 0, "Alice").unwrap();
    sheet.write_string(1, 1, "Anderson").unwrap();
    sheet.write_number(1, 2, 2020.0).unwrap();
    sheet.write_number(1, 3, 12.5).unwrap();
    workbook.save(&path).unwrap();

    let ds = load_file(&path).expect("generated workbook should load");
    std::fs::remove_file(&path).ok();

    assert_eq!(ds.len(), 1);
    assert!(ds.has_column(FIRST_NAME));
    assert_eq!(ds.records[0].full_name.as_deref(), Some("Alice Anderson"));
    // Excel stores 2020 as a float; the loader keeps whole numbers integral.
    assert_eq!(ds.records[0].get(SEASON), Some(&CellValue::Integer(2020)));
    assert_eq!(ds.records[0].get("PTS"), Some(&CellValue::Float(12.5)));
}

#[test]
fn unreadable_sources_are_fatal() {
    let err = load_file(&fixture_path("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Csv(_)));

    let err = load_file(&fixture_path("players.txt")).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedExtension(_)));
}
