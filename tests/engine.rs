use std::collections::{BTreeMap, BTreeSet};

use courtside::data::columns::{
    select_stat_columns, ScaleMode, CLUB, FAMILY_NAME, FIRST_NAME, FULL_NAME, SEASON,
};
use courtside::data::filter::{apply_filters, FilterSpec};
use courtside::data::highlight::{Comparator, HighlightSpec};
use courtside::data::model::{CellValue, StatDataset, StatRecord};
use courtside::data::view::build_table;

fn stat_line(first: &str, family: &str, club: &str, season: i64, pts: i64) -> StatRecord {
    let mut values: BTreeMap<String, CellValue> = BTreeMap::new();
    values.insert(FIRST_NAME.into(), CellValue::String(first.into()));
    values.insert(FAMILY_NAME.into(), CellValue::String(family.into()));
    values.insert(CLUB.into(), CellValue::String(club.into()));
    values.insert(SEASON.into(), CellValue::Integer(season));
    values.insert("PTS".into(), CellValue::Integer(pts));
    StatRecord::new(values)
}

fn two_player_dataset() -> StatDataset {
    StatDataset::from_records(vec![
        stat_line("A", "Player", "Falcons", 2020, 10),
        stat_line("A", "Player", "Falcons", 2021, 20),
        stat_line("B", "Player", "Hawks", 2020, 5),
    ])
}

#[test]
fn end_to_end_two_player_aggregation() {
    let ds = two_player_dataset();
    let visible = apply_filters(&ds, &FilterSpec::default());
    assert_eq!(visible.len(), ds.len());

    let view = build_table(&ds, &visible, ScaleMode::Raw, true, None).unwrap();
    assert_eq!(view.rows.len(), 2);

    // Ordered by first appearance: A before B.
    assert_eq!(view.rows[0].full_name.as_deref(), Some("A Player"));
    assert_eq!(view.rows[0].get("PTS"), Some(&CellValue::Float(15.0)));
    assert_eq!(view.rows[1].full_name.as_deref(), Some("B Player"));
    assert_eq!(view.rows[1].get("PTS"), Some(&CellValue::Float(5.0)));

    // full_name leads the averaged column set.
    assert_eq!(view.columns.first().map(String::as_str), Some(FULL_NAME));
}

#[test]
fn filtered_view_is_always_a_subset() {
    let ds = two_player_dataset();
    let all = apply_filters(&ds, &FilterSpec::default());
    assert_eq!(all, vec![0, 1, 2]);

    let mut clubs = BTreeSet::new();
    clubs.insert(CellValue::String("Hawks".into()));
    let spec = FilterSpec {
        clubs,
        ..Default::default()
    };
    let filtered = apply_filters(&ds, &spec);
    assert!(filtered.iter().all(|i| all.contains(i)));
    assert!(filtered.len() <= all.len());
}

#[test]
fn filtering_composes_with_aggregation() {
    let ds = two_player_dataset();
    let spec = FilterSpec {
        season_range: Some((2020, 2020)),
        ..Default::default()
    };
    let visible = apply_filters(&ds, &spec);
    let view = build_table(&ds, &visible, ScaleMode::Raw, true, None).unwrap();

    // Only 2020 stat lines contribute to the means.
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].get("PTS"), Some(&CellValue::Float(10.0)));
    assert_eq!(view.rows[1].get("PTS"), Some(&CellValue::Float(5.0)));
}

#[test]
fn missing_scaled_family_reported_and_excluded() {
    let ds = two_player_dataset();
    let selection = select_stat_columns(&ds, ScaleMode::PerMinute);
    assert!(selection.present.is_empty());
    assert!(selection.missing.contains(&"scaledMIN".to_string()));

    let visible = apply_filters(&ds, &FilterSpec::default());
    let view = build_table(&ds, &visible, ScaleMode::PerMinute, false, None).unwrap();
    assert!(view.no_stat_columns());
    assert!(view.is_empty());
    assert_eq!(view.missing_columns.len(), 20);
}

#[test]
fn highlight_flags_survive_the_full_pipeline() {
    let ds = two_player_dataset();
    let visible = apply_filters(&ds, &FilterSpec::default());

    let spec = HighlightSpec {
        column: "PTS".into(),
        comparator: Comparator::GreaterThan,
        value: "7".into(),
    };
    let view = build_table(&ds, &visible, ScaleMode::Raw, false, Some(&spec)).unwrap();
    assert_eq!(view.highlight, vec![true, true, false]);

    // Equals never coerces numerically: the averaged 15.0 renders as "15".
    let spec = HighlightSpec {
        column: "PTS".into(),
        comparator: Comparator::Equals,
        value: "15".into(),
    };
    let view = build_table(&ds, &visible, ScaleMode::Raw, true, Some(&spec)).unwrap();
    assert_eq!(view.highlight, vec![true, false]);
}

#[test]
fn filtered_to_empty_is_a_view_not_an_error() {
    let ds = two_player_dataset();
    let spec = FilterSpec {
        name_search: "nobody".into(),
        ..Default::default()
    };
    let visible = apply_filters(&ds, &spec);
    assert!(visible.is_empty());

    let view = build_table(&ds, &visible, ScaleMode::Raw, true, None).unwrap();
    assert!(view.is_empty());
    assert!(!view.no_stat_columns());
}
