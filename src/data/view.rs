use std::io::Write;

use super::aggregate::{aggregate, AggregateError};
use super::columns::{present_info_columns, select_stat_columns, ScaleMode, FULL_NAME};
use super::highlight::{evaluate, HighlightSpec, LARGE_DATASET_THRESHOLD};
use super::model::{StatDataset, StatRecord};

// ---------------------------------------------------------------------------
// TableView – everything the presentation layer needs for one interaction
// ---------------------------------------------------------------------------

/// The assembled display table: ordered columns, result rows, a per-row
/// highlight flag, and the advisories that accompany them. Rebuilt from the
/// immutable dataset on every interaction; nothing is cached.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    /// Display column order.
    pub columns: Vec<String>,
    /// Result rows (season-by-season clones or aggregated rows).
    pub rows: Vec<StatRecord>,
    /// Parallel to `rows`: whether the highlight rule matched.
    pub highlight: Vec<bool>,
    /// Stat columns requested under the active scale but absent from the
    /// dataset. Advisory only, already excluded from `columns`.
    pub missing_columns: Vec<String>,
    /// Highlighting is active and the row count exceeds the advisory
    /// threshold. A performance hint for the caller, nothing more.
    pub large_dataset: bool,
}

impl TableView {
    /// No stat columns survived missing-column exclusion.
    pub fn no_stat_columns(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// View assembly
// ---------------------------------------------------------------------------

/// Compose scale selection, aggregation, and highlight evaluation over an
/// already-filtered view (`visible` indexes into `dataset`).
pub fn build_table(
    dataset: &StatDataset,
    visible: &[usize],
    scale: ScaleMode,
    averages: bool,
    highlight: Option<&HighlightSpec>,
) -> Result<TableView, AggregateError> {
    let selection = select_stat_columns(dataset, scale);
    let info_columns = present_info_columns(dataset);

    // Nothing displayable under this scale: an empty view with the advisory
    // intact, not an error.
    if selection.present.is_empty() {
        return Ok(TableView {
            missing_columns: selection.missing,
            ..Default::default()
        });
    }

    let (columns, rows) = if averages {
        let rows = aggregate(dataset, visible, &selection.present, &info_columns)?;
        let mut columns = vec![FULL_NAME.to_string()];
        columns.extend(info_columns);
        columns.extend(selection.present.iter().cloned());
        (columns, rows)
    } else {
        let mut columns = info_columns;
        columns.extend(selection.present.iter().cloned());
        let rows = visible
            .iter()
            .map(|&i| dataset.records[i].clone())
            .collect();
        (columns, rows)
    };

    let flags = match highlight {
        Some(spec) => rows.iter().map(|r| evaluate(&r.values, spec)).collect(),
        None => vec![false; rows.len()],
    };

    Ok(TableView {
        large_dataset: highlight.is_some() && rows.len() > LARGE_DATASET_THRESHOLD,
        highlight: flags,
        missing_columns: selection.missing,
        columns,
        rows,
    })
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write the assembled view as CSV, cells in their text form.
pub fn export_csv<W: Write>(view: &TableView, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&view.columns)?;
    for row in &view.rows {
        let cells: Vec<String> = view
            .columns
            .iter()
            .map(|col| row.get(col).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        wtr.write_record(&cells)?;
    }
    wtr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::columns::{FAMILY_NAME, FIRST_NAME, SEASON};
    use crate::data::highlight::Comparator;
    use crate::data::model::CellValue;

    fn record(first: &str, family: &str, season: i64, pts: i64) -> StatRecord {
        let mut values: BTreeMap<String, CellValue> = BTreeMap::new();
        values.insert(FIRST_NAME.into(), CellValue::String(first.into()));
        values.insert(FAMILY_NAME.into(), CellValue::String(family.into()));
        values.insert(SEASON.into(), CellValue::Integer(season));
        values.insert("PTS".into(), CellValue::Integer(pts));
        values.insert("MIN".into(), CellValue::Integer(20));
        StatRecord::new(values)
    }

    fn sample_dataset() -> StatDataset {
        StatDataset::from_records(vec![
            record("A", "One", 2020, 10),
            record("A", "One", 2021, 20),
            record("B", "Two", 2020, 5),
        ])
    }

    #[test]
    fn averaged_view_orders_players_by_first_appearance() {
        let ds = sample_dataset();
        let visible: Vec<usize> = (0..ds.len()).collect();
        let view = build_table(&ds, &visible, ScaleMode::Raw, true, None).unwrap();

        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].full_name.as_deref(), Some("A One"));
        assert_eq!(view.rows[0].get("PTS"), Some(&CellValue::Float(15.0)));
        assert_eq!(view.rows[1].full_name.as_deref(), Some("B Two"));
        assert_eq!(view.rows[1].get("PTS"), Some(&CellValue::Float(5.0)));
        assert_eq!(view.columns[0], FULL_NAME);
        assert!(view.highlight.iter().all(|f| !f));
    }

    #[test]
    fn season_view_passes_rows_through() {
        let ds = sample_dataset();
        let visible = vec![2usize];
        let view = build_table(&ds, &visible, ScaleMode::Raw, false, None).unwrap();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].get("PTS"), Some(&CellValue::Integer(5)));
        assert!(!view.columns.contains(&FULL_NAME.to_string()));
    }

    #[test]
    fn missing_scale_family_yields_empty_view_with_advisory() {
        let ds = sample_dataset();
        let visible: Vec<usize> = (0..ds.len()).collect();
        let view = build_table(&ds, &visible, ScaleMode::PerMinute, true, None).unwrap();
        assert!(view.no_stat_columns());
        assert!(view.is_empty());
        assert!(view.missing_columns.contains(&"scaledMIN".to_string()));
    }

    #[test]
    fn highlight_flags_follow_rows() {
        let ds = sample_dataset();
        let visible: Vec<usize> = (0..ds.len()).collect();
        let spec = HighlightSpec {
            column: "PTS".into(),
            comparator: Comparator::GreaterThan,
            value: "12".into(),
        };
        let view = build_table(&ds, &visible, ScaleMode::Raw, true, Some(&spec)).unwrap();
        // Averaged PTS: A One = 15.0, B Two = 5.0.
        assert_eq!(view.highlight, vec![true, false]);
        assert!(!view.large_dataset);
    }

    #[test]
    fn large_dataset_advisory_fires_only_with_highlight() {
        let records: Vec<StatRecord> = (0..600)
            .map(|i| record(&format!("P{i}"), "X", 2020, i))
            .collect();
        let ds = StatDataset::from_records(records);
        let visible: Vec<usize> = (0..ds.len()).collect();

        let plain = build_table(&ds, &visible, ScaleMode::Raw, false, None).unwrap();
        assert!(!plain.large_dataset);

        let spec = HighlightSpec {
            column: "PTS".into(),
            comparator: Comparator::LessThan,
            value: "10".into(),
        };
        let flagged = build_table(&ds, &visible, ScaleMode::Raw, false, Some(&spec)).unwrap();
        assert!(flagged.large_dataset);
    }

    #[test]
    fn csv_export_round_trips_headers_and_text_cells() {
        let ds = sample_dataset();
        let visible: Vec<usize> = (0..ds.len()).collect();
        let view = build_table(&ds, &visible, ScaleMode::Raw, true, None).unwrap();

        let mut buf = Vec::new();
        export_csv(&view, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("full_name,"));
        assert!(text.contains("A One"));
        assert!(text.contains("15"));
    }
}
