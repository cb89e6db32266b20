use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::columns::{CLUB, COMPETITION, EQUIVALENT_COMPETITION, GENDER, LEVEL, SEASON};
use super::model::{CellValue, StatDataset, StatRecord};

// ---------------------------------------------------------------------------
// FilterSpec – the conjunctive predicate set for one interaction
// ---------------------------------------------------------------------------

/// All user-selected filters. Every predicate is optional: an empty search
/// string, an empty selection set, or a `None` range means "no restriction".
/// Plain data, rebuilt by the UI on every interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring match on `full_name`.
    pub name_search: String,
    pub clubs: BTreeSet<CellValue>,
    pub genders: BTreeSet<CellValue>,
    pub levels: BTreeSet<CellValue>,
    pub competitions: BTreeSet<CellValue>,
    pub equivalent_competitions: BTreeSet<CellValue>,
    /// Inclusive season bounds; only honoured while the Season column is
    /// numeric (see [`season_bounds`]).
    pub season_range: Option<(i64, i64)>,
}

impl FilterSpec {
    /// The set-membership filters, paired with the column each applies to.
    pub fn set_filters(&self) -> [(&'static str, &BTreeSet<CellValue>); 5] {
        [
            (CLUB, &self.clubs),
            (GENDER, &self.genders),
            (LEVEL, &self.levels),
            (COMPETITION, &self.competitions),
            (EQUIVALENT_COMPETITION, &self.equivalent_competitions),
        ]
    }

    /// Selection set for a filterable column, if `column` is one.
    pub fn selection(&self, column: &str) -> Option<&BTreeSet<CellValue>> {
        match column {
            CLUB => Some(&self.clubs),
            GENDER => Some(&self.genders),
            LEVEL => Some(&self.levels),
            COMPETITION => Some(&self.competitions),
            EQUIVALENT_COMPETITION => Some(&self.equivalent_competitions),
            _ => None,
        }
    }

    /// Mutable selection set for a filterable column, if `column` is one.
    pub fn selection_mut(&mut self, column: &str) -> Option<&mut BTreeSet<CellValue>> {
        match column {
            CLUB => Some(&mut self.clubs),
            GENDER => Some(&mut self.genders),
            LEVEL => Some(&mut self.levels),
            COMPETITION => Some(&mut self.competitions),
            EQUIVALENT_COMPETITION => Some(&mut self.equivalent_competitions),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Season bounds
// ---------------------------------------------------------------------------

/// Min/max season over the dataset, provided the Season column exists and is
/// wholly numeric. Any non-numeric season value disables the range filter
/// (returns `None`) rather than erroring.
pub fn season_bounds(dataset: &StatDataset) -> Option<(i64, i64)> {
    if !dataset.has_column(SEASON) {
        return None;
    }
    let mut min: Option<i64> = None;
    let mut max: Option<i64> = None;
    for rec in &dataset.records {
        match rec.get(SEASON) {
            Some(CellValue::Null) | None => continue,
            Some(v) => {
                let season = v.as_f64()? as i64;
                min = Some(min.map_or(season, |m| m.min(season)));
                max = Some(max.map_or(season, |m| m.max(season)));
            }
        }
    }
    Some((min?, max?))
}

// ---------------------------------------------------------------------------
// Filter application
// ---------------------------------------------------------------------------

/// Return indices of records that pass all active filters. The dataset is
/// never mutated; the index vector is the reduced view.
pub fn apply_filters(dataset: &StatDataset, spec: &FilterSpec) -> Vec<usize> {
    // Resolved once: the season range only applies while the column is numeric.
    let season_active = spec.season_range.is_some() && season_bounds(dataset).is_some();

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            if !matches_name_search(rec, &spec.name_search) {
                return false;
            }
            for (column, selected) in spec.set_filters() {
                // Filtering on a column the dataset lacks is a no-op.
                if !dataset.has_column(column) {
                    continue;
                }
                if !matches_set_filter(rec, column, selected) {
                    return false;
                }
            }
            if season_active {
                let (lo, hi) = spec.season_range.unwrap_or_default();
                if !matches_season_range(rec, lo, hi) {
                    return false;
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}

/// Records lacking `full_name` never match a non-empty search.
fn matches_name_search(rec: &StatRecord, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    match &rec.full_name {
        Some(name) => name.to_lowercase().contains(&search.to_lowercase()),
        None => false,
    }
}

/// Empty selection = pass-through; otherwise the record's value must be a
/// member. Null or absent cells fail a non-empty selection.
fn matches_set_filter(rec: &StatRecord, column: &str, selected: &BTreeSet<CellValue>) -> bool {
    if selected.is_empty() {
        return true;
    }
    match rec.get(column) {
        Some(v) if !v.is_null() => selected.contains(v),
        _ => false,
    }
}

fn matches_season_range(rec: &StatRecord, lo: i64, hi: i64) -> bool {
    match rec.get(SEASON).and_then(|v| v.as_f64()) {
        Some(season) => season >= lo as f64 && season <= hi as f64,
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
