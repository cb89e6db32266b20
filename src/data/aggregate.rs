use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use super::columns::FULL_NAME;
use super::model::{CellValue, StatDataset, StatRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AggregateError {
    /// A player group produced no usable cell for any requested column.
    /// Unreachable for well-formed data: a non-empty group always carries
    /// its info columns.
    #[error("no usable values in any requested column for player '{0}'")]
    EmptyGroup(String),
}

// ---------------------------------------------------------------------------
// Per-player aggregation
// ---------------------------------------------------------------------------

/// Collapse the filtered view into one row per `full_name`.
///
/// * Stat columns hold the arithmetic mean over the group, ignoring cells
///   that are absent or non-numeric (they count in neither numerator nor
///   denominator). A stat column with no usable cell in a group yields
///   `Null`, never zero.
/// * Info columns hold the value from the group's first record.
/// * Output rows follow the order of each player's first appearance in the
///   filtered view. Records without a `full_name` form no group and are
///   dropped from the averaged view.
pub fn aggregate(
    dataset: &StatDataset,
    indices: &[usize],
    stat_columns: &[String],
    info_columns: &[String],
) -> Result<Vec<StatRecord>, AggregateError> {
    // Group row indices by full_name, preserving first-appearance order.
    let mut group_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();

    for &idx in indices {
        let Some(name) = &dataset.records[idx].full_name else {
            continue;
        };
        match groups.get_mut(name) {
            Some(rows) => rows.push(idx),
            None => {
                group_order.push(name.clone());
                groups.insert(name.clone(), vec![idx]);
            }
        }
    }

    let mut out = Vec::with_capacity(group_order.len());

    for name in group_order {
        let rows = &groups[&name];
        let mut values: BTreeMap<String, CellValue> = BTreeMap::new();
        let mut usable = 0usize;

        // full_name doubles as a displayable column in the averaged view.
        values.insert(FULL_NAME.to_string(), CellValue::String(name.clone()));

        for col in info_columns {
            let first = rows
                .first()
                .and_then(|&i| dataset.records[i].get(col))
                .cloned()
                .unwrap_or(CellValue::Null);
            if !first.is_null() {
                usable += 1;
            }
            values.insert(col.clone(), first);
        }

        for col in stat_columns {
            let mut sum = 0.0;
            let mut count = 0usize;
            for &i in rows {
                if let Some(v) = dataset.records[i].get(col).and_then(CellValue::as_f64) {
                    sum += v;
                    count += 1;
                }
            }
            let cell = if count > 0 {
                usable += 1;
                CellValue::Float(sum / count as f64)
            } else {
                CellValue::Null
            };
            values.insert(col.clone(), cell);
        }

        if usable == 0 && !(info_columns.is_empty() && stat_columns.is_empty()) {
            return Err(AggregateError::EmptyGroup(name));
        }

        out.push(StatRecord {
            values,
            full_name: Some(name),
        });
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
