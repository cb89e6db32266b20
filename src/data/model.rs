use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::columns::{FAMILY_NAME, FIRST_NAME};

// ---------------------------------------------------------------------------
// CellValue – a single cell in a stats table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// The text form of a cell: what Equals-highlighting compares against and
/// what CSV export writes. `Null` renders empty.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Interpret the cell as an `f64` if it already holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Numeric coercion for comparisons: numbers pass through, numeric
    /// strings are parsed, everything else is `None`.
    pub fn coerced_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// StatRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single stat line: one player's performance in one season/competition.
#[derive(Debug, Clone)]
pub struct StatRecord {
    /// Dynamic columns: column_name → value.
    pub values: BTreeMap<String, CellValue>,
    /// "First Name" + " " + "Family Name", the aggregation and search key.
    /// `None` when either constituent is absent; such records are excluded
    /// from name search and per-player aggregation.
    pub full_name: Option<String>,
}

impl StatRecord {
    /// Build a record and derive `full_name` once.
    pub fn new(values: BTreeMap<String, CellValue>) -> Self {
        let full_name = match (values.get(FIRST_NAME), values.get(FAMILY_NAME)) {
            (Some(first), Some(family)) if !first.is_null() && !family.is_null() => {
                Some(format!("{first} {family}"))
            }
            _ => None,
        };
        StatRecord { values, full_name }
    }

    /// Cell for a column, if present.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }
}

// ---------------------------------------------------------------------------
// StatDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices.
/// Immutable once loaded; filtering and aggregation produce views.
#[derive(Debug, Clone)]
pub struct StatDataset {
    /// All records (rows) in source order.
    pub records: Vec<StatRecord>,
    /// Column names in order of first appearance.
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique non-null values,
    /// used to populate the filter checkboxes.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl StatDataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<StatRecord>) -> Self {
        let mut column_names: Vec<String> = Vec::new();
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();

        for rec in &records {
            for (col, val) in &rec.values {
                if seen.insert(col.clone()) {
                    column_names.push(col.clone());
                }
                if !val.is_null() {
                    unique_values
                        .entry(col.clone())
                        .or_default()
                        .insert(val.clone());
                }
            }
        }

        StatDataset {
            records,
            column_names,
            unique_values,
        }
    }

    /// Explicit capability check before any column access.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> StatRecord {
        StatRecord::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn full_name_requires_both_constituents() {
        let complete = record(&[
            (FIRST_NAME, CellValue::String("Alice".into())),
            (FAMILY_NAME, CellValue::String("Ang".into())),
        ]);
        assert_eq!(complete.full_name.as_deref(), Some("Alice Ang"));

        let missing = record(&[(FIRST_NAME, CellValue::String("Alice".into()))]);
        assert_eq!(missing.full_name, None);

        let null_family = record(&[
            (FIRST_NAME, CellValue::String("Alice".into())),
            (FAMILY_NAME, CellValue::Null),
        ]);
        assert_eq!(null_family.full_name, None);
    }

    #[test]
    fn coerced_f64_parses_numeric_strings_only() {
        assert_eq!(CellValue::String("12.5".into()).coerced_f64(), Some(12.5));
        assert_eq!(CellValue::Integer(3).coerced_f64(), Some(3.0));
        assert_eq!(CellValue::String("abc".into()).coerced_f64(), None);
        assert_eq!(CellValue::Null.coerced_f64(), None);
    }

    #[test]
    fn dataset_indexes_columns_in_first_seen_order() {
        let ds = StatDataset::from_records(vec![
            record(&[("PTS", CellValue::Integer(10)), ("AST", CellValue::Integer(2))]),
            record(&[("REB", CellValue::Integer(5)), ("PTS", CellValue::Integer(8))]),
        ]);
        assert_eq!(ds.column_names, vec!["AST", "PTS", "REB"]);
        assert!(ds.has_column("PTS"));
        assert!(!ds.has_column("scaledPTS"));
        assert_eq!(ds.unique_values["PTS"].len(), 2);
    }

    #[test]
    fn null_never_offered_as_filter_value() {
        let ds = StatDataset::from_records(vec![record(&[("Club Name", CellValue::Null)])]);
        assert!(ds.unique_values.get("Club Name").is_none());
    }
}
