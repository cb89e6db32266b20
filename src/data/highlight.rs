use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::CellValue;

// ---------------------------------------------------------------------------
// HighlightSpec – one optional per-row comparison rule
// ---------------------------------------------------------------------------

/// Row counts above this are flagged as an advisory when highlighting is
/// active. Purely a performance hint, never a behavioural change.
pub const LARGE_DATASET_THRESHOLD: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Equals,
    GreaterThan,
    LessThan,
}

impl Comparator {
    pub const ALL: [Comparator; 3] =
        [Comparator::Equals, Comparator::GreaterThan, Comparator::LessThan];

    pub fn label(self) -> &'static str {
        match self {
            Comparator::Equals => "Equals",
            Comparator::GreaterThan => "Greater Than",
            Comparator::LessThan => "Less Than",
        }
    }
}

/// The active highlight rule: one column, one comparator, one value typed by
/// the user. Plain data, rebuilt per interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightSpec {
    pub column: String,
    pub comparator: Comparator,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Evaluation – a pure, total predicate
// ---------------------------------------------------------------------------

/// Whether one row satisfies the highlight rule.
///
/// * An absent target column is false, not an error.
/// * `Equals` compares the cell's text form against the typed value exactly;
///   there is no numeric coercion, so "15" does not equal "15.0".
/// * `GreaterThan` / `LessThan` coerce both sides to numbers; any coercion
///   failure makes the row false rather than propagating an error.
pub fn evaluate(values: &BTreeMap<String, CellValue>, spec: &HighlightSpec) -> bool {
    let Some(cell) = values.get(&spec.column) else {
        return false;
    };
    match spec.comparator {
        Comparator::Equals => cell.to_string() == spec.value,
        Comparator::GreaterThan => match (cell.coerced_f64(), spec.value.trim().parse::<f64>()) {
            (Some(lhs), Ok(rhs)) => lhs > rhs,
            _ => false,
        },
        Comparator::LessThan => match (cell.coerced_f64(), spec.value.trim().parse::<f64>()) {
            (Some(lhs), Ok(rhs)) => lhs < rhs,
            _ => false,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, CellValue)]) -> BTreeMap<String, CellValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn spec(column: &str, comparator: Comparator, value: &str) -> HighlightSpec {
        HighlightSpec {
            column: column.into(),
            comparator,
            value: value.into(),
        }
    }

    #[test]
    fn equals_is_exact_text_match() {
        let r = row(&[("PTS", CellValue::String("15".into()))]);
        assert!(evaluate(&r, &spec("PTS", Comparator::Equals, "15")));
        assert!(!evaluate(&r, &spec("PTS", Comparator::Equals, "15.0")));
    }

    #[test]
    fn equals_uses_text_form_of_numbers() {
        let r = row(&[("PTS", CellValue::Integer(15))]);
        assert!(evaluate(&r, &spec("PTS", Comparator::Equals, "15")));
        assert!(!evaluate(&r, &spec("PTS", Comparator::Equals, "fifteen")));
    }

    #[test]
    fn numeric_comparators_are_strict() {
        let r = row(&[("PTS", CellValue::Float(12.5))]);
        assert!(evaluate(&r, &spec("PTS", Comparator::GreaterThan, "12")));
        assert!(!evaluate(&r, &spec("PTS", Comparator::GreaterThan, "12.5")));
        assert!(evaluate(&r, &spec("PTS", Comparator::LessThan, "13")));
    }

    #[test]
    fn numeric_comparators_coerce_numeric_strings() {
        let r = row(&[("PTS", CellValue::String("18".into()))]);
        assert!(evaluate(&r, &spec("PTS", Comparator::GreaterThan, "10")));
    }

    #[test]
    fn coercion_failure_is_false_not_error() {
        let r = row(&[("PTS", CellValue::String("abc".into()))]);
        assert!(!evaluate(&r, &spec("PTS", Comparator::GreaterThan, "0")));
        assert!(!evaluate(&r, &spec("PTS", Comparator::LessThan, "1000")));

        // Unparseable user value likewise.
        let r = row(&[("PTS", CellValue::Integer(10))]);
        assert!(!evaluate(&r, &spec("PTS", Comparator::GreaterThan, "ten")));
    }

    #[test]
    fn absent_column_fails_soft() {
        let r = row(&[("PTS", CellValue::Integer(10))]);
        assert!(!evaluate(&r, &spec("REB", Comparator::Equals, "10")));
        assert!(!evaluate(&r, &spec("REB", Comparator::GreaterThan, "0")));
    }

    #[test]
    fn null_cells_never_match_numeric_comparators() {
        let r = row(&[("PTS", CellValue::Null)]);
        assert!(!evaluate(&r, &spec("PTS", Comparator::GreaterThan, "-1")));
        // Null renders as the empty string, so only an empty Equals value matches.
        assert!(evaluate(&r, &spec("PTS", Comparator::Equals, "")));
        assert!(!evaluate(&r, &spec("PTS", Comparator::Equals, "0")));
    }
}
