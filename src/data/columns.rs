use serde::{Deserialize, Serialize};

use super::model::StatDataset;

// ---------------------------------------------------------------------------
// Canonical column names
// ---------------------------------------------------------------------------

pub const FIRST_NAME: &str = "First Name";
pub const FAMILY_NAME: &str = "Family Name";
pub const FULL_NAME: &str = "full_name";
pub const GENDER: &str = "Gender";
pub const CLUB: &str = "Club Name";
pub const COMPETITION: &str = "Competition Name";
pub const EQUIVALENT_COMPETITION: &str = "Equivalent Competition";
pub const LEVEL: &str = "Level";
pub const SEASON: &str = "Season";

/// Identity/context columns shown alongside the stats. Averaged views take
/// these from the first record of each player group.
pub const INFO_COLUMNS: [&str; 9] = [
    FIRST_NAME,
    FAMILY_NAME,
    CLUB,
    COMPETITION,
    EQUIVALENT_COMPETITION,
    LEVEL,
    GENDER,
    SEASON,
    "GP",
];

/// Statistic column suffixes; the concrete column name is the active scale
/// prefix + suffix.
pub const STAT_SUFFIXES: [&str; 20] = [
    "MIN", "PTS", "DR", "OR", "REB", "AST", "STL", "BLK", "BLKON", "FOUL", "FOULON", "TO", "FGM",
    "FGA", "2PM", "2PA", "3PM", "3PA", "FTM", "FTA",
];

// ---------------------------------------------------------------------------
// ScaleMode – which column-prefix family to read
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleMode {
    Raw,
    PerMinute,
    Per40,
}

impl ScaleMode {
    pub const ALL: [ScaleMode; 3] = [ScaleMode::Raw, ScaleMode::PerMinute, ScaleMode::Per40];

    /// Column-name prefix for this scale family.
    pub fn prefix(self) -> &'static str {
        match self {
            ScaleMode::Raw => "",
            ScaleMode::PerMinute => "scaled",
            ScaleMode::Per40 => "adjusted",
        }
    }

    /// Human-readable label for the scale selector.
    pub fn label(self) -> &'static str {
        match self {
            ScaleMode::Raw => "Raw",
            ScaleMode::PerMinute => "Scaled (Per Minute)",
            ScaleMode::Per40 => "Scaled (to 40 Minutes)",
        }
    }

    /// Concrete column name for a stat suffix under this scale.
    pub fn column_name(self, suffix: &str) -> String {
        format!("{}{}", self.prefix(), suffix)
    }
}

// ---------------------------------------------------------------------------
// Column selection: which stat columns exist under the active scale
// ---------------------------------------------------------------------------

/// Stat columns resolved against a dataset. `missing` is reported to the
/// caller as an advisory and excluded from all downstream computation.
#[derive(Debug, Clone, Default)]
pub struct ColumnSelection {
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

/// Resolve the canonical stat suffixes under `mode` and split them by
/// presence in the dataset. Never errors: absence is data, not failure.
pub fn select_stat_columns(dataset: &StatDataset, mode: ScaleMode) -> ColumnSelection {
    let mut selection = ColumnSelection::default();
    for suffix in STAT_SUFFIXES {
        let name = mode.column_name(suffix);
        if dataset.has_column(&name) {
            selection.present.push(name);
        } else {
            selection.missing.push(name);
        }
    }
    selection
}

/// Info columns actually present in the dataset, in canonical order.
pub fn present_info_columns(dataset: &StatDataset) -> Vec<String> {
    INFO_COLUMNS
        .iter()
        .filter(|c| dataset.has_column(c))
        .map(|c| c.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Column legend
// ---------------------------------------------------------------------------

const COLUMN_MEANINGS: [(&str, &str); 28] = [
    ("FIBA ID Number", "International Basketball Federation Number"),
    (FIRST_NAME, "Player's first name"),
    (FAMILY_NAME, "Player's last name"),
    (GENDER, "Player's gender"),
    (CLUB, "Name of basketball club"),
    (COMPETITION, "Name of competition"),
    (SEASON, "Basketball season year"),
    ("GP", "Games played"),
    ("MIN", "Minutes played"),
    ("PTS", "Points scored"),
    ("DR", "Defensive rebounds"),
    ("OR", "Offensive rebounds"),
    ("REB", "Rebounds"),
    ("AST", "Assists"),
    ("STL", "Steals"),
    ("BLK", "Blocks"),
    ("BLKON", "Blocks received"),
    ("FOUL", "Fouls committed"),
    ("FOULON", "Fouls received"),
    ("TO", "Turnovers"),
    ("FGM", "Field goals made"),
    ("FGA", "Field goal attempted"),
    ("2PM", "Two-point goals made"),
    ("2PA", "Two-point goal attempted"),
    ("3PM", "Three-point goals made"),
    ("3PA", "Three-point goal attempted"),
    ("FTM", "Free throws made"),
    ("FTA", "Free throws attempted"),
];

/// Legend entries for the UI.
pub fn column_legend() -> &'static [(&'static str, &'static str)] {
    &COLUMN_MEANINGS
}

/// Meaning of a column, looking through the scale prefixes so that e.g.
/// "scaledPTS" resolves to the PTS definition.
pub fn column_meaning(name: &str) -> Option<&'static str> {
    let base = name
        .strip_prefix("scaled")
        .or_else(|| name.strip_prefix("adjusted"))
        .unwrap_or(name);
    COLUMN_MEANINGS
        .iter()
        .find(|(col, _)| *col == base)
        .map(|(_, meaning)| *meaning)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
