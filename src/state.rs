use crate::data::aggregate::AggregateError;
use crate::data::columns::ScaleMode;
use crate::data::filter::{apply_filters, season_bounds, FilterSpec};
use crate::data::highlight::{Comparator, HighlightSpec};
use crate::data::model::{CellValue, StatDataset};
use crate::data::view::{build_table, TableView};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. The dataset is read-only
/// once loaded; filters, scale, and the highlight rule are transient and the
/// displayed table is re-derived from scratch on every interaction.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<StatDataset>,

    /// Active filter selections.
    pub filters: FilterSpec,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Season slider limits, present only while the Season column is numeric.
    pub season_limits: Option<(i64, i64)>,

    /// Active scaling mode (raw / per-minute / per-40).
    pub scale: ScaleMode,

    /// Averaged per player vs season-by-season.
    pub show_averages: bool,

    /// Highlight rule under construction in the sidebar.
    pub highlight_enabled: bool,
    pub highlight_column: String,
    pub highlight_comparator: Comparator,
    pub highlight_value: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the column legend is expanded.
    pub show_legend: bool,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterSpec::default(),
            visible_indices: Vec::new(),
            season_limits: None,
            scale: ScaleMode::Raw,
            show_averages: true,
            highlight_enabled: false,
            highlight_column: String::new(),
            highlight_comparator: Comparator::Equals,
            highlight_value: String::new(),
            status_message: None,
            show_legend: false,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the transient specs.
    pub fn set_dataset(&mut self, dataset: StatDataset) {
        self.filters = FilterSpec::default();
        self.season_limits = season_bounds(&dataset);
        self.filters.season_range = self.season_limits;
        self.visible_indices = (0..dataset.len()).collect();

        // Default highlight target: first column (if any).
        self.highlight_column = dataset.column_names.first().cloned().unwrap_or_default();
        self.highlight_enabled = false;
        self.highlight_value.clear();

        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = apply_filters(ds, &self.filters);
        }
    }

    /// Toggle a single value in a column's selection set.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        if let Some(selected) = self.filters.selection_mut(column) {
            if selected.contains(value) {
                selected.remove(value);
            } else {
                selected.insert(value.clone());
            }
            self.refilter();
        }
    }

    /// Select every value in a column (equivalent to no restriction, but
    /// keeps the checkboxes visibly ticked).
    pub fn select_all(&mut self, column: &str) {
        let Some(ds) = &self.dataset else { return };
        let Some(all_vals) = ds.unique_values.get(column).cloned() else {
            return;
        };
        if let Some(selected) = self.filters.selection_mut(column) {
            *selected = all_vals;
            self.refilter();
        }
    }

    /// Clear a column's selection (no restriction).
    pub fn select_none(&mut self, column: &str) {
        if let Some(selected) = self.filters.selection_mut(column) {
            selected.clear();
            self.refilter();
        }
    }

    /// The highlight rule in effect, if enabled and targeting a column.
    pub fn active_highlight(&self) -> Option<HighlightSpec> {
        if !self.highlight_enabled || self.highlight_column.is_empty() {
            return None;
        }
        Some(HighlightSpec {
            column: self.highlight_column.clone(),
            comparator: self.highlight_comparator,
            value: self.highlight_value.clone(),
        })
    }

    /// Assemble the displayed table for the current interaction.
    pub fn table_view(&self) -> Option<Result<TableView, AggregateError>> {
        let ds = self.dataset.as_ref()?;
        let highlight = self.active_highlight();
        Some(build_table(
            ds,
            &self.visible_indices,
            self.scale,
            self.show_averages,
            highlight.as_ref(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
