use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::columns::{
    column_legend, ScaleMode, CLUB, COMPETITION, EQUIVALENT_COMPETITION, GENDER, LEVEL,
};
use crate::data::highlight::Comparator;
use crate::data::view::export_csv;
use crate::state::AppState;

/// Sidebar order of the set-membership filters.
const FILTER_COLUMNS: [&str; 5] = [CLUB, GENDER, LEVEL, EQUIVALENT_COMPETITION, COMPETITION];

// ---------------------------------------------------------------------------
// Left side panel – scale, filters, highlighting
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Stats View");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let column_names = dataset.column_names.clone();
    let unique = dataset.unique_values.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Scale selector ----
            ui.strong("Select Stats View");
            egui::ComboBox::from_id_salt("scale_mode")
                .selected_text(state.scale.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for mode in ScaleMode::ALL {
                        if ui
                            .selectable_label(state.scale == mode, mode.label())
                            .clicked()
                        {
                            state.scale = mode;
                        }
                    }
                });

            // ---- Averages vs season-by-season ----
            ui.horizontal(|ui: &mut Ui| {
                if ui
                    .selectable_label(state.show_averages, "Averages")
                    .clicked()
                {
                    state.show_averages = true;
                }
                if ui
                    .selectable_label(!state.show_averages, "Season-by-Season")
                    .clicked()
                {
                    state.show_averages = false;
                }
            });
            ui.separator();

            // ---- Filters ----
            ui.strong("Filter Options");

            ui.label("Search Player Name");
            if ui
                .text_edit_singleline(&mut state.filters.name_search)
                .changed()
            {
                state.refilter();
            }

            // Per-column filter widgets (collapsible), only for columns the
            // dataset actually has.
            for col in FILTER_COLUMNS {
                let Some(all_values) = unique.get(col) else {
                    continue;
                };

                let n_selected = state.filters.selection(col).map_or(0, |s| s.len());
                let n_total = all_values.len();
                let header_text = if n_selected == 0 {
                    format!("{col}  (all)")
                } else {
                    format!("{col}  ({n_selected}/{n_total})")
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        // Select all / none buttons
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(col);
                            }
                        });

                        for val in all_values {
                            let is_selected =
                                state.filters.selection(col).is_some_and(|s| s.contains(val));
                            let mut checked = is_selected;
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                state.toggle_filter_value(col, val);
                            }
                        }
                    });
            }

            // ---- Season range (only while the Season column is numeric) ----
            if let Some((min_season, max_season)) = state.season_limits {
                ui.strong("Select Season Range");
                let (mut lo, mut hi) = state
                    .filters
                    .season_range
                    .unwrap_or((min_season, max_season));
                let mut changed = false;
                ui.horizontal(|ui: &mut Ui| {
                    changed |= ui
                        .add(egui::DragValue::new(&mut lo).range(min_season..=max_season))
                        .changed();
                    ui.label("to");
                    changed |= ui
                        .add(egui::DragValue::new(&mut hi).range(min_season..=max_season))
                        .changed();
                });
                if changed {
                    if lo > hi {
                        std::mem::swap(&mut lo, &mut hi);
                    }
                    state.filters.season_range = Some((lo, hi));
                    state.refilter();
                }
            }
            ui.separator();

            // ---- Highlighting ----
            ui.strong("Highlight Options");
            ui.checkbox(&mut state.highlight_enabled, "Highlight specific rows");

            if state.highlight_enabled {
                ui.label("Highlight by Column");
                egui::ComboBox::from_id_salt("highlight_column")
                    .selected_text(&state.highlight_column)
                    .show_ui(ui, |ui: &mut Ui| {
                        for col in &column_names {
                            if ui
                                .selectable_label(state.highlight_column == *col, col)
                                .clicked()
                            {
                                state.highlight_column = col.clone();
                            }
                        }
                    });

                for comparator in Comparator::ALL {
                    if ui
                        .radio(state.highlight_comparator == comparator, comparator.label())
                        .clicked()
                    {
                        state.highlight_comparator = comparator;
                    }
                }

                ui.label("Value to Match");
                ui.text_edit_singleline(&mut state.highlight_value);
            }
            ui.separator();

            // ---- Column legend ----
            let legend_text = if state.show_legend {
                "Hide Column Legend"
            } else {
                "Show Column Legend"
            };
            if ui.button(legend_text).clicked() {
                state.show_legend = !state.show_legend;
            }
            if state.show_legend {
                for (col, meaning) in column_legend() {
                    ui.horizontal_wrapped(|ui: &mut Ui| {
                        ui.strong(*col);
                        ui.label(*meaning);
                    });
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_current_view(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} stat lines loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open stats table")
        .add_filter("Supported files", &["xlsx", "xlsm", "csv", "json", "parquet", "pq"])
        .add_filter("Excel", &["xlsx", "xlsm"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} stat lines with columns {:?}",
                    dataset.len(),
                    dataset.column_names
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
                state.loading = false;
            }
        }
    }
}

fn export_current_view(state: &mut AppState) {
    let Some(result) = state.table_view() else {
        return;
    };
    let view = match result {
        Ok(view) => view,
        Err(e) => {
            state.status_message = Some(format!("Error: {e}"));
            return;
        }
    };

    let Some(path) = rfd::FileDialog::new()
        .set_title("Export table as CSV")
        .add_filter("CSV", &["csv"])
        .set_file_name("stats_export.csv")
        .save_file()
    else {
        return;
    };

    let written = std::fs::File::create(&path)
        .map_err(csv::Error::from)
        .and_then(|file| export_csv(&view, file));
    match written {
        Ok(()) => {
            log::info!("Exported {} rows to {}", view.rows.len(), path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Failed to export CSV: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
