use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::columns::column_meaning;
use crate::data::model::CellValue;
use crate::data::view::TableView;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – the stats table
// ---------------------------------------------------------------------------

const HIGHLIGHT_BG: Color32 = Color32::from_rgb(255, 165, 0);
const WARNING: Color32 = Color32::from_rgb(230, 160, 30);

/// Render the stats table in the central panel.
pub fn stats_table(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a stats table to view players  (File → Open…)");
        });
        return;
    }

    let view = match state.table_view() {
        Some(Ok(view)) => view,
        Some(Err(e)) => {
            ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
            return;
        }
        None => return,
    };

    let title = if state.show_averages {
        format!("Player Averaged Stats ({})", state.scale.label())
    } else {
        format!("Player Season Stats ({})", state.scale.label())
    };
    ui.heading(title);

    if !view.missing_columns.is_empty() {
        ui.label(
            RichText::new(format!(
                "Missing columns for this scale: {}",
                view.missing_columns.join(", ")
            ))
            .color(WARNING),
        );
    }
    if view.large_dataset {
        ui.label(
            RichText::new(
                "The displayed table is quite large; highlighting may be slow. \
                 Consider narrowing your filters.",
            )
            .color(WARNING),
        );
    }

    if view.no_stat_columns() {
        ui.label("No matching stat columns found to display.");
        return;
    }
    if view.is_empty() {
        ui.label("No records match the active filters.");
        return;
    }

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        render_table(ui, &view);
    });
}

fn render_table(ui: &mut Ui, view: &TableView) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(70.0), view.columns.len())
        .header(22.0, |mut header| {
            for col in &view.columns {
                header.col(|ui| {
                    let response = ui.strong(col);
                    if let Some(meaning) = column_meaning(col) {
                        response.on_hover_text(meaning);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(20.0, view.rows.len(), |mut row| {
                let idx = row.index();
                let record = &view.rows[idx];
                let highlighted = view.highlight[idx];
                for col in &view.columns {
                    row.col(|ui| {
                        let text = cell_text(record.get(col));
                        if highlighted {
                            ui.label(
                                RichText::new(text)
                                    .color(Color32::BLACK)
                                    .background_color(HIGHLIGHT_BG),
                            );
                        } else {
                            ui.label(text);
                        }
                    });
                }
            });
        });
}

/// Table cell text: floats rounded for display, everything else in its
/// canonical text form.
fn cell_text(cell: Option<&CellValue>) -> String {
    match cell {
        Some(CellValue::Float(v)) if v.fract().abs() > f64::EPSILON => format!("{v:.2}"),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}
