use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::Summary;
use crate::data::model::{format_number, RestaurantDataset};
use crate::state::{AppState, TopColumn};

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

/// Display text of the four headline metrics; undefined values show `n/a`.
pub fn metric_cards(summary: &Summary) -> [(&'static str, String); 4] {
    let na = || "n/a".to_string();
    [
        ("Total Restaurants", summary.count.to_string()),
        (
            "Avg Rating",
            summary.mean_rating.map(|v| format!("{v:.2}")).unwrap_or_else(na),
        ),
        (
            "Avg Cost for Two",
            summary.mean_cost.map(|v| v.to_string()).unwrap_or_else(na),
        ),
        (
            "Online Delivery %",
            summary.online_pct.map(|v| format!("{v:.2}")).unwrap_or_else(na),
        ),
    ]
}

pub fn metrics_row(ui: &mut Ui, summary: &Summary) {
    let cards = metric_cards(summary);
    ui.columns(cards.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(label);
                ui.label(RichText::new(value).size(26.0).strong());
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Top-rated table
// ---------------------------------------------------------------------------

/// Sortable table of the best-rated restaurants. Header clicks re-sort.
pub fn top_rated_table(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };
    let rows = state.top_rows();
    if rows.is_empty() {
        ui.weak("No restaurants match the current filters.");
        return;
    }

    let mut clicked: Option<TopColumn> = None;
    let sort = state.top_sort;

    ui.push_id("top_rated_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::initial(200.0).at_least(80.0))
            .column(Column::initial(140.0).at_least(60.0))
            .column(Column::initial(260.0).at_least(80.0))
            .column(Column::initial(60.0))
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                for column in TopColumn::ALL {
                    header.col(|ui: &mut Ui| {
                        let arrow = match sort {
                            Some(s) if s.column == column && s.descending => " ⏷",
                            Some(s) if s.column == column => " ⏶",
                            _ => "",
                        };
                        let text = RichText::new(format!("{}{arrow}", column.label())).strong();
                        if ui.button(text).clicked() {
                            clicked = Some(column);
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let r = &dataset.records[rows[row.index()]];
                    row.col(|ui: &mut Ui| {
                        ui.label(&r.name);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(r.location.as_deref().unwrap_or(""));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(r.cuisines.as_deref().unwrap_or(""));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(r.aggregate_rating.map(|v| format!("{v:.1}")).unwrap_or_default());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(r.approx_cost.map(format_number).unwrap_or_default());
                    });
                });
            });
    });

    if let Some(column) = clicked {
        state.cycle_sort(column);
    }
}

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

/// Every column of every filtered row. Rows are virtualised.
pub fn raw_table(ui: &mut Ui, dataset: &RestaurantDataset, rows: &[usize], max_height: f32) {
    if rows.is_empty() {
        ui.weak("No restaurants match the current filters.");
        return;
    }

    let columns = &dataset.column_names;
    ui.push_id("raw_table", |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(max_height)
                .columns(Column::initial(140.0).at_least(40.0).clip(true), columns.len())
                .header(ROW_HEIGHT, |mut header| {
                    for name in columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let r = &dataset.records[rows[row.index()]];
                        for name in columns {
                            row.col(|ui: &mut Ui| {
                                ui.label(r.cell(name));
                            });
                        }
                    });
                });
        });
    });
}
