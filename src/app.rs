use eframe::egui::{self, Ui};

use crate::state::AppState;
use crate::ui::{charts, panels, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, tables, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a restaurant dataset  (File → Open…)");
                });
                return;
            }
            egui::ScrollArea::vertical()
                .id_salt("dashboard")
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    tables::metrics_row(ui, &state.insights.summary);
    ui.add_space(8.0);

    ui.heading("Top Rated Restaurants");
    tables::top_rated_table(ui, state);
    ui.add_space(8.0);

    ui.heading("Cuisine Distribution");
    charts::category_chart(ui, "cuisine_chart", &state.insights.cuisine_counts, "Cuisine", 260.0);
    ui.add_space(8.0);

    ui.heading("Rating Distribution");
    charts::rating_histogram(ui, &state.insights.rating_histogram, 220.0);
    ui.add_space(8.0);

    ui.heading("Restaurant Count by Location");
    charts::category_chart(ui, "location_chart", &state.insights.location_counts, "Location", 260.0);
    ui.add_space(8.0);

    ui.heading("Raw Dataset Preview");
    if let Some(ds) = &state.dataset {
        tables::raw_table(ui, ds, &state.visible_indices, 400.0);
    }
}
