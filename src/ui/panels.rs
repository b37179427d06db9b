use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::format_number;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // ---- Cost ceiling ----
    ui.strong("Max approx cost for two");
    let mut max_cost = state.filters.max_cost;
    let slider = egui::Slider::new(&mut max_cost, 0.0..=state.config.cost_slider_max)
        .step_by(50.0)
        .integer();
    if ui.add(slider).changed() {
        state.set_max_cost(max_cost);
    }
    if let Some(top) = state.dataset.as_ref().and_then(|ds| ds.max_cost) {
        ui.weak(format!("Priciest listing: {}", format_number(top)));
    }
    ui.separator();

    // ---- Cuisine multi-select ----
    let n_selected = state.filters.cuisines.len();
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!("Cuisines ({n_selected} selected)"));
        if n_selected > 0 && ui.small_button("Clear").clicked() {
            state.clear_cuisines();
        }
    });

    // Selected tags first, so they stay reachable while searching.
    let selected: Vec<String> = state.filters.cuisines.iter().cloned().collect();
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for tag in &selected {
            let chip = RichText::new(format!("{tag} ✕")).color(Color32::WHITE);
            if ui
                .add(egui::Button::new(chip).fill(Color32::from_rgb(70, 110, 170)).small())
                .clicked()
            {
                state.toggle_cuisine(tag);
            }
        }
    });

    ui.add(
        egui::TextEdit::singleline(&mut state.cuisine_search)
            .hint_text("Search cuisines…")
            .desired_width(f32::INFINITY),
    );

    let options = state.cuisine_options();
    ScrollArea::vertical()
        .id_salt("cuisine_options")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for tag in &options {
                let mut checked = state.filters.cuisines.contains(tag);
                if ui.checkbox(&mut checked, tag.as_str()).changed() {
                    state.toggle_cuisine(tag);
                }
            }
            if options.is_empty() {
                ui.weak("No cuisine matches the search.");
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
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} restaurants loaded, {} match the filters",
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
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open restaurant data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
