use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::ColorMap;
use crate::data::aggregate::{CategoryCount, Histogram};

// ---------------------------------------------------------------------------
// Category bar charts (cuisines, locations)
// ---------------------------------------------------------------------------

/// Vertical bar chart, one bar per category, labels on the x axis.
pub fn category_chart(ui: &mut Ui, id: &str, counts: &[CategoryCount], x_label: &str, height: f32) {
    if counts.is_empty() {
        ui.weak("Nothing to plot for the current filters.");
        return;
    }

    let colors = ColorMap::new(counts.iter().map(|c| c.label.as_str()));
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Bar::new(i as f64, c.count as f64)
                .name(&c.label)
                .fill(colors.color_for(&c.label))
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = counts.iter().map(|c| c.label.clone()).collect();

    Plot::new(id)
        .height(height)
        .x_axis_label(x_label)
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| {
            let v = mark.value;
            if v < 0.0 || v.fract() != 0.0 {
                return String::new();
            }
            labels.get(v as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Rating histogram
// ---------------------------------------------------------------------------

pub fn rating_histogram(ui: &mut Ui, histogram: &Histogram, height: f32) {
    if histogram.is_empty() {
        ui.weak("No rated restaurants match the current filters.");
        return;
    }

    let width = histogram.bin_width();
    let bars: Vec<Bar> = histogram
        .counts
        .iter()
        .zip(histogram.edges.windows(2))
        .map(|(&count, edge)| {
            Bar::new((edge[0] + edge[1]) / 2.0, count as f64)
                .name(format!("{:.2} – {:.2}", edge[0], edge[1]))
                .fill(Color32::from_rgb(90, 140, 200))
                .width(width)
        })
        .collect();

    Plot::new("rating_histogram")
        .height(height)
        .x_axis_label("Ratings")
        .y_axis_label("Frequency")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}
