use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: chart category → Color32
// ---------------------------------------------------------------------------

/// Maps category labels of a chart to distinct colours, in the order given.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_label_falls_back_to_gray() {
        let cm = ColorMap::new(["Chinese", "Thai"]);
        assert_ne!(cm.color_for("Chinese"), cm.color_for("Thai"));
        assert_eq!(cm.color_for("Korean"), Color32::GRAY);
    }
}
