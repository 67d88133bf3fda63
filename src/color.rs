use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::analysis::Severity;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting at blue.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (217.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            hsl_to_color32(hue, 0.75, 0.55)
        })
        .collect()
}

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Series colours: metric name → Color32
// ---------------------------------------------------------------------------

/// Assigns each numeric column a stable colour so the trend chart, the
/// cards and the table agree.
#[derive(Debug, Clone, Default)]
pub struct SeriesColors {
    mapping: BTreeMap<String, Color32>,
}

impl SeriesColors {
    pub fn new(metrics: &[String]) -> Self {
        let palette = generate_palette(metrics.len());
        let mut mapping = BTreeMap::new();
        for (metric, color) in metrics.iter().zip(palette) {
            // First occurrence keeps its colour for duplicated names.
            mapping.entry(metric.clone()).or_insert(color);
        }
        SeriesColors { mapping }
    }

    pub fn color_for(&self, metric: &str) -> Color32 {
        self.mapping.get(metric).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Fixed colours
// ---------------------------------------------------------------------------

/// Bar colours of the percentile chart: Avg, P95, P99, Max.
pub const PERCENTILE_BARS: [Color32; 4] = [
    Color32::from_rgb(0x3b, 0x82, 0xf6),
    Color32::from_rgb(0xf5, 0x9e, 0x0b),
    Color32::from_rgb(0xec, 0x48, 0x99),
    Color32::from_rgb(0xef, 0x44, 0x44),
];

pub fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Low => Color32::from_rgb(0x34, 0xd3, 0x99),
        Severity::Medium => Color32::from_rgb(0xfb, 0xbf, 0x24),
        Severity::High => Color32::from_rgb(0xfb, 0x92, 0x3c),
        Severity::Critical => Color32::from_rgb(0xf8, 0x71, 0x71),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_series_colors_lookup() {
        let metrics = vec!["cpu".to_string(), "mem".to_string(), "cpu".to_string()];
        let colors = SeriesColors::new(&metrics);
        let palette = generate_palette(3);
        assert_eq!(colors.color_for("cpu"), palette[0]);
        assert_eq!(colors.color_for("mem"), palette[1]);
        assert_eq!(colors.color_for("disk"), Color32::GRAY);
    }
}
