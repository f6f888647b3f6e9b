use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Background for the largest value of a metric column.
pub const HIGHLIGHT: Color32 = Color32::from_rgb(0xd3, 0xf9, 0xd8);

/// Bar colour of the per-metric charts.
pub fn metric_color(index: usize) -> Color32 {
    const BASE: [Color32; 3] = [
        Color32::from_rgb(0x1d, 0xa1, 0xf2),
        Color32::from_rgb(0xe1, 0x30, 0x6c),
        Color32::from_rgb(0x25, 0xf4, 0xee),
    ];
    BASE[index % BASE.len()]
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.70, 0.50).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Network → colour
// ---------------------------------------------------------------------------

/// Assigns each social network a stable colour for the posts chart.
#[derive(Debug, Clone, Default)]
pub struct NetworkColors {
    mapping: BTreeMap<String, Color32>,
}

impl NetworkColors {
    pub fn new(networks: &BTreeSet<String>) -> Self {
        let mapping = networks
            .iter()
            .cloned()
            .zip(generate_palette(networks.len()))
            .collect();
        NetworkColors { mapping }
    }

    /// Posts without a network share the fallback grey.
    pub fn color_for(&self, network: Option<&str>) -> Color32 {
        network
            .and_then(|n| self.mapping.get(n))
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}
