use std::collections::HashMap;

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
            let hsl = Hsl::new(hue, 0.65, 0.6);
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
// Group colours: EAN → Color32
// ---------------------------------------------------------------------------

/// Assigns each product group a distinct colour so consecutive result rows
/// of the same EAN read as one block.
#[derive(Debug, Clone, Default)]
pub struct GroupColors {
    mapping: HashMap<String, Color32>,
}

impl GroupColors {
    /// Build from EANs in display order; duplicates share a colour.
    pub fn new<'a>(eans: impl IntoIterator<Item = &'a str>) -> Self {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for ean in eans {
            let next = seen.len();
            seen.entry(ean).or_insert(next);
        }
        let palette = generate_palette(seen.len());
        let mapping = seen
            .into_iter()
            .map(|(ean, idx)| (ean.to_string(), palette[idx]))
            .collect();
        Self { mapping }
    }

    pub fn color_for(&self, ean: &str) -> Color32 {
        self.mapping.get(ean).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(5).len(), 5);
    }

    #[test]
    fn same_ean_same_colour() {
        let colors = GroupColors::new(["1", "2", "1", "3"]);
        assert_eq!(colors.color_for("1"), colors.color_for("1"));
        assert_ne!(colors.color_for("1"), colors.color_for("2"));
        assert_eq!(colors.color_for("missing"), Color32::GRAY);
    }
}
