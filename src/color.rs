use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use bike_dash::data::model::WeatherSituation;

pub const CASUAL: Color32 = Color32::from_rgb(31, 119, 180);
pub const REGISTERED: Color32 = Color32::from_rgb(214, 39, 40);

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32(Hsl::new((i as f32 / n as f32) * 360.0, 0.75, 0.55)))
        .collect()
}

/// Sequential blue scale; `t` in `[0, 1]`, darker for larger values.
pub fn blues(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
    hsl_to_color32(Hsl::new(210.0, 0.7, 0.85 - 0.55 * t))
}

// ---------------------------------------------------------------------------
// Weather situation → Color32
// ---------------------------------------------------------------------------

/// Distinct colour per weather situation for the temperature scatter.
#[derive(Debug, Clone)]
pub struct WeatherColors {
    mapping: BTreeMap<WeatherSituation, Color32>,
    default_color: Color32,
}

impl WeatherColors {
    pub fn new(situations: &BTreeSet<WeatherSituation>) -> Self {
        let palette = generate_palette(situations.len());
        WeatherColors {
            mapping: situations.iter().copied().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, weather: WeatherSituation) -> Color32 {
        self.mapping
            .get(&weather)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(w, c)| (w.to_string(), *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn blues_darken_with_value() {
        let light = blues(0.0);
        let dark = blues(1.0);
        let sum = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(sum(dark) < sum(light));
        assert_eq!(blues(f64::NAN), blues(0.0));
    }

    #[test]
    fn unknown_weather_falls_back_to_gray() {
        let set: BTreeSet<_> = [WeatherSituation(1), WeatherSituation(2)].into();
        let colors = WeatherColors::new(&set);
        assert_ne!(colors.color_for(WeatherSituation(1)), Color32::GRAY);
        assert_eq!(colors.color_for(WeatherSituation(9)), Color32::GRAY);
        assert_eq!(colors.legend_entries().len(), 2);
    }
}
