use eframe::egui::Color32;
use palette::{IntoColor, Mix, Oklch, Srgb};

use crate::scale::quantize;

// ---------------------------------------------------------------------------
// Flow colors: departure ratio → bucketed color
// ---------------------------------------------------------------------------

/// Steelblue, the "mostly arrivals" end of the flow palette.
const ARRIVAL_RGB: (u8, u8, u8) = (70, 130, 180);
/// Darkorange, the "mostly departures" end.
const DEPARTURE_RGB: (u8, u8, u8) = (255, 140, 0);

/// Quantizing color scale over the departure ratio in [0, 1]: three buckets
/// (arrival-heavy, balanced, departure-heavy) mixed between steelblue and
/// darkorange in Oklch, the same blend the original page produced with CSS
/// `color-mix(in oklch, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowScale {
    buckets: Vec<Color32>,
}

impl Default for FlowScale {
    fn default() -> Self {
        FlowScale::new(3)
    }
}

impl FlowScale {
    /// Build a scale with `buckets` evenly spaced blends; the endpoints are
    /// pure steelblue and pure darkorange.
    pub fn new(buckets: usize) -> Self {
        let steps = buckets.max(2);
        let buckets = (0..steps)
            .map(|i| {
                let factor = i as f32 / (steps - 1) as f32;
                mix_flow_colors(factor)
            })
            .collect();
        FlowScale { buckets }
    }

    /// Color for a departure ratio in [0, 1].
    pub fn color_for(&self, departure_ratio: f64) -> Color32 {
        self.buckets[quantize(departure_ratio, self.buckets.len())]
    }

    /// Legend entries (bucket label → color), arrival-heavy first.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        let n = self.buckets.len();
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let label = match i {
                    0 => "More arrivals".to_string(),
                    i if i == n - 1 => "More departures".to_string(),
                    _ => "Balanced".to_string(),
                };
                (label, *c)
            })
            .collect()
    }
}

/// Blend the two flow endpoints in Oklch. `factor` 0 is pure steelblue,
/// 1 is pure darkorange.
fn mix_flow_colors(factor: f32) -> Color32 {
    let a: Oklch = srgb(ARRIVAL_RGB).into_color();
    let b: Oklch = srgb(DEPARTURE_RGB).into_color();
    let mixed: Srgb = a.mix(b, factor).into_color();
    Color32::from_rgb(
        (mixed.red * 255.0).round() as u8,
        (mixed.green * 255.0).round() as u8,
        (mixed.blue * 255.0).round() as u8,
    )
}

fn srgb((r, g, b): (u8, u8, u8)) -> Srgb {
    Srgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    )
}

/// Translucent green for the bike-lane overlay polylines.
pub fn lane_color() -> Color32 {
    // #32D800 at 40% opacity.
    Color32::from_rgba_unmultiplied(0x32, 0xD8, 0x00, 102)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_the_pure_palette_colors() {
        let scale = FlowScale::default();
        let (ar, ag, ab) = ARRIVAL_RGB;
        let (dr, dg, db) = DEPARTURE_RGB;
        assert_eq!(scale.color_for(0.0), Color32::from_rgb(ar, ag, ab));
        assert_eq!(scale.color_for(1.0), Color32::from_rgb(dr, dg, db));
    }

    #[test]
    fn three_buckets_share_a_middle_blend() {
        let scale = FlowScale::default();
        let balanced = scale.color_for(0.5);
        assert_eq!(scale.color_for(0.4), balanced);
        assert_eq!(scale.color_for(0.6), balanced);
        assert_ne!(scale.color_for(0.0), balanced);
        assert_ne!(scale.color_for(1.0), balanced);
    }

    #[test]
    fn legend_has_one_entry_per_bucket() {
        let scale = FlowScale::default();
        let legend = scale.legend_entries();
        assert_eq!(legend.len(), 3);
        assert_eq!(legend[0].0, "More arrivals");
        assert_eq!(legend[1].0, "Balanced");
        assert_eq!(legend[2].0, "More departures");
    }
}
