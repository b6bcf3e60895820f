use eframe::egui::{self, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points};

use crate::color::lane_color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Map view (central panel)
// ---------------------------------------------------------------------------

/// Project WGS84 lon/lat into Web-Mercator plot coordinates. The absolute
/// scale is arbitrary; only proportions matter, and locking the plot's data
/// aspect to 1 keeps the geography undistorted.
fn project(lon: f64, lat: f64) -> [f64; 2] {
    let x = lon.to_radians();
    let y = (lat.to_radians() / 2.0 + std::f64::consts::FRAC_PI_4)
        .tan()
        .ln();
    [x, y]
}

/// Render the station-traffic map: bike-lane polylines underneath, one
/// circle per station sized by total traffic and colored by departure
/// ratio, with a hover tooltip naming the counts.
pub fn map_view(ui: &mut Ui, state: &AppState) {
    if state.data.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading {
                ui.spinner();
            } else {
                ui.heading("No data loaded");
            }
        });
        return;
    }

    let radius_scale = state.radius_scale();
    let lanes = state
        .data
        .as_ref()
        .map(|d| d.lanes.as_slice())
        .unwrap_or_default();

    // Station hovered this frame, if any; resolved inside the plot closure
    // where screen-space coordinates are available.
    let mut hovered: Option<usize> = None;

    let response = Plot::new("station_map")
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for lane in lanes {
                let points: PlotPoints = lane
                    .points
                    .iter()
                    .map(|&(lon, lat)| project(lon, lat))
                    .collect();
                plot_ui.line(Line::new(points).color(lane_color()).width(2.0));
            }

            // One Points element per station: radius and color vary per
            // circle, and egui_plot styles per element, not per point.
            for station in &state.traffic.stations {
                let radius = radius_scale.radius(station.total_traffic);
                let color = state.flow_scale.color_for(station.departure_ratio());
                let pos = project(station.lon, station.lat);
                plot_ui.points(
                    Points::new(PlotPoints::new(vec![pos]))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius)
                        .color(color),
                );
            }

            if let Some(pointer) = plot_ui.pointer_coordinate() {
                hovered = station_under_pointer(plot_ui, state, &radius_scale, pointer);
            }
        });

    if let Some(idx) = hovered {
        let station = &state.traffic.stations[idx];
        egui::show_tooltip_at_pointer(
            ui.ctx(),
            response.response.layer_id,
            egui::Id::new("station_tooltip"),
            |ui: &mut Ui| {
                ui.strong(&station.short_name);
                ui.label(station.tooltip());
            },
        );
    }
}

/// The station whose circle is under the pointer, preferring the smallest
/// hit so a small circle drawn over a big one stays hoverable.
fn station_under_pointer(
    plot_ui: &egui_plot::PlotUi,
    state: &AppState,
    radius_scale: &crate::scale::RadiusScale,
    pointer: PlotPoint,
) -> Option<usize> {
    let pointer_px = plot_ui.screen_from_plot(pointer);

    let mut best: Option<(usize, f32)> = None;
    for (idx, station) in state.traffic.stations.iter().enumerate() {
        let [x, y] = project(station.lon, station.lat);
        let center_px = plot_ui.screen_from_plot(PlotPoint::new(x, y));
        let radius = radius_scale.radius(station.total_traffic).max(2.0);
        if pointer_px.distance(center_px) <= radius {
            match best {
                Some((_, r)) if r <= radius => {}
                _ => best = Some((idx, radius)),
            }
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_preserves_ordering() {
        let boston = project(-71.09415, 42.36027);
        let cambridge = project(-71.1097, 42.3736);
        // Cambridge is west and north of the Boston center point.
        assert!(cambridge[0] < boston[0]);
        assert!(cambridge[1] > boston[1]);
    }

    #[test]
    fn projection_is_monotonic_in_latitude() {
        let equator = project(0.0, 0.0);
        let north = project(0.0, 45.0);
        let further_north = project(0.0, 60.0);
        assert!(equator[1].abs() < 1e-12);
        assert!(north[1] > equator[1]);
        assert!(further_north[1] > north[1]);
    }
}
