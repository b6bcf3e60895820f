use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::TimeFilter;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top bar: title, dataset summary, legend, status message.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.heading("Bike-share traffic");
        ui.separator();

        if let Some(data) = &state.data {
            ui.label(format!(
                "{} stations, {} trips ({} in window)",
                data.stations.len(),
                data.trips.len(),
                state.traffic.trip_count
            ));
        } else if state.loading {
            ui.spinner();
            ui.label("Loading station and trip data…");
        }

        ui.separator();
        for (label, color) in state.flow_scale.legend_entries() {
            ui.label(RichText::new(format!("● {label}")).color(color));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Time slider (bottom panel)
// ---------------------------------------------------------------------------

/// Render the time-of-day slider. -1 is the "any time" sentinel; everything
/// else is a minute of the day. Every change recomputes the aggregates.
pub fn time_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Filter by time:");

        let mut value = state.time_filter.to_slider();
        let slider = egui::Slider::new(&mut value, -1..=1439).show_value(false);
        if ui.add(slider).changed() {
            state.set_time_filter(TimeFilter::from_slider(value));
        }

        match state.time_filter {
            TimeFilter::AnyTime => {
                ui.weak("(any time)");
            }
            TimeFilter::Minute(m) => {
                ui.strong(format_time(m));
            }
        }
    });
}

/// Format a minute-of-day as `h:mm AM/PM`.
fn format_time(minutes: u16) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    let meridiem = if hours < 12 { "AM" } else { "PM" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hours}:{mins:02} {meridiem}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_twelve_hour_time() {
        assert_eq!(format_time(0), "12:00 AM");
        assert_eq!(format_time(1), "12:01 AM");
        assert_eq!(format_time(480), "8:00 AM");
        assert_eq!(format_time(719), "11:59 AM");
        assert_eq!(format_time(720), "12:00 PM");
        assert_eq!(format_time(1050), "5:30 PM");
        assert_eq!(format_time(1439), "11:59 PM");
    }
}
