use crate::color::FlowScale;
use crate::data::filter::{refilter, FilteredTraffic, TimeFilter};
use crate::data::model::MapData;
use crate::scale::RadiusScale;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Loaded stations, trips, and lane overlay (None until the fetch
    /// finishes).
    pub data: Option<MapData>,

    /// The slider's current selection.
    pub time_filter: TimeFilter,

    /// Aggregates for the active filter (cached; rebuilt on every change).
    pub traffic: FilteredTraffic,

    /// Departure-ratio color scale. Fixed; does not depend on the data.
    pub flow_scale: FlowScale,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// Whether the background fetch is still in flight.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            data: None,
            time_filter: TimeFilter::AnyTime,
            traffic: FilteredTraffic::default(),
            flow_scale: FlowScale::default(),
            status_message: None,
            loading: true,
        }
    }
}

impl AppState {
    /// Ingest the loaded dataset and run the initial unfiltered aggregation.
    pub fn set_data(&mut self, data: MapData) {
        self.traffic = refilter(&data.stations, &data.trips, self.time_filter);
        self.data = Some(data);
        self.status_message = None;
        self.loading = false;
    }

    /// Record a failed load; the map stays empty.
    pub fn set_load_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.loading = false;
    }

    /// Change the selected time and recompute the aggregates. Every slider
    /// event lands here; recomputation always starts from the full trip set.
    pub fn set_time_filter(&mut self, filter: TimeFilter) {
        if self.time_filter == filter {
            return;
        }
        self.time_filter = filter;
        self.refilter();
    }

    /// Recompute `traffic` from the full trip set under the current filter.
    pub fn refilter(&mut self) {
        if let Some(data) = &self.data {
            self.traffic = refilter(&data.stations, &data.trips, self.time_filter);
        }
    }

    /// The radius scale matching the current filter state: its output range
    /// widens while a concrete minute is selected so sparse filtered data
    /// stays legible.
    pub fn radius_scale(&self) -> RadiusScale {
        match self.time_filter {
            TimeFilter::AnyTime => RadiusScale::unfiltered(self.traffic.max_total),
            TimeFilter::Minute(_) => RadiusScale::filtered(self.traffic.max_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Station, Trip};
    use chrono::NaiveDate;

    fn sample_data() -> MapData {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let trip = |s: &str, e: &str, sm: u32, em: u32| Trip {
            start_station_id: s.to_string(),
            end_station_id: e.to_string(),
            started_at: day.and_hms_opt(sm / 60, sm % 60, 0).unwrap(),
            ended_at: day.and_hms_opt(em / 60, em % 60, 0).unwrap(),
        };
        MapData {
            stations: vec![
                Station {
                    short_name: "A".into(),
                    lon: -71.09,
                    lat: 42.36,
                },
                Station {
                    short_name: "B".into(),
                    lon: -71.11,
                    lat: 42.37,
                },
            ],
            trips: vec![
                trip("A", "B", 470, 500),
                trip("B", "A", 900, 930),
                trip("A", "A", 490, 495),
            ],
            lanes: Vec::new(),
        }
    }

    #[test]
    fn set_data_runs_initial_aggregation() {
        let mut state = AppState::default();
        state.set_data(sample_data());
        assert!(!state.loading);
        assert_eq!(state.traffic.trip_count, 3);
        // A: 2 departures + 1 arrival.
        assert_eq!(state.traffic.stations[0].total_traffic, 3);
    }

    #[test]
    fn changing_the_filter_recomputes_from_the_full_set() {
        let mut state = AppState::default();
        state.set_data(sample_data());

        state.set_time_filter(TimeFilter::Minute(480));
        assert_eq!(state.traffic.trip_count, 2);

        // Back to the sentinel restores the unfiltered counts.
        state.set_time_filter(TimeFilter::AnyTime);
        assert_eq!(state.traffic.trip_count, 3);
        assert_eq!(state.traffic.stations[0].total_traffic, 3);
    }

    #[test]
    fn radius_scale_range_follows_filter_state() {
        let mut state = AppState::default();
        state.set_data(sample_data());

        let unfiltered = state.radius_scale();
        assert_eq!(unfiltered.radius(0), 0.0);

        state.set_time_filter(TimeFilter::Minute(480));
        let filtered = state.radius_scale();
        assert_eq!(filtered.radius(0), 3.0);
    }

    #[test]
    fn load_error_leaves_the_map_empty() {
        let mut state = AppState::default();
        state.set_load_error("fetch failed".to_string());
        assert!(!state.loading);
        assert!(state.data.is_none());
        assert!(state.traffic.stations.is_empty());
    }
}
