use super::aggregate::{aggregate_traffic, max_total_traffic};
use super::model::{Station, StationTraffic, Trip};

/// Trips count as "near" the selected minute when either endpoint falls
/// within this many minutes of it (inclusive).
pub const WINDOW_MINUTES: u16 = 60;

// ---------------------------------------------------------------------------
// Filter state: the slider's selected minute, or no filter at all
// ---------------------------------------------------------------------------

/// Which trips the map shows. The slider emits -1 for [`TimeFilter::AnyTime`]
/// and 0..=1439 for a concrete minute-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    AnyTime,
    Minute(u16),
}

impl TimeFilter {
    /// Map the raw slider value (-1 sentinel) to a filter.
    pub fn from_slider(value: i32) -> Self {
        if value < 0 {
            TimeFilter::AnyTime
        } else {
            TimeFilter::Minute(value.min(1439) as u16)
        }
    }

    pub fn to_slider(self) -> i32 {
        match self {
            TimeFilter::AnyTime => -1,
            TimeFilter::Minute(m) => i32::from(m),
        }
    }
}

/// Does `minute` fall within the window around the selected minute?
/// Distances are linear on 0..=1439; no wraparound across midnight.
fn within_window(minute: u16, selected: u16) -> bool {
    minute.abs_diff(selected) <= WINDOW_MINUTES
}

/// The trips visible under `filter`: all of them for [`TimeFilter::AnyTime`],
/// otherwise those starting or ending within ±60 minutes of the selection.
pub fn filter_trips(trips: &[Trip], filter: TimeFilter) -> Vec<&Trip> {
    match filter {
        TimeFilter::AnyTime => trips.iter().collect(),
        TimeFilter::Minute(m) => trips
            .iter()
            .filter(|trip| {
                within_window(trip.start_minute(), m) || within_window(trip.end_minute(), m)
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Filtered aggregation
// ---------------------------------------------------------------------------

/// Per-station aggregates over the filtered trip set, plus what the caller
/// needs to rebuild its presentation scales.
#[derive(Debug, Clone, Default)]
pub struct FilteredTraffic {
    pub stations: Vec<StationTraffic>,
    /// Number of trips that passed the filter.
    pub trip_count: usize,
    /// Busiest station's total in the filtered set; radius-scale domain max.
    pub max_total: u32,
}

/// Restrict the trip set per `filter`, then rerun the station/trip join over
/// the restricted set. Recomputes from the full trip list every call; there
/// is no caching across filter values.
pub fn refilter(stations: &[Station], trips: &[Trip], filter: TimeFilter) -> FilteredTraffic {
    let visible = filter_trips(trips, filter);
    let trip_count = visible.len();
    let aggregated = aggregate_traffic(stations, visible);
    let max_total = max_total_traffic(&aggregated);
    FilteredTraffic {
        stations: aggregated,
        trip_count,
        max_total,
    }
}
