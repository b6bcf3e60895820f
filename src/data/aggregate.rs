use std::collections::HashMap;

use super::model::{Station, StationTraffic, Trip};

// ---------------------------------------------------------------------------
// Station/trip join: per-station arrival and departure counts
// ---------------------------------------------------------------------------

/// Count trips per station in both directions and join onto the station
/// list. Stations that no trip references get zero counts; trip endpoints
/// that match no station are silently dropped.
///
/// Returns a fresh collection every call and never mutates its inputs, so
/// repeated aggregation over the same data is idempotent.
pub fn aggregate_traffic<'a, T>(stations: &[Station], trips: T) -> Vec<StationTraffic>
where
    T: IntoIterator<Item = &'a Trip>,
{
    let mut departures: HashMap<&str, u32> = HashMap::new();
    let mut arrivals: HashMap<&str, u32> = HashMap::new();

    for trip in trips {
        *departures.entry(trip.start_station_id.as_str()).or_insert(0) += 1;
        *arrivals.entry(trip.end_station_id.as_str()).or_insert(0) += 1;
    }

    stations
        .iter()
        .map(|station| {
            let id = station.short_name.as_str();
            let departures = departures.get(id).copied().unwrap_or(0);
            let arrivals = arrivals.get(id).copied().unwrap_or(0);
            StationTraffic {
                short_name: station.short_name.clone(),
                lon: station.lon,
                lat: station.lat,
                arrivals,
                departures,
                total_traffic: arrivals + departures,
            }
        })
        .collect()
}

/// Largest total traffic over the aggregated stations; 0 when empty.
/// The radius scale uses this as its domain maximum.
pub fn max_total_traffic(traffic: &[StationTraffic]) -> u32 {
    traffic.iter().map(|t| t.total_traffic).max().unwrap_or(0)
}
