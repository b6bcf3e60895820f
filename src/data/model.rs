use chrono::{NaiveDateTime, Timelike};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Station – one bike-share dock
// ---------------------------------------------------------------------------

/// A fixed dock location from the station feed. Positions are WGS84.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Public station identifier; this is what trips reference.
    pub short_name: String,
    pub lon: f64,
    pub lat: f64,
}

// ---------------------------------------------------------------------------
// Trip – one rental event
// ---------------------------------------------------------------------------

/// A single rental, immutable once parsed from the trip CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    #[serde(with = "trip_time")]
    pub started_at: NaiveDateTime,
    #[serde(with = "trip_time")]
    pub ended_at: NaiveDateTime,
}

impl Trip {
    /// Minute-of-day of the trip start (hours × 60 + minutes, date ignored).
    pub fn start_minute(&self) -> u16 {
        minute_of_day(self.started_at)
    }

    /// Minute-of-day of the trip end.
    pub fn end_minute(&self) -> u16 {
        minute_of_day(self.ended_at)
    }
}

/// Hours × 60 + minutes on a linear 0..=1439 scale.
pub fn minute_of_day(t: NaiveDateTime) -> u16 {
    (t.hour() * 60 + t.minute()) as u16
}

/// The trip feed writes `2024-03-01 08:13:42.1230` – fractional seconds are
/// present on some rows and absent on others, so try both layouts.
mod trip_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// BikeLane – one polyline of the lane overlay
// ---------------------------------------------------------------------------

/// A bike-lane polyline from the GeoJSON overlays, render-only.
#[derive(Debug, Clone, PartialEq)]
pub struct BikeLane {
    /// `(lon, lat)` vertices.
    pub points: Vec<(f64, f64)>,
}

// ---------------------------------------------------------------------------
// StationTraffic – derived per-station counters
// ---------------------------------------------------------------------------

/// Per-station counts over the active trip set. Rebuilt from scratch on
/// every recomputation; `total_traffic` is always `arrivals + departures`.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTraffic {
    pub short_name: String,
    pub lon: f64,
    pub lat: f64,
    pub arrivals: u32,
    pub departures: u32,
    pub total_traffic: u32,
}

impl StationTraffic {
    /// Fraction of this station's traffic that departs from it, in [0, 1].
    /// A station with no traffic reads as balanced (0.5) so the flow color
    /// falls in the middle bucket instead of propagating 0/0.
    pub fn departure_ratio(&self) -> f64 {
        if self.total_traffic == 0 {
            0.5
        } else {
            f64::from(self.departures) / f64::from(self.total_traffic)
        }
    }

    /// Hover text shown on the map circle.
    pub fn tooltip(&self) -> String {
        format!(
            "{} trips ({} departures, {} arrivals)",
            self.total_traffic, self.departures, self.arrivals
        )
    }
}

// ---------------------------------------------------------------------------
// MapData – everything the viewer loads up front
// ---------------------------------------------------------------------------

/// The full loaded dataset: stations, trips, and the lane overlay.
#[derive(Debug, Clone, Default)]
pub struct MapData {
    pub stations: Vec<Station>,
    pub trips: Vec<Trip>,
    pub lanes: Vec<BikeLane>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn minute_of_day_ignores_date_and_seconds() {
        assert_eq!(minute_of_day(at(0, 0)), 0);
        assert_eq!(minute_of_day(at(8, 0)), 480);
        assert_eq!(minute_of_day(at(23, 59)), 1439);

        let with_seconds = NaiveDate::from_ymd_opt(2019, 12, 31)
            .unwrap()
            .and_hms_milli_opt(6, 40, 59, 123)
            .unwrap();
        assert_eq!(minute_of_day(with_seconds), 400);
    }

    #[test]
    fn departure_ratio_defaults_to_balanced_when_empty() {
        let st = StationTraffic {
            short_name: "A32000".into(),
            lon: -71.09,
            lat: 42.36,
            arrivals: 0,
            departures: 0,
            total_traffic: 0,
        };
        assert_eq!(st.departure_ratio(), 0.5);
    }

    #[test]
    fn tooltip_format_matches_map_labels() {
        let st = StationTraffic {
            short_name: "A32000".into(),
            lon: -71.09,
            lat: 42.36,
            arrivals: 1,
            departures: 2,
            total_traffic: 3,
        };
        assert_eq!(st.tooltip(), "3 trips (2 departures, 1 arrivals)");
    }
}
