use std::io::Read;

use anyhow::{Context, Result};
use geojson::{GeoJson, Value as Geometry};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{BikeLane, MapData, Station, Trip};

// ---------------------------------------------------------------------------
// Resource URLs (the only configuration this app has)
// ---------------------------------------------------------------------------

pub const STATIONS_URL: &str = "https://dsc106.com/labs/lab07/data/bluebikes-stations.json";
pub const TRIPS_URL: &str = "https://dsc106.com/labs/lab07/data/bluebikes-traffic-2024-03.csv";
pub const BOSTON_LANES_URL: &str =
    "https://bostonopendata-boston.opendata.arcgis.com/datasets/boston::existing-bike-network-2022.geojson";
pub const CAMBRIDGE_LANES_URL: &str =
    "https://raw.githubusercontent.com/cambridgegis/cambridgegis_data/main/Recreation/Bike_Facilities/RECREATION_BikeFacilities.geojson";

/// Data-shape failures from the parse functions.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("station feed has no data.stations array")]
    MissingStations,
    #[error("station record {0} is missing '{1}'")]
    BadStation(usize, &'static str),
    #[error("expected a GeoJSON FeatureCollection")]
    NotAFeatureCollection,
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Fetch everything the map needs. Stations come first and trips are only
/// requested once the station feed has resolved; a failure in either aborts
/// the load. The two lane overlays are fetched afterwards and degrade to an
/// empty overlay on failure, since the station circles are useful alone.
pub fn fetch_all() -> Result<MapData> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()
        .context("building HTTP client")?;

    let stations_json = get_text(&client, STATIONS_URL).context("fetching station feed")?;
    let stations = parse_stations(&stations_json).context("parsing station feed")?;
    log::info!("loaded {} stations", stations.len());

    let trips_csv = get_text(&client, TRIPS_URL).context("fetching trip feed")?;
    let trips = parse_trips(trips_csv.as_bytes()).context("parsing trip feed")?;
    log::info!("loaded {} trips", trips.len());

    let mut lanes = Vec::new();
    for url in [BOSTON_LANES_URL, CAMBRIDGE_LANES_URL] {
        match get_text(&client, url).and_then(|text| parse_lanes(&text)) {
            Ok(mut more) => lanes.append(&mut more),
            Err(e) => log::error!("lane overlay {url} unavailable: {e:#}"),
        }
    }
    log::info!("loaded {} bike-lane polylines", lanes.len());

    Ok(MapData {
        stations,
        trips,
        lanes,
    })
}

fn get_text(client: &reqwest::blocking::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().with_context(|| format!("GET {url}"))?;
    let response = response
        .error_for_status()
        .with_context(|| format!("GET {url}"))?;
    response.text().with_context(|| format!("reading body of {url}"))
}

// ---------------------------------------------------------------------------
// Station JSON
// ---------------------------------------------------------------------------

/// Parse the nested station feed: `{ "data": { "stations": [...] } }`.
///
/// The feed is stringly typed in places (`lon`/`lat` arrive as strings on
/// some mirrors), so coordinates accept either JSON numbers or numeric
/// strings.
pub fn parse_stations(text: &str) -> Result<Vec<Station>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing station JSON")?;
    let records = root
        .get("data")
        .and_then(|d| d.get("stations"))
        .and_then(|s| s.as_array())
        .ok_or(LoadError::MissingStations)?;

    let mut stations = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let short_name = rec
            .get("short_name")
            .and_then(|v| v.as_str())
            .ok_or(LoadError::BadStation(i, "short_name"))?;
        let lon = coord(rec.get("lon")).ok_or(LoadError::BadStation(i, "lon"))?;
        let lat = coord(rec.get("lat")).ok_or(LoadError::BadStation(i, "lat"))?;
        stations.push(Station {
            short_name: short_name.to_string(),
            lon,
            lat,
        });
    }
    Ok(stations)
}

fn coord(val: Option<&JsonValue>) -> Option<f64> {
    match val? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Trip CSV
// ---------------------------------------------------------------------------

/// Parse the trip CSV (`start_station_id`, `end_station_id`, `started_at`,
/// `ended_at`; extra columns ignored). Rows that fail to parse are skipped
/// with a warning rather than failing the whole feed.
pub fn parse_trips<R: Read>(reader: R) -> Result<Vec<Trip>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let mut trips = Vec::new();
    let mut skipped = 0usize;
    for (row, result) in csv_reader.deserialize::<Trip>().enumerate() {
        match result {
            Ok(trip) => trips.push(trip),
            Err(e) => {
                skipped += 1;
                log::warn!("skipping trip row {row}: {e}");
            }
        }
    }
    if skipped > 0 {
        log::warn!("skipped {skipped} unparseable trip rows");
    }
    Ok(trips)
}

// ---------------------------------------------------------------------------
// Lane GeoJSON
// ---------------------------------------------------------------------------

/// Parse a lane overlay FeatureCollection. LineString and MultiLineString
/// features become polylines; any other geometry kind is ignored.
pub fn parse_lanes(text: &str) -> Result<Vec<BikeLane>> {
    let geojson: GeoJson = text.parse().context("parsing lane GeoJSON")?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(LoadError::NotAFeatureCollection.into());
    };

    let mut lanes = Vec::new();
    for feature in collection.features {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        match geometry.value {
            Geometry::LineString(line) => lanes.push(line_to_lane(&line)),
            Geometry::MultiLineString(lines) => {
                lanes.extend(lines.iter().map(|line| line_to_lane(line)));
            }
            _ => {}
        }
    }
    Ok(lanes)
}

fn line_to_lane(line: &[Vec<f64>]) -> BikeLane {
    BikeLane {
        points: line
            .iter()
            .filter(|pos| pos.len() >= 2)
            .map(|pos| (pos[0], pos[1]))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_station_feed() {
        let text = r#"{
            "data": { "stations": [
                { "short_name": "A32000", "lon": -71.0942, "lat": 42.3601, "name": "MIT" },
                { "short_name": "B32001", "lon": "-71.1097", "lat": "42.3736" }
            ]},
            "last_updated": 1709290000
        }"#;
        let stations = parse_stations(text).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].short_name, "A32000");
        assert_eq!(stations[0].lon, -71.0942);
        // Stringly typed coordinates still parse.
        assert_eq!(stations[1].lat, 42.3736);
    }

    #[test]
    fn rejects_feed_without_station_array() {
        assert!(parse_stations(r#"{"data": {}}"#).is_err());
        assert!(parse_stations(r#"{"stations": []}"#).is_err());
    }

    #[test]
    fn rejects_station_without_short_name() {
        let text = r#"{ "data": { "stations": [ { "lon": 1.0, "lat": 2.0 } ] } }"#;
        assert!(parse_stations(text).is_err());
    }

    #[test]
    fn parses_trip_csv_with_extra_columns() {
        let csv = "\
ride_id,start_station_id,end_station_id,started_at,ended_at
r1,A32000,B32001,2024-03-01 08:13:42.1230,2024-03-01 08:30:00.4560
r2,B32001,A32000,2024-03-01 17:05:00,2024-03-01 17:20:15
";
        let trips = parse_trips(csv.as_bytes()).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].start_station_id, "A32000");
        assert_eq!(trips[0].start_minute(), 8 * 60 + 13);
        assert_eq!(trips[1].end_minute(), 17 * 60 + 20);
    }

    #[test]
    fn skips_rows_with_bad_timestamps() {
        let csv = "\
start_station_id,end_station_id,started_at,ended_at
A,B,2024-03-01 08:00:00,2024-03-01 08:30:00
A,B,not a time,2024-03-01 09:00:00
B,A,2024-03-01 10:00:00,2024-03-01 10:05:00
";
        let trips = parse_trips(csv.as_bytes()).unwrap();
        assert_eq!(trips.len(), 2);
    }

    #[test]
    fn parses_line_and_multiline_lanes() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "LineString",
                                "coordinates": [[-71.0, 42.3], [-71.1, 42.4]] } },
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "MultiLineString",
                                "coordinates": [[[-71.2, 42.5], [-71.3, 42.6]],
                                                [[-71.4, 42.7], [-71.5, 42.8]]] } },
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "Point", "coordinates": [-71.0, 42.3] } }
            ]
        }"#;
        let lanes = parse_lanes(text).unwrap();
        assert_eq!(lanes.len(), 3);
        assert_eq!(lanes[0].points, vec![(-71.0, 42.3), (-71.1, 42.4)]);
        assert_eq!(lanes[2].points[1], (-71.5, 42.8));
    }

    #[test]
    fn rejects_bare_geometry_overlay() {
        let text = r#"{ "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] }"#;
        assert!(parse_lanes(text).is_err());
    }
}
