//! Writes a small offline dataset (`sample/stations.json`,
//! `sample/trips.csv`) in the exact upstream feed formats, for demoing the
//! viewer without network access: point the loader URL constants at these
//! files via a local HTTP server.

use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct SampleStation {
    short_name: String,
    name: String,
    lon: f64,
    lat: f64,
}

fn generate_stations(rng: &mut SimpleRng) -> Vec<SampleStation> {
    // A loose grid around central Boston/Cambridge with positional jitter.
    let mut stations = Vec::new();
    for row in 0..4 {
        for col in 0..5 {
            let idx = row * 5 + col;
            stations.push(SampleStation {
                short_name: format!("S{:05}", 32000 + idx),
                name: format!("Sample Station {idx}"),
                lon: -71.12 + col as f64 * 0.012 + rng.gauss(0.0, 0.002),
                lat: 42.35 + row as f64 * 0.008 + rng.gauss(0.0, 0.002),
            });
        }
    }
    stations
}

/// Pick a start minute with morning and evening rush-hour peaks.
fn rush_hour_minute(rng: &mut SimpleRng) -> u32 {
    let peak = if rng.next_f64() < 0.5 { 8.5 * 60.0 } else { 17.5 * 60.0 };
    rng.gauss(peak, 90.0).clamp(0.0, 1380.0) as u32
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    std::fs::create_dir_all("sample")?;

    let stations = generate_stations(&mut rng);

    // ---- stations.json: nested GBFS-style feed ----
    let station_records: Vec<_> = stations
        .iter()
        .map(|s| {
            json!({
                "short_name": s.short_name,
                "name": s.name,
                "lon": s.lon,
                "lat": s.lat,
            })
        })
        .collect();
    let feed = json!({ "data": { "stations": station_records } });
    std::fs::write("sample/stations.json", serde_json::to_string_pretty(&feed)?)?;

    // ---- trips.csv ----
    let mut writer = csv::Writer::from_path("sample/trips.csv")?;
    writer.write_record(["ride_id", "start_station_id", "end_station_id", "started_at", "ended_at"])?;
    for ride in 0..500 {
        let start = &stations[rng.range(stations.len())];
        let end = &stations[rng.range(stations.len())];
        let start_minute = rush_hour_minute(&mut rng);
        let duration = 5 + rng.range(35) as u32;
        let end_minute = (start_minute + duration).min(1439);
        writer.write_record([
            format!("ride{ride:04}"),
            start.short_name.clone(),
            end.short_name.clone(),
            format!("2024-03-01 {:02}:{:02}:00", start_minute / 60, start_minute % 60),
            format!("2024-03-01 {:02}:{:02}:00", end_minute / 60, end_minute % 60),
        ])?;
    }
    writer.flush()?;

    println!(
        "wrote sample/stations.json ({} stations) and sample/trips.csv (500 trips)",
        stations.len()
    );
    Ok(())
}
