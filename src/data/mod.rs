/// Data layer: core types, loading, aggregation, and time filtering.
///
/// Architecture:
/// ```text
///  stations.json   trips.csv   lanes.geojson
///        │             │            │
///        ▼             ▼            ▼
///   ┌─────────────────────────────────┐
///   │             loader              │  fetch + parse → MapData
///   └─────────────────────────────────┘
///                  │
///                  ▼
///   ┌─────────────────────────────────┐
///   │             filter              │  TimeFilter → visible trips
///   └─────────────────────────────────┘
///                  │
///                  ▼
///   ┌─────────────────────────────────┐
///   │            aggregate            │  join trips onto stations →
///   └─────────────────────────────────┘  per-station traffic counts
/// ```
pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
