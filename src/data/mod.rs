// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything between a CSV file on disk and the columnar
// Frame the ML layer consumes:
//
//   taxi-fare-train.csv
//       │
//       ▼
//   TripLoader     → header check, typed row parsing
//       │
//       ▼
//   TripDataView   → Vec<TaxiTrip>, re-serialisable to CSV
//       │
//       ▼
//   Frame          → named typed columns for pipeline stages

/// Reads delimited taxi-trip files with the csv crate
pub mod loader;

/// Row view over loaded trips
pub mod dataset;

/// Columnar table the pipeline stages operate on
pub mod frame;
