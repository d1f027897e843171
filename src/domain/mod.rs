// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types that describe what the system works with:
// a taxi trip, a fare prediction, the shape of a table, and
// the errors every other layer reports.
//
// Rules for this layer:
//   - NO file I/O
//   - NO gradient boosting library types
//   - Only structs, enums, and traits
//
// Every other layer depends on this one; it depends on none.

/// The input record and the prediction output
pub mod taxi_trip;

/// Column names and semantic types of a tabular view
pub mod schema;

/// Error kinds shared by the data, ml, and infra layers
pub mod error;

/// Explicit seed holder threaded into training calls
pub mod context;

/// Core abstractions (traits) that other layers implement
pub mod traits;
