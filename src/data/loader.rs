// ============================================================
// Layer 4 - Trip Loader
// ============================================================
// Reads a delimited text file of taxi trips into a
// TripDataView using the csv crate.
//
// Expected layout:
//   vendor_id,rate_code,passenger_count,trip_time_in_secs,trip_distance,payment_type,fare_amount
//   VTS,1,1,1140,3.75,CRD,15.5
//   ...
//
// Rules:
//   - the header row must be present and name the seven
//     columns above, in order (case and surrounding spaces
//     are ignored)
//   - every data row must have exactly seven fields that
//     parse into the TaxiTrip field types
//   - loading is all-or-nothing: one bad row fails the file
//     and no rows are returned

use std::{fs::File, io::Read, path::Path};

use crate::data::dataset::TripDataView;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::taxi_trip::{TaxiTrip, CSV_HEADER};
use crate::domain::traits::TripSource;

/// How to split a line into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Single ASCII field separator
    pub separator: char,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self { separator: ',' }
    }
}

impl LoaderOptions {
    /// The separator as the byte the csv reader wants
    pub fn delimiter(&self) -> PipelineResult<u8> {
        if self.separator.is_ascii() {
            Ok(self.separator as u8)
        } else {
            Err(PipelineError::data_format(format!(
                "separator '{}' is not a single ASCII character",
                self.separator
            )))
        }
    }
}

/// Loads taxi-trip CSV files.
/// Implements the TripSource trait from Layer 3.
pub struct TripLoader {
    options: LoaderOptions,
}

impl TripLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Parse trips from any reader. `origin` names the source in errors.
    pub fn load_from_reader<R: Read>(&self, reader: R, origin: &str) -> PipelineResult<TripDataView> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter()?)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        // ── Header ────────────────────────────────────────────────────────────
        let header = rdr
            .headers()
            .map_err(|e| PipelineError::data_format(format!("{origin}: cannot read header: {e}")))?
            .clone();

        if header.is_empty() {
            return Err(PipelineError::data_format(format!("{origin}: header row is missing")));
        }
        if header.len() != CSV_HEADER.len() {
            return Err(PipelineError::data_format(format!(
                "{origin}: header has {} columns, expected {}",
                header.len(),
                CSV_HEADER.len()
            )));
        }
        for (i, (got, want)) in header.iter().zip(CSV_HEADER).enumerate() {
            if !got.eq_ignore_ascii_case(want) {
                return Err(PipelineError::data_format(format!(
                    "{origin}: header column {} is '{got}', expected '{want}'",
                    i + 1
                )));
            }
        }

        // ── Rows ──────────────────────────────────────────────────────────────
        let mut trips = Vec::new();
        for result in rdr.records() {
            // Wrong field counts surface here as csv UnequalLengths errors
            let record = result
                .map_err(|e| PipelineError::data_format(format!("{origin}: {e}")))?;

            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let trip: TaxiTrip = record.deserialize(None).map_err(|e| {
                PipelineError::data_format(format!("{origin}: line {line}: {e}"))
            })?;
            trips.push(trip);
        }

        tracing::debug!("Parsed {} trips from {}", trips.len(), origin);
        Ok(TripDataView::new(trips))
    }
}

impl Default for TripLoader {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

impl TripSource for TripLoader {
    type View = TripDataView;

    fn load(&self, path: &Path) -> PipelineResult<TripDataView> {
        let file = File::open(path).map_err(|e| {
            PipelineError::data_format(format!("cannot read '{}': {e}", path.display()))
        })?;

        let view = self.load_from_reader(file, &path.display().to_string())?;
        if view.is_empty() {
            tracing::warn!("'{}' has a header but no trips", path.display());
        } else {
            tracing::info!("Loaded {} trips from '{}'", view.len(), path.display());
        }
        Ok(view)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "vendor_id,rate_code,passenger_count,trip_time_in_secs,trip_distance,payment_type,fare_amount";

    fn load(text: &str) -> PipelineResult<TripDataView> {
        TripLoader::default().load_from_reader(text.as_bytes(), "test")
    }

    #[test]
    fn test_loads_valid_rows() {
        let text = format!("{HEADER}\nVTS,1,1,1140,3.75,CRD,15.5\nCMT,2,3,600,1.1,CSH,52\n");
        let view = load(&text).unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view.trips()[0], TaxiTrip { fare_amount: 15.5, ..TaxiTrip::sample() });
        assert_eq!(view.trips()[1].payment_type, "CSH");
        assert_eq!(view.trips()[1].fare_amount, 52.0);
    }

    #[test]
    fn test_header_only_is_empty_view() {
        let view = load(HEADER).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn test_wrong_column_count_loads_nothing() {
        let text = format!("{HEADER}\nVTS,1,1,1140,3.75,CRD,15.5\nVTS,1,1,1140,3.75,CRD\n");
        let err = load(&text).unwrap_err();
        assert!(matches!(err, PipelineError::DataFormat(_)));
    }

    #[test]
    fn test_unparseable_value_is_data_format_error() {
        let text = format!("{HEADER}\nVTS,1,one,1140,3.75,CRD,15.5\n");
        assert!(matches!(load(&text), Err(PipelineError::DataFormat(_))));
    }

    #[test]
    fn test_missing_header_is_rejected() {
        // First line is data, so the header check fails on its first column
        let text = "VTS,1,1,1140,3.75,CRD,15.5\n";
        assert!(matches!(load(text), Err(PipelineError::DataFormat(_))));
        assert!(matches!(load(""), Err(PipelineError::DataFormat(_))));
    }

    #[test]
    fn test_header_case_and_spaces_ignored() {
        let text = "VENDOR_ID, rate_code ,passenger_count,trip_time_in_secs,trip_distance,payment_type,fare_amount\n\
                    VTS,1,1,1140,3.75,CRD,15.5\n";
        assert_eq!(load(text).unwrap().len(), 1);
    }

    #[test]
    fn test_custom_separator() {
        let text = format!("{}\nVTS;1;1;1140;3.75;CRD;15.5\n", HEADER.replace(',', ";"));
        let loader = TripLoader::new(LoaderOptions { separator: ';' });
        assert_eq!(loader.load_from_reader(text.as_bytes(), "test").unwrap().len(), 1);
    }

    #[test]
    fn test_non_ascii_separator_rejected() {
        let loader = TripLoader::new(LoaderOptions { separator: '→' });
        let err = loader.load_from_reader(HEADER.as_bytes(), "test").unwrap_err();
        assert!(matches!(err, PipelineError::DataFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = TripLoader::default()
            .load(Path::new("definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::DataFormat(_)));
    }

    #[test]
    fn test_reload_after_write_preserves_rows() {
        let text = format!("{HEADER}\nVTS,1,1,1140,3.75,CRD,15.5\nCMT,5,2,2300,10.25,CSH,38.75\n");
        let original = load(&text).unwrap();

        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("copy.csv");
        original.write_csv(&path, b',').unwrap();

        let reloaded = TripLoader::default().load(&path).unwrap();
        assert_eq!(reloaded.len(), original.len());
        assert_eq!(reloaded, original);
    }
}
