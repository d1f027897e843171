// ============================================================
// Layer 4 - TripDataView
// ============================================================
// The rows of one loaded file, kept in file order, and their
// conversion into the columnar Frame the pipeline consumes:
//
//   Vec<TaxiTrip> → one column per field → Frame
//
// Text fields stay text; counts become Integer columns and
// distance/fare become Float columns. A view can also be
// written back out in the loader's own format.

use std::{fs::File, io::Write, path::Path};

use serde::Serialize;

use crate::data::frame::{Column, Frame};
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::schema::Schema;
use crate::domain::taxi_trip::{columns, TaxiTrip, CSV_HEADER};

/// Rows loaded from a taxi-trip file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDataView {
    trips: Vec<TaxiTrip>,
}

impl TripDataView {
    pub fn new(trips: Vec<TaxiTrip>) -> Self { Self { trips } }

    pub fn schema(&self) -> Schema { Schema::taxi_trip() }

    pub fn trips(&self) -> &[TaxiTrip] { &self.trips }

    pub fn len(&self) -> usize { self.trips.len() }

    pub fn is_empty(&self) -> bool { self.trips.is_empty() }

    /// Columnar copy of the rows, one column per TaxiTrip field.
    pub fn to_frame(&self) -> Frame {
        trips_to_frame(&self.trips)
    }

    /// Write the rows back out with the standard header.
    pub fn write_csv(&self, path: &Path, delimiter: u8) -> PipelineResult<()> {
        let file = File::create(path).map_err(|e| {
            PipelineError::data_format(format!("cannot create '{}': {e}", path.display()))
        })?;
        self.write_to(file, delimiter)
    }

    pub fn write_to<W: Write>(&self, writer: W, delimiter: u8) -> PipelineResult<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_writer(writer);

        let fail = |e: csv::Error| PipelineError::data_format(format!("csv write failed: {e}"));
        wtr.write_record(CSV_HEADER).map_err(fail)?;
        for trip in &self.trips {
            wtr.serialize(CsvRow::from(trip)).map_err(fail)?;
        }
        wtr.flush()
            .map_err(|e| PipelineError::data_format(format!("csv flush failed: {e}")))
    }
}

/// Build a frame from any slice of trips. Used for whole views
/// and for the single record of a prediction.
pub fn trips_to_frame(trips: &[TaxiTrip]) -> Frame {
    let mut frame = Frame::new(trips.len());

    // Every column has exactly trips.len() rows, so inserts cannot fail.
    let cols = [
        (columns::VENDOR_ID,       text_column(trips, |t| t.vendor_id.as_str())),
        (columns::RATE_CODE,       text_column(trips, |t| t.rate_code.as_str())),
        (columns::PASSENGER_COUNT, Column::Integer(trips.iter().map(|t| t.passenger_count as i64).collect())),
        (columns::TRIP_TIME,       Column::Integer(trips.iter().map(|t| t.trip_time as i64).collect())),
        (columns::TRIP_DISTANCE,   Column::Float(trips.iter().map(|t| t.trip_distance as f64).collect())),
        (columns::PAYMENT_TYPE,    text_column(trips, |t| t.payment_type.as_str())),
        (columns::FARE_AMOUNT,     Column::Float(trips.iter().map(|t| t.fare_amount as f64).collect())),
    ];
    for (name, column) in cols {
        let _ = frame.insert(name, column);
    }
    frame
}

fn text_column(trips: &[TaxiTrip], field: impl Fn(&TaxiTrip) -> &str) -> Column {
    Column::Text(trips.iter().map(|t| field(t).to_string()).collect())
}

/// Positional CSV row, serialized without header names
#[derive(Serialize)]
struct CsvRow<'a>(&'a str, &'a str, u32, u32, f32, &'a str, f32);

impl<'a> From<&'a TaxiTrip> for CsvRow<'a> {
    fn from(t: &'a TaxiTrip) -> Self {
        CsvRow(
            &t.vendor_id,
            &t.rate_code,
            t.passenger_count,
            t.trip_time,
            t.trip_distance,
            &t.payment_type,
            t.fare_amount,
        )
    }
}
