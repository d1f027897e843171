// ============================================================
// Layer 3 - TaxiTrip / FarePrediction Domain Types
// ============================================================
// One observed taxi trip and the model's answer for it.
//
// The field order matches the column order of the input CSV:
//
//   vendor_id,rate_code,passenger_count,trip_time_in_secs,
//   trip_distance,payment_type,fare_amount
//
// The three categorical fields stay as strings. They are
// only turned into numbers by the one-hot stages of the
// pipeline, which learn their vocabulary from training data.

use serde::{Deserialize, Serialize};

/// Header names of the taxi-trip CSV files, in column order.
pub const CSV_HEADER: [&str; 7] = [
    "vendor_id",
    "rate_code",
    "passenger_count",
    "trip_time_in_secs",
    "trip_distance",
    "payment_type",
    "fare_amount",
];

/// Column names used inside the pipeline for each TaxiTrip field.
pub mod columns {
    pub const VENDOR_ID:       &str = "VendorId";
    pub const RATE_CODE:       &str = "RateCode";
    pub const PASSENGER_COUNT: &str = "PassengerCount";
    pub const TRIP_TIME:       &str = "TripTime";
    pub const TRIP_DISTANCE:   &str = "TripDistance";
    pub const PAYMENT_TYPE:    &str = "PaymentType";
    pub const FARE_AMOUNT:     &str = "FareAmount";
}

/// A single taxi trip.
///
/// `fare_amount` is the training label. At inference time it is
/// ignored, so callers usually leave it at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxiTrip {
    pub vendor_id:       String,
    pub rate_code:       String,
    pub passenger_count: u32,
    #[serde(alias = "trip_time_in_secs")]
    pub trip_time:       u32,
    pub trip_distance:   f32,
    pub payment_type:    String,
    #[serde(default)]
    pub fare_amount:     f32,
}

impl TaxiTrip {
    /// The trip used for the single sample prediction.
    /// Its observed fare was 15.5.
    pub fn sample() -> Self {
        Self {
            vendor_id:       "VTS".to_string(),
            rate_code:       "1".to_string(),
            passenger_count: 1,
            trip_time:       1140,
            trip_distance:   3.75,
            payment_type:    "CRD".to_string(),
            fare_amount:     0.0,
        }
    }
}

/// Observed fare of [`TaxiTrip::sample`].
pub const SAMPLE_ACTUAL_FARE: f32 = 15.5;

/// The model output for one trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FarePrediction {
    /// Predicted fare amount
    pub fare_amount: f32,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_ignores_fare() {
        let trip = TaxiTrip::sample();
        assert_eq!(trip.fare_amount, 0.0);
        assert_eq!(trip.vendor_id, "VTS");
    }

    #[test]
    fn test_json_accepts_csv_style_trip_time() {
        let json = r#"{"vendor_id":"CMT","rate_code":"1","passenger_count":2,
            "trip_time_in_secs":600,"trip_distance":1.5,"payment_type":"CSH"}"#;
        let trip: TaxiTrip = serde_json::from_str(json).unwrap();
        assert_eq!(trip.trip_time, 600);
        // fare_amount is optional in JSON input
        assert_eq!(trip.fare_amount, 0.0);
    }
}
