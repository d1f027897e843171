// ============================================================
// Test Support - Synthetic Trips
// ============================================================
// Reproducible taxi-trip fixtures for unit tests.
//
// Fares follow a simple metered tariff so that the sample trip
// (VTS, rate 1, 3.75 miles, card) is priced close to the 15.5
// it was actually charged:
//
//   rate "1" (standard): 2.50 + 3.50 / mile
//   rate "2" (JFK):      52.00 flat
//   rate "5" (negotiated): standard + 10.00
//
// plus up to ±0.30 of noise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::taxi_trip::TaxiTrip;

pub fn tariff(rate_code: &str, distance: f32) -> f32 {
    let metered = 2.5 + 3.5 * distance;
    match rate_code {
        "2" => 52.0,
        "5" => metered + 10.0,
        _   => metered,
    }
}

pub fn synthetic_trips(n: usize, seed: u64) -> Vec<TaxiTrip> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..n)
        .map(|_| {
            let distance: f32 = (rng.gen_range(0.3f32..12.0) * 100.0).round() / 100.0;
            let rate_code = match rng.gen_range(0..20) {
                0..=16 => "1",
                17 | 18 => "2",
                _ => "5",
            };
            let noise: f32 = rng.gen_range(-0.3f32..0.3);

            TaxiTrip {
                vendor_id:       if rng.gen_bool(0.5) { "VTS" } else { "CMT" }.to_string(),
                rate_code:       rate_code.to_string(),
                passenger_count: rng.gen_range(1..=4),
                trip_time:       (distance * 300.0) as u32,
                trip_distance:   distance,
                payment_type:    if rng.gen_bool(0.6) { "CRD" } else { "CSH" }.to_string(),
                fare_amount:     ((tariff(rate_code, distance) + noise) * 100.0).round() / 100.0,
            }
        })
        .collect()
}
