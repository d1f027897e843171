// ============================================================
// Layer 3 - Schema
// ============================================================
// Ordered (column name, semantic type) pairs describing a
// tabular view. The schema of the training view is saved next
// to the fitted model so that loading can check it still
// binds to the TaxiTrip record shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::taxi_trip::columns;

/// Semantic type of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Categorical text value
    Text,
    /// Whole number
    Integer,
    /// Floating point scalar
    Float,
    /// Fixed-width floating point vector (one-hot output, features)
    Vector(usize),
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text      => write!(f, "Text"),
            ColumnType::Integer   => write!(f, "Integer"),
            ColumnType::Float     => write!(f, "Float"),
            ColumnType::Vector(n) => write!(f, "Vector<{n}>"),
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub name:        String,
    pub column_type: ColumnType,
}

/// Ordered list of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<SchemaColumn>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn with_column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.push(name, column_type);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, column_type: ColumnType) {
        self.columns.push(SchemaColumn { name: name.into(), column_type });
    }

    /// Schema of a view loaded from a taxi-trip CSV file.
    pub fn taxi_trip() -> Self {
        Self::new()
            .with_column(columns::VENDOR_ID,       ColumnType::Text)
            .with_column(columns::RATE_CODE,       ColumnType::Text)
            .with_column(columns::PASSENGER_COUNT, ColumnType::Integer)
            .with_column(columns::TRIP_TIME,       ColumnType::Integer)
            .with_column(columns::TRIP_DISTANCE,   ColumnType::Float)
            .with_column(columns::PAYMENT_TYPE,    ColumnType::Text)
            .with_column(columns::FARE_AMOUNT,     ColumnType::Float)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Look up the type of a column by name
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.column_type)
    }

    /// Names of columns that `self` declares but `other` lacks or types differently.
    pub fn missing_from(&self, other: &Schema) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| other.column_type(&c.name) != Some(c.column_type))
            .map(|c| c.name.clone())
            .collect()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{}: {}", c.name, c.column_type))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxi_trip_schema_order() {
        let schema = Schema::taxi_trip();
        let names: Vec<&str> = schema.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            ["VendorId", "RateCode", "PassengerCount", "TripTime", "TripDistance", "PaymentType", "FareAmount"]
        );
        assert_eq!(schema.column_type("TripDistance"), Some(ColumnType::Float));
    }

    #[test]
    fn test_missing_from_reports_type_changes() {
        let expected = Schema::taxi_trip();
        let actual = Schema::new()
            .with_column("VendorId", ColumnType::Integer)
            .with_column("RateCode", ColumnType::Text);

        let missing = expected.missing_from(&actual);
        assert!(missing.contains(&"VendorId".to_string()));
        assert!(missing.contains(&"FareAmount".to_string()));
        assert!(!missing.contains(&"RateCode".to_string()));
    }

    #[test]
    fn test_display() {
        let schema = Schema::new().with_column("Features", ColumnType::Vector(3));
        assert_eq!(schema.to_string(), "[Features: Vector<3>]");
    }
}
