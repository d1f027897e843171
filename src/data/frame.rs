// ============================================================
// Layer 4 - Frame (in-memory columnar view)
// ============================================================
// Pipeline stages read named columns from a Frame and append
// new ones to it. Every column holds exactly `rows` values;
// vector columns store their values row-major, `width` values
// per row.
//
//   Frame (rows = 2)
//     VendorId        Text      ["VTS", "CMT"]
//     TripDistance    Float     [3.75, 1.2]
//     VendorIdEncoded Vector<2> [1, 0,  0, 1]

use crate::domain::schema::{ColumnType, Schema};

/// Problems looking up or adding columns.
/// Callers map these to the error kind of their stage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameError {
    #[error("column '{0}' not found")]
    Missing(String),

    #[error("column '{name}' has type {found}, expected {expected}")]
    WrongType {
        name:     String,
        expected: &'static str,
        found:    ColumnType,
    },

    #[error("column '{name}' has {got} rows, frame has {expected}")]
    Length {
        name:     String,
        expected: usize,
        got:      usize,
    },
}

/// Typed storage for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<String>),
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Vector { width: usize, values: Vec<f64> },
}

impl Column {
    /// Number of rows in this column
    pub fn len(&self) -> usize {
        match self {
            Column::Text(v)    => v.len(),
            Column::Integer(v) => v.len(),
            Column::Float(v)   => v.len(),
            Column::Vector { width, values } => {
                if *width == 0 { 0 } else { values.len() / width }
            }
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Text(_)               => ColumnType::Text,
            Column::Integer(_)            => ColumnType::Integer,
            Column::Float(_)              => ColumnType::Float,
            Column::Vector { width, .. }  => ColumnType::Vector(*width),
        }
    }

    /// Number of f64 values this column contributes per row when
    /// concatenated into a feature vector. `None` for text.
    pub fn numeric_width(&self) -> Option<usize> {
        match self {
            Column::Text(_)                          => None,
            Column::Integer(_) | Column::Float(_)    => Some(1),
            Column::Vector { width, .. }             => Some(*width),
        }
    }

    /// Append row `row` of a numeric column to `out`.
    pub fn extend_row(&self, row: usize, out: &mut Vec<f64>) {
        match self {
            Column::Integer(v)  => out.push(v[row] as f64),
            Column::Float(v)    => out.push(v[row]),
            Column::Vector { width, values } => {
                out.extend_from_slice(&values[row * width..(row + 1) * width]);
            }
            Column::Text(_) => {}
        }
    }
}

/// Ordered set of equally long named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    rows:    usize,
    columns: Vec<(String, Column)>,
}

impl Frame {
    /// An empty frame that will hold `rows` rows
    pub fn new(rows: usize) -> Self {
        Self { rows, columns: Vec::new() }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Add a column, replacing any existing column with the same name.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) -> Result<(), FrameError> {
        let name = name.into();
        if column.len() != self.rows {
            return Err(FrameError::Length { name, expected: self.rows, got: column.len() });
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = column,
            None       => self.columns.push((name, column)),
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Result<&Column, FrameError> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| FrameError::Missing(name.to_string()))
    }

    pub fn text(&self, name: &str) -> Result<&[String], FrameError> {
        match self.column(name)? {
            Column::Text(v) => Ok(v),
            other => Err(wrong_type(name, "Text", other)),
        }
    }

    pub fn float(&self, name: &str) -> Result<&[f64], FrameError> {
        match self.column(name)? {
            Column::Float(v) => Ok(v),
            other => Err(wrong_type(name, "Float", other)),
        }
    }

    /// Returns `(width, row-major values)`
    pub fn vector(&self, name: &str) -> Result<(usize, &[f64]), FrameError> {
        match self.column(name)? {
            Column::Vector { width, values } => Ok((*width, values)),
            other => Err(wrong_type(name, "Vector", other)),
        }
    }

    /// Schema of the columns currently in the frame
    pub fn schema(&self) -> Schema {
        let mut schema = Schema::new();
        for (name, column) in &self.columns {
            schema.push(name.clone(), column.column_type());
        }
        schema
    }
}

fn wrong_type(name: &str, expected: &'static str, found: &Column) -> FrameError {
    FrameError::WrongType {
        name: name.to_string(),
        expected,
        found: found.column_type(),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_wrong_length() {
        let mut frame = Frame::new(2);
        let err = frame.insert("x", Column::Float(vec![1.0])).unwrap_err();
        assert_eq!(err, FrameError::Length { name: "x".into(), expected: 2, got: 1 });
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut frame = Frame::new(1);
        frame.insert("x", Column::Float(vec![1.0])).unwrap();
        frame.insert("x", Column::Float(vec![2.0])).unwrap();
        assert_eq!(frame.float("x").unwrap(), &[2.0]);
        assert_eq!(frame.schema().len(), 1);
    }

    #[test]
    fn test_typed_access() {
        let mut frame = Frame::new(2);
        frame.insert("v", Column::Vector { width: 2, values: vec![1.0, 0.0, 0.0, 1.0] }).unwrap();
        frame.insert("t", Column::Text(vec!["a".into(), "b".into()])).unwrap();

        let (width, values) = frame.vector("v").unwrap();
        assert_eq!(width, 2);
        assert_eq!(&values[2..], &[0.0, 1.0]);

        assert!(matches!(frame.float("t"), Err(FrameError::WrongType { .. })));
        assert!(matches!(frame.text("nope"), Err(FrameError::Missing(_))));
    }

    #[test]
    fn test_extend_row() {
        let col = Column::Vector { width: 3, values: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0] };
        let mut out = Vec::new();
        col.extend_row(1, &mut out);
        Column::Integer(vec![7, 8]).extend_row(0, &mut out);
        assert_eq!(out, vec![4.0, 5.0, 6.0, 7.0]);
    }
}
