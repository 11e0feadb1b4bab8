use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Value – a single CSV cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV column is read as.
#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord/Hash: floats compare by `total_cmp`, so a cell can key a
// BTreeMap or HashMap. Integer and float cells are distinct even when equal
// in magnitude.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        fn rank(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Guess the type of a raw CSV field.
    ///
    /// Empty → `Null`, then integer, float, `true`/`false`, else string.
    pub fn guess(s: &str) -> Self {
        if s.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        if s == "true" || s == "false" {
            return Value::Bool(s == "true");
        }
        Value::String(s.to_string())
    }

    /// Interpret the value as an `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors raised by table construction and column lookups
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("unknown column '{column}' (available: {available})")]
    UnknownColumn { column: String, available: String },

    #[error("column '{column}', row {row}: '{value}' is not numeric")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("row {row} is out of range for a table of {len} rows")]
    RowOutOfRange { row: usize, len: usize },

    #[error("row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An ordered collection of rows sharing one header.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, rejecting rows whose width differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, DataError> {
        if let Some((row, r)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(DataError::RaggedRow {
                row,
                found: r.len(),
                expected: columns.len(),
            });
        }
        Ok(Table { columns, rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Position of `name` in the header.
    pub fn column_index(&self, name: &str) -> Result<usize, DataError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DataError::UnknownColumn {
                column: name.to_string(),
                available: self.columns.join(", "),
            })
    }

    /// Read a column as numbers. `Null` cells come back as `None`.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>, DataError> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, r)| match &r[idx] {
                Value::Null => Ok(None),
                v => v.as_f64().map(Some).ok_or_else(|| DataError::NonNumeric {
                    column: name.to_string(),
                    row,
                    value: v.to_string(),
                }),
            })
            .collect()
    }

    /// A new table holding the rows at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> Result<Table, DataError> {
        let rows: Vec<Vec<Value>> = indices
            .iter()
            .map(|&row| {
                self.rows.get(row).cloned().ok_or(DataError::RowOutOfRange {
                    row,
                    len: self.rows.len(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }
}
