//! Query result types for the playground gateway.
//!
//! Defines the uniform shapes that every statement result is normalized into.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Represents the result of executing a SQL statement.
///
/// Serializes with a `type` tag of `"SELECT"` for row sets and `"DML/DDL"`
/// for mutations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum QueryResult {
    /// Rows returned by a data query.
    #[serde(rename = "SELECT")]
    Rows(RowSet),

    /// Summary of a mutating or definition statement.
    #[serde(rename = "DML/DDL")]
    Mutation(MutationOutcome),
}

impl QueryResult {
    /// Returns the display label for the result type.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Rows(_) => "SELECT",
            Self::Mutation(_) => "DML/DDL",
        }
    }

    /// Returns the row set, if this is a data query result.
    pub fn as_rows(&self) -> Option<&RowSet> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Mutation(_) => None,
        }
    }

    /// Returns the mutation outcome, if this is a mutation result.
    pub fn as_mutation(&self) -> Option<&MutationOutcome> {
        match self {
            Self::Rows(_) => None,
            Self::Mutation(outcome) => Some(outcome),
        }
    }
}

/// Ordered columns plus the ordered row records of a data query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSet {
    /// Column names in statement order.
    pub columns: Vec<String>,

    /// Rows of data.
    pub rows: Vec<Row>,

    /// Number of rows in `rows`.
    pub row_count: usize,
}

impl RowSet {
    /// Creates a row set with the given columns and rows.
    pub fn with_data(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
        }
    }
}

/// Changed-row count and optional inserted-row identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    /// Human-readable status message.
    pub message: String,

    /// Number of rows the statement changed.
    pub changes: u64,

    /// Row id assigned by an insertion, when there was one.
    pub last_insert_rowid: Option<i64>,
}

/// A single result row: column names mapped to values, in column order.
///
/// Serializes as a JSON object whose keys follow the column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Returns the value for a column, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns the column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A single value using SQLite's native storage classes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// INTEGER storage class.
    Int(i64),

    /// REAL storage class.
    Float(f64),

    /// TEXT storage class.
    Text(String),

    /// BLOB storage class.
    Blob(Vec<u8>),
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Blob(b) => serializer.serialize_str(&STANDARD.encode(b)),
        }
    }
}
