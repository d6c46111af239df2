//! The shape every generated record shares.
//!
//! RULE: COLUMNS is the persisted schema. Its order and spelling are
//! the CSV header and the SQLite column list; never rename in place.

use crate::corruption::CorruptionRule;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell of a finished row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    Decimal(f64),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text form used by the CSV writer. Null renders as the empty string.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Date(d) => d.format(DATE_FORMAT).to_string(),
            Value::Timestamp(t) => t.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&Option<String>> for Value {
    fn from(v: &Option<String>) -> Self {
        v.as_ref().map_or(Value::Null, |s| Value::Text(s.clone()))
    }
}

impl From<Option<i64>> for Value {
    fn from(v: Option<i64>) -> Self {
        v.map_or(Value::Null, Value::Int)
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Value::Null, Value::Decimal)
    }
}

impl From<Option<NaiveDateTime>> for Value {
    fn from(v: Option<NaiveDateTime>) -> Self {
        v.map_or(Value::Null, Value::Timestamp)
    }
}

/// Mutable handle to one corruptible field.
pub enum FieldMut<'a> {
    Text(&'a mut Option<String>),
    Int(&'a mut Option<i64>),
    Decimal(&'a mut Option<f64>),
    Timestamp(&'a mut Option<NaiveDateTime>),
}

impl FieldMut<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldMut::Text(_) => FieldKind::Text,
            FieldMut::Int(_) => FieldKind::Int,
            FieldMut::Decimal(_) => FieldKind::Decimal,
            FieldMut::Timestamp(_) => FieldKind::Timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Decimal,
    Timestamp,
}

/// A record type with a fixed table schema and a corruption rule table.
pub trait Entity: Clone {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Selector for the fields rules may target.
    type Field: Copy + fmt::Debug + 'static;

    fn id(&self) -> &str;

    /// Foreign key into the parent table, if this entity has one.
    fn parent_id(&self) -> Option<&str> {
        None
    }

    /// Column name of a selectable field.
    fn field_name(field: Self::Field) -> &'static str;

    fn field_mut(&mut self, field: Self::Field) -> FieldMut<'_>;

    /// One value per entry in COLUMNS, same order.
    fn to_row(&self) -> Vec<Value>;

    /// The documented rule table, in application order.
    fn default_rules() -> Vec<CorruptionRule<Self>>;

    /// Recompute derived fields after corruption.
    fn finalize(&mut self) {}
}
