//! Property values carried by graph nodes.
//!
//! Values mirror what the graph store hands back for a node property,
//! including the temporal types the community graph stores for dates.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single node property as returned by the graph store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// String value (names, slugs, urls)
    String(String),
    /// Integer value (counts, epoch seconds)
    Int(i64),
    /// Floating point value (ratings)
    Float(f64),
    /// Boolean flag (approved, passed)
    Bool(bool),
    /// Calendar date without a time zone
    Date(NaiveDate),
    /// Instant in time
    DateTime(DateTime<Utc>),
    /// List of strings
    StringList(Vec<String>),
    /// List of integers
    IntList(Vec<i64>),
    /// Explicit null
    Null,
}

impl PropertyValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Interpret the value as a point in time, in seconds since the epoch.
    ///
    /// Integers are taken as epoch seconds, dates as their midnight UTC and
    /// strings are parsed as RFC 3339 or `YYYY-MM-DD`.
    pub fn as_epoch_seconds(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::DateTime(dt) => Some(dt.timestamp() as f64),
            PropertyValue::Date(d) => d
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc().timestamp() as f64),
            PropertyValue::String(s) => parse_temporal(s).map(|dt| dt.timestamp() as f64),
            _ => None,
        }
    }

    /// Interpret the value as a UTC instant. See [`PropertyValue::as_epoch_seconds`].
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            PropertyValue::DateTime(dt) => Some(*dt),
            PropertyValue::Date(d) => d.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()),
            PropertyValue::Int(i) => DateTime::from_timestamp(*i, 0),
            PropertyValue::Float(f) => DateTime::from_timestamp(f.trunc() as i64, 0),
            PropertyValue::String(s) => parse_temporal(s),
            _ => None,
        }
    }

    /// Render the value as display text, `None` for null.
    pub fn render(&self) -> Option<String> {
        match self {
            PropertyValue::String(s) => Some(s.clone()),
            PropertyValue::Int(i) => Some(i.to_string()),
            PropertyValue::Float(f) => Some(f.to_string()),
            PropertyValue::Bool(b) => Some(b.to_string()),
            PropertyValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            PropertyValue::DateTime(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            PropertyValue::StringList(list) => Some(list.join(",")),
            PropertyValue::IntList(list) => Some(
                list.iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            PropertyValue::Null => None,
        }
    }
}

fn parse_temporal(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<NaiveDate> for PropertyValue {
    fn from(value: NaiveDate) -> Self {
        PropertyValue::Date(value)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        PropertyValue::DateTime(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::StringList(value)
    }
}

impl From<Vec<i64>> for PropertyValue {
    fn from(value: Vec<i64>) -> Self {
        PropertyValue::IntList(value)
    }
}

/// Key-value property store of a graph node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyMap {
    data: HashMap<String, PropertyValue>,
}

impl PropertyMap {
    /// Create a new empty property map.
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Builder pattern: add a property and return self.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Insert a property value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.data.insert(key.into(), value.into());
    }

    /// Get a property value by key. Stored nulls read as absent.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        match self.data.get(key) {
            Some(PropertyValue::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// Check if a non-null property exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Get the number of properties.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the property map is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over all properties.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.data.iter()
    }

    /// Type-safe getter for string properties.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(PropertyValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Type-safe getter for integer properties.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.data.get(key) {
            Some(PropertyValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Type-safe getter for boolean properties.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.data.get(key) {
            Some(PropertyValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Numeric getter accepting both integer and float properties.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropertyValue::as_f64)
    }

    /// Temporal getter, see [`PropertyValue::as_epoch_seconds`].
    pub fn get_epoch_seconds(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(PropertyValue::as_epoch_seconds)
    }

    /// Display text of a property regardless of its stored type.
    pub fn get_rendered(&self, key: &str) -> Option<String> {
        self.get(key).and_then(PropertyValue::render)
    }
}

impl FromIterator<(String, PropertyValue)> for PropertyMap {
    fn from_iter<T: IntoIterator<Item = (String, PropertyValue)>>(iter: T) -> Self {
        Self {
            data: HashMap::from_iter(iter),
        }
    }
}
