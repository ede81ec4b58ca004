//! A single dataset record.

use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One record of a dataset, keyed by column header.
///
/// Headers are shared by every row of the same source. Field order follows
/// the source file and is preserved when serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    /// Build a row from shared headers and its values.
    ///
    /// Missing trailing values read as empty strings; surplus values are dropped.
    pub fn new(headers: Arc<[String]>, mut values: Vec<String>) -> Self {
        values.resize(headers.len(), String::new());
        Self { headers, values }
    }

    /// Build a standalone row from `(field, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let (headers, values): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self {
            headers: headers.into(),
            values,
        }
    }

    /// Value of a field, if the source has that column.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == field)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// First non-empty value among candidate field names.
    pub fn first_of(&self, fields: &[&str]) -> Option<&str> {
        fields
            .iter()
            .filter_map(|f| self.get(f))
            .find(|v| !v.is_empty())
    }

    /// Like [`Row::first_of`] but returns `""` when no candidate has a value.
    pub fn text(&self, fields: &[&str]) -> &str {
        self.first_of(fields).unwrap_or("")
    }

    /// Lower-cased value of the first non-empty candidate field.
    pub fn lower(&self, fields: &[&str]) -> String {
        self.text(fields).to_lowercase()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.fields() {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}
