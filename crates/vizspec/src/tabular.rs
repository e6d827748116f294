// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

//! Tabular query results as handed over by the query-execution layer.

use crate::error::{DataError, Result};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}
impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::Float(_))
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
    /// Text used for category labels; `None` for nulls.
    pub fn label(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.to_string())
        }
    }
    /// Infers a scalar from a raw text field, as found in CSV input.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Scalar::Null;
        }
        if let Ok(v) = trimmed.parse::<i64>() {
            return Scalar::Int(v);
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            if v.is_finite() {
                return Scalar::Float(v);
            }
        }
        match trimmed {
            "true" | "TRUE" | "True" => Scalar::Bool(true),
            "false" | "FALSE" | "False" => Scalar::Bool(false),
            _ => Scalar::Text(raw.to_string()),
        }
    }
    /// Ordering used for sorted axis labels: numbers numerically, everything
    /// else by its text form. Nulls sort last.
    pub fn label_cmp(&self, other: &Scalar) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) if !other.is_null() => Ordering::Less,
            (None, Some(_)) if !self.is_null() => Ordering::Greater,
            _ => match (self.is_null(), other.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.to_string().cmp(&other.to_string()),
            },
        }
    }
}
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}
impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}
impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}
impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}
impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}
impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}
impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Null, Into::into)
    }
}

pub type Row = IndexMap<String, Scalar>;

static NULL: Scalar = Scalar::Null;

/// Reads a cell, treating a missing key as null.
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a Scalar {
    row.get(column).unwrap_or(&NULL)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularResult {
    columns: Vec<String>,
    rows: Vec<Row>,
}
impl TabularResult {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut seen = IndexSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(DataError::DuplicateColumn {
                    column: column.clone(),
                }
                .into());
            }
        }
        Ok(Self { columns, rows })
    }
    /// Builds a result from positional rows.
    pub fn from_rows<I, R, V>(columns: &[&str], rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        let names: Vec<String> = columns.iter().map(|c| (*c).to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|values| {
                names
                    .iter()
                    .cloned()
                    .zip(values.into_iter().map(Into::into))
                    .collect::<Row>()
            })
            .collect();
        Self::new(names, rows)
    }
    /// Accepts either an array of objects (columns in first-appearance
    /// order) or an object of the form `{"columns": [...], "rows": [...]}`.
    pub fn from_records(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Array(records) => Self::from_record_array(None, records),
            serde_json::Value::Object(mut map) => {
                let columns = match map.remove("columns") {
                    Some(cols) => Some(serde_json::from_value::<Vec<String>>(cols)?),
                    None => None,
                };
                let rows = match map.remove("rows").or_else(|| map.remove("data")) {
                    Some(serde_json::Value::Array(rows)) => rows,
                    Some(_) => {
                        return Err(DataError::UnsupportedLayout {
                            reason: "'rows' must be an array".to_string(),
                        }
                        .into())
                    }
                    None => Vec::new(),
                };
                if columns.is_none() && rows.is_empty() {
                    return Err(DataError::UnsupportedLayout {
                        reason: "expected 'columns' and 'rows' keys".to_string(),
                    }
                    .into());
                }
                Self::from_record_array(columns, rows)
            }
            _ => Err(DataError::UnsupportedLayout {
                reason: "expected an array of records or a {columns, rows} object".to_string(),
            }
            .into()),
        }
    }
    pub fn from_json_str(input: &str) -> Result<Self> {
        Self::from_records(serde_json::from_str(input)?)
    }
    fn from_record_array(
        columns: Option<Vec<String>>,
        records: Vec<serde_json::Value>,
    ) -> Result<Self> {
        let mut discovered: IndexSet<String> = IndexSet::new();
        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let serde_json::Value::Object(fields) = record else {
                return Err(DataError::InvalidRow { index }.into());
            };
            let mut row = Row::with_capacity(fields.len());
            for (name, value) in fields {
                if columns.is_none() {
                    discovered.insert(name.clone());
                }
                row.insert(name, scalar_from_json(value));
            }
            rows.push(row);
        }
        let columns = columns.unwrap_or_else(|| discovered.into_iter().collect());
        Self::new(columns, rows)
    }
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let row: Row = columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), record.get(i).map_or(Scalar::Null, Scalar::infer)))
                .collect();
            rows.push(row);
        }
        Self::new(columns, rows)
    }
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
    pub fn column_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Scalar> + 'a {
        self.rows.iter().map(move |row| cell(row, name))
    }
    /// Number of distinct non-null values in a column.
    pub fn distinct_count(&self, name: &str) -> usize {
        self.column_values(name)
            .filter_map(Scalar::label)
            .collect::<IndexSet<_>>()
            .len()
    }
    /// Rows as JSON objects, in column order.
    pub fn to_records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| (c.clone(), scalar_to_json(cell(row, c))))
                    .collect()
            })
            .collect()
    }
}

pub fn scalar_from_json(value: serde_json::Value) -> Scalar {
    match value {
        serde_json::Value::Null => Scalar::Null,
        serde_json::Value::Bool(b) => Scalar::Bool(b),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Scalar::Int)
            .or_else(|| n.as_f64().map(Scalar::Float))
            .unwrap_or(Scalar::Null),
        serde_json::Value::String(s) => Scalar::Text(s),
        other => Scalar::Text(other.to_string()),
    }
}

pub fn scalar_to_json(value: &Scalar) -> serde_json::Value {
    match value {
        Scalar::Null => serde_json::Value::Null,
        Scalar::Bool(b) => serde_json::Value::Bool(*b),
        Scalar::Int(v) => serde_json::Value::from(*v),
        Scalar::Float(v) => serde_json::Number::from_f64(*v)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Scalar::Text(s) => serde_json::Value::String(s.clone()),
    }
}
