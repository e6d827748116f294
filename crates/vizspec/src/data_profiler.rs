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

use crate::config::ProfilingConfig;
use crate::tabular::{Scalar, TabularResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    String,
    Datetime,
}
impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnType::String)
    }
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Datetime)
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Datetime => "datetime",
        }
    }
}
impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionProfile {
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stats: Option<NumericStats>,
    pub null_count: usize,
    pub distinct_count: usize,
}
/// Per-column classification of a tabular result, in column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnProfile {
    dimensions: IndexMap<String, DimensionProfile>,
}
impl ColumnProfile {
    pub fn from_dimensions(dimensions: IndexMap<String, DimensionProfile>) -> Self {
        Self { dimensions }
    }
    pub fn get(&self, column: &str) -> Option<&DimensionProfile> {
        self.dimensions.get(column)
    }
    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.dimensions.get(column).map(|d| d.column_type)
    }
    pub fn stats(&self, column: &str) -> Option<&NumericStats> {
        self.dimensions.get(column).and_then(|d| d.stats.as_ref())
    }
    pub fn is_numeric(&self, column: &str) -> bool {
        self.column_type(column).is_some_and(|t| t.is_numeric())
    }
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DimensionProfile)> {
        self.dimensions.iter()
    }
    /// Splits `columns` into disjoint numeric, categorical and temporal
    /// groups, preserving order. Columns without a profile are skipped.
    pub fn partition<'a>(&self, columns: &'a [String]) -> ColumnGroups<'a> {
        let mut groups = ColumnGroups::default();
        for column in columns {
            match self.column_type(column) {
                Some(ColumnType::Integer | ColumnType::Float) => groups.numeric.push(column),
                Some(ColumnType::String) => groups.categorical.push(column),
                Some(ColumnType::Datetime) => groups.temporal.push(column),
                None => {}
            }
        }
        groups
    }
}
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnGroups<'a> {
    pub numeric: Vec<&'a str>,
    pub categorical: Vec<&'a str>,
    pub temporal: Vec<&'a str>,
}
impl ColumnGroups<'_> {
    pub fn first_numeric(&self, limit: usize) -> Vec<String> {
        self.numeric
            .iter()
            .take(limit)
            .map(|c| (*c).to_string())
            .collect()
    }
}
impl fmt::Display for ColumnGroups<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "numeric={}, categorical={}, temporal={}",
            self.numeric.len(),
            self.categorical.len(),
            self.temporal.len()
        )
    }
}
pub struct DataProfiler {
    config: ProfilingConfig,
}
impl DataProfiler {
    pub fn new() -> Self {
        Self {
            config: ProfilingConfig::default(),
        }
    }
    pub fn with_config(config: ProfilingConfig) -> Self {
        Self { config }
    }
    pub fn profile(&self, result: &TabularResult) -> ColumnProfile {
        let dimensions: Vec<(String, DimensionProfile)> = result
            .columns()
            .par_iter()
            .map(|column| {
                let values: Vec<&Scalar> = result.column_values(column).collect();
                (column.clone(), self.profile_column(&values))
            })
            .collect();
        debug!(
            columns = dimensions.len(),
            rows = result.row_count(),
            "profiled tabular result"
        );
        ColumnProfile::from_dimensions(dimensions.into_iter().collect())
    }
    fn profile_column(&self, values: &[&Scalar]) -> DimensionProfile {
        let null_count = values.iter().filter(|v| v.is_null()).count();
        let distinct_count = values
            .iter()
            .filter_map(|v| v.label())
            .collect::<IndexSet<_>>()
            .len();
        let column_type = self.detect_column_type(values);
        let stats = if column_type.is_numeric() {
            calculate_numeric_stats(values)
        } else {
            None
        };
        DimensionProfile {
            column_type,
            stats,
            null_count,
            distinct_count,
        }
    }
    pub fn detect_column_type(&self, values: &[&Scalar]) -> ColumnType {
        let non_null: Vec<&Scalar> = values.iter().copied().filter(|v| !v.is_null()).collect();
        if non_null.is_empty() {
            return ColumnType::String;
        }
        if non_null.iter().all(|v| v.is_numeric()) {
            return if non_null.iter().all(|v| matches!(v, Scalar::Int(_))) {
                ColumnType::Integer
            } else {
                ColumnType::Float
            };
        }
        let all_temporal = non_null
            .iter()
            .all(|v| v.as_str().is_some_and(|s| self.parse_datetime(s).is_some()));
        if all_temporal {
            return ColumnType::Datetime;
        }
        ColumnType::String
    }
    pub fn parse_datetime(&self, value: &str) -> Option<DateTime<chrono::Utc>> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&chrono::Utc));
        }
        self.config
            .temporal_formats
            .iter()
            .find_map(|format| parse_with_format(value, format))
    }
}
impl Default for DataProfiler {
    fn default() -> Self {
        Self::new()
    }
}
fn parse_with_format(value: &str, format: &str) -> Option<DateTime<chrono::Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        return Some(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, format) {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
fn calculate_numeric_stats(values: &[&Scalar]) -> Option<NumericStats> {
    let mut numbers: Vec<f64> = values.iter().filter_map(|v| v.as_f64()).collect();
    if numbers.is_empty() {
        return None;
    }
    numbers.sort_by(f64::total_cmp);
    let n = numbers.len();
    let mean = numbers.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (numbers[n / 2 - 1] + numbers[n / 2]) / 2.0
    } else {
        numbers[n / 2]
    };
    Some(NumericStats {
        min: numbers.first().copied(),
        max: numbers.last().copied(),
        mean: Some(mean),
        median: Some(median),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::TabularResult;

    fn single(values: Vec<Scalar>) -> ColumnProfile {
        let result = TabularResult::from_rows(&["c"], values.into_iter().map(|v| vec![v])).unwrap();
        DataProfiler::new().profile(&result)
    }

    #[test]
    fn integers_with_nulls_stay_integer() {
        let profile = single(vec![Scalar::Int(3), Scalar::Null, Scalar::Int(1), Scalar::Int(2)]);
        let dim = profile.get("c").unwrap();
        assert_eq!(dim.column_type, ColumnType::Integer);
        assert_eq!(dim.null_count, 1);
        assert_eq!(
            dim.stats,
            Some(NumericStats {
                min: Some(1.0),
                max: Some(3.0),
                mean: Some(2.0),
                median: Some(2.0),
            })
        );
    }

    #[test]
    fn mixed_int_and_float_is_float_with_even_median() {
        let profile = single(vec![
            Scalar::Int(1),
            Scalar::Float(2.5),
            Scalar::Int(4),
            Scalar::Int(10),
        ]);
        assert_eq!(profile.column_type("c"), Some(ColumnType::Float));
        assert_eq!(profile.stats("c").unwrap().median, Some(3.25));
    }

    #[test]
    fn dates_are_temporal() {
        let profile = single(vec![
            Scalar::from("2024-01-01"),
            Scalar::from("2024-02-01"),
            Scalar::from("2024-03-01T10:00:00Z"),
        ]);
        assert_eq!(profile.column_type("c"), Some(ColumnType::Datetime));
        assert!(profile.stats("c").is_none());
    }

    #[test]
    fn one_unparseable_value_makes_column_categorical() {
        let profile = single(vec![Scalar::from("2024-01-01"), Scalar::from("soon")]);
        assert_eq!(profile.column_type("c"), Some(ColumnType::String));
    }

    #[test]
    fn numbers_mixed_with_text_are_categorical() {
        let profile = single(vec![Scalar::Int(1), Scalar::from("two")]);
        assert_eq!(profile.column_type("c"), Some(ColumnType::String));
    }

    #[test]
    fn empty_and_all_null_columns_have_no_stats() {
        let empty = TabularResult::new(vec!["c".into()], Vec::new()).unwrap();
        let profile = DataProfiler::new().profile(&empty);
        assert_eq!(profile.column_type("c"), Some(ColumnType::String));
        assert!(profile.stats("c").is_none());

        let nulls = single(vec![Scalar::Null, Scalar::Null]);
        assert!(nulls.stats("c").is_none());
        assert_eq!(nulls.get("c").unwrap().null_count, 2);
    }

    #[test]
    fn partition_keeps_column_order() {
        let result = TabularResult::from_rows(
            &["when", "region", "a", "b"],
            vec![vec![
                Scalar::from("2024-01-01"),
                Scalar::from("North"),
                Scalar::Int(1),
                Scalar::Float(0.5),
            ]],
        )
        .unwrap();
        let profile = DataProfiler::new().profile(&result);
        let groups = profile.partition(result.columns());
        assert_eq!(groups.numeric, vec!["a", "b"]);
        assert_eq!(groups.categorical, vec!["region"]);
        assert_eq!(groups.temporal, vec!["when"]);
    }

    #[test]
    fn profile_serialises_as_column_map() {
        let profile = single(vec![Scalar::Int(5)]);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["c"]["type"], "integer");
        assert_eq!(json["c"]["stats"]["max"], 5.0);
    }
}
