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

//! Row transforms used while building figures. Every transform returns new
//! rows; inputs are never modified.

use crate::tabular::{cell, Row, Scalar};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Field names of a melted frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeltFields {
    pub series: String,
    pub value: String,
}
impl MeltFields {
    /// `series`/`value`, suffixed with `_` until they clash with no
    /// existing column.
    pub fn avoiding(columns: &[String]) -> Self {
        let taken: HashSet<&str> = columns.iter().map(String::as_str).collect();
        let pick = |base: &str| {
            let mut name = base.to_string();
            while taken.contains(name.as_str()) {
                name.push('_');
            }
            name
        };
        Self {
            series: pick("series"),
            value: pick("value"),
        }
    }
}

/// Wide-to-long reshape: one output row per (value column, input row),
/// ordered by value column first.
pub fn melt(rows: &[Row], id_column: &str, value_columns: &[String], fields: &MeltFields) -> Vec<Row> {
    value_columns
        .iter()
        .flat_map(|value_column| {
            rows.iter().map(move |row| {
                let mut long = Row::with_capacity(3);
                long.insert(id_column.to_string(), cell(row, id_column).clone());
                long.insert(fields.series.clone(), Scalar::Text(value_column.clone()));
                long.insert(fields.value.clone(), cell(row, value_column).clone());
                long
            })
        })
        .collect()
}

/// Groups rows by the label of `column`, in first-appearance order.
/// Null labels form their own group keyed by `None`.
pub fn group_by<'a>(rows: &'a [Row], column: &str) -> IndexMap<Option<String>, Vec<&'a Row>> {
    let mut groups: IndexMap<Option<String>, Vec<&'a Row>> = IndexMap::new();
    for row in rows {
        groups.entry(cell(row, column).label()).or_default().push(row);
    }
    groups
}

/// Sum of `value_column` per label of `label_column`, or the row count when
/// there is no value column. Null labels are skipped; non-numeric values
/// contribute nothing.
pub fn aggregate_slices(rows: &[Row], label_column: &str, value_column: Option<&str>) -> Vec<(String, f64)> {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for row in rows {
        let Some(label) = cell(row, label_column).label() else {
            continue;
        };
        let amount = match value_column {
            Some(column) => cell(row, column).as_f64().unwrap_or(0.0),
            None => 1.0,
        };
        *totals.entry(label).or_insert(0.0) += amount;
    }
    totals.into_iter().collect()
}

/// Bounds the number of slices. With more than `max_slices` entries the
/// slices are sorted by value (descending, stable), the largest
/// `max_slices - 1` kept and the remainder summed into one `other_label`
/// slice. A category already named `other_label` is folded into that slice
/// so the label appears once.
pub fn collapse_tail(slices: Vec<(String, f64)>, max_slices: usize, other_label: &str) -> Vec<(String, f64)> {
    if slices.len() <= max_slices || max_slices == 0 {
        return slices;
    }
    let (existing, mut kept): (Vec<_>, Vec<_>) = slices
        .into_iter()
        .partition(|(label, _)| label == other_label);
    kept.sort_by(|a, b| b.1.total_cmp(&a.1));
    let tail = if kept.len() >= max_slices {
        kept.split_off(max_slices - 1)
    } else {
        Vec::new()
    };
    let other: f64 = existing.iter().chain(&tail).map(|(_, v)| v).sum();
    kept.push((other_label.to_string(), other));
    kept
}

#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub index: Vec<String>,
    pub columns: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

/// Mean of `value_column` for every (`index_column`, `columns_column`)
/// pair. Labels are sorted; empty cells are `None`.
pub fn pivot_mean(rows: &[Row], index_column: &str, columns_column: &str, value_column: &str) -> PivotTable {
    let index = sorted_labels(rows, index_column);
    let columns = sorted_labels(rows, columns_column);
    let mut sums: IndexMap<(String, String), (f64, usize)> = IndexMap::new();
    for row in rows {
        let (Some(i), Some(c), Some(v)) = (
            cell(row, index_column).label(),
            cell(row, columns_column).label(),
            cell(row, value_column).as_f64(),
        ) else {
            continue;
        };
        let entry = sums.entry((i, c)).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }
    let cells = index
        .iter()
        .map(|i| {
            columns
                .iter()
                .map(|c| {
                    sums.get(&(i.clone(), c.clone()))
                        .map(|(sum, n)| sum / *n as f64)
                })
                .collect()
        })
        .collect();
    PivotTable {
        index,
        columns,
        cells,
    }
}

fn sorted_labels(rows: &[Row], column: &str) -> Vec<String> {
    let mut values: Vec<&Scalar> = Vec::new();
    let mut seen = HashSet::new();
    for row in rows {
        let value = cell(row, column);
        if let Some(label) = value.label() {
            if seen.insert(label) {
                values.push(value);
            }
        }
    }
    values.sort_by(|a, b| a.label_cmp(b));
    values.into_iter().map(ToString::to_string).collect()
}
