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

//! Declarative grammar output for browser-side charting libraries.

use crate::error::{Result, VizError};
use crate::spec::{ChartType, ValueAggregate, VisualizationSpec};
use crate::tabular::TabularResult;
use serde::{Deserialize, Serialize};
use tracing::debug;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Bar,
    Line,
    Circle,
    Arc,
    Rect,
}
impl Mark {
    pub fn for_chart(chart_type: ChartType) -> Option<Self> {
        match chart_type {
            ChartType::Bar => Some(Mark::Bar),
            ChartType::Line => Some(Mark::Line),
            ChartType::Scatter => Some(Mark::Circle),
            ChartType::Pie => Some(Mark::Arc),
            ChartType::Heatmap => Some(Mark::Rect),
            ChartType::Histogram | ChartType::Box | ChartType::Violin | ChartType::Table => None,
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Nominal,
    Quantitative,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionChannel {
    pub field: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aggregate: Option<ValueAggregate>,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorChannel {
    pub field: String,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    pub x: PositionChannel,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub y: Option<PositionChannel>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub color: Option<ColorChannel>,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarativeGrammar {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mark: Option<Mark>,
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
    pub encoding: Encoding,
}
impl DeclarativeGrammar {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Maps a spec onto the grammar. Only the first y column is encoded; the
/// rows are carried as records. An implicit count becomes a field-less y
/// channel carrying the aggregate.
pub fn to_declarative_grammar(
    result: &TabularResult,
    spec: &VisualizationSpec,
) -> Result<DeclarativeGrammar> {
    if result.is_empty() || result.column_count() == 0 {
        return Err(VizError::no_data());
    }
    let x_type = if spec.chart_type.has_nominal_x() {
        FieldType::Nominal
    } else {
        FieldType::Quantitative
    };
    let encoding = Encoding {
        x: PositionChannel {
            field: spec.x_column.clone(),
            field_type: x_type,
            aggregate: None,
        },
        y: match spec.value_aggregate {
            Some(aggregate) => Some(PositionChannel {
                field: None,
                field_type: FieldType::Quantitative,
                aggregate: Some(aggregate),
            }),
            None => spec.y_columns.first().map(|y| PositionChannel {
                field: Some(y.clone()),
                field_type: FieldType::Quantitative,
                aggregate: None,
            }),
        },
        color: spec
            .color_column
            .as_ref()
            .map(|c| ColorChannel { field: c.clone() }),
    };
    let grammar = DeclarativeGrammar {
        chart_type: spec.chart_type,
        mark: Mark::for_chart(spec.chart_type),
        data: result.to_records(),
        encoding,
    };
    debug!(
        chart_type = %grammar.chart_type,
        mark = ?grammar.mark,
        records = grammar.data.len(),
        "converted spec to declarative grammar"
    );
    Ok(grammar)
}
