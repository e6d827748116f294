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

use crate::config::SpecConfig;
use crate::data_profiler::ColumnProfile;
use crate::error::{Result, SelectionError, VizError};
use crate::selector::ChannelAssignment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Scatter,
    Pie,
    Histogram,
    Box,
    Violin,
    Heatmap,
    Table,
}
impl ChartType {
    pub const ALL: [ChartType; 9] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Scatter,
        ChartType::Pie,
        ChartType::Histogram,
        ChartType::Box,
        ChartType::Violin,
        ChartType::Heatmap,
        ChartType::Table,
    ];
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Scatter => "scatter",
            ChartType::Pie => "pie",
            ChartType::Histogram => "histogram",
            ChartType::Box => "box",
            ChartType::Violin => "violin",
            ChartType::Heatmap => "heatmap",
            ChartType::Table => "table",
        }
    }
    /// Chart types whose x axis is read as a set of categories.
    pub fn has_nominal_x(&self) -> bool {
        matches!(self, ChartType::Bar | ChartType::Pie)
    }
}
impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for ChartType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown chart type '{s}'"))
    }
}
/// Aggregate applied to rows when a chart has no explicit value column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueAggregate {
    Count,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationSpec {
    pub chart_type: ChartType,
    pub x_column: Option<String>,
    pub y_columns: Vec<String>,
    pub color_column: Option<String>,
    pub title: String,
    pub source_columns: Vec<String>,
    pub column_types: ColumnProfile,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value_aggregate: Option<ValueAggregate>,
}
impl VisualizationSpec {
    /// Every channel must name a source column.
    pub fn validate(&self) -> Result<()> {
        let channels = self
            .x_column
            .iter()
            .map(|c| ("x", c))
            .chain(self.y_columns.iter().map(|c| ("y", c)))
            .chain(self.color_column.iter().map(|c| ("color", c)));
        for (channel, column) in channels {
            if !self.source_columns.contains(column) {
                return Err(SelectionError::UnknownColumn {
                    column: column.clone(),
                    channel: channel.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
    /// Soft inconsistencies: combinations that render, but not as the chart
    /// type suggests.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        match self.chart_type {
            ChartType::Pie if self.y_columns.len() > 1 => issues.push(format!(
                "pie chart uses only '{}' of {} value columns",
                self.y_columns[0],
                self.y_columns.len()
            )),
            ChartType::Heatmap if self.y_columns.is_empty() => {
                issues.push("heatmap has no y column to pivot on".to_string());
            }
            ChartType::Scatter if self.y_columns.is_empty() => {
                issues.push("scatter plot has no y column".to_string());
            }
            ChartType::Histogram | ChartType::Box | ChartType::Violin
                if self.y_columns.len() > 1 =>
            {
                issues.push(format!(
                    "{} uses a single y column, {} given",
                    self.chart_type,
                    self.y_columns.len()
                ));
            }
            _ => {}
        }
        if self.x_column.is_none() {
            issues.push("no x column assigned".to_string());
        }
        issues
    }
    pub fn from_json(input: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(input)?;
        spec.validate()?;
        Ok(spec)
    }
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
pub struct SpecBuilder {
    config: SpecConfig,
}
impl SpecBuilder {
    pub fn new() -> Self {
        Self {
            config: SpecConfig::default(),
        }
    }
    pub fn with_config(config: SpecConfig) -> Self {
        Self { config }
    }
    pub fn title_for(&self, hint: &str) -> String {
        format!("{}{}", self.config.title_prefix, hint)
    }
    pub fn build(
        &self,
        assignment: ChannelAssignment,
        hint: &str,
        columns: &[String],
        profile: &ColumnProfile,
    ) -> Result<VisualizationSpec> {
        if columns.is_empty() {
            return Err(VizError::empty_input());
        }
        let spec = VisualizationSpec {
            chart_type: assignment.chart_type,
            x_column: assignment.x_column,
            y_columns: assignment.y_columns,
            color_column: assignment.color_column,
            title: self.title_for(hint),
            source_columns: columns.to_vec(),
            column_types: profile.clone(),
            value_aggregate: assignment.value_aggregate,
        };
        spec.validate()?;
        for issue in spec.issues() {
            warn!(chart_type = %spec.chart_type, "{issue}");
        }
        debug!(
            chart_type = %spec.chart_type,
            x = ?spec.x_column,
            y = ?spec.y_columns,
            color = ?spec.color_column,
            "built visualization spec"
        );
        Ok(spec)
    }
}
impl Default for SpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}
