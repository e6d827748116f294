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

//! Heuristic chart selection: a column-count driven base rule followed by
//! an optional keyword override taken from the user's hint.

use crate::config::SelectionConfig;
use crate::data_profiler::{ColumnGroups, ColumnProfile};
use crate::error::{ConfigResult, Result, VizError};
use crate::keywords::{KeywordMatch, KeywordTable};
use crate::spec::{ChartType, ValueAggregate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
/// Selector output: a chart type plus column-to-channel bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAssignment {
    pub chart_type: ChartType,
    /// Chart type chosen from the data alone, before any keyword override.
    pub base_chart_type: ChartType,
    pub x_column: Option<String>,
    pub y_columns: Vec<String>,
    pub color_column: Option<String>,
    pub value_aggregate: Option<ValueAggregate>,
    pub keyword: Option<KeywordMatch>,
}
impl ChannelAssignment {
    fn base(chart_type: ChartType, x_column: &str) -> Self {
        Self {
            chart_type,
            base_chart_type: chart_type,
            x_column: Some(x_column.to_string()),
            y_columns: Vec::new(),
            color_column: None,
            value_aggregate: None,
            keyword: None,
        }
    }
    fn with_y(mut self, y_columns: Vec<String>) -> Self {
        self.y_columns = y_columns;
        self
    }
    fn with_color(mut self, color: Option<&str>) -> Self {
        self.color_column = color.map(str::to_string);
        self
    }
    pub fn was_overridden(&self) -> bool {
        self.chart_type != self.base_chart_type
    }
}
pub struct VisualizationSelector {
    keywords: KeywordTable,
    max_series: usize,
}
impl VisualizationSelector {
    pub fn new() -> Self {
        Self {
            keywords: KeywordTable::default(),
            max_series: SelectionConfig::default().max_series,
        }
    }
    pub fn with_config(config: &SelectionConfig) -> ConfigResult<Self> {
        Ok(Self {
            keywords: KeywordTable::new(config.keywords.clone())?,
            max_series: config.max_series.max(1),
        })
    }
    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }
    pub fn select(
        &self,
        profile: &ColumnProfile,
        columns: &[String],
        hint: &str,
    ) -> Result<ChannelAssignment> {
        if columns.is_empty() {
            return Err(VizError::empty_input());
        }
        let groups = profile.partition(columns);
        let mut assignment = self.base_rule(profile, columns, &groups);
        debug!(
            chart_type = %assignment.chart_type,
            %groups,
            "base rule selected chart"
        );
        if let Some(hit) = self.keywords.find(hint) {
            if hit.chart_type != assignment.chart_type {
                info!(
                    from = %assignment.chart_type,
                    to = %hit.chart_type,
                    trigger = %hit.trigger,
                    "hint keyword overrides chart type"
                );
            }
            assignment.chart_type = hit.chart_type;
            assignment.keyword = Some(hit);
        }
        if assignment.y_columns.is_empty() {
            assignment.y_columns = groups.first_numeric(self.max_series);
        }
        Ok(assignment)
    }
    fn base_rule(
        &self,
        profile: &ColumnProfile,
        columns: &[String],
        groups: &ColumnGroups<'_>,
    ) -> ChannelAssignment {
        if let [only] = columns {
            return if profile.is_numeric(only) {
                ChannelAssignment::base(ChartType::Histogram, only)
            } else {
                let mut pie = ChannelAssignment::base(ChartType::Pie, only);
                pie.value_aggregate = Some(ValueAggregate::Count);
                pie
            };
        }
        let numeric = &groups.numeric;
        let categorical = &groups.categorical;
        if let (Some(when), false) = (groups.temporal.first(), numeric.is_empty()) {
            return ChannelAssignment::base(ChartType::Line, when)
                .with_y(groups.first_numeric(self.max_series));
        }
        if categorical.len() == 1 && !numeric.is_empty() {
            return ChannelAssignment::base(ChartType::Bar, categorical[0])
                .with_y(groups.first_numeric(self.max_series));
        }
        if categorical.len() >= 2 && numeric.len() == 1 {
            return ChannelAssignment::base(ChartType::Heatmap, categorical[0])
                .with_y(vec![numeric[0].to_string()])
                .with_color(Some(numeric[0]));
        }
        if numeric.len() >= 2 {
            return ChannelAssignment::base(ChartType::Scatter, numeric[0])
                .with_y(vec![numeric[1].to_string()])
                .with_color(numeric.get(2).copied());
        }
        ChannelAssignment::base(ChartType::Table, &columns[0])
    }
}
impl Default for VisualizationSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_profiler::DataProfiler;
    use crate::tabular::{Scalar, TabularResult};

    fn select(columns: &[&str], row: Vec<Scalar>, hint: &str) -> ChannelAssignment {
        let result = TabularResult::from_rows(columns, vec![row]).unwrap();
        let profile = DataProfiler::new().profile(&result);
        VisualizationSelector::new()
            .select(&profile, result.columns(), hint)
            .unwrap()
    }

    #[test]
    fn temporal_beats_categorical() {
        let a = select(
            &["region", "day", "sales"],
            vec!["North".into(), "2024-01-01".into(), Scalar::Int(3)],
            "",
        );
        assert_eq!(a.chart_type, ChartType::Line);
        assert_eq!(a.x_column.as_deref(), Some("day"));
        assert_eq!(a.y_columns, ["sales"]);
    }

    #[test]
    fn bar_takes_at_most_three_series() {
        let a = select(
            &["region", "a", "b", "c", "d"],
            vec![
                "North".into(),
                Scalar::Int(1),
                Scalar::Int(2),
                Scalar::Int(3),
                Scalar::Int(4),
            ],
            "",
        );
        assert_eq!(a.chart_type, ChartType::Bar);
        assert_eq!(a.y_columns, ["a", "b", "c"]);
        assert!(a.color_column.is_none());
    }

    #[test]
    fn two_categories_and_one_measure_is_heatmap() {
        let a = select(
            &["region", "product", "sales"],
            vec!["North".into(), "Laptop".into(), Scalar::Float(2.5)],
            "",
        );
        assert_eq!(a.chart_type, ChartType::Heatmap);
        assert_eq!(a.x_column.as_deref(), Some("region"));
        assert_eq!(a.y_columns, ["sales"]);
        assert_eq!(a.color_column.as_deref(), Some("sales"));
    }

    #[test]
    fn scatter_colors_by_third_measure() {
        let a = select(
            &["w", "h", "age"],
            vec![Scalar::Float(1.0), Scalar::Float(2.0), Scalar::Int(3)],
            "",
        );
        assert_eq!(a.chart_type, ChartType::Scatter);
        assert_eq!(a.x_column.as_deref(), Some("w"));
        assert_eq!(a.y_columns, ["h"]);
        assert_eq!(a.color_column.as_deref(), Some("age"));
    }

    #[test]
    fn two_categories_and_two_measures_fall_to_scatter() {
        let a = select(
            &["region", "product", "units", "revenue"],
            vec!["N".into(), "P".into(), Scalar::Int(1), Scalar::Float(9.5)],
            "",
        );
        assert_eq!(a.chart_type, ChartType::Scatter);
        assert_eq!(a.x_column.as_deref(), Some("units"));
    }

    #[test]
    fn categories_only_is_table() {
        let a = select(&["region", "product"], vec!["N".into(), "P".into()], "");
        assert_eq!(a.chart_type, ChartType::Table);
        assert_eq!(a.x_column.as_deref(), Some("region"));
        assert!(a.y_columns.is_empty());
    }

    #[test]
    fn single_text_column_counts_rows() {
        let a = select(&["region"], vec!["North".into()], "");
        assert_eq!(a.chart_type, ChartType::Pie);
        assert_eq!(a.value_aggregate, Some(ValueAggregate::Count));
        assert!(a.y_columns.is_empty());
    }

    #[test]
    fn override_keeps_axes_and_records_keyword() {
        let a = select(
            &["region", "sales"],
            vec!["North".into(), Scalar::Int(3)],
            "percentage of sales per region",
        );
        assert_eq!(a.chart_type, ChartType::Pie);
        assert_eq!(a.base_chart_type, ChartType::Bar);
        assert!(a.was_overridden());
        assert_eq!(a.x_column.as_deref(), Some("region"));
        assert_eq!(a.y_columns, ["sales"]);
        assert_eq!(a.keyword.unwrap().trigger, "percentage");
    }

    #[test]
    fn histogram_defaults_y_to_numeric_columns() {
        let a = select(&["amount"], vec![Scalar::Int(3)], "");
        assert_eq!(a.chart_type, ChartType::Histogram);
        assert_eq!(a.y_columns, ["amount"]);
    }

    #[test]
    fn zero_columns_is_empty_input() {
        let err = VisualizationSelector::new()
            .select(&ColumnProfile::default(), &[], "anything")
            .unwrap_err();
        assert!(err.is_empty_input());
    }
}
