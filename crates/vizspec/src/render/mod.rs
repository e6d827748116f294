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

//! Turns a [`VisualizationSpec`] and its data into a Plotly-style figure.
//!
//! Rendering first reconciles the channels against the columns actually present
//! in the data, then dispatches on chart type. Cardinality guards may swap
//! the requested chart for a table; the artifact reports the chart type that
//! was really drawn.

pub mod figure;
pub mod reshape;

use crate::config::RenderConfig;
use crate::data_profiler::{ColumnProfile, DataProfiler};
use crate::error::{Result, VizError};
use crate::spec::{ChartType, ValueAggregate, VisualizationSpec};
use crate::tabular::{cell, Row, Scalar, TabularResult};
use figure::{
    Colorbar, Figure, HeatmapTrace, Marker, PieTrace, TableCells, TableHeader, TableTrace, Trace,
    XyTrace,
};
use itertools::Itertools;
use reshape::MeltFields;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartArtifact {
    pub chart_type: ChartType,
    pub encoding_description: String,
    #[serde(rename = "serializedFigure")]
    pub figure: Figure,
}
impl ChartArtifact {
    pub fn serialized_figure(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.figure)?)
    }
}
/// Channel bindings after checking them against the data.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChannels {
    pub x: String,
    pub y: Vec<String>,
    pub color: Option<String>,
}
impl ResolvedChannels {
    fn describe(&self, series_field: Option<&str>) -> String {
        let mut parts = vec![format!("x={}", self.x)];
        match self.y.as_slice() {
            [] => parts.push("y=count".to_string()),
            [single] => parts.push(format!("y={single}")),
            many => parts.push(format!("y=[{}]", many.iter().join(", "))),
        }
        if let Some(series) = series_field {
            parts.push(format!("color={series}"));
        } else if let Some(color) = &self.color {
            parts.push(format!("color={color}"));
        }
        parts.join("; ")
    }
}
pub struct Renderer {
    config: RenderConfig,
    profiler: DataProfiler,
}
impl Renderer {
    pub fn new() -> Self {
        Self {
            config: RenderConfig::default(),
            profiler: DataProfiler::new(),
        }
    }
    pub fn with_config(config: RenderConfig, profiler: DataProfiler) -> Self {
        Self { config, profiler }
    }
    pub fn render(&self, result: &TabularResult, spec: &VisualizationSpec) -> Result<ChartArtifact> {
        if result.is_empty() || result.column_count() == 0 {
            return Err(VizError::no_data());
        }
        let profile = self.profiler.profile(result);
        let channels = self.reconcile(result, spec, &profile);
        let ctx = RenderContext {
            result,
            profile: &profile,
            channels: &channels,
            aggregate: spec.value_aggregate,
        };
        let (chart_type, figure, encoding) = match spec.chart_type {
            ChartType::Bar => self.xy_chart(&ctx, ChartType::Bar),
            ChartType::Line => self.xy_chart(&ctx, ChartType::Line),
            ChartType::Scatter => self.scatter(&ctx),
            ChartType::Pie => self.pie(&ctx),
            ChartType::Histogram => self.histogram(&ctx),
            ChartType::Box => self.distribution(&ctx, ChartType::Box),
            ChartType::Violin => self.distribution(&ctx, ChartType::Violin),
            ChartType::Heatmap => self.heatmap(&ctx)?,
            ChartType::Table => table(result),
        };
        let mut figure = figure;
        figure.apply_layout(&spec.title, &self.config.layout);
        debug!(
            requested = %spec.chart_type,
            rendered = %chart_type,
            traces = figure.data.len(),
            "rendered chart artifact"
        );
        Ok(ChartArtifact {
            chart_type,
            encoding_description: encoding,
            figure,
        })
    }
    /// Checks every channel against the columns present in `result`.
    pub fn reconcile(
        &self,
        result: &TabularResult,
        spec: &VisualizationSpec,
        profile: &ColumnProfile,
    ) -> ResolvedChannels {
        let columns = result.columns();
        let x = match &spec.x_column {
            Some(x) if result.has_column(x) => x.clone(),
            other => {
                let substitute = columns[0].clone();
                info!(requested = ?other, substitute = %substitute, "x column not in data");
                substitute
            }
        };
        let mut y: Vec<String> = spec
            .y_columns
            .iter()
            .filter(|c| result.has_column(c))
            .cloned()
            .collect();
        if y.len() < spec.y_columns.len() {
            warn!(
                dropped = spec.y_columns.len() - y.len(),
                "y columns missing from data"
            );
        }
        if y.is_empty() && columns.len() > 1 {
            y = columns
                .iter()
                .filter(|c| **c != x && profile.is_numeric(c))
                .take(self.config.max_series)
                .cloned()
                .collect();
            if !y.is_empty() {
                debug!(y = ?y, "auto-selected numeric y columns");
            }
        }
        let color = spec
            .color_column
            .as_ref()
            .filter(|c| result.has_column(c))
            .cloned();
        if spec.color_column.is_some() && color.is_none() {
            info!(color = ?spec.color_column, "color column not in data, dropping");
        }
        ResolvedChannels { x, y, color }
    }
    fn xy_chart(&self, ctx: &RenderContext<'_>, chart_type: ChartType) -> (ChartType, Figure, String) {
        let channels = ctx.channels;
        let rows = ctx.result.rows();
        let mode = (chart_type == ChartType::Line).then_some("lines");
        let build = |trace: XyTrace| -> Trace {
            let trace = match mode {
                Some(m) => trace.with_mode(m),
                None => trace,
            };
            if chart_type == ChartType::Line {
                Trace::Scatter(trace)
            } else {
                Trace::Bar(trace)
            }
        };
        match channels.y.as_slice() {
            [] => {
                let counts = reshape::aggregate_slices(rows, &channels.x, None);
                let (labels, values): (Vec<Scalar>, Vec<Scalar>) = counts
                    .into_iter()
                    .map(|(label, count)| (Scalar::Text(label), Scalar::Float(count)))
                    .unzip();
                let figure = Figure::new(vec![build(XyTrace::new(labels, Some(values)))])
                    .with_axes(Some(&channels.x), Some("count"));
                (chart_type, figure, channels.describe(None))
            }
            [single] => {
                let traces = color_traces(ctx, |group| {
                    XyTrace::new(column(group, &channels.x), Some(column(group, single)))
                })
                .into_iter()
                .map(&build)
                .collect();
                let figure = Figure::new(traces).with_axes(Some(&channels.x), Some(single));
                (chart_type, figure, channels.describe(None))
            }
            many => {
                let fields = MeltFields::avoiding(ctx.result.columns());
                let long = reshape::melt(rows, &channels.x, many, &fields);
                let traces = reshape::group_by(&long, &fields.series)
                    .into_iter()
                    .map(|(series, group)| {
                        build(
                            XyTrace::new(
                                column(&group, &channels.x),
                                Some(column(&group, &fields.value)),
                            )
                            .named(series),
                        )
                    })
                    .collect();
                let mut figure =
                    Figure::new(traces).with_axes(Some(&channels.x), Some(&fields.value));
                if chart_type == ChartType::Bar {
                    figure = figure.with_barmode("group");
                }
                (chart_type, figure, channels.describe(Some(&fields.series)))
            }
        }
    }
    fn scatter(&self, ctx: &RenderContext<'_>) -> (ChartType, Figure, String) {
        let channels = ctx.channels;
        let (x, y) = match channels.y.first() {
            Some(y) => (channels.x.clone(), y.clone()),
            None => {
                let columns = ctx.result.columns();
                let x = columns
                    .iter()
                    .find(|c| ctx.profile.is_numeric(c))
                    .unwrap_or(&columns[0])
                    .clone();
                let y = columns
                    .iter()
                    .find(|c| **c != x)
                    .unwrap_or(&x)
                    .clone();
                debug!(x = %x, y = %y, "scatter without y column, using fallback axes");
                (x, y)
            }
        };
        let traces = color_traces(ctx, |group| {
            XyTrace::new(column(group, &x), Some(column(group, &y))).with_mode("markers")
        })
        .into_iter()
        .map(Trace::Scatter)
        .collect();
        let resolved = ResolvedChannels {
            x: x.clone(),
            y: vec![y.clone()],
            color: channels.color.clone(),
        };
        let figure = Figure::new(traces).with_axes(Some(&x), Some(&y));
        (ChartType::Scatter, figure, resolved.describe(None))
    }
    fn pie(&self, ctx: &RenderContext<'_>) -> (ChartType, Figure, String) {
        let channels = ctx.channels;
        let value_column = match ctx.aggregate {
            Some(ValueAggregate::Count) => None,
            None => channels
                .y
                .first()
                .filter(|c| ctx.profile.is_numeric(c))
                .map(String::as_str),
        };
        let slices = reshape::aggregate_slices(ctx.result.rows(), &channels.x, value_column);
        let category_count = slices.len();
        let slices = reshape::collapse_tail(slices, self.config.pie_max_slices, &self.config.other_label);
        if slices.len() < category_count {
            info!(
                categories = category_count,
                kept = slices.len() - 1,
                "collapsed pie tail into '{}'",
                self.config.other_label
            );
        }
        let (labels, values) = slices.into_iter().unzip();
        let figure = Figure::new(vec![Trace::Pie(PieTrace { labels, values })]);
        let encoding = format!(
            "labels={}; values={}",
            channels.x,
            value_column.unwrap_or("count")
        );
        (ChartType::Pie, figure, encoding)
    }
    fn histogram(&self, ctx: &RenderContext<'_>) -> (ChartType, Figure, String) {
        let channels = ctx.channels;
        let traces = color_traces(ctx, |group| XyTrace::new(column(group, &channels.x), None))
            .into_iter()
            .map(Trace::Histogram)
            .collect();
        let figure = Figure::new(traces).with_axes(Some(&channels.x), Some("count"));
        let encoding = match &channels.color {
            Some(color) => format!("x={}; color={color}", channels.x),
            None => format!("x={}", channels.x),
        };
        (ChartType::Histogram, figure, encoding)
    }
    fn distribution(&self, ctx: &RenderContext<'_>, chart_type: ChartType) -> (ChartType, Figure, String) {
        let channels = ctx.channels;
        let wrap = |trace: XyTrace| {
            if chart_type == ChartType::Violin {
                Trace::Violin(trace)
            } else {
                Trace::Box(trace)
            }
        };
        let (traces, encoding, y_title): (Vec<Trace>, String, Option<&str>) = match channels.y.first() {
            Some(y) => (
                color_traces(ctx, |group| {
                    XyTrace::new(column(group, &channels.x), Some(column(group, y)))
                })
                .into_iter()
                .map(wrap)
                .collect(),
                ResolvedChannels {
                    x: channels.x.clone(),
                    y: vec![y.clone()],
                    color: channels.color.clone(),
                }
                .describe(None),
                Some(y.as_str()),
            ),
            None => (
                color_traces(ctx, |group| XyTrace::new(column(group, &channels.x), None))
                    .into_iter()
                    .map(wrap)
                    .collect(),
                format!("x={}", channels.x),
                None,
            ),
        };
        let figure = Figure::new(traces).with_axes(Some(&channels.x), y_title);
        (chart_type, figure, encoding)
    }
    fn heatmap(&self, ctx: &RenderContext<'_>) -> Result<(ChartType, Figure, String)> {
        let channels = ctx.channels;
        let Some(y) = channels.y.first() else {
            return Err(VizError::unresolved(
                ChartType::Heatmap,
                "no y column is available to index the matrix",
            ));
        };
        let distinct = ctx.result.distinct_count(&channels.x);
        if distinct > self.config.heatmap_max_categories {
            info!(
                column = %channels.x,
                distinct,
                limit = self.config.heatmap_max_categories,
                "too many categories for a heatmap, rendering a table"
            );
            return Ok(table(ctx.result));
        }
        let value = channels.color.as_ref().unwrap_or(y);
        let pivot = reshape::pivot_mean(ctx.result.rows(), y, &channels.x, value);
        let figure = Figure::new(vec![Trace::Heatmap(HeatmapTrace {
            x: pivot.columns,
            y: pivot.index,
            z: pivot.cells,
        })])
        .with_axes(Some(&channels.x), Some(y));
        let encoding = format!("x={}; y={y}; color={value}", channels.x);
        Ok((ChartType::Heatmap, figure, encoding))
    }
}
impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
struct RenderContext<'a> {
    result: &'a TabularResult,
    profile: &'a ColumnProfile,
    channels: &'a ResolvedChannels,
    aggregate: Option<ValueAggregate>,
}
/// One trace per color category, or a single trace carrying a continuous
/// marker scale when the color column is numeric.
fn color_traces<F>(ctx: &RenderContext<'_>, make: F) -> Vec<XyTrace>
where
    F: Fn(&[&Row]) -> XyTrace,
{
    let rows: Vec<&Row> = ctx.result.rows().iter().collect();
    match &ctx.channels.color {
        None => vec![make(&rows)],
        Some(color) if ctx.profile.is_numeric(color) => {
            let marker = Marker {
                color: column(&rows, color),
                showscale: true,
                colorbar: Some(Colorbar {
                    title: color.clone(),
                }),
            };
            vec![make(&rows).with_marker(Some(marker))]
        }
        Some(color) => reshape::group_by(ctx.result.rows(), color)
            .into_iter()
            .map(|(label, group)| make(&group).named(Some(label.unwrap_or_else(|| "null".to_string()))))
            .collect(),
    }
}
fn column(rows: &[&Row], name: &str) -> Vec<Scalar> {
    rows.iter().map(|row| cell(row, name).clone()).collect()
}
fn table(result: &TabularResult) -> (ChartType, Figure, String) {
    let columns = result.columns();
    let values = columns
        .iter()
        .map(|c| result.column_values(c).cloned().collect())
        .collect();
    let figure = Figure::new(vec![Trace::Table(TableTrace {
        header: TableHeader {
            values: columns.to_vec(),
        },
        cells: TableCells { values },
    })]);
    let encoding = format!("columns=[{}]", columns.iter().join(", "));
    (ChartType::Table, figure, encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecBuilder;
    use crate::selector::ChannelAssignment;

    fn spec_for(result: &TabularResult, chart_type: ChartType, x: Option<&str>, y: &[&str], color: Option<&str>) -> VisualizationSpec {
        VisualizationSpec {
            chart_type,
            x_column: x.map(str::to_string),
            y_columns: y.iter().map(|c| (*c).to_string()).collect(),
            color_column: color.map(str::to_string),
            title: SpecBuilder::new().title_for("test"),
            source_columns: result.columns().to_vec(),
            column_types: DataProfiler::new().profile(result),
            value_aggregate: None,
        }
    }

    fn sales() -> TabularResult {
        TabularResult::from_rows(
            &["region", "q1", "q2", "channel"],
            vec![
                vec!["North".into(), Scalar::Int(10), Scalar::Int(12), "web".into()],
                vec!["South".into(), Scalar::Int(7), Scalar::Int(9), "store".into()],
                vec!["East".into(), Scalar::Int(3), Scalar::Int(5), "web".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn missing_x_is_replaced_by_first_column() {
        let data = sales();
        let spec = spec_for(&data, ChartType::Bar, Some("nope"), &["q1"], Some("ghost"));
        let channels = Renderer::new().reconcile(&data, &spec, &DataProfiler::new().profile(&data));
        assert_eq!(channels.x, "region");
        assert_eq!(channels.y, ["q1"]);
        assert_eq!(channels.color, None);
    }

    #[test]
    fn empty_y_is_refilled_with_numeric_columns_except_x() {
        let data = sales();
        let spec = spec_for(&data, ChartType::Bar, Some("q1"), &["gone"], None);
        let channels = Renderer::new().reconcile(&data, &spec, &DataProfiler::new().profile(&data));
        assert_eq!(channels.y, ["q2"]);
    }

    #[test]
    fn multi_series_bar_melts_into_grouped_traces() {
        let data = sales();
        let spec = spec_for(&data, ChartType::Bar, Some("region"), &["q1", "q2"], None);
        let artifact = Renderer::new().render(&data, &spec).unwrap();
        assert_eq!(artifact.chart_type, ChartType::Bar);
        assert_eq!(artifact.figure.data.len(), 2);
        assert_eq!(artifact.figure.data[0].name(), Some("q1"));
        assert_eq!(artifact.figure.data[1].name(), Some("q2"));
        assert_eq!(artifact.figure.layout.barmode.as_deref(), Some("group"));
        assert_eq!(artifact.encoding_description, "x=region; y=[q1, q2]; color=series");
        let Trace::Bar(first) = &artifact.figure.data[0] else {
            panic!("expected bar trace");
        };
        assert_eq!(first.y.as_ref().unwrap(), &vec![Scalar::Int(10), Scalar::Int(7), Scalar::Int(3)]);
    }

    #[test]
    fn single_series_line_splits_by_categorical_color() {
        let data = sales();
        let spec = spec_for(&data, ChartType::Line, Some("region"), &["q1"], Some("channel"));
        let artifact = Renderer::new().render(&data, &spec).unwrap();
        let names: Vec<_> = artifact.figure.data.iter().map(Trace::name).collect();
        assert_eq!(names, vec![Some("web"), Some("store")]);
        let Trace::Scatter(web) = &artifact.figure.data[0] else {
            panic!("line traces are plotly scatter traces");
        };
        assert_eq!(web.mode.as_deref(), Some("lines"));
        assert_eq!(web.x.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn bar_without_numeric_columns_counts_categories() {
        let data = TabularResult::from_rows(
            &["region", "channel"],
            vec![
                vec![Scalar::from("N"), Scalar::from("web")],
                vec![Scalar::from("N"), Scalar::from("store")],
                vec![Scalar::from("S"), Scalar::from("web")],
            ],
        )
        .unwrap();
        let spec = spec_for(&data, ChartType::Bar, Some("region"), &[], None);
        let artifact = Renderer::new().render(&data, &spec).unwrap();
        let Trace::Bar(bar) = &artifact.figure.data[0] else {
            panic!("expected bar trace");
        };
        assert_eq!(bar.y.as_ref().unwrap(), &vec![Scalar::Float(2.0), Scalar::Float(1.0)]);
        assert_eq!(artifact.encoding_description, "x=region; y=count");
    }

    #[test]
    fn numeric_color_becomes_marker_scale() {
        let data = sales();
        let spec = spec_for(&data, ChartType::Scatter, Some("q1"), &["q2"], Some("q1"));
        let artifact = Renderer::new().render(&data, &spec).unwrap();
        assert_eq!(artifact.figure.data.len(), 1);
        let Trace::Scatter(points) = &artifact.figure.data[0] else {
            panic!("expected scatter trace");
        };
        assert_eq!(points.marker.as_ref().unwrap().color.len(), 3);
        assert_eq!(points.mode.as_deref(), Some("markers"));
    }

    #[test]
    fn scatter_without_y_uses_fallback_axes() {
        let data = TabularResult::from_rows(
            &["label", "v"],
            vec![vec![Scalar::from("a"), Scalar::Int(1)]],
        )
        .unwrap();
        let spec = spec_for(&data, ChartType::Scatter, Some("label"), &[], None);
        let renderer = Renderer::new();
        let channels = renderer.reconcile(&data, &spec, &DataProfiler::new().profile(&data));
        assert_eq!(channels.y, ["v"]);

        let single = TabularResult::from_rows(&["label"], vec![vec![Scalar::from("a")]]).unwrap();
        let spec = spec_for(&single, ChartType::Scatter, Some("label"), &[], None);
        let artifact = renderer.render(&single, &spec).unwrap();
        assert_eq!(artifact.encoding_description, "x=label; y=label");
    }

    #[test]
    fn box_groups_values_by_category() {
        let data = sales();
        let spec = spec_for(&data, ChartType::Box, Some("channel"), &["q1"], None);
        let artifact = Renderer::new().render(&data, &spec).unwrap();
        let Trace::Box(trace) = &artifact.figure.data[0] else {
            panic!("expected box trace");
        };
        assert_eq!(trace.x.as_ref().unwrap()[1], Scalar::from("store"));
        assert_eq!(artifact.encoding_description, "x=channel; y=q1");
    }

    #[test]
    fn violin_without_y_shows_x_distribution() {
        let data = TabularResult::from_rows(&["v"], vec![vec![Scalar::Int(1)], vec![Scalar::Int(2)]]).unwrap();
        let spec = spec_for(&data, ChartType::Violin, Some("v"), &[], None);
        let artifact = Renderer::new().render(&data, &spec).unwrap();
        let Trace::Violin(trace) = &artifact.figure.data[0] else {
            panic!("expected violin trace");
        };
        assert!(trace.y.is_none());
        assert_eq!(artifact.chart_type, ChartType::Violin);
    }

    #[test]
    fn heatmap_without_y_is_unresolved() {
        let data = TabularResult::from_rows(
            &["a", "b"],
            vec![vec![Scalar::from("x"), Scalar::from("y")]],
        )
        .unwrap();
        let spec = spec_for(&data, ChartType::Heatmap, Some("a"), &[], None);
        let err = Renderer::new().render(&data, &spec).unwrap_err();
        assert!(err.is_unresolved_column());
    }

    #[test]
    fn small_heatmap_pivots() {
        let data = TabularResult::from_rows(
            &["region", "product", "sales"],
            vec![
                vec!["N".into(), "A".into(), Scalar::Int(1)],
                vec!["S".into(), "B".into(), Scalar::Int(2)],
            ],
        )
        .unwrap();
        let assignment = ChannelAssignment {
            chart_type: ChartType::Heatmap,
            base_chart_type: ChartType::Heatmap,
            x_column: Some("region".into()),
            y_columns: vec!["sales".into()],
            color_column: Some("sales".into()),
            value_aggregate: None,
            keyword: None,
        };
        let spec = SpecBuilder::new()
            .build(assignment, "", data.columns(), &DataProfiler::new().profile(&data))
            .unwrap();
        let artifact = Renderer::new().render(&data, &spec).unwrap();
        assert_eq!(artifact.chart_type, ChartType::Heatmap);
        let Trace::Heatmap(heat) = &artifact.figure.data[0] else {
            panic!("expected heatmap trace");
        };
        assert_eq!(heat.x, ["N", "S"]);
        assert_eq!(heat.y, ["1", "2"]);
        assert_eq!(heat.z, vec![vec![Some(1.0), None], vec![None, Some(2.0)]]);
    }

    #[test]
    fn histogram_splits_by_categorical_color() {
        let data = TabularResult::from_rows(
            &["amount", "tier"],
            vec![
                vec![Scalar::Int(1), "a".into()],
                vec![Scalar::Int(2), "b".into()],
                vec![Scalar::Int(3), "a".into()],
            ],
        )
        .unwrap();
        let spec = spec_for(&data, ChartType::Histogram, Some("amount"), &[], Some("tier"));
        let artifact = Renderer::new().render(&data, &spec).unwrap();
        assert_eq!(artifact.figure.data.len(), 2);
        let Trace::Histogram(a) = &artifact.figure.data[0] else {
            panic!("expected histogram trace");
        };
        let Trace::Histogram(b) = &artifact.figure.data[1] else {
            panic!("expected histogram trace");
        };
        assert_eq!(a.name.as_deref(), Some("a"));
        assert_eq!(a.x.as_ref().unwrap(), &vec![Scalar::Int(1), Scalar::Int(3)]);
        assert_eq!(b.name.as_deref(), Some("b"));
        assert_eq!(b.x.as_ref().unwrap(), &vec![Scalar::Int(2)]);
        assert_eq!(artifact.encoding_description, "x=amount; color=tier");
    }

    #[test]
    fn heatmap_cells_come_from_the_color_column() {
        let data = TabularResult::from_rows(
            &["region", "units", "price"],
            vec![
                vec!["N".into(), Scalar::Int(1), Scalar::Int(9)],
                vec!["S".into(), Scalar::Int(2), Scalar::Int(7)],
            ],
        )
        .unwrap();
        let spec = spec_for(&data, ChartType::Heatmap, Some("region"), &["units"], Some("price"));
        let artifact = Renderer::new().render(&data, &spec).unwrap();
        let Trace::Heatmap(heat) = &artifact.figure.data[0] else {
            panic!("expected heatmap trace");
        };
        assert_eq!(heat.y, ["1", "2"]);
        assert_eq!(heat.z, vec![vec![Some(9.0), None], vec![None, Some(7.0)]]);
        assert_eq!(artifact.encoding_description, "x=region; y=units; color=price");
    }

    #[test]
    fn count_aggregate_pie_ignores_numeric_columns() {
        let data = TabularResult::from_rows(
            &["tier", "amount"],
            vec![
                vec!["a".into(), Scalar::Int(50)],
                vec!["b".into(), Scalar::Int(20)],
                vec!["a".into(), Scalar::Int(30)],
            ],
        )
        .unwrap();
        let mut spec = spec_for(&data, ChartType::Pie, Some("tier"), &[], None);
        let summed = Renderer::new().render(&data, &spec).unwrap();
        let Trace::Pie(pie) = &summed.figure.data[0] else {
            panic!("expected pie trace");
        };
        assert_eq!(pie.values, [80.0, 20.0]);

        spec.value_aggregate = Some(ValueAggregate::Count);
        let counted = Renderer::new().render(&data, &spec).unwrap();
        let Trace::Pie(pie) = &counted.figure.data[0] else {
            panic!("expected pie trace");
        };
        assert_eq!(pie.labels, ["a", "b"]);
        assert_eq!(pie.values, [2.0, 1.0]);
        assert_eq!(counted.encoding_description, "labels=tier; values=count");
    }

    #[test]
    fn table_keeps_every_column() {
        let data = sales();
        let spec = spec_for(&data, ChartType::Table, Some("region"), &[], None);
        let artifact = Renderer::new().render(&data, &spec).unwrap();
        let Trace::Table(grid) = &artifact.figure.data[0] else {
            panic!("expected table trace");
        };
        assert_eq!(grid.header.values, ["region", "q1", "q2", "channel"]);
        assert_eq!(grid.cells.values.len(), 4);
        assert_eq!(grid.cells.values[3][1], Scalar::from("store"));
    }

    #[test]
    fn every_artifact_gets_the_layout_pass() {
        let data = sales();
        for chart_type in ChartType::ALL {
            let spec = spec_for(&data, chart_type, Some("region"), &["q1"], None);
            let artifact = Renderer::new().render(&data, &spec).unwrap();
            let title = artifact.figure.layout.title.as_ref().unwrap();
            assert_eq!(title.text, "Visualization for: test");
            assert_eq!(title.xanchor, "center");
            assert!(artifact.figure.layout.margin.is_some());
        }
    }

    #[test]
    fn zero_rows_is_no_data() {
        let data = TabularResult::new(vec!["a".into()], Vec::new()).unwrap();
        let spec = spec_for(&data, ChartType::Bar, Some("a"), &[], None);
        assert!(Renderer::new().render(&data, &spec).unwrap_err().is_no_data());
    }
}
