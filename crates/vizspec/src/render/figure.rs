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

//! Plotly-compatible figure documents.

use crate::config::LayoutConfig;
use crate::tabular::Scalar;
use serde::{Deserialize, Serialize};
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}
impl Figure {
    pub fn new(data: Vec<Trace>) -> Self {
        Self {
            data,
            layout: Layout::default(),
        }
    }
    pub fn with_axes(mut self, x: Option<&str>, y: Option<&str>) -> Self {
        self.layout.xaxis = x.map(Axis::titled);
        self.layout.yaxis = y.map(Axis::titled);
        self
    }
    pub fn with_barmode(mut self, mode: &str) -> Self {
        self.layout.barmode = Some(mode.to_string());
        self
    }
    /// Title and margins shared by every chart type.
    pub fn apply_layout(&mut self, title: &str, config: &LayoutConfig) {
        self.layout.template = Some(config.template.clone());
        self.layout.title = Some(Title {
            text: title.to_string(),
            x: config.title_x,
            y: config.title_y,
            xanchor: "center".to_string(),
            yanchor: "top".to_string(),
        });
        self.layout.margin = Some(Margin {
            l: config.margin_left,
            r: config.margin_right,
            t: config.margin_top,
            b: config.margin_bottom,
        });
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(XyTrace),
    Scatter(XyTrace),
    Histogram(XyTrace),
    Box(XyTrace),
    Violin(XyTrace),
    Pie(PieTrace),
    Heatmap(HeatmapTrace),
    Table(TableTrace),
}
impl Trace {
    pub fn name(&self) -> Option<&str> {
        match self {
            Trace::Bar(t)
            | Trace::Scatter(t)
            | Trace::Histogram(t)
            | Trace::Box(t)
            | Trace::Violin(t) => t.name.as_deref(),
            _ => None,
        }
    }
}
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XyTrace {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x: Option<Vec<Scalar>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub y: Option<Vec<Scalar>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub marker: Option<Marker>,
}
impl XyTrace {
    pub fn new(x: Vec<Scalar>, y: Option<Vec<Scalar>>) -> Self {
        Self {
            x: Some(x),
            y,
            ..Default::default()
        }
    }
    pub fn named(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
    pub fn with_mode(mut self, mode: &str) -> Self {
        self.mode = Some(mode.to_string());
        self
    }
    pub fn with_marker(mut self, marker: Option<Marker>) -> Self {
        self.marker = marker;
        self
    }
}
/// Continuous color scale driven by a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: Vec<Scalar>,
    pub showscale: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub colorbar: Option<Colorbar>,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colorbar {
    pub title: String,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapTrace {
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub z: Vec<Vec<Option<f64>>>,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableTrace {
    pub header: TableHeader,
    pub cells: TableCells,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableHeader {
    pub values: Vec<String>,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCells {
    /// Column-major cell values.
    pub values: Vec<Vec<Scalar>>,
}
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub barmode: Option<String>,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub xanchor: String,
    pub yanchor: String,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: AxisTitle,
}
impl Axis {
    pub fn titled(text: &str) -> Self {
        Self {
            title: AxisTitle {
                text: text.to_string(),
            },
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTitle {
    pub text: String,
}
