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

use crate::error::{ConfigError, ConfigResult};
use crate::keywords::{default_rules, KeywordRule};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub profiling: ProfilingConfig,
    pub selection: SelectionConfig,
    pub spec: SpecConfig,
    pub render: RenderConfig,
    pub pipeline: PipelineConfig,
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilingConfig {
    /// chrono formats tried after RFC 3339.
    pub temporal_formats: Vec<String>,
}
impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            temporal_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%SZ".to_string(),
                "%Y-%m-%d %H:%M:%S%.f".to_string(),
                "%m/%d/%Y".to_string(),
            ],
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub max_series: usize,
    pub keywords: Vec<KeywordRule>,
}
impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_series: 3,
            keywords: default_rules(),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecConfig {
    pub title_prefix: String,
}
impl Default for SpecConfig {
    fn default() -> Self {
        Self {
            title_prefix: "Visualization for: ".to_string(),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub pie_max_slices: usize,
    pub heatmap_max_categories: usize,
    pub max_series: usize,
    pub other_label: String,
    pub layout: LayoutConfig,
}
impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pie_max_slices: 10,
            heatmap_max_categories: 20,
            max_series: 3,
            other_label: "Other".to_string(),
            layout: LayoutConfig::default(),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub template: String,
    pub title_x: f64,
    pub title_y: f64,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
}
impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            template: "plotly_white".to_string(),
            title_x: 0.5,
            title_y: 0.95,
            margin_left: 50,
            margin_right: 50,
            margin_top: 80,
            margin_bottom: 50,
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub history_limit: usize,
}
impl Default for PipelineConfig {
    fn default() -> Self {
        Self { history_limit: 5 }
    }
}
impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
    pub fn validate(&self) -> ConfigResult<()> {
        if self.selection.max_series == 0 {
            return Err(out_of_range("selection.max_series", self.selection.max_series));
        }
        if self.render.max_series == 0 {
            return Err(out_of_range("render.max_series", self.render.max_series));
        }
        if self.render.pie_max_slices < 2 {
            return Err(out_of_range(
                "render.pie_max_slices",
                self.render.pie_max_slices,
            ));
        }
        if self.render.heatmap_max_categories == 0 {
            return Err(out_of_range(
                "render.heatmap_max_categories",
                self.render.heatmap_max_categories,
            ));
        }
        if !(0.0..=1.0).contains(&self.render.layout.title_x)
            || !(0.0..=1.0).contains(&self.render.layout.title_y)
        {
            return Err(ConfigError::OutOfRange {
                field: "render.layout.title_x/title_y".to_string(),
                value: format!(
                    "{}/{}",
                    self.render.layout.title_x, self.render.layout.title_y
                ),
            });
        }
        if self.pipeline.history_limit == 0 {
            return Err(out_of_range(
                "pipeline.history_limit",
                self.pipeline.history_limit,
            ));
        }
        if let Some(rule) = self.selection.keywords.iter().find(|r| r.is_empty()) {
            return Err(ConfigError::EmptyKeywordRule {
                chart_type: rule.chart_type,
            });
        }
        Ok(())
    }
}
fn out_of_range(field: &str, value: usize) -> ConfigError {
    ConfigError::OutOfRange {
        field: field.to_string(),
        value: value.to_string(),
    }
}
