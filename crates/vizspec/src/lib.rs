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

pub mod config;
pub mod data_profiler;
pub mod error;
pub mod grammar;
pub mod keywords;
pub mod pipeline;
pub mod render;
pub mod selector;
pub mod spec;
pub mod tabular;

#[cfg(feature = "data-handler")]
pub mod data_handler;

pub use config::{EngineConfig, LayoutConfig, PipelineConfig, ProfilingConfig, RenderConfig, SelectionConfig, SpecConfig};
pub use data_profiler::{ColumnProfile, ColumnType, DataProfiler, DimensionProfile, NumericStats};
pub use error::{ErrorReporter, Result, VizError};
pub use grammar::{to_declarative_grammar, DeclarativeGrammar, Mark};
pub use keywords::{KeywordMatch, KeywordRule, KeywordTable};
pub use pipeline::{
    Interaction, OutputFormat, PipelineReport, QueryExecutor, QueryTranslator, RenderedOutput,
    VisualizationPipeline,
};
pub use render::{figure::Figure, ChartArtifact, Renderer};
pub use selector::{ChannelAssignment, VisualizationSelector};
pub use spec::{ChartType, SpecBuilder, ValueAggregate, VisualizationSpec};
pub use tabular::{Row, Scalar, TabularResult};

use serde::Serialize;
use tracing::debug;

/// Everything produced for one result set and hint.
#[derive(Debug, Clone, Serialize)]
pub struct Visualization {
    pub spec: VisualizationSpec,
    pub artifact: ChartArtifact,
    pub grammar: DeclarativeGrammar,
}

/// Profiler, selector, spec builder and renderer wired to one configuration.
pub struct VisualizationEngine {
    config: EngineConfig,
    profiler: DataProfiler,
    selector: VisualizationSelector,
    builder: SpecBuilder,
    renderer: Renderer,
}
impl VisualizationEngine {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            profiler: DataProfiler::new(),
            selector: VisualizationSelector::new(),
            builder: SpecBuilder::new(),
            renderer: Renderer::new(),
        }
    }
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let selector = VisualizationSelector::with_config(&config.selection)?;
        let profiler = DataProfiler::with_config(config.profiling.clone());
        let renderer = Renderer::with_config(
            config.render.clone(),
            DataProfiler::with_config(config.profiling.clone()),
        );
        let builder = SpecBuilder::with_config(config.spec.clone());
        Ok(Self {
            config,
            profiler,
            selector,
            builder,
            renderer,
        })
    }
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
    pub fn profile(&self, result: &TabularResult) -> ColumnProfile {
        self.profiler.profile(result)
    }
    /// Profiles `result`, picks a chart and builds its spec.
    pub fn recommend(&self, result: &TabularResult, hint: &str) -> Result<VisualizationSpec> {
        let profile = self.profile(result);
        let assignment = self.selector.select(&profile, result.columns(), hint)?;
        debug!(
            chart_type = %assignment.chart_type,
            overridden = assignment.was_overridden(),
            "selected chart"
        );
        self.builder.build(assignment, hint, result.columns(), &profile)
    }
    pub fn render(&self, result: &TabularResult, spec: &VisualizationSpec) -> Result<ChartArtifact> {
        self.renderer.render(result, spec)
    }
    pub fn to_grammar(&self, result: &TabularResult, spec: &VisualizationSpec) -> Result<DeclarativeGrammar> {
        to_declarative_grammar(result, spec)
    }
    pub fn visualize(&self, result: &TabularResult, hint: &str) -> Result<Visualization> {
        let spec = self.recommend(result, hint)?;
        let artifact = self.render(result, &spec)?;
        let grammar = self.to_grammar(result, &spec)?;
        Ok(Visualization {
            spec,
            artifact,
            grammar,
        })
    }
}
impl Default for VisualizationEngine {
    fn default() -> Self {
        Self::new()
    }
}
