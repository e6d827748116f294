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

//! Hint-to-chart conversation loop.
//!
//! Query translation and execution are external capabilities behind the
//! [`QueryTranslator`] and [`QueryExecutor`] traits; the pipeline owns only
//! the bounded interaction history and the rendering step.

use crate::error::{PipelineError, Result};
use crate::grammar::DeclarativeGrammar;
use crate::render::ChartArtifact;
use crate::spec::{ChartType, VisualizationSpec};
use crate::tabular::TabularResult;
use crate::VisualizationEngine;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[async_trait]
pub trait QueryTranslator: Send + Sync {
    /// Turns a hint into query text. `history` holds the most recent
    /// interactions, oldest first.
    async fn translate_to_query(
        &self,
        hint: &str,
        history: &[Interaction],
    ) -> std::result::Result<String, PipelineError>;
}

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, query: &str) -> std::result::Result<TabularResult, PipelineError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Declarative grammar for browser charting libraries.
    #[default]
    Grammar,
    /// Plotly-style chart artifact.
    Figure,
    /// Spec only.
    Raw,
}
impl FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grammar" | "d3" => Ok(OutputFormat::Grammar),
            "figure" | "plotly" => Ok(OutputFormat::Figure),
            "raw" | "spec" => Ok(OutputFormat::Raw),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: Uuid,
    pub hint: String,
    pub query: String,
    pub chart_type: ChartType,
}

/// Last `limit` interactions, oldest first.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    entries: VecDeque<Interaction>,
    limit: usize,
}
impl ConversationHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit: limit.max(1),
        }
    }
    pub fn push(&mut self, interaction: Interaction) {
        self.entries.push_back(interaction);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }
    pub fn clear(&mut self) {
        self.entries.clear();
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn limit(&self) -> usize {
        self.limit
    }
    pub fn as_slice(&mut self) -> &[Interaction] {
        self.entries.make_contiguous()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "format", content = "content", rename_all = "lowercase")]
pub enum RenderedOutput {
    Grammar(DeclarativeGrammar),
    Figure(ChartArtifact),
    Raw,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub id: Uuid,
    pub hint: String,
    pub query: String,
    pub result: TabularResult,
    pub spec: VisualizationSpec,
    pub output: RenderedOutput,
}

pub struct VisualizationPipeline<T, X> {
    translator: T,
    executor: X,
    engine: VisualizationEngine,
    history: ConversationHistory,
}
impl<T: QueryTranslator, X: QueryExecutor> VisualizationPipeline<T, X> {
    pub fn new(translator: T, executor: X) -> Self {
        Self::with_engine(translator, executor, VisualizationEngine::new())
    }
    pub fn with_engine(translator: T, executor: X, engine: VisualizationEngine) -> Self {
        let history = ConversationHistory::new(engine.config().pipeline.history_limit);
        Self {
            translator,
            executor,
            engine,
            history,
        }
    }
    pub fn translator(&self) -> &T {
        &self.translator
    }
    pub fn executor(&self) -> &X {
        &self.executor
    }
    pub fn engine(&self) -> &VisualizationEngine {
        &self.engine
    }
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }
    /// Translate, execute, recommend and render. History is only extended
    /// when every step succeeds.
    pub async fn process(&mut self, hint: &str, format: OutputFormat) -> Result<PipelineReport> {
        info!(hint, ?format, "processing visualization request");
        let query = self
            .translator
            .translate_to_query(hint, self.history.as_slice())
            .await
            .inspect_err(|e| warn!(error = %e, "query translation failed"))?;
        debug!(%query, "translated hint");
        let result = self
            .executor
            .execute(&query)
            .await
            .inspect_err(|e| warn!(error = %e, "query execution failed"))?;
        debug!(
            rows = result.row_count(),
            columns = result.column_count(),
            "query executed"
        );
        let spec = self.engine.recommend(&result, hint)?;
        let output = match format {
            OutputFormat::Grammar => RenderedOutput::Grammar(self.engine.to_grammar(&result, &spec)?),
            OutputFormat::Figure => RenderedOutput::Figure(self.engine.render(&result, &spec)?),
            OutputFormat::Raw => RenderedOutput::Raw,
        };
        let interaction = Interaction {
            id: Uuid::new_v4(),
            hint: hint.to_string(),
            query: query.clone(),
            chart_type: spec.chart_type,
        };
        let id = interaction.id;
        self.history.push(interaction);
        info!(%id, chart_type = %spec.chart_type, history = self.history.len(), "request complete");
        Ok(PipelineReport {
            id,
            hint: hint.to_string(),
            query,
            result,
            spec,
            output,
        })
    }
    pub fn reset_conversation(&mut self) {
        debug!(cleared = self.history.len(), "conversation reset");
        self.history.clear();
    }
}
