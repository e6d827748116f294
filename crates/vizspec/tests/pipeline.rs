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

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use vizspec::error::PipelineError;
use vizspec::{
    ChartType, EngineConfig, Interaction, OutputFormat, QueryExecutor, QueryTranslator,
    RenderedOutput, TabularResult, VisualizationEngine, VisualizationPipeline,
};

/// Records the history length it was given on every call.
#[derive(Default)]
struct EchoTranslator {
    seen_history: Mutex<Vec<usize>>,
}

#[async_trait]
impl QueryTranslator for EchoTranslator {
    async fn translate_to_query(
        &self,
        hint: &str,
        history: &[Interaction],
    ) -> Result<String, PipelineError> {
        self.seen_history.lock().unwrap().push(history.len());
        if hint.contains("nonsense") {
            return Err(PipelineError::Translation(format!("cannot translate '{hint}'")));
        }
        Ok(format!("SELECT category, total FROM sales -- {hint}"))
    }
}

#[derive(Default)]
struct FixedExecutor {
    calls: AtomicUsize,
}

#[async_trait]
impl QueryExecutor for FixedExecutor {
    async fn execute(&self, query: &str) -> Result<TabularResult, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if query.contains("empty") {
            return TabularResult::new(vec!["category".into(), "total".into()], Vec::new())
                .map_err(|e| PipelineError::Execution(e.to_string()));
        }
        TabularResult::from_records(json!([
            {"category": "Electronics", "total": 500},
            {"category": "Books", "total": 120}
        ]))
        .map_err(|e| PipelineError::Execution(e.to_string()))
    }
}

fn pipeline() -> VisualizationPipeline<EchoTranslator, FixedExecutor> {
    VisualizationPipeline::new(EchoTranslator::default(), FixedExecutor::default())
}

#[tokio::test]
async fn grammar_request_runs_every_step() {
    let mut pipeline = pipeline();
    let report = pipeline
        .process("Show me total sales by product category", OutputFormat::Grammar)
        .await
        .unwrap();
    assert_eq!(report.spec.chart_type, ChartType::Bar);
    assert!(report.query.starts_with("SELECT category, total"));
    assert_eq!(report.result.row_count(), 2);
    let RenderedOutput::Grammar(grammar) = &report.output else {
        panic!("expected grammar output");
    };
    assert_eq!(grammar.data.len(), 2);

    let entry = pipeline.history().iter().next().unwrap();
    assert_eq!(entry.id, report.id);
    assert_eq!(entry.chart_type, ChartType::Bar);
}

#[tokio::test]
async fn figure_and_raw_formats() {
    let mut pipeline = pipeline();
    let figure = pipeline.process("as a pie", OutputFormat::Figure).await.unwrap();
    let RenderedOutput::Figure(artifact) = &figure.output else {
        panic!("expected figure output");
    };
    assert_eq!(artifact.chart_type, ChartType::Pie);

    let raw = pipeline.process("totals", OutputFormat::Raw).await.unwrap();
    assert!(matches!(raw.output, RenderedOutput::Raw));
    let json = serde_json::to_value(&raw).unwrap();
    assert_eq!(json["output"]["format"], "raw");
    assert_eq!(json["spec"]["chartType"], "bar");
}

#[tokio::test]
async fn history_is_bounded_and_passed_to_translation() {
    let mut pipeline = pipeline();
    for n in 0..7 {
        pipeline
            .process(&format!("request {n}"), OutputFormat::Raw)
            .await
            .unwrap();
    }
    assert_eq!(pipeline.history().len(), 5);
    let first = pipeline.history().iter().next().unwrap();
    assert_eq!(first.hint, "request 2");
    let seen = pipeline.translator().seen_history.lock().unwrap().clone();
    assert_eq!(seen, [0, 1, 2, 3, 4, 5, 5]);
    assert_eq!(pipeline.executor().calls.load(Ordering::SeqCst), 7);
}

#[tokio::test]
async fn failures_leave_history_untouched() {
    let mut pipeline = pipeline();
    pipeline.process("first", OutputFormat::Raw).await.unwrap();

    let err = pipeline
        .process("nonsense please", OutputFormat::Figure)
        .await
        .unwrap_err();
    assert_eq!(err.category(), "Pipeline");
    assert!(!err.is_recoverable());

    let err = pipeline
        .process("empty result", OutputFormat::Figure)
        .await
        .unwrap_err();
    assert!(err.is_no_data());
    assert_eq!(pipeline.history().len(), 1);
    assert_eq!(pipeline.executor().calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn reset_clears_the_conversation() {
    let mut pipeline = pipeline();
    pipeline.process("one", OutputFormat::Raw).await.unwrap();
    pipeline.process("two", OutputFormat::Raw).await.unwrap();
    pipeline.reset_conversation();
    assert!(pipeline.history().is_empty());
    pipeline.process("three", OutputFormat::Raw).await.unwrap();
    assert_eq!(pipeline.history().len(), 1);
}

#[tokio::test]
async fn history_limit_comes_from_config() {
    let config = EngineConfig::from_yaml_str("pipeline:\n  history_limit: 2\n").unwrap();
    let engine = VisualizationEngine::with_config(config).unwrap();
    let mut pipeline =
        VisualizationPipeline::with_engine(EchoTranslator::default(), FixedExecutor::default(), engine);
    for hint in ["a", "b", "c"] {
        pipeline.process(hint, OutputFormat::Raw).await.unwrap();
    }
    assert_eq!(pipeline.history().limit(), 2);
    let hints: Vec<_> = pipeline.history().iter().map(|i| i.hint.clone()).collect();
    assert_eq!(hints, ["b", "c"]);
}
