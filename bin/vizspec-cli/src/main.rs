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

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use vizspec::{EngineConfig, ErrorReporter, TabularResult, VisualizationEngine, VizError};

#[derive(Parser, Debug)]
#[command(name = "vizspec", about = "Recommend and render a chart for tabular data")]
struct Cli {
    /// JSON records or CSV file; `-` reads JSON from stdin.
    input: PathBuf,

    #[arg(long, default_value = "")]
    hint: String,

    #[arg(long, value_enum, default_value_t = Output::All)]
    output: Output,

    /// YAML engine configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Spec,
    Figure,
    Grammar,
    All,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<VizError>() {
                Some(viz) => eprint!("{}", ErrorReporter::new().report(viz)),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let engine = match &cli.config {
        Some(path) => {
            let config = EngineConfig::from_yaml_file(path).map_err(VizError::from)?;
            VisualizationEngine::with_config(config)?
        }
        None => VisualizationEngine::new(),
    };
    let data = load(&cli.input)?;
    info!(
        rows = data.row_count(),
        columns = data.column_count(),
        "loaded input"
    );
    let spec = engine.recommend(&data, &cli.hint)?;
    let document = match cli.output {
        Output::Spec => serde_json::to_value(&spec)?,
        Output::Figure => serde_json::to_value(engine.render(&data, &spec)?)?,
        Output::Grammar => serde_json::to_value(engine.to_grammar(&data, &spec)?)?,
        Output::All => {
            let artifact = engine.render(&data, &spec)?;
            let grammar = engine.to_grammar(&data, &spec)?;
            json!({ "spec": spec, "artifact": artifact, "grammar": grammar })
        }
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn load(path: &Path) -> Result<TabularResult> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        return Ok(TabularResult::from_json_str(&input)?);
    }
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        return TabularResult::from_csv_path(path)
            .with_context(|| format!("failed to load {}", path.display()));
    }
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(TabularResult::from_json_str(&input)?)
}
