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

use crate::spec::ChartType;
use thiserror::Error;
#[derive(Error, Debug)]
pub enum VizError {
    #[error("Chart selection error: {0}")]
    Selection(#[from] SelectionError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] SerialisationError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Tabular result has no columns to visualise")]
    EmptyInput,
    #[error("Column '{column}' assigned to the {channel} channel is not part of the result")]
    UnknownColumn { column: String, channel: String },
}
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Tabular result has no rows to render")]
    NoData,
    #[error("Chart '{chart_type}' cannot be rendered: {reason}")]
    UnresolvedColumn { chart_type: ChartType, reason: String },
}
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Duplicate column name: '{column}'")]
    DuplicateColumn { column: String },
    #[error("Row {index} is not a JSON object")]
    InvalidRow { index: usize },
    #[error("Unsupported record layout: {reason}")]
    UnsupportedLayout { reason: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("DataFrame conversion failed for column '{column}': {reason}")]
    DataFrame { column: String, reason: String },
}
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML configuration: {source}")]
    YamlParseError {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Invalid configuration: {field} is out of range ({value})")]
    OutOfRange { field: String, value: String },
    #[error("Keyword rule for '{chart_type}' has no triggers")]
    EmptyKeywordRule { chart_type: ChartType },
    #[error("Keyword table could not be compiled: {source}")]
    KeywordPattern {
        #[from]
        source: regex::Error,
    },
}
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Query translation failed: {0}")]
    Translation(String),
    #[error("Query execution failed: {0}")]
    Execution(String),
}
#[derive(Error, Debug)]
pub enum SerialisationError {
    #[error("JSON serialisation failed: {source}")]
    JsonSerialisationError {
        #[from]
        source: serde_json::Error,
    },
}
pub type Result<T> = std::result::Result<T, VizError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        VizError::Serialisation(SerialisationError::JsonSerialisationError { source: err })
    }
}
impl From<csv::Error> for VizError {
    fn from(err: csv::Error) -> Self {
        VizError::Data(DataError::Csv(err))
    }
}
impl VizError {
    pub fn empty_input() -> Self {
        VizError::Selection(SelectionError::EmptyInput)
    }
    pub fn no_data() -> Self {
        VizError::Render(RenderError::NoData)
    }
    pub fn unresolved(chart_type: ChartType, reason: impl Into<String>) -> Self {
        VizError::Render(RenderError::UnresolvedColumn {
            chart_type,
            reason: reason.into(),
        })
    }
    pub fn is_empty_input(&self) -> bool {
        matches!(self, VizError::Selection(SelectionError::EmptyInput))
    }
    pub fn is_no_data(&self) -> bool {
        matches!(self, VizError::Render(RenderError::NoData))
    }
    pub fn is_unresolved_column(&self) -> bool {
        matches!(
            self,
            VizError::Render(RenderError::UnresolvedColumn { .. })
                | VizError::Selection(SelectionError::UnknownColumn { .. })
        )
    }
    /// Data-shaped failures that a caller can fix by changing the query.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VizError::Selection(_)
                | VizError::Render(_)
                | VizError::Pipeline(PipelineError::Execution(_))
        )
    }
    pub fn category(&self) -> &'static str {
        match self {
            VizError::Selection(_) => "Selection",
            VizError::Render(_) => "Render",
            VizError::Data(_) => "Data",
            VizError::Config(_) => "Configuration",
            VizError::Pipeline(_) => "Pipeline",
            VizError::Serialisation(_) => "Serialisation",
            VizError::Io(_) => "I/O",
        }
    }
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            VizError::Selection(SelectionError::EmptyInput) => vec![
                "Check that the query selects at least one column".to_string(),
                "Verify the result set was passed through unchanged".to_string(),
            ],
            VizError::Render(RenderError::NoData) => vec![
                "Relax the query filters so that rows are returned".to_string(),
                "Render the specification once data is available".to_string(),
            ],
            VizError::Render(RenderError::UnresolvedColumn { .. }) => vec![
                "Select at least one numeric column alongside the categories".to_string(),
                "Ask for a table instead of a heatmap".to_string(),
            ],
            VizError::Config(_) => vec![
                "Compare the configuration with config/engine.yml".to_string(),
            ],
            _ => vec!["Check the error message for specific guidance".to_string()],
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            VizError::Selection(SelectionError::EmptyInput) => {
                "The query returned no columns, so there is nothing to visualise.".to_string()
            }
            VizError::Render(RenderError::NoData) => {
                "The query ran successfully but returned no rows to chart.".to_string()
            }
            VizError::Render(RenderError::UnresolvedColumn { chart_type, .. }) => {
                format!("The data does not contain the columns a {chart_type} chart needs.")
            }
            _ => self.to_string(),
        }
    }
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VizError::Render(RenderError::NoData) => ErrorSeverity::Warning,
            VizError::Selection(SelectionError::EmptyInput) => ErrorSeverity::Warning,
            VizError::Config(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}
impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "INFO",
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
    pub fn color_code(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "\x1b[36m",
            ErrorSeverity::Warning => "\x1b[33m",
            ErrorSeverity::Error => "\x1b[31m",
            ErrorSeverity::Critical => "\x1b[35m",
        }
    }
}
pub struct ErrorReporter {
    pub show_suggestions: bool,
    pub colored_output: bool,
}
impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            show_suggestions: true,
            colored_output: true,
        }
    }
    pub fn plain() -> Self {
        Self {
            show_suggestions: true,
            colored_output: false,
        }
    }
    pub fn report(&self, error: &VizError) -> String {
        let severity = error.severity();
        let mut output = String::new();
        if self.colored_output {
            output.push_str(severity.color_code());
        }
        output.push_str(&format!(
            "[{}] {}: {}\n",
            severity.as_str(),
            error.category(),
            error.user_message()
        ));
        if self.colored_output {
            output.push_str("\x1b[0m");
        }
        if self.show_suggestions {
            let suggestions = error.suggestions();
            if !suggestions.is_empty() {
                output.push_str("\nSuggestions:\n");
                for suggestion in suggestions {
                    output.push_str(&format!("  • {suggestion}\n"));
                }
            }
        }
        output
    }
}
impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
