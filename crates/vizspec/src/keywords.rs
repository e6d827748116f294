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

//! Ordered keyword vocabulary that lets a free-text hint override the
//! chart type picked from the data. Rules are evaluated in table order and
//! the first rule with any trigger present in the hint wins.

use crate::error::{ConfigError, ConfigResult};
use crate::spec::ChartType;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::RegexSet;
use serde::{Deserialize, Serialize};
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub chart_type: ChartType,
    pub triggers: Vec<String>,
}
impl KeywordRule {
    pub fn new(chart_type: ChartType, triggers: &[&str]) -> Self {
        Self {
            chart_type,
            triggers: triggers.iter().map(|t| (*t).to_string()).collect(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.triggers.iter().all(|t| t.trim().is_empty())
    }
    fn pattern(&self) -> String {
        let alternatives = self
            .triggers
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| regex::escape(t))
            .join("|");
        format!("(?i)(?:{alternatives})")
    }
}
/// The built-in vocabulary. "distribution" also appears under `box`; the
/// histogram rule always claims it first.
pub fn default_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(ChartType::Histogram, &["distribution", "histogram"]),
        KeywordRule::new(
            ChartType::Scatter,
            &["scatter", "correlation", "relationship"],
        ),
        KeywordRule::new(ChartType::Line, &["line", "trend", "over time"]),
        KeywordRule::new(ChartType::Pie, &["pie", "proportion", "percentage"]),
        KeywordRule::new(ChartType::Box, &["box", "boxplot", "distribution"]),
        KeywordRule::new(ChartType::Heatmap, &["heatmap", "matrix"]),
        KeywordRule::new(ChartType::Table, &["table"]),
    ]
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    pub chart_type: ChartType,
    pub rule_index: usize,
    pub trigger: String,
}
#[derive(Debug, Clone)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
    set: RegexSet,
}
static DEFAULT_TABLE: Lazy<KeywordTable> = Lazy::new(|| {
    let rules = default_rules();
    let set = RegexSet::new(rules.iter().map(KeywordRule::pattern))
        .unwrap_or_else(|_| RegexSet::empty());
    KeywordTable { rules, set }
});
impl KeywordTable {
    pub fn new(rules: Vec<KeywordRule>) -> ConfigResult<Self> {
        if let Some(rule) = rules.iter().find(|r| r.is_empty()) {
            return Err(ConfigError::EmptyKeywordRule {
                chart_type: rule.chart_type,
            });
        }
        let set = RegexSet::new(rules.iter().map(KeywordRule::pattern))?;
        Ok(Self { rules, set })
    }
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }
    /// First rule, in table order, with a trigger somewhere in `hint`.
    pub fn find(&self, hint: &str) -> Option<KeywordMatch> {
        if hint.trim().is_empty() {
            return None;
        }
        let rule_index = self.set.matches(hint).iter().min()?;
        let rule = &self.rules[rule_index];
        let lowered = hint.to_lowercase();
        let trigger = rule
            .triggers
            .iter()
            .find(|t| !t.trim().is_empty() && lowered.contains(&t.to_lowercase()))
            .cloned()
            .unwrap_or_default();
        Some(KeywordMatch {
            chart_type: rule.chart_type,
            rule_index,
            trigger,
        })
    }
}
impl Default for KeywordTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}
