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

use crate::profiler::{ColumnProfile, DatasetProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

mod rules {
    pub const LINE_SERIES_CAP: usize = 3;
    pub const KPI_CARD_CAP: usize = 4;
    pub const DONUT_MAX_CATEGORIES: usize = 7;
    pub const HEATMAP_MIN_METRICS: usize = 3;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartType {
    LineChart,
    BarChart,
    Histogram,
    ScatterPlot,
    KpiCard,
    DonutChart,
    Heatmap,
}

impl ChartType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::LineChart => "line_chart",
            ChartType::BarChart => "bar_chart",
            ChartType::Histogram => "histogram",
            ChartType::ScatterPlot => "scatter_plot",
            ChartType::KpiCard => "kpi_card",
            ChartType::DonutChart => "donut_chart",
            ChartType::Heatmap => "heatmap",
        }
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualSuggestion {
    pub chart_type: ChartType,
    pub priority: Priority,
    pub columns: HashMap<String, Vec<String>>,
    pub title: String,
    pub reason: String,
}

pub struct VisualRecommender;

impl VisualRecommender {
    pub fn new() -> Self {
        Self
    }
    pub fn suggest(&self, profile: &DatasetProfile) -> Vec<VisualSuggestion> {
        let dates = profile.date_columns();
        let numerics = profile.numeric_columns();
        let categoricals = profile.categorical_columns();
        debug!(
            dates = dates.len(),
            numerics = numerics.len(),
            categoricals = categoricals.len(),
            "generating visual suggestions"
        );
        let mut suggestions = Vec::new();
        if !dates.is_empty() && !numerics.is_empty() {
            let series = names(&numerics, rules::LINE_SERIES_CAP);
            suggestions.push(VisualSuggestion {
                chart_type: ChartType::LineChart,
                priority: Priority::High,
                title: format!("Trend of {} over time", series.join(", ")),
                reason: "Time series detected - well suited to trend analysis".to_string(),
                columns: roles(&[("x", names(&dates, 1)), ("y", series)]),
            });
        }
        if !categoricals.is_empty() && !numerics.is_empty() {
            suggestions.push(VisualSuggestion {
                chart_type: ChartType::BarChart,
                priority: Priority::High,
                title: format!("{} by {}", numerics[0].name, categoricals[0].name),
                reason: "Comparison across categories".to_string(),
                columns: roles(&[
                    ("category", names(&categoricals, 1)),
                    ("value", names(&numerics, 1)),
                ]),
            });
        }
        if !numerics.is_empty() {
            suggestions.push(VisualSuggestion {
                chart_type: ChartType::Histogram,
                priority: Priority::Medium,
                title: format!("Distribution of {}", numerics[0].name),
                reason: "Value distribution analysis".to_string(),
                columns: roles(&[("value", names(&numerics, 1))]),
            });
        }
        if numerics.len() >= 2 {
            suggestions.push(VisualSuggestion {
                chart_type: ChartType::ScatterPlot,
                priority: Priority::Medium,
                title: format!(
                    "Relationship between {} and {}",
                    numerics[0].name, numerics[1].name
                ),
                reason: "Correlation analysis between metrics".to_string(),
                columns: roles(&[
                    ("x", vec![numerics[0].name.clone()]),
                    ("y", vec![numerics[1].name.clone()]),
                ]),
            });
        }
        if !numerics.is_empty() {
            suggestions.push(VisualSuggestion {
                chart_type: ChartType::KpiCard,
                priority: Priority::High,
                title: "Headline KPIs".to_string(),
                reason: "Headline metrics at a glance".to_string(),
                columns: roles(&[("metrics", names(&numerics, rules::KPI_CARD_CAP))]),
            });
        }
        if let Some(first_categorical) = categoricals.first() {
            if first_categorical.unique_count <= rules::DONUT_MAX_CATEGORIES
                && !numerics.is_empty()
            {
                suggestions.push(VisualSuggestion {
                    chart_type: ChartType::DonutChart,
                    priority: Priority::Medium,
                    title: format!(
                        "Composition of {} by {}",
                        numerics[0].name, first_categorical.name
                    ),
                    reason: "Few categories - ideal for showing proportions".to_string(),
                    columns: roles(&[
                        ("category", vec![first_categorical.name.clone()]),
                        ("value", names(&numerics, 1)),
                    ]),
                });
            }
        }
        if numerics.len() >= rules::HEATMAP_MIN_METRICS {
            suggestions.push(VisualSuggestion {
                chart_type: ChartType::Heatmap,
                priority: Priority::Low,
                title: "Correlation heat map".to_string(),
                reason: "Multiple metrics - pattern overview".to_string(),
                columns: roles(&[("metrics", names(&numerics, usize::MAX))]),
            });
        }
        suggestions.sort_by(|a, b| b.priority.weight().cmp(&a.priority.weight()));
        debug!(count = suggestions.len(), "suggestions ranked");
        suggestions
    }
}

impl Default for VisualRecommender {
    fn default() -> Self {
        Self::new()
    }
}

fn names(columns: &[&ColumnProfile], cap: usize) -> Vec<String> {
    columns.iter().take(cap).map(|c| c.name.clone()).collect()
}

fn roles(pairs: &[(&str, Vec<String>)]) -> HashMap<String, Vec<String>> {
    pairs
        .iter()
        .map(|(role, columns)| ((*role).to_string(), columns.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::SemanticType;

    fn column(name: &str, semantic_type: SemanticType, unique_count: usize) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            declared_type: "str".to_string(),
            semantic_type,
            null_count: 0,
            null_percentage: 0.0,
            unique_count,
            sample_values: Vec::new(),
            numeric_stats: None,
            temporal_stats: None,
            top_values: None,
        }
    }

    fn profile_of(columns: Vec<ColumnProfile>) -> DatasetProfile {
        DatasetProfile {
            row_count: 100,
            column_count: columns.len(),
            columns,
            relationships: Vec::new(),
            completeness_score: 100.0,
            duplicate_row_count: 0,
            issues: vec!["Data quality looks good".to_string()],
        }
    }

    #[test]
    fn test_priority_ranking_order() {
        let profile = profile_of(vec![
            column("order_date", SemanticType::Date, 90),
            column("region", SemanticType::LowCardinalityCategory, 4),
            column("sales", SemanticType::Metric, 80),
            column("margin", SemanticType::Metric, 70),
            column("units", SemanticType::Metric, 60),
        ]);
        let suggestions = VisualRecommender::new().suggest(&profile);
        let kinds: Vec<ChartType> = suggestions.iter().map(|s| s.chart_type).collect();
        assert_eq!(
            kinds,
            vec![
                ChartType::LineChart,
                ChartType::BarChart,
                ChartType::KpiCard,
                ChartType::Histogram,
                ChartType::ScatterPlot,
                ChartType::DonutChart,
                ChartType::Heatmap,
            ]
        );
        let weights: Vec<u8> = suggestions.iter().map(|s| s.priority.weight()).collect();
        let mut sorted = weights.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(weights, sorted);
    }

    #[test]
    fn test_donut_first_categorical_only() {
        let profile = profile_of(vec![
            column("segment", SemanticType::Category, 40),
            column("region", SemanticType::LowCardinalityCategory, 4),
            column("sales", SemanticType::Metric, 80),
        ]);
        let suggestions = VisualRecommender::new().suggest(&profile);
        assert!(!suggestions
            .iter()
            .any(|s| s.chart_type == ChartType::DonutChart));
    }

    #[test]
    fn test_no_suggestions_without_usable_columns() {
        let profile = profile_of(vec![
            column("comment", SemanticType::HighCardinalityText, 95),
            column("row_id", SemanticType::Identifier, 100),
        ]);
        let suggestions = VisualRecommender::new().suggest(&profile);
        assert!(suggestions.is_empty());
    }
}
