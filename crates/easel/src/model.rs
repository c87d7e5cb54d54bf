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

use crate::error::{ModelError, ModelResult};
use crate::profiler::SemanticType;
use crate::recommender::{ChartType, Priority, VisualSuggestion};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

mod health {
    pub const START_SCORE: i32 = 100;
    pub const UNCONNECTED_TABLE_PENALTY: i32 = 10;
    pub const NO_MEASURES_PENALTY: i32 = 10;
    pub const FEW_MEASURES_PENALTY: i32 = 5;
    pub const FEW_MEASURES_THRESHOLD: usize = 3;
    pub const GOOD_THRESHOLD: i32 = 80;
    pub const WARNING_THRESHOLD: i32 = 60;
    pub const COMPLEX_MODEL_TABLES: usize = 10;
    pub const MANY_MEASURES: usize = 10;
    pub const KPI_MEASURE_CAP: usize = 5;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStructure {
    pub tables: Vec<TableMetadata>,
    #[serde(default)]
    pub relationships: Vec<ModelRelationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    pub name: String,
    #[serde(default)]
    pub table_type: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub columns: Vec<ModelColumn>,
    #[serde(default)]
    pub measures: Vec<ModelMeasure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelColumn {
    pub name: String,
    pub data_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMeasure {
    pub name: String,
    pub expression: String,
    #[serde(default)]
    pub format_string: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRelationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    #[serde(default)]
    pub cardinality: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub data_type: String,
    pub semantic_type: SemanticType,
    pub suggested_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub name: String,
    pub table_type: String,
    pub columns: Vec<ColumnSummary>,
    pub measures: Vec<ModelMeasure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationKind {
    Layout,
    Visual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecommendation {
    pub kind: RecommendationKind,
    pub message: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Good,
    Warning,
    Poor,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Good => "good",
            HealthStatus::Warning => "warning",
            HealthStatus::Poor => "poor",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelHealth {
    pub score: u32,
    pub status: HealthStatus,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelAnalysis {
    pub tables: Vec<TableSummary>,
    pub suggested_visuals: Vec<VisualSuggestion>,
    pub recommendations: Vec<ModelRecommendation>,
    pub health: ModelHealth,
}

pub struct ModelAnalyser;

impl ModelAnalyser {
    pub fn new() -> Self {
        Self
    }
    pub fn analyse(&self, structure: &ModelStructure) -> ModelResult<ModelAnalysis> {
        if structure.tables.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        let visible: Vec<&TableMetadata> =
            structure.tables.iter().filter(|t| !t.hidden).collect();
        debug!(
            tables = structure.tables.len(),
            visible = visible.len(),
            relationships = structure.relationships.len(),
            "analysing model metadata"
        );
        let tables: Vec<TableSummary> = visible.iter().map(|table| summarise(table)).collect();
        let measures: Vec<&ModelMeasure> =
            visible.iter().flat_map(|t| t.measures.iter()).collect();
        let suggested_visuals = suggest_visuals(&tables, &measures);
        let recommendations = build_recommendations(visible.len(), measures.len());
        let health = assess_health(&visible, &structure.relationships, measures.len());
        Ok(ModelAnalysis {
            tables,
            suggested_visuals,
            recommendations,
            health,
        })
    }
}

impl Default for ModelAnalyser {
    fn default() -> Self {
        Self::new()
    }
}

pub fn map_vendor_type(data_type: &str, column_name: &str) -> SemanticType {
    let data_type = data_type.to_lowercase();
    let name = column_name.to_lowercase();
    match data_type.as_str() {
        "datetime" | "date" => SemanticType::Date,
        "int64" | "decimal" | "double" => {
            if contains_any(&name, &["id", "key", "code", "number"]) {
                SemanticType::Identifier
            } else if name.contains('%') || name.contains("percent") {
                SemanticType::Percentage
            } else if contains_any(&name, &["value", "amount", "total", "sum"]) {
                SemanticType::Metric
            } else if contains_any(&name, &["price", "cost", "revenue"]) {
                SemanticType::Currency
            } else {
                SemanticType::Metric
            }
        }
        "string" => SemanticType::Category,
        "boolean" => SemanticType::Boolean,
        _ => SemanticType::Unknown,
    }
}

pub fn suggested_format(semantic_type: SemanticType) -> &'static str {
    match semantic_type {
        SemanticType::Date => "dd/mm/yyyy",
        SemanticType::Percentage => "0.00%",
        SemanticType::Currency => "$ #,##0.00",
        SemanticType::Metric => "#,##0.00",
        _ => "General",
    }
}

fn contains_any(name: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| name.contains(needle))
}

fn summarise(table: &TableMetadata) -> TableSummary {
    let columns = table
        .columns
        .iter()
        .map(|column| {
            let semantic_type = map_vendor_type(&column.data_type, &column.name);
            ColumnSummary {
                name: column.name.clone(),
                data_type: column.data_type.clone(),
                semantic_type,
                suggested_format: suggested_format(semantic_type).to_string(),
            }
        })
        .collect();
    TableSummary {
        name: table.name.clone(),
        table_type: table.table_type.clone().unwrap_or_else(|| "Table".to_string()),
        columns,
        measures: table.measures.clone(),
    }
}

fn suggest_visuals(tables: &[TableSummary], measures: &[&ModelMeasure]) -> Vec<VisualSuggestion> {
    let all_columns: Vec<&ColumnSummary> =
        tables.iter().flat_map(|t| t.columns.iter()).collect();
    let has_dates = all_columns
        .iter()
        .any(|c| c.semantic_type == SemanticType::Date);
    let has_numbers = all_columns.iter().any(|c| c.semantic_type.is_numeric());
    let has_text = all_columns
        .iter()
        .any(|c| c.semantic_type == SemanticType::Category);
    let mut suggestions = Vec::new();
    if has_dates && has_numbers {
        suggestions.push(VisualSuggestion {
            chart_type: ChartType::LineChart,
            priority: Priority::High,
            columns: HashMap::new(),
            title: "Trend over time".to_string(),
            reason: "Date columns and numeric values present in the model".to_string(),
        });
    }
    if has_text && has_numbers {
        suggestions.push(VisualSuggestion {
            chart_type: ChartType::BarChart,
            priority: Priority::High,
            columns: HashMap::new(),
            title: "Comparison by category".to_string(),
            reason: "Categories and values available to compare".to_string(),
        });
    }
    if !measures.is_empty() {
        let names: Vec<String> = measures
            .iter()
            .take(health::KPI_MEASURE_CAP)
            .map(|m| m.name.clone())
            .collect();
        suggestions.push(VisualSuggestion {
            chart_type: ChartType::KpiCard,
            priority: Priority::High,
            columns: HashMap::from([("measures".to_string(), names)]),
            title: "Headline KPIs".to_string(),
            reason: format!("{} measures available in the model", measures.len()),
        });
    }
    suggestions
}

fn build_recommendations(visible_tables: usize, measure_count: usize) -> Vec<ModelRecommendation> {
    let mut recommendations = Vec::new();
    if visible_tables > health::COMPLEX_MODEL_TABLES {
        recommendations.push(ModelRecommendation {
            kind: RecommendationKind::Layout,
            message: "Complex model - the Detailed Analysis template is recommended".to_string(),
            priority: Priority::Medium,
        });
    }
    if measure_count > health::MANY_MEASURES {
        recommendations.push(ModelRecommendation {
            kind: RecommendationKind::Visual,
            message: "Many measures - consider splitting across multiple pages".to_string(),
            priority: Priority::Medium,
        });
    }
    recommendations
}

fn assess_health(
    tables: &[&TableMetadata],
    relationships: &[ModelRelationship],
    measure_count: usize,
) -> ModelHealth {
    let mut issues = Vec::new();
    let mut connected: HashSet<&str> = HashSet::new();
    for relationship in relationships {
        connected.insert(relationship.from_table.as_str());
        connected.insert(relationship.to_table.as_str());
    }
    let unconnected: Vec<&str> = if tables.len() > 1 {
        tables
            .iter()
            .filter(|t| !connected.contains(t.name.as_str()))
            .map(|t| t.name.as_str())
            .collect()
    } else {
        Vec::new()
    };
    if !unconnected.is_empty() {
        issues.push(format!(
            "Tables without relationships: {}",
            unconnected.join(", ")
        ));
    }
    if measure_count == 0 {
        issues.push("Recommendation: create DAX measures for headline metrics".to_string());
    } else if measure_count < health::FEW_MEASURES_THRESHOLD {
        issues.push(format!(
            "Only {measure_count} measure(s) - consider adding more KPIs"
        ));
    }
    let mut score = health::START_SCORE;
    score -= unconnected.len() as i32 * health::UNCONNECTED_TABLE_PENALTY;
    score -= if measure_count == 0 {
        health::NO_MEASURES_PENALTY
    } else if measure_count < health::FEW_MEASURES_THRESHOLD {
        health::FEW_MEASURES_PENALTY
    } else {
        0
    };
    let score = score.max(0);
    let status = if score >= health::GOOD_THRESHOLD {
        HealthStatus::Good
    } else if score >= health::WARNING_THRESHOLD {
        HealthStatus::Warning
    } else {
        HealthStatus::Poor
    };
    ModelHealth {
        score: score as u32,
        status,
        issues,
    }
}
