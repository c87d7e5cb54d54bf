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

use crate::error::{utils, DataError, DataResult};
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

mod classification {
    pub const LOW_CARDINALITY_RATIO: f64 = 0.05;
    pub const CATEGORY_RATIO: f64 = 0.5;
    pub const CURRENCY_MAGNITUDE: f64 = 10.0;
    pub const PERCENTAGE_MAX: f64 = 100.0;
    pub const KEY_TOKENS: [&str; 3] = ["id", "key", "code"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemanticType {
    Identifier,
    Percentage,
    Currency,
    Metric,
    Date,
    LowCardinalityCategory,
    Category,
    HighCardinalityText,
    Boolean,
    Unknown,
}

impl SemanticType {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            SemanticType::Metric | SemanticType::Currency | SemanticType::Percentage
        )
    }
    pub fn is_categorical(self) -> bool {
        matches!(
            self,
            SemanticType::LowCardinalityCategory | SemanticType::Category
        )
    }
    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::Identifier => "identifier",
            SemanticType::Percentage => "percentage",
            SemanticType::Currency => "currency",
            SemanticType::Metric => "metric",
            SemanticType::Date => "date",
            SemanticType::LowCardinalityCategory => "low_cardinality_category",
            SemanticType::Category => "category",
            SemanticType::HighCardinalityText => "high_cardinality_text",
            SemanticType::Boolean => "boolean",
            SemanticType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ProfilerConfig {
    pub max_sample_values: usize,
    pub low_cardinality_ratio: f64,
    pub category_ratio: f64,
    pub currency_magnitude: f64,
    pub top_value_count: usize,
    pub duplicate_warning_ratio: f64,
    pub completeness_warning: f64,
    pub temporal_formats: Vec<String>,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            max_sample_values: 5,
            low_cardinality_ratio: classification::LOW_CARDINALITY_RATIO,
            category_ratio: classification::CATEGORY_RATIO,
            currency_magnitude: classification::CURRENCY_MAGNITUDE,
            top_value_count: 10,
            duplicate_warning_ratio: 0.05,
            completeness_warning: 80.0,
            temporal_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M:%S%.f".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%SZ".to_string(),
                "%m/%d/%Y".to_string(),
                "%d/%m/%Y".to_string(),
                "%Y%m%d".to_string(),
            ],
        }
    }
}

impl ProfilerConfig {
    pub fn for_large_datasets() -> Self {
        Self {
            max_sample_values: 3,
            top_value_count: 5,
            ..Default::default()
        }
    }
    pub fn for_quick_scan() -> Self {
        Self {
            max_sample_values: 3,
            temporal_formats: vec!["%Y-%m-%d".to_string(), "%Y-%m-%d %H:%M:%S".to_string()],
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalStats {
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub date_range_days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub declared_type: String,
    pub semantic_type: SemanticType,
    pub null_count: usize,
    pub null_percentage: f64,
    pub unique_count: usize,
    pub sample_values: Vec<String>,
    pub numeric_stats: Option<NumericStats>,
    pub temporal_stats: Option<TemporalStats>,
    pub top_values: Option<Vec<ValueCount>>,
}

impl std::fmt::Display for ColumnProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, {:.1}% null, {} distinct)",
            self.name, self.semantic_type, self.null_percentage, self.unique_count
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipHint {
    pub from_column: String,
    pub to_column: String,
    pub kind: String,
    pub strength: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnProfile>,
    pub relationships: Vec<RelationshipHint>,
    pub completeness_score: f64,
    pub duplicate_row_count: usize,
    pub issues: Vec<String>,
}

impl DatasetProfile {
    pub fn numeric_columns(&self) -> Vec<&ColumnProfile> {
        self.columns
            .iter()
            .filter(|c| c.semantic_type.is_numeric())
            .collect()
    }
    pub fn categorical_columns(&self) -> Vec<&ColumnProfile> {
        self.columns
            .iter()
            .filter(|c| c.semantic_type.is_categorical())
            .collect()
    }
    pub fn date_columns(&self) -> Vec<&ColumnProfile> {
        self.columns
            .iter()
            .filter(|c| c.semantic_type == SemanticType::Date)
            .collect()
    }
    pub fn semantic_type_distribution(&self) -> HashMap<String, usize> {
        let mut dist = HashMap::new();
        for column in &self.columns {
            *dist.entry(column.semantic_type.as_str().to_string()).or_insert(0) += 1;
        }
        dist
    }
    pub fn report(&self) -> String {
        let mut report = String::new();
        report.push_str("Dataset Profile\n===============\n");
        report.push_str(&format!("Rows: {}\n", self.row_count));
        report.push_str(&format!("Columns: {}\n", self.column_count));
        report.push_str(&format!(
            "  - Numeric: {}\n  - Categorical: {}\n  - Date: {}\n",
            self.numeric_columns().len(),
            self.categorical_columns().len(),
            self.date_columns().len()
        ));
        report.push_str(&format!("Completeness: {:.2}%\n", self.completeness_score));
        report.push_str(&format!("Duplicate rows: {}\n", self.duplicate_row_count));
        if !self.relationships.is_empty() {
            report.push_str(&format!(
                "Relationship hints: {}\n",
                self.relationships.len()
            ));
        }
        report.push_str("Issues:\n");
        for issue in &self.issues {
            report.push_str(&format!("  - {issue}\n"));
        }
        report
    }
}

impl std::fmt::Display for DatasetProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dataset: {} rows x {} columns, completeness {:.2}%",
            self.row_count, self.column_count, self.completeness_score
        )
    }
}

pub struct SemanticProfiler {
    config: ProfilerConfig,
}

impl SemanticProfiler {
    pub fn new() -> Self {
        Self {
            config: ProfilerConfig::default(),
        }
    }
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self { config }
    }
    pub fn profile(&self, df: &DataFrame) -> DataResult<DatasetProfile> {
        let row_count = df.height();
        let column_count = df.width();
        if row_count == 0 || column_count == 0 {
            return Err(DataError::EmptyDataset);
        }
        debug!(rows = row_count, columns = column_count, "profiling dataset");
        let columns: Vec<ColumnProfile> = df
            .get_columns()
            .par_iter()
            .map(|column| self.profile_column(column, row_count))
            .collect::<DataResult<Vec<_>>>()?;
        let relationships = self.detect_relationships(df, &columns)?;
        let null_cells: usize = columns.iter().map(|c| c.null_count).sum();
        let completeness_score =
            round2((1.0 - null_cells as f64 / (row_count * column_count) as f64) * 100.0);
        let duplicate_row_count = self.count_duplicate_rows(df)?;
        let issues = self.quality_issues(
            completeness_score,
            duplicate_row_count,
            row_count,
            &columns,
        );
        debug!(
            relationships = relationships.len(),
            completeness = completeness_score,
            "profiling complete"
        );
        Ok(DatasetProfile {
            row_count,
            column_count,
            columns,
            relationships,
            completeness_score,
            duplicate_row_count,
            issues,
        })
    }
    fn profile_column(&self, column: &Column, total_rows: usize) -> DataResult<ColumnProfile> {
        let series = column
            .as_series()
            .ok_or_else(|| utils::column_failure(column.name(), "column does not hold a series"))?;
        let name = series.name().to_string();
        let declared_type = series.dtype().to_string();
        let null_count = series.null_count();
        let null_percentage = round2(null_count as f64 / total_rows as f64 * 100.0);
        let unique_count = series
            .drop_nulls()
            .n_unique()
            .map_err(|e| DataError::StatisticsError {
                column: name.clone(),
                source: e,
            })?;
        let semantic_type = self.classify_series(series, total_rows, unique_count, null_count);
        let mut numeric_stats = None;
        let mut temporal_stats = None;
        let mut top_values = None;
        match semantic_type {
            SemanticType::Metric | SemanticType::Currency | SemanticType::Percentage => {
                numeric_stats = Some(self.numeric_stats(series, &name)?);
            }
            SemanticType::Date => {
                temporal_stats = Some(self.temporal_stats(series, &name)?);
            }
            SemanticType::LowCardinalityCategory
            | SemanticType::Category
            | SemanticType::HighCardinalityText => {
                top_values = Some(self.top_values(series, &name)?);
            }
            SemanticType::Identifier | SemanticType::Boolean | SemanticType::Unknown => {}
        }
        let sample_values = self.sample_values(series, &name)?;
        Ok(ColumnProfile {
            name,
            declared_type,
            semantic_type,
            null_count,
            null_percentage,
            unique_count,
            sample_values,
            numeric_stats,
            temporal_stats,
            top_values,
        })
    }
    fn classify_series(
        &self,
        series: &Series,
        row_count: usize,
        unique_count: usize,
        null_count: usize,
    ) -> SemanticType {
        if matches!(series.dtype(), DataType::Boolean) {
            return SemanticType::Boolean;
        }
        if matches!(
            series.dtype(),
            DataType::Date | DataType::Datetime(_, _) | DataType::Time
        ) {
            return SemanticType::Date;
        }
        if is_numeric_dtype(series.dtype()) {
            if null_count == 0 && unique_count == row_count {
                return SemanticType::Identifier;
            }
            if let Ok(casted) = series.cast(&DataType::Float64) {
                if let Ok(chunked) = casted.f64() {
                    let values: Vec<f64> = chunked.into_iter().flatten().collect();
                    if !values.is_empty() {
                        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                        if min >= 0.0 && max <= classification::PERCENTAGE_MAX {
                            return SemanticType::Percentage;
                        }
                        let large = values
                            .iter()
                            .filter(|v| v.abs() > self.config.currency_magnitude)
                            .count();
                        if large * 2 > values.len() {
                            return SemanticType::Currency;
                        }
                    }
                }
            }
            return SemanticType::Metric;
        }
        if let Ok(s_str) = series.cast(&DataType::String) {
            if let Ok(chunked) = s_str.str() {
                if self.all_parse_as_dates(chunked) {
                    return SemanticType::Date;
                }
            }
        }
        let ratio = unique_count as f64 / row_count as f64;
        if ratio < self.config.low_cardinality_ratio {
            SemanticType::LowCardinalityCategory
        } else if ratio < self.config.category_ratio {
            SemanticType::Category
        } else {
            SemanticType::HighCardinalityText
        }
    }
    fn all_parse_as_dates(&self, values: &StringChunked) -> bool {
        let non_null: Vec<&str> = values.into_iter().flatten().collect();
        if non_null.is_empty() {
            return false;
        }
        non_null
            .par_iter()
            .all(|value| self.parse_temporal(value).is_some())
    }
    fn parse_temporal(&self, value: &str) -> Option<NaiveDateTime> {
        for format in &self.config.temporal_formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Some(dt);
            }
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return date.and_hms_opt(0, 0, 0);
            }
        }
        None
    }
    fn numeric_stats(&self, series: &Series, column: &str) -> DataResult<NumericStats> {
        let casted = series
            .cast(&DataType::Float64)
            .map_err(|e| DataError::StatisticsError {
                column: column.to_string(),
                source: e,
            })?;
        let chunked = casted.f64().map_err(|e| DataError::StatisticsError {
            column: column.to_string(),
            source: e,
        })?;
        Ok(NumericStats {
            min: chunked.min(),
            max: chunked.max(),
            mean: chunked.mean(),
            median: chunked.median(),
            std_dev: chunked.std(1),
        })
    }
    fn temporal_stats(&self, series: &Series, column: &str) -> DataResult<TemporalStats> {
        let rendered = self.string_values(series, column)?;
        let mut parsed: Vec<NaiveDateTime> = rendered
            .iter()
            .flatten()
            .filter_map(|value| self.parse_temporal(value))
            .collect();
        if parsed.is_empty() {
            return Ok(TemporalStats {
                min_date: None,
                max_date: None,
                date_range_days: None,
            });
        }
        parsed.sort();
        let first = parsed[0];
        let last = parsed[parsed.len() - 1];
        Ok(TemporalStats {
            min_date: Some(first.to_string()),
            max_date: Some(last.to_string()),
            date_range_days: Some(last.signed_duration_since(first).num_days()),
        })
    }
    fn top_values(&self, series: &Series, column: &str) -> DataResult<Vec<ValueCount>> {
        let rendered = self.string_values(series, column)?;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in rendered.iter().flatten() {
            *counts.entry(value.as_str()).or_insert(0) += 1;
        }
        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.config.top_value_count);
        Ok(ranked
            .into_iter()
            .map(|(value, count)| ValueCount {
                value: value.to_string(),
                count,
            })
            .collect())
    }
    fn sample_values(&self, series: &Series, column: &str) -> DataResult<Vec<String>> {
        let unique = series.unique().map_err(|e| DataError::StatisticsError {
            column: column.to_string(),
            source: e,
        })?;
        let sample = unique.head(Some(self.config.max_sample_values));
        let rendered = self.string_values(&sample, column)?;
        Ok(rendered.into_iter().flatten().collect())
    }
    fn string_values(&self, series: &Series, column: &str) -> DataResult<Vec<Option<String>>> {
        let casted = series
            .cast(&DataType::String)
            .map_err(|e| DataError::StatisticsError {
                column: column.to_string(),
                source: e,
            })?;
        let chunked = casted.str().map_err(|e| DataError::StatisticsError {
            column: column.to_string(),
            source: e,
        })?;
        Ok(chunked
            .into_iter()
            .map(|value| value.map(String::from))
            .collect())
    }
    fn detect_relationships(
        &self,
        df: &DataFrame,
        columns: &[ColumnProfile],
    ) -> DataResult<Vec<RelationshipHint>> {
        let keyish: Vec<bool> = columns.iter().map(|c| has_key_token(&c.name)).collect();
        if !keyish.iter().any(|k| *k) {
            return Ok(Vec::new());
        }
        let mut value_sets: Vec<HashSet<String>> = Vec::with_capacity(columns.len());
        for (column, profile) in df.get_columns().iter().zip(columns) {
            let series = column.as_series().ok_or_else(|| {
                utils::column_failure(&profile.name, "column does not hold a series")
            })?;
            let rendered = self.string_values(series, &profile.name)?;
            value_sets.push(rendered.into_iter().flatten().collect());
        }
        let mut hints = Vec::new();
        for ((i, left), (j, right)) in (0..columns.len()).zip(columns).tuple_combinations() {
            if !keyish[i] && !keyish[j] {
                continue;
            }
            let shared = value_sets[i].intersection(&value_sets[j]).count();
            if shared == 0 {
                continue;
            }
            let denominator = left.unique_count.min(right.unique_count);
            if denominator == 0 {
                continue;
            }
            hints.push(RelationshipHint {
                from_column: left.name.clone(),
                to_column: right.name.clone(),
                kind: "potential_foreign_key".to_string(),
                strength: shared as f64 / denominator as f64,
            });
        }
        Ok(hints)
    }
    fn count_duplicate_rows(&self, df: &DataFrame) -> DataResult<usize> {
        let mut rendered_columns: Vec<Vec<Option<String>>> = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let series = column.as_series().ok_or_else(|| {
                utils::column_failure(column.name(), "column does not hold a series")
            })?;
            rendered_columns.push(self.string_values(series, series.name())?);
        }
        let mut distinct: HashSet<String> = HashSet::with_capacity(df.height());
        for row in 0..df.height() {
            let key = rendered_columns
                .iter()
                .map(|values| values[row].as_deref().unwrap_or("\u{0}"))
                .collect::<Vec<_>>()
                .join("\u{1f}");
            distinct.insert(key);
        }
        Ok(df.height() - distinct.len())
    }
    fn quality_issues(
        &self,
        completeness_score: f64,
        duplicate_row_count: usize,
        row_count: usize,
        columns: &[ColumnProfile],
    ) -> Vec<String> {
        let mut issues = Vec::new();
        if completeness_score < self.config.completeness_warning {
            issues.push(format!(
                "High rate of null values (completeness below {:.0}%)",
                self.config.completeness_warning
            ));
        }
        if duplicate_row_count as f64 > row_count as f64 * self.config.duplicate_warning_ratio {
            issues.push(format!(
                "High number of duplicate rows (above {:.0}% of the dataset)",
                self.config.duplicate_warning_ratio * 100.0
            ));
        }
        for column in columns {
            if column.unique_count == row_count {
                issues.push(format!(
                    "Column '{}' looks like a unique identifier",
                    column.name
                ));
            }
        }
        if issues.is_empty() {
            issues.push("Data quality looks good".to_string());
        }
        issues
    }
}

impl Default for SemanticProfiler {
    fn default() -> Self {
        Self::new()
    }
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn has_key_token(name: &str) -> bool {
    let lowered = name.to_lowercase();
    classification::KEY_TOKENS
        .iter()
        .any(|token| lowered.contains(token))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
