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

use easel::{ChartType, DashboardDesignSystem, Priority, VisualSuggestion};
use polars::prelude::*;

fn sales_frame() -> DataFrame {
    df!(
        "day" => [
            "2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05",
            "2024-01-06", "2024-01-07", "2024-01-08", "2024-01-09", "2024-01-10",
        ],
        "sales" => [
            1250.0f64, 980.5, 1430.0, 1120.75, 990.0,
            1310.5, 1250.0, 860.25, 1475.0, 1010.5,
        ],
        "region" => [
            "North", "South", "East", "North", "South",
            "East", "North", "South", "East", "North",
        ],
    )
    .unwrap()
}

fn find(suggestions: &[VisualSuggestion], kind: ChartType) -> &VisualSuggestion {
    suggestions
        .iter()
        .find(|s| s.chart_type == kind)
        .unwrap_or_else(|| panic!("no {kind} suggestion"))
}

#[test]
fn test_sales_frame_yields_ranked_suggestions() {
    let system = DashboardDesignSystem::new();
    let suggestions = system.suggest_visuals(&sales_frame()).unwrap();
    let kinds: Vec<ChartType> = suggestions.iter().map(|s| s.chart_type).collect();
    assert_eq!(
        kinds,
        vec![
            ChartType::LineChart,
            ChartType::BarChart,
            ChartType::KpiCard,
            ChartType::Histogram,
            ChartType::DonutChart,
        ]
    );
    for suggestion in suggestions.iter().take(3) {
        assert_eq!(suggestion.priority, Priority::High);
    }
}

#[test]
fn test_suggestion_roles_reference_profiled_columns() {
    let system = DashboardDesignSystem::new();
    let suggestions = system.suggest_visuals(&sales_frame()).unwrap();

    let line = find(&suggestions, ChartType::LineChart);
    assert_eq!(line.columns["x"], vec!["day".to_string()]);
    assert_eq!(line.columns["y"], vec!["sales".to_string()]);
    assert_eq!(line.title, "Trend of sales over time");

    let bar = find(&suggestions, ChartType::BarChart);
    assert_eq!(bar.columns["category"], vec!["region".to_string()]);
    assert_eq!(bar.columns["value"], vec!["sales".to_string()]);
    assert_eq!(bar.title, "sales by region");

    let donut = find(&suggestions, ChartType::DonutChart);
    assert_eq!(donut.title, "Composition of sales by region");
}

#[test]
fn test_wide_numeric_frame_fires_every_rule_once() {
    let df = df!(
        "day" => [
            "2024-03-01", "2024-03-02", "2024-03-03", "2024-03-04",
            "2024-03-05", "2024-03-06", "2024-03-07", "2024-03-08",
            "2024-03-09", "2024-03-10", "2024-03-11", "2024-03-12",
        ],
        "revenue" => [
            1200.0f64, 980.5, 1500.0, 1320.75, 990.0, 1100.0,
            1200.0, 860.25, 1430.0, 1010.5, 1150.0, 940.0,
        ],
        "delta" => [
            -5.2f64, 3.1, -8.4, 2.2, 7.9, -1.5,
            3.1, -6.0, 4.4, -2.8, 1.9, -7.3,
        ],
        "score" => [
            55.0f64, 60.5, 71.0, 55.0, 82.5, 64.0,
            90.0, 47.5, 68.0, 73.5, 58.0, 77.0,
        ],
        "region" => [
            "North", "South", "East", "North", "South", "East",
            "North", "South", "East", "North", "South", "East",
        ],
    )
    .unwrap();
    let suggestions = DashboardDesignSystem::new().suggest_visuals(&df).unwrap();
    assert_eq!(suggestions.len(), 7);
    let weights: Vec<u8> = suggestions.iter().map(|s| s.priority.weight()).collect();
    let mut ranked = weights.clone();
    ranked.sort_by(|a, b| b.cmp(a));
    assert_eq!(weights, ranked);

    let line = find(&suggestions, ChartType::LineChart);
    assert_eq!(
        line.columns["y"],
        vec![
            "revenue".to_string(),
            "delta".to_string(),
            "score".to_string()
        ]
    );
    let heatmap = find(&suggestions, ChartType::Heatmap);
    assert_eq!(heatmap.priority, Priority::Low);
    assert_eq!(heatmap.columns["metrics"].len(), 3);
}

#[test]
fn test_identifier_and_free_text_produce_no_suggestions() {
    let df = df!(
        "ticket_id" => [101i64, 102, 103, 104, 105],
        "note" => [
            "escalated to tier two",
            "resolved on first contact",
            "pending customer reply",
            "duplicate of earlier report",
            "closed without action",
        ],
    )
    .unwrap();
    let suggestions = DashboardDesignSystem::new().suggest_visuals(&df).unwrap();
    assert!(suggestions.is_empty());
}

#[test]
fn test_empty_frame_surfaces_a_data_error() {
    let system = DashboardDesignSystem::new();
    assert!(system.suggest_visuals(&DataFrame::default()).is_err());
}
