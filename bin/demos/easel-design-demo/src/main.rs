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
use easel::{
    colour, template_catalogue, DashboardDesignSystem, ErrorReporter, ModelStructure,
    VisualRecommender,
};
use polars::prelude::*;
use tracing::{info, Level};

const SAMPLE_MODEL: &str = r#"{
    "tables": [
        {
            "name": "Sales",
            "table_type": "fact",
            "columns": [
                {"name": "OrderDate", "data_type": "DateTime"},
                {"name": "UnitPrice", "data_type": "Double"},
                {"name": "TotalAmount", "data_type": "Decimal"},
                {"name": "CustomerKey", "data_type": "Int64"}
            ],
            "measures": [
                {"name": "Total Revenue", "expression": "SUM(Sales[TotalAmount])", "format_string": "$ #,##0.00"},
                {"name": "Order Count", "expression": "COUNTROWS(Sales)"}
            ]
        },
        {
            "name": "Customers",
            "table_type": "dimension",
            "columns": [
                {"name": "CustomerKey", "data_type": "Int64"},
                {"name": "Region", "data_type": "String"}
            ]
        },
        {
            "name": "LocalDateTable_1a2b",
            "hidden": true,
            "columns": [{"name": "Date", "data_type": "DateTime"}]
        }
    ],
    "relationships": [
        {
            "from_table": "Sales",
            "from_column": "CustomerKey",
            "to_table": "Customers",
            "to_column": "CustomerKey",
            "cardinality": "many_to_one"
        }
    ]
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter("info")
        .init();

    if let Err(e) = run() {
        eprintln!("Design walkthrough failed: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let system = DashboardDesignSystem::new();
    let frame = match std::env::args().nth(1) {
        Some(path) => load_csv(&path)?,
        None => sample_frame()?,
    };

    let profile = system.profile_dataframe(&frame)?;
    println!("\n=== Dataset Profile ===");
    print!("{}", profile.report());
    println!("Columns:");
    for column in &profile.columns {
        println!("  - {column}");
    }
    println!();

    let suggestions = VisualRecommender::new().suggest(&profile);
    println!("=== Visual Suggestions ===");
    for suggestion in &suggestions {
        println!(
            "[{}] {} - {}",
            suggestion.priority, suggestion.chart_type, suggestion.title
        );
        println!("        {}", suggestion.reason);
    }

    let palette = system.palette_for_context("financial", "professional");
    println!("\n=== Palette: {} ===", palette.name);
    println!(
        "primary {} | secondary {} | accent {}",
        palette.primary, palette.secondary, palette.accent
    );
    let contrast = colour::validate_accessibility(&palette.foreground, &palette.background)?;
    println!(
        "foreground on background: {:.2}:1 ({})",
        contrast.contrast_ratio,
        contrast.rating.as_str()
    );
    let harmony = system.build_palette(&palette.primary, "triadic", 5)?;
    println!("triadic variations: {}", harmony.colors.join(", "));
    let gradient = colour::generate_gradient(&palette.primary, &palette.background, 5)?;
    println!("gradient ramp: {}", gradient.join(" "));

    println!("\n=== Layout Templates ===");
    for template in template_catalogue() {
        println!("{:<18} {}", template.key, template.description);
    }
    let layout = system.build_layout("executive_summary", suggestions.len());
    println!("\n=== Layout: {} ===", layout.template_name);
    for visual in &layout.visuals {
        println!(
            "{:<16} x={:<5} y={:<5} {}x{}  ({})",
            visual.id,
            visual.rect.x,
            visual.rect.y,
            visual.rect.width,
            visual.rect.height,
            visual.suggested_visual
        );
    }

    let model: ModelStructure =
        serde_json::from_str(SAMPLE_MODEL).context("parsing bundled model metadata")?;
    let analysis = system.analyse_model(&model)?;
    println!("\n=== Model Health ===");
    println!(
        "{} visible tables, score {} ({})",
        analysis.tables.len(),
        analysis.health.score,
        analysis.health.status
    );
    for issue in &analysis.health.issues {
        println!("- {issue}");
    }
    for recommendation in &analysis.recommendations {
        println!("[{}] {}", recommendation.priority, recommendation.message);
    }
    println!("=== Model Visuals ===");
    for suggestion in &analysis.suggested_visuals {
        println!("[{}] {}", suggestion.priority, suggestion.title);
    }

    println!("\n=== Error Reporting ===");
    if let Err(error) = system.build_palette("not-a-colour", "triadic", 5) {
        print!("{}", ErrorReporter::new().report(&error));
        println!("Hint: {}", error.user_message());
    }

    let exported = system.export_profile_json(&profile)?;
    std::fs::write("dataset_profile.json", &exported).context("writing dataset_profile.json")?;
    println!(
        "\nProfile exported to dataset_profile.json ({} bytes)",
        exported.len()
    );
    Ok(())
}

fn load_csv(path: &str) -> Result<DataFrame> {
    info!("Loading dataset from {path}");
    let frame = CsvReadOptions::default()
        .with_infer_schema_length(Some(200))
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("opening {path}"))?
        .finish()
        .with_context(|| format!("reading {path}"))?;
    Ok(frame)
}

fn sample_frame() -> Result<DataFrame> {
    info!("No dataset supplied, profiling the bundled sales sample");
    let frame = df!(
        "order_date" => [
            "2024-06-01", "2024-06-02", "2024-06-03", "2024-06-04",
            "2024-06-05", "2024-06-06", "2024-06-07", "2024-06-08",
            "2024-06-09", "2024-06-10", "2024-06-11", "2024-06-12",
        ],
        "revenue" => [
            1250.0f64, 980.5, 1430.0, 1115.25, 1620.0, 890.75,
            1250.0, 1345.5, 1010.0, 1480.25, 930.5, 1290.0,
        ],
        "margin_pct" => [
            18.5f64, 22.0, 17.25, 24.5, 19.75, 21.0,
            18.5, 23.25, 20.0, 16.5, 22.75, 19.0,
        ],
        "region" => [
            "North", "South", "East", "West", "North", "South",
            "East", "West", "North", "South", "East", "West",
        ],
    )?;
    Ok(frame)
}
