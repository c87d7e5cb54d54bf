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

pub mod colour;
pub mod error;
pub mod layout;
pub mod model;
pub mod profiler;
pub mod recommender;

pub use colour::{
    ContrastRating, ContrastReport, HarmonyScheme, Palette, PalettePreset, Rgb,
};
pub use error::{
    ColourError, DataError, DesignError, ErrorReporter, ErrorSeverity, LayoutError, ModelError,
    Result,
};
pub use layout::{
    template_catalogue, Canvas, Layout, LayoutAllocator, Rect, TemplateInfo, TemplateKind,
    VisualKind, VisualPlacement,
};
pub use model::{
    ColumnSummary, HealthStatus, ModelAnalyser, ModelAnalysis, ModelColumn, ModelHealth,
    ModelMeasure, ModelRecommendation, ModelRelationship, ModelStructure, RecommendationKind,
    TableMetadata, TableSummary,
};
pub use profiler::{
    ColumnProfile, DatasetProfile, ProfilerConfig, RelationshipHint, SemanticProfiler,
    SemanticType,
};
pub use recommender::{ChartType, Priority, VisualRecommender, VisualSuggestion};

use polars::prelude::DataFrame;

pub struct DashboardDesignSystem {
    profiler: SemanticProfiler,
    recommender: VisualRecommender,
    allocator: LayoutAllocator,
    analyser: ModelAnalyser,
}

impl DashboardDesignSystem {
    pub fn new() -> Self {
        Self {
            profiler: SemanticProfiler::new(),
            recommender: VisualRecommender::new(),
            allocator: LayoutAllocator::new(),
            analyser: ModelAnalyser::new(),
        }
    }
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self {
            profiler: SemanticProfiler::with_config(config),
            recommender: VisualRecommender::new(),
            allocator: LayoutAllocator::new(),
            analyser: ModelAnalyser::new(),
        }
    }
    pub fn profile_dataframe(&self, df: &DataFrame) -> Result<DatasetProfile> {
        Ok(self.profiler.profile(df)?)
    }
    pub fn suggest_visuals(&self, df: &DataFrame) -> Result<Vec<VisualSuggestion>> {
        let profile = self.profiler.profile(df)?;
        Ok(self.recommender.suggest(&profile))
    }
    pub fn analyse_model(&self, structure: &ModelStructure) -> Result<ModelAnalysis> {
        Ok(self.analyser.analyse(structure)?)
    }
    pub fn palette_for_context(&self, domain: &str, mood: &str) -> Palette {
        colour::suggest_for_context(domain, mood)
    }
    pub fn build_palette(&self, base: &str, scheme: &str, count: usize) -> Result<Palette> {
        Ok(colour::generate_from_base(base, scheme, count)?)
    }
    pub fn build_layout(&self, template_name: &str, visual_count: usize) -> Layout {
        self.allocator.generate(template_name, visual_count)
    }
    pub fn export_profile_json(&self, profile: &DatasetProfile) -> Result<String> {
        Ok(serde_json::to_string_pretty(profile)?)
    }
}

impl Default for DashboardDesignSystem {
    fn default() -> Self {
        Self::new()
    }
}
