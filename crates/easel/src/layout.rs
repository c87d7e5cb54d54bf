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

use crate::error::{LayoutError, LayoutResult};
use crate::recommender::Priority;
use serde::{Deserialize, Serialize};
use tracing::debug;

mod canvas {
    pub const WIDTH: u32 = 1280;
    pub const HEIGHT: u32 = 720;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualKind {
    Card,
    Chart,
    Text,
    Metrics,
    Container,
    Hero,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub z_index: u32,
}

impl Rect {
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualPlacement {
    pub id: String,
    pub visual_kind: VisualKind,
    pub rect: Rect,
    pub priority: Priority,
    pub suggested_visual: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub template_name: String,
    pub canvas: Canvas,
    pub visuals: Vec<VisualPlacement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateKind {
    ExecutiveSummary,
    DetailedAnalysis,
    SingleFocus,
    ComparisonView,
    Storytelling,
    ModernMinimal,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::ExecutiveSummary,
        TemplateKind::DetailedAnalysis,
        TemplateKind::SingleFocus,
        TemplateKind::ComparisonView,
        TemplateKind::Storytelling,
        TemplateKind::ModernMinimal,
    ];
    pub fn from_name(name: &str) -> TemplateKind {
        match normalise_key(name).as_str() {
            "executivesummary" => TemplateKind::ExecutiveSummary,
            "detailedanalysis" => TemplateKind::DetailedAnalysis,
            "singlefocus" => TemplateKind::SingleFocus,
            "comparisonview" => TemplateKind::ComparisonView,
            "storytelling" | "storytellingflow" => TemplateKind::Storytelling,
            "modernminimal" => TemplateKind::ModernMinimal,
            other => {
                debug!(
                    requested = other,
                    "unknown template, using the detailed analysis fallback"
                );
                TemplateKind::DetailedAnalysis
            }
        }
    }
    pub fn key(self) -> &'static str {
        match self {
            TemplateKind::ExecutiveSummary => "executive_summary",
            TemplateKind::DetailedAnalysis => "detailed_analysis",
            TemplateKind::SingleFocus => "single_focus",
            TemplateKind::ComparisonView => "comparison_view",
            TemplateKind::Storytelling => "storytelling",
            TemplateKind::ModernMinimal => "modern_minimal",
        }
    }
    pub fn display_name(self) -> &'static str {
        match self {
            TemplateKind::ExecutiveSummary => "Executive Summary",
            TemplateKind::DetailedAnalysis => "Detailed Analysis",
            TemplateKind::SingleFocus => "Single Focus",
            TemplateKind::ComparisonView => "Comparison View",
            TemplateKind::Storytelling => "Storytelling Flow",
            TemplateKind::ModernMinimal => "Modern Minimal",
        }
    }
    pub fn description(self) -> &'static str {
        match self {
            TemplateKind::ExecutiveSummary => {
                "KPI row, a dominant trend chart and two supporting charts"
            }
            TemplateKind::DetailedAnalysis => {
                "Title bar, filter panel and a six-chart analysis grid"
            }
            TemplateKind::SingleFocus => "One featured visual framed by a header and a metric row",
            TemplateKind::ComparisonView => "Two side-by-side containers for direct comparison",
            TemplateKind::Storytelling => "Hero visual, three insight cards and a detail section",
            TemplateKind::ModernMinimal => "Asymmetric KPI arrangement with a wide main chart",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub key: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
}

pub fn template_catalogue() -> Vec<TemplateInfo> {
    TemplateKind::ALL
        .iter()
        .map(|kind| TemplateInfo {
            key: kind.key(),
            display_name: kind.display_name(),
            description: kind.description(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum IdRule {
    Fixed(&'static str),
    GlobalNumbered(&'static str),
    SectionNumbered(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct SlotSpec {
    id: IdRule,
    kind: VisualKind,
    priority: Priority,
    label: &'static str,
}

#[derive(Debug, Clone)]
enum Section {
    Row {
        height: u32,
        count: usize,
        slot: SlotSpec,
    },
    Columns {
        height: u32,
        slots: Vec<SlotSpec>,
    },
    PanelWithGrid {
        panel: SlotSpec,
        panel_width: u32,
        grid: SlotSpec,
        columns: usize,
        rows: usize,
    },
    Fixed {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        slot: SlotSpec,
    },
    FixedStack {
        x: u32,
        y: u32,
        width: u32,
        cell_height: u32,
        stack_gap: u32,
        count: usize,
        slot: SlotSpec,
    },
}

#[derive(Debug, Clone)]
struct TemplateSpec {
    padding: u32,
    gap: u32,
    sections: Vec<Section>,
}

fn template_spec(kind: TemplateKind) -> TemplateSpec {
    match kind {
        TemplateKind::ExecutiveSummary => TemplateSpec {
            padding: 20,
            gap: 15,
            sections: vec![
                Section::Row {
                    height: 140,
                    count: 4,
                    slot: SlotSpec {
                        id: IdRule::GlobalNumbered("kpi"),
                        kind: VisualKind::Card,
                        priority: Priority::High,
                        label: "KPI Card",
                    },
                },
                Section::Row {
                    height: 330,
                    count: 1,
                    slot: SlotSpec {
                        id: IdRule::GlobalNumbered("main_chart"),
                        kind: VisualKind::Chart,
                        priority: Priority::High,
                        label: "Line Chart or Bar Chart",
                    },
                },
                Section::Row {
                    height: 180,
                    count: 2,
                    slot: SlotSpec {
                        id: IdRule::GlobalNumbered("support_chart"),
                        kind: VisualKind::Chart,
                        priority: Priority::Medium,
                        label: "Supporting Chart",
                    },
                },
            ],
        },
        TemplateKind::DetailedAnalysis => TemplateSpec {
            padding: 20,
            gap: 15,
            sections: vec![
                Section::Row {
                    height: 80,
                    count: 1,
                    slot: SlotSpec {
                        id: IdRule::Fixed("title_bar"),
                        kind: VisualKind::Text,
                        priority: Priority::High,
                        label: "Title/Header",
                    },
                },
                Section::PanelWithGrid {
                    panel: SlotSpec {
                        id: IdRule::Fixed("filter_panel"),
                        kind: VisualKind::Container,
                        priority: Priority::Medium,
                        label: "Filter Panel",
                    },
                    panel_width: 280,
                    grid: SlotSpec {
                        id: IdRule::SectionNumbered("chart"),
                        kind: VisualKind::Chart,
                        priority: Priority::Medium,
                        label: "Analysis Chart",
                    },
                    columns: 3,
                    rows: 2,
                },
            ],
        },
        TemplateKind::SingleFocus => TemplateSpec {
            padding: 40,
            gap: 20,
            sections: vec![
                Section::Row {
                    height: 90,
                    count: 1,
                    slot: SlotSpec {
                        id: IdRule::Fixed("header"),
                        kind: VisualKind::Text,
                        priority: Priority::High,
                        label: "Title/Header",
                    },
                },
                Section::Row {
                    height: 420,
                    count: 1,
                    slot: SlotSpec {
                        id: IdRule::Fixed("main_visual"),
                        kind: VisualKind::Chart,
                        priority: Priority::High,
                        label: "Featured Chart",
                    },
                },
                Section::Row {
                    height: 90,
                    count: 1,
                    slot: SlotSpec {
                        id: IdRule::Fixed("footer_metrics"),
                        kind: VisualKind::Metrics,
                        priority: Priority::Medium,
                        label: "Metric Row",
                    },
                },
            ],
        },
        TemplateKind::ComparisonView => TemplateSpec {
            padding: 20,
            gap: 20,
            sections: vec![Section::Columns {
                height: 680,
                slots: vec![
                    SlotSpec {
                        id: IdRule::Fixed("left_panel"),
                        kind: VisualKind::Container,
                        priority: Priority::High,
                        label: "Container for left visuals",
                    },
                    SlotSpec {
                        id: IdRule::Fixed("right_panel"),
                        kind: VisualKind::Container,
                        priority: Priority::High,
                        label: "Container for right visuals",
                    },
                ],
            }],
        },
        TemplateKind::Storytelling => TemplateSpec {
            padding: 30,
            gap: 15,
            sections: vec![
                Section::Row {
                    height: 260,
                    count: 1,
                    slot: SlotSpec {
                        id: IdRule::Fixed("hero"),
                        kind: VisualKind::Hero,
                        priority: Priority::High,
                        label: "Hero Visual",
                    },
                },
                Section::Row {
                    height: 195,
                    count: 3,
                    slot: SlotSpec {
                        id: IdRule::SectionNumbered("insight_card"),
                        kind: VisualKind::Card,
                        priority: Priority::High,
                        label: "Insight Card",
                    },
                },
                Section::Row {
                    height: 175,
                    count: 1,
                    slot: SlotSpec {
                        id: IdRule::Fixed("details"),
                        kind: VisualKind::Detail,
                        priority: Priority::Medium,
                        label: "Detail Chart",
                    },
                },
            ],
        },
        TemplateKind::ModernMinimal => TemplateSpec {
            padding: 30,
            gap: 20,
            sections: vec![
                Section::Fixed {
                    x: 30,
                    y: 30,
                    width: 400,
                    height: 300,
                    slot: SlotSpec {
                        id: IdRule::Fixed("featured_kpi"),
                        kind: VisualKind::Card,
                        priority: Priority::High,
                        label: "Featured KPI",
                    },
                },
                Section::FixedStack {
                    x: 480,
                    y: 30,
                    width: 750,
                    cell_height: 93,
                    stack_gap: 10,
                    count: 3,
                    slot: SlotSpec {
                        id: IdRule::SectionNumbered("secondary_kpi"),
                        kind: VisualKind::Card,
                        priority: Priority::Medium,
                        label: "Secondary KPI",
                    },
                },
                Section::Fixed {
                    x: 30,
                    y: 380,
                    width: 1220,
                    height: 310,
                    slot: SlotSpec {
                        id: IdRule::Fixed("main_chart"),
                        kind: VisualKind::Chart,
                        priority: Priority::High,
                        label: "Main Chart",
                    },
                },
            ],
        },
    }
}

struct Cursor {
    y: u32,
    counter: usize,
}

pub struct LayoutAllocator;

impl LayoutAllocator {
    pub fn new() -> Self {
        Self
    }
    pub fn generate(&self, template_name: &str, visual_count: usize) -> Layout {
        let kind = TemplateKind::from_name(template_name);
        debug!(template = kind.key(), visual_count, "building layout");
        let spec = template_spec(kind);
        let canvas = Canvas {
            width: canvas::WIDTH,
            height: canvas::HEIGHT,
        };
        let mut visuals = Vec::new();
        let mut cursor = Cursor {
            y: spec.padding,
            counter: 1,
        };
        for section in &spec.sections {
            place_section(section, &spec, canvas, &mut cursor, &mut visuals);
        }
        Layout {
            template_name: kind.display_name().to_string(),
            canvas,
            visuals,
        }
    }
    pub fn rescale(&self, layout: &Layout, width: u32, height: u32) -> LayoutResult<Layout> {
        if width == 0 || height == 0 {
            return Err(LayoutError::InvalidCanvas { width, height });
        }
        if layout.canvas.width == 0 || layout.canvas.height == 0 {
            return Err(LayoutError::InvalidCanvas {
                width: layout.canvas.width,
                height: layout.canvas.height,
            });
        }
        let scale_x = f64::from(width) / f64::from(layout.canvas.width);
        let scale_y = f64::from(height) / f64::from(layout.canvas.height);
        let visuals = layout
            .visuals
            .iter()
            .map(|visual| VisualPlacement {
                id: visual.id.clone(),
                visual_kind: visual.visual_kind,
                rect: Rect {
                    x: scale(visual.rect.x, scale_x),
                    y: scale(visual.rect.y, scale_y),
                    width: scale(visual.rect.width, scale_x),
                    height: scale(visual.rect.height, scale_y),
                    z_index: visual.rect.z_index,
                },
                priority: visual.priority,
                suggested_visual: visual.suggested_visual.clone(),
            })
            .collect();
        Ok(Layout {
            template_name: layout.template_name.clone(),
            canvas: Canvas { width, height },
            visuals,
        })
    }
    pub fn reprioritise(&self, layout: &mut Layout, ordered_ids: &[&str]) {
        let total = ordered_ids.len() as u32;
        for (position, id) in ordered_ids.iter().enumerate() {
            match layout.visuals.iter_mut().find(|v| v.id == *id) {
                Some(visual) => visual.rect.z_index = total - position as u32,
                None => debug!(id = %id, "reprioritise skipped an unknown id"),
            }
        }
    }
}

impl Default for LayoutAllocator {
    fn default() -> Self {
        Self::new()
    }
}

fn place_section(
    section: &Section,
    spec: &TemplateSpec,
    canvas: Canvas,
    cursor: &mut Cursor,
    out: &mut Vec<VisualPlacement>,
) {
    match section {
        Section::Row {
            height,
            count,
            slot,
        } => {
            let inner = canvas.width - 2 * spec.padding;
            let width = (inner - (*count as u32 - 1) * spec.gap) / *count as u32;
            for i in 0..*count {
                let x = spec.padding + i as u32 * (width + spec.gap);
                let rect = Rect {
                    x,
                    y: cursor.y,
                    width,
                    height: *height,
                    z_index: 0,
                };
                push_slot(out, cursor, slot, i, rect);
            }
            cursor.y += height + spec.gap;
        }
        Section::Columns { height, slots } => {
            let inner = canvas.width - 2 * spec.padding;
            let width = (inner - (slots.len() as u32 - 1) * spec.gap) / slots.len() as u32;
            for (i, slot) in slots.iter().enumerate() {
                let rect = Rect {
                    x: spec.padding + i as u32 * (width + spec.gap),
                    y: cursor.y,
                    width,
                    height: *height,
                    z_index: 0,
                };
                push_slot(out, cursor, slot, i, rect);
            }
            cursor.y += height + spec.gap;
        }
        Section::PanelWithGrid {
            panel,
            panel_width,
            grid,
            columns,
            rows,
        } => {
            let available_height = canvas.height - spec.padding - cursor.y;
            let panel_rect = Rect {
                x: spec.padding,
                y: cursor.y,
                width: *panel_width,
                height: available_height,
                z_index: 0,
            };
            push_slot(out, cursor, panel, 0, panel_rect);
            let grid_x = spec.padding + panel_width + spec.gap;
            let grid_width = canvas.width - spec.padding - grid_x;
            let cell_width = (grid_width - (*columns as u32 - 1) * spec.gap) / *columns as u32;
            let cell_height = (available_height - (*rows as u32 - 1) * spec.gap) / *rows as u32;
            for row in 0..*rows {
                for column in 0..*columns {
                    let rect = Rect {
                        x: grid_x + column as u32 * (cell_width + spec.gap),
                        y: cursor.y + row as u32 * (cell_height + spec.gap),
                        width: cell_width,
                        height: cell_height,
                        z_index: 0,
                    };
                    push_slot(out, cursor, grid, row * columns + column, rect);
                }
            }
            cursor.y = canvas.height - spec.padding;
        }
        Section::Fixed {
            x,
            y,
            width,
            height,
            slot,
        } => {
            let rect = Rect {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
                z_index: 0,
            };
            push_slot(out, cursor, slot, 0, rect);
        }
        Section::FixedStack {
            x,
            y,
            width,
            cell_height,
            stack_gap,
            count,
            slot,
        } => {
            for i in 0..*count {
                let rect = Rect {
                    x: *x,
                    y: y + i as u32 * (cell_height + stack_gap),
                    width: *width,
                    height: *cell_height,
                    z_index: 0,
                };
                push_slot(out, cursor, slot, i, rect);
            }
        }
    }
}

fn push_slot(
    out: &mut Vec<VisualPlacement>,
    cursor: &mut Cursor,
    slot: &SlotSpec,
    section_index: usize,
    rect: Rect,
) {
    let id = match slot.id {
        IdRule::Fixed(name) => name.to_string(),
        IdRule::GlobalNumbered(prefix) => format!("{prefix}_{}", cursor.counter),
        IdRule::SectionNumbered(prefix) => format!("{prefix}_{}", section_index + 1),
    };
    cursor.counter += 1;
    out.push(VisualPlacement {
        id,
        visual_kind: slot.kind,
        rect,
        priority: slot.priority,
        suggested_visual: slot.label.to_string(),
    });
}

fn scale(value: u32, factor: f64) -> u32 {
    (f64::from(value) * factor).round() as u32
}

fn normalise_key(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executive_summary_fills_canvas() {
        let layout = LayoutAllocator::new().generate("executive_summary", 6);
        assert_eq!(layout.template_name, "Executive Summary");
        assert_eq!(layout.visuals.len(), 7);
        let last = layout
            .visuals
            .iter()
            .find(|v| v.id == "support_chart_7")
            .unwrap();
        assert_eq!(last.rect.y + last.rect.height + 20, 720);
    }

    #[test]
    fn test_detailed_analysis_grid_geometry() {
        let layout = LayoutAllocator::new().generate("detailed_analysis", 8);
        let panel = layout.visuals.iter().find(|v| v.id == "filter_panel").unwrap();
        assert_eq!(panel.rect.x + panel.rect.width, 300);
        for chart in layout.visuals.iter().filter(|v| v.id.starts_with("chart_")) {
            assert!(chart.rect.x >= 315);
        }
        assert_eq!(
            layout
                .visuals
                .iter()
                .filter(|v| v.id.starts_with("chart_"))
                .count(),
            6
        );
    }

    #[test]
    fn test_comparison_view_panel_separation() {
        let layout = LayoutAllocator::new().generate("comparison_view", 2);
        let left = layout.visuals.iter().find(|v| v.id == "left_panel").unwrap();
        let right = layout.visuals.iter().find(|v| v.id == "right_panel").unwrap();
        assert_eq!(left.rect.x + left.rect.width + 20, right.rect.x);
        assert!(!left.rect.overlaps(&right.rect));
    }
}
