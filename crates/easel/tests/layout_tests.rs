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

use easel::{template_catalogue, Layout, LayoutAllocator, LayoutError, TemplateKind};

fn assert_geometry_invariants(layout: &Layout) {
    for visual in &layout.visuals {
        assert!(visual.rect.width > 0, "{} has zero width", visual.id);
        assert!(visual.rect.height > 0, "{} has zero height", visual.id);
        assert!(
            visual.rect.x + visual.rect.width <= layout.canvas.width,
            "{} exceeds canvas width",
            visual.id
        );
        assert!(
            visual.rect.y + visual.rect.height <= layout.canvas.height,
            "{} exceeds canvas height",
            visual.id
        );
    }
    for (i, a) in layout.visuals.iter().enumerate() {
        for b in layout.visuals.iter().skip(i + 1) {
            assert!(
                !a.rect.overlaps(&b.rect),
                "{} overlaps {} in {}",
                a.id,
                b.id,
                layout.template_name
            );
        }
    }
}

#[test]
fn test_executive_summary_placements_never_overlap() {
    let layout = LayoutAllocator::new().generate("executiveSummary", 6);
    assert_eq!(layout.template_name, "Executive Summary");
    assert_eq!(layout.canvas.width, 1280);
    assert_eq!(layout.canvas.height, 720);
    assert_eq!(layout.visuals.len(), 7);
    assert_geometry_invariants(&layout);
    let ids: Vec<&str> = layout.visuals.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "kpi_1",
            "kpi_2",
            "kpi_3",
            "kpi_4",
            "main_chart_5",
            "support_chart_6",
            "support_chart_7",
        ]
    );
}

#[test]
fn test_every_template_satisfies_geometry_invariants() {
    for kind in TemplateKind::ALL {
        let layout = LayoutAllocator::new().generate(kind.key(), 4);
        assert_eq!(layout.template_name, kind.display_name());
        assert!(!layout.visuals.is_empty(), "{} is empty", kind.key());
        assert_geometry_invariants(&layout);
    }
}

#[test]
fn test_unknown_template_falls_back_deterministically() {
    let first = LayoutAllocator::new().generate("doesNotExist", 4);
    let second = LayoutAllocator::new().generate("doesNotExist", 4);
    let fallback = LayoutAllocator::new().generate("detailed_analysis", 4);
    assert_eq!(first.template_name, "Detailed Analysis");
    assert_eq!(second.template_name, first.template_name);
    assert_eq!(first.visuals.len(), fallback.visuals.len());
    for (a, b) in first.visuals.iter().zip(&fallback.visuals) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.rect, b.rect);
    }
}

#[test]
fn test_identity_rescale_preserves_geometry() {
    let allocator = LayoutAllocator::new();
    let layout = allocator.generate("storytelling", 5);
    let rescaled = allocator.rescale(&layout, 1280, 720).unwrap();
    for (a, b) in layout.visuals.iter().zip(&rescaled.visuals) {
        assert_eq!(a.rect, b.rect);
    }
}

#[test]
fn test_rescale_halves_every_coordinate() {
    let allocator = LayoutAllocator::new();
    let layout = allocator.generate("comparison_view", 2);
    let rescaled = allocator.rescale(&layout, 640, 360).unwrap();
    assert_eq!(rescaled.canvas.width, 640);
    assert_eq!(rescaled.canvas.height, 360);
    for (a, b) in layout.visuals.iter().zip(&rescaled.visuals) {
        assert_eq!(b.rect.x, a.rect.x / 2);
        assert_eq!(b.rect.y, a.rect.y / 2);
        assert_eq!(b.rect.width, a.rect.width / 2);
        assert_eq!(b.rect.height, a.rect.height / 2);
    }
}

#[test]
fn test_rescale_rejects_zero_dimensions() {
    let allocator = LayoutAllocator::new();
    let layout = allocator.generate("single_focus", 3);
    assert!(matches!(
        allocator.rescale(&layout, 0, 720),
        Err(LayoutError::InvalidCanvas { .. })
    ));
    assert!(matches!(
        allocator.rescale(&layout, 1920, 0),
        Err(LayoutError::InvalidCanvas { .. })
    ));
}

#[test]
fn test_reprioritise_assigns_descending_z_order() {
    let allocator = LayoutAllocator::new();
    let mut layout = allocator.generate("executive_summary", 6);
    allocator.reprioritise(&mut layout, &["main_chart_5", "kpi_1", "support_chart_6"]);
    let z = |id: &str| {
        layout
            .visuals
            .iter()
            .find(|v| v.id == id)
            .map(|v| v.rect.z_index)
            .unwrap()
    };
    assert_eq!(z("main_chart_5"), 3);
    assert_eq!(z("kpi_1"), 2);
    assert_eq!(z("support_chart_6"), 1);
    assert_eq!(z("kpi_2"), 0);
}

#[test]
fn test_reprioritise_ignores_unknown_ids() {
    let allocator = LayoutAllocator::new();
    let mut layout = allocator.generate("single_focus", 3);
    allocator.reprioritise(&mut layout, &["header", "no_such_visual", "footer_metrics"]);
    let z = |id: &str| {
        layout
            .visuals
            .iter()
            .find(|v| v.id == id)
            .map(|v| v.rect.z_index)
            .unwrap()
    };
    assert_eq!(z("header"), 3);
    assert_eq!(z("footer_metrics"), 1);
    assert_eq!(z("main_visual"), 0);
}

#[test]
fn test_catalogue_lists_all_templates_in_order() {
    let catalogue = template_catalogue();
    assert_eq!(catalogue.len(), 6);
    assert_eq!(catalogue[0].key, "executive_summary");
    assert_eq!(catalogue[1].display_name, "Detailed Analysis");
    for entry in &catalogue {
        assert!(!entry.description.is_empty());
    }
}

#[test]
fn test_normalised_template_names_resolve() {
    for spelling in ["modern_minimal", "modernMinimal", "Modern Minimal", "MODERN-MINIMAL"] {
        let layout = LayoutAllocator::new().generate(spelling, 5);
        assert_eq!(layout.template_name, "Modern Minimal");
    }
}
