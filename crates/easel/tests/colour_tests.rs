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

use easel::colour::{
    contrast_text_colour, generate_from_base, generate_gradient, preset, preset_catalogue,
    suggest_for_context, validate_accessibility,
};
use easel::{ColourError, ContrastRating, Rgb};
use proptest::prelude::*;

const SCHEMES: [&str; 6] = [
    "analogous",
    "complementary",
    "triadic",
    "tetradic",
    "monochromatic",
    "split_complementary",
];

#[test]
fn test_white_on_black_is_maximum_contrast() {
    let report = validate_accessibility("#FFFFFF", "#000000").unwrap();
    assert!((report.contrast_ratio - 21.0).abs() < 1e-9);
    assert!(report.passes_aa);
    assert!(report.passes_aa_large);
    assert!(report.passes_aaa);
    assert!(report.passes_aaa_large);
    assert_eq!(report.rating, ContrastRating::Excellent);
}

#[test]
fn test_gradient_endpoints_match_inputs() {
    let gradient = generate_gradient("#FF0000", "#0000FF", 5).unwrap();
    assert_eq!(gradient.len(), 5);
    assert!(gradient[0].eq_ignore_ascii_case("#FF0000"));
    assert!(gradient[4].eq_ignore_ascii_case("#0000FF"));
}

#[test]
fn test_gradient_edge_step_counts() {
    assert!(generate_gradient("#FF0000", "#0000FF", 0).unwrap().is_empty());
    let single = generate_gradient("#FF0000", "#0000FF", 1).unwrap();
    assert_eq!(single, vec!["#FF0000".to_string()]);
}

#[test]
fn test_every_scheme_yields_exactly_count_colours() {
    for scheme in SCHEMES {
        for count in 3..=10 {
            let palette = generate_from_base("#3366CC", scheme, count).unwrap();
            assert_eq!(palette.colors.len(), count, "scheme {scheme} count {count}");
            for colour in &palette.colors {
                Rgb::parse(colour).unwrap();
            }
            assert!(palette.scheme.is_some());
            palette.validate().unwrap();
        }
    }
}

#[test]
fn test_unknown_scheme_falls_back_to_analogous() {
    let fallback = generate_from_base("#3366CC", "no_such_scheme", 5).unwrap();
    let analogous = generate_from_base("#3366CC", "analogous", 5).unwrap();
    assert_eq!(fallback.colors, analogous.colors);
}

#[test]
fn test_zero_count_palette_is_an_error() {
    assert!(matches!(
        generate_from_base("#3366CC", "triadic", 0),
        Err(ColourError::EmptyPalette { .. })
    ));
}

#[test]
fn test_malformed_hex_is_a_typed_error() {
    for bad in ["", "#FFF", "123", "#12345G", "#1234567", "not a colour"] {
        assert!(
            matches!(
                validate_accessibility(bad, "#000000"),
                Err(ColourError::InvalidColourFormat { .. })
            ),
            "accepted {bad:?}"
        );
    }
}

#[test]
fn test_preset_lookup_and_fallback() {
    let dark = preset("modern_dark");
    assert_eq!(dark.primary, "#1E88E5");
    assert_eq!(dark.background, "#121212");
    assert_eq!(dark.colors.len(), 5);
    // Unknown names degrade to the default preset instead of failing.
    let unknown = preset("no_such_palette");
    assert_eq!(unknown.name, dark.name);
    assert_eq!(unknown.colors, dark.colors);
    // Normalised spellings resolve to the same entry.
    assert_eq!(preset("Modern-Dark").name, dark.name);
    assert_eq!(preset_catalogue().len(), 7);
}

#[test]
fn test_context_table_and_default_pair() {
    assert_eq!(
        suggest_for_context("financial", "professional").name,
        preset("corporate_blue").name
    );
    assert_eq!(
        suggest_for_context("Marketing", "CREATIVE").name,
        preset("vibrant_gradient").name
    );
    assert_eq!(
        suggest_for_context("unknown", "whatever").name,
        preset("modern_dark").name
    );
}

#[test]
fn test_contrast_text_colour_picks_readable_overlay() {
    assert_eq!(contrast_text_colour("#121212").unwrap(), "#FFFFFF");
    assert_eq!(contrast_text_colour("#F5F7FA").unwrap(), "#000000");
}

#[test]
fn test_all_presets_carry_valid_colour_fields() {
    for name in preset_catalogue() {
        let palette = preset(name);
        palette.validate().unwrap();
        for colour in [
            &palette.primary,
            &palette.secondary,
            &palette.accent,
            &palette.background,
            &palette.foreground,
        ] {
            Rgb::parse(colour).unwrap();
        }
    }
}

proptest! {
    #[test]
    fn test_contrast_ratio_bounds_and_symmetry(
        r1 in any::<u8>(), g1 in any::<u8>(), b1 in any::<u8>(),
        r2 in any::<u8>(), g2 in any::<u8>(), b2 in any::<u8>(),
    ) {
        let first = format!("#{r1:02X}{g1:02X}{b1:02X}");
        let second = format!("#{r2:02X}{g2:02X}{b2:02X}");
        let forward = validate_accessibility(&first, &second).unwrap();
        let backward = validate_accessibility(&second, &first).unwrap();
        prop_assert!(forward.contrast_ratio >= 1.0);
        prop_assert!(forward.contrast_ratio <= 21.0);
        prop_assert_eq!(forward.contrast_ratio, backward.contrast_ratio);
        prop_assert_eq!(forward.rating, backward.rating);
    }

    #[test]
    fn test_gradient_length_always_matches_steps(steps in 0usize..40) {
        let gradient = generate_gradient("#112233", "#FFEEDD", steps).unwrap();
        prop_assert_eq!(gradient.len(), steps);
    }
}
