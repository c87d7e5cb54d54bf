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

use crate::error::{utils, ColourError, ColourResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

mod contrast_thresholds {
    pub const AA_NORMAL: f64 = 4.5;
    pub const AA_LARGE: f64 = 3.0;
    pub const AAA_NORMAL: f64 = 7.0;
    pub const AAA_LARGE: f64 = 4.5;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn parse(input: &str) -> ColourResult<Self> {
        let trimmed = input.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(utils::invalid_colour(input));
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| utils::invalid_colour(input))?;
        Ok(Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        })
    }
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
    fn unit_channels(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    fn new(h: f64, s: f64, v: f64) -> Self {
        Self {
            h: h.rem_euclid(1.0),
            s: s.clamp(0.0, 1.0),
            v: v.clamp(0.0, 1.0),
        }
    }
    fn from_rgb(rgb: Rgb) -> Self {
        let (r, g, b) = rgb.unit_channels();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let v = max;
        let delta = max - min;
        if delta <= f64::EPSILON {
            return Self { h: 0.0, s: 0.0, v };
        }
        let s = delta / max;
        let h = if (max - r).abs() <= f64::EPSILON {
            (g - b) / delta
        } else if (max - g).abs() <= f64::EPSILON {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        Self {
            h: (h / 6.0).rem_euclid(1.0),
            s,
            v,
        }
    }
    fn to_rgb(self) -> Rgb {
        let channel = |x: f64| (x * 255.0).round().clamp(0.0, 255.0) as u8;
        if self.s <= f64::EPSILON {
            let c = channel(self.v);
            return Rgb { r: c, g: c, b: c };
        }
        let h = self.h.rem_euclid(1.0) * 6.0;
        let sector = (h.floor() as usize) % 6;
        let f = h - h.floor();
        let p = self.v * (1.0 - self.s);
        let q = self.v * (1.0 - self.s * f);
        let t = self.v * (1.0 - self.s * (1.0 - f));
        let (r, g, b) = match sector {
            0 => (self.v, t, p),
            1 => (q, self.v, p),
            2 => (p, self.v, t),
            3 => (p, q, self.v),
            4 => (t, p, self.v),
            _ => (self.v, p, q),
        };
        Rgb {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub foreground: String,
    pub colors: Vec<String>,
    pub scheme: Option<HarmonyScheme>,
}

impl Palette {
    pub fn validate(&self) -> ColourResult<()> {
        if self.colors.is_empty() {
            return Err(ColourError::EmptyPalette {
                name: self.name.clone(),
            });
        }
        for field in [
            &self.primary,
            &self.secondary,
            &self.accent,
            &self.background,
            &self.foreground,
        ] {
            Rgb::parse(field)?;
        }
        for colour in &self.colors {
            Rgb::parse(colour)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PalettePreset {
    ModernDark,
    MinimalLight,
    CorporateBlue,
    VibrantGradient,
    NatureEarth,
    SunsetWarm,
    TechNeon,
}

impl PalettePreset {
    pub const ALL: [PalettePreset; 7] = [
        PalettePreset::ModernDark,
        PalettePreset::MinimalLight,
        PalettePreset::CorporateBlue,
        PalettePreset::VibrantGradient,
        PalettePreset::NatureEarth,
        PalettePreset::SunsetWarm,
        PalettePreset::TechNeon,
    ];
    pub fn from_name(name: &str) -> Option<Self> {
        match normalise_key(name).as_str() {
            "moderndark" => Some(PalettePreset::ModernDark),
            "minimallight" => Some(PalettePreset::MinimalLight),
            "corporateblue" => Some(PalettePreset::CorporateBlue),
            "vibrantgradient" => Some(PalettePreset::VibrantGradient),
            "natureearth" => Some(PalettePreset::NatureEarth),
            "sunsetwarm" => Some(PalettePreset::SunsetWarm),
            "techneon" => Some(PalettePreset::TechNeon),
            _ => None,
        }
    }
    pub fn key(self) -> &'static str {
        match self {
            PalettePreset::ModernDark => "modern_dark",
            PalettePreset::MinimalLight => "minimal_light",
            PalettePreset::CorporateBlue => "corporate_blue",
            PalettePreset::VibrantGradient => "vibrant_gradient",
            PalettePreset::NatureEarth => "nature_earth",
            PalettePreset::SunsetWarm => "sunset_warm",
            PalettePreset::TechNeon => "tech_neon",
        }
    }
    pub fn display_name(self) -> &'static str {
        match self {
            PalettePreset::ModernDark => "Modern Dark",
            PalettePreset::MinimalLight => "Minimal Light",
            PalettePreset::CorporateBlue => "Corporate Blue",
            PalettePreset::VibrantGradient => "Vibrant Gradient",
            PalettePreset::NatureEarth => "Nature Earth",
            PalettePreset::SunsetWarm => "Sunset Warm",
            PalettePreset::TechNeon => "Tech Neon",
        }
    }
    pub fn palette(self) -> Palette {
        match self {
            PalettePreset::ModernDark => build_palette(
                self.display_name(),
                "#1E88E5",
                "#FFA726",
                "#26C6DA",
                "#121212",
                "#FFFFFF",
                ["#1E88E5", "#FFA726", "#26C6DA", "#66BB6A", "#AB47BC"],
            ),
            PalettePreset::MinimalLight => build_palette(
                self.display_name(),
                "#2C3E50",
                "#E74C3C",
                "#3498DB",
                "#FFFFFF",
                "#2C3E50",
                ["#2C3E50", "#E74C3C", "#3498DB", "#1ABC9C", "#F39C12"],
            ),
            PalettePreset::CorporateBlue => build_palette(
                self.display_name(),
                "#003F87",
                "#0066CC",
                "#00A3E0",
                "#F5F7FA",
                "#1A1A1A",
                ["#003F87", "#0066CC", "#00A3E0", "#5AC8FA", "#8E8E93"],
            ),
            PalettePreset::VibrantGradient => build_palette(
                self.display_name(),
                "#6B46C1",
                "#F093FB",
                "#4FACFE",
                "#FFFFFF",
                "#1A202C",
                ["#6B46C1", "#F093FB", "#4FACFE", "#00F2FE", "#FA709A"],
            ),
            PalettePreset::NatureEarth => build_palette(
                self.display_name(),
                "#2D6A4F",
                "#52B788",
                "#95D5B2",
                "#FFFFFF",
                "#1B4332",
                ["#1B4332", "#2D6A4F", "#52B788", "#95D5B2", "#D8F3DC"],
            ),
            PalettePreset::SunsetWarm => build_palette(
                self.display_name(),
                "#FF6B6B",
                "#FFD93D",
                "#6BCF7F",
                "#FFF8F3",
                "#2C3639",
                ["#FF6B6B", "#FFD93D", "#6BCF7F", "#95E1D3", "#F38181"],
            ),
            PalettePreset::TechNeon => build_palette(
                self.display_name(),
                "#00FFF0",
                "#FF00E5",
                "#FFE600",
                "#0A0E27",
                "#FFFFFF",
                ["#00FFF0", "#FF00E5", "#FFE600", "#00FF88", "#7B2FFF"],
            ),
        }
    }
}

fn build_palette(
    name: &str,
    primary: &str,
    secondary: &str,
    accent: &str,
    background: &str,
    foreground: &str,
    colors: [&str; 5],
) -> Palette {
    Palette {
        name: name.to_string(),
        primary: primary.to_string(),
        secondary: secondary.to_string(),
        accent: accent.to_string(),
        background: background.to_string(),
        foreground: foreground.to_string(),
        colors: colors.iter().map(|c| (*c).to_string()).collect(),
        scheme: None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmonyScheme {
    Analogous,
    Complementary,
    Triadic,
    Tetradic,
    Monochromatic,
    SplitComplementary,
}

impl HarmonyScheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match normalise_key(name).as_str() {
            "analogous" => Some(HarmonyScheme::Analogous),
            "complementary" => Some(HarmonyScheme::Complementary),
            "triadic" => Some(HarmonyScheme::Triadic),
            "tetradic" => Some(HarmonyScheme::Tetradic),
            "monochromatic" => Some(HarmonyScheme::Monochromatic),
            "splitcomplementary" => Some(HarmonyScheme::SplitComplementary),
            _ => None,
        }
    }
    pub fn display_name(self) -> &'static str {
        match self {
            HarmonyScheme::Analogous => "Analogous",
            HarmonyScheme::Complementary => "Complementary",
            HarmonyScheme::Triadic => "Triadic",
            HarmonyScheme::Tetradic => "Tetradic",
            HarmonyScheme::Monochromatic => "Monochromatic",
            HarmonyScheme::SplitComplementary => "Split Complementary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContrastRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ContrastRating {
    pub fn as_str(self) -> &'static str {
        match self {
            ContrastRating::Excellent => "Excellent",
            ContrastRating::Good => "Good",
            ContrastRating::Fair => "Fair",
            ContrastRating::Poor => "Poor",
        }
    }
    fn from_ratio(ratio: f64) -> Self {
        if ratio >= contrast_thresholds::AAA_NORMAL {
            ContrastRating::Excellent
        } else if ratio >= contrast_thresholds::AA_NORMAL {
            ContrastRating::Good
        } else if ratio >= contrast_thresholds::AA_LARGE {
            ContrastRating::Fair
        } else {
            ContrastRating::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastReport {
    pub contrast_ratio: f64,
    pub passes_aa: bool,
    pub passes_aa_large: bool,
    pub passes_aaa: bool,
    pub passes_aaa_large: bool,
    pub rating: ContrastRating,
}

pub fn preset(name: &str) -> Palette {
    let chosen = PalettePreset::from_name(name).unwrap_or_else(|| {
        debug!(requested = name, "unknown preset name, using modern_dark");
        PalettePreset::ModernDark
    });
    chosen.palette()
}

pub fn preset_catalogue() -> Vec<&'static str> {
    PalettePreset::ALL.iter().map(|p| p.key()).collect()
}

pub fn generate_from_base(base: &str, scheme: &str, count: usize) -> ColourResult<Palette> {
    let base_rgb = Rgb::parse(base)?;
    let chosen = HarmonyScheme::from_name(scheme).unwrap_or_else(|| {
        debug!(requested = scheme, "unknown harmony scheme, using analogous");
        HarmonyScheme::Analogous
    });
    let colours: Vec<String> = scheme_colours(Hsv::from_rgb(base_rgb), chosen, count)
        .into_iter()
        .map(|hsv| hsv.to_rgb().to_hex())
        .collect();
    let name = format!("{} ({})", chosen.display_name(), base_rgb.to_hex());
    let Some(last) = colours.last().cloned() else {
        return Err(ColourError::EmptyPalette { name });
    };
    let palette = Palette {
        name,
        primary: colours.first().cloned().unwrap_or_else(|| last.clone()),
        secondary: colours.get(1).cloned().unwrap_or_else(|| last.clone()),
        accent: colours.get(2).cloned().unwrap_or(last),
        background: "#FFFFFF".to_string(),
        foreground: "#1A1A1A".to_string(),
        colors: colours,
        scheme: Some(chosen),
    };
    debug!(
        scheme = chosen.display_name(),
        colours = palette.colors.len(),
        "generated harmony palette"
    );
    Ok(palette)
}

fn scheme_colours(base: Hsv, scheme: HarmonyScheme, count: usize) -> Vec<Hsv> {
    let Hsv { h, s, v } = base;
    let mut colours: Vec<Hsv> = Vec::with_capacity(count);
    match scheme {
        HarmonyScheme::Analogous => {
            let step = 30.0 / 360.0;
            let centre = (count / 2) as f64;
            for i in 0..count {
                colours.push(Hsv::new(h + (i as f64 - centre) * step, s, v));
            }
        }
        HarmonyScheme::Complementary => {
            let comp = h + 0.5;
            colours.push(Hsv::new(h, s, v));
            colours.push(Hsv::new(comp, s, v));
            for i in 0..count.saturating_sub(2) {
                let anchor = if i % 2 == 0 { h } else { comp };
                colours.push(Hsv::new(anchor + (i + 1) as f64 * 0.1, s * 0.8, v));
            }
        }
        HarmonyScheme::Triadic => {
            fill_rotation(&mut colours, h, s, v, count, 3, 0.05);
        }
        HarmonyScheme::Tetradic => {
            fill_rotation(&mut colours, h, s, v, count, 4, 0.03);
        }
        HarmonyScheme::Monochromatic => {
            for i in 0..count {
                let factor = if count > 1 {
                    0.3 + (i as f64 / (count - 1) as f64) * 0.7
                } else {
                    1.0
                };
                colours.push(Hsv::new(h, s * factor, 0.4 + factor * 0.6));
            }
        }
        HarmonyScheme::SplitComplementary => {
            let comp = h + 0.5;
            let offset = 30.0 / 360.0;
            let anchors = [h, comp - offset, comp + offset];
            for anchor in anchors.iter().take(count) {
                colours.push(Hsv::new(*anchor, s, v));
            }
            while colours.len() < count {
                let len = colours.len();
                let anchor = anchors[len % 3];
                colours.push(Hsv::new(anchor + 0.05 * len as f64, s * 0.8, v * 0.9));
            }
        }
    }
    colours.truncate(count);
    colours
}

fn fill_rotation(colours: &mut Vec<Hsv>, h: f64, s: f64, v: f64, count: usize, points: usize, drift: f64) {
    for i in 0..count.min(points) {
        colours.push(Hsv::new(h + i as f64 / points as f64, s, v));
    }
    while colours.len() < count {
        let len = colours.len();
        let anchor = h + (len % points) as f64 / points as f64;
        colours.push(Hsv::new(anchor + drift * len as f64, s * 0.8, v * 0.9));
    }
}

pub fn generate_gradient(from: &str, to: &str, steps: usize) -> ColourResult<Vec<String>> {
    let start = Rgb::parse(from)?;
    let end = Rgb::parse(to)?;
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        let factor = if steps <= 1 {
            0.0
        } else {
            i as f64 / (steps - 1) as f64
        };
        out.push(
            Rgb {
                r: lerp_channel(start.r, end.r, factor),
                g: lerp_channel(start.g, end.g, factor),
                b: lerp_channel(start.b, end.b, factor),
            }
            .to_hex(),
        );
    }
    Ok(out)
}

fn lerp_channel(a: u8, b: u8, factor: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * factor)
        .round()
        .clamp(0.0, 255.0) as u8
}

// sRGB piecewise linearisation per WCAG 2.1.
fn relative_luminance(rgb: Rgb) -> f64 {
    let linear = |channel: f64| {
        if channel <= 0.03928 {
            channel / 12.92
        } else {
            ((channel + 0.055) / 1.055).powf(2.4)
        }
    };
    let (r, g, b) = rgb.unit_channels();
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

pub fn validate_accessibility(foreground: &str, background: &str) -> ColourResult<ContrastReport> {
    let fg = relative_luminance(Rgb::parse(foreground)?);
    let bg = relative_luminance(Rgb::parse(background)?);
    let (lighter, darker) = if fg >= bg { (fg, bg) } else { (bg, fg) };
    let ratio = ((lighter + 0.05) / (darker + 0.05) * 100.0).round() / 100.0;
    Ok(ContrastReport {
        contrast_ratio: ratio,
        passes_aa: ratio >= contrast_thresholds::AA_NORMAL,
        passes_aa_large: ratio >= contrast_thresholds::AA_LARGE,
        passes_aaa: ratio >= contrast_thresholds::AAA_NORMAL,
        passes_aaa_large: ratio >= contrast_thresholds::AAA_LARGE,
        rating: ContrastRating::from_ratio(ratio),
    })
}

pub fn contrast_text_colour(hex: &str) -> ColourResult<&'static str> {
    let rgb = Rgb::parse(hex)?;
    let luminance =
        (0.299 * f64::from(rgb.r) + 0.587 * f64::from(rgb.g) + 0.114 * f64::from(rgb.b)) / 255.0;
    Ok(if luminance < 0.5 { "#FFFFFF" } else { "#000000" })
}

pub fn suggest_for_context(domain: &str, mood: &str) -> Palette {
    let preset = match (
        domain.to_lowercase().as_str(),
        mood.to_lowercase().as_str(),
    ) {
        ("financial", "professional") => PalettePreset::CorporateBlue,
        ("financial", "modern") => PalettePreset::ModernDark,
        ("marketing", "creative") => PalettePreset::VibrantGradient,
        ("marketing", "energetic") => PalettePreset::SunsetWarm,
        ("operations", "professional") => PalettePreset::MinimalLight,
        ("sales", "energetic") => PalettePreset::TechNeon,
        ("hr", "calm") => PalettePreset::NatureEarth,
        ("tech", "modern") => PalettePreset::ModernDark,
        _ => {
            debug!(domain, mood, "no palette mapping for context, using modern_dark");
            PalettePreset::ModernDark
        }
    };
    preset.palette()
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
    fn test_hex_parse_round_trip() {
        let rgb = Rgb::parse("#1e88e5").unwrap();
        assert_eq!(rgb.to_hex(), "#1E88E5");
        assert_eq!(Rgb::parse("1E88E5").unwrap(), rgb);
    }

    #[test]
    fn test_malformed_hex_rejected() {
        assert!(Rgb::parse("#FFF").is_err());
        assert!(Rgb::parse("not a colour").is_err());
        assert!(Rgb::parse("#GGGGGG").is_err());
    }

    #[test]
    fn test_hsv_round_trip_on_primaries() {
        for hex in ["#FF0000", "#00FF00", "#0000FF", "#FFFFFF", "#000000"] {
            let rgb = Rgb::parse(hex).unwrap();
            assert_eq!(Hsv::from_rgb(rgb).to_rgb(), rgb, "round trip for {hex}");
        }
    }

    #[test]
    fn test_monochromatic_single_colour_full_factor() {
        let palette = generate_from_base("#1E88E5", "monochromatic", 1).unwrap();
        assert_eq!(palette.colors.len(), 1);
        assert_eq!(palette.primary, palette.secondary);
        assert_eq!(palette.primary, palette.accent);
    }
}
