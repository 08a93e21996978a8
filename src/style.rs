// ============================================================================
// COLORS & STYLE PRESETS
// ============================================================================

use serde_with::DeserializeFromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const GRAY: Color = Color::new(0x8e, 0x8e, 0x93);
    pub const RED: Color = Color::new(0xff, 0x3b, 0x30);
    pub const GREEN: Color = Color::new(0x34, 0xc7, 0x59);
    pub const BLUE: Color = Color::new(0x00, 0x7a, 0xff);
    pub const ORANGE: Color = Color::new(0xff, 0x95, 0x00);
    pub const CYAN: Color = Color::new(0x32, 0xad, 0xe6);
    pub const TRANSPARENT: Color = Color {
        r: 0x00,
        g: 0x00,
        b: 0x00,
        a: 0x00,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Same color with its alpha scaled by `factor`.
    pub fn opacity(self, factor: f32) -> Self {
        Self {
            a: (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8,
            ..self
        }
    }

    pub fn from_unit_rgb(r: f32, g: f32, b: f32) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(channel(r), channel(g), channel(b))
    }

    pub fn alpha(self) -> f32 {
        self.a as f32 / 255.0
    }

    pub fn is_visible(self) -> bool {
        self.a > 0
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, DeserializeFromStr, EnumString, EnumIter, Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn toggled(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }

    fn pick<T>(self, light: T, dark: T) -> T {
        match self {
            ColorScheme::Light => light,
            ColorScheme::Dark => dark,
        }
    }
}

/// Named looks for the gauge face.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, DeserializeFromStr, EnumString, EnumIter, Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum StylePreset {
    #[default]
    #[strum(to_string = "standard", serialize = "default")]
    Standard,
    Overlay,
    Modern,
    Minimal,
    Glass,
}

impl StylePreset {
    /// The preset after this one, wrapping around.
    pub fn next(self) -> Self {
        let all: Vec<_> = Self::iter().collect();
        let idx = all.iter().position(|p| *p == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn resolve(self, scheme: ColorScheme) -> GaugeStyle {
        match self {
            StylePreset::Standard => standard(scheme),
            StylePreset::Overlay => overlay(scheme),
            StylePreset::Modern => modern(scheme),
            StylePreset::Minimal => minimal(scheme),
            StylePreset::Glass => glass(),
        }
    }
}

/// A decorative ring segment.
///
/// `trim_from`/`trim_to` are fractions of a full turn measured clockwise from
/// 3 o'clock; the whole segment is then turned by `rotation_degrees`. `inset`
/// shrinks the ring radius from the gauge radius (negative grows it).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub inset: f32,
    pub trim_from: f32,
    pub trim_to: f32,
    pub rotation_degrees: f32,
    pub width: f32,
    pub color: Color,
}

impl Ring {
    pub const fn full(inset: f32, width: f32, color: Color) -> Self {
        Self {
            inset,
            trim_from: 0.0,
            trim_to: 1.0,
            rotation_degrees: 0.0,
            width,
            color,
        }
    }

    pub const fn segment(
        inset: f32,
        trim_from: f32,
        trim_to: f32,
        rotation_degrees: f32,
        width: f32,
        color: Color,
    ) -> Self {
        Self {
            inset,
            trim_from,
            trim_to,
            rotation_degrees,
            width,
            color,
        }
    }

    /// Start angle and sweep of the segment, in radians.
    pub fn angles(&self) -> (f64, f64) {
        let turn = std::f64::consts::TAU;
        let start = self.trim_from as f64 * turn + (self.rotation_degrees as f64).to_radians();
        let span = (self.trim_to - self.trim_from).max(0.0) as f64 * turn;
        (start, span)
    }
}

/// Everything the renderer needs to know about how a gauge looks.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeStyle {
    pub background: Color,
    pub outer_stroke: Color,
    pub outer_stroke_width: f32,
    pub rings: Vec<Ring>,
    pub tick_color: Color,
    pub label_color: Color,
    pub digital_color: Color,
    pub unit_color: Color,
    pub needle_color: Color,
    pub needle_thickness: f32,
    pub hub_fill: Color,
    pub hub_stroke: Color,
    pub hub_size: f32,
    pub canvas_padding: f32,
    pub panel_background: Color,
    pub panel_text: Color,
}

impl GaugeStyle {
    fn base(scheme: ColorScheme) -> Self {
        let text = scheme.pick(Color::BLACK, Color::WHITE);
        Self {
            background: scheme.pick(Color::WHITE, Color::BLACK),
            outer_stroke: scheme.pick(Color::GRAY.opacity(0.8), Color::WHITE.opacity(0.8)),
            outer_stroke_width: 2.0,
            rings: Vec::new(),
            tick_color: scheme.pick(Color::GRAY.opacity(0.9), Color::WHITE.opacity(0.9)),
            label_color: text,
            digital_color: text,
            unit_color: text,
            needle_color: Color::RED,
            needle_thickness: 7.0,
            hub_fill: Color::RED,
            hub_stroke: scheme.pick(Color::GRAY.opacity(0.3), Color::WHITE.opacity(0.6)),
            hub_size: 22.0,
            canvas_padding: 10.0,
            panel_background: scheme.pick(Color::new(0xf2, 0xf2, 0xf7), Color::BLACK),
            panel_text: text,
        }
    }
}

fn standard(scheme: ColorScheme) -> GaugeStyle {
    GaugeStyle::base(scheme)
}

fn overlay(scheme: ColorScheme) -> GaugeStyle {
    let needle = scheme.pick(Color::ORANGE, Color::WHITE);
    GaugeStyle {
        rings: vec![
            Ring::segment(14.0, 0.17, 0.437, 89.0, 8.0, Color::BLUE),
            Ring::segment(14.0, 0.437, 0.567, 89.0, 8.0, Color::GREEN),
            Ring::segment(14.0, 0.567, 0.835, 89.0, 8.0, Color::RED),
            Ring::full(-4.0, 8.0, Color::new(0xb4, 0xb4, 0xb4).opacity(0.7)),
            Ring::full(4.0, 8.0, Color::new(0x80, 0x80, 0x80).opacity(0.6)),
        ],
        tick_color: scheme.pick(Color::GRAY.opacity(0.85), Color::WHITE.opacity(0.85)),
        needle_color: needle,
        hub_fill: needle,
        ..GaugeStyle::base(scheme)
    }
}

fn modern(scheme: ColorScheme) -> GaugeStyle {
    GaugeStyle {
        background: scheme.pick(
            Color::from_unit_rgb(0.7, 0.8, 0.7),
            Color::from_unit_rgb(0.3, 0.4, 0.3),
        ),
        rings: vec![Ring::full(10.0, 6.0, Color::GRAY.opacity(0.3))],
        tick_color: Color::BLUE,
        label_color: Color::GREEN,
        needle_color: Color::GRAY,
        needle_thickness: 4.0,
        hub_fill: Color::GRAY,
        hub_size: 8.0,
        outer_stroke: Color::BLUE,
        outer_stroke_width: 3.0,
        ..GaugeStyle::base(scheme)
    }
}

fn minimal(scheme: ColorScheme) -> GaugeStyle {
    GaugeStyle {
        rings: vec![Ring::full(0.0, 2.0, Color::GRAY)],
        tick_color: Color::GRAY,
        label_color: Color::GRAY,
        needle_color: Color::GRAY,
        needle_thickness: 3.0,
        hub_fill: Color::GRAY,
        hub_size: 10.0,
        outer_stroke: Color::TRANSPARENT,
        outer_stroke_width: 0.0,
        ..GaugeStyle::base(scheme)
    }
}

/// Dark frosted look; ignores the color scheme.
fn glass() -> GaugeStyle {
    let label = Color::WHITE.opacity(0.85);
    GaugeStyle {
        background: Color::new(0x12, 0x12, 0x14),
        outer_stroke: Color::WHITE.opacity(0.25),
        outer_stroke_width: 2.0,
        rings: vec![
            Ring::segment(14.0, 0.15, 0.85, -90.0, 8.0, Color::CYAN.opacity(0.35)),
            Ring::segment(28.0, 0.15, 0.85, -90.0, 16.0, Color::WHITE.opacity(0.08)),
        ],
        tick_color: label,
        label_color: label,
        digital_color: Color::WHITE,
        unit_color: Color::WHITE.opacity(0.6),
        needle_color: Color::ORANGE,
        needle_thickness: 7.0,
        hub_fill: Color::BLACK.opacity(0.8),
        hub_stroke: Color::WHITE.opacity(0.6),
        hub_size: 22.0,
        canvas_padding: 10.0,
        panel_background: Color::BLACK,
        panel_text: Color::WHITE,
    }
}
