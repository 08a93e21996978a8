// ============================================================================
// RETAINED MODE RENDERING
// ============================================================================
//
// Frames are built as a list of draw commands and then rasterized into an
// RGBA8 buffer. Angles here are radians, 0 pointing right, clockwise.

use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::error::{Error, Result};
use crate::geometry::GaugeFace;
use crate::session::{format_clock, Countdown, Recording, TimerSession};
use crate::style::{Color, GaugeStyle, StylePreset};

/// Fonts tried when no font is configured.
const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Most recent laps listed in the panel.
const PANEL_LAPS: usize = 5;

/// Loads the configured font, or the first system fallback that parses.
///
/// Without any font the gauge still renders, just without text.
pub fn load_font(path: Option<&Path>) -> Result<Option<Font<'static>>> {
    if let Some(path) = path {
        return read_font(path).map(Some);
    }
    for candidate in FALLBACK_FONTS.iter().map(Path::new) {
        if !candidate.exists() {
            continue;
        }
        match read_font(candidate) {
            Ok(font) => {
                log::debug!("using font {}", candidate.display());
                return Ok(Some(font));
            }
            Err(e) => log::debug!("skipping font: {e}"),
        }
    }
    log::warn!("no usable font found, text will not be drawn");
    Ok(None)
}

fn read_font(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path).map_err(|source| Error::FontIo {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_vec(data).ok_or_else(|| Error::FontParse(PathBuf::from(path)))
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Where the gauge sits and how large it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeLayout {
    pub cx: f64,
    pub cy: f64,
    /// Half of the square the gauge occupies.
    pub outer_radius: f64,
    /// Scale radius: ticks, needle and text sizes derive from it.
    pub radius: f64,
}

impl GaugeLayout {
    pub fn new(cx: f64, cy: f64, size: f64) -> Self {
        Self {
            cx,
            cy,
            outer_radius: size / 2.0,
            radius: size * 0.48,
        }
    }

    fn point_at(&self, angle: f64, distance: f64) -> (f64, f64) {
        (
            self.cx + angle.cos() * distance,
            self.cy + angle.sin() * distance,
        )
    }
}

/// Horizontal speed slider track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SliderLayout {
    /// Whether a pointer at `(x, y)` grabs the slider. The knob overhangs the
    /// track, so the hit area is taller than the track.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let slack = self.height * 1.5;
        x >= self.x - slack
            && x <= self.x + self.width + slack
            && y >= self.y - slack
            && y <= self.y + self.height + slack
    }

    /// Track position under `x`, in `[0, 1]`.
    pub fn fraction_at(&self, x: f64) -> f64 {
        ((x - self.x) / self.width).clamp(0.0, 1.0)
    }
}

/// Gauge on top, timer panel and slider below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLayout {
    pub width: usize,
    pub height: usize,
    pub gauge: GaugeLayout,
    pub panel_top: f64,
    pub slider: SliderLayout,
}

impl ScreenLayout {
    pub fn new(width: usize, height: usize) -> Self {
        let (w, h) = (width as f64, height as f64);
        let size = w.min(h * 0.55) * 0.9;
        let margin = (w - size) / 2.0;
        let gauge = GaugeLayout::new(w / 2.0, margin.max(10.0) + size / 2.0, size);
        let panel_top = gauge.cy + size / 2.0 + 14.0;
        let slider = SliderLayout {
            x: w * 0.1,
            y: h - 80.0,
            width: w * 0.8,
            height: 6.0,
        };
        Self {
            width,
            height,
            gauge,
            panel_top,
            slider,
        }
    }
}

// ============================================================================
// SCENE
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawCommand {
    Clear(Color),
    Arc {
        cx: f64,
        cy: f64,
        outer_radius: f64,
        thickness: f64,
        start_angle: f64,
        arc_span: f64,
        color: Color,
    },
    Tick {
        cx: f64,
        cy: f64,
        r: f64,
        angle: f64,
        length: f64,
        thickness: f32,
        color: Color,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: f32,
        color: Color,
    },
    NeedleLine {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        thickness: f32,
        tapered: bool,
        color: Color,
    },
    Disc {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Color,
    },
    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub(crate) struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    #[cfg(test)]
    pub(crate) fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub(crate) fn render(&self, canvas: &mut Canvas, font: Option<&Font<'static>>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Arc {
                    cx,
                    cy,
                    outer_radius,
                    thickness,
                    start_angle,
                    arc_span,
                    color,
                } => draw_arc(
                    canvas,
                    *cx,
                    *cy,
                    *outer_radius,
                    *thickness,
                    *start_angle,
                    *arc_span,
                    *color,
                ),
                DrawCommand::Tick {
                    cx,
                    cy,
                    r,
                    angle,
                    length,
                    thickness,
                    color,
                } => {
                    let outer_x = cx + angle.cos() * r;
                    let outer_y = cy + angle.sin() * r;
                    let inner_x = cx + angle.cos() * (r - length);
                    let inner_y = cy + angle.sin() * (r - length);
                    draw_thick_line_aa(
                        canvas,
                        inner_x.round() as i32,
                        inner_y.round() as i32,
                        outer_x.round() as i32,
                        outer_y.round() as i32,
                        *thickness,
                        false,
                        *color,
                    );
                }
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => {
                    if let Some(font) = font {
                        draw_text(canvas, *x, *y, text, font, Scale::uniform(*font_size), *color);
                    }
                }
                DrawCommand::NeedleLine {
                    x0,
                    y0,
                    x1,
                    y1,
                    thickness,
                    tapered,
                    color,
                } => draw_thick_line_aa(canvas, *x0, *y0, *x1, *y1, *thickness, *tapered, *color),
                DrawCommand::Disc {
                    cx,
                    cy,
                    radius,
                    color,
                } => draw_disc(canvas, *cx, *cy, *radius, *color),
                DrawCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => fill_rect(canvas, *x, *y, *width, *height, *color),
            }
        }
    }
}

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Blends `color` over the pixel at `coverage` (0..1) of its alpha.
    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        if idx + 4 > self.frame.len() {
            return;
        }
        let a = (color.alpha() * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let src = [color.r, color.g, color.b];
        for (dst, src) in self.frame[idx..idx + 3].iter_mut().zip(src) {
            *dst = (src as f32 * a + *dst as f32 * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }
}

// ============================================================================
// GAUGE & PANEL
// ============================================================================

/// What the gauge shows this frame.
#[derive(Debug, Clone, Copy)]
pub struct GaugeFrame<'a> {
    pub face: &'a GaugeFace,
    pub style: &'a GaugeStyle,
    /// Value the needle currently points at (may lag the readout).
    pub needle_value: f64,
    pub readout_value: f64,
    pub unit_label: &'a str,
}

pub(crate) fn add_gauge(scene: &mut Scene, layout: &GaugeLayout, frame: &GaugeFrame) {
    let style = frame.style;
    let r = layout.radius;

    scene.add_command(DrawCommand::Disc {
        cx: layout.cx,
        cy: layout.cy,
        radius: layout.outer_radius,
        color: style.background,
    });
    if style.outer_stroke.is_visible() && style.outer_stroke_width > 0.0 {
        add_stroke(
            scene,
            layout,
            layout.outer_radius,
            style.outer_stroke_width as f64,
            0.0,
            TAU,
            style.outer_stroke,
        );
    }
    for ring in &style.rings {
        let (start, span) = ring.angles();
        add_stroke(
            scene,
            layout,
            layout.outer_radius - ring.inset as f64,
            ring.width as f64,
            start,
            span,
            ring.color,
        );
    }

    add_ticks_and_labels(scene, layout, frame);

    // Digital readout
    let readout = format!("{}", frame.readout_value.round() as i64);
    let readout_y = layout.cy - r * 0.35;
    scene.add_command(DrawCommand::Text {
        x: layout.cx as i32,
        y: (readout_y - r * 0.06) as i32,
        text: readout,
        font_size: (r * 0.45) as f32,
        color: style.digital_color,
    });
    scene.add_command(DrawCommand::Text {
        x: layout.cx as i32,
        y: (readout_y + r * 0.22) as i32,
        text: frame.unit_label.to_string(),
        font_size: (r * 0.14) as f32,
        color: style.unit_color,
    });

    add_needle(scene, layout, frame);
}

fn add_stroke(
    scene: &mut Scene,
    layout: &GaugeLayout,
    radius: f64,
    width: f64,
    start_angle: f64,
    arc_span: f64,
    color: Color,
) {
    scene.add_command(DrawCommand::Arc {
        cx: layout.cx,
        cy: layout.cy,
        outer_radius: radius + width / 2.0,
        thickness: width,
        start_angle,
        arc_span,
        color,
    });
}

fn add_ticks_and_labels(scene: &mut Scene, layout: &GaugeLayout, frame: &GaugeFrame) {
    let style = frame.style;
    let r = layout.radius;
    let tick_radius = r.min(layout.outer_radius - style.canvas_padding as f64);
    let (minor_len, major_len) = (r * 0.06, r * 0.12);
    let label_radius = tick_radius - major_len - r * 0.12;

    for tick in frame.face.ticks() {
        scene.add_command(DrawCommand::Tick {
            cx: layout.cx,
            cy: layout.cy,
            r: tick_radius,
            angle: tick.angle_radians,
            length: if tick.is_major { major_len } else { minor_len },
            thickness: if tick.is_major { 3.0 } else { 2.0 },
            color: style.tick_color,
        });
        if let Some(label) = tick.label {
            let (x, y) = layout.point_at(tick.angle_radians, label_radius);
            scene.add_command(DrawCommand::Text {
                x: x as i32,
                y: y as i32,
                text: label.to_string(),
                font_size: (r * 0.12) as f32,
                color: style.label_color,
            });
        }
    }
}

fn add_needle(scene: &mut Scene, layout: &GaugeLayout, frame: &GaugeFrame) {
    let style = frame.style;
    let angle = frame.face.needle_angle(frame.needle_value).to_radians();
    let (tip_x, tip_y) = layout.point_at(angle, layout.radius - 6.0);
    let (back_x, back_y) = layout.point_at(angle, -(style.hub_size as f64) * 0.4);
    let (cx, cy) = (layout.cx as i32, layout.cy as i32);

    scene.add_command(DrawCommand::NeedleLine {
        x0: cx,
        y0: cy,
        x1: tip_x as i32,
        y1: tip_y as i32,
        thickness: style.needle_thickness * 2.0,
        tapered: true,
        color: style.needle_color,
    });
    scene.add_command(DrawCommand::NeedleLine {
        x0: cx,
        y0: cy,
        x1: back_x as i32,
        y1: back_y as i32,
        thickness: style.needle_thickness,
        tapered: false,
        color: style.needle_color,
    });

    let hub_radius = style.hub_size as f64 / 2.0;
    scene.add_command(DrawCommand::Disc {
        cx: layout.cx,
        cy: layout.cy,
        radius: hub_radius,
        color: style.hub_fill,
    });
    add_stroke(scene, layout, hub_radius, 1.0, 0.0, TAU, style.hub_stroke);
}

/// State shown in the panel under the gauge.
#[derive(Debug, Clone, Copy)]
pub struct PanelFrame<'a> {
    pub timer: &'a TimerSession,
    pub countdown: &'a Countdown,
    pub recording: &'a Recording,
    pub speed: f64,
    pub max_speed: f64,
    pub unit_label: &'a str,
    pub preset: StylePreset,
}

pub(crate) fn add_panel(
    scene: &mut Scene,
    layout: &ScreenLayout,
    style: &GaugeStyle,
    panel: &PanelFrame,
) {
    let cx = (layout.width / 2) as i32;
    let text = style.panel_text;
    let muted = text.opacity(0.6);
    let mut y = layout.panel_top as i32 + 16;
    let mut line = |scene: &mut Scene, content: String, size: f32, color: Color, advance: i32| {
        scene.add_command(DrawCommand::Text {
            x: cx,
            y,
            text: content,
            font_size: size,
            color,
        });
        y += advance;
    };

    let timer = panel.timer;
    line(
        scene,
        format_clock(timer.elapsed_seconds() as i64),
        34.0,
        if timer.is_running() { Color::GREEN } else { text },
        36,
    );
    line(
        scene,
        format!("Distance: {:.2} km", timer.total_distance_km()),
        18.0,
        text,
        26,
    );

    let laps = timer.laps();
    for lap in laps.iter().rev().take(PANEL_LAPS) {
        line(
            scene,
            format!(
                "Lap {}  {}  (+{})  {:.2} km",
                lap.number,
                format_clock(lap.at_seconds as i64),
                format_clock(lap.split_seconds as i64),
                lap.split_distance_km
            ),
            15.0,
            muted,
            20,
        );
    }

    let countdown = panel.countdown;
    let countdown_color = match (countdown.is_running(), countdown.remaining()) {
        (true, _) => Color::ORANGE,
        (false, r) if r < 0 => Color::RED,
        _ => text,
    };
    line(
        scene,
        format!("Countdown {}", format_clock(countdown.remaining())),
        20.0,
        countdown_color,
        26,
    );

    let recording = panel.recording;
    let (rec_text, rec_color) = if recording.is_active() {
        (format!("REC {}", format_clock(recording.seconds() as i64)), Color::RED)
    } else {
        ("Ready".to_string(), muted)
    };
    line(scene, rec_text, 15.0, rec_color, 20);

    let slider = layout.slider;
    scene.add_command(DrawCommand::Text {
        x: cx,
        y: (slider.y - 26.0) as i32,
        text: format!("Speed: {} {}", panel.speed as i64, panel.unit_label),
        font_size: 18.0,
        color: text,
    });
    add_slider(scene, &slider, panel.speed / panel.max_speed);
    scene.add_command(DrawCommand::Text {
        x: cx,
        y: (slider.y + 34.0) as i32,
        text: format!("Style: {}", panel.preset),
        font_size: 15.0,
        color: muted,
    });
}

fn add_slider(scene: &mut Scene, slider: &SliderLayout, fraction: f64) {
    let fraction = fraction.clamp(0.0, 1.0);
    scene.add_command(DrawCommand::Rect {
        x: slider.x as i32,
        y: slider.y as i32,
        width: slider.width as i32,
        height: slider.height as i32,
        color: Color::GRAY.opacity(0.4),
    });
    scene.add_command(DrawCommand::Rect {
        x: slider.x as i32,
        y: slider.y as i32,
        width: (slider.width * fraction) as i32,
        height: slider.height as i32,
        color: Color::BLUE,
    });
    scene.add_command(DrawCommand::Disc {
        cx: slider.x + slider.width * fraction,
        cy: slider.y + slider.height / 2.0,
        radius: slider.height * 1.6,
        color: Color::WHITE,
    });
    scene.add_command(DrawCommand::Arc {
        cx: slider.x + slider.width * fraction,
        cy: slider.y + slider.height / 2.0,
        outer_radius: slider.height * 1.6 + 0.5,
        thickness: 1.0,
        start_angle: 0.0,
        arc_span: TAU,
        color: Color::GRAY.opacity(0.6),
    });
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn draw_thick_line_aa(
    canvas: &mut Canvas,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: f32,
    tapered: bool,
    color: Color,
) {
    let pad = thickness.ceil() as i32 + 1;
    let (min_x, max_x) = (x0.min(x1) - pad, x0.max(x1) + pad);
    let (min_y, max_y) = (y0.min(y1) - pad, y0.max(y1) + pad);
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    let len_sq = dx * dx + dy * dy;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = (x - x0) as f32;
            let py = (y - y0) as f32;
            let t = if len_sq > 0.0 {
                ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let lx = x0 as f32 + t * dx;
            let ly = y0 as f32 + t * dy;
            let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
            // Tapered lines keep 5% of their width at the far end.
            let local = if tapered {
                thickness * (1.0 - t * 0.95)
            } else {
                thickness
            };
            let aa = (1.0 - (dist - local / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa);
            }
        }
    }
}

fn draw_disc(canvas: &mut Canvas, cx: f64, cy: f64, radius: f64, color: Color) {
    let reach = radius.ceil() as i32 + 1;
    let (ix, iy) = (cx.round() as i32, cy.round() as i32);
    for y in iy - reach..=iy + reach {
        for x in ix - reach..=ix + reach {
            let dist = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
            let aa = (radius + 0.5 - dist).clamp(0.0, 1.0);
            if aa > 0.0 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

/// Ring band between `outer_radius - thickness` and `outer_radius`, limited
/// to the sweep `start_angle..start_angle + arc_span`.
fn draw_arc(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    outer_radius: f64,
    thickness: f64,
    start_angle: f64,
    arc_span: f64,
    color: Color,
) {
    let inner_radius = (outer_radius - thickness).max(0.0);
    let reach = outer_radius.ceil() as i32 + 1;
    let (ix, iy) = (cx.round() as i32, cy.round() as i32);
    let full_turn = arc_span >= TAU;
    for y in (iy - reach).max(0)..=(iy + reach).min(canvas.height as i32 - 1) {
        for x in (ix - reach).max(0)..=(ix + reach).min(canvas.width as i32 - 1) {
            let (dx, dy) = (x as f64 - cx, y as f64 - cy);
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < inner_radius - 1.0 || dist > outer_radius + 1.0 {
                continue;
            }
            if !full_turn && !angle_in_sweep(dy.atan2(dx), start_angle, arc_span) {
                continue;
            }
            let aa = if dist > outer_radius {
                1.0 - (dist - outer_radius)
            } else if dist < inner_radius {
                1.0 - (inner_radius - dist)
            } else {
                1.0
            };
            if aa > 0.0 {
                canvas.blend(x, y, color, aa as f32);
            }
        }
    }
}

fn angle_in_sweep(angle: f64, start_angle: f64, arc_span: f64) -> bool {
    (angle - start_angle).rem_euclid(TAU) <= arc_span
}

fn fill_rect(canvas: &mut Canvas, x: i32, y: i32, width: i32, height: i32, color: Color) {
    for py in y..y + height {
        for px in x..x + width {
            canvas.blend(px, py, color, 1.0);
        }
    }
}

/// Draws `text` centered on `(x, y)`.
fn draw_text(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    text: &str,
    font: &Font<'static>,
    scale: Scale,
    color: Color,
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    if min_x >= max_x || min_y >= max_y {
        return;
    }
    let offset_x = x - (max_x - min_x) / 2;
    let offset_y = y - (max_y - min_y) / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                canvas.blend(px, py, color, v);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ArcRange;
    use crate::style::ColorScheme;

    fn pixel(frame: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * width + x) * 4;
        [frame[idx], frame[idx + 1], frame[idx + 2], frame[idx + 3]]
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4);
        canvas.clear(Color::new(1, 2, 3));
        assert!(frame.chunks_exact(4).all(|px| px == [1, 2, 3, 0xff]));
    }

    #[test]
    fn blend_mixes_by_alpha_and_ignores_out_of_bounds() {
        let mut frame = vec![0u8; 2 * 2 * 4];
        let mut canvas = Canvas::new(&mut frame, 2, 2);
        canvas.clear(Color::BLACK);
        canvas.blend(0, 0, Color::WHITE.opacity(0.5), 1.0);
        canvas.blend(-1, 0, Color::WHITE, 1.0);
        canvas.blend(5, 5, Color::WHITE, 1.0);
        assert_eq!(pixel(&frame, 2, 0, 0), [128, 128, 128, 0xff]);
        assert_eq!(pixel(&frame, 2, 1, 1), [0, 0, 0, 0xff]);
    }

    #[test]
    fn arc_respects_its_sweep() {
        let (w, h) = (41, 41);
        let mut frame = vec![0u8; w * h * 4];
        let mut canvas = Canvas::new(&mut frame, w, h);
        canvas.clear(Color::BLACK);
        // Lower half only: from 3 o'clock clockwise to 9 o'clock.
        draw_arc(&mut canvas, 20.0, 20.0, 18.0, 4.0, 0.0, std::f64::consts::PI, Color::WHITE);
        assert_eq!(pixel(&frame, w, 20, 36), [255, 255, 255, 0xff]);
        assert_eq!(pixel(&frame, w, 20, 4), [0, 0, 0, 0xff]);
        assert_eq!(pixel(&frame, w, 20, 20), [0, 0, 0, 0xff]);
    }

    #[test]
    fn sweep_wraps_past_a_full_turn() {
        let start = -210f64.to_radians();
        let span = 240f64.to_radians();
        assert!(angle_in_sweep(-90f64.to_radians(), start, span));
        assert!(angle_in_sweep(0.0, start, span));
        assert!(!angle_in_sweep(90f64.to_radians(), start, span));
    }

    #[test]
    fn disc_covers_its_center() {
        let mut frame = vec![0u8; 9 * 9 * 4];
        let mut canvas = Canvas::new(&mut frame, 9, 9);
        canvas.clear(Color::BLACK);
        draw_disc(&mut canvas, 4.0, 4.0, 2.0, Color::RED);
        assert_eq!(pixel(&frame, 9, 4, 4), [0xff, 0x3b, 0x30, 0xff]);
        assert_eq!(pixel(&frame, 9, 0, 0), [0, 0, 0, 0xff]);
    }

    #[test]
    fn gauge_scene_has_one_tick_per_layout_entry() {
        let face = GaugeFace::new(200.0, 10.0, 20.0, ArcRange::default()).unwrap();
        let style = StylePreset::Standard.resolve(ColorScheme::Light);
        let frame = GaugeFrame {
            face: &face,
            style: &style,
            needle_value: 50.0,
            readout_value: 50.0,
            unit_label: "km/h",
        };
        let mut scene = Scene::new();
        add_gauge(&mut scene, &GaugeLayout::new(200.0, 200.0, 400.0), &frame);

        let ticks = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Tick { .. }))
            .count();
        let labels: Vec<_> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, 21);
        assert_eq!(labels.len(), 11 + 2);
        assert!(labels.contains(&"200"));
        assert!(labels.contains(&"km/h"));
    }

    #[test]
    fn needle_points_along_the_mapped_angle() {
        let face = GaugeFace::new(200.0, 10.0, 20.0, ArcRange::default()).unwrap();
        let style = StylePreset::Minimal.resolve(ColorScheme::Dark);
        let frame = GaugeFrame {
            face: &face,
            style: &style,
            needle_value: 100.0,
            readout_value: 100.0,
            unit_label: "km/h",
        };
        let layout = GaugeLayout::new(200.0, 200.0, 400.0);
        let mut scene = Scene::new();
        add_needle(&mut scene, &layout, &frame);
        match &scene.commands()[0] {
            DrawCommand::NeedleLine { x0, y0, x1, y1, tapered, .. } => {
                assert!(*tapered);
                // 100 of 200 points straight up.
                assert_eq!(x1, x0);
                assert!(y1 < y0);
            }
            other => panic!("expected needle, got {other:?}"),
        }
    }

    #[test]
    fn slider_maps_pointer_to_fraction() {
        let slider = SliderLayout {
            x: 10.0,
            y: 100.0,
            width: 200.0,
            height: 6.0,
        };
        assert_eq!(slider.fraction_at(110.0), 0.5);
        assert_eq!(slider.fraction_at(0.0), 0.0);
        assert_eq!(slider.fraction_at(500.0), 1.0);
        assert!(slider.contains(50.0, 103.0));
        assert!(!slider.contains(50.0, 40.0));
    }

    #[test]
    fn screen_layout_keeps_gauge_above_panel() {
        let layout = ScreenLayout::new(420, 760);
        assert!(layout.gauge.cy + layout.gauge.outer_radius < layout.panel_top);
        assert!(layout.panel_top < layout.slider.y);
        assert!((layout.gauge.radius - layout.gauge.outer_radius * 0.96).abs() < 1e-9);
    }
}
