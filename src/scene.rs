//! Platform-agnostic scene description.
//!
//! Renderers never touch a drawing surface. They produce a [`Scene`]: an
//! ordered list of [`RenderCommand`]s that a host replays onto a canvas, a
//! terminal, or serializes with [`Scene::to_svg`] / [`Scene::to_json`].
//! Building a scene has no side effects, so the same inputs always
//! reproduce the same scene.

use std::fmt::Write as FmtWrite;

use serde::{Deserialize, Serialize};

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb` form, alpha dropped.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a `[0, 1]` opacity.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BACKGROUND: Self = Self::rgb(15, 23, 42);
    pub const SLATE: Self = Self::rgb(148, 163, 184);

    // Tour palette
    pub const NODE: Self = Self::rgb(0, 242, 254);
    pub const NODE_DEEP: Self = Self::rgb(79, 172, 254);
    pub const PATH_END: Self = Self::rgb(255, 45, 247);
    pub const CONNECTION_DOT: Self = Self::rgb(255, 45, 247);
    pub const STATUS_ACTIVE: Self = Self::rgb(74, 222, 128);
    pub const PURPLE: Self = Self::rgb(216, 180, 254);
    /// Tour stroke: cyan through blue to pink along the diagonal.
    pub const PATH_GRADIENT: [Self; 3] = [Self::NODE, Self::NODE_DEEP, Self::PATH_END];

    // Schedule palette
    pub const ON_TIME: Self = Self::rgb(34, 197, 94);
    pub const LATE: Self = Self::rgb(239, 68, 68);
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    const fn svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Dash state of a stroke being revealed along its length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashReveal {
    /// Dash length, equal to the full path length.
    pub dash_length: f64,
    /// Current offset; equal to `dash_length` when hidden, 0 when drawn.
    pub dash_offset: f64,
    /// Total reveal duration, for hosts that animate natively.
    pub duration_ms: u64,
}

/// Platform-agnostic render command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Clear the surface.
    Clear { color: Color },

    /// Draw a circle.
    DrawCircle {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
        filled: bool,
        stroke_width: f64,
    },

    /// Draw a connected line through `points`.
    ///
    /// A non-empty `gradient` strokes with evenly spaced stops running
    /// corner to corner; `color` then only supplies the opacity.
    DrawPolyline {
        points: Vec<(f64, f64)>,
        color: Color,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        gradient: Vec<Color>,
        width: f64,
        /// Stroke reveal in progress, if any.
        reveal: Option<DashReveal>,
    },

    /// Draw an axis-aligned rectangle.
    DrawRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },

    /// Draw a text label.
    DrawText {
        x: f64,
        y: f64,
        text: String,
        color: Color,
        size: f64,
        anchor: TextAnchor,
    },

    /// Text shown on pointer-over of the region at (x, y, width, height).
    Tooltip {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        lines: Vec<String>,
    },
}

/// A complete drawable picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Surface width in pixels.
    pub width: f64,
    /// Surface height in pixels.
    pub height: f64,
    /// Whether this is the "awaiting data" placeholder.
    pub placeholder: bool,
    /// Commands, in painting order.
    pub commands: Vec<RenderCommand>,
}

impl Scene {
    /// Empty scene cleared to the background color.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            placeholder: false,
            commands: vec![RenderCommand::Clear {
                color: Color::BACKGROUND,
            }],
        }
    }

    /// Empty placeholder scene.
    #[must_use]
    pub fn placeholder(width: f64, height: f64) -> Self {
        Self {
            placeholder: true,
            ..Self::new(width, height)
        }
    }

    /// Append a command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Append a text label.
    pub fn text(&mut self, x: f64, y: f64, text: impl Into<String>, color: Color, size: f64) {
        self.text_anchored(x, y, text, color, size, TextAnchor::Start);
    }

    /// Append a text label with explicit alignment.
    pub fn text_anchored(
        &mut self,
        x: f64,
        y: f64,
        text: impl Into<String>,
        color: Color,
        size: f64,
        anchor: TextAnchor,
    ) {
        self.push(RenderCommand::DrawText {
            x,
            y,
            text: text.into(),
            color,
            size,
            anchor,
        });
    }

    /// All polylines, in painting order, with their reveal state.
    pub fn polylines(&self) -> impl Iterator<Item = (&[(f64, f64)], Option<&DashReveal>)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            RenderCommand::DrawPolyline { points, reveal, .. } => {
                Some((points.as_slice(), reveal.as_ref()))
            }
            _ => None,
        })
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether there are no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text labels, in painting order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            RenderCommand::DrawText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether any label contains `needle`.
    #[must_use]
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Serialize the command list.
    ///
    /// # Errors
    ///
    /// Returns error if a coordinate is not representable in JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render to a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_svg(&mut out);
        out
    }

    fn write_svg(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = fmt_num(self.width),
            h = fmt_num(self.height)
        )?;
        for (i, cmd) in self.commands.iter().enumerate() {
            match cmd {
                RenderCommand::Clear { color } => writeln!(
                    out,
                    r#"  <rect x="0" y="0" width="100%" height="100%" fill="{}"/>"#,
                    color.hex()
                )?,
                RenderCommand::DrawCircle {
                    x,
                    y,
                    radius,
                    color,
                    filled,
                    stroke_width,
                } => {
                    let fill = if *filled { color.hex() } else { "none".to_string() };
                    writeln!(
                        out,
                        r#"  <circle cx="{}" cy="{}" r="{}" fill="{fill}" fill-opacity="{}" stroke="{}" stroke-width="{}"/>"#,
                        fmt_num(*x),
                        fmt_num(*y),
                        fmt_num(*radius),
                        fmt_num(color.opacity()),
                        color.hex(),
                        fmt_num(*stroke_width)
                    )?;
                }
                RenderCommand::DrawPolyline {
                    points,
                    color,
                    gradient,
                    width,
                    reveal,
                } => {
                    let stroke = if gradient.is_empty() {
                        color.hex()
                    } else {
                        let id = format!("stroke-{i}");
                        write_gradient(out, &id, gradient)?;
                        format!("url(#{id})")
                    };
                    let mut d = String::new();
                    for (i, (px, py)) in points.iter().enumerate() {
                        let op = if i == 0 { 'M' } else { 'L' };
                        write!(d, "{op}{},{} ", fmt_num(*px), fmt_num(*py))?;
                    }
                    write!(
                        out,
                        r#"  <path d="{}" fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round""#,
                        d.trim_end(),
                        stroke,
                        fmt_num(color.opacity()),
                        fmt_num(*width)
                    )?;
                    if let Some(r) = reveal {
                        write!(
                            out,
                            r#" stroke-dasharray="{}" stroke-dashoffset="{}""#,
                            fmt_num(r.dash_length),
                            fmt_num(r.dash_offset)
                        )?;
                    }
                    writeln!(out, "/>")?;
                }
                RenderCommand::DrawRect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => writeln!(
                    out,
                    r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="4" fill="{}" fill-opacity="{}"/>"#,
                    fmt_num(*x),
                    fmt_num(*y),
                    fmt_num(*width),
                    fmt_num(*height),
                    color.hex(),
                    fmt_num(color.opacity())
                )?,
                RenderCommand::DrawText {
                    x,
                    y,
                    text,
                    color,
                    size,
                    anchor,
                } => writeln!(
                    out,
                    r#"  <text x="{}" y="{}" fill="{}" font-size="{}" font-family="monospace" text-anchor="{}">{}</text>"#,
                    fmt_num(*x),
                    fmt_num(*y),
                    color.hex(),
                    fmt_num(*size),
                    anchor.svg(),
                    escape_xml(text)
                )?,
                RenderCommand::Tooltip {
                    x,
                    y,
                    width,
                    height,
                    lines,
                } => writeln!(
                    out,
                    r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="transparent"><title>{}</title></rect>"#,
                    fmt_num(*x),
                    fmt_num(*y),
                    fmt_num(*width),
                    fmt_num(*height),
                    escape_xml(&lines.join("\n"))
                )?,
            }
        }
        writeln!(out, "</svg>")
    }
}

/// Compact number formatting: integers without a fraction, others to 3
/// decimals with trailing zeros removed.
#[must_use]
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn write_gradient(out: &mut String, id: &str, stops: &[Color]) -> std::fmt::Result {
    writeln!(
        out,
        r#"  <defs><linearGradient id="{id}" x1="0%" y1="0%" x2="100%" y2="100%">"#
    )?;
    let last = stops.len().saturating_sub(1).max(1) as f64;
    for (k, stop) in stops.iter().enumerate() {
        writeln!(
            out,
            r#"    <stop offset="{}%" stop-color="{}"/>"#,
            fmt_num(k as f64 / last * 100.0),
            stop.hex()
        )?;
    }
    writeln!(out, "  </linearGradient></defs>")
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_rgb() {
        let c = Color::rgb(255, 128, 0);
        assert_eq!(c.a, 255);
        assert_eq!(c.hex(), "#ff8000");
        assert!((c.opacity() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::NODE.hex(), "#00f2fe");
        assert_eq!(Color::CONNECTION_DOT.hex(), "#ff2df7");
    }

    #[test]
    fn test_scene_starts_with_clear() {
        let scene = Scene::new(640.0, 360.0);
        assert_eq!(scene.len(), 1);
        assert!(!scene.placeholder);
        assert!(matches!(scene.commands[0], RenderCommand::Clear { .. }));
        assert!(Scene::placeholder(10.0, 10.0).placeholder);
    }

    #[test]
    fn test_scene_texts() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.text(0.0, 0.0, "NODES: 6", Color::WHITE, 12.0);
        scene.text(0.0, 20.0, "ITER: 3", Color::WHITE, 12.0);
        let texts: Vec<&str> = scene.texts().collect();
        assert_eq!(texts, vec!["NODES: 6", "ITER: 3"]);
        assert!(scene.has_text("ITER"));
        assert!(!scene.has_text("COST"));
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(320.0), "320");
        assert_eq!(fmt_num(1.5), "1.5");
        assert_eq!(fmt_num(11.111_111), "11.111");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(f64::NAN), "0");
        assert_eq!(fmt_num(f64::INFINITY), "0");
    }

    #[test]
    fn test_svg_output() {
        let mut scene = Scene::new(200.0, 100.0);
        scene.push(RenderCommand::DrawCircle {
            x: 10.0,
            y: 20.0,
            radius: 5.0,
            color: Color::NODE,
            filled: true,
            stroke_width: 2.0,
        });
        scene.push(RenderCommand::DrawPolyline {
            points: vec![(0.0, 0.0), (3.0, 4.0), (0.0, 0.0)],
            color: Color::PATH_END,
            gradient: Vec::new(),
            width: 4.0,
            reveal: Some(DashReveal {
                dash_length: 10.0,
                dash_offset: 10.0,
                duration_ms: 3000,
            }),
        });
        scene.text(1.0, 2.0, "A <b> & c", Color::WHITE, 10.0);

        let svg = scene.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"<circle cx="10" cy="20" r="5""#));
        assert!(svg.contains(r#"d="M0,0 L3,4 L0,0""#));
        assert!(svg.contains(r#"stroke-dasharray="10" stroke-dashoffset="10""#));
        assert!(svg.contains("A &lt;b&gt; &amp; c"));
    }

    #[test]
    fn test_svg_gradient_stroke() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.push(RenderCommand::DrawPolyline {
            points: vec![(0.0, 0.0), (50.0, 50.0)],
            color: Color::WHITE,
            gradient: Color::PATH_GRADIENT.to_vec(),
            width: 4.0,
            reveal: None,
        });

        let svg = scene.to_svg();
        assert!(svg.contains(r#"<linearGradient id="stroke-1""#));
        assert!(svg.contains(r##"<stop offset="0%" stop-color="#00f2fe"/>"##));
        assert!(svg.contains(r##"<stop offset="50%" stop-color="#4facfe"/>"##));
        assert!(svg.contains(r##"<stop offset="100%" stop-color="#ff2df7"/>"##));
        assert!(svg.contains(r##"stroke="url(#stroke-1)""##));

        let back: Scene = serde_json::from_str(&scene.to_json().unwrap()).unwrap();
        assert_eq!(back, scene);
    }

    #[test]
    fn test_json_output_tags_commands() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(RenderCommand::Tooltip {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            lines: vec!["Task 0".to_string()],
        });
        let json = scene.to_json().unwrap();
        assert!(json.contains(r#""cmd": "tooltip""#));
        let back: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scene);
    }
}
