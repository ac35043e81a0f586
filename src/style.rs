//! Draw style: fill/stroke colors and shape-specific flags

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// How a shape is painted.
///
/// Transparent fill or stroke means "don't draw that part". `opacity` is a
/// `[0, 1]` multiplier applied on top of the colors' own alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub fill: Color,
    pub stroke: Color,
    pub width: f32,
    /// Corner radius for rects
    pub radius: f32,
    pub opacity: f32,
    /// Sector: stroke the rim
    pub draw_arc: bool,
    /// Sector: stroke both radii
    pub draw_radial_edges: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Color::NONE,
            stroke: Color::NONE,
            width: 1.0,
            radius: 0.0,
            opacity: 1.0,
            draw_arc: true,
            draw_radial_edges: true,
        }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filled(color: Color) -> Self {
        Self::default().fill(color)
    }

    pub fn stroked(color: Color, width: f32) -> Self {
        Self::default().stroke(color).width(width)
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = color;
        self
    }

    pub fn stroke(mut self, color: Color) -> Self {
        self.stroke = color;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn draw_arc(mut self, enabled: bool) -> Self {
        self.draw_arc = enabled;
        self
    }

    pub fn draw_radial_edges(mut self, enabled: bool) -> Self {
        self.draw_radial_edges = enabled;
        self
    }

    /// Opacity on the compositor's 0..=255 scale
    pub fn opacity_u8(&self) -> u8 {
        if !self.opacity.is_finite() {
            return 0;
        }
        (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    pub fn has_fill(&self) -> bool {
        !self.fill.is_transparent()
    }

    pub fn has_stroke(&self) -> bool {
        !self.stroke.is_transparent() && self.width > 0.0
    }
}

/// Partial style; unset fields fall through to earlier layers or defaults.
///
/// ```ignore
/// let outline = StyleBuilder::new().stroke(Color::BLACK).width(2.0);
/// let style = StyleBuilder::new().fill(Color::RED).merge(outline).build();
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StyleBuilder {
    fill: Option<Color>,
    stroke: Option<Color>,
    width: Option<f32>,
    radius: Option<f32>,
    opacity: Option<f32>,
    draw_arc: Option<bool>,
    draw_radial_edges: Option<bool>,
}

impl StyleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn stroke(mut self, color: Color) -> Self {
        self.stroke = Some(color);
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn draw_arc(mut self, enabled: bool) -> Self {
        self.draw_arc = Some(enabled);
        self
    }

    pub fn draw_radial_edges(mut self, enabled: bool) -> Self {
        self.draw_radial_edges = Some(enabled);
        self
    }

    /// Layer `other` on top: every field `other` sets wins
    pub fn merge(self, other: StyleBuilder) -> Self {
        Self {
            fill: other.fill.or(self.fill),
            stroke: other.stroke.or(self.stroke),
            width: other.width.or(self.width),
            radius: other.radius.or(self.radius),
            opacity: other.opacity.or(self.opacity),
            draw_arc: other.draw_arc.or(self.draw_arc),
            draw_radial_edges: other.draw_radial_edges.or(self.draw_radial_edges),
        }
    }

    pub fn build(self) -> Style {
        let defaults = Style::default();
        Style {
            fill: self.fill.unwrap_or(defaults.fill),
            stroke: self.stroke.unwrap_or(defaults.stroke),
            width: self.width.unwrap_or(defaults.width),
            radius: self.radius.unwrap_or(defaults.radius),
            opacity: self.opacity.unwrap_or(defaults.opacity),
            draw_arc: self.draw_arc.unwrap_or(defaults.draw_arc),
            draw_radial_edges: self.draw_radial_edges.unwrap_or(defaults.draw_radial_edges),
        }
    }
}

impl From<StyleBuilder> for Style {
    fn from(builder: StyleBuilder) -> Self {
        builder.build()
    }
}

impl From<Style> for StyleBuilder {
    fn from(style: Style) -> Self {
        Self {
            fill: Some(style.fill),
            stroke: Some(style.stroke),
            width: Some(style.width),
            radius: Some(style.radius),
            opacity: Some(style.opacity),
            draw_arc: Some(style.draw_arc),
            draw_radial_edges: Some(style.draw_radial_edges),
        }
    }
}
