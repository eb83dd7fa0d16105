//! Paint context - the recording drawing API

use crate::color::Color;
use crate::gradient::Gradient;
use crate::path::{Path, Point};
use crate::primitives::*;

/// Fill style for shapes
#[derive(Clone, Debug, PartialEq)]
pub enum FillStyle {
    Color(Color),
    Gradient(Gradient),
}

impl FillStyle {
    /// Paint color at a point
    pub fn color_at(&self, point: Point) -> Color {
        match self {
            FillStyle::Color(color) => *color,
            FillStyle::Gradient(gradient) => gradient.color_at(point),
        }
    }
}

impl From<Color> for FillStyle {
    fn from(color: Color) -> Self {
        FillStyle::Color(color)
    }
}

impl From<Gradient> for FillStyle {
    fn from(gradient: Gradient) -> Self {
        FillStyle::Gradient(gradient)
    }
}

/// Stroke style
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub paint: FillStyle,
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            paint: FillStyle::Color(Color::TRANSPARENT),
            width: 1.0,
        }
    }
}

/// A paint command for the renderer
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    FillCircle { circle: Circle, style: FillStyle },
    StrokePath { path: Path, style: StrokeStyle },
}

/// The paint context used for custom drawing
#[derive(Debug, Default)]
pub struct PaintContext {
    commands: Vec<PaintCommand>,
}

impl PaintContext {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Drop all recorded commands, keeping the allocation
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    // === Shape drawing ===

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, style: impl Into<FillStyle>) {
        self.commands.push(PaintCommand::FillCircle {
            circle: Circle::new(Point::new(cx, cy), radius),
            style: style.into(),
        });
    }

    // === Path drawing ===

    pub fn stroke_path(&mut self, path: Path, paint: impl Into<FillStyle>, width: f32) {
        self.commands.push(PaintCommand::StrokePath {
            path,
            style: StrokeStyle {
                paint: paint.into(),
                width,
            },
        });
    }

    pub fn stroke_line(&mut self, from: Point, to: Point, paint: impl Into<FillStyle>) {
        self.stroke_path(Path::line(from, to), paint, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_commands_in_order() {
        let mut ctx = PaintContext::new();
        ctx.fill_circle(1.0, 2.0, 3.0, Color::GALAXY);
        ctx.stroke_line(Point::ZERO, Point::new(4.0, 4.0), Color::GALAXY.with_alpha(0.5));

        let commands = ctx.commands();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], PaintCommand::FillCircle { .. }));
        match &commands[1] {
            PaintCommand::StrokePath { style, .. } => {
                assert_eq!(style.width, 1.0);
                assert_eq!(style.paint, FillStyle::Color(Color::GALAXY.with_alpha(0.5)));
            }
            other => panic!("unexpected command {other:?}"),
        }

        ctx.clear();
        assert!(ctx.is_empty());
    }
}
