//! Per-frame rendering
//!
//! Each frame only the grid cells around the pointer are visited. Visible
//! points are advanced, lit by their distance to the pointer and drawn into
//! an offscreen [`Layer`] in pointer-local coordinates; the layer is then
//! blitted onto the canvas centered on the pointer.

use crate::field::ParticleField;
use galaxy_animation::Easing;
use galaxy_paint::{Canvas, Color, FillStyle, Gradient, Layer, Point, Rect};
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Link strength at full proximity
pub const MAX_LINK_ALPHA: f32 = 0.5;
/// Point alpha at full proximity
pub const MAX_POINT_ALPHA: f32 = 0.8;

/// Link strength and point alpha at `distance` from the pointer.
///
/// Full strength inside a tenth of `radius`, a cubic ease-in falloff out to
/// `radius`, nothing beyond.
pub fn proximity(distance: f32, radius: f32) -> (f32, f32) {
    if distance <= radius / 10.0 {
        (MAX_LINK_ALPHA, MAX_POINT_ALPHA)
    } else if distance <= radius {
        let ease = Easing::EaseInCubic.apply((radius - distance) / radius);
        (ease * MAX_LINK_ALPHA, ease * MAX_POINT_ALPHA)
    } else {
        (0.0, 0.0)
    }
}

/// Pointer position and the position the last frame was drawn at
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub lx: f32,
    pub ly: f32,
}

impl Pointer {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn last_position(&self) -> Point {
        Point::new(self.lx, self.ly)
    }
}

/// What one frame drew
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub points_visited: usize,
    pub circles: usize,
    pub links: usize,
}

/// Draws frames of a [`ParticleField`]
#[derive(Debug, Default)]
pub struct FrameRenderer {
    /// Unordered pairs linked this frame
    drawn: FxHashSet<(usize, usize)>,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one frame at time `now`.
    ///
    /// Does nothing until the field has a layout.
    pub fn render(
        &mut self,
        field: &mut ParticleField,
        pointer: &mut Pointer,
        canvas: &mut dyn Canvas,
        layer: &mut Layer,
        now: f64,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        let Some(layout) = field.layout().copied() else {
            return stats;
        };
        let margin = layout.offset_margin as f32;
        let side = margin * 2.0;
        let radius = field.config().radius;
        let gradient = field.config().gradient;
        // Truncated exclusive bounds: a column the margin only partly
        // reaches on the right or bottom edge is not lit.
        let window = layout.window(pointer.x, pointer.y);

        canvas.clear_rect(Rect::centered(pointer.last_position(), margin));
        pointer.lx = pointer.x;
        pointer.ly = pointer.y;

        let center = pointer.position();
        let to_local = |p: Point| Point::new(margin - (center.x - p.x), margin - (center.y - p.y));

        for idx in window.indices() {
            field.advance_point(idx, now);
            let Some(point) = field.points_mut().get_mut(idx) else {
                continue;
            };
            let (active, ca) = proximity(point.position().distance(center), radius);
            point.active = active;
            point.ca = ca;
            stats.points_visited += 1;

            let point = &field.points()[idx];
            let local = to_local(point.position());
            if ca > 0.0 {
                layer
                    .context_mut()
                    .fill_circle(local.x, local.y, point.r, Color::GALAXY.with_alpha(ca));
                stats.circles += 1;
            }
            if active <= 0.0 {
                continue;
            }

            for &near in &point.closest {
                // Neighbors outside the window were not lit this frame
                if !window.contains(near) {
                    continue;
                }
                let Some(other) = field.points().get(near) else {
                    continue;
                };
                if other.active <= 0.0 || !self.drawn.insert((idx.min(near), idx.max(near))) {
                    continue;
                }

                let other_local = to_local(other.position());
                let paint: FillStyle = if gradient {
                    Gradient::linear_simple(
                        other_local,
                        local,
                        Color::GALAXY.with_alpha(other.active),
                        Color::GALAXY.with_alpha(active),
                    )
                    .into()
                } else {
                    Color::GALAXY.with_alpha(active.min(other.active)).into()
                };
                layer.context_mut().stroke_line(local, other_local, paint);
                stats.links += 1;
            }
        }

        canvas.draw_layer(
            layer,
            Rect::new(0.0, 0.0, side, side),
            Rect::new(center.x - margin, center.y - margin, side, side),
        );
        layer.clear();
        self.drawn.clear();
        field.record_frame();

        tracing::trace!(
            visited = stats.points_visited,
            circles = stats.circles,
            links = stats.links,
            "rendered frame"
        );
        stats
    }
}
