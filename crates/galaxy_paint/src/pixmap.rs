//! Software canvas
//!
//! An RGBA8 pixel surface that replays recorded paint commands. Straight
//! (non-premultiplied) alpha, source-over blending, one-pixel anti-aliasing.

use crate::canvas::{Canvas, Layer};
use crate::color::Color;
use crate::context::{FillStyle, PaintCommand};
use crate::error::{PaintError, Result};
use crate::path::Point;
use crate::primitives::{Circle, Rect};
use std::io::Cursor;

/// Largest side a pixmap accepts, matching common browser canvas limits
pub const MAX_PIXMAP_SIDE: u32 = 16_384;

/// Zeroed RGBA buffer for a `width` x `height` surface, or `None` when the
/// size is out of range or the allocation fails.
fn alloc_pixels(width: u32, height: u32) -> Option<Vec<u8>> {
    if width > MAX_PIXMAP_SIDE || height > MAX_PIXMAP_SIDE {
        return None;
    }
    let len = (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)?;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(len).ok()?;
    pixels.resize(len, 0);
    Some(pixels)
}

/// RGBA pixel surface that mirrors an HTML canvas
#[derive(Clone, Debug)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Pixmap {
    /// Create a transparent pixmap. Both dimensions must be non-zero and at
    /// most [`MAX_PIXMAP_SIDE`].
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixels = (width != 0 && height != 0)
            .then(|| alloc_pixels(width, height))
            .flatten()
            .ok_or(PaintError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Get a pixel at (x, y) as RGBA
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let px = self.pixels.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Number of pixels with non-zero alpha
    pub fn painted_pixels(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    /// Clear the whole surface to transparent
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Encode the surface as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or(PaintError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Pixel index range covered by `rect`, clipped to the surface
    fn pixel_span(&self, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.floor().max(0.0) as u32;
        let y0 = rect.y.floor().max(0.0) as u32;
        let x1 = (rect.right().ceil().max(0.0) as u32).min(self.width);
        let y1 = (rect.bottom().ceil().max(0.0) as u32).min(self.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        let src_a = color.a * coverage;
        if src_a <= 0.0 {
            return;
        }
        let idx = self.index(x, y);
        let Some(px) = self.pixels.get_mut(idx..idx + 4) else {
            return;
        };

        let dst_a = px[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mix = |src: f32, dst: u8| {
            let dst = dst as f32 / 255.0;
            ((src * src_a + dst * dst_a * (1.0 - src_a)) / out_a * 255.0).round() as u8
        };
        px[0] = mix(color.r, px[0]);
        px[1] = mix(color.g, px[1]);
        px[2] = mix(color.b, px[2]);
        px[3] = (out_a * 255.0).round() as u8;
    }

    /// Rasterize `area` (canvas space) with a coverage function of the
    /// layer-space pixel center.
    fn raster<F>(&mut self, area: Rect, clip: &Rect, offset: Point, style: &FillStyle, coverage: F)
    where
        F: Fn(Point) -> f32,
    {
        let Some(area) = area.intersect(clip) else {
            return;
        };
        let Some((x0, y0, x1, y1)) = self.pixel_span(&area) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let local = Point::new(x as f32 + 0.5 - offset.x, y as f32 + 0.5 - offset.y);
                let cov = coverage(local);
                if cov > 0.0 {
                    self.blend(x, y, style.color_at(local), cov.min(1.0));
                }
            }
        }
    }

    fn fill_circle(&mut self, circle: &Circle, style: &FillStyle, clip: &Rect, offset: Point) {
        let reach = circle.radius + 1.0;
        let area = Rect::centered(circle.center.offset(offset.x, offset.y), reach);
        self.raster(area, clip, offset, style, |p| {
            circle.radius + 0.5 - p.distance(circle.center)
        });
    }

    fn stroke_segment(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        style: &FillStyle,
        clip: &Rect,
        offset: Point,
    ) {
        let half = width / 2.0;
        let reach = half + 1.0;
        let area = Rect::new(
            from.x.min(to.x) - reach + offset.x,
            from.y.min(to.y) - reach + offset.y,
            (to.x - from.x).abs() + reach * 2.0,
            (to.y - from.y).abs() + reach * 2.0,
        );
        self.raster(area, clip, offset, style, |p| {
            half + 0.5 - segment_distance(p, from, to)
        });
    }
}

fn segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

impl Canvas for Pixmap {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        let Some(pixels) = alloc_pixels(width, height) else {
            tracing::warn!(width, height, "pixmap size out of range, keeping surface");
            return;
        };
        tracing::trace!(width, height, "resizing pixmap");
        self.width = width;
        self.height = height;
        self.pixels = pixels;
    }

    fn clear_rect(&mut self, rect: Rect) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(&rect) else {
            return;
        };
        for y in y0..y1 {
            let start = self.index(x0, y);
            let end = self.index(x1, y);
            self.pixels[start..end].fill(0);
        }
    }

    fn draw_layer(&mut self, layer: &Layer, src: Rect, dst: Rect) {
        let Some(src) = src.intersect(&layer.bounds()) else {
            return;
        };
        let offset = Point::new(dst.x - src.x, dst.y - src.y);
        let Some(clip) = Rect::new(src.x + offset.x, src.y + offset.y, src.width, src.height)
            .intersect(&dst)
        else {
            return;
        };

        for command in layer.context().commands() {
            match command {
                PaintCommand::FillCircle { circle, style } => {
                    self.fill_circle(circle, style, &clip, offset);
                }
                PaintCommand::StrokePath { path, style } => {
                    for (from, to) in path.segments() {
                        self.stroke_segment(from, to, style.width, &style.paint, &clip, offset);
                    }
                }
            }
        }
    }
}
