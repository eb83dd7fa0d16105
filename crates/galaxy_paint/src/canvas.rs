//! Drawing surfaces
//!
//! A [`Canvas`] is the visible surface owned by the render loop. Drawing
//! happens into an offscreen [`Layer`] whose recorded commands are blitted
//! onto the canvas once per frame.

use crate::context::PaintContext;
use crate::primitives::Rect;
use std::sync::{Arc, Mutex};

/// Visible drawing surface
pub trait Canvas: Send {
    /// Current surface size in pixels
    fn size(&self) -> (u32, u32);

    /// Resize the surface. Resizing discards its contents.
    fn set_size(&mut self, width: u32, height: u32);

    /// Clear a rectangle to transparent
    fn clear_rect(&mut self, rect: Rect);

    /// Draw the `src` region of `layer` into `dst` on this canvas
    fn draw_layer(&mut self, layer: &Layer, src: Rect, dst: Rect);
}

/// Offscreen drawing buffer
#[derive(Debug, Default)]
pub struct Layer {
    width: u32,
    height: u32,
    context: PaintContext,
}

impl Layer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            context: PaintContext::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    /// Resize the buffer, discarding anything drawn so far
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.context.clear();
    }

    pub fn context(&self) -> &PaintContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut PaintContext {
        &mut self.context
    }

    /// Clear the whole buffer
    pub fn clear(&mut self) {
        self.context.clear();
    }
}

/// A canvas call captured by [`RecordingCanvas`]
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    Resize { width: u32, height: u32 },
    ClearRect(Rect),
    DrawLayer {
        src: Rect,
        dst: Rect,
        /// Number of paint commands in the layer at blit time
        commands: usize,
    },
}

/// Canvas that records every call instead of drawing
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<CanvasOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of layer blits recorded so far
    pub fn blit_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::DrawLayer { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.ops.push(CanvasOp::Resize { width, height });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ops.push(CanvasOp::ClearRect(rect));
    }

    fn draw_layer(&mut self, layer: &Layer, src: Rect, dst: Rect) {
        self.ops.push(CanvasOp::DrawLayer {
            src,
            dst,
            commands: layer.context().commands().len(),
        });
    }
}

/// A canvas shared with an observer.
///
/// The render loop owns one clone; whoever kept the other can inspect the
/// surface between frames. A poisoned lock turns every call into a no-op.
impl<C: Canvas> Canvas for Arc<Mutex<C>> {
    fn size(&self) -> (u32, u32) {
        self.lock().map(|canvas| canvas.size()).unwrap_or((0, 0))
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if let Ok(mut canvas) = self.lock() {
            canvas.set_size(width, height);
        }
    }

    fn clear_rect(&mut self, rect: Rect) {
        if let Ok(mut canvas) = self.lock() {
            canvas.clear_rect(rect);
        }
    }

    fn draw_layer(&mut self, layer: &Layer, src: Rect, dst: Rect) {
        if let Ok(mut canvas) = self.lock() {
            canvas.draw_layer(layer, src, dst);
        }
    }
}
