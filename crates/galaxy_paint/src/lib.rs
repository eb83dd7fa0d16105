//! Galaxy Paint API
//!
//! A small 2D drawing layer for the galaxy cursor effect, shaped after the
//! HTML canvas model the effect was designed for.
//!
//! # Features
//!
//! - Recorded paint commands (filled circles, stroked lines)
//! - Flat colors and two-stop linear gradients
//! - Offscreen [`Layer`]s blitted onto a [`Canvas`]
//! - A software [`Pixmap`] canvas with PNG export
//! - A [`RecordingCanvas`] for inspecting canvas traffic

pub mod canvas;
pub mod color;
pub mod context;
pub mod error;
pub mod gradient;
pub mod path;
pub mod pixmap;
pub mod primitives;

pub use canvas::{Canvas, CanvasOp, Layer, RecordingCanvas};
pub use color::Color;
pub use context::{FillStyle, PaintCommand, PaintContext, StrokeStyle};
pub use error::{PaintError, Result};
pub use gradient::{Gradient, GradientStop};
pub use path::{Path, PathCommand, Point};
pub use pixmap::{Pixmap, MAX_PIXMAP_SIDE};
pub use primitives::*;
