//! Galaxy Cursor Core
//!
//! The simulation behind the galaxy cursor effect: a jittering grid of
//! particles that light up and link to their nearest neighbors around the
//! pointer.
//!
//! - **Particle Field**: grid placement, perpetual jitter, approximate k-NN links
//! - **Render Loop**: per-frame proximity, offscreen drawing and blitting
//! - **Channel**: property/command messages from the host
//! - **Worker**: the simulation on its own task, fed over a channel
//!
//! # Example
//!
//! ```rust
//! use galaxy_core::{Command, GalaxyCursor, Message, Property};
//! use galaxy_paint::RecordingCanvas;
//!
//! let mut cursor = GalaxyCursor::with_seed(7);
//! cursor.handle(
//!     Message::Set(vec![
//!         Property::Canvas(Box::new(RecordingCanvas::new(0, 0))),
//!         Property::Width(800.0),
//!         Property::Height(600.0),
//!         Property::Density(5),
//!     ]),
//!     0.0,
//! );
//! assert_eq!(cursor.field().points().len(), 25);
//!
//! cursor.handle(Message::Call(Command::Start), 0.0);
//! assert!(cursor.frame_pending());
//! assert!(cursor.on_animation_frame(16.0));
//! ```

pub mod channel;
pub mod config;
pub mod cursor;
pub mod debounce;
pub mod error;
pub mod field;
pub mod host;
pub mod neighbors;
pub mod particle;
pub mod render;
pub mod worker;

pub use channel::{Command, Message, Property, PropertyBatch};
pub use config::{FieldConfig, GridWindow, Layout};
pub use cursor::GalaxyCursor;
pub use error::{GalaxyError, Result};
pub use field::{FieldStats, NeighborReport, ParticleField, Regeneration};
pub use host::{CursorHost, MessageSink};
pub use particle::{Axis, Particle};
pub use render::{FrameRenderer, FrameStats, Pointer};
pub use worker::{WorkerHandle, WorkerOptions};
