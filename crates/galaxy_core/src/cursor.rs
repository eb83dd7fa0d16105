//! The galaxy cursor
//!
//! [`GalaxyCursor`] is the whole effect behind the channel: it owns the
//! particle field, the pointer, the canvas moved in by the host, and the
//! offscreen layer. Hosts feed it [`Message`]s and call
//! [`GalaxyCursor::on_animation_frame`] whenever their frame clock fires.

use crate::channel::{Command, Message, Property};
use crate::config::{FieldConfig, RESIZE_DEBOUNCE_MS};
use crate::debounce::Debouncer;
use crate::field::{ParticleField, Regeneration};
use crate::render::{FrameRenderer, FrameStats, Pointer};
use galaxy_paint::{Canvas, Layer};
use tracing::{debug, trace, warn};

pub struct GalaxyCursor {
    field: ParticleField,
    pointer: Pointer,
    canvas: Option<Box<dyn Canvas>>,
    layer: Option<Layer>,
    renderer: FrameRenderer,
    /// Frames are wanted
    active: bool,
    /// `start` ran at least once; resizes are debounced from then on
    started: bool,
    frame_requested: bool,
    resize: Debouncer,
    last_frame: FrameStats,
}

impl GalaxyCursor {
    pub fn new() -> Self {
        Self::with_field(ParticleField::new(FieldConfig::default()))
    }

    /// Default configuration with a seeded field
    pub fn with_seed(seed: u64) -> Self {
        Self::with_field(ParticleField::with_seed(FieldConfig::default(), seed))
    }

    /// Wrap an existing field. A complete configuration is laid out
    /// immediately.
    pub fn with_field(field: ParticleField) -> Self {
        let mut cursor = Self {
            field,
            pointer: Pointer::default(),
            canvas: None,
            layer: None,
            renderer: FrameRenderer::new(),
            active: false,
            started: false,
            frame_requested: false,
            resize: Debouncer::new(RESIZE_DEBOUNCE_MS),
            last_frame: FrameStats::default(),
        };
        if cursor.field.config().is_complete() {
            let config = cursor.field.config();
            cursor.pointer.x = (config.width / 2.0).trunc();
            cursor.pointer.y = (config.height / 2.0).trunc();
            cursor.pointer.lx = cursor.pointer.x;
            cursor.pointer.ly = cursor.pointer.y;
            cursor.resize_now();
        }
        cursor
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn canvas(&self) -> Option<&dyn Canvas> {
        self.canvas.as_deref()
    }

    pub fn layer(&self) -> Option<&Layer> {
        self.layer.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether a frame is scheduled
    pub fn frame_pending(&self) -> bool {
        self.frame_requested
    }

    /// What the most recent frame drew
    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    /// When the next debounced resize is due
    pub fn next_deadline(&self) -> Option<f64> {
        self.resize.deadline()
    }

    /// Apply one channel message
    pub fn handle(&mut self, message: Message, now: f64) {
        match message {
            Message::Set(batch) => {
                for property in batch {
                    self.set_property(property, now);
                }
            }
            Message::Call(Command::Start) => self.start(),
            Message::Call(Command::Stop) => self.stop(),
        }
    }

    /// Assign a property and run whatever regeneration it calls for.
    ///
    /// Unchanged values are ignored.
    pub fn set_property(&mut self, property: Property, now: f64) {
        trace!(?property, "set property");
        match property {
            Property::X(x) => self.pointer.x = x,
            Property::Y(y) => self.pointer.y = y,
            Property::Canvas(canvas) => self.attach_canvas(canvas),
            property => {
                let regeneration = self.field.apply(&property);
                if regeneration != Regeneration::None {
                    self.seed_pointer(&property);
                }
                match regeneration {
                    Regeneration::Resize => self.request_resize(now),
                    Regeneration::Neighbors => {
                        if let Err(err) = self.field.regenerate_neighbors() {
                            debug!(%err, "neighbor regeneration skipped");
                        }
                    }
                    Regeneration::None => {}
                }
            }
        }
    }

    /// First sizes center the pointer
    fn seed_pointer(&mut self, property: &Property) {
        match *property {
            Property::Width(width) if self.pointer.x == 0.0 => {
                self.pointer.x = (width / 2.0).trunc();
                self.pointer.lx = self.pointer.x;
            }
            Property::Height(height) if self.pointer.y == 0.0 => {
                self.pointer.y = (height / 2.0).trunc();
                self.pointer.ly = self.pointer.y;
            }
            _ => {}
        }
    }

    fn attach_canvas(&mut self, mut canvas: Box<dyn Canvas>) {
        if self.field.layout().is_some() {
            sync_canvas_size(canvas.as_mut(), self.field.config());
        }
        debug!(size = ?canvas.size(), "canvas attached");
        self.canvas = Some(canvas);
    }

    fn request_resize(&mut self, now: f64) {
        if self.started {
            self.resize.trigger(now);
        } else {
            self.resize_now();
        }
    }

    fn resize_now(&mut self) {
        let layout = match self.field.resize() {
            Ok(layout) => layout,
            Err(err) => {
                debug!(%err, "resize skipped");
                return;
            }
        };
        let side = layout.buffer_side();
        if let Some(layer) = self.layer.as_mut() {
            if layer.width() != side || layer.height() != side {
                layer.resize(side, side);
            }
        }
        if let Some(canvas) = self.canvas.as_mut() {
            sync_canvas_size(canvas.as_mut(), self.field.config());
        }
    }

    /// Run a debounced resize if it is due
    pub fn poll(&mut self, now: f64) {
        if self.resize.ready(now) {
            self.resize_now();
        }
    }

    /// Begin rendering. The first call allocates the offscreen layer.
    pub fn start(&mut self) {
        if !self.started {
            let side = self.field.layout().map_or(0, |layout| layout.buffer_side());
            self.layer = Some(Layer::new(side, side));
            self.started = true;
        }
        if !self.active {
            self.active = true;
            self.frame_requested = true;
            debug!("galaxy cursor started");
        }
    }

    /// Cancel the scheduled frame. Field and tween state are kept.
    pub fn stop(&mut self) {
        if self.active {
            self.active = false;
            self.frame_requested = false;
            debug!("galaxy cursor stopped");
        }
    }

    /// Run the scheduled frame, if any. Returns `false` when no frame was
    /// pending.
    pub fn on_animation_frame(&mut self, now: f64) -> bool {
        if !std::mem::take(&mut self.frame_requested) {
            return false;
        }
        self.poll(now);

        if let (Some(canvas), Some(layer)) = (self.canvas.as_mut(), self.layer.as_mut()) {
            self.last_frame =
                self.renderer
                    .render(&mut self.field, &mut self.pointer, canvas.as_mut(), layer, now);
        }
        if self.active {
            self.frame_requested = true;
        }
        true
    }
}

impl Default for GalaxyCursor {
    fn default() -> Self {
        Self::new()
    }
}

fn sync_canvas_size(canvas: &mut dyn Canvas, config: &FieldConfig) {
    if !config.width.is_finite() || !config.height.is_finite() {
        warn!(
            width = config.width,
            height = config.height,
            "canvas size not finite, keeping surface"
        );
        return;
    }
    let size = (config.width as u32, config.height as u32);
    if canvas.size() != size {
        canvas.set_size(size.0, size.1);
    }
}
