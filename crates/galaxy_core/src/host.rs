//! Host bridge
//!
//! [`CursorHost`] sits on the host side of the channel and turns windowing
//! events into cursor messages: pointer moves, debounced viewport resizes,
//! attribute changes and visibility. It talks to the cursor only through a
//! [`MessageSink`].

use crate::channel::{parse_int, Command, Message, Property, ATTRIBUTES};
use crate::config::RESIZE_DEBOUNCE_MS;
use crate::debounce::Debouncer;
use crate::worker::WorkerHandle;
use galaxy_paint::Canvas;
use tokio::sync::mpsc;
use tracing::{trace, warn};

/// Where host messages go
pub trait MessageSink {
    fn post(&mut self, message: Message);
}

impl MessageSink for WorkerHandle {
    fn post(&mut self, message: Message) {
        WorkerHandle::post(self, message);
    }
}

impl MessageSink for mpsc::UnboundedSender<Message> {
    fn post(&mut self, message: Message) {
        if self.send(message).is_err() {
            trace!("message sink closed");
        }
    }
}

impl MessageSink for Vec<Message> {
    fn post(&mut self, message: Message) {
        self.push(message);
    }
}

/// Host-side state of one galaxy cursor surface
pub struct CursorHost<S: MessageSink> {
    sink: S,
    /// Sized by layout rather than fixed width/height attributes
    elastic: bool,
    active: bool,
    connected: bool,
    transferred: bool,
    pointer: (f32, f32),
    size: (f32, f32),
    pending_size: Option<(f32, f32)>,
    resize: Debouncer,
}

impl<S: MessageSink> CursorHost<S> {
    /// Create a host. Hosts start out active.
    pub fn new(sink: S, elastic: bool) -> Self {
        Self {
            sink,
            elastic,
            active: true,
            connected: false,
            transferred: false,
            pointer: (0.0, 0.0),
            size: (0.0, 0.0),
            pending_size: None,
            resize: Debouncer::new(RESIZE_DEBOUNCE_MS),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_elastic(&self) -> bool {
        self.elastic
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Attach to the surface and report its size.
    ///
    /// The canvas is handed over on the first connect only; later connects
    /// drop it and just report the size.
    pub fn connect(&mut self, canvas: Option<Box<dyn Canvas>>, width: f32, height: f32) {
        if !self.transferred {
            if let Some(canvas) = canvas {
                self.sink.post(Message::Set(vec![Property::Canvas(canvas)]));
                self.transferred = true;
            }
        }
        self.size = (width, height);
        self.sink
            .post(Message::Set(vec![Property::Width(width), Property::Height(height)]));
        self.connected = true;
    }

    /// Stop the cursor and detach
    pub fn disconnect(&mut self) {
        self.sink.post(Message::Call(Command::Stop));
        self.resize.cancel();
        self.pending_size = None;
        self.connected = false;
    }

    /// Forward the pointer position when it moved
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if self.pointer != (x, y) {
            self.pointer = (x, y);
            self.sink.post(Message::Set(vec![Property::X(x), Property::Y(y)]));
        }
    }

    /// Note a new viewport size; it is forwarded by [`Self::poll`] once the
    /// size has been stable for the debounce time.
    pub fn viewport_resized(&mut self, width: f32, height: f32, now: f64) {
        if !self.elastic || !self.connected {
            return;
        }
        self.pending_size = Some((width, height));
        self.resize.trigger(now);
    }

    /// Flush a settled viewport size
    pub fn poll(&mut self, now: f64) {
        if !self.resize.ready(now) {
            return;
        }
        if let Some((width, height)) = self.pending_size.take() {
            if self.size != (width, height) {
                self.size = (width, height);
                self.sink
                    .post(Message::Set(vec![Property::Width(width), Property::Height(height)]));
            }
        }
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.resize.deadline()
    }

    /// Forward a changed attribute, coerced to an integer.
    ///
    /// Elastic hosts own their size, so `width`/`height` attributes are
    /// ignored there.
    pub fn attribute_changed(&mut self, name: &str, old: Option<&str>, value: Option<&str>) {
        if old == value || !ATTRIBUTES.contains(&name) {
            return;
        }
        if self.elastic && matches!(name, "width" | "height") {
            return;
        }
        let Some(number) = value.and_then(parse_int) else {
            warn!(attribute = name, ?value, "attribute is not an integer");
            return;
        };
        match Property::from_number(name, number as f64) {
            Ok(Some(property)) => self.sink.post(Message::Set(vec![property])),
            Ok(None) => {}
            Err(err) => warn!(%err, "attribute rejected"),
        }
    }

    /// Visibility only matters while the host is active
    pub fn visibility_changed(&mut self, visible: bool) {
        if self.active {
            let command = if visible { Command::Start } else { Command::Stop };
            self.sink.post(Message::Call(command));
        }
    }

    pub fn start(&mut self) {
        if !self.active {
            self.sink.post(Message::Call(Command::Start));
            self.active = true;
        }
    }

    pub fn stop(&mut self) {
        if self.active {
            self.sink.post(Message::Call(Command::Stop));
            self.active = false;
        }
    }
}

impl<S: MessageSink> Drop for CursorHost<S> {
    fn drop(&mut self) {
        if self.connected {
            self.disconnect();
        }
    }
}
