//! Worker runtime
//!
//! Runs a [`GalaxyCursor`] on its own tokio task. The host keeps a
//! [`WorkerHandle`] and talks to the task only through messages; the canvas
//! is moved into the task inside a [`Property::Canvas`] message.

use crate::channel::{Command, Message, Property};
use crate::config::FieldConfig;
use crate::cursor::GalaxyCursor;
use crate::field::ParticleField;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Default frame clock period, roughly 60 Hz
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Worker configuration
#[derive(Clone, Debug)]
pub struct WorkerOptions {
    /// Initial field configuration
    pub config: FieldConfig,
    /// Period of the frame clock
    pub frame_interval: Duration,
    /// Seed for point placement and jitter; `None` draws from the OS
    pub seed: Option<u64>,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            config: FieldConfig::default(),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            seed: None,
        }
    }
}

/// Host side of a running worker
pub struct WorkerHandle {
    tx: mpsc::UnboundedSender<Message>,
    task: JoinHandle<GalaxyCursor>,
}

/// Start a worker on the current tokio runtime
pub fn spawn(options: WorkerOptions) -> WorkerHandle {
    let field = match options.seed {
        Some(seed) => ParticleField::with_seed(options.config, seed),
        None => ParticleField::new(options.config),
    };
    let cursor = GalaxyCursor::with_field(field);
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(cursor, rx, options.frame_interval));
    debug!(interval = ?options.frame_interval, "galaxy worker spawned");
    WorkerHandle { tx, task }
}

impl WorkerHandle {
    /// Send a message. Returns `false` once the worker has exited.
    pub fn post(&self, message: Message) -> bool {
        match self.tx.send(message) {
            Ok(()) => true,
            Err(err) => {
                warn!(message = ?err.0, "galaxy worker is gone");
                false
            }
        }
    }

    pub fn set(&self, properties: Vec<Property>) -> bool {
        self.post(Message::Set(properties))
    }

    pub fn start(&self) -> bool {
        self.post(Message::Call(Command::Start))
    }

    pub fn stop(&self) -> bool {
        self.post(Message::Call(Command::Stop))
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Close the channel and wait for the worker to wind down.
    ///
    /// Returns the cursor in its final state, or `None` if the task
    /// panicked or was cancelled.
    pub async fn terminate(self) -> Option<GalaxyCursor> {
        let WorkerHandle { tx, task } = self;
        drop(tx);
        match task.await {
            Ok(cursor) => Some(cursor),
            Err(err) => {
                warn!(%err, "galaxy worker failed");
                None
            }
        }
    }
}

async fn run(
    mut cursor: GalaxyCursor,
    mut rx: mpsc::UnboundedReceiver<Message>,
    frame_interval: Duration,
) -> GalaxyCursor {
    let clock = Instant::now();
    let elapsed_ms = || clock.elapsed().as_secs_f64() * 1000.0;
    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // Messages first, so a batch lands before the next frame
            biased;
            message = rx.recv() => match message {
                Some(message) => cursor.handle(message, elapsed_ms()),
                None => {
                    cursor.stop();
                    debug!("galaxy channel closed");
                    break;
                }
            },
            _ = frames.tick() => {
                let now = elapsed_ms();
                if !cursor.on_animation_frame(now) {
                    cursor.poll(now);
                }
            }
        }
    }
    cursor
}
