//! `galaxy run`: drive the effect headless with an orbiting pointer

use crate::config::GalaxyConfig;
use crate::report::RunReport;
use crate::RunArgs;
use anyhow::{anyhow, Context, Result};
use galaxy_core::{CursorHost, FieldConfig, GalaxyCursor, Message, ParticleField};
use galaxy_paint::Pixmap;
use std::f64::consts::TAU;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Surface size when neither the config nor the flags give one
const FALLBACK_SIZE: (u32, u32) = (800, 600);

pub fn run(args: RunArgs) -> Result<()> {
    let mut config = GalaxyConfig::load(args.config.as_deref())?;
    if let Some(frames) = args.frames {
        config.run.frames = frames;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.run.tick_ms = tick_ms;
    }
    if args.seed.is_some() {
        config.run.seed = args.seed;
    }
    if let (Some(width), Some(height)) = (args.width, args.height) {
        config.field.width = width as f32;
        config.field.height = height as f32;
    }
    if config.field.width <= 0.0 || config.field.height <= 0.0 {
        config.field.width = FALLBACK_SIZE.0 as f32;
        config.field.height = FALLBACK_SIZE.1 as f32;
    }

    let report = render(&config)?;

    if let Some(path) = &args.png {
        let png = report.png.context("No frame was rendered")?;
        std::fs::write(path, png).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote surface");
    }
    match &args.report {
        Some(path) => {
            report.summary.write_to_path(path)?;
            info!(path = %path.display(), "wrote report");
        }
        None => report.summary.write_to_writer(&mut std::io::stdout().lock())?,
    }
    Ok(())
}

struct Rendered {
    summary: RunReport,
    png: Option<Vec<u8>>,
}

fn render(config: &GalaxyConfig) -> Result<Rendered> {
    let field_config: FieldConfig = config.field.clone();
    let (width, height) = (field_config.width, field_config.height);
    let pixmap = Arc::new(Mutex::new(Pixmap::new(width as u32, height as u32)?));

    let field = match config.run.seed {
        Some(seed) => ParticleField::with_seed(field_config, seed),
        None => ParticleField::new(field_config),
    };
    let mut cursor = GalaxyCursor::with_field(field);
    let mut host = CursorHost::new(Vec::new(), false);
    host.connect(Some(Box::new(pixmap.clone())), width, height);
    host.visibility_changed(true);

    let run = &config.run;
    let orbit = &run.orbit;
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    let (mut blits, mut circles, mut links) = (0u64, 0u64, 0u64);
    let mut now = 0.0;

    info!(frames = run.frames, width, height, "rendering");
    for frame in 0..run.frames {
        now = frame as f64 * run.tick_ms;
        let angle = if orbit.period_ms > 0.0 {
            now / orbit.period_ms * TAU
        } else {
            0.0
        };
        let radius = orbit.radius as f64;
        host.pointer_moved(
            (cx + radius * angle.cos()) as f32,
            (cy + radius * angle.sin()) as f32,
        );
        deliver(&mut host, &mut cursor, now);

        let drawn = cursor.field().stats().frames;
        if cursor.on_animation_frame(now) && cursor.field().stats().frames > drawn {
            let frame_stats = cursor.last_frame();
            blits += 1;
            circles += frame_stats.circles as u64;
            links += frame_stats.links as u64;
        }
    }
    host.disconnect();
    deliver(&mut host, &mut cursor, now);
    debug!(active = cursor.is_active(), "run finished");

    let pixmap = pixmap
        .lock()
        .map_err(|_| anyhow!("Surface lock poisoned"))?;
    let stats = cursor.field().stats();
    let png = if stats.frames > 0 {
        Some(pixmap.encode_png()?)
    } else {
        None
    };

    Ok(Rendered {
        summary: RunReport {
            frames_requested: run.frames,
            frames_rendered: stats.frames,
            blits,
            circles,
            links,
            elapsed_ms: now,
            width: pixmap.width(),
            height: pixmap.height(),
            painted_pixels: pixmap.painted_pixels(),
            stats,
            config: cursor.field().config().clone(),
        },
        png,
    })
}

fn deliver(host: &mut CursorHost<Vec<Message>>, cursor: &mut GalaxyCursor, now: f64) {
    for message in std::mem::take(host.sink_mut()) {
        cursor.handle(message, now);
    }
}
