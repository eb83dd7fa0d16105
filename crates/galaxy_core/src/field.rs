//! Particle field
//!
//! Owns the points, their jitter tweens and their neighbor lists. The field
//! never draws; the render loop reads it once per frame.

use crate::channel::Property;
use crate::config::{FieldConfig, Layout, FIELD_EASING};
use crate::error::{GalaxyError, Result};
use crate::neighbors;
use crate::particle::{Axis, Particle};
use galaxy_animation::{DriveMode, Tween, TweenHandle, TweenScheduler};
use galaxy_paint::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, trace, warn};

/// Draws of a jitter target before giving up and heading back to the origin
const JITTER_ATTEMPTS: usize = 8;

/// Work a configuration change requires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regeneration {
    /// Nothing changed, or the change is read directly each frame
    None,
    /// Layout, points and neighbors must be rebuilt
    Resize,
    /// Only neighbor lists must be rebuilt
    Neighbors,
}

/// Counters for regeneration work and rendered frames
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldStats {
    pub resizes: u64,
    pub point_regenerations: u64,
    pub neighbor_regenerations: u64,
    pub failed_neighbor_units: u64,
    pub frames: u64,
}

/// Outcome of one neighbor regeneration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeighborReport {
    pub settled: usize,
    pub failed: usize,
}

/// The grid of jittering points
pub struct ParticleField {
    config: FieldConfig,
    layout: Option<Layout>,
    points: Vec<Particle>,
    scheduler: TweenScheduler<Vec<Particle>>,
    rng: StdRng,
    stats: FieldStats,
}

impl ParticleField {
    pub fn new(config: FieldConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic field for tests and reproducible runs
    pub fn with_seed(config: FieldConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: FieldConfig, rng: StdRng) -> Self {
        let mut scheduler = TweenScheduler::new();
        scheduler.set_drive_mode(DriveMode::Manual);
        scheduler.set_default_easing(FIELD_EASING);
        Self {
            config,
            layout: None,
            points: Vec::new(),
            scheduler,
            rng,
            stats: FieldStats::default(),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Layout of the last successful resize
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn points(&self) -> &[Particle] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Particle] {
        &mut self.points
    }

    pub fn stats(&self) -> FieldStats {
        self.stats
    }

    /// Live jitter tweens
    pub fn live_tweens(&self) -> usize {
        self.scheduler.len()
    }

    pub(crate) fn record_frame(&mut self) {
        self.stats.frames += 1;
    }

    /// Store a configuration value.
    ///
    /// Returns the regeneration the change calls for, or
    /// [`Regeneration::None`] when the value is unchanged. Pointer and
    /// canvas properties are not field state and are ignored here.
    pub fn apply(&mut self, property: &Property) -> Regeneration {
        let config = &mut self.config;
        let (changed, regeneration) = match property {
            Property::Width(v) => (replace(&mut config.width, *v), Regeneration::Resize),
            Property::Height(v) => (replace(&mut config.height, *v), Regeneration::Resize),
            Property::Density(v) => (replace(&mut config.density, *v), Regeneration::Resize),
            Property::Radius(v) => (replace(&mut config.radius, *v), Regeneration::Resize),
            Property::Sradius(v) => (replace(&mut config.sradius, *v), Regeneration::Resize),
            Property::Distance(v) => (replace(&mut config.distance, *v), Regeneration::Resize),
            Property::Links(v) => (replace(&mut config.links, *v), Regeneration::Neighbors),
            Property::Accuracy(v) => (replace(&mut config.accuracy, *v), Regeneration::Neighbors),
            Property::Speed(v) => (replace(&mut config.speed, *v), Regeneration::None),
            Property::Gradient(v) => (replace(&mut config.gradient, *v), Regeneration::None),
            Property::X(_) | Property::Y(_) | Property::Canvas(_) => return Regeneration::None,
        };
        if changed {
            trace!(property = property.name(), "field config changed");
            regeneration
        } else {
            Regeneration::None
        }
    }

    /// Recompute the layout and rebuild points and neighbor lists.
    ///
    /// With an incomplete configuration nothing changes and
    /// [`GalaxyError::IncompleteConfig`] is returned.
    pub fn resize(&mut self) -> Result<Layout> {
        let layout = Layout::from_config(&self.config).ok_or(GalaxyError::IncompleteConfig {
            width: self.config.width,
            height: self.config.height,
            links: self.config.links,
            density: self.config.density,
        })?;
        self.layout = Some(layout);
        self.stats.resizes += 1;
        debug!(
            density = layout.density,
            cell_width = layout.cell_width,
            cell_height = layout.cell_height,
            offset_margin = layout.offset_margin,
            "resizing field"
        );

        self.regenerate_points()?;
        self.regenerate_neighbors()?;
        Ok(layout)
    }

    /// Place one point uniformly inside every grid cell and restart its
    /// jitter. Existing points are reused by index.
    pub fn regenerate_points(&mut self) -> Result<()> {
        let layout = self.layout.ok_or(GalaxyError::IncompleteConfig {
            width: self.config.width,
            height: self.config.height,
            links: self.config.links,
            density: self.config.density,
        })?;
        let len = self.config.point_count();

        if self.points.len() > len {
            for dropped in self.points.drain(len..) {
                for axis in Axis::BOTH {
                    self.scheduler.release(dropped.jitter(axis));
                }
            }
        }
        self.points.reserve(len - self.points.len());

        let sradius = self.config.sradius;
        let mut id = 0;
        for col in 0..layout.density {
            for row in 0..layout.density {
                let (cx, cy, cw, ch) = layout.cell(col, row);
                let x = cx + self.rng.random::<f32>() * cw;
                let y = cy + self.rng.random::<f32>() * ch;
                let r = (sradius + self.rng.random::<f32>() * sradius).trunc();

                match self.points.get_mut(id) {
                    Some(point) => {
                        point.place(x, y);
                        point.r = r;
                    }
                    None => self.points.push(Particle::new(id, x, y, r)),
                }
                self.shift_axis(id, Axis::X);
                self.shift_axis(id, Axis::Y);
                id += 1;
            }
        }

        self.stats.point_regenerations += 1;
        debug!(points = len, "regenerated points");
        Ok(())
    }

    /// Rebuild every neighbor list from scratch.
    ///
    /// Each point is searched by its own unit. Failed units are logged and
    /// counted; their points keep the list they had before.
    pub fn regenerate_neighbors(&mut self) -> Result<NeighborReport> {
        if !self.config.is_complete() {
            return Err(GalaxyError::IncompleteConfig {
                width: self.config.width,
                height: self.config.height,
                links: self.config.links,
                density: self.config.density,
            });
        }

        let positions: Vec<Point> = self.points.iter().map(Particle::position).collect();
        let jobs = neighbors::plan(
            positions.len(),
            self.config.search_buffer(),
            self.config.links as usize,
        );

        let mut report = NeighborReport::default();
        for (id, outcome) in neighbors::settle_all(&jobs, &positions) {
            match outcome {
                Ok(closest) => {
                    if let Some(point) = self.points.get_mut(id) {
                        point.closest = closest;
                    }
                    report.settled += 1;
                }
                Err(err) => {
                    warn!(%err, "neighbor search unit failed");
                    report.failed += 1;
                }
            }
        }

        self.stats.neighbor_regenerations += 1;
        self.stats.failed_neighbor_units += report.failed as u64;
        debug!(settled = report.settled, failed = report.failed, "regenerated neighbors");
        Ok(report)
    }

    /// Advance both jitter tweens of point `id`, chaining a fresh target
    /// whenever one completes.
    pub fn advance_point(&mut self, id: usize, now: f64) {
        for axis in Axis::BOTH {
            let Some(handle) = self.points.get(id).map(|point| point.jitter(axis)) else {
                return;
            };
            let step = self.scheduler.update(handle, now, &mut self.points);
            if step.is_some_and(|step| step.done) {
                self.shift_axis(id, axis);
            }
        }
    }

    /// Aim one axis of a point at a new random spot around its origin
    fn shift_axis(&mut self, id: usize, axis: Axis) {
        let Some(point) = self.points.get(id) else {
            return;
        };
        let current = axis.get(point);
        let origin = axis.origin(point);
        let existing = point.jitter(axis);

        let distance = self.config.distance;
        let rng = &mut self.rng;
        let target = if distance > 0.0 {
            (0..JITTER_ATTEMPTS)
                .map(|_| origin - distance + rng.random::<f32>() * distance * 2.0)
                .find(|target| *target != current)
                .unwrap_or(origin)
        } else {
            origin
        };
        let speed = self.config.speed;
        let duration = (speed + rng.random::<f32>() * speed).trunc();
        let tween = Tween::new(current, target, duration);

        let handle = match existing {
            TweenHandle::Inert => self.scheduler.start(
                tween,
                move |points: &mut Vec<Particle>, value, _done| {
                    if let Some(point) = points.get_mut(id) {
                        axis.set(point, value);
                    }
                    false
                },
                existing,
                &mut self.points,
            ),
            TweenHandle::Live(_) => {
                match self.scheduler.rearm(existing, tween, &mut self.points) {
                    TweenHandle::Inert => existing,
                    rearmed => rearmed,
                }
            }
        };

        if let Some(point) = self.points.get_mut(id) {
            axis.set_jitter(point, handle);
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(density: u32) -> FieldConfig {
        FieldConfig {
            width: 800.0,
            height: 600.0,
            density,
            links: 3,
            radius: 100.0,
            distance: 20.0,
            speed: 1000.0,
            accuracy: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_points_fill_their_cells() {
        let mut field = ParticleField::with_seed(config(10), 1);
        let layout = field.resize().unwrap();

        assert_eq!(field.points().len(), 100);
        for (id, point) in field.points().iter().enumerate() {
            assert_eq!(point.id, id);
            let (cx, cy, cw, ch) = layout.cell((id / 10) as u32, (id % 10) as u32);
            assert!(point.ox >= cx && point.ox <= cx + cw, "point {id} x out of cell");
            assert!(point.oy >= cy && point.oy <= cy + ch, "point {id} y out of cell");
            assert!(point.r >= 2.0 && point.r < 4.0);
        }
    }

    #[test]
    fn test_every_point_jitters_on_both_axes() {
        let mut field = ParticleField::with_seed(config(4), 2);
        field.resize().unwrap();
        assert_eq!(field.live_tweens(), 32);
    }

    #[test]
    fn test_incomplete_config_is_a_noop() {
        let mut field = ParticleField::with_seed(
            FieldConfig {
                width: 800.0,
                ..Default::default()
            },
            3,
        );
        assert!(matches!(
            field.resize(),
            Err(GalaxyError::IncompleteConfig { .. })
        ));
        assert!(field.points().is_empty());
        assert_eq!(field.stats(), FieldStats::default());
    }

    #[test]
    fn test_shrinking_releases_jitter() {
        let mut field = ParticleField::with_seed(config(6), 4);
        field.resize().unwrap();
        assert_eq!(field.apply(&Property::Density(3)), Regeneration::Resize);
        field.resize().unwrap();

        assert_eq!(field.points().len(), 9);
        assert_eq!(field.live_tweens(), 18);
    }

    #[test]
    fn test_jitter_stays_near_origin() {
        let mut field = ParticleField::with_seed(config(3), 5);
        field.resize().unwrap();

        let mut now = 0.0;
        for _ in 0..400 {
            for id in 0..field.points().len() {
                field.advance_point(id, now);
            }
            now += 16.0;
        }

        let distance = field.config().distance;
        for point in field.points() {
            assert!((point.x - point.ox).abs() <= distance + 0.01);
            assert!((point.y - point.oy).abs() <= distance + 0.01);
        }
        // Chained tweens keep every axis moving
        assert_eq!(field.live_tweens(), 18);
    }

    #[test]
    fn test_apply_classifies_changes() {
        let mut field = ParticleField::with_seed(config(5), 6);
        assert_eq!(field.apply(&Property::Width(800.0)), Regeneration::None);
        assert_eq!(field.apply(&Property::Width(640.0)), Regeneration::Resize);
        assert_eq!(field.apply(&Property::Links(4)), Regeneration::Neighbors);
        assert_eq!(field.apply(&Property::Accuracy(20.0)), Regeneration::Neighbors);
        assert_eq!(field.apply(&Property::Gradient(true)), Regeneration::None);
        assert!(field.config().gradient);
        assert_eq!(field.apply(&Property::X(10.0)), Regeneration::None);
    }

    #[test]
    fn test_neighbor_lists_respect_links() {
        let mut field = ParticleField::with_seed(config(10), 7);
        field.resize().unwrap();

        let buffer = field.config().search_buffer();
        for point in field.points() {
            assert!(point.closest.len() <= 3);
            assert!(!point.closest.contains(&point.id));
            for near in &point.closest {
                assert!(*near + buffer >= point.id && *near < point.id + buffer);
            }
        }

        field.apply(&Property::Links(1));
        let report = field.regenerate_neighbors().unwrap();
        assert_eq!(report.settled, 100);
        assert!(field.points().iter().all(|point| point.closest.len() <= 1));
        assert_eq!(field.stats().neighbor_regenerations, 2);
    }
}
