//! Tween scheduler
//!
//! Manages all live tween jobs and advances them each frame.
//!
//! The scheduler is generic over a context type `Ctx`. Every callback receives
//! `&mut Ctx` alongside the interpolated value, so callbacks write into state
//! owned by the caller instead of capturing it.

use crate::easing::Easing;
use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    pub struct TweenId;
}

/// Per-frame tween callback.
///
/// Receives the caller's context, the current value, and whether the tween
/// finished. Returning `true` on a non-final frame cancels the tween.
pub type TweenCallback<Ctx> = Box<dyn FnMut(&mut Ctx, f32, bool) -> bool + Send>;

type EndHook = Box<dyn FnMut() + Send>;
type RenderHook = Box<dyn FnMut(bool) + Send>;

/// Parameters of a single interpolation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub start: f32,
    pub end: f32,
    pub duration_ms: f32,
    /// Easing curve, or `None` for the scheduler's default
    pub easing: Option<Easing>,
}

impl Tween {
    pub fn new(start: f32, end: f32, duration_ms: f32) -> Self {
        Self {
            start,
            end,
            duration_ms,
            easing: None,
        }
    }

    /// Builder: set the easing curve
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Builder: set the easing curve by registry name.
    ///
    /// Unknown names leave the choice to the scheduler default.
    pub fn with_easing_name(mut self, name: &str) -> Self {
        self.easing = Easing::from_name(name);
        self
    }

    fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.duration_ms.is_finite()
    }

    fn is_instant(&self) -> bool {
        self.duration_ms == 0.0 || self.start == self.end
    }
}

/// Handle returned by [`TweenScheduler::start`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TweenHandle {
    /// Nothing was scheduled (instant or rejected tween)
    #[default]
    Inert,
    /// A job owned by the scheduler
    Live(TweenId),
}

impl TweenHandle {
    pub fn id(&self) -> Option<TweenId> {
        match self {
            TweenHandle::Inert => None,
            TweenHandle::Live(id) => Some(*id),
        }
    }

    pub fn is_inert(&self) -> bool {
        matches!(self, TweenHandle::Inert)
    }
}

/// Result of advancing a single job
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenStep {
    pub value: f32,
    pub done: bool,
}

/// How the scheduler gets its frames
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriveMode {
    /// The scheduler asks the host for frames while jobs are live
    #[default]
    Auto,
    /// An external render loop advances jobs itself
    Manual,
}

struct TweenJob<Ctx> {
    start: f32,
    end: f32,
    duration_ms: f32,
    easing: Easing,
    /// Latched on the first advance
    start_time: Option<f64>,
    done: bool,
    callback: TweenCallback<Ctx>,
}

impl<Ctx> TweenJob<Ctx> {
    fn reset(&mut self, tween: &Tween, easing: Easing) {
        self.start = tween.start;
        self.end = tween.end;
        self.duration_ms = tween.duration_ms;
        self.easing = easing;
        self.start_time = None;
        self.done = false;
    }
}

/// The scheduler that ticks all live tweens
pub struct TweenScheduler<Ctx> {
    jobs: SlotMap<TweenId, TweenJob<Ctx>>,
    live: FxHashSet<TweenId>,
    default_easing: Easing,
    drive_mode: DriveMode,
    frame_requested: bool,
    on_end: Option<EndHook>,
    on_render: Option<RenderHook>,
}

impl<Ctx> TweenScheduler<Ctx> {
    pub fn new() -> Self {
        Self {
            jobs: SlotMap::with_key(),
            live: FxHashSet::default(),
            default_easing: Easing::default(),
            drive_mode: DriveMode::default(),
            frame_requested: false,
            on_end: None,
            on_render: None,
        }
    }

    pub fn default_easing(&self) -> Easing {
        self.default_easing
    }

    pub fn set_default_easing(&mut self, easing: Easing) {
        self.default_easing = easing;
    }

    pub fn drive_mode(&self) -> DriveMode {
        self.drive_mode
    }

    pub fn set_drive_mode(&mut self, mode: DriveMode) {
        self.drive_mode = mode;
        if mode == DriveMode::Manual {
            self.frame_requested = false;
        }
    }

    /// Fired after a tick that leaves no live jobs
    pub fn set_on_end<F: FnMut() + Send + 'static>(&mut self, hook: F) {
        self.on_end = Some(Box::new(hook));
    }

    /// Fired after every tick with whether all jobs drained
    pub fn set_on_render<F: FnMut(bool) + Send + 'static>(&mut self, hook: F) {
        self.on_render = Some(Box::new(hook));
    }

    /// Consume a pending frame request (auto-driving mode only)
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    /// Start a tween, or re-arm `existing` with a new callback.
    ///
    /// Zero-length tweens (no duration, or equal bounds) resolve immediately by
    /// calling `on_update(end, true)` and return [`TweenHandle::Inert`].
    /// Non-finite bounds or durations are ignored entirely.
    pub fn start<F>(
        &mut self,
        tween: Tween,
        on_update: F,
        existing: TweenHandle,
        ctx: &mut Ctx,
    ) -> TweenHandle
    where
        F: FnMut(&mut Ctx, f32, bool) -> bool + Send + 'static,
    {
        if !tween.is_valid() {
            tracing::trace!(?tween, "ignoring malformed tween");
            return TweenHandle::Inert;
        }

        if tween.is_instant() {
            if let Some(id) = existing.id() {
                self.live.remove(&id);
            }
            let mut on_update = on_update;
            on_update(ctx, tween.end, true);
            return TweenHandle::Inert;
        }

        let easing = tween.easing.unwrap_or(self.default_easing);
        let id = match existing.id().filter(|id| self.jobs.contains_key(*id)) {
            Some(id) => {
                let job = &mut self.jobs[id];
                job.reset(&tween, easing);
                job.callback = Box::new(on_update);
                id
            }
            None => self.jobs.insert(TweenJob {
                start: tween.start,
                end: tween.end,
                duration_ms: tween.duration_ms,
                easing,
                start_time: None,
                done: false,
                callback: Box::new(on_update),
            }),
        };

        self.schedule(id);
        TweenHandle::Live(id)
    }

    /// Re-arm an existing job with new bounds, keeping its callback.
    ///
    /// Returns [`TweenHandle::Inert`] if `handle` does not name a job, or if the
    /// tween resolved immediately.
    pub fn rearm(&mut self, handle: TweenHandle, tween: Tween, ctx: &mut Ctx) -> TweenHandle {
        let Some(id) = handle.id() else {
            return TweenHandle::Inert;
        };
        if !tween.is_valid() {
            tracing::trace!(?tween, "ignoring malformed tween");
            return TweenHandle::Inert;
        }
        let easing = tween.easing.unwrap_or(self.default_easing);
        let Some(job) = self.jobs.get_mut(id) else {
            return TweenHandle::Inert;
        };

        if tween.is_instant() {
            self.live.remove(&id);
            (job.callback)(ctx, tween.end, true);
            return TweenHandle::Inert;
        }

        job.reset(&tween, easing);
        self.schedule(id);
        handle
    }

    fn schedule(&mut self, id: TweenId) {
        let was_idle = self.live.is_empty();
        self.live.insert(id);
        if was_idle && self.drive_mode == DriveMode::Auto {
            self.frame_requested = true;
        }
    }

    /// Advance a single live job. Returns `None` if the job is not live.
    pub fn update(&mut self, handle: TweenHandle, now: f64, ctx: &mut Ctx) -> Option<TweenStep> {
        let id = handle.id()?;
        if !self.live.contains(&id) {
            return None;
        }
        self.advance(id, now, ctx)
    }

    /// Advance every live job once. Returns `true` when no jobs remain.
    pub fn tick(&mut self, now: f64, ctx: &mut Ctx) -> bool {
        let ids: SmallVec<[TweenId; 32]> = self.live.iter().copied().collect();
        for id in ids {
            if self.live.contains(&id) {
                self.advance(id, now, ctx);
            }
        }

        let drained = self.live.is_empty();
        if drained {
            if let Some(on_end) = self.on_end.as_mut() {
                on_end();
            }
        } else if self.drive_mode == DriveMode::Auto {
            self.frame_requested = true;
        }
        if let Some(on_render) = self.on_render.as_mut() {
            on_render(drained);
        }
        drained
    }

    fn advance(&mut self, id: TweenId, now: f64, ctx: &mut Ctx) -> Option<TweenStep> {
        let job = self.jobs.get_mut(id)?;
        let start_time = *job.start_time.get_or_insert(now);
        let elapsed = (now - start_time) as f32;
        let done = elapsed >= job.duration_ms;
        job.done = done;

        let value = if done {
            job.end
        } else {
            job.start + job.easing.apply(elapsed / job.duration_ms) * (job.end - job.start)
        };

        if done {
            self.live.remove(&id);
        }
        let cancelled = (job.callback)(ctx, value, done);
        if cancelled && !done {
            self.live.remove(&id);
        }

        Some(TweenStep { value, done })
    }

    /// Stop a job without finishing it. The handle stays re-armable.
    pub fn abort(&mut self, handle: TweenHandle) -> bool {
        handle.id().is_some_and(|id| self.live.remove(&id))
    }

    /// Stop a job and free its slot; the handle becomes invalid
    pub fn release(&mut self, handle: TweenHandle) {
        if let Some(id) = handle.id() {
            self.live.remove(&id);
            self.jobs.remove(id);
        }
    }

    /// Drop every live job. Slots stay allocated for re-arming.
    pub fn clear(&mut self) {
        self.live.clear();
    }

    /// Check whether a handle names a live job
    pub fn contains(&self, handle: TweenHandle) -> bool {
        handle.id().is_some_and(|id| self.live.contains(&id))
    }

    /// Whether the job behind `handle` has run to completion
    pub fn is_done(&self, handle: TweenHandle) -> bool {
        handle
            .id()
            .and_then(|id| self.jobs.get(id))
            .is_some_and(|job| job.done)
    }

    /// Number of live jobs
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<Ctx> Default for TweenScheduler<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    type Calls = Vec<(f32, bool)>;

    fn record(calls: &mut Calls, value: f32, done: bool) -> bool {
        calls.push((value, done));
        false
    }

    fn linear(start: f32, end: f32, duration_ms: f32) -> Tween {
        Tween::new(start, end, duration_ms).with_easing(Easing::Linear)
    }

    #[test]
    fn test_equal_bounds_resolve_immediately() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();

        let handle = scheduler.start(linear(5.0, 5.0, 300.0), record, TweenHandle::Inert, &mut calls);

        assert!(handle.is_inert());
        assert_eq!(calls, vec![(5.0, true)]);
        assert!(scheduler.is_empty());
        assert!(!scheduler.take_frame_request());
    }

    #[test]
    fn test_zero_duration_resolves_immediately() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();

        let handle = scheduler.start(linear(0.0, 42.0, 0.0), record, TweenHandle::Inert, &mut calls);

        assert!(handle.is_inert());
        assert_eq!(calls, vec![(42.0, true)]);
        assert_eq!(scheduler.len(), 0);
    }

    #[test]
    fn test_malformed_input_is_inert() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();

        for tween in [
            linear(f32::NAN, 1.0, 10.0),
            linear(0.0, f32::INFINITY, 10.0),
            linear(0.0, 1.0, f32::NAN),
        ] {
            let handle = scheduler.start(tween, record, TweenHandle::Inert, &mut calls);
            assert!(handle.is_inert());
        }

        assert!(calls.is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_interpolates_and_finishes() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();

        let handle = scheduler.start(linear(0.0, 100.0, 200.0), record, TweenHandle::Inert, &mut calls);
        assert!(scheduler.contains(handle));

        // Start time latches on the first advance, not on start()
        scheduler.tick(1000.0, &mut calls);
        scheduler.tick(1050.0, &mut calls);
        scheduler.tick(1100.0, &mut calls);
        assert!(scheduler.contains(handle));
        scheduler.tick(1250.0, &mut calls);

        assert_eq!(
            calls,
            vec![(0.0, false), (25.0, false), (50.0, false), (100.0, true)]
        );
        assert!(!scheduler.contains(handle));
        assert!(scheduler.is_done(handle));
    }

    #[test]
    fn test_update_advances_single_job() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();

        let a = scheduler.start(linear(0.0, 10.0, 100.0), record, TweenHandle::Inert, &mut calls);
        let b = scheduler.start(linear(0.0, 20.0, 100.0), record, TweenHandle::Inert, &mut calls);

        scheduler.update(a, 0.0, &mut calls);
        let step = scheduler.update(a, 50.0, &mut calls);

        assert_eq!(step, Some(TweenStep { value: 5.0, done: false }));
        assert_eq!(calls.len(), 2);
        assert!(scheduler.contains(b));

        let step = scheduler.update(a, 100.0, &mut calls);
        assert_eq!(step, Some(TweenStep { value: 10.0, done: true }));
        assert_eq!(scheduler.update(a, 150.0, &mut calls), None);
    }

    #[test]
    fn test_reuse_keeps_one_job_per_handle() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();

        let handle = scheduler.start(linear(0.0, 10.0, 100.0), record, TweenHandle::Inert, &mut calls);
        assert_eq!(scheduler.len(), 1);

        for i in 0..5 {
            let reused = scheduler.start(linear(i as f32, 50.0, 100.0), record, handle, &mut calls);
            assert_eq!(reused, handle);
            assert_eq!(scheduler.len(), 1);
        }

        // Re-arming restarts the clock from the next advance
        scheduler.tick(500.0, &mut calls);
        assert_eq!(calls.last(), Some(&(4.0, false)));
    }

    #[test]
    fn test_reuse_after_completion_revives_job() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();

        let handle = scheduler.start(linear(0.0, 1.0, 10.0), record, TweenHandle::Inert, &mut calls);
        scheduler.tick(0.0, &mut calls);
        scheduler.tick(10.0, &mut calls);
        assert!(scheduler.is_empty());

        let again = scheduler.rearm(handle, linear(1.0, 2.0, 10.0), &mut calls);
        assert_eq!(again, handle);
        assert!(scheduler.contains(handle));
        assert!(!scheduler.is_done(handle));

        scheduler.tick(20.0, &mut calls);
        scheduler.tick(30.0, &mut calls);
        assert_eq!(calls.last(), Some(&(2.0, true)));
    }

    #[test]
    fn test_instant_reuse_removes_existing_job() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();

        let handle = scheduler.start(linear(0.0, 1.0, 10.0), record, TweenHandle::Inert, &mut calls);
        assert_eq!(scheduler.len(), 1);

        let instant = scheduler.rearm(handle, linear(3.0, 3.0, 10.0), &mut calls);
        assert!(instant.is_inert());
        assert_eq!(calls, vec![(3.0, true)]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_callback_can_cancel() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();

        let handle = scheduler.start(
            linear(0.0, 10.0, 100.0),
            |calls: &mut Calls, value, done| {
                calls.push((value, done));
                value >= 5.0
            },
            TweenHandle::Inert,
            &mut calls,
        );

        scheduler.tick(0.0, &mut calls);
        assert!(scheduler.contains(handle));
        scheduler.tick(60.0, &mut calls);
        assert!(!scheduler.contains(handle));
        assert!(!scheduler.is_done(handle));

        scheduler.tick(100.0, &mut calls);
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_abort_and_clear() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();

        let a = scheduler.start(linear(0.0, 1.0, 10.0), record, TweenHandle::Inert, &mut calls);
        let b = scheduler.start(linear(0.0, 1.0, 10.0), record, TweenHandle::Inert, &mut calls);
        let c = scheduler.start(linear(0.0, 1.0, 10.0), record, TweenHandle::Inert, &mut calls);

        assert!(scheduler.abort(a));
        assert!(!scheduler.abort(a));
        assert!(!scheduler.abort(TweenHandle::Inert));
        assert_eq!(scheduler.len(), 2);

        scheduler.clear();
        assert!(scheduler.is_empty());
        assert!(!scheduler.contains(b));

        scheduler.release(c);
        assert!(scheduler.rearm(c, linear(0.0, 1.0, 10.0), &mut calls).is_inert());
        assert!(calls.is_empty());
    }

    #[test]
    fn test_hooks_fire_after_tick() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();
        let ended = Arc::new(AtomicUsize::new(0));
        let renders = Arc::new(Mutex::new(Vec::new()));

        let ended_hook = ended.clone();
        scheduler.set_on_end(move || {
            ended_hook.fetch_add(1, Ordering::SeqCst);
        });
        let renders_hook = renders.clone();
        scheduler.set_on_render(move |drained| renders_hook.lock().unwrap().push(drained));

        scheduler.start(linear(0.0, 1.0, 10.0), record, TweenHandle::Inert, &mut calls);
        scheduler.tick(0.0, &mut calls);
        scheduler.tick(10.0, &mut calls);

        assert_eq!(ended.load(Ordering::SeqCst), 1);
        assert_eq!(*renders.lock().unwrap(), vec![false, true]);
    }

    #[test]
    fn test_auto_drive_requests_frames() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();
        assert_eq!(scheduler.drive_mode(), DriveMode::Auto);

        scheduler.start(linear(0.0, 1.0, 10.0), record, TweenHandle::Inert, &mut calls);
        assert!(scheduler.take_frame_request());
        assert!(!scheduler.take_frame_request());

        // A second job on a busy scheduler does not re-request
        scheduler.start(linear(0.0, 1.0, 20.0), record, TweenHandle::Inert, &mut calls);
        assert!(!scheduler.take_frame_request());

        scheduler.tick(0.0, &mut calls);
        assert!(scheduler.take_frame_request());
        scheduler.tick(20.0, &mut calls);
        assert!(!scheduler.take_frame_request());
    }

    #[test]
    fn test_manual_drive_never_requests_frames() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();
        scheduler.set_drive_mode(DriveMode::Manual);

        scheduler.start(linear(0.0, 1.0, 10.0), record, TweenHandle::Inert, &mut calls);
        scheduler.tick(0.0, &mut calls);
        assert!(!scheduler.take_frame_request());
    }

    #[test]
    fn test_default_easing_applies_to_unnamed_tweens() {
        let mut scheduler = TweenScheduler::new();
        let mut calls = Calls::new();
        assert_eq!(scheduler.default_easing(), Easing::EaseOutBounce);
        scheduler.set_default_easing(Easing::EaseInQuad);

        scheduler.start(
            Tween::new(0.0, 100.0, 100.0).with_easing_name("noSuchCurve"),
            record,
            TweenHandle::Inert,
            &mut calls,
        );
        scheduler.tick(0.0, &mut calls);
        scheduler.tick(50.0, &mut calls);

        assert_eq!(calls.last(), Some(&(25.0, false)));
    }
}
