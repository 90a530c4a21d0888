//! Time-based interpolation driven by the frame scheduler.

use cadenza_core::{AtomicFlag, FrameScheduler};
use std::sync::Arc;

/// What a tick callback wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tick {
    #[default]
    Continue,
    /// Skip straight to completion.
    Stop,
}

/// Tick callbacks that return nothing keep running.
impl From<()> for Tick {
    fn from(_: ()) -> Self {
        Tick::Continue
    }
}

/// Passed to the completion callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completion {
    /// Elapsed time, capped at the duration when the duration is finite.
    pub elapsed_ms: f64,
    /// Frames observed, including the final one.
    pub frames: u32,
    /// True when the tick callback returned [`Tick::Stop`].
    pub stopped: bool,
}

/// Observes one running animation. There is no cancel: an animation ends
/// when its tick returns [`Tick::Stop`] or its duration elapses.
#[derive(Debug, Clone)]
pub struct AnimationHandle {
    finished: Arc<AtomicFlag>,
    duration_ms: f64,
}

impl AnimationHandle {
    pub fn is_finished(&self) -> bool {
        self.finished.get()
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }
}

/// Starts animations on a frame scheduler.
#[derive(Clone)]
pub struct Animator {
    frames: Arc<dyn FrameScheduler>,
}

impl Animator {
    pub fn new(frames: Arc<dyn FrameScheduler>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &Arc<dyn FrameScheduler> {
        &self.frames
    }

    /// Call `tick(elapsed_ms, frame)` once per frame until `duration_ms` has
    /// elapsed or `tick` returns [`Tick::Stop`], then call `on_done` once.
    ///
    /// The first frame has index 1. `tick` is not called on the frame where
    /// the duration has already elapsed. Pass `f64::INFINITY` to run until
    /// stopped.
    pub fn animate<T, R, D>(&self, duration_ms: f64, tick: T, on_done: D) -> AnimationHandle
    where
        T: FnMut(f64, u32) -> R + Send + 'static,
        R: Into<Tick>,
        D: FnOnce(Completion) + Send + 'static,
    {
        let finished = Arc::new(AtomicFlag::new(false));
        let running = Running {
            frames: self.frames.clone(),
            start: self.frames.now_ms(),
            frame: 0,
            duration_ms,
            tick,
            on_done: Some(on_done),
            finished: finished.clone(),
        };
        running.schedule();

        AnimationHandle {
            finished,
            duration_ms,
        }
    }
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("now_ms", &self.frames.now_ms())
            .finish()
    }
}

struct Running<T, D> {
    frames: Arc<dyn FrameScheduler>,
    start: f64,
    frame: u32,
    duration_ms: f64,
    tick: T,
    on_done: Option<D>,
    finished: Arc<AtomicFlag>,
}

impl<T, R, D> Running<T, D>
where
    T: FnMut(f64, u32) -> R + Send + 'static,
    R: Into<Tick>,
    D: FnOnce(Completion) + Send + 'static,
{
    fn schedule(self) {
        let frames = self.frames.clone();
        frames.request_frame(Box::new(move |now| self.step(now)));
    }

    fn step(mut self, now: f64) {
        self.frame += 1;
        let elapsed = (now - self.start).max(0.0);

        let mut stopped = false;
        if elapsed < self.duration_ms {
            match (self.tick)(elapsed, self.frame).into() {
                Tick::Continue => return self.schedule(),
                Tick::Stop => stopped = true,
            }
        }

        let elapsed_ms = if elapsed < self.duration_ms || !self.duration_ms.is_finite() {
            elapsed
        } else {
            self.duration_ms
        };

        self.finished.set(true);
        if let Some(on_done) = self.on_done.take() {
            on_done(Completion {
                elapsed_ms,
                frames: self.frame,
                stopped,
            });
        }
    }
}
