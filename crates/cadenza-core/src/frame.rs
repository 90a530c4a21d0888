//! Per-frame callback sources for the animation driver.

use crate::{Error, Result};
use crossbeam_channel::{select, Receiver, Sender};
use parking_lot::Mutex;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Receives the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64) + Send>;

/// Runs a callback on the next display frame.
///
/// Frame spacing is up to the implementation and may be irregular. The only
/// guarantee is that each requested callback eventually runs once, with a
/// timestamp from the same clock as [`FrameScheduler::now_ms`].
pub trait FrameScheduler: Send + Sync {
    fn now_ms(&self) -> f64;

    fn request_frame(&self, callback: FrameCallback);
}

/// Deterministic scheduler: time only moves when the host advances it.
///
/// # Example
/// ```
/// use cadenza_core::{FrameScheduler, ManualFrameScheduler};
///
/// let frames = ManualFrameScheduler::new();
/// frames.request_frame(Box::new(|now| assert_eq!(now, 16.0)));
/// assert_eq!(frames.advance(16.0), 1);
/// ```
#[derive(Default)]
pub struct ManualFrameScheduler {
    state: Mutex<ManualState>,
}

#[derive(Default)]
struct ManualState {
    now: f64,
    queue: Vec<FrameCallback>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `ms` and run one frame. Callbacks requested
    /// while the frame runs wait for the next one. Returns how many ran.
    pub fn advance(&self, ms: f64) -> usize {
        let (now, due) = {
            let mut state = self.state.lock();
            state.now += ms;
            (state.now, std::mem::take(&mut state.queue))
        };
        let ran = due.len();
        for callback in due {
            callback(now);
        }
        ran
    }

    /// Run frames `step_ms` apart until nothing is queued or `max_frames`
    /// frames have run. Returns the number of frames.
    pub fn run_until_idle(&self, step_ms: f64, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.pending() > 0 {
            self.advance(step_ms);
            frames += 1;
        }
        frames
    }

    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn now_ms(&self) -> f64 {
        self.state.lock().now
    }

    fn request_frame(&self, callback: FrameCallback) {
        self.state.lock().queue.push(callback);
    }
}

impl std::fmt::Debug for ManualFrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualFrameScheduler")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .finish()
    }
}

/// Worker thread that ticks at a fixed rate and runs every callback queued
/// since the previous tick.
pub struct ThreadFrameScheduler {
    epoch: Instant,
    requests: Sender<FrameCallback>,
    shutdown: Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadFrameScheduler {
    pub fn new(frames_per_second: f64) -> Result<Self> {
        if !(frames_per_second.is_finite() && frames_per_second > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "frames_per_second {} must be positive",
                frames_per_second
            )));
        }
        let interval = Duration::from_secs_f64(1.0 / frames_per_second);
        let epoch = Instant::now();
        let (requests, request_rx) = crossbeam_channel::unbounded::<FrameCallback>();
        let (shutdown, shutdown_rx) = crossbeam_channel::bounded::<()>(1);

        let worker = std::thread::Builder::new()
            .name("cadenza-frames".into())
            .spawn(move || run_frames(epoch, interval, request_rx, shutdown_rx))
            .map_err(|e| Error::Spawn(e.to_string()))?;

        tracing::debug!("Frame scheduler started at {:.1} fps", frames_per_second);

        Ok(Self {
            epoch,
            requests,
            shutdown,
            worker: Some(worker),
        })
    }
}

fn run_frames(
    epoch: Instant,
    interval: Duration,
    requests: Receiver<FrameCallback>,
    shutdown: Receiver<()>,
) {
    let ticker = crossbeam_channel::tick(interval);
    loop {
        select! {
            recv(shutdown) -> _ => break,
            recv(ticker) -> _ => {
                let due: Vec<FrameCallback> = requests.try_iter().collect();
                if due.is_empty() {
                    continue;
                }
                let now = epoch.elapsed().as_secs_f64() * 1000.0;
                for callback in due {
                    callback(now);
                }
            }
        }
    }
}

impl FrameScheduler for ThreadFrameScheduler {
    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    fn request_frame(&self, callback: FrameCallback) {
        if self.requests.send(callback).is_err() {
            tracing::warn!("Frame requested after the scheduler shut down");
        }
    }
}

impl Drop for ThreadFrameScheduler {
    fn drop(&mut self) {
        let _ = self.shutdown.try_send(());
        if let Some(worker) = self.worker.take() {
            // Dropped from one of our own callbacks: the loop exits on its own.
            if worker.thread().id() != std::thread::current().id() {
                let _ = worker.join();
            }
        }
    }
}
