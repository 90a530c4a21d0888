//! Tremolo: an endless Down/Up gain oscillation.
//!
//! Each half-cycle is one animation of `speed / 2`. Down ramps the gain
//! from 1 to `1 - intensity`, Up ramps it back, and each phase starts the
//! next when it completes.
//!
//! Stopping never tears a ramp down mid-way. It bumps the generation so the
//! running phase goes stale at its next tick, then plays a single Release
//! ramp from wherever the gain is back to 1. New settings given while a
//! release is in progress start once it finishes.

use crate::{Animator, Tick};
use cadenza_core::GainNode;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

pub const DEFAULT_TREMOLO_INTENSITY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TremoloSettings {
    /// Full cycle length in milliseconds.
    pub speed_ms: f64,
    /// Depth of the dip, 0 to 1.
    pub intensity: f32,
}

impl TremoloSettings {
    pub fn new(speed_ms: f64) -> Self {
        Self {
            speed_ms,
            intensity: DEFAULT_TREMOLO_INTENSITY,
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity.clamp(0.0, 1.0);
        self
    }

    fn half_cycle_ms(&self) -> f64 {
        self.speed_ms / 2.0
    }

    /// Gain at the bottom of the dip, always within 0..=1.
    fn trough(&self) -> f32 {
        let depth = if self.intensity.is_nan() {
            0.0
        } else {
            self.intensity.clamp(0.0, 1.0)
        };
        1.0 - depth
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TremoloPhase {
    Down,
    Up,
    /// Decaying back to unity gain after a stop.
    Release,
}

#[derive(Debug)]
struct Active {
    settings: TremoloSettings,
    phase: TremoloPhase,
    /// Settings to start once the release completes.
    pending: Option<TremoloSettings>,
}

#[derive(Debug, Default)]
struct TremoloState {
    generation: u64,
    active: Option<Active>,
}

struct TremoloInner {
    gain: Arc<GainNode>,
    animator: Animator,
    state: Mutex<TremoloState>,
}

/// Drives one gain node. At most one oscillation runs per instance.
#[derive(Clone)]
pub struct Tremolo {
    inner: Arc<TremoloInner>,
}

impl Tremolo {
    pub fn new(gain: Arc<GainNode>, animator: Animator) -> Self {
        Self {
            inner: Arc::new(TremoloInner {
                gain,
                animator,
                state: Mutex::new(TremoloState::default()),
            }),
        }
    }

    /// Start (`Some`) or stop (`None`) the tremolo. Any running tremolo is
    /// released first. A non-positive speed counts as stop.
    pub fn set(&self, settings: Option<TremoloSettings>) {
        let settings = settings.filter(|s| s.speed_ms > 0.0);

        let next = {
            let mut state = self.inner.state.lock();
            let phase = state.active.as_ref().map(|a| a.phase);
            match phase {
                Some(TremoloPhase::Release) => {
                    if let Some(active) = state.active.as_mut() {
                        active.pending = settings;
                    }
                    None
                }
                Some(_) => {
                    state.generation += 1;
                    let generation = state.generation;
                    state.active.as_mut().map(|active| {
                        active.phase = TremoloPhase::Release;
                        active.pending = settings;
                        (generation, TremoloPhase::Release, active.settings)
                    })
                }
                None => settings.map(|settings| {
                    state.generation += 1;
                    state.active = Some(Active {
                        settings,
                        phase: TremoloPhase::Down,
                        pending: None,
                    });
                    (state.generation, TremoloPhase::Down, settings)
                }),
            }
        };

        if let Some((generation, phase, settings)) = next {
            tracing::debug!(?phase, ?settings, "Tremolo transition");
            self.run_phase(generation, phase, settings);
        }
    }

    pub fn start(&self, settings: TremoloSettings) {
        self.set(Some(settings));
    }

    pub fn stop(&self) {
        self.set(None);
    }

    pub fn phase(&self) -> Option<TremoloPhase> {
        self.inner.state.lock().active.as_ref().map(|a| a.phase)
    }

    /// Settings of the oscillation currently running or releasing.
    pub fn settings(&self) -> Option<TremoloSettings> {
        self.inner.state.lock().active.as_ref().map(|a| a.settings)
    }

    pub fn is_active(&self) -> bool {
        self.inner.state.lock().active.is_some()
    }

    fn run_phase(&self, generation: u64, phase: TremoloPhase, settings: TremoloSettings) {
        let half = settings.half_cycle_ms();
        let trough = settings.trough();
        let (from, to) = match phase {
            TremoloPhase::Down => (1.0, trough),
            TremoloPhase::Up => (trough, 1.0),
            TremoloPhase::Release => (self.inner.gain.gain.value(), 1.0),
        };

        let ticking: Weak<TremoloInner> = Arc::downgrade(&self.inner);
        let finishing = ticking.clone();
        self.inner.animator.animate(
            half,
            move |elapsed, _| {
                let Some(inner) = ticking.upgrade() else {
                    return Tick::Stop;
                };
                if inner.state.lock().generation != generation {
                    return Tick::Stop;
                }
                let progress = (elapsed / half) as f32;
                inner.gain.gain.set_value(from + (to - from) * progress);
                Tick::Continue
            },
            move |_| {
                if let Some(inner) = finishing.upgrade() {
                    Tremolo { inner }.phase_complete(generation, phase);
                }
            },
        );
    }

    fn phase_complete(&self, generation: u64, phase: TremoloPhase) {
        let next = {
            let mut state = self.inner.state.lock();
            if state.generation != generation {
                return;
            }
            let Some(active) = state.active.as_mut() else {
                return;
            };
            let settings = active.settings;
            match phase {
                TremoloPhase::Down => {
                    self.inner.gain.gain.set_value(settings.trough());
                    active.phase = TremoloPhase::Up;
                    Some((generation, TremoloPhase::Up, settings))
                }
                TremoloPhase::Up => {
                    self.inner.gain.gain.set_value(1.0);
                    active.phase = TremoloPhase::Down;
                    Some((generation, TremoloPhase::Down, settings))
                }
                TremoloPhase::Release => {
                    self.inner.gain.gain.set_value(1.0);
                    let pending = active.pending.take();
                    state.generation += 1;
                    state.active = pending.map(|settings| Active {
                        settings,
                        phase: TremoloPhase::Down,
                        pending: None,
                    });
                    pending.map(|settings| (state.generation, TremoloPhase::Down, settings))
                }
            }
        };

        match next {
            Some((generation, phase, settings)) => self.run_phase(generation, phase, settings),
            None => tracing::debug!("Tremolo released"),
        }
    }
}

impl std::fmt::Debug for Tremolo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tremolo")
            .field("state", &*self.inner.state.lock())
            .field("gain", &self.inner.gain.gain.value())
            .finish()
    }
}
