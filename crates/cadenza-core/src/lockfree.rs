//! Atomics shared between control code and whatever engine renders the graph.
//!
//! Node parameters, track volume and the one-way lifecycle flags all live in
//! these, so the control side never blocks the render side.

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicBool, Ordering};

/// An `f32` readable and writable from any thread.
#[derive(Debug)]
pub struct AtomicFloat(AtomicF32);

impl AtomicFloat {
    pub fn new(value: f32) -> Self {
        Self(AtomicF32::new(value))
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.0.store(value, Ordering::Release);
    }

    /// Store `value` limited to `min..=max` and return what was stored.
    #[inline]
    pub fn set_clamped(&self, value: f32, min: f32, max: f32) -> f32 {
        let value = value.clamp(min, max);
        self.set(value);
        value
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// A boolean flag. Lifecycle flags only ever go from clear to raised, and
/// [`AtomicFlag::raise`] tells the one caller that did it.
#[derive(Debug, Default)]
pub struct AtomicFlag(AtomicBool);

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self(AtomicBool::new(value))
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::Release);
    }

    /// Raise the flag. True only for the call that found it clear.
    #[inline]
    pub fn raise(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
