//! Linear fade curve.

/// A straight ramp from `start` to `end` over `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeCurve {
    pub start: f32,
    pub end: f32,
    pub duration_ms: f64,
}

impl FadeCurve {
    pub fn new(start: f32, end: f32, duration_ms: f64) -> Self {
        Self {
            start,
            end,
            duration_ms,
        }
    }

    /// Progress through the fade, 0 to 1.
    pub fn progress(&self, elapsed_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (elapsed_ms / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn value_at(&self, elapsed_ms: f64) -> f32 {
        self.start + (self.end - self.start) * self.progress(elapsed_ms)
    }
}
