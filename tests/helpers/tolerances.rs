//! Tolerance constants for track tests.

/// Floating point rounding errors (exact gain writes, clamping).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Interpolated values read back mid-ramp (fades, tremolo).
pub const RAMP_EPSILON: f32 = 1e-4;

/// Meter averages computed from byte bins.
pub const METER_EPSILON: f32 = 1e-3;
