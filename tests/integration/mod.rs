//! Integration test modules for Cadenza

pub mod automation;
pub mod effects;
pub mod events;
pub mod lifecycle;
pub mod properties;
