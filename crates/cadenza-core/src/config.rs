//! Track configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Upper bound for track volume. Anything louder distorts badly.
pub const MAX_VOLUME: f32 = 1.5;

/// Spatialization algorithm used by the panner node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanningModel {
    #[default]
    EqualPower,
    Hrtf,
}

/// Configuration for a track's processing graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// FFT size of the metering analyser. Bin count is half of this.
    pub analyser_fft_size: usize,
    /// Analyser smoothing time constant (0-1).
    pub analyser_smoothing: f32,
    /// Block size of the metering processor, in sample frames.
    pub processor_buffer_size: usize,
    pub panning_model: PanningModel,
    /// Initial panner position (x, y, z).
    pub pan_position: [f32; 3],
    /// Volume the track starts at (0-1.5).
    pub initial_volume: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            analyser_fft_size: 128,
            analyser_smoothing: 0.5,
            processor_buffer_size: 2048,
            panning_model: PanningModel::EqualPower,
            pan_position: [0.0, 0.0, 0.1],
            initial_volume: 1.0,
        }
    }
}

impl TrackConfig {
    pub fn validate(&self) -> Result<()> {
        let fft = self.analyser_fft_size;
        if !fft.is_power_of_two() || !(32..=32768).contains(&fft) {
            return Err(Error::InvalidConfig(format!(
                "analyser_fft_size {} must be a power of two in 32-32768",
                fft
            )));
        }
        if !(0.0..=1.0).contains(&self.analyser_smoothing) {
            return Err(Error::InvalidConfig(format!(
                "analyser_smoothing {} out of range (0-1)",
                self.analyser_smoothing
            )));
        }
        let block = self.processor_buffer_size;
        if !block.is_power_of_two() || !(256..=16384).contains(&block) {
            return Err(Error::InvalidConfig(format!(
                "processor_buffer_size {} must be a power of two in 256-16384",
                block
            )));
        }
        if self.pan_position.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "pan_position {:?} must be finite",
                self.pan_position
            )));
        }
        if !(0.0..=MAX_VOLUME).contains(&self.initial_volume) {
            return Err(Error::InvalidConfig(format!(
                "initial_volume {} out of range (0-{})",
                self.initial_volume, MAX_VOLUME
            )));
        }
        Ok(())
    }
}
