//! Builder for configuring and constructing a `Track`.

use crate::{Platform, Result, Track};
use cadenza_core::{PanningModel, TrackConfig};

/// Every setting defaults to [`TrackConfig::default`]; the configuration is
/// validated by [`TrackBuilder::build`].
///
/// # Example
///
/// ```
/// use cadenza::{OfflinePlatform, PanningModel, Track};
///
/// let offline = OfflinePlatform::default();
/// let track = Track::builder("intro.ogg")
///     .initial_volume(0.8)
///     .panning_model(PanningModel::Hrtf)
///     .pan_position([0.5, 0.0, 0.1])
///     .build(&offline.platform())
///     .unwrap();
///
/// assert_eq!(track.volume(), 0.8);
/// assert_eq!(track.pan_position(), [0.5, 0.0, 0.1]);
/// ```
#[derive(Debug, Clone)]
pub struct TrackBuilder {
    url: String,
    config: TrackConfig,
}

impl TrackBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            config: TrackConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: TrackConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: 128 (64 bins)
    pub fn analyser_fft_size(mut self, size: usize) -> Self {
        self.config.analyser_fft_size = size;
        self
    }

    /// Default: 0.5
    pub fn analyser_smoothing(mut self, smoothing: f32) -> Self {
        self.config.analyser_smoothing = smoothing;
        self
    }

    /// Default: 2048
    pub fn processor_buffer_size(mut self, frames: usize) -> Self {
        self.config.processor_buffer_size = frames;
        self
    }

    pub fn panning_model(mut self, model: PanningModel) -> Self {
        self.config.panning_model = model;
        self
    }

    /// Default: (0, 0, 0.1)
    pub fn pan_position(mut self, position: [f32; 3]) -> Self {
        self.config.pan_position = position;
        self
    }

    /// Default: 1.0
    pub fn initial_volume(mut self, volume: f32) -> Self {
        self.config.initial_volume = volume;
        self
    }

    pub fn build(self, platform: &Platform) -> Result<Track> {
        self.config.validate()?;
        Ok(Track::from_parts(self.url, self.config, platform))
    }
}
