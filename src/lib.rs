//! # Cadenza - a single audio track with an effects graph
//!
//! A [`Track`] plays one media source through a fixed chain of nodes:
//! dynamics compressor, stereo panner, a tremolo gain stage and a volume
//! stage, with a metering tap and any number of named convolution sends.
//! Cadenza does no sample processing itself. It builds and wires the graph,
//! drives node parameters from frame callbacks (fades, tremolo) and reports
//! levels, all on top of collaborators supplied by the host in a
//! [`Platform`].
//!
//! ## Architecture
//!
//! Cadenza is an umbrella crate that coordinates:
//! - **cadenza-core** - event bus, parameter store, graph nodes, platform traits
//! - **cadenza-automation** - frame-driven animations, fades, tremolo
//! - **cadenza-dsp** - compressor presets, convolution sends, level meter
//!
//! ## Quick Start
//!
//! ```
//! use cadenza::prelude::*;
//!
//! let offline = OfflinePlatform::default();
//! let track = Track::new("song.ogg", &offline.platform()).unwrap();
//!
//! track.on(
//!     EventKind::Play,
//!     listener(|track: &Track, _: &TrackEvent| println!("{} started", track.url())),
//! );
//! track.compressor_preset(CompressorPreset::Mild).play();
//!
//! // The host reports that the media can play through.
//! offline.media.signal_ready("song.ogg");
//! assert!(track.is_playing());
//!
//! // Fade out over one second of frames.
//! track.fade_out(1000.0, |track| {
//!     track.pause();
//! });
//! offline.frames.run_until_idle(16.0, 100);
//! assert_eq!(track.volume(), 0.0);
//! assert!(!track.is_playing());
//! ```
//!
//! ## Feature Flags
//!
//! - `wav` (default) - decode WAV impulse responses in the offline backend

/// Re-export of cadenza-core for direct access
pub use cadenza_core as core;

pub use cadenza_core::{
    listener, AudioBackend, AudioBuffer, AudioGraph, FileFetcher, FrameScheduler, ImpulseFetcher,
    ManualFrameScheduler, MediaElement, MediaLoader, MemoryFetcher, NodeId, NodeKind,
    OfflineBackend, OfflineMedia, OfflineMediaLoader, PanningModel, ParamValue, ParameterStore,
    ThreadFrameScheduler, TrackConfig, MAX_VOLUME,
};

pub use cadenza_automation as automation;
pub use cadenza_automation::{
    AnimationHandle, Animator, Completion, Tick, TremoloPhase, TremoloSettings,
    DEFAULT_TREMOLO_INTENSITY,
};

pub use cadenza_dsp as dsp;
pub use cadenza_dsp::{CompressorParam, CompressorPreset, CompressorSettings, ConvolverEffect};

mod error;
pub use error::{Error, Result};

mod events;
pub use events::{EventKind, TrackEvent, TrackListener};

mod load;
pub use load::EffectLoad;

mod platform;
pub use platform::{OfflinePlatform, Platform};

mod builder;
pub use builder::TrackBuilder;

mod track;
pub use track::{Track, TrackId, TrackNodes};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Track, TrackBuilder, TrackEvent, EventKind, TrackListener};

    // Collaborators
    pub use crate::{OfflinePlatform, Platform};

    // Effects and automation
    pub use crate::{CompressorParam, CompressorPreset, CompressorSettings, TremoloSettings};

    pub use crate::listener;
}
