//! Core runtime for Cadenza tracks.
//!
//! # Primary API
//!
//! - [`EventBus`]: typed per-instance pub/sub with a readiness fence
//! - [`ParameterStore`]: free-form keyed metadata
//! - [`AudioGraph`]: control-side frontend over an [`AudioBackend`]
//! - [`FrameScheduler`]: per-frame callback source ([`ManualFrameScheduler`], [`ThreadFrameScheduler`])
//! - [`ImpulseFetcher`]: binary fetch collaborator ([`FileFetcher`], [`MemoryFetcher`])
//! - [`MediaLoader`] / [`MediaElement`]: media playback collaborator
//!
//! Everything in this crate is platform glue: no sample-level DSP happens here.
//! Node parameters are lock-free [`AtomicFloat`]s shared between the control
//! side and whatever engine renders the graph.

pub mod error;
pub use error::{Error, Result};

mod config;
pub use config::{PanningModel, TrackConfig, MAX_VOLUME};

mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat};

pub mod params;
pub use params::{ParamValue, ParameterStore};

pub mod events;
pub use events::{listener, Event, EventBus, Listener};

pub mod graph;
pub use graph::{
    AnalyserNode, AudioBackend, AudioBuffer, AudioGraph, AudioParam, CompressorNode,
    ConvolverNode, GainNode, MediaSourceNode, NodeHandle, NodeId, NodeKind, OfflineBackend,
    PannerNode, ProcessCallback, ProcessorNode,
};

pub mod platform;
pub use platform::{
    FetchCallback, ImpulseFetcher, MediaElement, MediaLoader, OfflineMedia, OfflineMediaLoader,
    ReadySignal,
};

mod frame;
pub use frame::{FrameCallback, FrameScheduler, ManualFrameScheduler, ThreadFrameScheduler};

mod fetch;
pub use fetch::{FileFetcher, MemoryFetcher};
