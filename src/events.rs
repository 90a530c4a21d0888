//! Track events.

use crate::Track;
use cadenza_core::{Event, Listener};
use std::fmt;
use std::str::FromStr;

/// Everything a [`Track`] announces.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEvent {
    /// The media can play through and the graph is wired. Fires once.
    Ready,
    Play,
    Pause,
    /// New playback offset, in seconds.
    Seek(f64),
    /// New volume, after clamping.
    Volume(f32),
    /// Compressor gain reduction in dB, once per processed block.
    Compression(f32),
    /// Rough output level, once per processed block.
    AverageVolume(f32),
    /// A convolution effect finished loading.
    FxLoaded(String),
    /// A convolution effect could not be fetched or decoded.
    FxFailed { name: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    Play,
    Pause,
    Seek,
    Volume,
    Compression,
    AverageVolume,
    FxLoaded,
    FxFailed,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Seek => "seek",
            Self::Volume => "volume",
            Self::Compression => "compression",
            Self::AverageVolume => "averagevolume",
            Self::FxLoaded => "fxloaded",
            Self::FxFailed => "fxfailed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = cadenza_core::Error;

    fn from_str(s: &str) -> cadenza_core::Result<Self> {
        match s {
            "ready" => Ok(Self::Ready),
            "play" => Ok(Self::Play),
            "pause" => Ok(Self::Pause),
            "seek" => Ok(Self::Seek),
            "volume" => Ok(Self::Volume),
            "compression" => Ok(Self::Compression),
            "averagevolume" => Ok(Self::AverageVolume),
            "fxloaded" => Ok(Self::FxLoaded),
            "fxfailed" => Ok(Self::FxFailed),
            _ => Err(cadenza_core::Error::InvalidConfig(format!(
                "unknown event '{}'",
                s
            ))),
        }
    }
}

impl Event for TrackEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            Self::Ready => EventKind::Ready,
            Self::Play => EventKind::Play,
            Self::Pause => EventKind::Pause,
            Self::Seek(_) => EventKind::Seek,
            Self::Volume(_) => EventKind::Volume,
            Self::Compression(_) => EventKind::Compression,
            Self::AverageVolume(_) => EventKind::AverageVolume,
            Self::FxLoaded(_) => EventKind::FxLoaded,
            Self::FxFailed { .. } => EventKind::FxFailed,
        }
    }
}

/// Listener registered on a track.
pub type TrackListener = Listener<Track, TrackEvent>;
