//! Typed graph nodes and their automatable parameters.
//!
//! Each node is shared between the control side (tracks, automation) and the
//! engine that renders the graph. Parameters are [`AudioParam`]s backed by
//! [`AtomicFloat`], so either side reads and writes without locking.

use crate::config::PanningModel;
use crate::platform::MediaElement;
use crate::AtomicFloat;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Stable identity of a node within one [`AudioGraph`](super::AudioGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Role a node plays in a track's graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    MediaSource,
    Compressor,
    Panner,
    Gain,
    Analyser,
    Processor,
    Convolver,
    Destination,
}

/// A single automatable node parameter with a fixed valid range.
///
/// Writes outside the range are clamped, matching how audio engines treat
/// their nominal parameter ranges.
#[derive(Debug, Clone)]
pub struct AudioParam {
    value: Arc<AtomicFloat>,
    default: f32,
    min: f32,
    max: f32,
}

impl AudioParam {
    pub fn new(default: f32, min: f32, max: f32) -> Self {
        debug_assert!(max >= min, "max must not be below min");
        let default = default.clamp(min, max);
        Self {
            value: Arc::new(AtomicFloat::new(default)),
            default,
            min,
            max,
        }
    }

    /// A parameter with no range restriction (gain).
    pub fn unbounded(default: f32) -> Self {
        Self::new(default, f32::MIN, f32::MAX)
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value.get()
    }

    #[inline]
    pub fn set_value(&self, value: f32) {
        self.value.set_clamped(value, self.min, self.max);
    }

    pub fn default_value(&self) -> f32 {
        self.default
    }

    pub fn range(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    /// Shared atomic, for engines that read the value per block.
    pub fn shared(&self) -> Arc<AtomicFloat> {
        Arc::clone(&self.value)
    }
}

/// Source node bound to a media element's sample output.
pub struct MediaSourceNode {
    id: NodeId,
    media: Arc<dyn MediaElement>,
}

impl MediaSourceNode {
    pub(crate) fn new(id: NodeId, media: Arc<dyn MediaElement>) -> Self {
        Self { id, media }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn media(&self) -> &Arc<dyn MediaElement> {
        &self.media
    }
}

impl fmt::Debug for MediaSourceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSourceNode")
            .field("id", &self.id)
            .field("source", &self.media.source())
            .finish()
    }
}

/// Dynamics compressor. `reduction` is written by the engine and is
/// read-only from the control side.
#[derive(Debug)]
pub struct CompressorNode {
    id: NodeId,
    /// dB, -100 to 0
    pub threshold: AudioParam,
    /// dB, 0 to 40
    pub knee: AudioParam,
    /// 1 to 22
    pub ratio: AudioParam,
    /// seconds, 0 to 1
    pub attack: AudioParam,
    /// seconds, 0 to 1
    pub release: AudioParam,
    reduction: AtomicFloat,
}

impl CompressorNode {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            threshold: AudioParam::new(-24.0, -100.0, 0.0),
            knee: AudioParam::new(30.0, 0.0, 40.0),
            ratio: AudioParam::new(12.0, 1.0, 22.0),
            attack: AudioParam::new(0.003, 0.0, 1.0),
            release: AudioParam::new(0.025, 0.0, 1.0),
            reduction: AtomicFloat::new(0.0),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Current gain reduction in dB.
    pub fn reduction(&self) -> f32 {
        self.reduction.get()
    }

    /// Engine side: publish the gain reduction of the last rendered block.
    pub fn report_reduction(&self, db: f32) {
        self.reduction.set(db);
    }
}

#[derive(Debug)]
pub struct PannerNode {
    id: NodeId,
    model: PanningModel,
    pub position_x: AudioParam,
    pub position_y: AudioParam,
    pub position_z: AudioParam,
}

impl PannerNode {
    pub(crate) fn new(id: NodeId, model: PanningModel, [x, y, z]: [f32; 3]) -> Self {
        Self {
            id,
            model,
            position_x: AudioParam::unbounded(x),
            position_y: AudioParam::unbounded(y),
            position_z: AudioParam::unbounded(z),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn model(&self) -> PanningModel {
        self.model
    }

    pub fn position(&self) -> [f32; 3] {
        [
            self.position_x.value(),
            self.position_y.value(),
            self.position_z.value(),
        ]
    }

    pub fn set_position(&self, x: f32, y: f32, z: f32) {
        self.position_x.set_value(x);
        self.position_y.set_value(y);
        self.position_z.set_value(z);
    }
}

#[derive(Debug)]
pub struct GainNode {
    id: NodeId,
    pub gain: AudioParam,
}

impl GainNode {
    pub(crate) fn new(id: NodeId, initial: f32) -> Self {
        Self {
            id,
            gain: AudioParam::unbounded(initial),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

/// Frequency analyser. The engine publishes byte-scaled magnitude bins after
/// each analysis window; the control side copies them out.
#[derive(Debug)]
pub struct AnalyserNode {
    id: NodeId,
    fft_size: usize,
    pub smoothing: AudioParam,
    bins: Mutex<Vec<u8>>,
}

impl AnalyserNode {
    pub(crate) fn new(id: NodeId, fft_size: usize, smoothing: f32) -> Self {
        Self {
            id,
            fft_size,
            smoothing: AudioParam::new(smoothing, 0.0, 1.0),
            bins: Mutex::new(vec![0; fft_size / 2]),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Copy the latest bins into `out`. Copies `min(out.len(), bin count)`.
    pub fn byte_frequency_data(&self, out: &mut [u8]) {
        let bins = self.bins.lock();
        let n = out.len().min(bins.len());
        out[..n].copy_from_slice(&bins[..n]);
    }

    /// Engine side: publish new bins. Extra values are ignored, missing ones
    /// are zeroed.
    pub fn write_byte_frequency_data(&self, data: &[u8]) {
        let mut bins = self.bins.lock();
        let n = data.len().min(bins.len());
        bins[..n].copy_from_slice(&data[..n]);
        bins[n..].fill(0);
    }
}

/// Fixed-block processor whose callback drives metering.
#[derive(Debug)]
pub struct ProcessorNode {
    id: NodeId,
    buffer_size: usize,
}

impl ProcessorNode {
    pub(crate) fn new(id: NodeId, buffer_size: usize) -> Self {
        Self { id, buffer_size }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

/// Decoded, de-interleaved audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: f32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(sample_rate: f32, channels: Vec<Vec<f32>>) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn number_of_channels(&self) -> usize {
        self.channels.len()
    }

    /// Length in sample frames.
    pub fn length(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate > 0.0 {
            self.length() as f32 / self.sample_rate
        } else {
            0.0
        }
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }
}

/// Convolution node. Silent until an impulse response buffer is set.
#[derive(Debug)]
pub struct ConvolverNode {
    id: NodeId,
    buffer: Mutex<Option<Arc<AudioBuffer>>>,
}

impl ConvolverNode {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            buffer: Mutex::new(None),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn buffer(&self) -> Option<Arc<AudioBuffer>> {
        self.buffer.lock().clone()
    }

    pub fn set_buffer(&self, buffer: Arc<AudioBuffer>) {
        *self.buffer.lock() = Some(buffer);
    }
}

/// Type-erased node handed to the backend on creation.
#[derive(Debug, Clone)]
pub enum NodeHandle {
    MediaSource(Arc<MediaSourceNode>),
    Compressor(Arc<CompressorNode>),
    Panner(Arc<PannerNode>),
    Gain(Arc<GainNode>),
    Analyser(Arc<AnalyserNode>),
    Processor(Arc<ProcessorNode>),
    Convolver(Arc<ConvolverNode>),
}

impl NodeHandle {
    pub fn id(&self) -> NodeId {
        match self {
            Self::MediaSource(n) => n.id(),
            Self::Compressor(n) => n.id(),
            Self::Panner(n) => n.id(),
            Self::Gain(n) => n.id(),
            Self::Analyser(n) => n.id(),
            Self::Processor(n) => n.id(),
            Self::Convolver(n) => n.id(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::MediaSource(_) => NodeKind::MediaSource,
            Self::Compressor(_) => NodeKind::Compressor,
            Self::Panner(_) => NodeKind::Panner,
            Self::Gain(_) => NodeKind::Gain,
            Self::Analyser(_) => NodeKind::Analyser,
            Self::Processor(_) => NodeKind::Processor,
            Self::Convolver(_) => NodeKind::Convolver,
        }
    }
}
