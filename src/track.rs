//! A single playable track wired through a fixed effects graph.

use crate::events::{EventKind, TrackEvent, TrackListener};
use crate::load::EffectLoad;
use crate::{Platform, TrackBuilder};
use cadenza_automation::{
    AnimationHandle, Animator, FadeCurve, Tick, Tremolo, TremoloPhase, TremoloSettings,
};
use cadenza_core::{
    AnalyserNode, AtomicFlag, AtomicFloat, AudioBuffer, AudioGraph, CompressorNode, EventBus,
    GainNode, ImpulseFetcher, MediaElement, MediaSourceNode, PannerNode, ParamValue,
    ParameterStore, ProcessorNode, TrackConfig, MAX_VOLUME,
};
use cadenza_dsp::{
    Compressor, CompressorParam, CompressorPreset, CompressorSettings, ConvolverEffect,
    ConvolverRegistry, LevelMeter,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Unique per track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(Uuid);

impl TrackId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The nodes every track allocates up front.
///
/// Once ready the signal path is
/// `source -> compressor -> panner -> gain -> volume -> destination`, with a
/// metering tap `gain -> analyser -> processor -> destination`. `gain` is
/// driven by the tremolo, `volume` by [`Track::set_volume`].
#[derive(Debug)]
pub struct TrackNodes {
    pub compressor: Arc<CompressorNode>,
    pub panner: Arc<PannerNode>,
    pub gain: Arc<GainNode>,
    pub volume: Arc<GainNode>,
    pub analyser: Arc<AnalyserNode>,
    pub processor: Arc<ProcessorNode>,
}

struct TrackInner {
    id: TrackId,
    url: String,
    config: TrackConfig,
    graph: AudioGraph,
    fetcher: Arc<dyn ImpulseFetcher>,
    media: Arc<dyn MediaElement>,
    nodes: TrackNodes,
    source: Mutex<Option<Arc<MediaSourceNode>>>,
    connected: AtomicFlag,
    ready: AtomicFlag,
    playing: AtomicFlag,
    volume: AtomicFloat,
    events: EventBus<Track, TrackEvent>,
    params: ParameterStore,
    compressor: Compressor,
    effects: ConvolverRegistry,
    meter: LevelMeter,
    animator: Animator,
    tremolo: Tremolo,
}

/// One audio source with compression, panning, volume, tremolo, convolution
/// sends and metering.
///
/// Cloning is cheap and every clone drives the same track. Nodes are
/// allocated on construction but stay disconnected until the media reports
/// it can play through; actions that need a wired graph (playback, effect
/// attachment) are deferred until then through [`Track::ready`].
///
/// Callbacks handed to the platform hold weak references, so dropping the
/// last handle releases the track and leaves any pending callbacks inert.
///
/// # Example
///
/// ```
/// use cadenza::{OfflinePlatform, Track};
///
/// let offline = OfflinePlatform::default();
/// let track = Track::new("song.ogg", &offline.platform()).unwrap();
///
/// track.play(); // deferred
/// assert!(!track.is_playing());
///
/// offline.media.signal_ready("song.ogg");
/// assert!(track.is_ready());
/// assert!(track.is_playing());
///
/// track.set_volume(2.0);
/// assert_eq!(track.volume(), 1.5);
/// ```
#[derive(Clone)]
pub struct Track {
    inner: Arc<TrackInner>,
}

impl Track {
    pub fn builder(url: impl Into<String>) -> TrackBuilder {
        TrackBuilder::new(url)
    }

    /// Build a track with the default configuration.
    pub fn new(url: impl Into<String>, platform: &Platform) -> crate::Result<Self> {
        TrackBuilder::new(url).build(platform)
    }

    pub(crate) fn from_parts(url: String, config: TrackConfig, platform: &Platform) -> Self {
        let graph = AudioGraph::new(platform.backend.clone());
        let nodes = TrackNodes {
            compressor: graph.compressor(),
            panner: graph.panner(config.panning_model, config.pan_position),
            gain: graph.gain(1.0),
            volume: graph.gain(config.initial_volume),
            analyser: graph.analyser(config.analyser_fft_size, config.analyser_smoothing),
            processor: graph.processor(config.processor_buffer_size),
        };
        let animator = Animator::new(platform.frames.clone());

        let inner = Arc::new_cyclic(|weak: &Weak<TrackInner>| {
            let on_ready = weak.clone();
            let media = platform.media.load(
                &url,
                Box::new(move || {
                    if let Some(inner) = on_ready.upgrade() {
                        Track { inner }.media_ready();
                    }
                }),
            );

            let on_block = weak.clone();
            graph.set_process_callback(
                nodes.processor.id(),
                Arc::new(move || {
                    if let Some(inner) = on_block.upgrade() {
                        let track = Track { inner };
                        track.gain_meter();
                        track.compression_meter();
                    }
                }),
            );

            TrackInner {
                id: TrackId::new(),
                fetcher: platform.fetcher.clone(),
                media,
                source: Mutex::new(None),
                connected: AtomicFlag::new(false),
                ready: AtomicFlag::new(false),
                playing: AtomicFlag::new(false),
                volume: AtomicFloat::new(config.initial_volume),
                events: EventBus::new(),
                params: ParameterStore::new(),
                compressor: Compressor::new(nodes.compressor.clone()),
                effects: ConvolverRegistry::new(),
                meter: LevelMeter::new(nodes.analyser.frequency_bin_count()),
                tremolo: Tremolo::new(nodes.gain.clone(), animator.clone()),
                animator,
                nodes,
                graph,
                config,
                url,
            }
        });

        tracing::debug!(track = %inner.id, url = %inner.url, "Track created");
        Self { inner }
    }

    // --- identity & state ---

    pub fn id(&self) -> TrackId {
        self.inner.id
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    pub fn config(&self) -> &TrackConfig {
        &self.inner.config
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready.get()
    }

    pub fn is_playing(&self) -> bool {
        self.inner.playing.get()
    }

    /// Read access to the graph, for inspection.
    pub fn graph(&self) -> &AudioGraph {
        &self.inner.graph
    }

    pub fn nodes(&self) -> &TrackNodes {
        &self.inner.nodes
    }

    pub fn media(&self) -> &Arc<dyn MediaElement> {
        &self.inner.media
    }

    /// The media source node, created when the track becomes ready.
    pub fn source_node(&self) -> Option<Arc<MediaSourceNode>> {
        self.inner.source.lock().clone()
    }

    // --- parameter store ---

    /// Store free-form metadata under `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<ParamValue>) -> &Self {
        self.inner.params.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<ParamValue> {
        self.inner.params.get(key)
    }

    pub fn params(&self) -> &ParameterStore {
        &self.inner.params
    }

    // --- events ---

    pub fn on(&self, kind: EventKind, listener: TrackListener) -> &Self {
        self.inner.events.on(kind, listener);
        self
    }

    /// Remove `listener` from `kind`, or every listener of `kind` for `None`.
    pub fn off(&self, kind: EventKind, listener: Option<&TrackListener>) -> &Self {
        self.inner.events.off(kind, listener);
        self
    }

    /// Call every listener for the event's kind, in registration order.
    pub fn trigger(&self, event: TrackEvent) -> &Self {
        self.inner.events.trigger(self, &event);
        self
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner.events.listener_count(kind)
    }

    /// Run `callback` now if the track is ready, otherwise once it becomes
    /// ready.
    pub fn ready<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&Track) + Send + 'static,
    {
        let slot = Arc::new(Mutex::new(Some(callback)));
        let deferred = slot.clone();
        let listener: TrackListener = Arc::new(move |track: &Track, _: &TrackEvent| {
            let callback = deferred.lock().take();
            if let Some(callback) = callback {
                callback(track);
            }
        });

        let ready = &self.inner.ready;
        let queued = self
            .inner
            .events
            .on_unless(EventKind::Ready, listener, || ready.get());
        if !queued {
            let callback = slot.lock().take();
            if let Some(callback) = callback {
                callback(self);
            }
        }
        self
    }

    /// Wire the graph and flip to ready. Called by the media loader's
    /// can-play-through signal; later calls are ignored.
    pub fn media_ready(&self) -> &Self {
        let inner = &self.inner;
        if !inner.connected.raise() {
            tracing::debug!(track = %inner.id, "Ignoring repeated can-play-through");
            return self;
        }

        let graph = &inner.graph;
        let nodes = &inner.nodes;
        let source = graph.media_source(inner.media.clone());
        graph
            .connect_chain(&[
                source.id(),
                nodes.compressor.id(),
                nodes.panner.id(),
                nodes.gain.id(),
                nodes.volume.id(),
                graph.destination(),
            ])
            .connect_chain(&[
                nodes.gain.id(),
                nodes.analyser.id(),
                nodes.processor.id(),
                graph.destination(),
            ]);
        *inner.source.lock() = Some(source);

        if inner.compressor.settle() {
            tracing::debug!(track = %inner.id, "Compressor defaulted to off");
        }

        inner.events.exclusive(|| inner.ready.set(true));
        tracing::debug!(track = %inner.id, "Track ready");
        self.trigger(TrackEvent::Ready)
    }

    // --- transport ---

    /// Start playback, or schedule it for when the track becomes ready.
    pub fn play(&self) -> &Self {
        self.ready(|track| {
            track.inner.media.play();
            track.inner.playing.set(true);
            track.trigger(TrackEvent::Play);
        })
    }

    pub fn pause(&self) -> &Self {
        self.inner.media.pause();
        self.inner.playing.set(false);
        self.trigger(TrackEvent::Pause)
    }

    pub fn toggle(&self) -> &Self {
        if self.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Playback offset in seconds.
    pub fn position(&self) -> f64 {
        self.inner.media.current_time()
    }

    pub fn set_position(&self, seconds: f64) -> &Self {
        self.inner.media.set_current_time(seconds);
        self.trigger(TrackEvent::Seek(seconds))
    }

    // --- volume ---

    pub fn volume(&self) -> f32 {
        self.inner.volume.get()
    }

    /// Set the volume, clamped to `0..=1.5`. NaN counts as silence.
    pub fn set_volume(&self, volume: f32) -> &Self {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, MAX_VOLUME)
        };
        self.inner.nodes.volume.gain.set_value(volume);
        self.inner.volume.set(volume);
        self.trigger(TrackEvent::Volume(volume))
    }

    /// Ramp the volume linearly from `start` to `end` over `duration_ms`,
    /// landing exactly on `end`, then call `on_done`.
    pub fn fade<F>(&self, start: f32, end: f32, duration_ms: f64, on_done: F) -> AnimationHandle
    where
        F: FnOnce(&Track) + Send + 'static,
    {
        let curve = FadeCurve::new(start, end, duration_ms);
        let ticking = Arc::downgrade(&self.inner);
        let finishing = ticking.clone();
        tracing::debug!(track = %self.inner.id, start, end, duration_ms, "Fade");

        self.inner.animator.animate(
            duration_ms,
            move |elapsed, _| match ticking.upgrade() {
                Some(inner) => {
                    Track { inner }.set_volume(curve.value_at(elapsed));
                    Tick::Continue
                }
                None => Tick::Stop,
            },
            move |_| {
                if let Some(inner) = finishing.upgrade() {
                    let track = Track { inner };
                    track.set_volume(curve.end);
                    on_done(&track);
                }
            },
        )
    }

    /// Fade from the current volume.
    pub fn fade_to<F>(&self, end: f32, duration_ms: f64, on_done: F) -> AnimationHandle
    where
        F: FnOnce(&Track) + Send + 'static,
    {
        self.fade(self.volume(), end, duration_ms, on_done)
    }

    /// Fade from the current volume to silence.
    pub fn fade_out<F>(&self, duration_ms: f64, on_done: F) -> AnimationHandle
    where
        F: FnOnce(&Track) + Send + 'static,
    {
        self.fade_to(0.0, duration_ms, on_done)
    }

    // --- tremolo ---

    /// Start a tremolo (`Some`) or stop the current one (`None`). A running
    /// tremolo always decays back to unity gain before anything new starts.
    pub fn tremolo(&self, settings: Option<TremoloSettings>) -> &Self {
        self.inner.tremolo.set(settings);
        self
    }

    pub fn tremolo_phase(&self) -> Option<TremoloPhase> {
        self.inner.tremolo.phase()
    }

    // --- compressor ---

    /// Threshold back to 0 dB.
    pub fn reset_compressor(&self) -> &Self {
        self.inner.compressor.reset();
        self
    }

    pub fn compressor_preset(&self, preset: CompressorPreset) -> &Self {
        self.inner.compressor.apply_preset(preset);
        self
    }

    pub fn compressor_settings(&self, settings: CompressorSettings) -> &Self {
        self.inner.compressor.apply(&settings);
        self
    }

    pub fn compressor(&self, param: CompressorParam) -> f32 {
        self.inner.compressor.get(param)
    }

    pub fn set_compressor(&self, param: CompressorParam, value: f32) -> &Self {
        self.inner.compressor.set(param, value);
        self
    }

    /// Gain reduction in dB. Read-only.
    pub fn compressor_reduction(&self) -> f32 {
        self.inner.compressor.reduction()
    }

    // --- panner ---

    pub fn pan_position(&self) -> [f32; 3] {
        self.inner.nodes.panner.position()
    }

    pub fn set_pan_position(&self, x: f32, y: f32, z: f32) -> &Self {
        self.inner.nodes.panner.set_position(x, y, z);
        self
    }

    // --- convolution effects ---

    /// Register a convolution send named `name` and start fetching its
    /// impulse response from `url`. Gain defaults to 0. Returns `None` if the
    /// name is taken; the first registration wins.
    pub fn add_convolver(&self, name: &str, url: &str, gain: Option<f32>) -> Option<EffectLoad> {
        self.add_convolver_with(name, url, gain, |_| {})
    }

    /// Like [`Track::add_convolver`], calling `on_loaded` once the effect is
    /// attached.
    pub fn add_convolver_with<F>(
        &self,
        name: &str,
        url: &str,
        gain: Option<f32>,
        on_loaded: F,
    ) -> Option<EffectLoad>
    where
        F: FnOnce(&Track) + Send + 'static,
    {
        let effect = self
            .inner
            .effects
            .register(&self.inner.graph, name, gain.unwrap_or(0.0))?;
        let (done, load) = EffectLoad::channel(name);
        let weak = Arc::downgrade(&self.inner);
        tracing::debug!(track = %self.inner.id, effect = name, url, "Loading impulse response");

        self.inner.fetcher.fetch(
            url,
            Box::new(move |fetched| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let track = Track { inner };
                let decoded = fetched
                    .and_then(|bytes| track.inner.graph.backend().decode_audio_data(&bytes));
                match decoded {
                    Ok(buffer) => {
                        let buffer = Arc::new(buffer);
                        track.ready(move |track| {
                            track.attach_effect(&effect, buffer);
                            on_loaded(track);
                            let _ = done.send(Ok(()));
                        });
                    }
                    Err(err) => {
                        let name = effect.name().to_string();
                        tracing::warn!(track = %track.inner.id, effect = %name, "Effect failed to load: {}", err);
                        track.trigger(TrackEvent::FxFailed {
                            name,
                            reason: err.to_string(),
                        });
                        let _ = done.send(Err(err.into()));
                    }
                }
            }),
        );

        Some(load)
    }

    fn attach_effect(&self, effect: &ConvolverEffect, buffer: Arc<AudioBuffer>) {
        let input = self.inner.nodes.volume.id();
        if effect.attach(&self.inner.graph, input, buffer) {
            self.trigger(TrackEvent::FxLoaded(effect.name().to_string()));
        }
    }

    pub fn convolver_gain(&self, name: &str) -> Option<f32> {
        self.inner.effects.gain(name)
    }

    /// Set a send level, clamped to `0..=1`. Unknown names are ignored.
    pub fn set_convolver_gain(&self, name: &str, gain: f32) -> &Self {
        if !self.inner.effects.set_gain(name, gain) {
            tracing::debug!(track = %self.inner.id, effect = name, "No such effect");
        }
        self
    }

    pub fn effect(&self, name: &str) -> Option<Arc<ConvolverEffect>> {
        self.inner.effects.get(name)
    }

    pub fn effect_names(&self) -> Vec<String> {
        self.inner.effects.names()
    }

    pub fn is_effect_ready(&self, name: &str) -> bool {
        self.inner.effects.is_ready(name)
    }

    // --- metering ---

    /// Average analyser level weighted by volume. Fires
    /// [`TrackEvent::AverageVolume`].
    pub fn gain_meter(&self) -> f32 {
        let average = self
            .inner
            .meter
            .average(&self.inner.nodes.analyser, self.volume());
        self.trigger(TrackEvent::AverageVolume(average));
        average
    }

    /// Current gain reduction. Fires [`TrackEvent::Compression`].
    pub fn compression_meter(&self) -> f32 {
        let reduction = self.compressor_reduction();
        self.trigger(TrackEvent::Compression(reduction));
        reduction
    }
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("id", &self.inner.id)
            .field("url", &self.inner.url)
            .field("ready", &self.is_ready())
            .field("playing", &self.is_playing())
            .field("volume", &self.volume())
            .field("effects", &self.effect_names())
            .finish()
    }
}
