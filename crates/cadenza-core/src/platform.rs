//! Platform collaborators: media playback and binary fetch.
//!
//! Cadenza never decodes or streams media itself. A host supplies a
//! [`MediaLoader`] that turns a locator into a playable [`MediaElement`] and
//! an [`ImpulseFetcher`] that retrieves impulse-response files. The offline
//! implementations here are deterministic stand-ins for tests and headless
//! hosts.

use crate::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Fired once when the media can play through without stalling.
pub type ReadySignal = Box<dyn FnOnce() + Send>;

/// Delivers fetched bytes, or the reason the fetch failed.
pub type FetchCallback = Box<dyn FnOnce(Result<Vec<u8>>) + Send>;

/// A playable media source with a connectable sample output.
pub trait MediaElement: Send + Sync {
    fn source(&self) -> &str;

    fn play(&self);

    fn pause(&self);

    /// Playback offset in seconds.
    fn current_time(&self) -> f64;

    fn set_current_time(&self, seconds: f64);
}

pub trait MediaLoader: Send + Sync {
    /// Start loading `url`. `on_can_play_through` must be called at most once,
    /// after this call has returned.
    fn load(&self, url: &str, on_can_play_through: ReadySignal) -> Arc<dyn MediaElement>;
}

/// Retrieves raw bytes for a locator, off the caller's stack.
pub trait ImpulseFetcher: Send + Sync {
    fn fetch(&self, url: &str, done: FetchCallback);
}

/// Media element that only tracks transport state.
#[derive(Debug)]
pub struct OfflineMedia {
    source: String,
    state: Mutex<MediaState>,
    plays: AtomicUsize,
}

#[derive(Debug, Default)]
struct MediaState {
    playing: bool,
    position: f64,
}

impl OfflineMedia {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            state: Mutex::new(MediaState::default()),
            plays: AtomicUsize::new(0),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    /// Number of times `play()` has been called.
    pub fn play_count(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    /// Move the playhead forward if playing.
    pub fn advance(&self, seconds: f64) {
        let mut state = self.state.lock();
        if state.playing {
            state.position += seconds;
        }
    }
}

impl MediaElement for OfflineMedia {
    fn source(&self) -> &str {
        &self.source
    }

    fn play(&self) {
        self.plays.fetch_add(1, Ordering::SeqCst);
        self.state.lock().playing = true;
    }

    fn pause(&self) {
        self.state.lock().playing = false;
    }

    fn current_time(&self) -> f64 {
        self.state.lock().position
    }

    fn set_current_time(&self, seconds: f64) {
        self.state.lock().position = seconds.max(0.0);
    }
}

/// Loader whose readiness signals are fired by the host on demand.
#[derive(Default)]
pub struct OfflineMediaLoader {
    media: Mutex<HashMap<String, Arc<OfflineMedia>>>,
    pending: Mutex<Vec<(String, ReadySignal)>>,
}

impl OfflineMediaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// The element created for `url`, if it has been loaded.
    pub fn media(&self, url: &str) -> Option<Arc<OfflineMedia>> {
        self.media.lock().get(url).cloned()
    }

    /// Fire the can-play-through signal of every pending load of `url`.
    /// Returns how many signals fired.
    pub fn signal_ready(&self, url: &str) -> usize {
        let due: Vec<ReadySignal> = {
            let mut pending = self.pending.lock();
            let (due, keep): (Vec<_>, Vec<_>) =
                pending.drain(..).partition(|(source, _)| source == url);
            *pending = keep;
            due.into_iter().map(|(_, signal)| signal).collect()
        };
        let fired = due.len();
        for signal in due {
            signal();
        }
        fired
    }

    /// Fire every pending signal.
    pub fn signal_all(&self) -> usize {
        let due: Vec<_> = self.pending.lock().drain(..).collect();
        let fired = due.len();
        for (_, signal) in due {
            signal();
        }
        fired
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }
}

impl MediaLoader for OfflineMediaLoader {
    fn load(&self, url: &str, on_can_play_through: ReadySignal) -> Arc<dyn MediaElement> {
        let media = Arc::new(OfflineMedia::new(url));
        self.media.lock().insert(url.to_string(), media.clone());
        self.pending
            .lock()
            .push((url.to_string(), on_can_play_through));
        media
    }
}

impl std::fmt::Debug for OfflineMediaLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineMediaLoader")
            .field("media", &self.media.lock().len())
            .field("pending", &self.pending.lock().len())
            .finish()
    }
}
