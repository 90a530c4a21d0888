//! The collaborators a track runs on.

use cadenza_core::{
    AudioBackend, FrameScheduler, ImpulseFetcher, ManualFrameScheduler, MediaLoader,
    MemoryFetcher, OfflineBackend, OfflineMediaLoader,
};
use std::sync::Arc;

/// Media loading, graph rendering, frame timing and binary fetch.
///
/// Any number of tracks may share one platform. Each track still owns its
/// nodes: the backend hands out ids that are unique across tracks.
#[derive(Clone)]
pub struct Platform {
    pub backend: Arc<dyn AudioBackend>,
    pub media: Arc<dyn MediaLoader>,
    pub fetcher: Arc<dyn ImpulseFetcher>,
    pub frames: Arc<dyn FrameScheduler>,
}

impl Platform {
    pub fn new(
        backend: Arc<dyn AudioBackend>,
        media: Arc<dyn MediaLoader>,
        fetcher: Arc<dyn ImpulseFetcher>,
        frames: Arc<dyn FrameScheduler>,
    ) -> Self {
        Self {
            backend,
            media,
            fetcher,
            frames,
        }
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("sample_rate", &self.backend.sample_rate())
            .field("now_ms", &self.frames.now_ms())
            .finish()
    }
}

/// Fully deterministic collaborators, with the concrete types kept so the
/// host can drive them: signal media readiness, resolve fetches, advance
/// frames and run processing blocks.
#[derive(Debug, Clone)]
pub struct OfflinePlatform {
    pub backend: Arc<OfflineBackend>,
    pub media: Arc<OfflineMediaLoader>,
    pub fetcher: Arc<MemoryFetcher>,
    pub frames: Arc<ManualFrameScheduler>,
}

impl OfflinePlatform {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            backend: Arc::new(OfflineBackend::new(sample_rate)),
            media: Arc::new(OfflineMediaLoader::new()),
            fetcher: Arc::new(MemoryFetcher::new()),
            frames: Arc::new(ManualFrameScheduler::new()),
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::new(
            self.backend.clone(),
            self.media.clone(),
            self.fetcher.clone(),
            self.frames.clone(),
        )
    }
}

impl Default for OfflinePlatform {
    fn default() -> Self {
        Self::new(44100.0)
    }
}
