//! Test helpers and fixtures for Cadenza integration tests
//!
//! Every fixture runs on the offline platform: media readiness, impulse
//! fetches, frames and processing blocks only happen when a test asks for
//! them, so ordering is fully deterministic.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact writes (clamping, snapped end values)
//! - `RAMP_EPSILON` (1e-4): Values read back mid-ramp
//! - `METER_EPSILON` (1e-3): Meter averages

#![allow(dead_code)]

pub mod tolerances;

use cadenza::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;

pub const TEST_SAMPLE_RATE: f64 = 44100.0;

pub const TEST_URL: &str = "track.ogg";

/// Frame spacing used when driving animations (~60 fps).
pub const FRAME_MS: f64 = 16.0;

pub struct Fixture {
    pub offline: OfflinePlatform,
    pub track: Track,
}

impl Fixture {
    /// Fire the media's can-play-through signal.
    pub fn signal_ready(&self) {
        self.offline.media.signal_ready(TEST_URL);
    }

    /// Advance the frame clock by `ms` and run one frame.
    pub fn frame(&self, ms: f64) {
        self.offline.frames.advance(ms);
    }

    /// Run frames until no animation is pending.
    pub fn settle_frames(&self) -> usize {
        self.offline.frames.run_until_idle(FRAME_MS, 10_000)
    }

    /// Complete every queued impulse-response fetch.
    pub fn resolve_fetches(&self) -> usize {
        self.offline.fetcher.resolve_pending()
    }

    pub fn process_block(&self) -> usize {
        self.offline.backend.process_block()
    }
}

/// A track that has not become ready yet.
pub fn test_track() -> Fixture {
    let offline = OfflinePlatform::new(TEST_SAMPLE_RATE);
    let track = Track::new(TEST_URL, &offline.platform()).expect("Failed to create test track");
    Fixture { offline, track }
}

/// A track whose graph is already wired.
pub fn ready_track() -> Fixture {
    let fixture = test_track();
    fixture.signal_ready();
    assert!(fixture.track.is_ready());
    fixture
}

/// Collect every event of `kind` the track fires from now on.
pub fn record(track: &Track, kind: EventKind) -> Arc<Mutex<Vec<TrackEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    track.on(
        kind,
        listener(move |_: &Track, event: &TrackEvent| sink.lock().push(event.clone())),
    );
    events
}

/// Encode mono float samples as a WAV file.
pub fn impulse_wav(samples: &[f32]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: TEST_SAMPLE_RATE as u32,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("WAV writer");
        for &sample in samples {
            writer.write_sample(sample).expect("WAV sample");
        }
        writer.finalize().expect("WAV finalize");
    }
    cursor.into_inner()
}

/// A short decaying impulse.
pub fn short_impulse() -> Vec<u8> {
    impulse_wav(&[1.0, 0.5, 0.25, 0.125])
}
