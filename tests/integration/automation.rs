//! Automation integration tests
//!
//! Fades and tremolo driven through a track, frame by frame.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_relative_eq;
use cadenza::prelude::*;
use cadenza::{Platform, ThreadFrameScheduler, TremoloPhase};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_fade_interpolates_and_lands_exactly() {
    let fx = ready_track();
    let done = Arc::new(AtomicUsize::new(0));
    let d = done.clone();
    let handle = fx.track.fade(1.0, 0.0, 1000.0, move |_| {
        d.fetch_add(1, Ordering::SeqCst);
    });

    fx.frame(500.0);
    assert_relative_eq!(fx.track.volume(), 0.5, epsilon = RAMP_EPSILON);
    assert!(!handle.is_finished());

    fx.frame(500.0);
    assert_eq!(fx.track.volume(), 0.0);
    assert!(handle.is_finished());
    assert_eq!(done.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fade_values_are_monotonic() {
    let fx = ready_track();
    fx.track.set_volume(0.2);
    let volumes = record(&fx.track, EventKind::Volume);
    fx.track.fade_to(1.2, 300.0, |_| {});
    fx.settle_frames();

    let values: Vec<f32> = volumes
        .lock()
        .iter()
        .map(|e| match e {
            TrackEvent::Volume(v) => *v,
            other => panic!("unexpected event {:?}", other),
        })
        .collect();
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    assert_relative_eq!(*values.last().unwrap(), 1.2, epsilon = FLOAT_EPSILON);
}

#[test]
fn test_fade_out_then_pause() {
    let fx = ready_track();
    fx.track.play();
    fx.track.fade_out(200.0, |track| {
        track.pause();
    });
    assert!(fx.track.is_playing());

    fx.settle_frames();
    assert_eq!(fx.track.volume(), 0.0);
    assert!(!fx.track.is_playing());
}

#[test]
fn test_zero_duration_fade_completes_on_first_frame() {
    let fx = ready_track();
    let handle = fx.track.fade(1.0, 0.3, 0.0, |_| {});
    assert_eq!(fx.track.volume(), 1.0);
    fx.frame(FRAME_MS);
    assert!(handle.is_finished());
    assert_relative_eq!(fx.track.volume(), 0.3, epsilon = FLOAT_EPSILON);
}

#[test]
fn test_fade_clamps_out_of_range_targets() {
    let fx = ready_track();
    fx.track.fade(0.0, 3.0, 100.0, |_| {});
    fx.settle_frames();
    assert_eq!(fx.track.volume(), cadenza::MAX_VOLUME);
}

#[test]
fn test_tremolo_oscillates_on_gain_node() {
    let fx = ready_track();
    let gain = fx.track.nodes().gain.clone();
    fx.track.tremolo(Some(TremoloSettings::new(200.0).with_intensity(0.5)));
    assert_eq!(fx.track.tremolo_phase(), Some(TremoloPhase::Down));

    fx.frame(100.0);
    assert_relative_eq!(gain.gain.value(), 0.5, epsilon = RAMP_EPSILON);
    assert_eq!(fx.track.tremolo_phase(), Some(TremoloPhase::Up));

    fx.frame(50.0);
    assert_relative_eq!(gain.gain.value(), 0.75, epsilon = RAMP_EPSILON);

    // The track volume is independent of the tremolo.
    assert_eq!(fx.track.volume(), 1.0);
}

#[test]
fn test_tremolo_stopped_immediately_never_dips() {
    let fx = ready_track();
    let gain = fx.track.nodes().gain.clone();
    fx.track
        .tremolo(Some(TremoloSettings::new(200.0).with_intensity(0.5)))
        .tremolo(None);
    assert_eq!(fx.track.tremolo_phase(), Some(TremoloPhase::Release));

    let mut lowest = f32::MAX;
    while fx.offline.frames.pending() > 0 {
        fx.frame(FRAME_MS);
        lowest = lowest.min(gain.gain.value());
    }

    assert_eq!(gain.gain.value(), 1.0);
    assert_relative_eq!(lowest, 1.0, epsilon = FLOAT_EPSILON);
    assert_eq!(fx.track.tremolo_phase(), None);
}

#[test]
fn test_tremolo_stop_mid_cycle_returns_to_unity() {
    let fx = ready_track();
    let gain = fx.track.nodes().gain.clone();
    fx.track.tremolo(Some(TremoloSettings::new(400.0)));
    fx.frame(120.0);
    assert!(gain.gain.value() < 1.0);

    fx.track.tremolo(None);
    fx.settle_frames();
    assert_eq!(gain.gain.value(), 1.0);
    assert_eq!(fx.track.tremolo_phase(), None);
}

#[test]
fn test_fade_on_thread_scheduler() {
    let offline = OfflinePlatform::default();
    let frames = Arc::new(ThreadFrameScheduler::new(240.0).unwrap());
    let platform = Platform::new(
        offline.backend.clone(),
        offline.media.clone(),
        offline.fetcher.clone(),
        frames,
    );
    let track = Track::new(TEST_URL, &platform).unwrap();
    offline.media.signal_ready(TEST_URL);

    let (tx, rx) = crossbeam_channel::bounded(1);
    track.fade(1.0, 0.0, 40.0, move |track| {
        tx.send(track.volume()).unwrap();
    });

    let end = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(end, 0.0);
    assert_eq!(track.volume(), 0.0);
}
