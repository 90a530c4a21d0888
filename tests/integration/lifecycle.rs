//! Lifecycle integration tests
//!
//! Construction, the single readiness transition, deferred actions and
//! transport control.

use crate::helpers::*;
use cadenza::prelude::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_ready_fires_exactly_once() {
    let fx = test_track();
    let ready = record(&fx.track, EventKind::Ready);

    assert!(!fx.track.is_ready());
    fx.signal_ready();
    fx.track.media_ready();
    fx.track.media_ready();

    assert!(fx.track.is_ready());
    assert_eq!(ready.lock().len(), 1);
}

#[test]
fn test_ready_callback_runs_synchronously_once_ready() {
    let fx = ready_track();
    let ran = Arc::new(AtomicUsize::new(0));
    let r = ran.clone();
    fx.track.ready(move |_| {
        r.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[test]
fn test_deferred_callbacks_run_in_order_on_ready() {
    let fx = test_track();
    let order = Arc::new(Mutex::new(Vec::new()));
    for i in 0..3 {
        let o = order.clone();
        fx.track.ready(move |_| o.lock().push(i));
    }
    assert!(order.lock().is_empty());

    fx.signal_ready();
    assert_eq!(*order.lock(), vec![0, 1, 2]);

    // A manual Ready does not replay them.
    fx.track.trigger(TrackEvent::Ready);
    assert_eq!(order.lock().len(), 3);
}

#[test]
fn test_play_before_ready_is_deferred_and_runs_once() {
    let fx = test_track();
    let plays = record(&fx.track, EventKind::Play);

    fx.track.play();
    assert!(!fx.track.is_playing());
    assert!(plays.lock().is_empty());

    fx.signal_ready();
    assert!(fx.track.is_playing());
    assert_eq!(plays.lock().len(), 1);

    let media = fx.offline.media.media(TEST_URL).unwrap();
    assert_eq!(media.play_count(), 1);
    assert!(media.is_playing());
}

#[test]
fn test_pause_before_ready_is_inert() {
    let fx = test_track();
    let pauses = record(&fx.track, EventKind::Pause);
    fx.track.pause();
    assert!(!fx.track.is_playing());
    assert_eq!(pauses.lock().len(), 1);
    assert!(!fx.track.is_ready());
}

#[test]
fn test_toggle_alternates() {
    let fx = ready_track();
    fx.track.toggle();
    assert!(fx.track.is_playing());
    fx.track.toggle();
    assert!(!fx.track.is_playing());
    fx.track.toggle();
    assert!(fx.track.is_playing());
}

#[test]
fn test_seek_fires_with_offset() {
    let fx = ready_track();
    let seeks = record(&fx.track, EventKind::Seek);
    fx.track.set_position(30.5);
    assert_eq!(fx.track.position(), 30.5);
    assert_eq!(*seeks.lock(), vec![TrackEvent::Seek(30.5)]);
}

#[test]
fn test_position_follows_media() {
    let fx = ready_track();
    fx.track.play();
    fx.offline.media.media(TEST_URL).unwrap().advance(2.0);
    assert_eq!(fx.track.position(), 2.0);
}

#[test]
fn test_default_pan_position() {
    let fx = test_track();
    assert_eq!(fx.track.pan_position(), [0.0, 0.0, 0.1]);
    fx.track.set_pan_position(-1.0, 0.0, 0.5);
    assert_eq!(fx.track.pan_position(), [-1.0, 0.0, 0.5]);
    assert_eq!(fx.track.nodes().panner.model(), cadenza::PanningModel::EqualPower);
}

#[test]
fn test_clones_share_state() {
    let fx = ready_track();
    let other = fx.track.clone();
    other.set_volume(0.3);
    assert_eq!(fx.track.volume(), 0.3);
    assert_eq!(other.id(), fx.track.id());
}

#[test]
fn test_dropped_track_leaves_callbacks_inert() {
    let fx = test_track();
    let Fixture { offline, track } = fx;
    track.play();
    drop(track);

    assert_eq!(offline.media.signal_ready(TEST_URL), 1);
    assert_eq!(offline.media.media(TEST_URL).unwrap().play_count(), 0);
    assert_eq!(offline.backend.process_block(), 0);
}
