//! Event bus integration tests
//!
//! Listener order, duplicate registrations, removal and re-entrant listeners.

use crate::helpers::*;
use cadenza::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;

fn tagging(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> TrackListener {
    let log = log.clone();
    listener(move |_: &Track, _: &TrackEvent| log.lock().push(tag))
}

#[test]
fn test_listeners_fire_in_registration_order() {
    let fx = test_track();
    let log = Arc::new(Mutex::new(Vec::new()));
    fx.track
        .on(EventKind::Pause, tagging(&log, "a"))
        .on(EventKind::Pause, tagging(&log, "b"))
        .on(EventKind::Pause, tagging(&log, "c"));
    fx.track.pause();
    assert_eq!(*log.lock(), vec!["a", "b", "c"]);
}

#[test]
fn test_duplicate_registration_fires_twice_and_off_removes_both() {
    let fx = test_track();
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = tagging(&log, "a");
    let b = tagging(&log, "b");
    fx.track
        .on(EventKind::Pause, a.clone())
        .on(EventKind::Pause, b.clone())
        .on(EventKind::Pause, a.clone());

    fx.track.pause();
    assert_eq!(*log.lock(), vec!["a", "b", "a"]);

    log.lock().clear();
    fx.track.off(EventKind::Pause, Some(&a)).pause();
    assert_eq!(*log.lock(), vec!["b"]);
}

#[test]
fn test_off_without_listener_clears_kind_only() {
    let fx = test_track();
    let log = Arc::new(Mutex::new(Vec::new()));
    fx.track
        .on(EventKind::Pause, tagging(&log, "pause"))
        .on(EventKind::Seek, tagging(&log, "seek"));
    fx.track.off(EventKind::Pause, None);

    assert_eq!(fx.track.listener_count(EventKind::Pause), 0);
    fx.track.pause().set_position(1.0);
    assert_eq!(*log.lock(), vec!["seek"]);
}

#[test]
fn test_trigger_without_listeners_is_noop() {
    let fx = test_track();
    fx.track.trigger(TrackEvent::FxLoaded("nothing".into()));
    assert_eq!(fx.track.listener_count(EventKind::FxLoaded), 0);
}

#[test]
fn test_listener_receives_track_context() {
    let fx = test_track();
    let urls = Arc::new(Mutex::new(Vec::new()));
    let u = urls.clone();
    fx.track.on(
        EventKind::Volume,
        listener(move |track: &Track, _: &TrackEvent| u.lock().push(track.url().to_string())),
    );
    fx.track.set_volume(0.5);
    assert_eq!(*urls.lock(), vec![TEST_URL.to_string()]);
}

#[test]
fn test_listener_may_reenter_track() {
    let fx = ready_track();
    fx.track.on(
        EventKind::Play,
        listener(|track: &Track, _: &TrackEvent| {
            track.set_volume(0.25);
        }),
    );
    let volumes = record(&fx.track, EventKind::Volume);
    fx.track.play();
    assert_eq!(fx.track.volume(), 0.25);
    assert_eq!(*volumes.lock(), vec![TrackEvent::Volume(0.25)]);
}

#[test]
#[should_panic(expected = "listener failure")]
fn test_listener_panic_propagates() {
    let fx = test_track();
    fx.track.on(
        EventKind::Pause,
        listener(|_: &Track, _: &TrackEvent| panic!("listener failure")),
    );
    fx.track.pause();
}
