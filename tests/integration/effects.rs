//! Effects integration tests
//!
//! Compressor control and convolution sends, from registration through
//! impulse-response loading to attachment.

use crate::helpers::*;
use cadenza::core::{FileFetcher, NodeKind};
use cadenza::dsp;
use cadenza::prelude::*;
use cadenza::{Error, Platform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const IR_URL: &str = "impulses/hall.wav";

#[test]
fn test_heavy_preset_then_parameter_read() {
    let fx = ready_track();
    fx.track.compressor_preset(CompressorPreset::Heavy);
    assert_eq!(fx.track.compressor(CompressorParam::Threshold), -24.0);
    assert_eq!(fx.track.compressor(CompressorParam::Ratio), 10.0);

    fx.track.set_compressor(CompressorParam::Threshold, -6.0);
    assert_eq!(fx.track.compressor(CompressorParam::Threshold), -6.0);

    fx.track.reset_compressor();
    assert_eq!(fx.track.compressor(CompressorParam::Threshold), 0.0);
}

#[test]
fn test_configured_compressor_survives_ready() {
    let fx = test_track();
    fx.track
        .compressor_settings(CompressorSettings::new().ratio(4.0).threshold(-12.0));
    fx.signal_ready();
    assert_eq!(fx.track.compressor(CompressorParam::Ratio), 4.0);
    assert_eq!(fx.track.compressor(CompressorParam::Threshold), -12.0);
}

#[test]
fn test_parameter_names_parse() {
    assert_eq!(
        "threshold".parse::<CompressorParam>(),
        Ok(CompressorParam::Threshold)
    );
    assert_eq!(
        "reduction".parse::<CompressorParam>(),
        Err(dsp::Error::ReadOnlyParameter("reduction".into()))
    );
    assert!(matches!(
        "wobble".parse::<CompressorParam>(),
        Err(dsp::Error::UnknownParameter(_))
    ));

    let err: Error = "loud".parse::<CompressorPreset>().unwrap_err().into();
    assert!(matches!(err, Error::Dsp(dsp::Error::UnknownPreset(_))));
}

#[test]
fn test_duplicate_convolver_name_is_rejected() {
    let fx = ready_track();
    assert!(fx.track.add_convolver("hall", IR_URL, Some(0.4)).is_some());
    assert!(fx.track.add_convolver("hall", "other.wav", Some(0.9)).is_none());

    assert_eq!(fx.track.effect_names(), vec!["hall".to_string()]);
    assert_eq!(fx.track.convolver_gain("hall"), Some(0.4));
    assert_eq!(fx.offline.fetcher.pending(), 1);
}

#[test]
fn test_convolver_gain_defaults_and_clamps() {
    let fx = ready_track();
    fx.track.add_convolver("plate", IR_URL, None);
    assert_eq!(fx.track.convolver_gain("plate"), Some(0.0));

    fx.track.set_convolver_gain("plate", 1.7);
    assert_eq!(fx.track.convolver_gain("plate"), Some(1.0));
    fx.track.set_convolver_gain("plate", -0.5);
    assert_eq!(fx.track.convolver_gain("plate"), Some(0.0));

    fx.track.set_convolver_gain("missing", 0.5);
    assert_eq!(fx.track.convolver_gain("missing"), None);
}

#[test]
fn test_nan_convolver_gain_is_silent() {
    let fx = ready_track();
    fx.track.add_convolver("send", IR_URL, Some(f32::NAN));
    assert_eq!(fx.track.convolver_gain("send"), Some(0.0));

    fx.track.set_convolver_gain("send", 0.7).set_convolver_gain("send", f32::NAN);
    assert_eq!(fx.track.convolver_gain("send"), Some(0.0));
}

#[test]
fn test_attach_waits_for_ready() {
    let fx = test_track();
    fx.offline.fetcher.insert(IR_URL, short_impulse());
    let loaded = record(&fx.track, EventKind::FxLoaded);
    let callbacks = Arc::new(AtomicUsize::new(0));
    let c = callbacks.clone();

    let load = fx
        .track
        .add_convolver_with("hall", IR_URL, Some(0.5), move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    fx.resolve_fetches();
    assert!(!fx.track.is_effect_ready("hall"));
    assert_eq!(load.try_result(), None);

    fx.signal_ready();
    assert!(fx.track.is_effect_ready("hall"));
    assert_eq!(*loaded.lock(), vec![TrackEvent::FxLoaded("hall".into())]);
    assert_eq!(callbacks.load(Ordering::SeqCst), 1);
    assert_eq!(load.wait(), Ok(()));
}

#[test]
fn test_attached_effect_is_wired_from_volume() {
    let fx = ready_track();
    fx.offline.fetcher.insert(IR_URL, short_impulse());
    let load = fx.track.add_convolver("hall", IR_URL, Some(0.5)).unwrap();
    fx.resolve_fetches();
    assert_eq!(load.try_result(), Some(Ok(())));

    let effect = fx.track.effect("hall").unwrap();
    let convolver = effect.convolver_node().id();
    let edges = fx.offline.backend.edges();
    assert!(edges.contains(&(fx.track.nodes().volume.id(), convolver)));
    assert!(edges.contains(&(convolver, effect.gain_node().id())));
    assert!(edges.contains(&(effect.gain_node().id(), fx.track.graph().destination())));
    assert_eq!(
        fx.offline.backend.node(convolver).map(|n| n.kind()),
        Some(NodeKind::Convolver)
    );

    let buffer = effect.buffer().unwrap();
    assert_eq!(buffer.number_of_channels(), 1);
    assert_eq!(buffer.length(), 4);
    assert_eq!(buffer.channel(0).unwrap()[1], 0.5);
}

#[test]
fn test_missing_impulse_fails_load() {
    let fx = ready_track();
    let failed = record(&fx.track, EventKind::FxFailed);
    let loaded = record(&fx.track, EventKind::FxLoaded);
    let load = fx.track.add_convolver("ghost", "nowhere.wav", None).unwrap();
    fx.resolve_fetches();

    let result = load.wait();
    assert!(matches!(
        result,
        Err(Error::Core(cadenza::core::Error::Fetch { ref url, .. })) if url == "nowhere.wav"
    ));
    assert_eq!(failed.lock().len(), 1);
    assert!(loaded.lock().is_empty());
    assert!(!fx.track.is_effect_ready("ghost"));
    // The name stays taken.
    assert!(fx.track.add_convolver("ghost", IR_URL, None).is_none());
}

#[test]
fn test_undecodable_impulse_fails_load() {
    let fx = ready_track();
    fx.offline.fetcher.insert("junk.wav", vec![0xde, 0xad, 0xbe, 0xef]);
    let load = fx.track.add_convolver("junk", "junk.wav", None).unwrap();
    fx.resolve_fetches();

    assert!(matches!(
        load.wait(),
        Err(Error::Core(cadenza::core::Error::Decode(_)))
    ));
    assert!(fx.track.effect("junk").unwrap().buffer().is_none());
}

#[test]
fn test_dropped_track_reports_effect_dropped() {
    let fx = ready_track();
    fx.offline.fetcher.insert(IR_URL, short_impulse());
    let Fixture { offline, track } = fx;
    let load = track.add_convolver("hall", IR_URL, None).unwrap();
    drop(track);
    offline.fetcher.resolve_pending();

    assert!(matches!(
        load.wait(),
        Err(Error::Core(cadenza::core::Error::EffectDropped(ref name))) if name == "hall"
    ));
}

#[test]
fn test_file_fetcher_loads_from_disk() {
    let dir = std::env::temp_dir().join(format!("cadenza-effects-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("room.wav"), short_impulse()).unwrap();

    let offline = OfflinePlatform::default();
    let platform = Platform::new(
        offline.backend.clone(),
        offline.media.clone(),
        Arc::new(FileFetcher::new(&dir).unwrap()),
        offline.frames.clone(),
    );
    let track = Track::new(TEST_URL, &platform).unwrap();
    offline.media.signal_ready(TEST_URL);

    let load = track.add_convolver("room", "file://room.wav", Some(0.3)).unwrap();
    let result = load.wait_timeout(Duration::from_secs(5));
    assert_eq!(result, Some(Ok(())));
    assert!(track.is_effect_ready("room"));

    let _ = std::fs::remove_dir_all(&dir);
}
