//! # Fade and Reverb
//!
//! Build a track on real-time frames, add a convolution send from a
//! synthesized impulse response, then fade in, wobble and fade out.
//!
//! **Concepts:** platform wiring, deferred readiness, effect loading, volume automation
//!
//! ```bash
//! RUST_LOG=debug cargo run --example fade_and_reverb
//! ```

use cadenza::prelude::*;
use cadenza::ThreadFrameScheduler;
use crossbeam_channel::bounded;
use std::sync::Arc;
use std::time::Duration;

/// A one-second exponentially decaying impulse, 16-bit mono.
fn synth_impulse(sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("WAV writer");
        for n in 0..sample_rate {
            let t = n as f32 / sample_rate as f32;
            let sample = (-6.0 * t).exp() * i16::MAX as f32;
            writer.write_sample(sample as i16).expect("WAV sample");
        }
        writer.finalize().expect("WAV finalize");
    }
    cursor.into_inner()
}

fn main() -> cadenza::Result<()> {
    tracing_subscriber::fmt::init();

    let offline = OfflinePlatform::new(48000.0);
    offline.fetcher.insert("hall.wav", synth_impulse(48000));
    let platform = Platform::new(
        offline.backend.clone(),
        offline.media.clone(),
        offline.fetcher.clone(),
        Arc::new(ThreadFrameScheduler::new(60.0)?),
    );

    let track = Track::builder("song.ogg")
        .initial_volume(0.0)
        .pan_position([0.3, 0.0, 0.1])
        .build(&platform)?;

    track.on(
        EventKind::FxLoaded,
        listener(|_: &Track, event: &TrackEvent| println!("Loaded: {:?}", event)),
    );
    let hall = track
        .add_convolver("hall", "hall.wav", Some(0.35))
        .expect("fresh effect name");
    offline.fetcher.resolve_pending();

    track.compressor_preset(CompressorPreset::Mild).play();
    offline.media.signal_ready("song.ogg");
    hall.wait()?;
    println!("Playing with {:?}", track.effect_names());

    let (done, finished) = bounded(1);
    let fade_done = done.clone();
    track.fade(0.0, 1.0, 500.0, move |track| {
        println!("Faded in to {:.2}", track.volume());
        let _ = fade_done.send(());
    });
    let _ = finished.recv_timeout(Duration::from_secs(2));

    track.tremolo(Some(TremoloSettings::new(250.0).with_intensity(0.4)));
    std::thread::sleep(Duration::from_millis(800));
    println!("Tremolo phase: {:?}", track.tremolo_phase());
    track.tremolo(None);

    track.fade_out(500.0, move |track| {
        track.pause();
        let _ = done.send(());
    });
    let _ = finished.recv_timeout(Duration::from_secs(2));
    println!("Stopped at volume {:.2}", track.volume());

    Ok(())
}
