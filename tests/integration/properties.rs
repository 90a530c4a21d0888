//! Property-based tests
//!
//! Clamping and interpolation bounds over arbitrary inputs.

use crate::helpers::*;
use cadenza::automation::FadeCurve;
use cadenza::MAX_VOLUME;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn volume_always_within_range(volume in prop::num::f32::ANY) {
        let fx = test_track();
        fx.track.set_volume(volume);
        let v = fx.track.volume();
        prop_assert!((0.0..=MAX_VOLUME).contains(&v));
        prop_assert_eq!(fx.track.nodes().volume.gain.value(), v);
    }

    #[test]
    fn convolver_gain_always_within_unit_range(gain in prop::num::f32::ANY) {
        let fx = test_track();
        fx.track.add_convolver("send", "ir.wav", Some(gain));
        let initial = fx.track.convolver_gain("send").unwrap();
        prop_assert!((0.0..=1.0).contains(&initial));

        fx.track.set_convolver_gain("send", gain * 2.0);
        let updated = fx.track.convolver_gain("send").unwrap();
        prop_assert!((0.0..=1.0).contains(&updated));
    }

    #[test]
    fn fade_value_between_endpoints(
        start in 0.0f32..1.5,
        end in 0.0f32..1.5,
        duration in 1.0f64..5000.0,
        elapsed in -100.0f64..6000.0,
    ) {
        let curve = FadeCurve::new(start, end, duration);
        let v = curve.value_at(elapsed);
        prop_assert!(v >= start.min(end) - 1e-5);
        prop_assert!(v <= start.max(end) + 1e-5);
    }
}
