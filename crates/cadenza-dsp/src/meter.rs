//! Output level estimate from analyser bins.

use cadenza_core::AnalyserNode;
use parking_lot::Mutex;

/// Averages an analyser's byte-scaled frequency bins and weights the result
/// by the track volume. A rough loudness figure, not a calibrated meter.
#[derive(Debug, Default)]
pub struct LevelMeter {
    scratch: Mutex<Vec<u8>>,
}

impl LevelMeter {
    pub fn new(bin_count: usize) -> Self {
        Self {
            scratch: Mutex::new(vec![0; bin_count]),
        }
    }

    /// `mean(bins) * volume`. Zero when the analyser has no bins.
    pub fn average(&self, analyser: &AnalyserNode, volume: f32) -> f32 {
        let mut scratch = self.scratch.lock();
        scratch.resize(analyser.frequency_bin_count(), 0);
        if scratch.is_empty() {
            return 0.0;
        }
        analyser.byte_frequency_data(&mut scratch);
        let sum: u32 = scratch.iter().map(|&b| u32::from(b)).sum();
        (sum as f32 / scratch.len() as f32) * volume
    }
}
