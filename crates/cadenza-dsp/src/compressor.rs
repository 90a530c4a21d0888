//! Dynamics compressor controller and presets.
//!
//! A fresh compressor node starts at the engine defaults (ratio 12,
//! threshold -24 dB), which compress audibly. Tracks switch to the `Off`
//! preset when their graph is wired unless the user configured the
//! compressor first; [`Compressor::is_initialized`] records that.

use crate::{Error, Result};
use cadenza_core::{AtomicFlag, AudioParam, CompressorNode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Writable compressor parameters. Gain reduction is read through
/// [`Compressor::reduction`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressorParam {
    /// Seconds to start attenuating, 0 to 1.
    Attack,
    /// Seconds to stop attenuating, 0 to 1.
    Release,
    /// dB, -100 to 0.
    Threshold,
    /// 1 to 22.
    Ratio,
    /// dB, 0 to 40.
    Knee,
}

impl CompressorParam {
    pub const ALL: [CompressorParam; 5] = [
        CompressorParam::Attack,
        CompressorParam::Release,
        CompressorParam::Threshold,
        CompressorParam::Ratio,
        CompressorParam::Knee,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Release => "release",
            Self::Threshold => "threshold",
            Self::Ratio => "ratio",
            Self::Knee => "knee",
        }
    }
}

impl fmt::Display for CompressorParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressorParam {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "attack" => Ok(Self::Attack),
            "release" => Ok(Self::Release),
            "threshold" => Ok(Self::Threshold),
            "ratio" => Ok(Self::Ratio),
            "knee" => Ok(Self::Knee),
            "reduction" => Err(Error::ReadOnlyParameter(s.to_string())),
            _ => Err(Error::UnknownParameter(s.to_string())),
        }
    }
}

/// A partial set of compressor values. Absent fields are left untouched
/// when applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorSettings {
    pub ratio: Option<f32>,
    pub threshold: Option<f32>,
    pub attack: Option<f32>,
    pub release: Option<f32>,
    pub knee: Option<f32>,
}

impl CompressorSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ratio(mut self, ratio: f32) -> Self {
        self.ratio = Some(ratio);
        self
    }

    pub fn threshold(mut self, db: f32) -> Self {
        self.threshold = Some(db);
        self
    }

    pub fn attack(mut self, seconds: f32) -> Self {
        self.attack = Some(seconds);
        self
    }

    pub fn release(mut self, seconds: f32) -> Self {
        self.release = Some(seconds);
        self
    }

    pub fn knee(mut self, db: f32) -> Self {
        self.knee = Some(db);
        self
    }

    pub fn get(&self, param: CompressorParam) -> Option<f32> {
        match param {
            CompressorParam::Attack => self.attack,
            CompressorParam::Release => self.release,
            CompressorParam::Threshold => self.threshold,
            CompressorParam::Ratio => self.ratio,
            CompressorParam::Knee => self.knee,
        }
    }

    /// Present fields in application order.
    pub fn values(&self) -> impl Iterator<Item = (CompressorParam, f32)> + '_ {
        [
            CompressorParam::Ratio,
            CompressorParam::Threshold,
            CompressorParam::Attack,
            CompressorParam::Release,
            CompressorParam::Knee,
        ]
        .into_iter()
        .filter_map(|p| self.get(p).map(|v| (p, v)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressorPreset {
    /// Engine defaults: noticeable, general-purpose compression.
    #[default]
    Default,
    Mild,
    Heavy,
    /// Ratio 1 at 0 dB: no compression.
    Off,
}

impl CompressorPreset {
    pub fn settings(self) -> CompressorSettings {
        let s = CompressorSettings::new();
        match self {
            Self::Default => s.ratio(12.0).threshold(-24.0).attack(0.003).release(0.025).knee(30.0),
            Self::Mild => s.ratio(3.0).threshold(-18.0).attack(0.003).release(0.025).knee(26.0),
            Self::Heavy => s.ratio(10.0).threshold(-24.0).attack(0.008).release(0.015).knee(20.0),
            Self::Off => s.ratio(1.0).threshold(0.0),
        }
    }
}

impl FromStr for CompressorPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Self::Default),
            "mild" => Ok(Self::Mild),
            "heavy" => Ok(Self::Heavy),
            "off" => Ok(Self::Off),
            _ => Err(Error::UnknownPreset(s.to_string())),
        }
    }
}

/// Control-side view of one compressor node.
#[derive(Debug)]
pub struct Compressor {
    node: Arc<CompressorNode>,
    initialized: AtomicFlag,
}

impl Compressor {
    pub fn new(node: Arc<CompressorNode>) -> Self {
        Self {
            node,
            initialized: AtomicFlag::new(false),
        }
    }

    pub fn node(&self) -> &Arc<CompressorNode> {
        &self.node
    }

    fn param(&self, param: CompressorParam) -> &AudioParam {
        match param {
            CompressorParam::Attack => &self.node.attack,
            CompressorParam::Release => &self.node.release,
            CompressorParam::Threshold => &self.node.threshold,
            CompressorParam::Ratio => &self.node.ratio,
            CompressorParam::Knee => &self.node.knee,
        }
    }

    pub fn get(&self, param: CompressorParam) -> f32 {
        self.param(param).value()
    }

    /// Write one parameter, clamped to the node's range.
    pub fn set(&self, param: CompressorParam, value: f32) -> &Self {
        self.param(param).set_value(value);
        self.initialized.set(true);
        self
    }

    pub fn apply(&self, settings: &CompressorSettings) -> &Self {
        for (param, value) in settings.values() {
            self.param(param).set_value(value);
        }
        self.initialized.set(true);
        self
    }

    pub fn apply_preset(&self, preset: CompressorPreset) -> &Self {
        tracing::debug!(?preset, "Applying compressor preset");
        self.apply(&preset.settings())
    }

    /// Threshold back to 0 dB. Does not count as configuring the compressor.
    pub fn reset(&self) -> &Self {
        self.node.threshold.set_value(0.0);
        self
    }

    /// Gain reduction in dB, as last reported by the engine.
    pub fn reduction(&self) -> f32 {
        self.node.reduction()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Apply [`CompressorPreset::Off`] unless something was configured
    /// already. Returns whether the preset was applied.
    pub fn settle(&self) -> bool {
        if self.is_initialized() {
            return false;
        }
        self.apply_preset(CompressorPreset::Off);
        true
    }

    pub fn snapshot(&self) -> CompressorSettings {
        CompressorSettings {
            ratio: Some(self.get(CompressorParam::Ratio)),
            threshold: Some(self.get(CompressorParam::Threshold)),
            attack: Some(self.get(CompressorParam::Attack)),
            release: Some(self.get(CompressorParam::Release)),
            knee: Some(self.get(CompressorParam::Knee)),
        }
    }
}
