//! Named convolution sends.
//!
//! Each effect is a convolver feeding its own gain node, which feeds the
//! destination. The convolver stays silent until [`ConvolverEffect::attach`]
//! connects an input and installs the decoded impulse response.

use cadenza_core::{AtomicFlag, AudioBuffer, AudioGraph, ConvolverNode, GainNode, NodeId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

fn send_level(gain: f32) -> f32 {
    if gain.is_nan() {
        0.0
    } else {
        gain.clamp(0.0, 1.0)
    }
}

/// One convolution send.
#[derive(Debug)]
pub struct ConvolverEffect {
    name: String,
    gain: Arc<GainNode>,
    convolver: Arc<ConvolverNode>,
    ready: AtomicFlag,
}

impl ConvolverEffect {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gain_node(&self) -> &Arc<GainNode> {
        &self.gain
    }

    pub fn convolver_node(&self) -> &Arc<ConvolverNode> {
        &self.convolver
    }

    pub fn gain(&self) -> f32 {
        self.gain.gain.value()
    }

    /// Send level, clamped to 0..=1. NaN counts as silence.
    pub fn set_gain(&self, gain: f32) -> &Self {
        self.gain.gain.set_value(send_level(gain));
        self
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    pub fn buffer(&self) -> Option<Arc<AudioBuffer>> {
        self.convolver.buffer()
    }

    /// Route `input` into the convolver, install `buffer` and mark the effect
    /// ready. Only the first call has any effect; returns whether it did.
    pub fn attach(&self, graph: &AudioGraph, input: NodeId, buffer: Arc<AudioBuffer>) -> bool {
        if !self.ready.raise() {
            return false;
        }
        graph.connect(input, self.convolver.id());
        self.convolver.set_buffer(buffer);
        tracing::debug!(effect = %self.name, "Convolver attached");
        true
    }
}

/// Effects keyed by name. The first registration of a name wins.
#[derive(Debug, Default)]
pub struct ConvolverRegistry {
    effects: RwLock<HashMap<String, Arc<ConvolverEffect>>>,
}

impl ConvolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate and wire the nodes for a new effect at `gain` (clamped to
    /// 0..=1). Returns `None` without touching the graph if `name` is taken.
    pub fn register(
        &self,
        graph: &AudioGraph,
        name: impl Into<String>,
        gain: f32,
    ) -> Option<Arc<ConvolverEffect>> {
        let name = name.into();
        let mut effects = self.effects.write();
        if effects.contains_key(&name) {
            tracing::debug!(effect = %name, "Convolver already registered");
            return None;
        }

        let gain_node = graph.gain(send_level(gain));
        let convolver = graph.convolver();
        graph.connect_chain(&[convolver.id(), gain_node.id(), graph.destination()]);

        let effect = Arc::new(ConvolverEffect {
            name: name.clone(),
            gain: gain_node,
            convolver,
            ready: AtomicFlag::new(false),
        });
        effects.insert(name, effect.clone());
        Some(effect)
    }

    pub fn get(&self, name: &str) -> Option<Arc<ConvolverEffect>> {
        self.effects.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.effects.read().contains_key(name)
    }

    pub fn gain(&self, name: &str) -> Option<f32> {
        self.effects.read().get(name).map(|e| e.gain())
    }

    /// Returns false for unknown names.
    pub fn set_gain(&self, name: &str, gain: f32) -> bool {
        match self.effects.read().get(name) {
            Some(effect) => {
                effect.set_gain(gain);
                true
            }
            None => false,
        }
    }

    pub fn is_ready(&self, name: &str) -> bool {
        self.effects.read().get(name).is_some_and(|e| e.is_ready())
    }

    /// Sorted effect names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.effects.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.effects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.read().is_empty()
    }
}
