//! In-process backend that records the graph instead of rendering it.
//!
//! Used by tests and headless hosts: block callbacks run when the host asks
//! for a block, and WAV impulse responses decode through `hound`.

use super::{AudioBackend, AudioBuffer, NodeHandle, NodeId, ProcessCallback};
use crate::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct OfflineBackend {
    sample_rate: f64,
    next_id: AtomicU64,
    nodes: Mutex<HashMap<NodeId, NodeHandle>>,
    edges: Mutex<Vec<(NodeId, NodeId)>>,
    callbacks: Mutex<HashMap<NodeId, ProcessCallback>>,
}

impl OfflineBackend {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            next_id: AtomicU64::new(1),
            nodes: Mutex::new(HashMap::new()),
            edges: Mutex::new(Vec::new()),
            callbacks: Mutex::new(HashMap::new()),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<NodeHandle> {
        self.nodes.lock().get(&id).cloned()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.lock().len()
    }

    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.edges.lock().clone()
    }

    /// Run one block: every processor that has an input wired gets its
    /// callback invoked. Returns how many callbacks ran.
    pub fn process_block(&self) -> usize {
        let due: Vec<ProcessCallback> = {
            let edges = self.edges.lock();
            self.callbacks
                .lock()
                .iter()
                .filter(|(id, _)| edges.iter().any(|(_, to)| to == *id))
                .map(|(_, cb)| cb.clone())
                .collect()
        };
        for callback in &due {
            callback();
        }
        due.len()
    }
}

impl AudioBackend for OfflineBackend {
    fn allocate_node_id(&self) -> NodeId {
        NodeId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn register_node(&self, node: NodeHandle) {
        self.nodes.lock().insert(node.id(), node);
    }

    fn connect(&self, from: NodeId, to: NodeId) {
        self.edges.lock().push((from, to));
    }

    fn set_process_callback(&self, processor: NodeId, callback: ProcessCallback) {
        self.callbacks.lock().insert(processor, callback);
    }

    #[cfg(feature = "wav")]
    fn decode_audio_data(&self, bytes: &[u8]) -> Result<AudioBuffer> {
        decode_wav(bytes)
    }

    #[cfg(not(feature = "wav"))]
    fn decode_audio_data(&self, _bytes: &[u8]) -> Result<AudioBuffer> {
        Err(Error::Decode("built without a decoder (enable `wav`)".into()))
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl std::fmt::Debug for OfflineBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineBackend")
            .field("sample_rate", &self.sample_rate)
            .field("nodes", &self.nodes.lock().len())
            .field("edges", &self.edges.lock().len())
            .finish()
    }
}

#[cfg(feature = "wav")]
fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer> {
    let reader = hound::WavReader::new(std::io::Cursor::new(bytes))
        .map_err(|e| Error::Decode(e.to_string()))?;
    let spec = reader.spec();
    let channel_count = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<core::result::Result<_, _>>()
            .map_err(|e| Error::Decode(e.to_string()))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<core::result::Result<_, _>>()
                .map_err(|e| Error::Decode(e.to_string()))?
        }
    };

    let mut channels = vec![Vec::with_capacity(interleaved.len() / channel_count); channel_count];
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, sample) in channels.iter_mut().zip(frame) {
            channel.push(*sample);
        }
    }

    Ok(AudioBuffer::new(spec.sample_rate as f32, channels))
}
