//! The seam between Cadenza and the engine that actually renders audio.

use super::{AudioBuffer, NodeHandle, NodeId};
use crate::Result;
use std::sync::Arc;

/// Called once per processor block, from whatever thread renders audio.
pub type ProcessCallback = Arc<dyn Fn() + Send + Sync>;

/// Audio node engine.
///
/// Implementations own mixing, scheduling and decoding. Cadenza hands them
/// every node it creates and every edge it wires; node parameters are shared
/// atomics, so the engine picks up changes without further calls.
pub trait AudioBackend: Send + Sync {
    /// A fresh id, unique across every graph on this backend. Never
    /// returns [`AudioGraph::DESTINATION`](super::AudioGraph::DESTINATION).
    fn allocate_node_id(&self) -> NodeId;

    /// A new node exists. Called exactly once per node.
    fn register_node(&self, node: NodeHandle);

    /// Route the output of `from` into `to`. [`AudioGraph::DESTINATION`](super::AudioGraph::DESTINATION)
    /// is the hardware output.
    fn connect(&self, from: NodeId, to: NodeId);

    /// Install the block callback of a processor node. Replaces any previous one.
    fn set_process_callback(&self, processor: NodeId, callback: ProcessCallback);

    /// Decode an encoded audio file into a buffer.
    fn decode_audio_data(&self, bytes: &[u8]) -> Result<AudioBuffer>;

    fn sample_rate(&self) -> f64;
}
