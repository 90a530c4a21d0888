//! Audio graph: typed nodes, the backend seam, and the control-side frontend.

mod backend;
mod net;
mod node;
mod offline;

pub use backend::{AudioBackend, ProcessCallback};
pub use net::AudioGraph;
pub use node::{
    AnalyserNode, AudioBuffer, AudioParam, CompressorNode, ConvolverNode, GainNode,
    MediaSourceNode, NodeHandle, NodeId, NodeKind, PannerNode, ProcessorNode,
};
pub use offline::OfflineBackend;
