use super::node::*;
use super::{AudioBackend, ProcessCallback};
use crate::config::PanningModel;
use crate::platform::MediaElement;
use parking_lot::Mutex;
use std::sync::Arc;

/// Control-side view of one track's graph.
///
/// Constructs typed nodes with ids drawn from the backend, forwards them to
/// it and keeps a record of every edge so the topology can be inspected.
/// Several graphs may share one backend; their node ids never collide.
pub struct AudioGraph {
    backend: Arc<dyn AudioBackend>,
    nodes: Mutex<Vec<(NodeId, NodeKind)>>,
    edges: Mutex<Vec<(NodeId, NodeId)>>,
}

impl AudioGraph {
    /// The hardware output, shared by every graph on a backend.
    pub const DESTINATION: NodeId = NodeId(0);

    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            backend,
            nodes: Mutex::new(vec![(Self::DESTINATION, NodeKind::Destination)]),
            edges: Mutex::new(Vec::new()),
        }
    }

    pub fn backend(&self) -> &Arc<dyn AudioBackend> {
        &self.backend
    }

    pub fn destination(&self) -> NodeId {
        Self::DESTINATION
    }

    fn allocate(&self) -> NodeId {
        self.backend.allocate_node_id()
    }

    fn register(&self, node: NodeHandle) {
        tracing::trace!("Registering {:?} as {}", node.kind(), node.id());
        self.nodes.lock().push((node.id(), node.kind()));
        self.backend.register_node(node);
    }

    pub fn media_source(&self, media: Arc<dyn MediaElement>) -> Arc<MediaSourceNode> {
        let node = Arc::new(MediaSourceNode::new(self.allocate(), media));
        self.register(NodeHandle::MediaSource(node.clone()));
        node
    }

    pub fn compressor(&self) -> Arc<CompressorNode> {
        let node = Arc::new(CompressorNode::new(self.allocate()));
        self.register(NodeHandle::Compressor(node.clone()));
        node
    }

    pub fn panner(&self, model: PanningModel, position: [f32; 3]) -> Arc<PannerNode> {
        let node = Arc::new(PannerNode::new(self.allocate(), model, position));
        self.register(NodeHandle::Panner(node.clone()));
        node
    }

    pub fn gain(&self, initial: f32) -> Arc<GainNode> {
        let node = Arc::new(GainNode::new(self.allocate(), initial));
        self.register(NodeHandle::Gain(node.clone()));
        node
    }

    pub fn analyser(&self, fft_size: usize, smoothing: f32) -> Arc<AnalyserNode> {
        let node = Arc::new(AnalyserNode::new(self.allocate(), fft_size, smoothing));
        self.register(NodeHandle::Analyser(node.clone()));
        node
    }

    pub fn processor(&self, buffer_size: usize) -> Arc<ProcessorNode> {
        let node = Arc::new(ProcessorNode::new(self.allocate(), buffer_size));
        self.register(NodeHandle::Processor(node.clone()));
        node
    }

    pub fn convolver(&self) -> Arc<ConvolverNode> {
        let node = Arc::new(ConvolverNode::new(self.allocate()));
        self.register(NodeHandle::Convolver(node.clone()));
        node
    }

    /// Wire `from` into `to`. Repeated edges are forwarded once.
    pub fn connect(&self, from: NodeId, to: NodeId) -> &Self {
        {
            let mut edges = self.edges.lock();
            if edges.contains(&(from, to)) {
                return self;
            }
            edges.push((from, to));
        }
        tracing::trace!("Connecting {} -> {}", from, to);
        self.backend.connect(from, to);
        self
    }

    /// Wire a linear chain: `chain[0] -> chain[1] -> ...`.
    pub fn connect_chain(&self, chain: &[NodeId]) -> &Self {
        for pair in chain.windows(2) {
            self.connect(pair[0], pair[1]);
        }
        self
    }

    pub fn set_process_callback(&self, processor: NodeId, callback: ProcessCallback) {
        self.backend.set_process_callback(processor, callback);
    }

    pub fn is_connected(&self, from: NodeId, to: NodeId) -> bool {
        self.edges.lock().contains(&(from, to))
    }

    /// Edges in the order they were wired.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.edges.lock().clone()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.lock().len()
    }

    pub fn kind_of(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes
            .lock()
            .iter()
            .find(|(node, _)| *node == id)
            .map(|(_, kind)| *kind)
    }
}

impl std::fmt::Debug for AudioGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioGraph")
            .field("nodes", &self.nodes.lock().len())
            .field("edges", &*self.edges.lock())
            .finish()
    }
}
