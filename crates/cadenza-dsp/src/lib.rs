//! Effect controllers layered over the graph nodes of `cadenza-core`: the
//! dynamics compressor and its presets, named convolution sends, and the
//! level meter fed by the processor node. No sample processing happens here;
//! every controller only reads and writes node parameters.

mod error;
pub use error::{Error, Result};

mod compressor;
pub use compressor::{Compressor, CompressorParam, CompressorPreset, CompressorSettings};

mod convolver;
pub use convolver::{ConvolverEffect, ConvolverRegistry};

mod meter;
pub use meter::LevelMeter;
