pub mod pipeline;
pub mod quantize;

pub use pipeline::{load_taps, QuantizationPipeline, TapAnalysisJob, TapSource};
pub use quantize::{quantize, MinGapQuantizer};
