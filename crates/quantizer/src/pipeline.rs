use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use tapbeat_domain::{BeatReport, TapTimestamps};

use crate::quantize::MinGapQuantizer;

/// Where a performance's taps come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TapSource {
    File(PathBuf),
    Inline(Vec<f64>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapAnalysisJob {
    pub source: TapSource,
}

/// Accepted layouts of a tap file: a bare array of seconds, or an object
/// carrying the array under `taps` (the shape of an analysis response).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TapFile {
    Bare(Vec<f64>),
    Wrapped { taps: Vec<f64> },
}

impl From<TapFile> for Vec<f64> {
    fn from(file: TapFile) -> Self {
        match file {
            TapFile::Bare(taps) | TapFile::Wrapped { taps } => taps,
        }
    }
}

pub struct QuantizationPipeline {
    quantizer: MinGapQuantizer,
}

impl QuantizationPipeline {
    pub fn new() -> Self {
        Self {
            quantizer: MinGapQuantizer,
        }
    }

    #[instrument(skip(self))]
    pub fn run(&self, job: &TapAnalysisJob) -> Result<BeatReport> {
        let taps = load_taps(&job.source)?;
        let quantized = self.quantizer.quantize(&taps);
        info!(
            taps = taps.len(),
            cells = quantized.pattern.len(),
            active = quantized.pattern.active_count(),
            step_seconds = quantized.step_seconds,
            "quantized performance"
        );
        Ok(BeatReport::new(taps, quantized))
    }
}

impl Default for QuantizationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_taps(source: &TapSource) -> Result<TapTimestamps> {
    let raw = match source {
        TapSource::Inline(times) => times.clone(),
        TapSource::File(path) => {
            let file =
                File::open(path).with_context(|| format!("open tap file {}", path.display()))?;
            let parsed: TapFile = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parse tap file {}", path.display()))?;
            parsed.into()
        }
    };
    Ok(TapTimestamps::new(raw)?)
}
