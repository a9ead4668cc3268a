use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::pattern::{BeatPattern, QuantizedBeat};
use crate::taps::TapTimestamps;

/// What a request layer hands back for one analysed performance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BeatReport {
    pub taps: TapTimestamps,
    pub beat: BeatPattern,
    pub min_interval: f64,
}

impl BeatReport {
    pub fn new(taps: TapTimestamps, quantized: QuantizedBeat) -> Self {
        Self {
            taps,
            beat: quantized.pattern,
            min_interval: quantized.step_seconds,
        }
    }

    pub fn quantized(&self) -> QuantizedBeat {
        QuantizedBeat::new(self.beat.clone(), self.min_interval)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Yaml,
}

pub trait ReportExporter {
    fn export(&self, report: &BeatReport, format: ExportFormat) -> Result<Vec<u8>, DomainError>;
}

pub struct SerdeExporter;

impl ReportExporter for SerdeExporter {
    fn export(&self, report: &BeatReport, format: ExportFormat) -> Result<Vec<u8>, DomainError> {
        match format {
            ExportFormat::Json => serde_json::to_vec_pretty(report)
                .map_err(|err| DomainError::Serialization(err.to_string())),
            ExportFormat::Yaml => serde_yaml::to_string(report)
                .map(String::into_bytes)
                .map_err(|err| DomainError::Serialization(err.to_string())),
        }
    }
}
