use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tapbeat_audio::OutputConfig;
use tapbeat_sequencer::{SequencerConfig, TimingPolicy};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub sequencer: SequencerConfig,
    pub output: OutputConfig,
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub timing: Option<TimingPolicy>,
    pub device: Option<String>,
    pub gain: Option<f32>,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(timing) = overrides.timing {
            self.sequencer.timing = timing;
        }
        if overrides.device.is_some() {
            self.output.device = overrides.device;
        }
        if let Some(gain) = overrides.gain {
            self.output.gain = gain.clamp(0.0, 1.0);
        }
        self
    }
}
