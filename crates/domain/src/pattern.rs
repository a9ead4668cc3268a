use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Cells in one default-length measure.
pub const DEFAULT_MEASURE_CELLS: usize = 16;

/// One flag per grid cell; `true` means a tap landed in that cell.
///
/// Serialized as a list of `0`/`1` integers.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct BeatPattern {
    steps: Vec<bool>,
}

impl BeatPattern {
    pub fn silent(cells: usize) -> Self {
        Self {
            steps: vec![false; cells],
        }
    }

    pub fn from_steps(steps: Vec<bool>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.steps.get(index).copied().unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.steps.iter().filter(|active| **active).count()
    }

    pub fn to_bits(&self) -> Vec<u8> {
        self.steps.iter().map(|active| u8::from(*active)).collect()
    }
}

impl TryFrom<Vec<u8>> for BeatPattern {
    type Error = DomainError;

    fn try_from(bits: Vec<u8>) -> Result<Self, Self::Error> {
        let steps = bits
            .into_iter()
            .enumerate()
            .map(|(index, bit)| match bit {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(DomainError::validation(format!(
                    "beat pattern cell {index} must be 0 or 1, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }
}

impl From<BeatPattern> for Vec<u8> {
    fn from(pattern: BeatPattern) -> Self {
        pattern.to_bits()
    }
}

/// Output of quantization: the pattern plus the seconds between its cells.
///
/// A `step_seconds` of zero means the performance had no usable rhythm and
/// must not be played back.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuantizedBeat {
    pub pattern: BeatPattern,
    pub step_seconds: f64,
}

impl QuantizedBeat {
    pub fn new(pattern: BeatPattern, step_seconds: f64) -> Self {
        Self {
            pattern,
            step_seconds,
        }
    }

    /// Sixteen silent cells with a zero step.
    pub fn no_rhythm() -> Self {
        Self::new(BeatPattern::silent(DEFAULT_MEASURE_CELLS), 0.0)
    }

    pub fn is_playable(&self) -> bool {
        self.step_seconds > 0.0 && !self.pattern.is_empty()
    }

    pub fn step_duration(&self) -> Option<Duration> {
        if self.is_playable() {
            Duration::try_from_secs_f64(self.step_seconds).ok()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_serializes_as_bits() {
        let pattern = BeatPattern::from_steps(vec![true, true, false, true]);
        assert_eq!(serde_json::to_string(&pattern).unwrap(), "[1,1,0,1]");
        let parsed: BeatPattern = serde_json::from_str("[0,1]").unwrap();
        assert!(parsed.is_active(1));
        assert!(!parsed.is_active(0));
        assert!(serde_json::from_str::<BeatPattern>("[0,2]").is_err());
    }

    #[test]
    fn no_rhythm_is_not_playable() {
        let beat = QuantizedBeat::no_rhythm();
        assert_eq!(beat.pattern.len(), DEFAULT_MEASURE_CELLS);
        assert_eq!(beat.pattern.active_count(), 0);
        assert!(!beat.is_playable());
        assert_eq!(beat.step_duration(), None);
    }

    #[test]
    fn step_duration_for_playable_beat() {
        let beat = QuantizedBeat::new(BeatPattern::from_steps(vec![true]), 0.25);
        assert_eq!(beat.step_duration(), Some(Duration::from_millis(250)));
        assert!(!beat.pattern.is_active(7));
    }
}
