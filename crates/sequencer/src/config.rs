use serde::{Deserialize, Serialize};

/// What the loop does when a step runs late.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TimingPolicy {
    /// Wait the full step after every step. Time spent triggering is never
    /// paid back, so lateness accumulates.
    #[default]
    Accumulate,
    /// Step `i` is due at `start + i * step`. A late step fires immediately;
    /// no step is skipped.
    FixedSchedule,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SequencerConfig {
    pub timing: TimingPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_accumulate() {
        let config: SequencerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.timing, TimingPolicy::Accumulate);
        let fixed: SequencerConfig = serde_yaml::from_str("timing: fixed-schedule").unwrap();
        assert_eq!(fixed.timing, TimingPolicy::FixedSchedule);
    }
}
