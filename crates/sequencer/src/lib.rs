pub mod config;
pub mod error;
pub mod sequencer;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::{SequencerConfig, TimingPolicy};
pub use error::SequencerError;
pub use sequencer::Sequencer;
pub use session::{step_duration, PlaybackSession};
