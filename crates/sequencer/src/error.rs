use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SequencerError {
    #[error("cannot play an empty beat pattern")]
    EmptyPattern,
    #[error("step duration must be a positive number of seconds, got {0}")]
    InvalidStepDuration(f64),
}
