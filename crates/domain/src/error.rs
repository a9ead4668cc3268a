use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("tap {index} is not a non-negative finite time: {value}")]
    InvalidTap { index: usize, value: f64 },
    #[error("tap {index} at {current}s precedes the previous tap at {previous}s")]
    UnsortedTaps {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DomainError {
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }
}
