//! Erros específicos do módulo de sensores

use gate_core::CoreError;
use thiserror::Error;

pub type SensorResult<T> = Result<T, SensorError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SensorError {
    #[error("Invalid channel {index} (channel count is {count})")]
    InvalidChannel { index: usize, count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}
