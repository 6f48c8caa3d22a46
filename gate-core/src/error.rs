//! Erros do núcleo

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Erros do núcleo
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Índice de comporta fora do intervalo configurado
    #[error("Invalid gate index {index} (gate count is {count})")]
    InvalidGate { index: usize, count: usize },

    /// Número de canais inválido
    #[error("Invalid channel count {0} (must be 1..=8)")]
    InvalidChannelCount(usize),

    /// Configuração inválida
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
