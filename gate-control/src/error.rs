//! Erros de controle

use gate_actuator::ActuatorError;
use gate_core::CoreError;
use gate_sensor::SensorError;
use thiserror::Error;

pub type ControlResult<T> = Result<T, ControlError>;

/// Erros de controle
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Erro do guarda de atuação
    #[error("Actuator error: {0}")]
    Actuator(#[from] ActuatorError),

    /// Erro do classificador
    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    /// Erro do núcleo
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Mais de uma comporta aberta, ou contabilidade divergente
    #[error("Gate invariant violated: {0}")]
    InvariantViolation(String),

    /// Configuração inválida
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
