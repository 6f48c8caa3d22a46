//! Erros da camada de atuador

use gate_core::{CoreError, DriverError, GateId};
use thiserror::Error;

pub type ActuatorResult<T> = Result<T, ActuatorError>;

/// Erros de atuador
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActuatorError {
    /// Intervalo mínimo ainda não decorrido; a operação vai para a fila
    #[error("Rate limit on gate {gate}: {elapsed_ms}ms since last op (min {min_interval_ms}ms)")]
    RateLimitExceeded {
        gate: GateId,
        elapsed_ms: u64,
        min_interval_ms: u64,
    },

    /// Limite global estourado; trava permanente
    #[error("Flutter protection tripped: {ops} operations within {window_ms}ms")]
    FlutterTripped { ops: usize, window_ms: u64 },

    /// Pedido recusado: trava de erro já acionada
    #[error("Actuator guard is in error state")]
    ErrorState,

    /// O driver físico reportou falha
    #[error("Driver failed: {0}")]
    DriverFailed(String),

    /// Configuração inválida
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Comporta fora do intervalo configurado
    #[error("Invalid gate index {index} (gate count is {count})")]
    InvalidGate { index: usize, count: usize },
}

impl From<DriverError> for ActuatorError {
    fn from(err: DriverError) -> Self {
        ActuatorError::DriverFailed(err.to_string())
    }
}

impl From<CoreError> for ActuatorError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidGate { index, count } => ActuatorError::InvalidGate { index, count },
            other => ActuatorError::InvalidConfig(other.to_string()),
        }
    }
}

impl ActuatorError {
    /// Erro que indica a trava permanente (acionada agora ou antes)
    pub fn is_latched(&self) -> bool {
        matches!(self, ActuatorError::FlutterTripped { .. } | ActuatorError::ErrorState)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ActuatorError::RateLimitExceeded {
            gate: GateId::new(0).unwrap(),
            elapsed_ms: 500,
            min_interval_ms: 2000,
        };
        assert!(err.to_string().contains("gate #1"));
        assert!(err.to_string().contains("500ms"));
    }

    #[test]
    fn test_driver_error_conversion() {
        let err: ActuatorError = DriverError::AttachFailed(3).into();
        assert!(matches!(err, ActuatorError::DriverFailed(_)));
        assert!(err.to_string().contains("channel 3"));
    }

    #[test]
    fn test_core_error_conversion() {
        let err: ActuatorError = CoreError::InvalidGate { index: 9, count: 4 }.into();
        assert_eq!(err, ActuatorError::InvalidGate { index: 9, count: 4 });
    }

    #[test]
    fn test_latched_errors() {
        assert!(ActuatorError::ErrorState.is_latched());
        assert!(ActuatorError::FlutterTripped { ops: 10, window_ms: 60_000 }.is_latched());
        assert!(!ActuatorError::DriverFailed("x".into()).is_latched());
    }
}
