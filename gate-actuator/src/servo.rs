//! Configuração de servos por canal e resolução de posições
//!
//! O driver recebe a posição já resolvida; aqui se decide qual extremo é
//! "aberto" e qual é "fechado" de acordo com a orientação da comporta.

use gate_core::{Direction, GateId, MAX_CHANNELS};
use serde::{Deserialize, Serialize};

use crate::error::{ActuatorError, ActuatorResult};

/// Posição máxima aceita pelo servo (graus)
pub const MAX_SERVO_POSITION: u16 = 180;
/// Tempo de assentamento padrão (ms)
pub const DEFAULT_SETTLE_MS: u64 = 1_000;

/// Configuração do servo de um canal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServoConfig {
    /// Posição mínima (graus)
    pub min_position: u16,
    /// Posição máxima (graus)
    pub max_position: u16,
    /// `true`: mínimo = aberto, máximo = fechado. `false` inverte.
    pub closed_at_max: bool,
    /// Canal com servo físico? Desabilitado nunca chama o driver.
    pub enabled: bool,
    /// Espera após abrir (ms)
    pub open_settle_ms: u64,
    /// Espera após fechar (ms)
    pub close_settle_ms: u64,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_position: 0,
            max_position: MAX_SERVO_POSITION,
            closed_at_max: true,
            enabled: true,
            open_settle_ms: DEFAULT_SETTLE_MS,
            close_settle_ms: DEFAULT_SETTLE_MS,
        }
    }
}

impl ServoConfig {
    /// Canal sem servo físico
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ActuatorResult<()> {
        if self.min_position >= self.max_position {
            return Err(ActuatorError::InvalidConfig(format!(
                "min_position ({}) must be less than max_position ({})",
                self.min_position, self.max_position
            )));
        }
        if self.max_position > MAX_SERVO_POSITION {
            return Err(ActuatorError::InvalidConfig(format!(
                "max_position ({}) exceeds {}",
                self.max_position, MAX_SERVO_POSITION
            )));
        }
        Ok(())
    }

    /// Posição física para a direção pedida
    pub fn position(&self, direction: Direction) -> u16 {
        match (direction, self.closed_at_max) {
            (Direction::Open, true) | (Direction::Close, false) => self.min_position,
            (Direction::Open, false) | (Direction::Close, true) => self.max_position,
        }
    }

    /// Tempo de assentamento para a direção pedida
    pub fn settle_delay_ms(&self, direction: Direction) -> u64 {
        match direction {
            Direction::Open => self.open_settle_ms,
            Direction::Close => self.close_settle_ms,
        }
    }
}

/// Conjunto de servos, um por canal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServoBank {
    servos: Vec<ServoConfig>,
}

impl ServoBank {
    pub fn new(servos: Vec<ServoConfig>) -> ActuatorResult<Self> {
        if servos.is_empty() || servos.len() > MAX_CHANNELS {
            return Err(ActuatorError::InvalidConfig(format!(
                "Servo count must be 1..={}, got {}",
                MAX_CHANNELS,
                servos.len()
            )));
        }
        for servo in &servos {
            servo.validate()?;
        }
        Ok(Self { servos })
    }

    /// `count` servos com a configuração padrão
    pub fn uniform(count: usize) -> ActuatorResult<Self> {
        Self::new(vec![ServoConfig::default(); count])
    }

    pub fn len(&self) -> usize {
        self.servos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servos.is_empty()
    }

    pub fn get(&self, gate: GateId) -> ActuatorResult<&ServoConfig> {
        self.servos.get(gate.index()).ok_or(ActuatorError::InvalidGate {
            index: gate.index(),
            count: self.servos.len(),
        })
    }

    pub fn is_enabled(&self, gate: GateId) -> bool {
        self.servos.get(gate.index()).is_some_and(|s| s.enabled)
    }

    /// Canais com servo físico
    pub fn enabled(&self) -> impl Iterator<Item = (GateId, &ServoConfig)> {
        GateId::all(self.servos.len())
            .zip(&self.servos)
            .filter(|(_, s)| s.enabled)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServoConfig> {
        self.servos.iter()
    }
}
