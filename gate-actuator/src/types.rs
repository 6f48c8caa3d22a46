//! Tipos de dados do guarda de atuador

use gate_core::{Direction, GateId, Timestamp, elapsed_ms};
use serde::{Deserialize, Serialize};

/// Resultado de um pedido admitido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Admission {
    /// Driver invocado e operação registrada
    Executed,
    /// Intervalo mínimo pendente; operação guardada na fila
    Deferred,
    /// Canal desabilitado: nada a mover, contabilidade segue
    Skipped,
}

impl Admission {
    /// A posição da comporta está confirmada?
    pub fn is_confirmed(self) -> bool {
        matches!(self, Admission::Executed | Admission::Skipped)
    }
}

/// Uma operação de atuador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub gate: GateId,
    pub direction: Direction,
    /// Instante do pedido (ms)
    pub requested_at: Timestamp,
}

impl OperationRecord {
    pub fn new(gate: GateId, direction: Direction, requested_at: Timestamp) -> Self {
        Self {
            gate,
            direction,
            requested_at,
        }
    }
}

/// Buffer circular com os instantes das últimas M operações executadas
#[derive(Debug, Clone)]
pub struct OperationHistory {
    slots: Vec<Option<Timestamp>>,
    write_index: usize,
}

impl OperationHistory {
    /// Histórico com `capacity` posições (mínimo 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            write_index: 0,
        }
    }

    /// Registra uma operação, sobrescrevendo a mais antiga
    pub fn record(&mut self, at: Timestamp) {
        self.slots[self.write_index] = Some(at);
        self.write_index = (self.write_index + 1) % self.slots.len();
    }

    /// Operações mais novas que `now - window_ms`
    pub fn count_within(&self, now: Timestamp, window_ms: u64) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|&&at| elapsed_ms(now, at) < window_ms)
            .count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Total de posições ocupadas
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
