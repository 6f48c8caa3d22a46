//! Relatórios do controlador

use gate_actuator::OperationRecord;
use gate_core::{GateCommand, GateId, GateSelection, Timestamp};
use gate_sensor::ChannelSnapshot;
use serde::{Deserialize, Serialize};

use crate::arbiter::ArbiterMode;

/// Resultado de um ciclo de controle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Instante do ciclo (ms)
    pub now: Timestamp,
    /// Estado travado de cada canal após a classificação
    pub active: Vec<bool>,
    /// Comando emitido pelo árbitro
    pub command: Option<GateCommand>,
    /// O comando ficou parcial ou totalmente na fila
    pub deferred: bool,
    /// Operações da fila executadas neste ciclo
    pub from_queue: Vec<OperationRecord>,
    /// Comporta aberta ao final do ciclo
    pub open_gate: Option<GateId>,
    /// Trava de erro acionada
    pub error_latched: bool,
}

/// Retrato completo do controlador, disponível mesmo com a trava acionada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub open_gate: Option<GateId>,
    pub desired: GateSelection,
    pub mode: ArbiterMode,
    pub active: Vec<bool>,
    pub candidate: GateSelection,
    pub pending_commit: Option<Timestamp>,
    pub queued: Vec<OperationRecord>,
    pub error_latched: bool,
    pub ops_in_window: usize,
    pub cycles: u64,
    pub channels: Vec<ChannelSnapshot>,
}
