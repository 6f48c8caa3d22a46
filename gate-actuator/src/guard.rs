//! # Guarda do atuador (proteção contra flutter)
//!
//! Toda operação física passa por aqui. Ordem de admissão:
//!
//! 1. trava de erro acionada → recusa ([`ActuatorError::ErrorState`])
//! 2. operações na janela global ≥ limite → aciona a trava e recusa
//!    ([`ActuatorError::FlutterTripped`])
//! 3. intervalo mínimo da comporta não decorrido → fila, uma posição por
//!    comporta, último pedido vence ([`Admission::Deferred`])
//! 4. executa no driver e registra ([`Admission::Executed`])
//!
//! A trava nunca é liberada; só reiniciando o processo.

use gate_core::env;
use gate_core::{ActuatorDriver, Direction, GateId, Timestamp, elapsed_ms};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{ActuatorError, ActuatorResult};
use crate::servo::ServoBank;
use crate::types::{Admission, OperationHistory, OperationRecord};

/// Janela do limite global (ms)
pub const RATE_WINDOW_MS: u64 = 60_000;

/// Configuração do guarda
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Intervalo mínimo entre operações na mesma comporta (ms)
    pub min_interval_ms: u64,
    /// Máximo de operações dentro da janela
    pub max_ops_per_minute: usize,
    /// Tamanho da janela (ms)
    pub window_ms: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: env::DEFAULT_MIN_SERVO_INTERVAL_MS,
            max_ops_per_minute: env::DEFAULT_MAX_OPS_PER_MINUTE,
            window_ms: RATE_WINDOW_MS,
        }
    }
}

impl GuardConfig {
    /// Configuração com os valores do ambiente (`GATE_*`)
    pub fn from_env() -> Self {
        Self {
            min_interval_ms: *env::MIN_SERVO_INTERVAL_MS,
            max_ops_per_minute: *env::MAX_OPS_PER_MINUTE,
            window_ms: RATE_WINDOW_MS,
        }
    }

    pub fn validate(&self) -> ActuatorResult<()> {
        if self.max_ops_per_minute == 0 {
            return Err(ActuatorError::InvalidConfig(
                "max_ops_per_minute must be at least 1".into(),
            ));
        }
        if self.window_ms == 0 {
            return Err(ActuatorError::InvalidConfig("window_ms must be positive".into()));
        }
        Ok(())
    }
}

/// Guarda de atuação: limita, enfileira e trava
#[derive(Debug)]
pub struct ActuatorGuard<D: ActuatorDriver> {
    config: GuardConfig,
    servos: ServoBank,
    driver: D,
    error_latched: bool,
    history: OperationHistory,
    last_operation: Vec<Option<Timestamp>>,
    pending: Vec<Option<OperationRecord>>,
}

impl<D: ActuatorDriver> ActuatorGuard<D> {
    pub fn new(config: GuardConfig, servos: ServoBank, driver: D) -> ActuatorResult<Self> {
        config.validate()?;
        let count = servos.len();
        Ok(Self {
            history: OperationHistory::new(config.max_ops_per_minute),
            config,
            servos,
            driver,
            error_latched: false,
            last_operation: vec![None; count],
            pending: vec![None; count],
        })
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn servos(&self) -> &ServoBank {
        &self.servos
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn gate_count(&self) -> usize {
        self.servos.len()
    }

    /// Trava de erro acionada?
    pub fn is_in_error_state(&self) -> bool {
        self.error_latched
    }

    /// Instante da última operação executada na comporta
    pub fn last_operation(&self, gate: GateId) -> Option<Timestamp> {
        self.last_operation.get(gate.index()).copied().flatten()
    }

    /// Operações executadas dentro da janela
    pub fn ops_in_window(&self, now: Timestamp) -> usize {
        self.history.count_within(now, self.config.window_ms)
    }

    /// Operação pendente da comporta
    pub fn pending(&self, gate: GateId) -> Option<OperationRecord> {
        self.pending.get(gate.index()).copied().flatten()
    }

    /// Todas as operações pendentes, em ordem de comporta
    pub fn pending_operations(&self) -> Vec<OperationRecord> {
        self.pending.iter().flatten().copied().collect()
    }

    /// Descarta a operação pendente da comporta
    pub fn discard_pending(&mut self, gate: GateId) -> Option<OperationRecord> {
        let discarded = self.pending.get_mut(gate.index())?.take();
        if let Some(op) = discarded {
            debug!(gate = %op.gate, direction = %op.direction, "pending operation discarded");
        }
        discarded
    }

    pub fn request_open(&mut self, gate: GateId, now: Timestamp) -> ActuatorResult<Admission> {
        self.request(gate, Direction::Open, now)
    }

    pub fn request_close(&mut self, gate: GateId, now: Timestamp) -> ActuatorResult<Admission> {
        self.request(gate, Direction::Close, now)
    }

    /// Pede uma operação; executa, adia ou recusa
    pub fn request(
        &mut self,
        gate: GateId,
        direction: Direction,
        now: Timestamp,
    ) -> ActuatorResult<Admission> {
        self.check_gate(gate)?;
        self.check_latch(now)?;

        if !self.servos.is_enabled(gate) {
            debug!(gate = %gate, direction = %direction, "channel disabled, skipping driver");
            return Ok(Admission::Skipped);
        }

        if let Err(reason) = self.check_interval(gate, now) {
            let op = OperationRecord::new(gate, direction, now);
            let superseded = self.pending[gate.index()].replace(op);
            debug!(
                gate = %gate,
                direction = %direction,
                superseded = superseded.is_some(),
                %reason,
                "operation deferred"
            );
            return Ok(Admission::Deferred);
        }

        self.execute(gate, direction, now)?;
        self.pending[gate.index()] = None;
        Ok(Admission::Executed)
    }

    /// Executa operações pendentes cujo intervalo já decorreu.
    ///
    /// Cada uma passa de novo pela admissão completa, então a trava pode
    /// disparar aqui. Falha do driver mantém a operação na fila. Retorna as
    /// operações executadas nesta chamada.
    pub fn process_queue(&mut self, now: Timestamp) -> Vec<OperationRecord> {
        let mut executed = Vec::new();

        for gate in GateId::all(self.pending.len()) {
            if self.error_latched {
                break;
            }
            let Some(op) = self.pending[gate.index()] else {
                continue;
            };
            if self.check_interval(gate, now).is_err() {
                continue;
            }

            self.pending[gate.index()] = None;
            match self.request(gate, op.direction, now) {
                Ok(Admission::Executed) => {
                    info!(
                        gate = %gate,
                        direction = %op.direction,
                        requested_at = op.requested_at,
                        "queued operation executed"
                    );
                    executed.push(op);
                }
                Ok(_) => {}
                Err(err) if err.is_latched() => break,
                Err(err) => {
                    warn!(gate = %gate, %err, "queued operation failed, keeping it queued");
                    self.pending[gate.index()] = Some(op);
                }
            }
        }
        executed
    }

    /// Leva todas as comportas habilitadas à posição fechada.
    ///
    /// Homing de partida: não conta para os limites e não passa pela fila.
    pub fn initialize_gates(&mut self) -> ActuatorResult<usize> {
        let mut homed = 0;
        let targets: Vec<_> = self
            .servos
            .enabled()
            .map(|(gate, servo)| {
                (
                    gate,
                    servo.position(Direction::Close),
                    servo.settle_delay_ms(Direction::Close),
                )
            })
            .collect();

        for (gate, position, settle) in targets {
            self.driver.move_to(gate.index(), position, settle)?;
            homed += 1;
        }
        info!(homed, "gates homed to closed position");
        Ok(homed)
    }

    fn check_gate(&self, gate: GateId) -> ActuatorResult<()> {
        if gate.index() >= self.servos.len() {
            return Err(ActuatorError::InvalidGate {
                index: gate.index(),
                count: self.servos.len(),
            });
        }
        Ok(())
    }

    fn check_latch(&mut self, now: Timestamp) -> ActuatorResult<()> {
        if self.error_latched {
            return Err(ActuatorError::ErrorState);
        }

        let ops = self.ops_in_window(now);
        if ops >= self.config.max_ops_per_minute {
            self.error_latched = true;
            error!(
                ops,
                window_ms = self.config.window_ms,
                "flutter protection tripped, actuation disabled until restart"
            );
            return Err(ActuatorError::FlutterTripped {
                ops,
                window_ms: self.config.window_ms,
            });
        }
        Ok(())
    }

    fn check_interval(&self, gate: GateId, now: Timestamp) -> ActuatorResult<()> {
        let Some(last) = self.last_operation(gate) else {
            return Ok(());
        };
        let elapsed = elapsed_ms(now, last);
        if elapsed < self.config.min_interval_ms {
            return Err(ActuatorError::RateLimitExceeded {
                gate,
                elapsed_ms: elapsed,
                min_interval_ms: self.config.min_interval_ms,
            });
        }
        Ok(())
    }

    fn execute(
        &mut self,
        gate: GateId,
        direction: Direction,
        now: Timestamp,
    ) -> ActuatorResult<()> {
        let servo = self.servos.get(gate)?;
        let position = servo.position(direction);
        let settle = servo.settle_delay_ms(direction);

        self.driver.move_to(gate.index(), position, settle)?;

        self.last_operation[gate.index()] = Some(now);
        self.history.record(now);
        debug!(gate = %gate, direction = %direction, position, "gate moved");
        Ok(())
    }
}
