//! # Controlador
//!
//! Contexto único, construído na partida e avançado uma vez por ciclo.
//! Ordem dentro do ciclo:
//!
//! 1. amostra e classifica todos os canais
//! 2. alimenta o botão; sensor ativo cancela a seleção manual pendente
//! 3. árbitro decide no máximo um comando
//! 4. executa fechar-antes-de-abrir, cada passo confirmado antes do próximo
//! 5. descarta operações da fila que não levam mais ao desejado
//! 6. processa a fila do guarda
//! 7. atualiza os indicadores

use gate_actuator::{ActuatorGuard, OperationRecord};
use gate_core::{
    ActuatorDriver, Clock, Direction, GateCommand, GateId, GateSelection, IndicatorSink,
    RawSensorSource, Timestamp,
};
use gate_sensor::{CalibrationReport, SignalClassifier};
use tracing::{debug, info, warn};

use crate::arbiter::GateArbiter;
use crate::config::ControllerConfig;
use crate::error::ControlResult;
use crate::manual::ManualSelector;
use crate::types::{ControllerStatus, CycleReport};

/// Controlador do sistema de comportas
#[derive(Debug)]
pub struct Controller<S, D, I, C>
where
    D: ActuatorDriver,
{
    config: ControllerConfig,
    classifier: SignalClassifier,
    arbiter: GateArbiter,
    selector: ManualSelector,
    guard: ActuatorGuard<D>,
    source: S,
    indicators: I,
    clock: C,
    indicator_state: Vec<Option<bool>>,
    active: Vec<bool>,
    cycles: u64,
}

impl<S, D, I, C> Controller<S, D, I, C>
where
    S: RawSensorSource,
    D: ActuatorDriver,
    I: IndicatorSink,
    C: Clock,
{
    pub fn new(
        config: ControllerConfig,
        source: S,
        driver: D,
        indicators: I,
        clock: C,
    ) -> ControlResult<Self> {
        config.validate()?;
        let count = config.channel_count();

        let classifier =
            SignalClassifier::with_channels(config.classifier.clone(), &config.sensor_channels())?;
        let guard = ActuatorGuard::new(config.guard.clone(), config.servo_bank()?, driver)?;
        let arbiter = GateArbiter::with_actuated(config.actuated())?;
        let selector = ManualSelector::new(config.manual.clone(), count);

        Ok(Self {
            config,
            classifier,
            arbiter,
            selector,
            guard,
            source,
            indicators,
            clock,
            indicator_state: vec![None; count],
            active: vec![false; count],
            cycles: 0,
        })
    }

    /// Calibra os sensores, leva as comportas à posição fechada e apaga os
    /// indicadores.
    pub fn startup(&mut self) -> ControlResult<CalibrationReport> {
        let report = self.classifier.calibrate(&mut self.source)?;
        self.guard.initialize_gates()?;
        for gate in GateId::all(self.channel_count()) {
            self.write_indicator(gate, false);
        }
        info!(
            channels = self.channel_count(),
            degenerate = report.degenerate.len(),
            "controller started"
        );
        Ok(report)
    }

    /// Um ciclo de controle com o nível bruto atual do botão
    pub fn cycle(&mut self, button_pressed: bool) -> ControlResult<CycleReport> {
        let now = self.clock.now();

        self.classifier.sample_all(&mut self.source);
        self.active = self.classifier.classify_all();
        let sensing = self.active.iter().any(|&a| a);

        self.selector.on_button_edge(button_pressed, now);
        let manual = if sensing {
            self.selector.preempt();
            None
        } else {
            self.selector.poll(now)
        };

        let command = self.arbiter.tick(&self.active, manual)?;
        let deferred = match command {
            Some(cmd) => !self.execute(cmd, now)?,
            None => false,
        };

        self.prune_queue();
        let from_queue = self.drain_queue(now)?;
        self.arbiter.gates().check_invariant()?;
        self.refresh_indicators();
        self.cycles += 1;

        Ok(CycleReport {
            now,
            active: self.active.clone(),
            command,
            deferred,
            from_queue,
            open_gate: self.arbiter.gates().open_gate(),
            error_latched: self.guard.is_in_error_state(),
        })
    }

    /// Retrato do estado atual
    pub fn status(&self) -> ControllerStatus {
        let now = self.clock.now();
        ControllerStatus {
            open_gate: self.arbiter.gates().open_gate(),
            desired: self.arbiter.desired(),
            mode: self.arbiter.mode(),
            active: self.active.clone(),
            candidate: self.selector.candidate(),
            pending_commit: self.selector.pending_deadline(),
            queued: self.guard.pending_operations(),
            error_latched: self.guard.is_in_error_state(),
            ops_in_window: self.guard.ops_in_window(now),
            cycles: self.cycles,
            channels: self.classifier.snapshots(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn channel_count(&self) -> usize {
        self.config.channel_count()
    }

    pub fn classifier(&self) -> &SignalClassifier {
        &self.classifier
    }

    pub fn arbiter(&self) -> &GateArbiter {
        &self.arbiter
    }

    pub fn selector(&self) -> &ManualSelector {
        &self.selector
    }

    pub fn guard(&self) -> &ActuatorGuard<D> {
        &self.guard
    }

    pub fn is_in_error_state(&self) -> bool {
        self.guard.is_in_error_state()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Executa o comando; `true` se completou e foi confirmado
    fn execute(&mut self, command: GateCommand, now: Timestamp) -> ControlResult<bool> {
        if self.guard.is_in_error_state() {
            return Ok(false);
        }
        debug!(?command, "executing");

        match command {
            GateCommand::Open(target) => {
                let previous = self.arbiter.gates().open_gate().filter(|&g| g != target);
                if let Some(open) = previous {
                    if !self.actuate(open, Direction::Close, now)? {
                        return Ok(false);
                    }
                }
                self.actuate(target, Direction::Open, now)
            }
            GateCommand::Close(gate) => self.actuate(gate, Direction::Close, now),
            GateCommand::CloseAll => match self.arbiter.gates().open_gate() {
                Some(open) => self.actuate(open, Direction::Close, now),
                None => Ok(true),
            },
        }
    }

    /// Uma operação através do guarda; confirma no árbitro se executada.
    /// Repetir o pedido enquanto adiado renova o instante na fila.
    fn actuate(
        &mut self,
        gate: GateId,
        direction: Direction,
        now: Timestamp,
    ) -> ControlResult<bool> {
        match self.guard.request(gate, direction, now) {
            Ok(admission) if admission.is_confirmed() => {
                self.arbiter.confirm(gate, direction)?;
                info!(gate = %gate, %direction, ?admission, "gate actuated");
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(err) if err.is_latched() => {
                warn!(gate = %gate, %direction, %err, "actuation refused");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Remove da fila o que não aproxima mais as comportas do desejado
    fn prune_queue(&mut self) {
        let desired = self.arbiter.desired();
        let gates = self.arbiter.gates();

        let stale: Vec<GateId> = self
            .guard
            .pending_operations()
            .into_iter()
            .filter(|op| match op.direction {
                Direction::Open => {
                    desired != GateSelection::Gate(op.gate) || gates.open_gate().is_some()
                }
                Direction::Close => {
                    !gates.is_open(op.gate) || desired == GateSelection::Gate(op.gate)
                }
            })
            .map(|op| op.gate)
            .collect();

        for gate in stale {
            self.guard.discard_pending(gate);
        }
    }

    fn drain_queue(&mut self, now: Timestamp) -> ControlResult<Vec<OperationRecord>> {
        let executed = self.guard.process_queue(now);
        for op in &executed {
            self.arbiter.confirm(op.gate, op.direction)?;
        }
        Ok(executed)
    }

    /// LEDs espelham as comportas abertas; com commit manual pendente,
    /// mostram o candidato.
    fn refresh_indicators(&mut self) {
        let preview = self.selector.has_pending().then(|| self.selector.candidate());
        for gate in GateId::all(self.channel_count()) {
            let on = match preview {
                Some(candidate) => candidate.gate() == Some(gate),
                None => self.arbiter.gates().is_open(gate),
            };
            if self.indicator_state[gate.index()] != Some(on) {
                self.write_indicator(gate, on);
            }
        }
    }

    fn write_indicator(&mut self, gate: GateId, on: bool) {
        self.indicators.set(gate.index(), on);
        self.indicator_state[gate.index()] = Some(on);
    }
}
