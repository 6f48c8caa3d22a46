//! # Árbitro de comportas
//!
//! Transforma estados dos sensores e eventos manuais em no máximo um
//! [`GateCommand`] por ciclo.
//!
//! Regras:
//!
//! - atividade de sensor sempre tem prioridade sobre o manual
//! - canal que acaba de ligar assume a comporta (menor índice em empate)
//! - se o canal dono desliga, o próximo ativo de menor índice com atuador assume
//!   ([`GateArbiter::first_open_candidate`]); sem ativos, tudo fecha
//! - sem sensores ativos, a seleção manual comitada manda
//!
//! A seleção desejada persiste entre ciclos: enquanto o [`GateSet`] não
//! refletir o desejado, o mesmo comando volta a ser emitido. O
//! [`GateSet`] só muda via `confirm_*`, depois da execução confirmada.

use gate_core::{Direction, GateCommand, GateId, GateSelection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ControlError, ControlResult};
use crate::gate_set::GateSet;

/// Quem definiu a seleção desejada atual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArbiterMode {
    /// Nenhuma decisão ainda, ou sensores desligaram
    #[default]
    Idle,
    /// Algum sensor ativo
    Sensor,
    /// Seleção manual comitada
    Manual,
}

/// Árbitro dono do [`GateSet`]
#[derive(Debug, Clone)]
pub struct GateArbiter {
    gates: GateSet,
    actuated: Vec<bool>,
    previous_active: Vec<bool>,
    sensor_target: Option<GateId>,
    desired: GateSelection,
    mode: ArbiterMode,
}

impl GateArbiter {
    /// Todas as comportas com atuador
    pub fn new(count: usize) -> ControlResult<Self> {
        Self::with_actuated(vec![true; count])
    }

    /// `actuated[i] = false` marca comporta sem atuador físico. Ela ainda
    /// abre e fecha na contabilidade quando o próprio sensor liga, mas não
    /// herda a comporta em [`GateArbiter::first_open_candidate`].
    pub fn with_actuated(actuated: Vec<bool>) -> ControlResult<Self> {
        let gates = GateSet::new(actuated.len())?;
        Ok(Self {
            previous_active: vec![false; actuated.len()],
            gates,
            actuated,
            sensor_target: None,
            desired: GateSelection::AllClosed,
            mode: ArbiterMode::Idle,
        })
    }

    pub fn gates(&self) -> &GateSet {
        &self.gates
    }

    pub fn count(&self) -> usize {
        self.gates.count()
    }

    /// Seleção que o árbitro quer ver realizada
    pub fn desired(&self) -> GateSelection {
        self.desired
    }

    pub fn mode(&self) -> ArbiterMode {
        self.mode
    }

    /// Comporta escolhida pelos sensores
    pub fn sensor_target(&self) -> Option<GateId> {
        self.sensor_target
    }

    /// Um ciclo de arbitragem.
    ///
    /// `active` tem um flag por canal. `manual` é uma seleção manual
    /// comitada neste ciclo e é descartada se houver sensor ativo.
    pub fn tick(
        &mut self,
        active: &[bool],
        manual: Option<GateSelection>,
    ) -> ControlResult<Option<GateCommand>> {
        if active.len() != self.count() {
            return Err(ControlError::InvalidConfig(format!(
                "expected {} channel states, got {}",
                self.count(),
                active.len()
            )));
        }

        if active.iter().any(|&a| a) {
            if let Some(selection) = manual {
                debug!(%selection, "manual selection discarded, sensor active");
            }
            self.track_sensors(active);
            self.mode = ArbiterMode::Sensor;
            self.desired = self.sensor_target.into();
        } else {
            if self.mode == ArbiterMode::Sensor {
                debug!("all sensors inactive, closing");
                self.mode = ArbiterMode::Idle;
                self.sensor_target = None;
                self.desired = GateSelection::AllClosed;
            }
            if let Some(selection) = manual {
                self.mode = ArbiterMode::Manual;
                self.desired = selection;
            }
        }

        self.previous_active.copy_from_slice(active);
        Ok(self.plan())
    }

    /// Canal ativo de menor índice com atuador
    pub fn first_open_candidate(&self, active: &[bool]) -> Option<GateId> {
        GateId::all(self.count()).find(|g| self.is_candidate(*g, active))
    }

    /// Próximo comando para aproximar o [`GateSet`] do desejado
    pub fn plan(&self) -> Option<GateCommand> {
        match self.desired {
            GateSelection::Gate(target) if !self.gates.is_open(target) => {
                Some(GateCommand::Open(target))
            }
            GateSelection::Gate(_) => None,
            GateSelection::AllClosed => {
                let open = self.gates.open_gate()?;
                Some(match self.mode {
                    ArbiterMode::Manual => GateCommand::CloseAll,
                    ArbiterMode::Sensor | ArbiterMode::Idle => GateCommand::Close(open),
                })
            }
        }
    }

    /// Registra uma operação confirmada pelo guarda
    pub fn confirm(&mut self, gate: GateId, direction: Direction) -> ControlResult<()> {
        match direction {
            Direction::Open => self.gates.confirm_opened(gate),
            Direction::Close => self.gates.confirm_closed(gate),
        }
    }

    fn is_candidate(&self, gate: GateId, active: &[bool]) -> bool {
        is_active(active, gate) && self.actuated.get(gate.index()).copied().unwrap_or(false)
    }

    fn track_sensors(&mut self, active: &[bool]) {
        let rising = GateId::all(self.count())
            .find(|g| is_active(active, *g) && !self.previous_active[g.index()]);

        let target = match (rising, self.sensor_target) {
            (Some(gate), _) => Some(gate),
            (None, Some(current)) if is_active(active, current) => Some(current),
            (None, _) => self.first_open_candidate(active),
        };

        if target != self.sensor_target {
            debug!(from = ?self.sensor_target, to = ?target, "sensor target changed");
            self.sensor_target = target;
        }
    }
}

fn is_active(active: &[bool], gate: GateId) -> bool {
    active.get(gate.index()).copied().unwrap_or(false)
}
