//! Seleção manual por botão
//!
//! Cada soltura do botão (já filtrada) avança o candidato no ciclo
//! `todas fechadas → #1 → ... → #N → todas fechadas` e rearma o prazo de
//! commit. A seleção só é entregue ao árbitro depois que o prazo vence sem
//! novo toque, então o usuário pode percorrer as opções sem acionar nada.

use gate_core::env;
use gate_core::{GateSelection, Timestamp, deadline_reached, elapsed_ms};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuração do seletor manual
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualConfig {
    /// Janela de estabilidade do botão (ms)
    pub debounce_ms: u64,
    /// Atraso entre a última soltura e o commit (ms)
    pub open_delay_ms: u64,
}

impl Default for ManualConfig {
    fn default() -> Self {
        Self {
            debounce_ms: env::DEFAULT_BUTTON_DEBOUNCE_MS,
            open_delay_ms: env::DEFAULT_OPEN_DELAY_MS,
        }
    }
}

impl ManualConfig {
    /// Configuração com os valores do ambiente (`GATE_*`)
    pub fn from_env() -> Self {
        Self {
            debounce_ms: *env::BUTTON_DEBOUNCE_MS,
            open_delay_ms: *env::OPEN_DELAY_MS,
        }
    }
}

/// Borda lógica do botão após o filtro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonEdge {
    Pressed,
    Released,
}

/// Filtro de repique: o nível só é aceito depois de estável pela janela
#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    window_ms: u64,
    raw: bool,
    raw_since: Timestamp,
    stable: bool,
}

impl ButtonDebouncer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            raw: false,
            raw_since: 0,
            stable: false,
        }
    }

    /// Nível aceito
    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    /// Alimenta o nível bruto atual.
    ///
    /// Pode ser chamado a cada ciclo com o mesmo nível; a borda sai quando
    /// o nível bruto diverge do aceito por pelo menos `window_ms`.
    pub fn update(&mut self, pressed: bool, now: Timestamp) -> Option<ButtonEdge> {
        if pressed != self.raw {
            self.raw = pressed;
            self.raw_since = now;
        }

        if self.raw != self.stable && elapsed_ms(now, self.raw_since) >= self.window_ms {
            self.stable = self.raw;
            return Some(if self.stable {
                ButtonEdge::Pressed
            } else {
                ButtonEdge::Released
            });
        }
        None
    }
}

/// Seletor manual: candidato cíclico com commit atrasado
#[derive(Debug, Clone)]
pub struct ManualSelector {
    config: ManualConfig,
    count: usize,
    debouncer: ButtonDebouncer,
    candidate: GateSelection,
    deadline: Option<Timestamp>,
}

impl ManualSelector {
    pub fn new(config: ManualConfig, count: usize) -> Self {
        Self {
            debouncer: ButtonDebouncer::new(config.debounce_ms),
            config,
            count,
            candidate: GateSelection::AllClosed,
            deadline: None,
        }
    }

    pub fn config(&self) -> &ManualConfig {
        &self.config
    }

    /// Candidato atual
    pub fn candidate(&self) -> GateSelection {
        self.candidate
    }

    /// Prazo de commit armado
    pub fn pending_deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    pub fn has_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_button_pressed(&self) -> bool {
        self.debouncer.is_pressed()
    }

    /// Alimenta o nível bruto do botão.
    ///
    /// Numa soltura filtrada avança o candidato, rearma o prazo e retorna o
    /// novo candidato. Nunca comanda atuação.
    pub fn on_button_edge(&mut self, pressed: bool, now: Timestamp) -> Option<GateSelection> {
        match self.debouncer.update(pressed, now)? {
            ButtonEdge::Pressed => None,
            ButtonEdge::Released => {
                self.candidate = self.candidate.next(self.count);
                self.deadline = Some(now.wrapping_add(self.config.open_delay_ms));
                debug!(candidate = %self.candidate, "manual candidate advanced");
                Some(self.candidate)
            }
        }
    }

    /// Entrega a seleção quando o prazo vence; o prazo é consumido.
    pub fn poll(&mut self, now: Timestamp) -> Option<GateSelection> {
        let deadline = self.deadline?;
        if !deadline_reached(now, deadline) {
            return None;
        }
        self.deadline = None;
        info!(selection = %self.candidate, "manual selection committed");
        Some(self.candidate)
    }

    /// Atividade de sensor: descarta candidato e prazo.
    ///
    /// Retorna `true` se havia um commit pendente.
    pub fn preempt(&mut self) -> bool {
        let cancelled = self.deadline.take().is_some();
        if cancelled {
            info!(
                candidate = %self.candidate,
                "pending manual selection cancelled by sensor activity"
            );
        }
        self.candidate = GateSelection::AllClosed;
        cancelled
    }
}
