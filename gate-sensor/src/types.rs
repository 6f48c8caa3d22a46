//! Tipos de dados de diagnóstico do sensor

use gate_core::GateId;
use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationMode;
use crate::channel::Channel;

/// Fundo de escala do ADC de 10 bits
pub const FULL_SCALE: f32 = 1023.0;

/// Retrato instantâneo de um canal (medidor de posicionamento do sensor)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    pub channel: GateId,
    pub average: f32,
    pub baseline: f32,
    /// `average - baseline`
    pub delta: f32,
    pub threshold_on: f32,
    pub threshold_off: f32,
    pub active: bool,
    pub debounce_counter: u32,
    /// Força do sinal normalizada [0.0, 1.0]
    pub strength: f32,
}

impl ChannelSnapshot {
    /// Captura o estado atual do canal
    pub fn capture(channel: &Channel) -> Self {
        let average = channel.average();
        let baseline = channel.baseline();
        let delta = average - baseline;
        Self {
            channel: channel.id(),
            average,
            baseline,
            delta,
            threshold_on: channel.threshold_on(),
            threshold_off: channel.threshold_off(),
            active: channel.is_active(),
            debounce_counter: channel.debounce_counter(),
            strength: signal_strength(delta, baseline),
        }
    }
}

/// Força do sinal relativa ao espaço livre acima do baseline
///
/// `clamp(delta / (FULL_SCALE - baseline), 0, 1)`; deltas não positivos
/// valem zero.
pub fn signal_strength(delta: f32, baseline: f32) -> f32 {
    if delta <= 0.0 {
        return 0.0;
    }
    let headroom = FULL_SCALE - baseline;
    if headroom <= 0.0 {
        return 1.0;
    }
    (delta / headroom).clamp(0.0, 1.0)
}

/// Resultado da calibração de baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub mode: CalibrationMode,
    /// Baseline por canal (`None` = canal sem sensor)
    pub baselines: Vec<Option<f32>>,
    /// Canais com baseline degenerado (sempre ativos)
    pub degenerate: Vec<GateId>,
}

impl CalibrationReport {
    /// Algum canal degenerado?
    pub fn has_degenerate(&self) -> bool {
        !self.degenerate.is_empty()
    }
}
