//! Canal de sensor: janela móvel, baseline e estado travado

use gate_core::GateId;
use serde::{Deserialize, Serialize};

/// Baseline abaixo disto é considerado degenerado (sensor desconectado)
pub const DEGENERATE_BASELINE: f32 = 1.0;

/// Janela circular de tamanho fixo com as últimas K leituras
///
/// Começa preenchida com zeros; a média sempre divide por K.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: Vec<u16>,
    cursor: usize,
    sum: u64,
}

impl RollingWindow {
    /// Cria janela de tamanho `size` (mínimo 1)
    pub fn new(size: usize) -> Self {
        Self {
            samples: vec![0; size.max(1)],
            cursor: 0,
            sum: 0,
        }
    }

    /// Insere leitura sobrescrevendo a mais antiga
    pub fn push(&mut self, value: u16) {
        let slot = &mut self.samples[self.cursor];
        self.sum = self.sum - u64::from(*slot) + u64::from(value);
        *slot = value;
        self.cursor = (self.cursor + 1) % self.samples.len();
    }

    /// Média aritmética da janela
    pub fn mean(&self) -> f32 {
        self.sum as f32 / self.samples.len() as f32
    }

    /// Tamanho da janela (K)
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Janela sem sinal (todas as leituras zero)
    pub fn is_empty(&self) -> bool {
        self.sum == 0
    }

    /// Leituras em ordem de armazenamento
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Zera a janela
    pub fn clear(&mut self) {
        self.samples.fill(0);
        self.cursor = 0;
        self.sum = 0;
    }
}

/// Configuração por canal do sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorChannelConfig {
    /// Canal tem sensor de corrente? Sem sensor ele nunca é amostrado e
    /// permanece inativo (comporta só manual).
    pub sensing: bool,
    /// Sobrescreve `sensitivity_on` global
    pub sensitivity_on: Option<f32>,
    /// Sobrescreve `sensitivity_off` global
    pub sensitivity_off: Option<f32>,
}

impl Default for SensorChannelConfig {
    fn default() -> Self {
        Self {
            sensing: true,
            sensitivity_on: None,
            sensitivity_off: None,
        }
    }
}

/// Um canal sensor+atuador do ponto de vista do classificador
#[derive(Debug, Clone)]
pub struct Channel {
    id: GateId,
    sensing: bool,
    baseline: f32,
    window: RollingWindow,
    active: bool,
    debounce_counter: u32,
    sensitivity_on: f32,
    sensitivity_off: f32,
}

impl Channel {
    /// Cria canal com baseline zero (preenchido na calibração)
    pub fn new(id: GateId, window_size: usize, sensitivity_on: f32, sensitivity_off: f32) -> Self {
        Self {
            id,
            sensing: true,
            baseline: 0.0,
            window: RollingWindow::new(window_size),
            active: false,
            debounce_counter: 0,
            sensitivity_on,
            sensitivity_off,
        }
    }

    /// Canal sem sensor
    pub fn without_sensor(mut self) -> Self {
        self.sensing = false;
        self
    }

    pub fn id(&self) -> GateId {
        self.id
    }

    pub fn is_sensing(&self) -> bool {
        self.sensing
    }

    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    pub fn set_baseline(&mut self, baseline: f32) {
        self.baseline = baseline.max(0.0);
    }

    /// Baseline zero ou quase: qualquer leitura positiva dispara.
    pub fn is_degenerate(&self) -> bool {
        self.sensing && self.baseline < DEGENERATE_BASELINE
    }

    /// Adiciona leitura bruta à janela
    pub fn push(&mut self, raw: u16) {
        self.window.push(raw);
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    pub fn average(&self) -> f32 {
        self.window.mean()
    }

    /// `baseline × sensitivity_on`
    pub fn threshold_on(&self) -> f32 {
        self.baseline * self.sensitivity_on
    }

    /// `baseline × sensitivity_off`
    pub fn threshold_off(&self) -> f32 {
        self.baseline * self.sensitivity_off
    }

    /// Limiar aplicado ao estado atual (histerese)
    pub fn current_threshold(&self) -> f32 {
        if self.active {
            self.threshold_off()
        } else {
            self.threshold_on()
        }
    }

    /// Estado travado, sem efeitos colaterais
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn debounce_counter(&self) -> u32 {
        self.debounce_counter
    }

    /// Uma chamada de classificação.
    ///
    /// Compara a média com o limiar do estado atual; divergências
    /// consecutivas incrementam o contador, concordância o zera. O estado só
    /// muda quando o contador atinge `stable_readings`. Retorna `true` se o
    /// estado travado mudou nesta chamada.
    pub fn classify(&mut self, stable_readings: u32) -> bool {
        if !self.sensing {
            return false;
        }

        let desired = self.average() > self.current_threshold();
        if desired == self.active {
            self.debounce_counter = 0;
            return false;
        }

        self.debounce_counter += 1;
        if self.debounce_counter >= stable_readings.max(1) {
            self.active = desired;
            self.debounce_counter = 0;
            return true;
        }
        false
    }

    /// Volta ao estado inicial mantendo o baseline
    pub fn reset(&mut self) {
        self.window.clear();
        self.active = false;
        self.debounce_counter = 0;
    }
}
