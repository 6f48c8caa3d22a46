//! Calibração de baseline com as ferramentas desligadas
//!
//! Duas variantes:
//!
//! - **PeakHold** (padrão): o baseline é o *máximo* observado. Protege contra
//!   disparos falsos pela variação do ruído de fundo.
//! - **Mean**: o baseline é a média. Útil para ferramentas que consomem pouca
//!   corrente e não alcançariam o limiar calculado sobre o pico.
//!
//! O ritmo entre leituras é responsabilidade da fonte; aqui só se conta
//! amostras.

use gate_core::RawSensorSource;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classifier::SignalClassifier;
use crate::error::{SensorError, SensorResult};
use crate::types::CalibrationReport;

/// Leituras no modo pico (≈500 ms a 1 leitura/ms)
pub const PEAK_HOLD_SAMPLES: u32 = 500;
/// Leituras no modo média
pub const MEAN_SAMPLES: u32 = 50;

/// Estratégia de calibração
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationMode {
    /// Máximo de `samples` leituras
    PeakHold { samples: u32 },
    /// Média de `samples` leituras
    Mean { samples: u32 },
}

impl CalibrationMode {
    pub fn peak_hold() -> Self {
        CalibrationMode::PeakHold {
            samples: PEAK_HOLD_SAMPLES,
        }
    }

    pub fn mean() -> Self {
        CalibrationMode::Mean { samples: MEAN_SAMPLES }
    }

    /// Número de leituras por canal
    pub fn samples(&self) -> u32 {
        match *self {
            CalibrationMode::PeakHold { samples } | CalibrationMode::Mean { samples } => samples,
        }
    }
}

impl Default for CalibrationMode {
    fn default() -> Self {
        Self::peak_hold()
    }
}

/// Executa a calibração sobre uma fonte de leituras
#[derive(Debug, Clone, Copy, Default)]
pub struct Calibrator {
    mode: CalibrationMode,
}

impl Calibrator {
    pub fn new(mode: CalibrationMode) -> SensorResult<Self> {
        if mode.samples() == 0 {
            return Err(SensorError::InvalidConfig(
                "Calibration needs at least one sample".into(),
            ));
        }
        Ok(Self { mode })
    }

    pub fn mode(&self) -> CalibrationMode {
        self.mode
    }

    /// Mede o baseline de um canal
    pub fn measure<S: RawSensorSource + ?Sized>(&self, source: &mut S, channel: usize) -> f32 {
        match self.mode {
            CalibrationMode::PeakHold { samples } => (0..samples)
                .map(|_| source.read(channel))
                .max()
                .map_or(0.0, f32::from),
            CalibrationMode::Mean { samples } => {
                let total: u64 = (0..samples).map(|_| u64::from(source.read(channel))).sum();
                total as f32 / samples.max(1) as f32
            }
        }
    }

    /// Calibra todos os canais com sensor e instala os baselines
    pub fn run<S: RawSensorSource + ?Sized>(
        &self,
        source: &mut S,
        classifier: &mut SignalClassifier,
    ) -> SensorResult<CalibrationReport> {
        let mut baselines = Vec::with_capacity(classifier.channel_count());
        let mut degenerate = Vec::new();

        for channel in classifier.channels_mut() {
            if !channel.is_sensing() {
                baselines.push(None);
                continue;
            }

            let baseline = self.measure(source, channel.id().index());
            channel.set_baseline(baseline);
            channel.reset();
            info!(channel = %channel.id(), baseline, "off reading");

            if channel.is_degenerate() {
                warn!(
                    channel = %channel.id(),
                    baseline,
                    "degenerate baseline: channel will classify any positive reading as active"
                );
                degenerate.push(channel.id());
            }
            baselines.push(Some(baseline));
        }

        Ok(CalibrationReport {
            mode: self.mode,
            baselines,
            degenerate,
        })
    }
}
