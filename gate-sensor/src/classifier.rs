//! Classificador de sinal: leitura bruta → "ferramenta ligada?"
//!
//! Média móvel por canal, baseline calibrado, histerese de dois limiares e
//! debounce por contagem de classificações consecutivas.

use gate_core::env;
use gate_core::{GateId, MAX_CHANNELS, RawSensorSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calibration::{CalibrationMode, Calibrator};
use crate::channel::{Channel, SensorChannelConfig};
use crate::error::{SensorError, SensorResult};
use crate::types::{CalibrationReport, ChannelSnapshot};

/// Tamanho máximo da janela móvel
pub const MAX_WINDOW_SIZE: usize = 50;

/// Configuração do classificador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Leituras na média móvel (K)
    pub window_size: usize,
    /// Multiplicador do baseline para ligar
    pub sensitivity_on: f32,
    /// Multiplicador do baseline para desligar (≤ `sensitivity_on`)
    pub sensitivity_off: f32,
    /// Classificações consecutivas para aceitar mudança
    pub debounce_stable_readings: u32,
    /// Estratégia de calibração
    pub calibration: CalibrationMode,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            window_size: env::DEFAULT_AVG_READINGS,
            sensitivity_on: env::DEFAULT_SENSITIVITY_ON,
            sensitivity_off: env::DEFAULT_SENSITIVITY_OFF,
            debounce_stable_readings: env::DEFAULT_DEBOUNCE_STABLE_READINGS,
            calibration: CalibrationMode::default(),
        }
    }
}

impl ClassifierConfig {
    /// Configuração com os valores do ambiente (`GATE_*`)
    pub fn from_env() -> Self {
        Self {
            window_size: *env::AVG_READINGS,
            sensitivity_on: *env::SENSITIVITY_ON,
            sensitivity_off: *env::SENSITIVITY_OFF,
            debounce_stable_readings: *env::DEBOUNCE_STABLE_READINGS,
            calibration: CalibrationMode::default(),
        }
    }

    pub fn validate(&self) -> SensorResult<()> {
        if self.window_size == 0 || self.window_size > MAX_WINDOW_SIZE {
            return Err(SensorError::InvalidConfig(format!(
                "Window size must be between 1 and {}",
                MAX_WINDOW_SIZE
            )));
        }
        if self.debounce_stable_readings == 0 {
            return Err(SensorError::InvalidConfig(
                "Debounce stable readings must be at least 1".into(),
            ));
        }
        validate_sensitivities(self.sensitivity_on, self.sensitivity_off)?;
        if self.calibration.samples() == 0 {
            return Err(SensorError::InvalidConfig(
                "Calibration needs at least one sample".into(),
            ));
        }
        Ok(())
    }
}

fn validate_sensitivities(on: f32, off: f32) -> SensorResult<()> {
    if !(on.is_finite() && off.is_finite()) || off <= 0.0 {
        return Err(SensorError::InvalidConfig(
            "Sensitivities must be finite and positive".into(),
        ));
    }
    if off > on {
        return Err(SensorError::InvalidConfig(format!(
            "sensitivity_off ({}) must not exceed sensitivity_on ({})",
            off, on
        )));
    }
    Ok(())
}

/// Classificador de todos os canais
#[derive(Debug, Clone)]
pub struct SignalClassifier {
    config: ClassifierConfig,
    channels: Vec<Channel>,
}

impl SignalClassifier {
    /// Cria classificador para `count` canais com configuração uniforme
    pub fn new(config: ClassifierConfig, count: usize) -> SensorResult<Self> {
        let channels = vec![SensorChannelConfig::default(); count];
        Self::with_channels(config, &channels)
    }

    /// Cria classificador com configuração por canal
    pub fn with_channels(
        config: ClassifierConfig,
        channels: &[SensorChannelConfig],
    ) -> SensorResult<Self> {
        config.validate()?;
        if channels.is_empty() || channels.len() > MAX_CHANNELS {
            return Err(gate_core::CoreError::InvalidChannelCount(channels.len()).into());
        }

        let mut built = Vec::with_capacity(channels.len());
        for (id, ch) in GateId::all(channels.len()).zip(channels) {
            let on = ch.sensitivity_on.unwrap_or(config.sensitivity_on);
            let off = ch.sensitivity_off.unwrap_or(config.sensitivity_off);
            validate_sensitivities(on, off)?;

            let channel = Channel::new(id, config.window_size, on, off);
            built.push(if ch.sensing { channel } else { channel.without_sensor() });
        }

        Ok(Self {
            config,
            channels: built,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub(crate) fn channels_mut(&mut self) -> impl Iterator<Item = &mut Channel> {
        self.channels.iter_mut()
    }

    pub fn channel(&self, id: GateId) -> SensorResult<&Channel> {
        let count = self.channels.len();
        self.channels
            .get(id.index())
            .ok_or(SensorError::InvalidChannel { index: id.index(), count })
    }

    fn channel_mut(&mut self, id: GateId) -> SensorResult<&mut Channel> {
        let count = self.channels.len();
        self.channels
            .get_mut(id.index())
            .ok_or(SensorError::InvalidChannel { index: id.index(), count })
    }

    /// Adiciona uma leitura bruta à janela do canal
    pub fn sample(&mut self, id: GateId, raw: u16) -> SensorResult<()> {
        self.channel_mut(id)?.push(raw);
        Ok(())
    }

    /// Lê uma amostra de cada canal com sensor
    pub fn sample_all<S: RawSensorSource + ?Sized>(&mut self, source: &mut S) {
        for channel in self.channels.iter_mut().filter(|c| c.is_sensing()) {
            channel.push(source.read(channel.id().index()));
        }
    }

    /// Média da janela do canal
    pub fn average(&self, id: GateId) -> SensorResult<f32> {
        Ok(self.channel(id)?.average())
    }

    /// Uma chamada de classificação; retorna o estado travado.
    ///
    /// Cada chamada conta para o debounce.
    pub fn is_active(&mut self, id: GateId) -> SensorResult<bool> {
        let stable = self.config.debounce_stable_readings;
        let channel = self.channel_mut(id)?;
        if channel.classify(stable) {
            debug!(
                channel = %id,
                active = channel.is_active(),
                average = channel.average(),
                baseline = channel.baseline(),
                "channel state changed"
            );
        }
        Ok(channel.is_active())
    }

    /// Estado travado sem classificar
    pub fn state(&self, id: GateId) -> SensorResult<bool> {
        Ok(self.channel(id)?.is_active())
    }

    /// Classifica todos os canais, em ordem de índice
    pub fn classify_all(&mut self) -> Vec<bool> {
        let stable = self.config.debounce_stable_readings;
        self.channels
            .iter_mut()
            .map(|channel| {
                if channel.classify(stable) {
                    debug!(
                        channel = %channel.id(),
                        active = channel.is_active(),
                        average = channel.average(),
                        baseline = channel.baseline(),
                        "channel state changed"
                    );
                }
                channel.is_active()
            })
            .collect()
    }

    /// Estados travados de todos os canais
    pub fn states(&self) -> Vec<bool> {
        self.channels.iter().map(Channel::is_active).collect()
    }

    pub fn set_baseline(&mut self, id: GateId, baseline: f32) -> SensorResult<()> {
        self.channel_mut(id)?.set_baseline(baseline);
        Ok(())
    }

    pub fn baseline(&self, id: GateId) -> SensorResult<f32> {
        Ok(self.channel(id)?.baseline())
    }

    /// Calibra os baselines com a estratégia configurada
    pub fn calibrate<S: RawSensorSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> SensorResult<CalibrationReport> {
        let calibrator = Calibrator::new(self.config.calibration)?;
        calibrator.run(source, self)
    }

    /// Diagnóstico de um canal
    pub fn snapshot(&self, id: GateId) -> SensorResult<ChannelSnapshot> {
        Ok(ChannelSnapshot::capture(self.channel(id)?))
    }

    /// Diagnóstico de todos os canais
    pub fn snapshots(&self) -> Vec<ChannelSnapshot> {
        self.channels.iter().map(ChannelSnapshot::capture).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(i: usize) -> GateId {
        GateId::new(i).unwrap()
    }

    #[test]
    fn test_default_config_valid() {
        let config = ClassifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size, 25);
        assert_eq!(config.debounce_stable_readings, 3);
    }

    #[test]
    fn test_off_above_on_rejected() {
        let config = ClassifierConfig {
            sensitivity_on: 1.5,
            sensitivity_off: 2.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_window_size_limits() {
        let too_big = ClassifierConfig {
            window_size: 51,
            ..Default::default()
        };
        assert!(too_big.validate().is_err());

        let zero = ClassifierConfig {
            window_size: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_channel_count_limits() {
        assert!(SignalClassifier::new(ClassifierConfig::default(), 0).is_err());
        assert!(SignalClassifier::new(ClassifierConfig::default(), 9).is_err());
        assert!(SignalClassifier::new(ClassifierConfig::default(), 8).is_ok());
    }

    #[test]
    fn test_per_channel_override() {
        let channels = vec![
            SensorChannelConfig::default(),
            SensorChannelConfig {
                sensitivity_on: Some(3.0),
                sensitivity_off: Some(2.5),
                ..Default::default()
            },
        ];
        let mut c =
            SignalClassifier::with_channels(ClassifierConfig::default(), &channels).unwrap();
        c.set_baseline(gate(1), 100.0).unwrap();
        assert_eq!(c.channel(gate(1)).unwrap().threshold_on(), 300.0);
        assert_eq!(c.channel(gate(1)).unwrap().threshold_off(), 250.0);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let channels = vec![SensorChannelConfig {
            sensitivity_on: Some(1.0),
            sensitivity_off: Some(1.2),
            ..Default::default()
        }];
        assert!(SignalClassifier::with_channels(ClassifierConfig::default(), &channels).is_err());
    }

    #[test]
    fn test_unknown_channel() {
        let mut c = SignalClassifier::new(ClassifierConfig::default(), 2).unwrap();
        assert!(matches!(
            c.sample(gate(5), 10),
            Err(SensorError::InvalidChannel { index: 5, count: 2 })
        ));
        assert!(c.is_active(gate(5)).is_err());
    }

    #[test]
    fn test_average_over_window() {
        let config = ClassifierConfig {
            window_size: 4,
            ..Default::default()
        };
        let mut c = SignalClassifier::new(config, 1).unwrap();
        for v in [100, 200, 300, 400] {
            c.sample(gate(0), v).unwrap();
        }
        assert_eq!(c.average(gate(0)).unwrap(), 250.0);
    }

    #[test]
    fn test_state_does_not_advance_debounce() {
        let config = ClassifierConfig {
            window_size: 1,
            ..Default::default()
        };
        let mut c = SignalClassifier::new(config, 1).unwrap();
        c.set_baseline(gate(0), 100.0).unwrap();
        c.sample(gate(0), 500).unwrap();
        for _ in 0..10 {
            assert!(!c.state(gate(0)).unwrap());
        }
        assert_eq!(c.channel(gate(0)).unwrap().debounce_counter(), 0);
    }
}
