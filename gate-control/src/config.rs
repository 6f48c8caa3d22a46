//! Configuração do controlador
//!
//! Constantes fornecidas na partida e nunca relidas. `Default` reproduz os
//! valores de fábrica; [`ControllerConfig::from_env`] aplica as variáveis
//! `GATE_*` (ou `.env`).

use gate_actuator::{GuardConfig, ServoBank, ServoConfig};
use gate_core::MAX_CHANNELS;
use gate_sensor::{ClassifierConfig, SensorChannelConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};
use crate::manual::ManualConfig;

/// Configuração de um canal sensor+atuador
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub sensor: SensorChannelConfig,
    pub servo: ServoConfig,
}

impl ChannelConfig {
    /// Canal só manual: sem sensor de corrente
    pub fn manual_only() -> Self {
        Self {
            sensor: SensorChannelConfig {
                sensing: false,
                ..Default::default()
            },
            servo: ServoConfig::default(),
        }
    }

    /// Canal sem servo físico (contabilidade e LED apenas)
    pub fn without_actuator() -> Self {
        Self {
            sensor: SensorChannelConfig::default(),
            servo: ServoConfig::disabled(),
        }
    }
}

/// Configuração completa do controlador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub classifier: ClassifierConfig,
    pub guard: GuardConfig,
    pub manual: ManualConfig,
    pub channels: Vec<ChannelConfig>,
}

impl ControllerConfig {
    /// `count` canais com os valores de fábrica
    pub fn with_channels(count: usize) -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            guard: GuardConfig::default(),
            manual: ManualConfig::default(),
            channels: vec![ChannelConfig::default(); count],
        }
    }

    /// `count` canais com os valores do ambiente
    pub fn from_env(count: usize) -> Self {
        Self {
            classifier: ClassifierConfig::from_env(),
            guard: GuardConfig::from_env(),
            manual: ManualConfig::from_env(),
            channels: vec![ChannelConfig::default(); count],
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn validate(&self) -> ControlResult<()> {
        if self.channels.is_empty() || self.channels.len() > MAX_CHANNELS {
            return Err(ControlError::InvalidConfig(format!(
                "channel count must be 1..={}, got {}",
                MAX_CHANNELS,
                self.channels.len()
            )));
        }
        self.classifier.validate()?;
        self.guard.validate()?;
        for channel in &self.channels {
            channel.servo.validate()?;
        }
        Ok(())
    }

    pub(crate) fn sensor_channels(&self) -> Vec<SensorChannelConfig> {
        self.channels.iter().map(|c| c.sensor.clone()).collect()
    }

    pub(crate) fn servo_bank(&self) -> ControlResult<ServoBank> {
        Ok(ServoBank::new(self.channels.iter().map(|c| c.servo.clone()).collect())?)
    }

    pub(crate) fn actuated(&self) -> Vec<bool> {
        self.channels.iter().map(|c| c.servo.enabled).collect()
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::with_channels(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        let config = ControllerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.channel_count(), 4);
        assert_eq!(config.manual.open_delay_ms, 1_000);
    }

    #[test]
    fn test_channel_count_bounds() {
        assert!(ControllerConfig::with_channels(0).validate().is_err());
        assert!(ControllerConfig::with_channels(9).validate().is_err());
        assert!(ControllerConfig::with_channels(8).validate().is_ok());
    }

    #[test]
    fn test_nested_validation() {
        let mut config = ControllerConfig::with_channels(2);
        config.channels[1].servo.max_position = 250;
        assert!(matches!(config.validate(), Err(ControlError::Actuator(_))));

        let mut config = ControllerConfig::with_channels(2);
        config.classifier.sensitivity_off = 3.0;
        assert!(matches!(config.validate(), Err(ControlError::Sensor(_))));
    }

    #[test]
    fn test_from_env_without_overrides() {
        let config = ControllerConfig::from_env(3);
        assert_eq!(config.channel_count(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut config = ControllerConfig::with_channels(2);
        config.channels[1] = ChannelConfig::manual_only();
        let json = serde_json::to_string(&config).unwrap();
        let back: ControllerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
