//! # 📈 gate-sensor — Classificação de Sinal
//!
//! Converte leituras analógicas brutas de corrente em um booleano estável
//! "ferramenta ligada?" por canal.
//!
//! ## Pipeline por canal
//!
//! ```text
//! leitura bruta → janela móvel (K) → média
//!                                      ↓
//!            baseline × sensitivity (on/off, histerese)
//!                                      ↓
//!                   debounce N classificações → estado travado
//! ```
//!
//! ## Exemplo
//!
//! ```ignore
//! use gate_sensor::{ClassifierConfig, SignalClassifier};
//! use gate_core::mock::MockSensorSource;
//!
//! let mut source = MockSensorSource::new(100);
//! let mut classifier = SignalClassifier::new(ClassifierConfig::default(), 4)?;
//! classifier.calibrate(&mut source)?;
//! classifier.sample_all(&mut source);
//! let active = classifier.classify_all();
//! ```

pub mod calibration;
pub mod channel;
pub mod classifier;
pub mod error;
pub mod types;

pub use calibration::{CalibrationMode, Calibrator};
pub use channel::{Channel, RollingWindow, SensorChannelConfig};
pub use classifier::{ClassifierConfig, SignalClassifier};
pub use error::{SensorError, SensorResult};
pub use types::{CalibrationReport, ChannelSnapshot, FULL_SCALE, signal_strength};
