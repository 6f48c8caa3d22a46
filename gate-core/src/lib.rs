//! # 🚪 gate-core — Núcleo do Árbitro de Comportas
//!
//! Define as interfaces com o hardware externo e os tipos compartilhados por
//! todos os crates do workspace. O motor de decisão (classificador, árbitro,
//! seletor manual e guarda do atuador) vive nos crates específicos; aqui
//! ficam apenas as abstrações.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ gate-sensor  │ → │ gate-control │ → │gate-actuator │
//! │ (classifica) │   │  (arbitra)   │   │  (protege)   │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        ↓                  ↓                  ↓
//! ┌─────────────────────────────────────────────────────┐
//! │                    gate-core                        │
//! │  RawSensorSource | IndicatorSink | ActuatorDriver   │
//! │  Clock | GateId | GateSelection | GateCommand       │
//! └─────────────────────────────────────────────────────┘
//!                          ↓
//!              Hardware (ADC, PWM, GPIO)
//! ```
//!
//! ## Princípio de Design
//!
//! > *"Trait no core, implementação no módulo."*
//!
//! O núcleo nunca toca pinos. Quem integra fornece implementações dos traits
//! de [`traits`]; para testes existe o hardware simulado em [`mock`].

pub mod env;
pub mod error;
pub mod mock;
pub mod prelude;
pub mod time;
pub mod traits;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use time::{MonotonicClock, deadline_reached, elapsed_ms};
pub use traits::{ActuatorDriver, Clock, DriverError, IndicatorSink, RawSensorSource};
pub use types::{Direction, GateCommand, GateId, GateSelection, MAX_CHANNELS, Timestamp};

#[cfg(test)]
mod tests;
