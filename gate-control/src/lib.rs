//! # 🚦 gate-control — Arbitragem e Controle
//!
//! Decide qual comporta fica aberta a partir dos sensores e do botão, e
//! conduz o ciclo de controle completo sobre o hardware abstrato.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Controller                            │
//! │  ┌──────────────────┐        ┌───────────────────────────┐  │
//! │  │ SignalClassifier │        │     ManualSelector        │  │
//! │  │ (gate-sensor)    │        │ botão → candidato → prazo │  │
//! │  └────────┬─────────┘        └────────────┬──────────────┘  │
//! │           └──────────┐      ┌─────────────┘                 │
//! │                 ┌────▼──────▼────┐                          │
//! │                 │  GateArbiter   │  sensor > manual         │
//! │                 │   (GateSet)    │  no máximo uma aberta    │
//! │                 └───────┬────────┘                          │
//! │                 ┌───────▼────────┐                          │
//! │                 │ ActuatorGuard  │  intervalo, limite, fila │
//! │                 │ (gate-actuator)│                          │
//! │                 └────────────────┘                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exemplo
//!
//! ```ignore
//! use gate_control::{Controller, ControllerConfig};
//! use gate_core::mock::{ManualClock, MockDriver, MockIndicators, MockSensorSource};
//!
//! let mut controller = Controller::new(
//!     ControllerConfig::with_channels(4),
//!     MockSensorSource::new(100),
//!     MockDriver::new(),
//!     MockIndicators::new(),
//!     ManualClock::new(0),
//! )?;
//! controller.startup()?;
//! loop {
//!     let report = controller.cycle(button_pressed)?;
//! }
//! ```

pub mod arbiter;
pub mod config;
pub mod controller;
pub mod error;
pub mod gate_set;
pub mod manual;
pub mod types;

pub use arbiter::{ArbiterMode, GateArbiter};
pub use config::{ChannelConfig, ControllerConfig};
pub use controller::Controller;
pub use error::{ControlError, ControlResult};
pub use gate_set::GateSet;
pub use manual::{ButtonDebouncer, ButtonEdge, ManualConfig, ManualSelector};
pub use types::{ControllerStatus, CycleReport};

#[cfg(test)]
mod tests;
