//! # 🦾 gate-actuator — Proteção do Atuador
//!
//! Traduz "abrir/fechar comporta N" em movimentos de servo, protegendo o
//! mecanismo contra acionamentos rápidos demais.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            ActuatorGuard                │
//! │  trava → limite global → intervalo      │
//! │        ↓ executa         ↓ adia         │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  ServoBank   │  │ fila 1/comporta │  │
//! │  │ (orientação) │  │ (último vence)  │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └─────────────────────────────────────────┘
//!                   ↓
//!     ActuatorDriver::move_to (externo)
//! ```
//!
//! ## Exemplo
//!
//! ```ignore
//! use gate_actuator::{ActuatorGuard, GuardConfig, ServoBank};
//! use gate_core::mock::MockDriver;
//!
//! let servos = ServoBank::uniform(4)?;
//! let mut guard = ActuatorGuard::new(GuardConfig::default(), servos, MockDriver::new())?;
//! guard.initialize_gates()?;
//! let admission = guard.request_open(gate, now)?;
//! let executed = guard.process_queue(now);
//! ```
//!
//! ## Segurança
//!
//! - Intervalo mínimo por comporta (padrão 2000 ms)
//! - Limite global de operações por minuto (padrão 10); estourar aciona uma
//!   trava permanente e [`ActuatorGuard::is_in_error_state`] passa a `true`
//! - Canais desabilitados nunca chamam o driver

pub mod error;
pub mod guard;
pub mod servo;
pub mod types;

pub use error::{ActuatorError, ActuatorResult};
pub use guard::{ActuatorGuard, GuardConfig, RATE_WINDOW_MS};
pub use servo::{ServoBank, ServoConfig};
pub use types::{Admission, OperationHistory, OperationRecord};
