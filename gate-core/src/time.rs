//! Aritmética de tempo segura contra wraparound

use std::time::Instant;

use crate::traits::Clock;
use crate::types::Timestamp;

/// Milissegundos decorridos desde `since`, com subtração sem sinal.
///
/// Correto mesmo que o contador tenha dado a volta entre `since` e `now`.
#[inline]
pub fn elapsed_ms(now: Timestamp, since: Timestamp) -> u64 {
    now.wrapping_sub(since)
}

/// `now` já alcançou `deadline`?
///
/// Interpreta a diferença como sinalizada, então um deadline logo após o
/// wraparound continua "no futuro".
#[inline]
pub fn deadline_reached(now: Timestamp, deadline: Timestamp) -> bool {
    (now.wrapping_sub(deadline) as i64) >= 0
}

/// Relógio monotônico do processo, com origem na criação
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Cria relógio com origem agora
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }
}
