//! Hardware simulado para testes sem hardware real
//!
//! Todos os mocks são `Clone` e compartilham estado interno via `Arc`, então
//! o teste mantém uma cópia para inspecionar/controlar enquanto o
//! controlador possui a outra.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::{ActuatorDriver, Clock, DriverError, IndicatorSink, RawSensorSource};
use crate::types::{MAX_CHANNELS, Timestamp};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Relógio controlado manualmente
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Cria relógio parado em `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Define o instante atual
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Avança `ms` milissegundos (com wraparound)
    pub fn advance(&self, ms: u64) -> Timestamp {
        let prev = self.now.fetch_add(ms, Ordering::SeqCst);
        prev.wrapping_add(ms)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// Movimento registrado pelo [`MockDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub channel: usize,
    pub position: u16,
    pub settle_delay_ms: u64,
}

/// Driver que registra todos os movimentos
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    moves: Arc<Mutex<Vec<Move>>>,
    failing: Arc<AtomicBool>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Todos os movimentos, em ordem
    pub fn moves(&self) -> Vec<Move> {
        lock(&self.moves).clone()
    }

    /// Movimentos de um canal
    pub fn moves_for(&self, channel: usize) -> Vec<Move> {
        lock(&self.moves)
            .iter()
            .filter(|m| m.channel == channel)
            .copied()
            .collect()
    }

    /// Número total de movimentos
    pub fn move_count(&self) -> usize {
        lock(&self.moves).len()
    }

    /// Último movimento
    pub fn last_move(&self) -> Option<Move> {
        lock(&self.moves).last().copied()
    }

    /// Descarta o histórico
    pub fn clear(&self) {
        lock(&self.moves).clear();
    }

    /// Faz as próximas chamadas falharem (ou voltarem a funcionar)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl ActuatorDriver for MockDriver {
    fn move_to(
        &mut self,
        channel: usize,
        position: u16,
        settle_delay_ms: u64,
    ) -> Result<(), DriverError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DriverError::Hardware(format!("simulated fault on channel {}", channel)));
        }
        lock(&self.moves).push(Move {
            channel,
            position,
            settle_delay_ms,
        });
        Ok(())
    }
}

/// Fonte de leituras ajustável por canal
#[derive(Debug, Clone)]
pub struct MockSensorSource {
    readings: Arc<Mutex<[u16; MAX_CHANNELS]>>,
    reads: Arc<AtomicUsize>,
}

impl MockSensorSource {
    /// Todos os canais lendo `value`
    pub fn new(value: u16) -> Self {
        Self {
            readings: Arc::new(Mutex::new([value; MAX_CHANNELS])),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Define a leitura de um canal
    pub fn set(&self, channel: usize, value: u16) {
        if let Some(slot) = lock(&self.readings).get_mut(channel) {
            *slot = value;
        }
    }

    /// Define a leitura de todos os canais
    pub fn set_all(&self, value: u16) {
        lock(&self.readings).fill(value);
    }

    /// Total de leituras realizadas
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Default for MockSensorSource {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RawSensorSource for MockSensorSource {
    fn read(&mut self, channel: usize) -> u16 {
        self.reads.fetch_add(1, Ordering::SeqCst);
        lock(&self.readings).get(channel).copied().unwrap_or(0)
    }
}

/// Indicadores (LEDs) simulados
#[derive(Debug, Clone, Default)]
pub struct MockIndicators {
    states: Arc<Mutex<[bool; MAX_CHANNELS]>>,
    writes: Arc<AtomicUsize>,
}

impl MockIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Estado atual do indicador
    pub fn is_on(&self, channel: usize) -> bool {
        lock(&self.states).get(channel).copied().unwrap_or(false)
    }

    /// Canais acesos
    pub fn lit(&self) -> Vec<usize> {
        lock(&self.states)
            .iter()
            .enumerate()
            .filter_map(|(i, &on)| on.then_some(i))
            .collect()
    }

    /// Total de escritas recebidas
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl IndicatorSink for MockIndicators {
    fn set(&mut self, channel: usize, on: bool) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(slot) = lock(&self.states).get_mut(channel) {
            *slot = on;
        }
    }
}
