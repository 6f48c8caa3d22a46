//! Tipos compartilhados do árbitro de comportas

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Timestamp monotônico em milissegundos
pub type Timestamp = u64;

/// Número máximo de canais (sensor + atuador) suportados
pub const MAX_CHANNELS: usize = 8;

/// Identificador de comporta / canal (0..N-1)
///
/// Exibido 1-based (`#1`, `#2`, ...), como o usuário numera as comportas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId(u8);

impl GateId {
    /// Cria identificador validando contra [`MAX_CHANNELS`]
    pub fn new(index: usize) -> CoreResult<Self> {
        Self::checked(index, MAX_CHANNELS)
    }

    /// Cria identificador validando contra a contagem configurada
    pub fn checked(index: usize, count: usize) -> CoreResult<Self> {
        if index >= count || index >= MAX_CHANNELS {
            return Err(CoreError::InvalidGate { index, count });
        }
        Ok(Self(index as u8))
    }

    /// Índice 0-based
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Itera sobre as primeiras `count` comportas
    pub fn all(count: usize) -> impl Iterator<Item = GateId> {
        (0..count.min(MAX_CHANNELS)).map(|i| GateId(i as u8))
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 + 1)
    }
}

/// Seleção de comporta: uma comporta específica ou "todas fechadas"
///
/// Nunca há alias numérico para "todas fechadas" (nem `-1`, nem `N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GateSelection {
    /// Nenhuma comporta aberta
    #[default]
    AllClosed,
    /// Exatamente esta comporta aberta
    Gate(GateId),
}

impl GateSelection {
    /// Próxima seleção no ciclo `AllClosed → #1 → ... → #N → AllClosed`
    pub fn next(self, count: usize) -> Self {
        let count = count.min(MAX_CHANNELS);
        match self {
            GateSelection::AllClosed if count > 0 => GateSelection::Gate(GateId(0)),
            GateSelection::AllClosed => GateSelection::AllClosed,
            GateSelection::Gate(g) if g.index() + 1 < count => {
                GateSelection::Gate(GateId(g.0 + 1))
            }
            GateSelection::Gate(_) => GateSelection::AllClosed,
        }
    }

    /// Comporta selecionada, se houver
    pub fn gate(self) -> Option<GateId> {
        match self {
            GateSelection::Gate(g) => Some(g),
            GateSelection::AllClosed => None,
        }
    }

    /// Verifica se representa "todas fechadas"
    pub fn is_all_closed(self) -> bool {
        matches!(self, GateSelection::AllClosed)
    }
}

impl From<Option<GateId>> for GateSelection {
    fn from(gate: Option<GateId>) -> Self {
        gate.map_or(GateSelection::AllClosed, GateSelection::Gate)
    }
}

impl fmt::Display for GateSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateSelection::AllClosed => write!(f, "all closed"),
            GateSelection::Gate(g) => write!(f, "gate {}", g),
        }
    }
}

/// Direção de uma operação física
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Open,
    Close,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Open => write!(f, "OPEN"),
            Direction::Close => write!(f, "CLOSE"),
        }
    }
}

/// Transição desejada emitida pelo árbitro (no máximo uma por ciclo)
///
/// `Open` implica fechar antes a comporta aberta, se houver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateCommand {
    /// Torna esta a única comporta aberta
    Open(GateId),
    /// Fecha esta comporta
    Close(GateId),
    /// Fecha todas as comportas abertas
    CloseAll,
}

impl GateCommand {
    /// Seleção resultante após a execução completa do comando
    pub fn target(self) -> GateSelection {
        match self {
            GateCommand::Open(g) => GateSelection::Gate(g),
            GateCommand::Close(_) | GateCommand::CloseAll => GateSelection::AllClosed,
        }
    }
}
