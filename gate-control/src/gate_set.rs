//! Conjunto de comportas: guardião do invariante "no máximo uma aberta"
//!
//! Só muda com execução confirmada pelo guarda; nunca especulativamente.

use gate_core::{GateId, MAX_CHANNELS};

use crate::error::{ControlError, ControlResult};

/// Estado aberto/fechado de todas as comportas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSet {
    open_gate: Option<GateId>,
    is_open: Vec<bool>,
}

impl GateSet {
    pub fn new(count: usize) -> ControlResult<Self> {
        if count == 0 || count > MAX_CHANNELS {
            return Err(gate_core::CoreError::InvalidChannelCount(count).into());
        }
        Ok(Self {
            open_gate: None,
            is_open: vec![false; count],
        })
    }

    pub fn count(&self) -> usize {
        self.is_open.len()
    }

    /// Comporta aberta, se houver
    pub fn open_gate(&self) -> Option<GateId> {
        self.open_gate
    }

    pub fn is_open(&self, gate: GateId) -> bool {
        self.is_open.get(gate.index()).copied().unwrap_or(false)
    }

    /// Flags por comporta
    pub fn open_flags(&self) -> &[bool] {
        &self.is_open
    }

    /// Registra abertura confirmada
    pub fn confirm_opened(&mut self, gate: GateId) -> ControlResult<()> {
        self.check_gate(gate)?;
        if let Some(other) = self.open_gate.filter(|&g| g != gate) {
            return Err(ControlError::InvariantViolation(format!(
                "cannot open gate {} while gate {} is open",
                gate, other
            )));
        }
        self.is_open[gate.index()] = true;
        self.open_gate = Some(gate);
        Ok(())
    }

    /// Registra fechamento confirmado
    pub fn confirm_closed(&mut self, gate: GateId) -> ControlResult<()> {
        self.check_gate(gate)?;
        self.is_open[gate.index()] = false;
        if self.open_gate == Some(gate) {
            self.open_gate = None;
        }
        Ok(())
    }

    /// Verifica o invariante completo
    pub fn check_invariant(&self) -> ControlResult<()> {
        let open: Vec<usize> = self
            .is_open
            .iter()
            .enumerate()
            .filter_map(|(i, &o)| o.then_some(i))
            .collect();
        let consistent = match (open.as_slice(), self.open_gate) {
            ([], None) => true,
            ([i], Some(g)) => *i == g.index(),
            _ => false,
        };
        if !consistent {
            return Err(ControlError::InvariantViolation(format!(
                "open flags {:?} disagree with open gate {:?}",
                open, self.open_gate
            )));
        }
        Ok(())
    }

    fn check_gate(&self, gate: GateId) -> ControlResult<()> {
        if gate.index() >= self.is_open.len() {
            return Err(gate_core::CoreError::InvalidGate {
                index: gate.index(),
                count: self.is_open.len(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(i: usize) -> GateId {
        GateId::new(i).unwrap()
    }

    #[test]
    fn test_starts_all_closed() {
        let set = GateSet::new(4).unwrap();
        assert_eq!(set.open_gate(), None);
        assert_eq!(set.open_flags(), &[false; 4]);
        assert!(set.check_invariant().is_ok());
    }

    #[test]
    fn test_open_then_close() {
        let mut set = GateSet::new(3).unwrap();
        set.confirm_opened(gate(1)).unwrap();
        assert_eq!(set.open_gate(), Some(gate(1)));
        assert!(set.is_open(gate(1)));
        set.confirm_closed(gate(1)).unwrap();
        assert_eq!(set.open_gate(), None);
        assert!(set.check_invariant().is_ok());
    }

    #[test]
    fn test_second_open_rejected() {
        let mut set = GateSet::new(3).unwrap();
        set.confirm_opened(gate(0)).unwrap();
        assert!(matches!(
            set.confirm_opened(gate(2)),
            Err(ControlError::InvariantViolation(_))
        ));
        assert!(!set.is_open(gate(2)));
        // reabrir a mesma é idempotente
        assert!(set.confirm_opened(gate(0)).is_ok());
    }

    #[test]
    fn test_bounds() {
        assert!(GateSet::new(0).is_err());
        assert!(GateSet::new(9).is_err());
        let mut set = GateSet::new(2).unwrap();
        assert!(set.confirm_opened(gate(5)).is_err());
        assert!(!set.is_open(gate(5)));
    }
}
