//! # 🎯 Traits — Interfaces com o Hardware
//!
//! O motor de decisão consome o mundo físico através de quatro interfaces
//! estreitas. As implementações reais (ADC, PWM, GPIO) vivem fora deste
//! workspace; as simuladas vivem em [`crate::mock`].
//!
//! | Trait | Direção | Uso |
//! |:------|:--------|:----|
//! | [`RawSensorSource`] | entrada | leitura analógica instantânea por canal |
//! | [`ActuatorDriver`] | saída | move um servo e aguarda assentar |
//! | [`IndicatorSink`] | saída | LED por comporta, puramente observacional |
//! | [`Clock`] | entrada | tempo monotônico em ms |

use thiserror::Error;

use crate::types::Timestamp;

/// Erro reportado pelo driver físico
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriverError {
    #[error("Attach failed on channel {0}")]
    AttachFailed(usize),
    #[error("Hardware error: {0}")]
    Hardware(String),
}

/// Driver do atuador físico.
///
/// Contrato: anexa o servo do canal, escreve a posição, bloqueia pelo
/// `settle_delay_ms` e solta o servo (evita jitter em repouso). A posição
/// já vem resolvida pela orientação do canal; o driver não interpreta
/// aberto/fechado. Nunca é invocado para canais desabilitados.
///
/// # Exemplo
///
/// ```ignore
/// use gate_core::traits::{ActuatorDriver, DriverError};
///
/// struct PwmServos;
///
/// impl ActuatorDriver for PwmServos {
///     fn move_to(&mut self, channel: usize, position: u16, settle_delay_ms: u64)
///         -> Result<(), DriverError>
///     {
///         // attach → write → delay → detach
///         Ok(())
///     }
/// }
/// ```
pub trait ActuatorDriver {
    /// Move o canal até `position` e aguarda `settle_delay_ms`
    fn move_to(
        &mut self,
        channel: usize,
        position: u16,
        settle_delay_ms: u64,
    ) -> Result<(), DriverError>;
}

/// Fonte de amostras analógicas brutas (uma leitura por canal por tick)
pub trait RawSensorSource {
    /// Leitura instantânea do canal
    fn read(&mut self, channel: usize) -> u16;
}

/// Saída visual por comporta
pub trait IndicatorSink {
    /// Liga/desliga o indicador do canal
    fn set(&mut self, channel: usize, on: bool);
}

/// Relógio monotônico em milissegundos.
///
/// Comparações de intervalo usam subtração sem sinal com wraparound
/// ([`crate::time::elapsed_ms`]), então relógios que dão a volta continuam
/// corretos para intervalos menores que o período do contador.
pub trait Clock {
    /// Timestamp atual (ms)
    fn now(&self) -> Timestamp;
}

impl<T: ActuatorDriver + ?Sized> ActuatorDriver for Box<T> {
    fn move_to(
        &mut self,
        channel: usize,
        position: u16,
        settle_delay_ms: u64,
    ) -> Result<(), DriverError> {
        (**self).move_to(channel, position, settle_delay_ms)
    }
}

impl<T: RawSensorSource + ?Sized> RawSensorSource for Box<T> {
    fn read(&mut self, channel: usize) -> u16 {
        (**self).read(channel)
    }
}

impl<T: IndicatorSink + ?Sized> IndicatorSink for Box<T> {
    fn set(&mut self, channel: usize, on: bool) {
        (**self).set(channel, on)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u16);

    impl RawSensorSource for Fixed {
        fn read(&mut self, _channel: usize) -> u16 {
            self.0
        }
    }

    struct Stopped(Timestamp);

    impl Clock for Stopped {
        fn now(&self) -> Timestamp {
            self.0
        }
    }

    #[test]
    fn test_boxed_source() {
        let mut source: Box<dyn RawSensorSource> = Box::new(Fixed(512));
        assert_eq!(source.read(3), 512);
    }

    #[test]
    fn test_clock_by_reference() {
        let clock = Stopped(42);
        let by_ref = &clock;
        assert_eq!(by_ref.now(), 42);
    }

    #[test]
    fn test_driver_error_display() {
        assert_eq!(DriverError::AttachFailed(3).to_string(), "Attach failed on channel 3");
        assert!(DriverError::Hardware("brownout".into()).to_string().contains("brownout"));
    }
}
