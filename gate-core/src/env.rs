//! Environment configuration loading from .env files
//!
//! Carrega constantes de operação de `.env` ou de variáveis de ambiente.
//! Os valores são lidos uma única vez por processo; nada é relido em tempo
//! de execução.

use std::env;
use std::str::FromStr;

use once_cell::sync::Lazy;

/// Leituras na média móvel (AVG_READINGS)
pub const DEFAULT_AVG_READINGS: usize = 25;
/// Multiplicador de ligamento sobre o baseline
pub const DEFAULT_SENSITIVITY_ON: f32 = 2.0;
/// Multiplicador de desligamento sobre o baseline
pub const DEFAULT_SENSITIVITY_OFF: f32 = 1.5;
/// Classificações consecutivas para aceitar uma mudança
pub const DEFAULT_DEBOUNCE_STABLE_READINGS: u32 = 3;
/// Intervalo mínimo entre operações na mesma comporta (ms)
pub const DEFAULT_MIN_SERVO_INTERVAL_MS: u64 = 2_000;
/// Máximo de operações em qualquer janela de 60s
pub const DEFAULT_MAX_OPS_PER_MINUTE: usize = 10;
/// Atraso entre soltar o botão e efetivar a seleção (ms)
pub const DEFAULT_OPEN_DELAY_MS: u64 = 1_000;
/// Janela de estabilidade do botão (ms)
pub const DEFAULT_BUTTON_DEBOUNCE_MS: u64 = 50;

// Automatically load .env when config module is accessed
static DOTENV_INIT: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

/// Ensure environment is loaded
#[inline]
fn ensure_loaded() {
    let _ = &*DOTENV_INIT;
}

fn parse_var<T: FromStr + Copy>(key: &str, default: T) -> T {
    ensure_loaded();
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "ignoring unparsable environment override");
                default
            }
        },
        Err(_) => default,
    }
}

/// Load rolling window size from environment
/// Default: 25 readings
pub fn avg_readings() -> usize {
    parse_var("GATE_AVG_READINGS", DEFAULT_AVG_READINGS)
}

/// Load turn-on sensitivity from environment
/// Default: 2.0× baseline
pub fn sensitivity_on() -> f32 {
    parse_var("GATE_SENSITIVITY_ON", DEFAULT_SENSITIVITY_ON)
}

/// Load turn-off sensitivity from environment
/// Default: 1.5× baseline
pub fn sensitivity_off() -> f32 {
    parse_var("GATE_SENSITIVITY_OFF", DEFAULT_SENSITIVITY_OFF)
}

/// Load debounce stable readings from environment
/// Default: 3
pub fn debounce_stable_readings() -> u32 {
    parse_var("GATE_DEBOUNCE_STABLE_READINGS", DEFAULT_DEBOUNCE_STABLE_READINGS)
}

/// Load minimum servo interval from environment
/// Default: 2000 ms
pub fn min_servo_interval_ms() -> u64 {
    parse_var("GATE_MIN_SERVO_INTERVAL_MS", DEFAULT_MIN_SERVO_INTERVAL_MS)
}

/// Load global operation cap from environment
/// Default: 10 per minute
pub fn max_ops_per_minute() -> usize {
    parse_var("GATE_MAX_OPS_PER_MINUTE", DEFAULT_MAX_OPS_PER_MINUTE)
}

/// Load manual commit delay from environment
/// Default: 1000 ms
pub fn open_delay_ms() -> u64 {
    parse_var("GATE_OPEN_DELAY_MS", DEFAULT_OPEN_DELAY_MS)
}

/// Load button debounce window from environment
/// Default: 50 ms
pub fn button_debounce_ms() -> u64 {
    parse_var("GATE_BUTTON_DEBOUNCE_MS", DEFAULT_BUTTON_DEBOUNCE_MS)
}

/// Cached values
pub static AVG_READINGS: Lazy<usize> = Lazy::new(avg_readings);
pub static SENSITIVITY_ON: Lazy<f32> = Lazy::new(sensitivity_on);
pub static SENSITIVITY_OFF: Lazy<f32> = Lazy::new(sensitivity_off);
pub static DEBOUNCE_STABLE_READINGS: Lazy<u32> = Lazy::new(debounce_stable_readings);
pub static MIN_SERVO_INTERVAL_MS: Lazy<u64> = Lazy::new(min_servo_interval_ms);
pub static MAX_OPS_PER_MINUTE: Lazy<usize> = Lazy::new(max_ops_per_minute);
pub static OPEN_DELAY_MS: Lazy<u64> = Lazy::new(open_delay_ms);
pub static BUTTON_DEBOUNCE_MS: Lazy<u64> = Lazy::new(button_debounce_ms);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_falls_back_on_missing_key() {
        let value: u64 = parse_var("GATE_TEST_SURELY_UNSET_KEY", 1234);
        assert_eq!(value, 1234);
    }

    #[test]
    fn test_defaults_are_consistent() {
        assert!(DEFAULT_SENSITIVITY_OFF <= DEFAULT_SENSITIVITY_ON);
        assert!(DEFAULT_DEBOUNCE_STABLE_READINGS >= 1);
        assert!(DEFAULT_MAX_OPS_PER_MINUTE >= 1);
    }
}
