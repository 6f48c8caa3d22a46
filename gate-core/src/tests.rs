//! Testes do módulo gate-core

use crate::mock::{ManualClock, MockDriver, MockIndicators, MockSensorSource};
use crate::prelude::*;

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES DE INTEROPERABILIDADE DOS TRAITS
// ═══════════════════════════════════════════════════════════════════════════════

fn drive_all<D: ActuatorDriver>(
    driver: &mut D,
    count: usize,
    position: u16,
) -> Result<(), DriverError> {
    for gate in GateId::all(count) {
        driver.move_to(gate.index(), position, 0)?;
    }
    Ok(())
}

#[test]
fn test_generic_driver_usage() {
    let driver = MockDriver::new();
    let mut owned = driver.clone();
    drive_all(&mut owned, 5, 180).unwrap();
    assert_eq!(driver.move_count(), 5);
    assert!(driver.moves().iter().all(|m| m.position == 180));
}

#[test]
fn test_dyn_dispatch_for_all_interfaces() {
    let mut source: Box<dyn RawSensorSource> = Box::new(MockSensorSource::new(321));
    let mut leds: Box<dyn IndicatorSink> = Box::new(MockIndicators::new());
    let mut driver: Box<dyn ActuatorDriver> = Box::new(MockDriver::new());

    assert_eq!(source.read(0), 321);
    leds.set(0, true);
    assert!(driver.move_to(0, 0, 0).is_ok());
}

#[test]
fn test_clock_interval_arithmetic() {
    let clock = ManualClock::new(u64::MAX - 999);
    let start = clock.now();
    clock.advance(2_000);
    assert_eq!(elapsed_ms(clock.now(), start), 2_000);
    assert!(deadline_reached(clock.now(), start.wrapping_add(1_500)));
}

#[test]
fn test_selection_cycle_over_configured_count() {
    let count = 3;
    let mut sel = GateSelection::default();
    assert!(sel.is_all_closed());

    for expected in 0..count {
        sel = sel.next(count);
        assert_eq!(sel.gate().map(GateId::index), Some(expected));
    }

    sel = sel.next(count);
    assert!(sel.is_all_closed());
}
