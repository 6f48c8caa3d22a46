//! Testes do módulo gate-control

use super::*;
use gate_core::mock::{ManualClock, MockDriver, MockIndicators, MockSensorSource};
use gate_core::{GateCommand, GateId};
use gate_sensor::CalibrationMode;

type TestController = Controller<MockSensorSource, MockDriver, MockIndicators, ManualClock>;

fn config(channels: usize) -> ControllerConfig {
    let mut config = ControllerConfig::with_channels(channels);
    config.classifier.window_size = 1;
    config.classifier.calibration = CalibrationMode::Mean { samples: 4 };
    config
}

fn build(
    config: ControllerConfig,
) -> (TestController, MockSensorSource, MockDriver, MockIndicators, ManualClock) {
    let source = MockSensorSource::new(100);
    let driver = MockDriver::new();
    let indicators = MockIndicators::new();
    let clock = ManualClock::new(0);
    let controller = Controller::new(
        config,
        source.clone(),
        driver.clone(),
        indicators.clone(),
        clock.clone(),
    )
    .unwrap();
    (controller, source, driver, indicators, clock)
}

#[test]
fn test_invalid_config_rejected() {
    let result = Controller::new(
        ControllerConfig::with_channels(0),
        MockSensorSource::new(0),
        MockDriver::new(),
        MockIndicators::new(),
        ManualClock::new(0),
    );
    assert!(matches!(result, Err(ControlError::InvalidConfig(_))));
}

#[test]
fn test_startup_calibrates_homes_and_clears_indicators() {
    let mut cfg = config(3);
    cfg.channels[2] = ChannelConfig::without_actuator();
    let (mut controller, source, driver, indicators, _) = build(cfg);
    source.set(1, 40);

    let report = controller.startup().unwrap();
    assert_eq!(report.baselines, vec![Some(100.0), Some(40.0), Some(100.0)]);

    // homing: só canais com servo, para a posição fechada
    let homed: Vec<(usize, u16)> = driver.moves().iter().map(|m| (m.channel, m.position)).collect();
    assert_eq!(homed, vec![(0, 180), (1, 180)]);
    assert_eq!(indicators.write_count(), 3);
    assert!(indicators.lit().is_empty());
    assert_eq!(controller.guard().ops_in_window(0), 0);
}

#[test]
fn test_indicators_written_only_on_change() {
    let (mut controller, _, _, indicators, clock) = build(config(2));
    controller.startup().unwrap();
    let writes = indicators.write_count();

    for _ in 0..20 {
        clock.advance(20);
        controller.cycle(false).unwrap();
    }
    assert_eq!(indicators.write_count(), writes);
}

#[test]
fn test_manual_only_channel_never_sensed() {
    let mut cfg = config(2);
    cfg.channels[0] = ChannelConfig::manual_only();
    let (mut controller, source, driver, _, clock) = build(cfg);
    controller.startup().unwrap();
    driver.clear();

    source.set(0, 1_000);
    for _ in 0..10 {
        clock.advance(20);
        let report = controller.cycle(false).unwrap();
        assert!(!report.active[0]);
        assert_eq!(report.command, None);
    }
    assert_eq!(driver.move_count(), 0);
}

#[test]
fn test_cycle_report_contents() {
    let (mut controller, source, _, _, clock) = build(config(2));
    controller.startup().unwrap();
    source.set(0, 500);

    let mut last = None;
    for _ in 0..3 {
        clock.advance(20);
        last = Some(controller.cycle(false).unwrap());
    }
    let report = last.unwrap();
    assert_eq!(report.now, 60);
    assert_eq!(report.active, vec![true, false]);
    assert_eq!(report.command, Some(GateCommand::Open(GateId::new(0).unwrap())));
    assert!(!report.deferred);
    assert!(report.from_queue.is_empty());
    assert_eq!(report.open_gate, Some(GateId::new(0).unwrap()));
    assert!(!report.error_latched);
    assert_eq!(controller.cycles(), 3);

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"open_gate\":0"));
}

#[test]
fn test_driver_failure_surfaces_without_bookkeeping() {
    let (mut controller, source, driver, _, clock) = build(config(2));
    controller.startup().unwrap();
    driver.set_failing(true);
    source.set(1, 500);

    clock.advance(20);
    controller.cycle(false).unwrap();
    clock.advance(20);
    controller.cycle(false).unwrap();
    clock.advance(20);
    let err = controller.cycle(false).unwrap_err();
    assert!(matches!(err, ControlError::Actuator(gate_actuator::ActuatorError::DriverFailed(_))));
    assert_eq!(controller.arbiter().gates().open_gate(), None);

    driver.set_failing(false);
    clock.advance(20);
    let report = controller.cycle(false).unwrap();
    assert_eq!(report.open_gate, Some(GateId::new(1).unwrap()));
}

#[test]
fn test_repeated_deferral_renews_queued_timestamp() {
    let (mut controller, source, _, _, clock) = build(config(2));
    controller.startup().unwrap();

    source.set(0, 500);
    for _ in 0..3 {
        clock.advance(20);
        controller.cycle(false).unwrap();
    }
    assert_eq!(controller.arbiter().gates().open_gate(), Some(GateId::new(0).unwrap()));

    // fecha em t=120, ainda dentro do intervalo mínimo: fica na fila
    source.set(0, 100);
    let mut last = None;
    for _ in 0..7 {
        clock.advance(20);
        last = Some(controller.cycle(false).unwrap());
    }
    let report = last.unwrap();
    assert_eq!(report.now, 200);
    assert!(report.deferred);

    let queued = controller.status().queued;
    assert_eq!(
        queued,
        vec![gate_actuator::OperationRecord::new(
            GateId::new(0).unwrap(),
            gate_core::Direction::Close,
            200
        )]
    );
}
