//! # Controller Benchmarks
//!
//! Measures one full control cycle: sample, classify, arbitrate, guard,
//! indicators.
//!
//! Run: `cargo bench --bench controller_bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use gate_control::{Controller, ControllerConfig};
use gate_core::mock::{ManualClock, MockDriver, MockIndicators, MockSensorSource};
use gate_sensor::CalibrationMode;

type BenchController = Controller<MockSensorSource, MockDriver, MockIndicators, ManualClock>;

fn controller(channels: usize) -> (BenchController, MockSensorSource, MockDriver, ManualClock) {
    let mut config = ControllerConfig::with_channels(channels);
    config.classifier.calibration = CalibrationMode::PeakHold { samples: 10 };
    config.guard.max_ops_per_minute = 1_000;

    let source = MockSensorSource::new(100);
    let driver = MockDriver::new();
    let clock = ManualClock::new(0);
    let mut controller = Controller::new(
        config,
        source.clone(),
        driver.clone(),
        MockIndicators::new(),
        clock.clone(),
    )
    .unwrap();
    controller.startup().unwrap();
    (controller, source, driver, clock)
}

/// Ciclo sem atividade
fn bench_idle_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_idle");

    for channels in [1usize, 4, 8] {
        let (mut controller, _, _, clock) = controller(channels);
        group.bench_with_input(BenchmarkId::from_parameter(channels), &channels, |b, _| {
            b.iter(|| {
                clock.advance(20);
                black_box(controller.cycle(false).unwrap())
            })
        });
    }

    group.finish();
}

/// Ferramentas ligando e desligando em rodízio
fn bench_churn_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_churn");
    let (mut controller, source, driver, clock) = controller(8);
    let mut tick: u64 = 0;

    group.bench_function("8_channels", |b| {
        b.iter(|| {
            tick += 1;
            if tick % 50 == 0 {
                let ch = ((tick / 50) % 8) as usize;
                source.set_all(100);
                source.set(ch, 400);
            }
            clock.advance(20);
            let report = controller.cycle(false);
            driver.clear();
            black_box(report)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_idle_cycle, bench_churn_cycle);

criterion_main!(benches);
