//! # Classifier Benchmarks
//!
//! Measures the per-tick cost of sampling and classifying channels.
//!
//! Run: `cargo bench --bench classifier_bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use gate_core::GateId;
use gate_core::mock::MockSensorSource;
use gate_sensor::{CalibrationMode, ClassifierConfig, SignalClassifier};

fn classifier(channels: usize) -> SignalClassifier {
    let config = ClassifierConfig {
        calibration: CalibrationMode::PeakHold { samples: 10 },
        ..Default::default()
    };
    let mut classifier = SignalClassifier::new(config, channels).unwrap();
    for id in GateId::all(channels) {
        classifier.set_baseline(id, 100.0).unwrap();
    }
    classifier
}

/// Uma amostra + classificação em um canal
fn bench_single_channel(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier_single");
    let mut classifier = classifier(1);
    let id = GateId::new(0).unwrap();
    let mut value: u16 = 0;

    group.bench_function("sample_and_classify", |b| {
        b.iter(|| {
            value = (value + 37) % 400;
            classifier.sample(id, value).unwrap();
            black_box(classifier.is_active(id).unwrap())
        })
    });

    group.bench_function("snapshot", |b| b.iter(|| black_box(classifier.snapshot(id).unwrap())));

    group.finish();
}

/// Tick completo para N canais
fn bench_all_channels(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier_tick");

    for channels in [1usize, 4, 8] {
        let mut classifier = classifier(channels);
        let mut source = MockSensorSource::new(250);

        group.bench_with_input(BenchmarkId::from_parameter(channels), &channels, |b, _| {
            b.iter(|| {
                classifier.sample_all(&mut source);
                black_box(classifier.classify_all())
            })
        });
    }

    group.finish();
}

/// Calibração de pico com a contagem de fábrica
fn bench_calibration(c: &mut Criterion) {
    let mut group = c.benchmark_group("calibration");
    let mut source = MockSensorSource::new(120);

    for mode in [CalibrationMode::peak_hold(), CalibrationMode::mean()] {
        let config = ClassifierConfig {
            calibration: mode,
            ..Default::default()
        };
        let mut classifier = SignalClassifier::new(config, 8).unwrap();
        group.bench_function(format!("{:?}", mode), |b| {
            b.iter(|| black_box(classifier.calibrate(&mut source).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_channel, bench_all_channels, bench_calibration);

criterion_main!(benches);
