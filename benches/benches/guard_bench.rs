//! # Guard Benchmarks
//!
//! Measures admission checks and queue processing of the actuator guard.
//!
//! Run: `cargo bench --bench guard_bench`

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gate_actuator::{ActuatorGuard, GuardConfig, ServoBank};
use gate_core::mock::MockDriver;
use gate_core::{Direction, GateId};

fn guard(max_ops: usize) -> ActuatorGuard<MockDriver> {
    let config = GuardConfig {
        max_ops_per_minute: max_ops,
        ..Default::default()
    };
    ActuatorGuard::new(config, ServoBank::uniform(8).unwrap(), MockDriver::new()).unwrap()
}

/// Pedido que cai na fila (intervalo não decorrido)
fn bench_deferred_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("guard_request");
    let mut g = guard(10);
    let gate = GateId::new(0).unwrap();
    g.request_open(gate, 0).unwrap();
    let mut now = 1;

    group.bench_function("deferred", |b| {
        b.iter(|| {
            now = 1 + (now + 1) % 1_000;
            black_box(g.request(gate, Direction::Close, now).unwrap())
        })
    });

    group.finish();
}

/// Execução direta com o histórico cheio
fn bench_executed_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("guard_execute");
    let mut g = guard(1_000);
    let mut now: u64 = 0;
    let mut i = 0usize;

    group.bench_function("executed", |b| {
        b.iter(|| {
            // 8 comportas, 300 ms entre pedidos: cada uma volta após 2.4 s
            now += 300;
            i = (i + 1) % 8;
            let gate = GateId::new(i).unwrap();
            let _ = black_box(g.request_open(gate, now));
            g.driver().clear();
        })
    });

    group.finish();
}

/// Fila com todas as comportas pendentes
fn bench_process_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("guard_queue");

    group.bench_function("process_8_pending", |b| {
        b.iter_batched(
            || {
                let mut g = guard(1_000);
                for gate in GateId::all(8) {
                    g.request_open(gate, 0).unwrap();
                    g.request_close(gate, 100).unwrap();
                }
                g
            },
            |mut g| black_box(g.process_queue(5_000)),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_deferred_request, bench_executed_request, bench_process_queue);

criterion_main!(benches);
