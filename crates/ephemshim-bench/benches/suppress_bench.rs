//! Per-call overhead of the suppression path the exported stubs take.

use criterion::{Criterion, criterion_group, criterion_main};

use ephemshim_core::suppress::{suppress_exit, suppress_format};
use ephemshim_core::{ShimMode, StubSymbol, ledger, set_shim_mode};

fn bench_suppress(c: &mut Criterion) {
    let mut group = c.benchmark_group("suppress");
    for mode in [ShimMode::Audit, ShimMode::Silent] {
        set_shim_mode(mode);
        group.bench_function(format!("format_{}", mode.as_str()), |b| {
            b.iter(|| suppress_format(criterion::black_box(StubSymbol::Snprintf)));
        });
        group.bench_function(format!("exit_{}", mode.as_str()), |b| {
            b.iter(|| suppress_exit(criterion::black_box(1)));
        });
    }
    group.finish();
    ledger().reset();
}

fn bench_snapshot(c: &mut Criterion) {
    set_shim_mode(ShimMode::Audit);
    for status in 0..32 {
        suppress_exit(status);
    }
    c.bench_function("ledger_snapshot", |b| {
        b.iter(|| criterion::black_box(ledger().snapshot()));
    });
    ledger().reset();
}

criterion_group!(benches, bench_suppress, bench_snapshot);
criterion_main!(benches);
