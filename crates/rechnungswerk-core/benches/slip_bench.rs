// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the ESR encoder in the rechnungswerk-core crate.
// Batch runs build one slip per invoice, so slip construction (account
// validation included) and the coding line are the hot paths.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use rechnungswerk_core::PaymentSlip;
use rechnungswerk_core::esr::check_digit;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Check digit over a full 27-digit reference.
fn bench_check_digit(c: &mut Criterion) {
    c.bench_function("check_digit (27 digits)", |b| {
        b.iter(|| check_digit(black_box("12000000000023447894321689")));
    });
}

/// Slip construction followed by the coding line, as done once per invoice.
fn bench_coding_line(c: &mut Criterion) {
    let amount = Decimal::new(394975, 2);

    c.bench_function("post slip + coding line", |b| {
        b.iter(|| {
            let slip = PaymentSlip::post(
                vec!["Kita Kinderland".into()],
                black_box(120000000000234478943216899),
                amount,
                "01-162-8",
                vec!["Hans Muster".into()],
            );
            black_box(slip.map(|slip| slip.coding_line()))
        });
    });
}

criterion_group!(benches, bench_check_digit, bench_coding_line);
criterion_main!(benches);
