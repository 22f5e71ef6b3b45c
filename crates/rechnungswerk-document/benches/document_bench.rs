// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for invoice generation in the rechnungswerk-document
// crate: layout alone, and layout plus PDF serialisation.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use rechnungswerk_core::{InvoiceConfig, Invoice, LineItem, PageRule, PaymentSlip, Position, SummaryEntry};
use rechnungswerk_document::InvoiceGenerator;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A three-page invoice with a post slip on the last page.
fn sample_invoice() -> Invoice {
    let mut invoice = Invoice::new("Rechnung 2018-001");
    invoice.recipient = vec!["Familie Muster".into(), "Bahnhofstrasse 1".into(), "3000 Bern".into()];
    invoice.summary = vec![SummaryEntry::new("Kunden-Nr.", "4711")];
    for month in ["Januar", "Februar", "März"] {
        invoice.positions.push(Position::Heading1 { text: month.into() });
        for day in 1..=20 {
            invoice.positions.push(Position::Item(LineItem::new(
                format!("Betreuung {day}. {month}"),
                "1",
                "100.00",
                "100.00",
            )));
        }
    }
    invoice.total = vec![SummaryEntry::new("Total", "3'949.75").bold().underlined()];
    invoice.payment_slip = Some(
        PaymentSlip::post(
            vec!["Kita Kinderland".into(), "3000 Bern".into()],
            120000000000234478943216899,
            dec!(3949.75),
            "01-162-8",
            vec!["Familie Muster".into()],
        )
        .expect("valid slip"),
    );
    invoice
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_render(c: &mut Criterion) {
    let config = InvoiceConfig::default().with_dummy_slip(PageRule::AllButLast);
    let generator = InvoiceGenerator::new(config).expect("valid configuration");
    let invoice = sample_invoice();

    c.bench_function("render invoice (60 positions)", |b| {
        b.iter(|| black_box(generator.render(black_box(&invoice)).expect("renders")));
    });
}

fn bench_generate_pdf(c: &mut Criterion) {
    let generator = InvoiceGenerator::new(InvoiceConfig::default()).expect("valid configuration");
    let invoice = sample_invoice();

    c.bench_function("generate invoice PDF (60 positions)", |b| {
        b.iter(|| black_box(generator.generate(black_box(&invoice)).expect("generates")));
    });
}

criterion_group!(benches, bench_render, bench_generate_pdf);
criterion_main!(benches);
