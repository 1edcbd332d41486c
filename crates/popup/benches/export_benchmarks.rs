//! Benchmarks for the export pipeline.
//!
//! Measures record normalization and CSV rendering on synthetic summary data.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use datasource_config::QuotePolicy;
use datasource_host::testing::generators::SummaryGenerator;
use datasource_popup::export::{ExportOptions, to_document, to_records};

fn bench_to_records(c: &mut Criterion) {
    let options = ExportOptions::default();
    for rows in [1_000, 10_000] {
        let data = SummaryGenerator::new().with_row_count(rows).generate();
        c.bench_function(&format!("to_records_{rows}"), |b| {
            b.iter(|| black_box(to_records(black_box(&data), &options)))
        });
    }
}

fn bench_to_document(c: &mut Criterion) {
    let data = SummaryGenerator::new().with_row_count(10_000).generate();
    let columns = data.column_names();

    for policy in [QuotePolicy::Necessary, QuotePolicy::Never] {
        let options = ExportOptions {
            quote_policy: policy,
            ..ExportOptions::default()
        };
        let records = to_records(&data, &options);
        c.bench_function(&format!("to_document_10k_{policy}"), |b| {
            b.iter(|| black_box(to_document(black_box(&records), &columns, &options)))
        });
    }
}

criterion_group!(benches, bench_to_records, bench_to_document);
criterion_main!(benches);
