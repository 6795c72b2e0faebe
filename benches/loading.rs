use criterion::{black_box, criterion_group, criterion_main, Criterion};

use contract_metadata::loader::{LoaderOptions, MetadataLoader};
use contract_metadata::workbook::{Cell, InMemoryWorkbook};

const FEED_HEADER: [&str; 14] = [
    "Modules",
    "Feed",
    "FieldName",
    "DBName",
    "DB Table",
    "DataType",
    "Nullable",
    "Request",
    "Default",
    "Enumeration",
    "RangeBottom",
    "RangeTop",
    "Mandatory",
    "Unique",
];

fn header(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|s| Cell::text(*s)).collect()
}

fn large_workbook(rows: usize) -> InMemoryWorkbook {
    let mut feed = vec![header(&FEED_HEADER)];
    let mut enums = vec![header(&["EnumerationName", "EnumValues"])];
    for i in 0..rows {
        feed.push(vec![
            Cell::text(format!("Module{}", i % 10)),
            Cell::text("feed"),
            Cell::text(format!("field_{i}")),
            Cell::text("STG"),
            Cell::text("stg_table"),
            Cell::text("VARCHAR"),
            Cell::text(if i % 2 == 0 { "Y" } else { "N" }),
            Cell::text("Insert"),
            Cell::Empty,
            Cell::Empty,
            Cell::Float(0.0),
            Cell::Float(i as f64),
            Cell::text("T"),
            Cell::Bool(false),
        ]);
        enums.push(vec![Cell::text(format!("Enum{}", i % 50)), Cell::text(format!("v{i}"))]);
    }

    InMemoryWorkbook::new("bench")
        .with_sheet("Feed_to_staging", feed)
        .with_sheet("Enumeration", enums)
}

fn bench_loading(c: &mut Criterion) {
    let wb = large_workbook(10_000);
    let opts = LoaderOptions {
        observer: None,
        ..Default::default()
    };

    c.bench_function("load_feed_mappings_10k", |b| {
        b.iter(|| {
            let mut loader = MetadataLoader::with_source(Box::new(wb.clone()), opts.clone());
            assert!(loader.load_feed_mappings());
            black_box(loader.summary())
        })
    });

    c.bench_function("load_enumerations_10k", |b| {
        b.iter(|| {
            let mut loader = MetadataLoader::with_source(Box::new(wb.clone()), opts.clone());
            assert!(loader.load_enumerations());
            black_box(loader.summary())
        })
    });
}

criterion_group!(benches, bench_loading);
criterion_main!(benches);
