mod common;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use contract_metadata::loader::{LoaderOptions, MetadataLoader};
use contract_metadata::workbook::{CsvDirectory, WorkbookSource};

use common::{SheetRows, contract_sheets};

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("contract-metadata-{name}-{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_sheet(dir: &PathBuf, sheet: &str, rows: &SheetRows) {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(dir.join(format!("{sheet}.csv")))
        .unwrap();
    for row in rows {
        wtr.write_record(row).unwrap();
    }
    wtr.flush().unwrap();
}

fn write_contract(dir: &PathBuf, skip: &[&str]) {
    for (sheet, rows) in contract_sheets() {
        if !skip.contains(&sheet) {
            write_sheet(dir, sheet, &rows);
        }
    }
}

fn quiet() -> LoaderOptions {
    LoaderOptions {
        observer: None,
        ..Default::default()
    }
}

#[test]
fn csv_directory_loads_like_a_workbook() {
    let dir = tmp_dir("csv-full");
    write_contract(&dir, &[]);

    let mut loader = MetadataLoader::with_source(Box::new(CsvDirectory::new(&dir)), quiet());
    assert!(loader.load_all());
    let summary = loader.summary();
    assert_eq!(summary.feed_mappings, 3);
    assert_eq!(summary.staging_mappings, 2);
    assert_eq!(summary.enumerations, 2);
    assert_eq!(loader.store().staging_mappings[0].target_table, "customers");
    assert_eq!(loader.store().feed_mappings[0].default_value, None);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn csv_directory_missing_sheet_lists_available() {
    let dir = tmp_dir("csv-missing");
    write_contract(&dir, &["Reconciliations"]);

    let mut source = CsvDirectory::new(&dir);
    assert!(source.check().is_ok());
    let err = source.read_sheet("Reconciliations").unwrap_err().to_string();
    assert!(err.contains("sheet 'Reconciliations' not found"), "{err}");
    assert!(err.contains("Staging to GRI"), "{err}");

    let mut loader = MetadataLoader::with_source(Box::new(CsvDirectory::new(&dir)), quiet());
    assert!(!loader.load_all());
    assert_eq!(loader.summary().patterns, 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn csv_directory_that_does_not_exist_is_unreachable() {
    let source = CsvDirectory::new("definitely/not/a/dir");
    assert!(source.check().is_err());
}
