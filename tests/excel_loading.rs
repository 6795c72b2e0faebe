#![cfg(feature = "excel_test_writer")]

mod common;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use contract_metadata::MetadataLoader;
use contract_metadata::loader::LoaderOptions;
use contract_metadata::workbook::{ExcelWorkbook, WorkbookSource};

use common::{SheetRows, contract_sheets};

fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("contract-metadata-{name}-{nanos}.{ext}"))
}

/// Write the contract sheets; numeric-looking cells are written as numbers, like a user would.
fn write_contract_xlsx(path: &PathBuf, skip: &[&str]) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();
    for (sheet, rows) in contract_sheets() {
        if skip.contains(&sheet) {
            continue;
        }
        let ws = wb.add_worksheet();
        ws.set_name(sheet).unwrap();
        write_rows(ws, &rows);
    }
    wb.save(path).unwrap();
}

fn write_rows(ws: &mut rust_xlsxwriter::Worksheet, rows: &SheetRows) {
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let (r, c) = (r as u32, c as u16);
            match value.parse::<f64>() {
                Ok(n) => ws.write_number(r, c, n).unwrap(),
                Err(_) => ws.write_string(r, c, *value).unwrap(),
            };
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
fn excel_workbook_happy_path() {
    let path = tmp_file("contract", "xlsx");
    write_contract_xlsx(&path, &[]);

    let mut loader = MetadataLoader::with_source(Box::new(ExcelWorkbook::new(&path)), quiet());
    assert!(loader.load_all());
    let summary = loader.summary();
    assert_eq!(summary.feed_mappings, 3);
    assert_eq!(summary.staging_mappings, 2);
    assert_eq!(summary.enumerations, 2);
    assert_eq!(summary.patterns, 1);
    assert_eq!(summary.reconciliation_rules, 2);

    // Numeric cells: "1" flag written as a number still reads as true; ranges read as floats.
    let feed = &loader.store().feed_mappings;
    assert!(feed[2].mandatory);
    assert_eq!(feed[0].range_bottom, Some(1.0));
    assert_eq!(feed[2].default_value.as_deref(), Some("0"));
    assert_eq!(loader.store().reconciliation_rules[0].tolerance, Some(0.01));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn excel_new_uses_default_options() {
    let path = tmp_file("contract-new", "xlsx");
    write_contract_xlsx(&path, &[]);

    let mut loader = MetadataLoader::new(&path);
    assert!(loader.validate_source());
    assert!(loader.load_all());
    assert_eq!(loader.enumeration_values("Status"), ["Active", "Inactive"]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn excel_missing_sheet_fails_load() {
    let path = tmp_file("contract-missing", "xlsx");
    write_contract_xlsx(&path, &["Staging to GRI"]);

    let mut source = ExcelWorkbook::new(&path);
    let err = source.read_sheet("Staging to GRI").unwrap_err().to_string();
    assert!(err.contains("sheet 'Staging to GRI' not found"), "{err}");

    let mut loader = MetadataLoader::with_source(Box::new(ExcelWorkbook::new(&path)), quiet());
    assert!(!loader.load_all());
    assert_eq!(loader.summary().feed_mappings, 3);
    assert_eq!(loader.summary().staging_mappings, 0);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn excel_missing_file_fails_validation() {
    let path = tmp_file("never-written", "xlsx");
    let mut loader = MetadataLoader::with_source(Box::new(ExcelWorkbook::new(&path)), quiet());
    assert!(!loader.validate_source());
    assert!(!loader.load_all());
}
