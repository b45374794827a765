//! Reading CSV price lists and metadata sidecars from disk.

use std::fs;
use std::path::{Path, PathBuf};

use pricelist_ingest::{
    CsvOptions, IngestError, load_sheet_metadata, load_workbook, read_csv_workbook, sidecar_path,
};
use pricelist_model::{CellRef, CellValue, Workbook};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn reads_semicolon_file_with_bom_and_blank_headers() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        dir.path(),
        "prices.csv",
        "\u{feff}Article;Prijs;;Currency\nA-1;12,50;x;EUR\nA-2;;;\n",
    );

    let workbook = read_csv_workbook(&path, &CsvOptions::default()).expect("read csv");

    assert_eq!(
        workbook.column_names(),
        ["Article", "Prijs", "Unnamed: 2", "Currency"]
    );
    assert_eq!(workbook.rows().len(), 2);
    assert_eq!(workbook.rows()[0][1], CellValue::Text("12,50".to_string()));
    assert_eq!(workbook.rows()[1][1], CellValue::Missing);
    assert_eq!(workbook.header_row(), 1);
}

#[test]
fn header_row_skips_preamble_records() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        dir.path(),
        "prices.csv",
        "Supplier price list 2026,,\nArticle,Price,Brand\n\"A,1\",5,Acme\n",
    );
    let options = CsvOptions {
        delimiter: Some(b','),
        header_row: 2,
    };

    let workbook = read_csv_workbook(&path, &options).expect("read csv");

    assert_eq!(workbook.column_names(), ["Article", "Price", "Brand"]);
    assert_eq!(workbook.rows()[0][0], CellValue::Text("A,1".to_string()));
    assert_eq!(workbook.header_row(), 2);
}

#[test]
fn empty_file_and_missing_header_row_are_errors() {
    let dir = TempDir::new().expect("tempdir");
    let empty = write(dir.path(), "empty.csv", "");
    assert!(matches!(
        read_csv_workbook(&empty, &CsvOptions::default()),
        Err(IngestError::EmptyCsv { .. })
    ));

    let short = write(dir.path(), "short.csv", "Article,Price\n");
    let options = CsvOptions {
        header_row: 3,
        ..CsvOptions::default()
    };
    assert!(matches!(
        read_csv_workbook(&short, &options),
        Err(IngestError::HeaderRowOutOfRange { records: 1, .. })
    ));

    assert!(matches!(
        read_csv_workbook(&dir.path().join("missing.csv"), &CsvOptions::default()),
        Err(IngestError::FileNotFound { .. })
    ));
}

#[test]
fn sidecar_metadata_is_discovered() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(dir.path(), "prices.csv", "Price\n1\n");
    write(
        dir.path(),
        "prices.csv.metadata.json",
        r#"{
            "sheets": {"TemplateContext": {"a1": "{}"}, "Hidden": {}},
            "named_ranges": ["TemplateGenerator"]
        }"#,
    );
    assert_eq!(sidecar_path(&path), dir.path().join("prices.csv.metadata.json"));

    let workbook = load_workbook(&path, &CsvOptions::default(), None).expect("load workbook");

    assert!(workbook.has_sheet("Hidden").expect("metadata"));
    let a1 = CellRef::parse("A1").expect("cell");
    assert_eq!(
        workbook.sheet_cell("TemplateContext", &a1).expect("metadata"),
        Some("{}".to_string())
    );
    assert_eq!(
        workbook.named_ranges().expect("metadata"),
        vec!["TemplateGenerator".to_string()]
    );
}

#[test]
fn malformed_metadata_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(dir.path(), "meta.json", r#"{"sheets": []}"#);
    assert!(matches!(
        load_sheet_metadata(&path),
        Err(IngestError::MetadataFormat { .. })
    ));
}

#[test]
fn corrupt_sidecar_marks_metadata_unreadable() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(dir.path(), "prices.csv", "Price\n1\n");
    write(dir.path(), "prices.csv.metadata.json", "{not json");

    let workbook = load_workbook(&path, &CsvOptions::default(), None).expect("load workbook");

    assert_eq!(workbook.rows().len(), 1);
    assert!(workbook.has_sheet("TemplateContext").is_err());
    assert!(workbook.named_ranges().is_err());
}

#[test]
fn explicit_metadata_path_must_exist() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(dir.path(), "prices.csv", "Price\n1\n");
    let missing = dir.path().join("meta.json");

    assert!(matches!(
        load_workbook(&path, &CsvOptions::default(), Some(&missing)),
        Err(IngestError::FileNotFound { .. })
    ));
}
