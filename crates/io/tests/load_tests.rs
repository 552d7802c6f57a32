// End-to-end loading: file on disk -> records -> index.

use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;
use xref_index::{CoverageIndex, UNKNOWN_INDUSTRY};
use xref_io::{load_coverage, ColumnMapping, LoadError, LoadOptions, LoadWarning};

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn table_without_industry_loads_and_indexes() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir,
        "coverage.csv",
        "Company,Analyst,Firm,Status\n\
         Acme,Alice,FirmX,Prospect\n\
         Globex,Alice,FirmY,Active Customer\n\
         Globex,Bob,FirmZ,Active Customer\n",
    );

    let loaded = load_coverage(&path, &LoadOptions::default()).unwrap();
    assert!(loaded.warnings.contains(&LoadWarning::SynthesizedIndustry));
    assert!(loaded.records.iter().all(|r| r.industry == UNKNOWN_INDUSTRY));

    let idx = CoverageIndex::build(&loaded.records).unwrap();
    assert_eq!(idx.list_industries(), vec![UNKNOWN_INDUSTRY]);
    let prospects = idx.find_prospects_for("Globex").unwrap();
    assert_eq!(prospects.len(), 1);
    assert_eq!(prospects[0].company, "Acme");
}

#[test]
fn semicolon_export_with_custom_headers() {
    let dir = tempdir().unwrap();
    let path = write(
        &dir,
        "crm_export.txt",
        "Organization Name;Coverage Analyst;Broker;Vertical;Account Status\n\
         Acme;Alice;FirmX;Tech;Prospect\n\
         Initech;Alice;FirmX;Tech;Prospect\n",
    );

    let options = LoadOptions {
        columns: ColumnMapping {
            industry: Some("Vertical".into()),
            ..ColumnMapping::default()
        },
        sheet: None,
    };
    let loaded = load_coverage(&path, &options).unwrap();
    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.records[0].company, "Acme");
    assert_eq!(loaded.records[0].firm, "FirmX");
    assert_eq!(loaded.records[0].industry, "Tech");
    assert_eq!(loaded.records[1].status, "Prospect");
}

#[test]
fn missing_analyst_column_is_data_error() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "bad.csv", "company,firm\nAcme,FirmX\n");
    let err = load_coverage(&path, &LoadOptions::default()).unwrap_err();
    assert!(err.is_data_error());
    assert!(err.to_string().contains("analyst"));
}

#[test]
fn header_only_table_fails_at_index_build() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "empty.csv", "company,analyst,firm\n");
    let loaded = load_coverage(&path, &LoadOptions::default()).unwrap();
    assert!(loaded.records.is_empty());
    assert!(CoverageIndex::build(&loaded.records).unwrap_err().is_data_error());
}

#[test]
fn unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = write(&dir, "coverage.json", "[]");
    let err = load_coverage(&path, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFormat(_)));
}
