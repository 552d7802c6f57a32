// Coverage record table output (CSV or XLSX by extension)

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use xref_index::CoverageRecord;

use crate::error::LoadError;
use crate::load::{detect_format, TableFormat};

/// Output column order; readable back by the loader without a mapping.
pub const RECORD_HEADERS: [&str; 5] = ["company", "firm", "analyst", "industry", "status"];

/// Write records to `path`. `.xlsx` produces a workbook, delimited extensions
/// produce CSV.
pub fn write_records(path: &Path, records: &[CoverageRecord]) -> Result<(), LoadError> {
    match detect_format(path)? {
        TableFormat::Delimited => write_csv(path, records),
        TableFormat::Spreadsheet => write_xlsx(path, records),
    }
}

fn fields(r: &CoverageRecord) -> [&str; 5] {
    [
        r.company.as_str(),
        r.firm.as_str(),
        r.analyst.as_str(),
        r.industry.as_str(),
        r.status.as_str(),
    ]
}

fn write_csv(path: &Path, records: &[CoverageRecord]) -> Result<(), LoadError> {
    let mut writer = ::csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| LoadError::Write(format!("{}: {}", path.display(), e)))?;

    writer
        .write_record(RECORD_HEADERS)
        .map_err(|e| LoadError::Write(e.to_string()))?;
    for r in records {
        writer
            .write_record(fields(r))
            .map_err(|e| LoadError::Write(e.to_string()))?;
    }
    writer.flush().map_err(|e| LoadError::Write(e.to_string()))
}

fn write_xlsx(path: &Path, records: &[CoverageRecord]) -> Result<(), LoadError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !ext.eq_ignore_ascii_case("xlsx") {
        return Err(LoadError::UnsupportedFormat(format!("{ext} (write supports xlsx only)")));
    }

    let mut workbook = Workbook::new();
    let sheet = workbook
        .add_worksheet()
        .set_name("coverage")
        .map_err(|e| LoadError::Write(format!("failed to create sheet: {}", e)))?;

    let bold = Format::new().set_bold();
    for (col, header) in RECORD_HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| LoadError::Write(e.to_string()))?;
    }
    for (i, r) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in fields(r).iter().enumerate() {
            sheet
                .write_string(row, col as u16, *value)
                .map_err(|e| LoadError::Write(e.to_string()))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| LoadError::Write(format!("failed to save {}: {}", path.display(), e)))
}
