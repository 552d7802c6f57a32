use std::fmt;
use std::path::Path;

use xref_index::CoverageRecord;

use crate::error::LoadError;
use crate::schema::{ColumnMapping, ResolvedSchema};
use crate::table::{is_blank, RawTable};

/// How to read a coverage table.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub columns: ColumnMapping,
    /// Worksheet name for spreadsheet sources; first sheet when `None`.
    pub sheet: Option<String>,
}

/// Conditions worth telling the user about that do not stop the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// No industry column: every record was given the unknown industry.
    SynthesizedIndustry,
    /// No status column: every record was given the unknown status.
    SynthesizedStatus,
    /// Rows with no content at all were dropped.
    SkippedBlankRows(usize),
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SynthesizedIndustry => {
                write!(f, "no industry column found; all industries set to \"{}\"", xref_index::UNKNOWN_INDUSTRY)
            }
            Self::SynthesizedStatus => {
                write!(f, "no status column found; all statuses set to \"{}\"", xref_index::UNKNOWN_STATUS)
            }
            Self::SkippedBlankRows(n) => write!(f, "skipped {n} blank row(s)"),
        }
    }
}

/// Normalized records plus any load warnings.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub records: Vec<CoverageRecord>,
    pub warnings: Vec<LoadWarning>,
}

/// Kinds of table file the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableFormat {
    Delimited,
    Spreadsheet,
}

pub(crate) fn detect_format(path: &Path) -> Result<TableFormat, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" | "tsv" | "txt" => Ok(TableFormat::Delimited),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(TableFormat::Spreadsheet),
        _ => Err(LoadError::UnsupportedFormat(ext)),
    }
}

pub(crate) fn read_raw(path: &Path, sheet: Option<&str>) -> Result<RawTable, LoadError> {
    match detect_format(path)? {
        TableFormat::Delimited => crate::csv::read_table(path),
        TableFormat::Spreadsheet => crate::xlsx::read_table(path, sheet),
    }
}

/// Load a coverage table from a CSV or spreadsheet file.
pub fn load_coverage(path: &Path, options: &LoadOptions) -> Result<LoadedTable, LoadError> {
    let table = read_raw(path, options.sheet.as_deref())?;
    let loaded = records_from_table(&table, &options.columns)?;
    log::info!(
        "loaded {} coverage records from {}",
        loaded.records.len(),
        path.display()
    );
    Ok(loaded)
}

/// Map a raw table onto coverage records.
pub fn records_from_table(table: &RawTable, columns: &ColumnMapping) -> Result<LoadedTable, LoadError> {
    let schema = ResolvedSchema::resolve(&table.headers, columns)?;
    log::debug!("resolved schema: {:?}", schema);

    let mut warnings = Vec::new();
    if schema.industry.is_none() {
        warnings.push(LoadWarning::SynthesizedIndustry);
    }
    if schema.status.is_none() {
        warnings.push(LoadWarning::SynthesizedStatus);
    }

    let mut records = Vec::with_capacity(table.rows.len());
    let mut blank = 0usize;

    for (i, row) in table.rows.iter().enumerate() {
        if is_blank(row) {
            blank += 1;
            continue;
        }
        records.push(CoverageRecord::new(
            table.cell(i, schema.company),
            table.cell(i, schema.analyst),
            table.cell(i, schema.firm),
            schema.industry.map(|c| table.cell(i, c)),
            schema.status.map(|c| table.cell(i, c)),
        ));
    }

    if blank > 0 {
        warnings.push(LoadWarning::SkippedBlankRows(blank));
    }

    Ok(LoadedTable { records, warnings })
}
