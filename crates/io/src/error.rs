use std::fmt;

#[derive(Debug)]
pub enum LoadError {
    /// File could not be opened or read.
    Io(String),
    /// File content could not be parsed (bad CSV record, corrupt workbook).
    Parse(String),
    /// Extension is not one of the supported table formats.
    UnsupportedFormat(String),
    /// Workbook contains no worksheets.
    NoSheets,
    /// Requested worksheet does not exist.
    SheetNotFound(String),
    /// A required logical field could not be mapped to any header.
    MissingColumn { field: &'static str, tried: Vec<String> },
    /// No header row found.
    EmptyTable,
    /// Output file could not be written.
    Write(String),
}

impl LoadError {
    /// True for problems with the table's content rather than its access.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::MissingColumn { .. } | Self::EmptyTable | Self::Parse(_))
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::UnsupportedFormat(ext) => {
                write!(f, "unsupported table format '{ext}' (expected csv, tsv, txt, xlsx, xls, xlsb, ods)")
            }
            Self::NoSheets => write!(f, "workbook contains no sheets"),
            Self::SheetNotFound(name) => write!(f, "sheet not found: '{name}'"),
            Self::MissingColumn { field, tried } => {
                write!(f, "no column for '{field}' (tried: {})", tried.join(", "))
            }
            Self::EmptyTable => write!(f, "table has no header row"),
            Self::Write(msg) => write!(f, "write error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}
