use std::fmt;

/// Broad classification used by callers to pick a user-facing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input table missing, empty, or malformed.
    Data,
    /// A referenced company is not usable for the query.
    NotFound,
    /// Result serialization failed.
    Export,
}

#[derive(Debug)]
pub enum IndexError {
    /// The input table has no records.
    EmptyInput,
    /// A record lacks a mandatory field after trimming. `row` is the 1-based
    /// position among records, which excludes the header and skipped blank rows.
    MissingField { row: usize, field: &'static str },
    /// The company is not present in the index.
    CompanyNotFound(String),
    /// Prospect search anchored on a company that is not an active customer.
    NotActiveCustomer { company: String, status: String },
    /// CSV serialization error.
    Export(String),
}

impl IndexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput | Self::MissingField { .. } => ErrorKind::Data,
            Self::CompanyNotFound(_) | Self::NotActiveCustomer { .. } => ErrorKind::NotFound,
            Self::Export(_) => ErrorKind::Export,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_data_error(&self) -> bool {
        self.kind() == ErrorKind::Data
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "coverage table is empty"),
            Self::MissingField { row, field } => {
                write!(
                    f,
                    "record {row} (excluding header and blank rows): missing required field '{field}'"
                )
            }
            Self::CompanyNotFound(name) => write!(f, "company not found: '{name}'"),
            Self::NotActiveCustomer { company, status } => {
                write!(f, "'{company}' is not an active customer (status: '{status}')")
            }
            Self::Export(msg) => write!(f, "export error: {msg}"),
        }
    }
}

impl std::error::Error for IndexError {}
