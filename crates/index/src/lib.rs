//! `xref-index`: analyst coverage cross-reference index.
//!
//! Pure engine crate: receives normalized coverage records, answers overlap
//! and shared-coverage queries. No CLI or file IO dependencies.

pub mod error;
pub mod export;
pub mod index;
pub mod model;

pub use error::{ErrorKind, IndexError};
pub use index::CoverageIndex;
pub use model::{
    AnalystFirm, AnalystSummary, CompanyProfile, ComparisonResult, CoverageRecord, OverlapRow,
    SharedCompanyRow, ACTIVE_CUSTOMER, ALL_INDUSTRIES, UNKNOWN_INDUSTRY, UNKNOWN_STATUS,
};
