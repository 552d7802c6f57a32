// Coverage table I/O: reading CSV/Excel sources, mapping their columns onto
// coverage records, and writing record tables back out.

pub mod accounts;
pub mod csv;
pub mod error;
pub mod load;
pub mod schema;
pub mod table;
pub mod writer;
pub mod xlsx;

pub use accounts::{load_accounts, AccountSeed};
pub use error::LoadError;
pub use load::{load_coverage, records_from_table, LoadOptions, LoadWarning, LoadedTable};
pub use schema::{ColumnMapping, ResolvedSchema};
pub use table::RawTable;
pub use writer::write_records;
