//! Account lists: the company names fed to the enrichment producer.

use std::collections::HashSet;
use std::path::Path;

use crate::error::LoadError;
use crate::load::read_raw;
use crate::schema::{optional, required, COMPANY_ALIASES, INDUSTRY_ALIASES, STATUS_ALIASES};
use crate::table::RawTable;

/// A company to look up, with whatever attributes the account list carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSeed {
    pub company: String,
    pub industry: Option<String>,
    pub status: Option<String>,
}

impl AccountSeed {
    pub fn named(company: &str) -> Self {
        Self {
            company: company.trim().to_string(),
            industry: None,
            status: None,
        }
    }
}

/// Read an account list. `column` names the company column explicitly;
/// otherwise the usual company aliases ("Account Name", "Company", ...) apply.
pub fn load_accounts(
    path: &Path,
    column: Option<&str>,
    sheet: Option<&str>,
) -> Result<Vec<AccountSeed>, LoadError> {
    let table = read_raw(path, sheet)?;
    let seeds = seeds_from_table(&table, column)?;
    log::info!("loaded {} accounts from {}", seeds.len(), path.display());
    Ok(seeds)
}

/// Unique accounts in first-seen order; blank names are skipped.
pub fn seeds_from_table(table: &RawTable, column: Option<&str>) -> Result<Vec<AccountSeed>, LoadError> {
    let company_col = required(&table.headers, "company", column, COMPANY_ALIASES)?;
    let industry_col = optional(&table.headers, "industry", None, INDUSTRY_ALIASES)?;
    let status_col = optional(&table.headers, "status", None, STATUS_ALIASES)?;

    let attr = |row: usize, col: Option<usize>| -> Option<String> {
        col.map(|c| table.cell(row, c).trim())
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    let mut seen = HashSet::new();
    let mut seeds = Vec::new();
    for i in 0..table.rows.len() {
        let company = table.cell(i, company_col).trim();
        if company.is_empty() || !seen.insert(company.to_string()) {
            continue;
        }
        seeds.push(AccountSeed {
            company: company.to_string(),
            industry: attr(i, industry_col),
            status: attr(i, status_col),
        });
    }
    Ok(seeds)
}
