//! Mapping of source headers onto coverage fields.
//!
//! Performed once per load. For each logical field an explicitly configured
//! header wins; otherwise the alias list is tried as an exact match (headers
//! compared trimmed, case-insensitive, with `_`/`-` read as spaces). The
//! optional `industry` and `status` fields finally accept the first header
//! containing their keyword, so "GICS Industry" or "Customer Status (CRM)"
//! still resolve.

use crate::error::LoadError;

pub const COMPANY_ALIASES: &[&str] = &[
    "company",
    "company name",
    "account name",
    "account",
    "organization",
    "organization name",
];
pub const ANALYST_ALIASES: &[&str] = &["analyst", "analyst name", "coverage analyst"];
pub const FIRM_ALIASES: &[&str] = &["firm", "firm name", "broker", "brokerage", "institution"];
pub const INDUSTRY_ALIASES: &[&str] = &["industry", "sector", "industry group"];
pub const STATUS_ALIASES: &[&str] = &["status", "customer status", "account status", "account type"];

/// Explicit header names, one per logical field. `None` means "detect".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub company: Option<String>,
    pub analyst: Option<String>,
    pub firm: Option<String>,
    pub industry: Option<String>,
    pub status: Option<String>,
}

/// Column positions for each field of a particular table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub company: usize,
    pub analyst: usize,
    pub firm: usize,
    pub industry: Option<usize>,
    pub status: Option<usize>,
}

impl ResolvedSchema {
    /// Resolve a coverage table's headers. `company`, `analyst` and `firm` are
    /// required.
    pub fn resolve(headers: &[String], mapping: &ColumnMapping) -> Result<Self, LoadError> {
        Ok(Self {
            company: required(headers, "company", mapping.company.as_deref(), COMPANY_ALIASES)?,
            analyst: required(headers, "analyst", mapping.analyst.as_deref(), ANALYST_ALIASES)?,
            firm: required(headers, "firm", mapping.firm.as_deref(), FIRM_ALIASES)?,
            industry: optional(headers, "industry", mapping.industry.as_deref(), INDUSTRY_ALIASES)?,
            status: optional(headers, "status", mapping.status.as_deref(), STATUS_ALIASES)?,
        })
    }
}

/// Normalized header form used for every comparison.
pub fn normalize_header(h: &str) -> String {
    h.trim()
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn required(
    headers: &[String],
    field: &'static str,
    explicit: Option<&str>,
    aliases: &[&str],
) -> Result<usize, LoadError> {
    match explicit {
        Some(name) => find_exact(headers, &[name]).ok_or_else(|| missing(field, &[name])),
        None => find_exact(headers, aliases).ok_or_else(|| missing(field, aliases)),
    }
}

pub(crate) fn optional(
    headers: &[String],
    field: &'static str,
    explicit: Option<&str>,
    aliases: &[&str],
) -> Result<Option<usize>, LoadError> {
    if let Some(name) = explicit {
        // A configured column that is absent is a mistake, not a fallback.
        return find_exact(headers, &[name])
            .map(Some)
            .ok_or_else(|| missing(field, &[name]));
    }
    Ok(find_exact(headers, aliases).or_else(|| find_containing(headers, aliases[0])))
}

fn find_exact(headers: &[String], names: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    names.iter().find_map(|name| {
        let wanted = normalize_header(name);
        normalized.iter().position(|h| *h == wanted)
    })
}

fn find_containing(headers: &[String], keyword: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| normalize_header(h).contains(keyword))
}

fn missing(field: &'static str, tried: &[&str]) -> LoadError {
    LoadError::MissingColumn {
        field,
        tried: tried.iter().map(|s| s.to_string()).collect(),
    }
}
