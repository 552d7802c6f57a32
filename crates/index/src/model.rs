use serde::{Deserialize, Serialize};

/// Industry value used when the source has none.
pub const UNKNOWN_INDUSTRY: &str = "Unknown";
/// Status value used when the source has none.
pub const UNKNOWN_STATUS: &str = "Unknown Status";
/// Industry filter value meaning "no filter".
pub const ALL_INDUSTRIES: &str = "All Industries";
/// Status category excluded from prospect candidates (compared case-insensitively).
pub const ACTIVE_CUSTOMER: &str = "active customer";

/// True when `status` names the active-customer category, ignoring case and
/// surrounding whitespace.
pub fn is_active_customer(status: &str) -> bool {
    status.trim().to_lowercase() == ACTIVE_CUSTOMER
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of the coverage table: an analyst at a firm covering a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRecord {
    pub company: String,
    pub analyst: String,
    pub firm: String,
    pub industry: String,
    pub status: String,
}

impl CoverageRecord {
    /// Build a normalized record. Every field is trimmed; blank or missing
    /// industry/status fall back to the sentinels.
    pub fn new(
        company: &str,
        analyst: &str,
        firm: &str,
        industry: Option<&str>,
        status: Option<&str>,
    ) -> Self {
        Self {
            company: company.trim().to_string(),
            analyst: analyst.trim().to_string(),
            firm: firm.trim().to_string(),
            industry: or_sentinel(industry, UNKNOWN_INDUSTRY),
            status: or_sentinel(status, UNKNOWN_STATUS),
        }
    }

    /// Re-apply normalization to a record built elsewhere (e.g. deserialized).
    pub fn normalized(self) -> Self {
        Self::new(
            &self.company,
            &self.analyst,
            &self.firm,
            Some(&self.industry),
            Some(&self.status),
        )
    }

    pub fn is_active_customer(&self) -> bool {
        is_active_customer(&self.status)
    }
}

fn or_sentinel(value: Option<&str>, sentinel: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => sentinel.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Company attributes
// ---------------------------------------------------------------------------

/// Attributes of a company, taken from the first record seen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyProfile {
    pub company: String,
    pub industry: String,
    pub status: String,
    pub analyst_count: usize,
}

// ---------------------------------------------------------------------------
// Pairwise comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapRow {
    pub analyst: String,
    pub firm_a: String,
    pub firm_b: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalystFirm {
    pub analyst: String,
    pub firm: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub company_a: String,
    pub company_b: String,
    pub overlap_count: usize,
    /// Sorted by analyst name.
    pub rows: Vec<OverlapRow>,
    /// Sorted by firm, then analyst.
    pub all_analysts_a: Vec<AnalystFirm>,
    /// Sorted by firm, then analyst.
    pub all_analysts_b: Vec<AnalystFirm>,
}

// ---------------------------------------------------------------------------
// Shared coverage
// ---------------------------------------------------------------------------

/// A company sharing at least one analyst with the query company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedCompanyRow {
    pub company: String,
    pub industry: String,
    pub status: String,
    pub shared_count: usize,
    /// Shared analyst names, sorted, joined with ", ".
    pub analyst_list: String,
}

impl SharedCompanyRow {
    /// Column names used for tabular export, in field order.
    pub const HEADERS: [&'static str; 5] =
        ["company", "industry", "status", "shared_count", "analyst_list"];
}

/// An analyst and the companies they cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalystSummary {
    pub analyst: String,
    pub company_count: usize,
    pub companies: Vec<String>,
    pub firms: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_and_fills_sentinels() {
        let r = CoverageRecord::new("  Acme ", " Alice\t", " FirmX ", None, Some("   "));
        assert_eq!(r.company, "Acme");
        assert_eq!(r.analyst, "Alice");
        assert_eq!(r.firm, "FirmX");
        assert_eq!(r.industry, UNKNOWN_INDUSTRY);
        assert_eq!(r.status, UNKNOWN_STATUS);
    }

    #[test]
    fn case_is_preserved() {
        let r = CoverageRecord::new("acme", "alice SMITH", "firm", Some("tech"), Some("Prospect"));
        assert_eq!(r.analyst, "alice SMITH");
        assert_eq!(r.industry, "tech");
    }

    #[test]
    fn active_customer_ignores_case() {
        assert!(is_active_customer("Active Customer"));
        assert!(is_active_customer("ACTIVE CUSTOMER "));
        assert!(is_active_customer("active customer"));
        assert!(!is_active_customer("Inactive Customer"));
        assert!(!is_active_customer("Active"));
        assert!(!is_active_customer(UNKNOWN_STATUS));
    }

    #[test]
    fn normalized_reapplies_rules() {
        let raw = CoverageRecord {
            company: " Globex".into(),
            analyst: "Bob ".into(),
            firm: "FirmZ".into(),
            industry: "".into(),
            status: " Active Customer ".into(),
        };
        let r = raw.normalized();
        assert_eq!(r.company, "Globex");
        assert_eq!(r.industry, UNKNOWN_INDUSTRY);
        assert_eq!(r.status, "Active Customer");
        assert!(r.is_active_customer());
    }
}
