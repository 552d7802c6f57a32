use std::collections::{BTreeMap, BTreeSet};

use crate::error::IndexError;
use crate::model::{
    is_active_customer, AnalystFirm, AnalystSummary, CompanyProfile, ComparisonResult,
    CoverageRecord, OverlapRow, SharedCompanyRow, ALL_INDUSTRIES,
};

/// Per-company coverage, derived once at build time.
#[derive(Debug, Clone)]
struct CompanyEntry {
    industry: String,
    status: String,
    /// Analyst -> firm of the first record seen for that analyst under this company.
    analysts: BTreeMap<String, String>,
    /// Every distinct (firm, analyst) pair recorded for this company.
    pairs: BTreeSet<(String, String)>,
}

/// Immutable cross-reference over a coverage table.
///
/// Built once per session; every query takes `&self` and never mutates, so a
/// single instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct CoverageIndex {
    companies: BTreeMap<String, CompanyEntry>,
    industries: BTreeSet<String>,
    record_count: usize,
}

impl CoverageIndex {
    /// Normalize `records` and build the company -> analysts and
    /// company -> attributes mappings.
    ///
    /// Attributes come from the first record of each company. A record with a
    /// blank analyst registers its company without adding coverage.
    pub fn build(records: &[CoverageRecord]) -> Result<Self, IndexError> {
        if records.is_empty() {
            return Err(IndexError::EmptyInput);
        }

        let mut companies: BTreeMap<String, CompanyEntry> = BTreeMap::new();
        let mut industries = BTreeSet::new();

        for (i, raw) in records.iter().enumerate() {
            let rec = raw.clone().normalized();
            if rec.company.is_empty() {
                return Err(IndexError::MissingField { row: i + 1, field: "company" });
            }

            industries.insert(rec.industry.clone());

            let entry = companies.entry(rec.company).or_insert_with(|| CompanyEntry {
                industry: rec.industry,
                status: rec.status,
                analysts: BTreeMap::new(),
                pairs: BTreeSet::new(),
            });

            if rec.analyst.is_empty() {
                continue;
            }

            entry
                .analysts
                .entry(rec.analyst.clone())
                .or_insert_with(|| rec.firm.clone());
            entry.pairs.insert((rec.firm, rec.analyst));
        }

        log::debug!(
            "indexed {} records: {} companies, {} industries",
            records.len(),
            companies.len(),
            industries.len()
        );

        Ok(Self {
            companies,
            industries,
            record_count: records.len(),
        })
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn company_count(&self) -> usize {
        self.companies.len()
    }

    pub fn contains(&self, company: &str) -> bool {
        self.companies.contains_key(company)
    }

    /// All company names, sorted and deduplicated.
    pub fn list_companies(&self) -> Vec<String> {
        self.companies.keys().cloned().collect()
    }

    /// All industry values, sorted and deduplicated.
    pub fn list_industries(&self) -> Vec<String> {
        self.industries.iter().cloned().collect()
    }

    /// Companies whose status is active customer: the valid anchors for
    /// [`find_prospects_for`](Self::find_prospects_for).
    pub fn list_active_customers(&self) -> Vec<String> {
        self.companies
            .iter()
            .filter(|(_, e)| is_active_customer(&e.status))
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn company(&self, company: &str) -> Option<CompanyProfile> {
        self.companies.get(company).map(|e| CompanyProfile {
            company: company.to_string(),
            industry: e.industry.clone(),
            status: e.status.clone(),
            analyst_count: e.analysts.len(),
        })
    }

    /// Analysts covering both companies, with the firm each is listed under
    /// for either side.
    pub fn compare_two(
        &self,
        company_a: &str,
        company_b: &str,
    ) -> Result<ComparisonResult, IndexError> {
        let a = self.entry(company_a)?;
        let b = self.entry(company_b)?;

        let rows: Vec<OverlapRow> = a
            .analysts
            .iter()
            .filter_map(|(analyst, firm_a)| {
                b.analysts.get(analyst).map(|firm_b| OverlapRow {
                    analyst: analyst.clone(),
                    firm_a: firm_a.clone(),
                    firm_b: firm_b.clone(),
                })
            })
            .collect();

        Ok(ComparisonResult {
            company_a: company_a.to_string(),
            company_b: company_b.to_string(),
            overlap_count: rows.len(),
            rows,
            all_analysts_a: all_analysts(a),
            all_analysts_b: all_analysts(b),
        })
    }

    /// Every other company sharing at least one analyst with `company`,
    /// optionally restricted to one industry.
    pub fn find_shared_with(
        &self,
        company: &str,
        industry_filter: Option<&str>,
    ) -> Result<Vec<SharedCompanyRow>, IndexError> {
        let anchor = self.entry(company)?;
        let industry = industry_filter.filter(|f| *f != ALL_INDUSTRIES);

        Ok(self.shared_rows(company, anchor, |candidate| match industry {
            Some(wanted) => candidate.industry == wanted,
            None => true,
        }))
    }

    /// Non-customer companies sharing analysts with an active customer.
    pub fn find_prospects_for(
        &self,
        active_customer: &str,
    ) -> Result<Vec<SharedCompanyRow>, IndexError> {
        let anchor = self.entry(active_customer)?;
        if !is_active_customer(&anchor.status) {
            return Err(IndexError::NotActiveCustomer {
                company: active_customer.to_string(),
                status: anchor.status.clone(),
            });
        }

        Ok(self.shared_rows(active_customer, anchor, |candidate| {
            !is_active_customer(&candidate.status)
        }))
    }

    /// Analysts covering at least `min_companies` distinct companies, most
    /// prolific first.
    pub fn multi_coverage_analysts(&self, min_companies: usize) -> Vec<AnalystSummary> {
        let mut by_analyst: BTreeMap<&str, (BTreeSet<&str>, BTreeSet<&str>)> = BTreeMap::new();
        for (name, entry) in &self.companies {
            for (firm, analyst) in &entry.pairs {
                let slot = by_analyst.entry(analyst.as_str()).or_default();
                slot.0.insert(name.as_str());
                if !firm.is_empty() {
                    slot.1.insert(firm.as_str());
                }
            }
        }

        let min = min_companies.max(1);
        let mut out: Vec<AnalystSummary> = by_analyst
            .into_iter()
            .filter(|(_, (companies, _))| companies.len() >= min)
            .map(|(analyst, (companies, firms))| AnalystSummary {
                analyst: analyst.to_string(),
                company_count: companies.len(),
                companies: companies.into_iter().map(String::from).collect(),
                firms: firms.into_iter().map(String::from).collect(),
            })
            .collect();

        out.sort_by(|x, y| {
            y.company_count
                .cmp(&x.company_count)
                .then_with(|| x.analyst.cmp(&y.analyst))
        });
        out
    }

    fn entry(&self, company: &str) -> Result<&CompanyEntry, IndexError> {
        self.companies
            .get(company)
            .ok_or_else(|| IndexError::CompanyNotFound(company.to_string()))
    }

    fn shared_rows<F>(&self, anchor_name: &str, anchor: &CompanyEntry, include: F) -> Vec<SharedCompanyRow>
    where
        F: Fn(&CompanyEntry) -> bool,
    {
        let mut rows: Vec<SharedCompanyRow> = self
            .companies
            .iter()
            .filter(|&(name, candidate)| name.as_str() != anchor_name && include(candidate))
            .filter_map(|(name, candidate)| {
                // BTreeMap keys iterate sorted, so the joined list is sorted too.
                let shared: Vec<&str> = anchor
                    .analysts
                    .keys()
                    .filter(|a| candidate.analysts.contains_key(*a))
                    .map(String::as_str)
                    .collect();
                if shared.is_empty() {
                    return None;
                }
                Some(SharedCompanyRow {
                    company: name.clone(),
                    industry: candidate.industry.clone(),
                    status: candidate.status.clone(),
                    shared_count: shared.len(),
                    analyst_list: shared.join(", "),
                })
            })
            .collect();

        rows.sort_by(|x, y| {
            y.shared_count
                .cmp(&x.shared_count)
                .then_with(|| x.company.cmp(&y.company))
        });
        rows
    }
}

fn all_analysts(entry: &CompanyEntry) -> Vec<AnalystFirm> {
    entry
        .pairs
        .iter()
        .map(|(firm, analyst)| AnalystFirm {
            analyst: analyst.clone(),
            firm: firm.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{UNKNOWN_INDUSTRY, UNKNOWN_STATUS};

    fn rec(company: &str, analyst: &str, firm: &str, industry: &str, status: &str) -> CoverageRecord {
        CoverageRecord::new(company, analyst, firm, Some(industry), Some(status))
    }

    #[test]
    fn build_rejects_empty_table() {
        let err = CoverageIndex::build(&[]).unwrap_err();
        assert!(err.is_data_error());
    }

    #[test]
    fn build_rejects_blank_company() {
        let records = vec![
            rec("Acme", "Alice", "FirmX", "Tech", "Prospect"),
            rec("   ", "Bob", "FirmY", "Tech", "Prospect"),
        ];
        let err = CoverageIndex::build(&records).unwrap_err();
        match err {
            IndexError::MissingField { row, field } => {
                assert_eq!(row, 2);
                assert_eq!(field, "company");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn companies_are_trimmed_and_deduplicated() {
        let records = vec![
            rec("Globex ", "Alice", "FirmX", "Tech", "Prospect"),
            rec(" Acme", "Bob", "FirmY", "Tech", "Prospect"),
            rec("Globex", "Carol", "FirmZ", "Tech", "Prospect"),
        ];
        let idx = CoverageIndex::build(&records).unwrap();
        assert_eq!(idx.list_companies(), vec!["Acme", "Globex"]);
        assert_eq!(idx.record_count(), 3);
        assert_eq!(idx.company_count(), 2);
    }

    #[test]
    fn attributes_come_from_first_record() {
        let records = vec![
            rec("Acme", "Alice", "FirmX", "Tech", "Prospect"),
            rec("Acme", "Bob", "FirmY", "Retail", "Active Customer"),
        ];
        let idx = CoverageIndex::build(&records).unwrap();
        let profile = idx.company("Acme").unwrap();
        assert_eq!(profile.industry, "Tech");
        assert_eq!(profile.status, "Prospect");
        assert_eq!(profile.analyst_count, 2);
        // Both industry values are still listed.
        assert_eq!(idx.list_industries(), vec!["Retail", "Tech"]);
    }

    #[test]
    fn missing_attributes_use_sentinels() {
        let records = vec![CoverageRecord::new("Acme", "Alice", "FirmX", None, None)];
        let idx = CoverageIndex::build(&records).unwrap();
        assert_eq!(idx.list_industries(), vec![UNKNOWN_INDUSTRY]);
        assert_eq!(idx.company("Acme").unwrap().status, UNKNOWN_STATUS);
    }

    #[test]
    fn first_firm_wins_for_conflicting_duplicates() {
        let records = vec![
            rec("Acme", "Alice", "FirmX", "Tech", "Prospect"),
            rec("Acme", "Alice", "FirmW", "Tech", "Prospect"),
            rec("Globex", "Alice", "FirmY", "Tech", "Prospect"),
        ];
        let idx = CoverageIndex::build(&records).unwrap();
        let cmp = idx.compare_two("Acme", "Globex").unwrap();
        assert_eq!(cmp.overlap_count, 1);
        assert_eq!(cmp.rows[0].firm_a, "FirmX");
        assert_eq!(cmp.rows[0].firm_b, "FirmY");

        // Reversing input order flips the resolved firm.
        let reversed = vec![records[1].clone(), records[0].clone(), records[2].clone()];
        let idx = CoverageIndex::build(&reversed).unwrap();
        let cmp = idx.compare_two("Acme", "Globex").unwrap();
        assert_eq!(cmp.rows[0].firm_a, "FirmW");

        // The full listing keeps both firms visible, firm-sorted.
        let firms: Vec<&str> = cmp.all_analysts_a.iter().map(|a| a.firm.as_str()).collect();
        assert_eq!(firms, vec!["FirmW", "FirmX"]);
    }

    #[test]
    fn all_analysts_sorted_by_firm_then_analyst() {
        let records = vec![
            rec("Acme", "Zed", "Alpha", "Tech", "Prospect"),
            rec("Acme", "Bob", "Beta", "Tech", "Prospect"),
            rec("Acme", "Amy", "Alpha", "Tech", "Prospect"),
            rec("Acme", "Bob", "Beta", "Tech", "Prospect"),
        ];
        let idx = CoverageIndex::build(&records).unwrap();
        let cmp = idx.compare_two("Acme", "Acme").unwrap();
        let listed: Vec<(&str, &str)> = cmp
            .all_analysts_a
            .iter()
            .map(|a| (a.firm.as_str(), a.analyst.as_str()))
            .collect();
        assert_eq!(listed, vec![("Alpha", "Amy"), ("Alpha", "Zed"), ("Beta", "Bob")]);
        assert_eq!(cmp.overlap_count, 3);
    }

    #[test]
    fn overlap_is_case_sensitive() {
        let records = vec![
            rec("Acme", "Alice Smith", "FirmX", "Tech", "Prospect"),
            rec("Globex", "alice smith", "FirmY", "Tech", "Prospect"),
        ];
        let idx = CoverageIndex::build(&records).unwrap();
        assert_eq!(idx.compare_two("Acme", "Globex").unwrap().overlap_count, 0);
    }

    #[test]
    fn blank_analyst_registers_company_without_coverage() {
        let records = vec![
            rec("Acme", "Alice", "FirmX", "Tech", "Prospect"),
            rec("Initech", "", "", "Tech", "Prospect"),
        ];
        let idx = CoverageIndex::build(&records).unwrap();
        assert!(idx.contains("Initech"));
        assert_eq!(idx.company("Initech").unwrap().analyst_count, 0);
        assert!(idx.find_shared_with("Acme", None).unwrap().is_empty());
        assert!(idx.find_shared_with("Initech", None).unwrap().is_empty());
        let cmp = idx.compare_two("Acme", "Initech").unwrap();
        assert_eq!(cmp.overlap_count, 0);
        assert!(cmp.all_analysts_b.is_empty());
    }

    #[test]
    fn shared_rows_ranked_and_joined() {
        let records = vec![
            rec("Anchor", "Alice", "F1", "Tech", "Prospect"),
            rec("Anchor", "Bob", "F2", "Tech", "Prospect"),
            rec("Anchor", "Carol", "F3", "Tech", "Prospect"),
            rec("Zeta", "Carol", "F3", "Tech", "Prospect"),
            rec("Zeta", "Alice", "F1", "Tech", "Prospect"),
            rec("Beta", "Bob", "F2", "Energy", "Active Customer"),
            rec("Alpha", "Alice", "F1", "Tech", "Prospect"),
            rec("Lonely", "Dan", "F4", "Tech", "Prospect"),
        ];
        let idx = CoverageIndex::build(&records).unwrap();
        let rows = idx.find_shared_with("Anchor", None).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Beta"]);
        assert_eq!(rows[0].shared_count, 2);
        assert_eq!(rows[0].analyst_list, "Alice, Carol");
        assert_eq!(rows[2].industry, "Energy");
        assert_eq!(rows[2].status, "Active Customer");

        let filtered = idx.find_shared_with("Anchor", Some("Energy")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].company, "Beta");

        let unfiltered = idx.find_shared_with("Anchor", Some(ALL_INDUSTRIES)).unwrap();
        assert_eq!(unfiltered, rows);
    }

    #[test]
    fn prospects_require_active_customer_anchor() {
        let records = vec![
            rec("Acme", "Alice", "FirmX", "Tech", "Prospect"),
            rec("Globex", "Alice", "FirmY", "Tech", "active CUSTOMER"),
        ];
        let idx = CoverageIndex::build(&records).unwrap();

        let err = idx.find_prospects_for("Acme").unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, IndexError::NotActiveCustomer { .. }));

        let err = idx.find_prospects_for("Nobody").unwrap_err();
        assert!(matches!(err, IndexError::CompanyNotFound(_)));

        let rows = idx.find_prospects_for("Globex").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(idx.list_active_customers(), vec!["Globex"]);
    }

    #[test]
    fn prospects_exclude_every_active_customer() {
        let records = vec![
            rec("Globex", "Alice", "F1", "Tech", "Active Customer"),
            rec("Initech", "Alice", "F1", "Tech", "Active Customer"),
            rec("Acme", "Alice", "F1", "Tech", "Prospect"),
            rec("Hooli", "Alice", "F1", "Tech", ""),
        ];
        let idx = CoverageIndex::build(&records).unwrap();
        let rows = idx.find_prospects_for("Globex").unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Hooli"]);
        assert_eq!(rows[1].status, UNKNOWN_STATUS);
    }

    #[test]
    fn multi_coverage_analysts_ranked() {
        let records = vec![
            rec("Acme", "Alice", "FirmX", "Tech", "Prospect"),
            rec("Globex", "Alice", "FirmY", "Tech", "Prospect"),
            rec("Initech", "Alice", "FirmX", "Tech", "Prospect"),
            rec("Acme", "Bob", "FirmZ", "Tech", "Prospect"),
            rec("Globex", "Bob", "FirmZ", "Tech", "Prospect"),
            rec("Acme", "Carol", "FirmQ", "Tech", "Prospect"),
        ];
        let idx = CoverageIndex::build(&records).unwrap();
        let out = idx.multi_coverage_analysts(2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].analyst, "Alice");
        assert_eq!(out[0].company_count, 3);
        assert_eq!(out[0].companies, vec!["Acme", "Globex", "Initech"]);
        assert_eq!(out[0].firms, vec!["FirmX", "FirmY"]);
        assert_eq!(out[1].analyst, "Bob");

        // Zero is treated as one: everyone with any coverage.
        assert_eq!(idx.multi_coverage_analysts(0).len(), 3);
    }

    #[test]
    fn index_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoverageIndex>();
    }
}
