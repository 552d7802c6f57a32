// Batch enrichment with skip-and-continue accumulation

use std::thread;
use std::time::Duration;

use xref_index::CoverageRecord;
use xref_io::AccountSeed;

use crate::error::FetchError;

/// Anything that can look up the coverage of one company.
pub trait CoverageSource {
    fn fetch(&self, seed: &AccountSeed) -> Result<Vec<CoverageRecord>, FetchError>;
}

/// Outcome of a batch run. Failed companies are listed, not fatal.
#[derive(Debug, Default)]
pub struct EnrichReport {
    pub records: Vec<CoverageRecord>,
    pub failures: Vec<(String, FetchError)>,
    pub companies_with_coverage: usize,
    /// Lookups that succeeded but found no analysts
    pub companies_without_coverage: usize,
    /// The provider rejected the credentials; remaining seeds were not tried
    pub aborted_on_auth: bool,
}

impl EnrichReport {
    pub fn attempted(&self) -> usize {
        self.companies_with_coverage + self.companies_without_coverage + self.failures.len()
    }

    pub fn all_failed(&self) -> bool {
        self.attempted() > 0 && self.failures.len() == self.attempted()
    }
}

/// Look up every seed in order. A failing company is logged and recorded
/// in `failures`; the batch continues. An authentication failure stops the
/// batch, since every later request would be rejected the same way.
/// `delay` is slept between requests.
pub fn enrich_all<S: CoverageSource + ?Sized>(
    source: &S,
    seeds: &[AccountSeed],
    delay: Duration,
) -> EnrichReport {
    let mut report = EnrichReport::default();

    for (i, seed) in seeds.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            thread::sleep(delay);
        }

        match source.fetch(seed) {
            Ok(records) if records.is_empty() => {
                log::info!("[{}/{}] {}: no coverage found", i + 1, seeds.len(), seed.company);
                report.companies_without_coverage += 1;
            }
            Ok(records) => {
                log::info!(
                    "[{}/{}] {}: {} analyst(s)",
                    i + 1,
                    seeds.len(),
                    seed.company,
                    records.len()
                );
                report.companies_with_coverage += 1;
                report.records.extend(records);
            }
            Err(e) if e.is_auth() => {
                log::warn!("[{}/{}] {}: {}; stopping", i + 1, seeds.len(), seed.company, e);
                report.failures.push((seed.company.clone(), e));
                report.aborted_on_auth = true;
                break;
            }
            Err(e) => {
                log::warn!("[{}/{}] {}: {}", i + 1, seeds.len(), seed.company, e);
                report.failures.push((seed.company.clone(), e));
            }
        }
    }

    report
}
