//! CSV serialization of query results.
//!
//! Standard comma-separated output, UTF-8, header row always written (also
//! for an empty result so downstream tools still see the schema).

use std::io::Write;

use crate::error::IndexError;
use crate::model::{ComparisonResult, SharedCompanyRow};

/// Write shared-coverage rows as CSV.
pub fn write_shared_csv<W: Write>(rows: &[SharedCompanyRow], out: W) -> Result<(), IndexError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(SharedCompanyRow::HEADERS).map_err(export_err)?;

    for row in rows {
        let shared_count = row.shared_count.to_string();
        writer
            .write_record([
                row.company.as_str(),
                row.industry.as_str(),
                row.status.as_str(),
                shared_count.as_str(),
                row.analyst_list.as_str(),
            ])
            .map_err(export_err)?;
    }

    writer.flush().map_err(|e| IndexError::Export(e.to_string()))
}

/// Shared-coverage rows as a CSV string.
pub fn shared_to_csv_string(rows: &[SharedCompanyRow]) -> Result<String, IndexError> {
    let mut buf = Vec::new();
    write_shared_csv(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| IndexError::Export(e.to_string()))
}

/// Write the overlap rows of a comparison as CSV. Firm columns are labelled
/// with the company names, e.g. `firm (Acme)`.
pub fn write_comparison_csv<W: Write>(result: &ComparisonResult, out: W) -> Result<(), IndexError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    let firm_a = format!("firm ({})", result.company_a);
    let firm_b = format!("firm ({})", result.company_b);
    writer
        .write_record(["analyst", firm_a.as_str(), firm_b.as_str()])
        .map_err(export_err)?;

    for row in &result.rows {
        writer
            .write_record([row.analyst.as_str(), row.firm_a.as_str(), row.firm_b.as_str()])
            .map_err(export_err)?;
    }

    writer.flush().map_err(|e| IndexError::Export(e.to_string()))
}

fn export_err(e: csv::Error) -> IndexError {
    IndexError::Export(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OverlapRow;

    fn row(company: &str, count: usize, list: &str) -> SharedCompanyRow {
        SharedCompanyRow {
            company: company.into(),
            industry: "Tech".into(),
            status: "Prospect".into(),
            shared_count: count,
            analyst_list: list.into(),
        }
    }

    #[test]
    fn header_written_for_empty_result() {
        let csv = shared_to_csv_string(&[]).unwrap();
        assert_eq!(csv, "company,industry,status,shared_count,analyst_list\n");
    }

    #[test]
    fn analyst_list_with_commas_is_quoted() {
        let csv = shared_to_csv_string(&[row("Acme", 2, "Alice, Bob")]).unwrap();
        let mut lines = csv.lines();
        lines.next();
        assert_eq!(lines.next(), Some("Acme,Tech,Prospect,2,\"Alice, Bob\""));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let rec = reader.records().next().unwrap().unwrap();
        assert_eq!(rec.get(4), Some("Alice, Bob"));
    }

    #[test]
    fn comparison_headers_name_companies() {
        let result = ComparisonResult {
            company_a: "Acme".into(),
            company_b: "Globex".into(),
            overlap_count: 1,
            rows: vec![OverlapRow {
                analyst: "Alice".into(),
                firm_a: "FirmX".into(),
                firm_b: "FirmY".into(),
            }],
            all_analysts_a: vec![],
            all_analysts_b: vec![],
        };
        let mut buf = Vec::new();
        write_comparison_csv(&result, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "analyst,firm (Acme),firm (Globex)\nAlice,FirmX,FirmY\n");
    }
}
