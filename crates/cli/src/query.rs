//! Query commands: listings, `compare`, `shared`, `prospects`, `analysts`.
//!
//! Each command loads the table once, runs one query against the immutable
//! index and prints the result. Rendering is kept separate from loading so
//! the text/JSON/CSV shapes can be tested without files.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use xref_index::export::shared_to_csv_string;
use xref_index::{AnalystFirm, AnalystSummary, ComparisonResult, SharedCompanyRow};

use crate::data::load_index;
use crate::util::render_table;
use crate::{CliError, GlobalArgs, OutputFormat};

// ============================================================================
// Output
// ============================================================================

/// Write `text` to `output`, or stdout when `None`.
fn emit(text: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => std::fs::write(path, text)
            .map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e))),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(text.as_bytes())
                .and_then(|_| handle.flush())
                .map_err(|e| CliError::io(e.to_string()))
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map(|s| s + "\n")
        .map_err(|e| CliError::io(format!("failed to serialize JSON: {}", e)))
}

fn lines(items: &[String]) -> String {
    items.iter().map(|s| format!("{}\n", s)).collect()
}

// ============================================================================
// companies / industries / customers
// ============================================================================

pub(crate) fn cmd_companies(global: &GlobalArgs) -> Result<(), CliError> {
    let index = load_index(global)?;
    emit(&lines(&index.list_companies()), None)
}

pub(crate) fn cmd_industries(global: &GlobalArgs) -> Result<(), CliError> {
    let index = load_index(global)?;
    emit(&lines(&index.list_industries()), None)
}

pub(crate) fn cmd_customers(global: &GlobalArgs) -> Result<(), CliError> {
    let index = load_index(global)?;
    let customers = index.list_active_customers();
    if customers.is_empty() && !global.quiet {
        eprintln!("note: no company has status \"Active Customer\"");
    }
    emit(&lines(&customers), None)
}

// ============================================================================
// compare
// ============================================================================

pub(crate) fn cmd_compare(
    global: &GlobalArgs,
    company_a: &str,
    company_b: &str,
    json: bool,
    all: bool,
) -> Result<(), CliError> {
    let index = load_index(global)?;
    let result = index.compare_two(company_a, company_b).map_err(CliError::index)?;

    let text = if json {
        render_comparison_json(&result, all)?
    } else {
        render_comparison_text(&result, all)
    };
    emit(&text, None)
}

fn render_comparison_json(result: &ComparisonResult, all: bool) -> Result<String, CliError> {
    let mut value = serde_json::to_value(result)
        .map_err(|e| CliError::io(format!("failed to serialize JSON: {}", e)))?;
    if !all {
        if let Some(obj) = value.as_object_mut() {
            obj.remove("all_analysts_a");
            obj.remove("all_analysts_b");
        }
    }
    to_json(&value)
}

fn render_comparison_text(result: &ComparisonResult, all: bool) -> String {
    let mut out = format!(
        "{} vs {}: {} shared analyst{}\n",
        result.company_a,
        result.company_b,
        result.overlap_count,
        if result.overlap_count == 1 { "" } else { "s" }
    );

    if !result.rows.is_empty() {
        let firm_a = format!("firm ({})", result.company_a);
        let firm_b = format!("firm ({})", result.company_b);
        let rows: Vec<Vec<String>> = result
            .rows
            .iter()
            .map(|r| vec![r.analyst.clone(), r.firm_a.clone(), r.firm_b.clone()])
            .collect();
        out.push('\n');
        out.push_str(&render_table(&["analyst", &firm_a, &firm_b], &rows));
    }

    if all {
        for (company, analysts) in [
            (&result.company_a, &result.all_analysts_a),
            (&result.company_b, &result.all_analysts_b),
        ] {
            out.push_str(&format!("\nAll analysts covering {} ({}):\n", company, analysts.len()));
            out.push_str(&render_table(&["firm", "analyst"], &analyst_rows(analysts)));
        }
    }

    out
}

fn analyst_rows(analysts: &[AnalystFirm]) -> Vec<Vec<String>> {
    analysts
        .iter()
        .map(|a| vec![a.firm.clone(), a.analyst.clone()])
        .collect()
}

// ============================================================================
// shared / prospects
// ============================================================================

pub(crate) fn cmd_shared(
    global: &GlobalArgs,
    company: &str,
    industry: Option<&str>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let index = load_index(global)?;
    let rows = index.find_shared_with(company, industry).map_err(CliError::index)?;

    if rows.is_empty() && !global.quiet {
        match industry {
            Some(i) => eprintln!("note: no company in {} shares analysts with {}", i, company),
            None => eprintln!("note: no company shares analysts with {}", company),
        }
    }
    write_shared(&rows, format, output.as_deref())
}

pub(crate) fn cmd_prospects(
    global: &GlobalArgs,
    company: &str,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let index = load_index(global)?;
    let rows = index.find_prospects_for(company).map_err(CliError::index)?;

    if rows.is_empty() && !global.quiet {
        eprintln!("note: no prospect shares analysts with {}", company);
    }
    write_shared(&rows, format, output.as_deref())
}

fn write_shared(
    rows: &[SharedCompanyRow],
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), CliError> {
    // An empty table on the terminal is just noise; the note already said so
    if rows.is_empty() && format == OutputFormat::Table && output.is_none() {
        return Ok(());
    }
    let text = render_shared(rows, format)?;
    emit(&text, output)
}

fn render_shared(rows: &[SharedCompanyRow], format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let cells: Vec<Vec<String>> = rows
                .iter()
                .map(|r| {
                    vec![
                        r.company.clone(),
                        r.industry.clone(),
                        r.status.clone(),
                        r.shared_count.to_string(),
                        r.analyst_list.clone(),
                    ]
                })
                .collect();
            Ok(render_table(&["company", "industry", "status", "shared", "analysts"], &cells))
        }
        OutputFormat::Json => to_json(rows),
        OutputFormat::Csv => shared_to_csv_string(rows).map_err(CliError::index),
    }
}

// ============================================================================
// analysts
// ============================================================================

pub(crate) fn cmd_analysts(global: &GlobalArgs, min: usize, json: bool) -> Result<(), CliError> {
    let index = load_index(global)?;
    let analysts = index.multi_coverage_analysts(min);

    if json {
        return emit(&to_json(&analysts)?, None);
    }
    if analysts.is_empty() {
        if !global.quiet {
            eprintln!("note: no analyst covers {} or more companies", min.max(1));
        }
        return Ok(());
    }
    emit(&render_analysts(&analysts), None)
}

fn render_analysts(analysts: &[AnalystSummary]) -> String {
    let rows: Vec<Vec<String>> = analysts
        .iter()
        .map(|a| {
            vec![
                a.analyst.clone(),
                a.company_count.to_string(),
                a.firms.join(", "),
                a.companies.join(", "),
            ]
        })
        .collect();
    render_table(&["analyst", "companies", "firms", "covers"], &rows)
}
