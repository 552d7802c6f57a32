//! `xref enrich` and `xref key`: build a coverage table from an account list.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use xref_config::secrets::{self, env_var_name, KeySource};
use xref_config::Settings;
use xref_enrich::{enrich_all, ClientConfig, SearchClient};
use xref_io::{load_accounts, write_records};

use crate::exit_codes::{EXIT_ENRICH_ALL_FAILED, EXIT_ENRICH_KEYCHAIN, EXIT_ENRICH_MISSING_KEY};
use crate::{CliError, GlobalArgs};

/// Output must be writable before any request is spent.
fn check_output(output: &Path) -> Result<(), CliError> {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" | "tsv" | "txt" | "xlsx" => Ok(()),
        _ => Err(CliError::usage(format!(
            "cannot write coverage table to '{}'",
            output.display()
        ))
        .with_hint("use a .csv or .xlsx output file")),
    }
}

fn missing_key(provider: &str) -> CliError {
    CliError {
        code: EXIT_ENRICH_MISSING_KEY,
        message: format!("no API key for provider '{}'", provider),
        hint: Some(format!(
            "run `xref key set` or set {}",
            env_var_name(provider)
        )),
    }
}

pub(crate) fn cmd_enrich(
    global: &GlobalArgs,
    accounts: PathBuf,
    column: Option<String>,
    output: PathBuf,
    delay_ms: Option<u64>,
    limit: Option<usize>,
) -> Result<(), CliError> {
    check_output(&output)?;

    let settings = Settings::load();
    let enrich = &settings.enrich;

    let api_key = secrets::get_api_key(&enrich.provider)
        .key
        .ok_or_else(|| missing_key(&enrich.provider))?;

    let mut seeds = load_accounts(&accounts, column.as_deref(), global.sheet.as_deref())
        .map_err(CliError::load)?;
    if let Some(n) = limit {
        seeds.truncate(n);
    }
    if seeds.is_empty() {
        return Err(CliError::data(format!("no accounts found in {}", accounts.display())));
    }

    let mut config = ClientConfig::new(&enrich.endpoint, &enrich.model, &api_key);
    config.timeout = Duration::from_secs(enrich.timeout_secs);
    config.search_domain_filter = enrich.search_domain_filter.clone();
    config.max_retries = enrich.max_retries;
    let client = SearchClient::new(config).map_err(CliError::fetch)?;

    if !global.quiet {
        eprintln!(
            "looking up {} compan{} with {} ({})",
            seeds.len(),
            if seeds.len() == 1 { "y" } else { "ies" },
            enrich.provider,
            enrich.model
        );
    }

    let delay = Duration::from_millis(delay_ms.unwrap_or(enrich.delay_ms));
    let report = enrich_all(&client, &seeds, delay);

    if !global.quiet {
        for (company, err) in &report.failures {
            eprintln!("warning: {}: {}", company, err);
        }
    }

    if report.aborted_on_auth {
        return Err(CliError {
            code: EXIT_ENRICH_ALL_FAILED,
            message: format!(
                "the provider rejected the API key after {} of {} lookups; nothing written",
                report.attempted(),
                seeds.len()
            ),
            hint: Some("check `xref key status` or the XREF_<PROVIDER>_KEY variable".to_string()),
        });
    }

    if report.all_failed() {
        return Err(CliError {
            code: EXIT_ENRICH_ALL_FAILED,
            message: format!("all {} lookups failed; nothing written", report.failures.len()),
            hint: None,
        });
    }

    write_records(&output, &report.records).map_err(CliError::load)?;

    if !global.quiet {
        eprintln!(
            "wrote {} records to {} ({} with coverage, {} without, {} failed)",
            report.records.len(),
            output.display(),
            report.companies_with_coverage,
            report.companies_without_coverage,
            report.failures.len()
        );
    }
    Ok(())
}

// ============================================================================
// key
// ============================================================================

/// Key from the argument, else read from stdin (prompting on a terminal) so
/// it stays out of shell history and the process list.
pub(crate) fn cmd_key_set(key: Option<String>) -> Result<(), CliError> {
    let provider = Settings::load().enrich.provider;
    let key = match key {
        Some(k) => k,
        None => read_key(&provider, &mut io::stdin().lock())?,
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::usage("no API key provided").with_hint(format!(
            "pass the key or pipe it on stdin, or set {}",
            env_var_name(&provider)
        )));
    }
    secrets::set_api_key(&provider, key).map_err(|e| CliError {
        code: EXIT_ENRICH_KEYCHAIN,
        message: e,
        hint: Some(format!("set {} instead", env_var_name(&provider))),
    })?;
    eprintln!("stored {} key in system keychain", provider);
    Ok(())
}

fn read_key(provider: &str, input: &mut impl BufRead) -> Result<String, CliError> {
    if atty::is(atty::Stream::Stdin) {
        eprint!("{} API key: ", provider);
        io::stderr().flush().ok();
    }
    let mut buf = String::new();
    input
        .read_line(&mut buf)
        .map_err(|e| CliError::io(format!("cannot read API key: {}", e)))?;
    Ok(buf.trim().to_string())
}

pub(crate) fn cmd_key_delete() -> Result<(), CliError> {
    let provider = Settings::load().enrich.provider;
    secrets::delete_api_key(&provider).map_err(|e| CliError {
        code: EXIT_ENRICH_KEYCHAIN,
        message: e,
        hint: None,
    })?;
    eprintln!("removed {} key from system keychain", provider);
    Ok(())
}

pub(crate) fn cmd_key_status(json: bool) -> Result<(), CliError> {
    let provider = Settings::load().enrich.provider;
    let lookup = secrets::get_api_key(&provider);

    if json {
        let value = serde_json::json!({
            "provider": provider,
            "key": if lookup.key.is_some() { "present" } else { "missing" },
            "key_source": lookup.source.as_str(),
            "env_var": env_var_name(&provider),
        });
        println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
    } else {
        println!("provider:  {}", provider);
        match lookup.source {
            KeySource::None => println!("key:       missing (set {})", env_var_name(&provider)),
            source => println!("key:       present ({})", source.as_str()),
        }
    }

    // Status already printed; only the exit code is left to report
    if lookup.key.is_none() {
        return Err(CliError {
            code: EXIT_ENRICH_MISSING_KEY,
            message: String::new(),
            hint: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_extension_checked_up_front() {
        assert!(check_output(Path::new("coverage.csv")).is_ok());
        assert!(check_output(Path::new("coverage.XLSX")).is_ok());
        let err = check_output(Path::new("coverage.xls")).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_USAGE);
        assert!(check_output(Path::new("coverage")).is_err());
    }

    #[test]
    fn key_read_from_input_line() {
        let mut input = io::Cursor::new("  pplx-123 \nignored\n");
        assert_eq!(read_key("perplexity", &mut input).unwrap(), "pplx-123");

        let mut empty = io::Cursor::new("");
        assert_eq!(read_key("perplexity", &mut empty).unwrap(), "");
    }

    #[test]
    fn missing_key_names_env_var() {
        let err = missing_key("perplexity");
        assert_eq!(err.code, EXIT_ENRICH_MISSING_KEY);
        assert!(err.hint.unwrap().contains("XREF_PERPLEXITY_KEY"));
    }
}
