// Analyst coverage cross-reference CLI

mod data;
mod enrich;
mod exit_codes;
mod query;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use xref_enrich::FetchError;
use xref_index::{ErrorKind, IndexError};
use xref_io::LoadError;

use exit_codes::{
    EXIT_DATA, EXIT_ERROR, EXIT_IO, EXIT_NOT_FOUND, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "xref")]
#[command(about = "Cross-reference analyst coverage between companies")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct GlobalArgs {
    /// Coverage table (csv, tsv, txt, xlsx, xls, xlsb, ods); defaults to "data.path" in settings
    #[arg(long, short = 'd', global = true, env = "XREF_DATA")]
    pub data: Option<PathBuf>,

    /// Worksheet name for spreadsheet tables (first sheet by default)
    #[arg(long, global = true)]
    pub sheet: Option<String>,

    /// Suppress stderr notes and load warnings
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every company in the coverage table
    Companies,

    /// List every industry in the coverage table
    Industries,

    /// List companies whose status is "Active Customer"
    Customers,

    /// Show analysts covering both companies
    #[command(after_help = "\
Examples:
  xref compare Acme Globex -d coverage.csv
  xref compare Acme Globex --all
  xref compare Acme Globex --json")]
    Compare {
        company_a: String,
        company_b: String,

        /// Output JSON
        #[arg(long)]
        json: bool,

        /// Also list every analyst covering each company
        #[arg(long)]
        all: bool,
    },

    /// Companies sharing analysts with a company, most shared first
    #[command(after_help = "\
Examples:
  xref shared Acme
  xref shared Acme --industry Manufacturing
  xref shared Acme --format csv -o acme_shared.csv")]
    Shared {
        company: String,

        /// Only companies in this industry ("All Industries" = no filter)
        #[arg(long, short = 'i')]
        industry: Option<String>,

        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Prospects sharing analysts with an active customer
    #[command(after_help = "\
Examples:
  xref prospects Globex
  xref prospects Globex --format json")]
    Prospects {
        /// Active customer to start from
        company: String,

        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Analysts covering several companies
    Analysts {
        /// Minimum number of companies covered
        #[arg(long, default_value_t = 2)]
        min: usize,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a coverage table by searching IR pages for each account
    #[command(after_help = "\
Examples:
  xref enrich Manufacturing.xlsx -o coverage_analysts.xlsx
  xref enrich accounts.csv --column 'Organization' -o coverage.csv --limit 10

The API key is read from the system keychain (see `xref key set`) or from
XREF_<PROVIDER>_KEY, e.g. XREF_PERPLEXITY_KEY.")]
    Enrich {
        /// Account list (csv or spreadsheet) with a company/account name column
        accounts: PathBuf,

        /// Header of the company name column (auto-detected by default)
        #[arg(long)]
        column: Option<String>,

        /// Output table (.csv or .xlsx)
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Pause between requests in milliseconds (defaults to settings)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Only look up the first N accounts
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Manage the enrichment API key
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Store the API key in the system keychain
    #[command(after_help = "\
Examples:
  xref key set                      # prompts for the key
  pass show perplexity | xref key set")]
    Set {
        /// API key (read from stdin when omitted)
        key: Option<String>,
    },
    /// Remove the API key from the system keychain
    Delete,
    /// Show where the API key would be read from
    Status {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let global = cli.global;

    let result = match cli.command {
        Commands::Companies => query::cmd_companies(&global),
        Commands::Industries => query::cmd_industries(&global),
        Commands::Customers => query::cmd_customers(&global),
        Commands::Compare { company_a, company_b, json, all } => {
            query::cmd_compare(&global, &company_a, &company_b, json, all)
        }
        Commands::Shared { company, industry, format, output } => {
            query::cmd_shared(&global, &company, industry.as_deref(), format, output)
        }
        Commands::Prospects { company, format, output } => {
            query::cmd_prospects(&global, &company, format, output)
        }
        Commands::Analysts { min, json } => query::cmd_analysts(&global, min, json),
        Commands::Enrich { accounts, column, output, delay_ms, limit } => {
            enrich::cmd_enrich(&global, accounts, column, output, delay_ms, limit)
        }
        Commands::Key { command } => match command {
            KeyCommands::Set { key } => enrich::cmd_key_set(key),
            KeyCommands::Delete => enrich::cmd_key_delete(),
            KeyCommands::Status { json } => enrich::cmd_key_status(json),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self { code: EXIT_DATA, message: msg.into(), hint: None }
    }

    /// Query and index-build failures.
    pub fn index(err: IndexError) -> Self {
        let code = match err.kind() {
            ErrorKind::Data => EXIT_DATA,
            ErrorKind::NotFound => EXIT_NOT_FOUND,
            ErrorKind::Export => EXIT_IO,
        };
        let hint = match &err {
            IndexError::CompanyNotFound(_) => {
                Some("names are matched exactly; run `xref companies` to list them".to_string())
            }
            IndexError::NotActiveCustomer { .. } => {
                Some("run `xref customers` to list active customers".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Table loading and writing failures.
    pub fn load(err: LoadError) -> Self {
        let code = match &err {
            e if e.is_data_error() => EXIT_DATA,
            LoadError::NoSheets => EXIT_DATA,
            LoadError::UnsupportedFormat(_) | LoadError::SheetNotFound(_) => EXIT_USAGE,
            LoadError::Io(_) | LoadError::Write(_) => EXIT_IO,
            _ => EXIT_ERROR,
        };
        let hint = match &err {
            LoadError::MissingColumn { field, .. } => Some(format!(
                "set \"columns.{}\" in {} to the header name",
                field,
                xref_config::Settings::config_path_display()
            )),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    pub fn fetch(err: FetchError) -> Self {
        Self { code: EXIT_ERROR, message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
