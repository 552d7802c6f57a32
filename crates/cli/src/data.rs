// Coverage table resolution and loading for query commands

use std::path::PathBuf;

use xref_config::{ColumnSettings, Settings};
use xref_index::CoverageIndex;
use xref_io::{load_coverage, ColumnMapping, LoadOptions};

use crate::{CliError, GlobalArgs};

pub(crate) fn column_mapping(columns: &ColumnSettings) -> ColumnMapping {
    ColumnMapping {
        company: columns.company.clone(),
        analyst: columns.analyst.clone(),
        firm: columns.firm.clone(),
        industry: columns.industry.clone(),
        status: columns.status.clone(),
    }
}

/// `--data` wins over the settings file.
fn resolve_path(global: &GlobalArgs, settings: &Settings) -> Result<PathBuf, CliError> {
    global
        .data
        .clone()
        .or_else(|| settings.data_path.clone())
        .ok_or_else(|| {
            CliError::usage("no coverage table given").with_hint(format!(
                "pass --data <file> or set \"data.path\" in {}",
                Settings::config_path_display()
            ))
        })
}

/// Load the coverage table and build the index. Load warnings go to stderr
/// unless `--quiet`.
pub(crate) fn load_index(global: &GlobalArgs) -> Result<CoverageIndex, CliError> {
    let settings = Settings::load();
    let path = resolve_path(global, &settings)?;

    let options = LoadOptions {
        columns: column_mapping(&settings.columns),
        sheet: global.sheet.clone().or_else(|| settings.data_sheet.clone()),
    };
    let loaded = load_coverage(&path, &options).map_err(CliError::load)?;

    if !global.quiet {
        for warning in &loaded.warnings {
            eprintln!("warning: {}", warning);
        }
    }

    CoverageIndex::build(&loaded.records)
        .map_err(|e| CliError::index(e).with_hint(format!("check {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(data: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            data: data.map(PathBuf::from),
            sheet: None,
            quiet: true,
        }
    }

    #[test]
    fn flag_overrides_settings() {
        let settings = Settings {
            data_path: Some(PathBuf::from("from_settings.csv")),
            ..Settings::default()
        };
        assert_eq!(
            resolve_path(&global(Some("flag.csv")), &settings).unwrap(),
            PathBuf::from("flag.csv")
        );
        assert_eq!(
            resolve_path(&global(None), &settings).unwrap(),
            PathBuf::from("from_settings.csv")
        );
    }

    #[test]
    fn missing_path_is_usage_error() {
        let err = resolve_path(&global(None), &Settings::default()).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_USAGE);
        assert!(err.hint.unwrap().contains("data.path"));
    }

    #[test]
    fn columns_carry_over() {
        let columns = ColumnSettings {
            company: Some("Account Name".into()),
            ..ColumnSettings::default()
        };
        let mapping = column_mapping(&columns);
        assert_eq!(mapping.company.as_deref(), Some("Account Name"));
        assert!(mapping.firm.is_none());
    }
}
