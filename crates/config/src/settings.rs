// Application settings
// Loaded from ~/.config/analyst-xref/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the settings file location (used by tests and CI).
pub const CONFIG_PATH_ENV: &str = "XREF_CONFIG";

/// Explicit header names for the coverage table.
/// `None` means auto-detect from the usual aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyst: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Enrichment provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichSettings {
    /// Provider name; selects the API key (`XREF_<PROVIDER>_KEY`)
    pub provider: String,

    /// OpenAI-compatible chat completions endpoint
    pub endpoint: String,

    pub model: String,

    pub timeout_secs: u64,

    /// Pause between requests
    pub delay_ms: u64,

    /// Retries for rate-limited or failed requests
    pub max_retries: u32,

    /// Restrict web search to these domains (empty = unrestricted)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_domain_filter: Vec<String>,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            provider: "perplexity".to_string(),
            endpoint: "https://api.perplexity.ai/chat/completions".to_string(),
            model: "sonar-pro".to_string(),
            timeout_secs: 60,
            delay_ms: 1000,
            max_retries: 2,
            search_domain_filter: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Data source
    #[serde(rename = "data.path", skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,

    #[serde(rename = "data.sheet", skip_serializing_if = "Option::is_none")]
    pub data_sheet: Option<String>,

    // Column mapping
    pub columns: ColumnSettings,

    // Enrichment
    pub enrich: EnrichSettings,
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("analyst-xref")
            .join("settings.json")
    }

    /// Load settings from disk, falling back to defaults.
    /// A missing file is created with commented defaults.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Load settings from a specific file. Unreadable or malformed files
    /// yield defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned)
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Default coverage table (used when --data is not given)
    // "data.path": "/path/to/coverage_analysts.xlsx",
    // "data.sheet": "Sheet1",

    // Explicit header names; omitted fields are auto-detected
    "columns": {},

    // Enrichment (web search for IR analyst coverage pages)
    // API keys are stored in the system keychain or XREF_PERPLEXITY_KEY, not in this file
    "enrich": {
        "provider": "perplexity",
        "endpoint": "https://api.perplexity.ai/chat/completions",
        "model": "sonar-pro",
        "timeout_secs": 60,
        "delay_ms": 1000,
        "max_retries": 2
    }
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            log::warn!("error writing default settings.json: {}", e);
        }
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
