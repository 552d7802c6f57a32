// Configuration loading

pub mod secrets;
pub mod settings;

pub use secrets::{get_api_key, KeyLookup, KeySource};
pub use settings::{ColumnSettings, EnrichSettings, Settings};
