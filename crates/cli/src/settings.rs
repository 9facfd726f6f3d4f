use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Location of the settings document when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// The root configuration structure for one pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db: DbSettings,
    pub logging: LoggingSettings,
    pub extract_files: ExtractFiles,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbSettings {
    /// Path of the SQLite database file
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Log file, appended to on every run
    pub file_path: PathBuf,
}

/// Output paths of the configurable reports.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractFiles {
    /// The sales-by-month report only runs when this is set
    #[serde(default)]
    pub sales_by_month_file_path: Option<PathBuf>,
    pub sales_by_artist_file_path: PathBuf,
    pub tracks_by_genre_file_path: PathBuf,
    pub sales_by_quarter_file_path: PathBuf,
    pub sales_by_year_file_path: PathBuf,
}

impl Settings {
    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("db.file_path", &self.db.file_path),
            ("logging.file_path", &self.logging.file_path),
            (
                "extract_files.sales_by_artist_file_path",
                &self.extract_files.sales_by_artist_file_path,
            ),
            (
                "extract_files.tracks_by_genre_file_path",
                &self.extract_files.tracks_by_genre_file_path,
            ),
            (
                "extract_files.sales_by_quarter_file_path",
                &self.extract_files.sales_by_quarter_file_path,
            ),
            (
                "extract_files.sales_by_year_file_path",
                &self.extract_files.sales_by_year_file_path,
            ),
        ];
        for (key, path) in required {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{} must not be empty", key)));
            }
        }
        if let Some(path) = &self.extract_files.sales_by_month_file_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "extract_files.sales_by_month_file_path must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Loads the settings document at `path`.
///
/// Values can be overridden from the environment with the `PIPELINE__`
/// prefix, e.g. `PIPELINE__DB__FILE_PATH`.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(true))
        .add_source(config::Environment::with_prefix("PIPELINE").separator("__"))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
