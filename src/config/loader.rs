//! Configuration loading from disk and the environment.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::fonts::FontDirectory;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    MissingRoot(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::MissingRoot(var) => {
                write!(f, "environment variable {} is not set and no fonts.root_dir given", var)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ServiceConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the file at `path` if one was given, otherwise validated defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = ServiceConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

/// Resolve the watched directory using the process environment.
pub fn resolve_font_dir(config: &ServiceConfig) -> Result<FontDirectory, ConfigError> {
    resolve_font_dir_with(config, |name| std::env::var_os(name))
}

/// Resolve the watched directory, looking variables up through `lookup`.
///
/// The root is `fonts.root_dir` when set, otherwise the value of the
/// `fonts.root_env` variable. The result is `<root>/<dir_name>`.
pub fn resolve_font_dir_with<F>(
    config: &ServiceConfig,
    lookup: F,
) -> Result<FontDirectory, ConfigError>
where
    F: Fn(&str) -> Option<OsString>,
{
    let root = match &config.fonts.root_dir {
        Some(dir) => dir.clone(),
        None => lookup(&config.fonts.root_env)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::MissingRoot(config.fonts.root_env.clone()))?,
    };

    Ok(FontDirectory::new(trim_trailing_separators(root).join(&config.fonts.dir_name)))
}

fn trim_trailing_separators(path: PathBuf) -> PathBuf {
    // `components()` drops trailing separators but keeps roots like `/` or `C:\`.
    path.components().collect()
}
