use std::fs;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::app::RunOptions;
use crate::domain::RunMode;
use crate::error::ConsolidateError;
use crate::scanner::DEFAULT_PATTERN;

pub const CONFIG_FILE_NAME: &str = "gdc-consolidate.json";
pub const DEFAULT_INPUT_DIR: &str = "GDC_download";
pub const DEFAULT_OUTPUT: &str = "crc_consolidated.csv";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub input: Option<Utf8PathBuf>,
    #[serde(default)]
    pub out: Option<Utf8PathBuf>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub mode: Option<RunMode>,
}

/// Values given on the command line; each one beats the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<Utf8PathBuf>,
    pub out: Option<Utf8PathBuf>,
    pub pattern: Option<String>,
    pub lenient: bool,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path` if given, else `gdc-consolidate.json` from the working
    /// directory when present, else an empty config.
    pub fn load(path: Option<&str>) -> Result<Config, ConsolidateError> {
        let config_path = match path {
            Some(path) => Utf8PathBuf::from(path),
            None => Utf8PathBuf::from(CONFIG_FILE_NAME),
        };

        if path.is_none() && !config_path.as_std_path().exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path.as_std_path())
            .map_err(|_| ConsolidateError::ConfigRead(config_path.clone()))?;
        serde_json::from_str(&content).map_err(|err| ConsolidateError::ConfigParse(err.to_string()))
    }

    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<RunOptions, ConsolidateError> {
        let config = Self::load(path)?;
        Ok(Self::resolve_config(config, overrides))
    }

    pub fn resolve_config(config: Config, overrides: ConfigOverrides) -> RunOptions {
        let mode = if overrides.lenient {
            RunMode::Lenient
        } else {
            config.mode.unwrap_or_default()
        };
        RunOptions {
            input: overrides
                .input
                .or(config.input)
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_INPUT_DIR)),
            output: overrides
                .out
                .or(config.out)
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT)),
            pattern: overrides
                .pattern
                .or(config.pattern)
                .unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
            mode,
        }
    }
}
