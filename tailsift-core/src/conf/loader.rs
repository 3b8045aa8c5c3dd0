use crate::conf::error::ConfigError;
use crate::conf::settings::TailsiftConfig;
use crate::conf::validate::validate_config;
use std::fs;
use std::path::Path;
use std::str::FromStr;

impl TailsiftConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let cfg: Self = toml::from_str(&contents).map_err(|e| ConfigError::parse(path, e))?;

        validate_config(&cfg)?;
        Ok(cfg)
    }
}

impl FromStr for TailsiftConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s).map_err(|e| ConfigError::parse("<inline>", e))?;

        validate_config(&cfg)?;
        Ok(cfg)
    }
}
