//! Typed environment variable lookups for the binaries' configuration.

use std::env;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("{0} environment variable is required")]
    Missing(String),

    #[error("{name} has invalid value {value:?}")]
    Invalid { name: String, value: String },
}

/// Reads a required variable.
pub fn required(name: &str) -> Result<String, EnvError> {
    env::var(name).map_err(|_| EnvError::Missing(name.to_string()))
}

/// Reads and parses `name`, falling back to `default` when unset.
pub fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T, EnvError> {
    match env::var(name) {
        Ok(value) => parse_value(name, &value),
        Err(_) => Ok(default),
    }
}

/// Reads a boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`).
pub fn flag_or(name: &str, default: bool) -> Result<bool, EnvError> {
    match env::var(name) {
        Ok(value) => parse_flag(name, &value),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T, EnvError> {
    value.trim().parse().map_err(|_| EnvError::Invalid {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(name: &str, value: &str) -> Result<bool, EnvError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(EnvError::Invalid {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
