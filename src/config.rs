//! Plugin options.
//!
//! SWC hands the plugin its options as a JSON string. Keys follow the
//! camelCase names used in `.swcrc` / `next.config.js`; missing, `null` and
//! empty values fall back to the defaults below.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_LIB_ACCESS_CONTROL: &str = "src-core/access";
pub const DEFAULT_METHOD_ACCESS_CONTROL_EVERY: &str = "mustAllOfPermissions";
pub const DEFAULT_METHOD_ACCESS_CONTROL_SOME: &str = "mustOneOfPermissions";

static IDENTIFIER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse plugin config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{option}` must be a valid identifier, got {value:?}")]
    InvalidIdentifier { option: &'static str, value: String },
}

/// Resolved plugin options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Module path the guards are imported from.
    #[serde(deserialize_with = "non_empty_or_default::lib")]
    pub lib_access_control: String,
    /// "Require all of" guard.
    #[serde(deserialize_with = "non_empty_or_default::every")]
    pub method_access_control_every: String,
    /// "Require one of" guard.
    #[serde(deserialize_with = "non_empty_or_default::some")]
    pub method_access_control_some: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lib_access_control: DEFAULT_LIB_ACCESS_CONTROL.to_string(),
            method_access_control_every: DEFAULT_METHOD_ACCESS_CONTROL_EVERY.to_string(),
            method_access_control_some: DEFAULT_METHOD_ACCESS_CONTROL_SOME.to_string(),
        }
    }
}

impl Config {
    /// Parse and validate the raw JSON config handed over by the host.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (option, value) in [
            ("methodAccessControlEvery", &self.method_access_control_every),
            ("methodAccessControlSome", &self.method_access_control_some),
        ] {
            if !IDENTIFIER_NAME.is_match(value) {
                return Err(ConfigError::InvalidIdentifier {
                    option,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn is_guard_name(&self, name: &str) -> bool {
        name == self.method_access_control_every || name == self.method_access_control_some
    }
}

mod non_empty_or_default {
    use serde::{Deserialize, Deserializer};

    fn or_default<'de, D>(d: D, default: &str) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(d)?;
        Ok(value
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    pub fn lib<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        or_default(d, super::DEFAULT_LIB_ACCESS_CONTROL)
    }

    pub fn every<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        or_default(d, super::DEFAULT_METHOD_ACCESS_CONTROL_EVERY)
    }

    pub fn some<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        or_default(d, super::DEFAULT_METHOD_ACCESS_CONTROL_SOME)
    }
}
