use std::sync::OnceLock;

use crate::backend::JsonBackendKind;
use crate::errors::{Result, SerikitError};

pub const ENV_JSON_BACKEND: &str = "SERIKIT_JSON_BACKEND";
pub const ENV_PRETTY: &str = "SERIKIT_PRETTY";
pub const ENV_LOG: &str = "SERIKIT_LOG";

/// Immutable configuration initialized once from environment variables.
///
/// Access via `SerikitConfig::get()`, which returns a `&'static SerikitConfig`.
/// Invalid values are reported with a warning and replaced by defaults.
/// Binaries that set up logging first use `load` and `install` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerikitConfig {
    /// Overrides the platform-derived default JSON engine.
    pub json_backend: Option<JsonBackendKind>,
    /// Default for the CLI `--pretty` flag.
    pub pretty: bool,
    /// `tracing` filter directive, e.g. `serikit_lib=debug`.
    pub log_filter: Option<String>,
}

static CONFIG: OnceLock<SerikitConfig> = OnceLock::new();

impl SerikitConfig {
    pub fn get() -> &'static SerikitConfig {
        CONFIG.get_or_init(|| {
            Self::from_env().unwrap_or_else(|e| {
                tracing::warn!("{}. Using defaults.", e);
                SerikitConfig::default()
            })
        })
    }

    /// Read the environment, falling back to defaults on an invalid value.
    /// The error is handed back so it can be reported once logging is up.
    pub fn load() -> (Self, Option<SerikitError>) {
        Self::load_from(|key| std::env::var(key).ok())
    }

    pub fn load_from<F>(lookup: F) -> (Self, Option<SerikitError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        match Self::from_lookup(lookup) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Make `config` the value `get()` returns. The first install or `get()` wins.
    pub fn install(config: Self) -> &'static SerikitConfig {
        CONFIG.get_or_init(|| config)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let json_backend = var(ENV_JSON_BACKEND)
            .map(|v| {
                v.parse::<JsonBackendKind>()
                    .map_err(|_| invalid(ENV_JSON_BACKEND, &v))
            })
            .transpose()?;

        let pretty = match var(ENV_PRETTY) {
            Some(v) => parse_flag(&v).ok_or_else(|| invalid(ENV_PRETTY, &v))?,
            None => false,
        };

        Ok(Self {
            json_backend,
            pretty,
            log_filter: var(ENV_LOG),
        })
    }
}

fn invalid(key: &str, value: &str) -> SerikitError {
    SerikitError::Config(format!("{} has invalid value '{}'", key, value))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
