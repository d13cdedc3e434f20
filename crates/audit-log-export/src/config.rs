// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env::{self, VarError};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ConfigError, CredentialError};

const NA_BASE_URL: &str = "https://api.contentstack.io/";
const EU_BASE_URL: &str = "https://eu-api.contentstack.com/";
const DEFAULT_SCRATCH_DIR: &str = "/tmp";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Region hosting the stacks. Only the exact literals `NA`, `na`, `EU` and `eu` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    NorthAmerica,
    Europe,
}

impl Region {
    pub fn base_url(&self) -> &'static str {
        match self {
            Region::NorthAmerica => NA_BASE_URL,
            Region::Europe => EU_BASE_URL,
        }
    }
}

impl FromStr for Region {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NA" | "na" => Ok(Region::NorthAmerica),
            "EU" | "eu" => Ok(Region::Europe),
            other => Err(ConfigError::UnknownRegion(other.to_string())),
        }
    }
}

/// API key and management token for one stack.
#[derive(Clone, PartialEq, Eq)]
pub struct StackCredential {
    pub api_key: String,
    pub management_token: String,
}

impl StackCredential {
    /// Parses a single `<api_key>,<management_token>` entry.
    pub fn parse(entry: &str) -> Result<Self, CredentialError> {
        let fields: Vec<&str> = entry.split(',').map(str::trim).collect();
        if fields.len() != 2 {
            return Err(CredentialError::FieldCount(fields.len()));
        }
        if fields[0].is_empty() {
            return Err(CredentialError::EmptyField("api key"));
        }
        if fields[1].is_empty() {
            return Err(CredentialError::EmptyField("management token"));
        }
        Ok(Self {
            api_key: fields[0].to_string(),
            management_token: fields[1].to_string(),
        })
    }
}

impl fmt::Debug for StackCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackCredential")
            .field("api_key", &self.api_key)
            .field("management_token", &"<redacted>")
            .finish()
    }
}

/// Splits `CS_STACKS` into its entries. Blank entries, such as the one left by a
/// trailing `;`, are dropped. Entries are parsed later, one stack at a time, so a
/// malformed entry only affects its own stack.
pub fn split_stacks(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub region: Region,
    /// Base URL of the audit log API, always ending with `/`
    pub api_base_url: String,
    /// Raw `<api_key>,<management_token>` entries from `CS_STACKS`
    pub stacks: Vec<String>,
    /// Destination bucket. `None` when `S3_BUCKET` is unset or empty.
    pub bucket: Option<String>,
    /// Where output artifacts are staged before upload
    pub scratch_dir: PathBuf,
    pub https_proxy: Option<String>,
    /// Per-request timeout for the audit log API. `None` keeps the client default.
    pub request_timeout: Option<Duration>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::default(),
            api_base_url: NA_BASE_URL.to_string(),
            stacks: Vec::new(),
            bucket: None,
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            https_proxy: None,
            request_timeout: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let region: Region = read_var("CS_REGION")?
            .unwrap_or_else(|| "NA".to_string())
            .parse()?;

        // CS_API_URL will primarily be used for integration tests
        // overrides the region's base url
        let api_base_url = match read_var("CS_API_URL")? {
            Some(url) if url.ends_with('/') => url,
            Some(url) => format!("{url}/"),
            None => region.base_url().to_string(),
        };

        let stacks = split_stacks(&read_var("CS_STACKS")?.unwrap_or_default());
        let bucket = read_var("S3_BUCKET")?.filter(|bucket| !bucket.trim().is_empty());
        let scratch_dir = read_var("SCRATCH_DIR")?
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRATCH_DIR));
        let https_proxy = read_var("HTTPS_PROXY")?;
        let request_timeout = match read_var("CS_REQUEST_TIMEOUT_SECS")? {
            Some(secs) => Some(Duration::from_secs(secs.trim().parse::<u64>().map_err(
                |_| {
                    ConfigError::Invalid(format!(
                        "CS_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{secs}'"
                    ))
                },
            )?)),
            None => None,
        };
        let log_level = read_var("LOG_LEVEL")?
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|| "info".to_string());

        let config = Self {
            region,
            api_base_url,
            stacks,
            bucket,
            scratch_dir,
            https_proxy,
            request_timeout,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        if let Some(proxy) = self.https_proxy.as_deref() {
            reqwest::Proxy::https(proxy).map_err(|e| {
                ConfigError::Invalid(format!("HTTPS_PROXY '{proxy}' is not a valid proxy URL: {e}"))
            })?;
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Invalid(
                "CS_REQUEST_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether there is anything to export and somewhere to put it
    pub fn is_exportable(&self) -> bool {
        !self.stacks.is_empty() && self.bucket.is_some()
    }
}

/// Reads an environment variable. Only an absent variable falls back to a default;
/// a value that is not valid unicode is a configuration error.
fn read_var(name: &str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(val) => Ok(Some(val)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::Invalid(format!(
            "{name} is not valid unicode"
        ))),
    }
}
