// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// Errors raised while loading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown region '{0}'. Must be one of: NA, na, EU, eu")]
    UnknownRegion(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A stack entry in `CS_STACKS` that is not `<api_key>,<management_token>`
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("expected 2 comma-separated fields, got {0}")]
    FieldCount(usize),

    #[error("empty {0}")]
    EmptyField(&'static str),
}

/// Errors that prevent the audit log API from producing any response at all
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request to audit log API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Audit log API returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors writing a scratch file
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("Failed to encode audit logs as JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
