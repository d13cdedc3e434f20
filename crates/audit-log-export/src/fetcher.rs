// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::config::{Config, StackCredential};
use crate::date_window::DateWindow;
use crate::error::FetchError;
use crate::http_utils::build_client;

/// JSON payload returned by the audit log API on success.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogResponse(Value);

impl AuditLogResponse {
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// The API only includes a `logs` field when there is something to report.
    pub fn has_logs(&self) -> bool {
        self.0.get("logs").is_some()
    }

    pub fn log_count(&self) -> Option<usize> {
        self.0.get("logs")?.as_array().map(Vec::len)
    }

    pub fn payload(&self) -> &Value {
        &self.0
    }
}

/// Result of a query that reached the API.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 200 or 201 with a JSON body
    Success(AuditLogResponse),
    /// Any other status, with the response body as sent by the API
    Failed { status: u16, message: String },
}

#[async_trait]
pub trait AuditLogFetcher: Send + Sync {
    /// Queries the audit log entries of one stack created within `window`.
    /// Transport and decoding problems are errors; an unexpected status is a
    /// [`FetchOutcome::Failed`].
    async fn fetch(
        &self,
        window: &DateWindow,
        credential: &StackCredential,
    ) -> Result<FetchOutcome, FetchError>;
}

/// Fetches audit logs from the management API of the configured region.
#[derive(Debug, Clone)]
pub struct ApiFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl ApiFetcher {
    pub fn new(config: &Config) -> Self {
        let client = build_client(config.https_proxy.as_deref(), config.request_timeout)
            .or_else(|e| {
                error!(
                    "Unable to parse proxy configuration: {}, no proxy will be used",
                    e
                );
                build_client(None, config.request_timeout)
            })
            .unwrap_or_else(|e| {
                error!("Unable to build HTTP client: {}, using defaults", e);
                reqwest::Client::new()
            });
        ApiFetcher {
            base_url: config.api_base_url.clone(),
            client,
        }
    }

    fn audit_logs_url(&self) -> String {
        format!("{}v3/audit-logs", self.base_url)
    }
}

/// `{"$and":[{"created_at":{"$gte":start}},{"created_at":{"$lt":end}}]}`
pub fn created_within_query(window: &DateWindow) -> String {
    json!({
        "$and": [
            { "created_at": { "$gte": window.start_timestamp() } },
            { "created_at": { "$lt": window.end_timestamp() } },
        ]
    })
    .to_string()
}

#[async_trait]
impl AuditLogFetcher for ApiFetcher {
    async fn fetch(
        &self,
        window: &DateWindow,
        credential: &StackCredential,
    ) -> Result<FetchOutcome, FetchError> {
        let query = created_within_query(window);
        let time = std::time::Instant::now();
        let response = self
            .client
            .get(self.audit_logs_url())
            .query(&[("include_count", "true"), ("query", query.as_str())])
            .header("authorization", &credential.management_token)
            .header("api_key", &credential.api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let elapsed = time.elapsed();

        let status = response.status();
        let body = response.text().await?;
        debug!(
            "Audit log API answered {status} in {} ms for stack {}",
            elapsed.as_millis(),
            credential.api_key
        );

        if status == StatusCode::OK || status == StatusCode::CREATED {
            let payload: Value = serde_json::from_str(&body)?;
            Ok(FetchOutcome::Success(AuditLogResponse::new(payload)))
        } else {
            Ok(FetchOutcome::Failed {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}
