// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::{Config, StackCredential};
use crate::date_window::DateWindow;
use crate::fetcher::{AuditLogFetcher, FetchOutcome};
use crate::response::InvocationResponse;
use crate::serializer::write_scratch_file;
use crate::uploader::{UploadOutcome, Uploader};

/// What happened to one configured stack during an invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StackOutcome {
    Uploaded {
        object_key: String,
        log_count: Option<usize>,
    },
    /// The API answered without a `logs` field
    NoLogs,
    ApiError {
        status: u16,
        message: String,
    },
    InvalidCredential {
        reason: String,
    },
    FetchFailed {
        reason: String,
    },
    WriteFailed {
        reason: String,
    },
    UploadFailed {
        upload: UploadOutcome,
    },
}

impl StackOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, StackOutcome::Uploaded { .. } | StackOutcome::NoLogs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackReport {
    /// Position of the stack in `CS_STACKS`
    pub index: usize,
    /// Absent when the entry could not be parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(flatten)]
    pub outcome: StackOutcome,
}

/// Runs one export: every configured stack is fetched, staged and uploaded in
/// order. A failing stack is reported and the next one is processed.
pub struct AuditLogExporter {
    pub config: Arc<Config>,
    pub fetcher: Arc<dyn AuditLogFetcher>,
    pub uploader: Arc<dyn Uploader>,
}

impl AuditLogExporter {
    /// Exports yesterday's audit logs.
    pub async fn run(&self) -> InvocationResponse {
        self.run_for(DateWindow::yesterday()).await
    }

    pub async fn run_for(&self, window: DateWindow) -> InvocationResponse {
        if !self.config.is_exportable() {
            return InvocationResponse::missing_config();
        }
        let Some(bucket) = self.config.bucket.as_deref() else {
            return InvocationResponse::missing_config();
        };

        info!(
            "Exporting audit logs created in [{}, {}) for {} stacks in region {:?} to bucket {bucket}",
            window.start_timestamp(),
            window.end_timestamp(),
            self.config.stacks.len(),
            self.config.region
        );

        let mut reports = Vec::with_capacity(self.config.stacks.len());
        for (index, entry) in self.config.stacks.iter().enumerate() {
            reports.push(self.export_stack(index, entry, &window, bucket).await);
        }

        let uploaded = reports
            .iter()
            .filter(|r| matches!(r.outcome, StackOutcome::Uploaded { .. }))
            .count();
        let no_logs = reports
            .iter()
            .filter(|r| r.outcome == StackOutcome::NoLogs)
            .count();
        let failed = reports.iter().filter(|r| r.outcome.is_failure()).count();
        if failed > 0 {
            warn!("Export finished: {uploaded} uploaded, {no_logs} without logs, {failed} failed");
        } else {
            info!("Export finished: {uploaded} uploaded, {no_logs} without logs");
        }

        InvocationResponse::ok(reports)
    }

    async fn export_stack(
        &self,
        index: usize,
        entry: &str,
        window: &DateWindow,
        bucket: &str,
    ) -> StackReport {
        let credential = match StackCredential::parse(entry) {
            Ok(credential) => credential,
            Err(e) => {
                error!("Skipping stack #{index}: invalid CS_STACKS entry: {e}");
                return StackReport {
                    index,
                    api_key: None,
                    outcome: StackOutcome::InvalidCredential {
                        reason: e.to_string(),
                    },
                };
            }
        };
        let outcome = self.export_credential(&credential, window, bucket).await;
        StackReport {
            index,
            api_key: Some(credential.api_key),
            outcome,
        }
    }

    async fn export_credential(
        &self,
        credential: &StackCredential,
        window: &DateWindow,
        bucket: &str,
    ) -> StackOutcome {
        let stack = &credential.api_key;
        let response = match self.fetcher.fetch(window, credential).await {
            Ok(FetchOutcome::Success(response)) => response,
            Ok(FetchOutcome::Failed { status, message }) => {
                error!("{status}: Failed to fetch audit logs for stack {stack}: {message}");
                return StackOutcome::ApiError { status, message };
            }
            Err(e) => {
                error!("Failed to fetch audit logs for stack {stack}: {e}");
                return StackOutcome::FetchFailed {
                    reason: e.to_string(),
                };
            }
        };

        if !response.has_logs() {
            info!("No logs found for stack {stack}");
            debug!("Response for stack {stack}: {}", response.payload());
            return StackOutcome::NoLogs;
        }

        let object_key = window.file_name(stack);
        info!("Logs found for stack {stack}. Uploading them as {object_key}");

        let local_file =
            match write_scratch_file(&self.config.scratch_dir, &object_key, response.payload())
                .await
            {
                Ok(path) => path,
                Err(e) => {
                    error!("Failed to stage audit logs for stack {stack}: {e}");
                    return StackOutcome::WriteFailed {
                        reason: e.to_string(),
                    };
                }
            };

        match self.uploader.upload(&local_file, bucket, &object_key).await {
            UploadOutcome::Uploaded => StackOutcome::Uploaded {
                object_key,
                log_count: response.log_count(),
            },
            upload => StackOutcome::UploadFailed { upload },
        }
    }
}
