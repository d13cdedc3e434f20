// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info};

/// Result of pushing a scratch file to the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum UploadOutcome {
    Uploaded,
    /// The local file disappeared before it could be read
    FileNotFound,
    /// The bucket refused the credentials in use
    PermissionDenied,
    Failed(String),
}

#[async_trait]
pub trait Uploader: Send + Sync {
    /// Uploads `local_file` to `bucket` as `object_key`.
    async fn upload(&self, local_file: &Path, bucket: &str, object_key: &str) -> UploadOutcome;
}

/// Uploads to S3 with whatever credentials the ambient AWS configuration resolves.
#[derive(Debug, Clone)]
pub struct S3Uploader {
    client: aws_sdk_s3::Client,
}

impl S3Uploader {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        S3Uploader { client }
    }
}

#[async_trait]
impl Uploader for S3Uploader {
    async fn upload(&self, local_file: &Path, bucket: &str, object_key: &str) -> UploadOutcome {
        match tokio::fs::try_exists(local_file).await {
            Ok(true) => {}
            Ok(false) => {
                error!("Upload skipped, file not found: {}", local_file.display());
                return UploadOutcome::FileNotFound;
            }
            Err(e) => {
                error!("Unable to check {}: {e}", local_file.display());
                return UploadOutcome::Failed(e.to_string());
            }
        }

        let body = match ByteStream::from_path(local_file).await {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to read {}: {e}", local_file.display());
                return UploadOutcome::Failed(e.to_string());
            }
        };

        let result = self
            .client
            .put_object()
            .bucket(bucket)
            .key(object_key)
            .content_type("application/json")
            .body(body)
            .send()
            .await;

        match result {
            Ok(output) => {
                debug!("PutObject returned etag {:?}", output.e_tag());
                info!("Uploaded s3://{bucket}/{object_key}");
                UploadOutcome::Uploaded
            }
            Err(err) => {
                let outcome = match &err {
                    SdkError::ServiceError(service_err) => outcome_for_service_error(
                        service_err.err().code(),
                        service_err.raw().status().as_u16(),
                        &DisplayErrorContext(&err).to_string(),
                    ),
                    _ => UploadOutcome::Failed(format!(
                        "possibly missing credentials: {}",
                        DisplayErrorContext(&err)
                    )),
                };
                error!("Upload of s3://{bucket}/{object_key} failed: {outcome:?}");
                outcome
            }
        }
    }
}

/// Maps an error response from S3 to an outcome.
fn outcome_for_service_error(code: Option<&str>, status: u16, message: &str) -> UploadOutcome {
    let denied_code = matches!(
        code,
        Some("AccessDenied" | "Forbidden" | "InvalidAccessKeyId" | "SignatureDoesNotMatch")
    );
    if denied_code || status == 403 {
        UploadOutcome::PermissionDenied
    } else {
        UploadOutcome::Failed(message.to_string())
    }
}
