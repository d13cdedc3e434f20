// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mock uploader standing in for S3

use audit_log_export::uploader::{UploadOutcome, Uploader};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Clone, Debug)]
pub struct ReceivedUpload {
    pub bucket: String,
    pub object_key: String,
    /// Contents of the local file at upload time
    pub contents: String,
    #[allow(dead_code)]
    pub local_file: PathBuf,
}

/// Records every upload and answers with a fixed outcome
pub struct MockUploader {
    outcome: UploadOutcome,
    received: Mutex<Vec<ReceivedUpload>>,
}

impl MockUploader {
    pub fn new(outcome: UploadOutcome) -> Self {
        MockUploader {
            outcome,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Uploader for MockUploader {
    async fn upload(&self, local_file: &Path, bucket: &str, object_key: &str) -> UploadOutcome {
        let contents = std::fs::read_to_string(local_file).unwrap_or_default();
        self.received.lock().unwrap().push(ReceivedUpload {
            bucket: bucket.to_string(),
            object_key: object_key.to_string(),
            contents,
            local_file: local_file.to_path_buf(),
        });
        self.outcome.clone()
    }
}
