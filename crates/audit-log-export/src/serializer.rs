// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SerializeError;

const INDENT: &[u8] = b"    ";

/// Encodes `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Writes `value` to `<scratch_dir>/<file_name>`, replacing any existing file,
/// and returns the path written.
pub async fn write_scratch_file<T: Serialize + ?Sized>(
    scratch_dir: &Path,
    file_name: &str,
    value: &T,
) -> Result<PathBuf, SerializeError> {
    let path = scratch_dir.join(file_name);
    let contents = to_pretty_json(value)?;
    tokio::fs::write(&path, &contents)
        .await
        .map_err(|source| SerializeError::Write {
            path: path.clone(),
            source,
        })?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_four_space_indent() {
        let encoded = to_pretty_json(&json!({"logs": [1]})).unwrap();
        assert_eq!(
            String::from_utf8(encoded).unwrap(),
            "{\n    \"logs\": [\n        1\n    ]\n}"
        );
    }

    #[tokio::test]
    async fn test_write_scratch_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let payload = json!({
            "logs": [{"uid": "abc", "created_at": "2024-02-29T10:00:00.000Z"}],
            "count": 1
        });

        let path = write_scratch_file(dir.path(), "2024-02-29_blt123.json", &payload)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("2024-02-29_blt123.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n    \"logs\""));
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, payload);
    }

    #[tokio::test]
    async fn test_write_scratch_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("out.json"), "stale contents that are longer").unwrap();

        let path = write_scratch_file(dir.path(), "out.json", &json!({"logs": []}))
            .await
            .unwrap();

        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, json!({"logs": []}));
    }

    #[tokio::test]
    async fn test_write_scratch_file_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = write_scratch_file(&missing, "out.json", &json!({"logs": []})).await;
        match result {
            Err(SerializeError::Write { path, .. }) => assert_eq!(path, missing.join("out.json")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
