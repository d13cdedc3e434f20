// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use tracing::{debug, error};

use crate::exporter::StackReport;

pub const MISSING_CONFIG_MESSAGE: &str = "No stacks or bucket defined as an env variable.";

/// Result handed back to whoever triggered the invocation.
///
/// Serialized as:
/// {
///     "statusCode": 200,
///     "body": "\"OK\"",
///     "stacks": [...]
/// }
/// `body` holds a JSON-encoded string. `stacks` is omitted when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stacks: Vec<StackReport>,
}

impl InvocationResponse {
    pub fn ok(stacks: Vec<StackReport>) -> Self {
        let mut response = log_and_create_response("OK", 200);
        response.stacks = stacks;
        response
    }

    pub fn missing_config() -> Self {
        log_and_create_response(MISSING_CONFIG_MESSAGE, 400)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Logs the given message, at debug level for a success status and error
/// otherwise, and returns it JSON-encoded in the body of a response with the
/// given status code.
pub fn log_and_create_response(message: &str, status_code: u16) -> InvocationResponse {
    if (200..300).contains(&status_code) {
        debug!("{message}");
    } else {
        error!("{message}");
    }
    InvocationResponse {
        status_code,
        // encoding a &str cannot fail
        body: serde_json::to_string(message).unwrap_or_default(),
        stacks: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_config_response() {
        let response = InvocationResponse::missing_config();
        assert_eq!(response.status_code, 400);
        assert_eq!(
            response.body,
            "\"No stacks or bucket defined as an env variable.\""
        );
        assert!(!response.is_success());
    }

    #[test]
    fn test_ok_response_shape() {
        let response = InvocationResponse::ok(Vec::new());
        assert!(response.is_success());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"statusCode": 200, "body": "\"OK\""})
        );
    }

    #[test]
    fn test_body_escapes_quotes() {
        let response = log_and_create_response("said \"no\"", 502);
        assert_eq!(response.body, r#""said \"no\"""#);
    }
}
