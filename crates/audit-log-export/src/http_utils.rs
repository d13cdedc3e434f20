// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use core::time::Duration;
use std::error::Error;

/// Environment variable set by the Lambda runtime on every execution environment.
const ENV_LAMBDA_RUNTIME_API: &str = "AWS_LAMBDA_RUNTIME_API";

/// Returns true if the process was started by the AWS Lambda runtime.
pub fn is_lambda_runtime() -> bool {
    is_lambda_runtime_from_env(std::env::var(ENV_LAMBDA_RUNTIME_API).ok().as_deref())
}

fn is_lambda_runtime_from_env(val: Option<&str>) -> bool {
    val.is_some_and(|api| !api.is_empty())
}

/// Builds a reqwest client with optional proxy configuration and timeout.
/// Without a timeout the client waits as long as the server keeps the connection open.
pub fn build_client(
    proxy_url: Option<&str>,
    timeout: Option<Duration>,
) -> Result<reqwest::Client, Box<dyn Error>> {
    let mut builder = reqwest::Client::builder().use_rustls_tls();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(proxy) = proxy_url {
        builder = builder.proxy(reqwest::Proxy::https(proxy)?);
    }
    Ok(builder.build()?)
}
