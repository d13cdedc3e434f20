// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::sync::Arc;

use aws_config::BehaviorVersion;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use audit_log_export::{
    config::Config, fetcher::ApiFetcher, http_utils::is_lambda_runtime, uploader::S3Uploader,
    AuditLogExporter, InvocationResponse,
};

#[tokio::main]
pub async fn main() -> Result<(), Error> {
    let config = match Config::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            // the subscriber is not installed yet
            eprintln!("Error loading audit log export configuration: {e}");
            return Err(e.into());
        }
    };

    let env_filter = format!(
        "h2=off,hyper=off,rustls=off,aws_smithy_runtime=off,aws_config=warn,{}",
        config.log_level
    );

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_new(env_filter)?)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Logging subsystem enabled");

    let shared_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let exporter = Arc::new(AuditLogExporter {
        fetcher: Arc::new(ApiFetcher::new(&config)),
        uploader: Arc::new(S3Uploader::new(aws_sdk_s3::Client::new(&shared_config))),
        config,
    });

    if is_lambda_runtime() {
        debug!("Starting Lambda runtime loop");
        return lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
            let exporter = Arc::clone(&exporter);
            async move { handle_event(event, &exporter).await }
        }))
        .await;
    }

    info!("AWS_LAMBDA_RUNTIME_API not set, running a single export");
    let response = exporter.run().await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    if !response.is_success() {
        error!("Export finished with status {}", response.status_code);
        std::process::exit(1);
    }
    Ok(())
}

/// The event payload and context are not used: every invocation exports yesterday.
async fn handle_event(
    event: LambdaEvent<Value>,
    exporter: &AuditLogExporter,
) -> Result<InvocationResponse, Error> {
    debug!("Invoked with request id {}", event.context.request_id);
    Ok(exporter.run().await)
}
