// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Exports the previous day's audit log entries of a set of stacks to an S3 bucket.
//!
//! One invocation fetches `[yesterday, today)` for every stack configured in
//! `CS_STACKS`, stages each non-empty result as `<yesterday>_<api_key>.json`
//! and uploads it to `S3_BUCKET`. Stacks are processed one after the other and
//! each gets its own [`exporter::StackOutcome`].

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod date_window;
pub mod error;
pub mod exporter;
pub mod fetcher;
pub mod http_utils;
pub mod response;
pub mod serializer;
pub mod uploader;

pub use config::Config;
pub use exporter::{AuditLogExporter, StackOutcome, StackReport};
pub use response::InvocationResponse;
