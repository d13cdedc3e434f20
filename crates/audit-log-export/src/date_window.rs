// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::{NaiveDate, Utc};

const MIDNIGHT_SUFFIX: &str = "T00:00:00.000Z";

/// The half-open UTC interval `[yesterday 00:00, today 00:00)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Window covering the whole day before `today`.
    ///
    /// Returns `None` only for `NaiveDate::MIN`, which has no previous day.
    pub fn ending_on(today: NaiveDate) -> Option<Self> {
        Some(Self {
            start: today.pred_opt()?,
            end: today,
        })
    }

    /// Window covering yesterday according to the wall clock.
    pub fn yesterday() -> Self {
        let today = Utc::now().date_naive();
        // the current date is never NaiveDate::MIN
        Self::ending_on(today).unwrap_or(Self {
            start: today,
            end: today,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end
    }

    /// `start` as `YYYY-MM-DDT00:00:00.000Z`
    pub fn start_timestamp(&self) -> String {
        format!("{}{MIDNIGHT_SUFFIX}", self.start.format("%Y-%m-%d"))
    }

    /// `end` as `YYYY-MM-DDT00:00:00.000Z`
    pub fn end_timestamp(&self) -> String {
        format!("{}{MIDNIGHT_SUFFIX}", self.end.format("%Y-%m-%d"))
    }

    /// Name of the output artifact for a stack: `<start date>_<api key>.json`
    pub fn file_name(&self, api_key: &str) -> String {
        format!("{}_{api_key}.json", self.start.format("%Y-%m-%d"))
    }
}
