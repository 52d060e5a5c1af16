//! Health report built from probe results for a single request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProbeResult {
    pub fn up() -> Self {
        Self {
            status: ProbeStatus::Up,
            message: None,
        }
    }

    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Down,
            message: Some(message.into()),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == ProbeStatus::Up
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Ok,
    Error,
}

/// Aggregated result of the probes run for one request. `info` carries the
/// passing results, `error` the failing ones, `details` every result; the
/// overall status is `ok` iff `error` is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: ReportStatus,
    pub info: BTreeMap<String, ProbeResult>,
    pub error: BTreeMap<String, ProbeResult>,
    pub details: BTreeMap<String, ProbeResult>,
}

impl HealthReport {
    /// Report of a probe-free check. Always ok, all maps empty.
    pub fn empty() -> Self {
        Self {
            status: ReportStatus::Ok,
            info: BTreeMap::new(),
            error: BTreeMap::new(),
            details: BTreeMap::new(),
        }
    }

    pub fn from_results(results: impl IntoIterator<Item = (String, ProbeResult)>) -> Self {
        let mut report = Self::empty();

        for (name, result) in results {
            if result.is_up() {
                report.info.insert(name.clone(), result.clone());
            } else {
                report.error.insert(name.clone(), result.clone());
                report.status = ReportStatus::Error;
            }
            report.details.insert(name, result);
        }

        report
    }

    pub fn is_ok(&self) -> bool {
        self.status == ReportStatus::Ok
    }
}
