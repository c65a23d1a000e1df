// Per-job metrics: console size formatting and the JSON batch report

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::model::ConversionKind;
use crate::pipeline::job_runner::JobResult;

/// Metrics of one finished job.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub kind: ConversionKind,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    pub original_size: u64,
    pub result_size: u64,
    pub reduction_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<(u32, u32)>,
}

impl From<&JobResult> for JobSummary {
    fn from(result: &JobResult) -> Self {
        let conversion = &result.conversion;
        JobSummary {
            kind: conversion.kind,
            inputs: result.input_paths.clone(),
            outputs: result.output_paths.clone(),
            original_size: conversion.original_size,
            result_size: conversion.output_size(),
            reduction_percent: conversion.reduction_percent(),
            page_count: conversion.page_count(),
            dimensions: conversion.dimensions(),
        }
    }
}

impl JobSummary {
    /// One-line console rendering, e.g. `1.20 MB -> 350.00 KB (-70.8%)`.
    pub fn size_line(&self) -> String {
        format!(
            "{} -> {} ({:+.1}%)",
            format_file_size(self.original_size),
            format_file_size(self.result_size),
            -self.reduction_percent
        )
    }
}

/// Human-readable size: bytes below 1 KiB, then KB and MB with two decimals.
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let value = bytes as f64;
    if value < KB {
        format!("{bytes} B")
    } else if value < MB {
        format!("{:.2} KB", value / KB)
    } else {
        format!("{:.2} MB", value / MB)
    }
}

/// Write the summaries as pretty JSON.
pub fn write_report(path: &Path, summaries: &[JobSummary]) -> crate::error::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summaries)?;
    std::fs::write(path, json)?;
    Ok(())
}
