// Job unit: read inputs -> convert -> write artifacts

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ConvertError;
use crate::model::{ConversionKind, ConversionRequest, ConversionResult};
use crate::pipeline::orchestrator::convert;

/// Configuration for a single job.
pub struct JobConfig {
    /// One path for every kind except `ImageToPdf`, which takes any number.
    pub input_paths: Vec<PathBuf>,
    /// Output file, or output directory for `PdfToImages`.
    pub output_path: PathBuf,
    pub request: ConversionRequest,
}

/// Result of processing a single job.
pub struct JobResult {
    pub input_paths: Vec<PathBuf>,
    /// Files written, in artifact order.
    pub output_paths: Vec<PathBuf>,
    pub conversion: ConversionResult,
}

/// Run a single job.
///
/// Nothing is written unless the conversion succeeds; an error leaves the
/// output location untouched.
pub fn run_job(config: &JobConfig) -> crate::error::Result<JobResult> {
    if config.input_paths.is_empty() {
        return Err(ConvertError::invalid_request("job has no input files"));
    }

    let buffers = config
        .input_paths
        .iter()
        .map(|path| {
            std::fs::read(path).map_err(|e| {
                ConvertError::IoError(std::io::Error::new(
                    e.kind(),
                    format!("{}: {e}", path.display()),
                ))
            })
        })
        .collect::<crate::error::Result<Vec<_>>>()?;
    let inputs: Vec<&[u8]> = buffers.iter().map(Vec::as_slice).collect();
    debug!(
        kind = %config.request.kind,
        inputs = inputs.len(),
        "job inputs loaded"
    );

    let conversion = convert(&inputs, &config.request)?;
    let output_paths = write_artifacts(&config.output_path, &conversion)?;

    info!(
        kind = %conversion.kind,
        outputs = output_paths.len(),
        "job finished"
    );

    Ok(JobResult {
        input_paths: config.input_paths.clone(),
        output_paths,
        conversion,
    })
}

/// Page images go into `output` as `page_<n>.<ext>` (1-based); every other
/// kind writes its single artifact to `output` itself.
fn write_artifacts(
    output: &Path,
    conversion: &ConversionResult,
) -> crate::error::Result<Vec<PathBuf>> {
    if conversion.kind == ConversionKind::PdfToImages {
        std::fs::create_dir_all(output)?;
        let mut paths = Vec::with_capacity(conversion.artifacts.len());
        for (i, artifact) in conversion.artifacts.iter().enumerate() {
            let path = output.join(page_file_name(i + 1, artifact.format.extension()));
            std::fs::write(&path, &artifact.bytes)?;
            paths.push(path);
        }
        return Ok(paths);
    }

    let [artifact] = conversion.artifacts.as_slice() else {
        return Err(ConvertError::invalid_request(format!(
            "{} produced {} artifacts, expected one",
            conversion.kind,
            conversion.artifacts.len()
        )));
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &artifact.bytes)?;
    Ok(vec![output.to_path_buf()])
}

/// File name for the `page_number`-th (1-based) page image.
pub fn page_file_name(page_number: usize, extension: &str) -> String {
    format!("page_{page_number}.{extension}")
}

/// Run multiple jobs, collecting results.
/// One job failure does NOT prevent other jobs from running.
pub fn run_all_jobs(jobs: &[JobConfig]) -> Vec<crate::error::Result<JobResult>> {
    jobs.iter().map(run_job).collect()
}
