use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pdf_image_convert::config::job::JobFile;
use pdf_image_convert::config::merged::MergedConfig;
use pdf_image_convert::config::{self};
use pdf_image_convert::pipeline::job_runner::{JobConfig, run_all_jobs};
use pdf_image_convert::report::{self, JobSummary};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: pdf_image_convert <jobs.yaml>...");
        eprintln!("  Convert images and PDFs according to job specifications.");
        eprintln!("  Kinds: image_to_pdf, pdf_to_images, compress_image, resize_image, compress_pdf");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pdf_image_convert {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    // Collect job configs from all job files; a report path is taken from the
    // settings of the last job file that sets one.
    let mut job_configs: Vec<JobConfig> = Vec::new();
    let mut report_path: Option<PathBuf> = None;

    for job_file_arg in &args {
        let job_file_path = Path::new(job_file_arg);

        let settings = match config::load_settings_for_job(job_file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings for {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let yaml_content = match std::fs::read_to_string(job_file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to read job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let job_file: JobFile = match serde_yml::from_str(&yaml_content) {
            Ok(jf) => jf,
            Err(e) => {
                eprintln!("ERROR: Failed to parse job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Relative paths resolve against the job file directory.
        let job_dir = job_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if let Some(path) = &settings.report {
            report_path = Some(resolve_path(&job_dir, &path.to_string_lossy()));
        }

        for job in &job_file.jobs {
            let merged = match MergedConfig::new(&settings, job) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("ERROR: {job_file_arg}: {e}");
                    return ExitCode::FAILURE;
                }
            };

            job_configs.push(JobConfig {
                input_paths: job
                    .input
                    .iter()
                    .map(|input| resolve_path(&job_dir, input))
                    .collect(),
                output_path: resolve_path(&job_dir, &job.output),
                request: merged.to_request(),
            });
        }
    }

    let results = run_all_jobs(&job_configs);

    let mut has_error = false;
    let mut summaries: Vec<JobSummary> = Vec::new();
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(job_result) => {
                let summary = JobSummary::from(job_result);
                eprintln!(
                    "OK: {} {} -> {} [{}]{}",
                    summary.kind,
                    display_paths(&job_result.input_paths),
                    job_configs[i].output_path.display(),
                    summary.size_line(),
                    detail_suffix(&summary)
                );
                summaries.push(summary);
            }
            Err(e) => {
                eprintln!(
                    "ERROR: {} {} -> {}: {e}",
                    job_configs[i].request.kind,
                    display_paths(&job_configs[i].input_paths),
                    job_configs[i].output_path.display()
                );
                has_error = true;
            }
        }
    }

    if let Some(path) = report_path
        && let Err(e) = report::write_report(&path, &summaries)
    {
        eprintln!("ERROR: Failed to write report {}: {e}", path.display());
        has_error = true;
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    match paths {
        [single] => single.display().to_string(),
        many => format!("{} files", many.len()),
    }
}

fn detail_suffix(summary: &JobSummary) -> String {
    match (summary.page_count, summary.dimensions) {
        (Some(pages), _) => format!(" ({pages} pages)"),
        (None, Some((w, h))) => format!(" ({w}x{h})"),
        (None, None) => String::new(),
    }
}

/// Resolve a potentially relative path against a base directory.
/// If the path is already absolute, return it as-is.
fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
