use crate::commands::{print_json, Context};
use crate::error::{invalid_input, CliError};
use crate::util::{parse_run_date, resolve_conditions};
use anyhow::{Context as _, Result};
use clap::Args;
use scrubber_config::{AppConfig, UploadBackend, UploadConfig};
use scrubber_core::dto::ScrubSummaryDto;
use scrubber_core::rules::{scrub, ScrubOutcome};
use scrubber_io::archive::bundle_zip;
use scrubber_io::directory::DirectoryTarget;
use scrubber_io::export::{export_files, ExportFile, ExportOptions};
use scrubber_io::table::{read_table, ReadOptions};
use scrubber_io::upload::{upload_all, Folders, UploadReport, UploadTarget};
use scrubber_io::webdav::WebDavTarget;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Args)]
pub struct InputArgs {
    /// List dataset with log type and phone columns
    #[arg(long)]
    pub list: PathBuf,
    /// Log dataset to scrub (repeatable)
    #[arg(long = "log", value_name = "FILE")]
    pub logs: Vec<PathBuf>,
    /// Threshold condition, e.g. Voicemail=3 (replaces configured conditions)
    #[arg(long = "condition", value_name = "TYPE=N")]
    pub conditions: Vec<String>,
    /// Processing date stamped on outputs (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Write every output into one ZIP archive
    #[arg(long, value_name = "ZIP")]
    pub out: Option<PathBuf>,
    /// Write every output as a CSV file into this directory
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
    /// Upload outputs to the configured target after saving them locally
    #[arg(long)]
    pub upload: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Serialize)]
struct RunReport {
    #[serde(flatten)]
    summary: ScrubSummaryDto,
    files: Vec<FileReport>,
    archive: Option<String>,
    out_dir: Option<String>,
    upload: Option<UploadSummary>,
}

#[derive(Debug, Serialize)]
struct FileReport {
    name: String,
    destination: &'static str,
    rows: usize,
}

#[derive(Debug, Serialize)]
struct UploadSummary {
    target: &'static str,
    uploaded: Vec<UploadedFile>,
    failed: Vec<FailedUpload>,
}

#[derive(Debug, Serialize)]
struct UploadedFile {
    file: String,
    location: String,
}

#[derive(Debug, Serialize)]
struct FailedUpload {
    file: String,
    error: String,
}

impl UploadSummary {
    fn new(target: &'static str, report: UploadReport) -> Self {
        Self {
            target,
            uploaded: report
                .uploaded
                .into_iter()
                .map(|item| UploadedFile {
                    file: item.file,
                    location: item.location,
                })
                .collect(),
            failed: report
                .failed
                .into_iter()
                .map(|item| FailedUpload {
                    file: item.file,
                    error: item.error,
                })
                .collect(),
        }
    }
}

pub fn run(ctx: &Context<'_>, args: RunArgs) -> Result<()> {
    if args.out.is_none() && args.out_dir.is_none() {
        return Err(invalid_input("run needs --out or --out-dir"));
    }
    // Resolve the target up front so a bad upload config fails before any work.
    let target = if args.upload {
        let upload = ctx
            .config
            .upload
            .as_ref()
            .ok_or_else(|| invalid_input("--upload needs an [upload] section in the config"))?;
        Some((build_target(upload)?, folders(upload)))
    } else {
        None
    };

    let outcome = scrub_inputs(ctx.config, &args.input)?;
    let stamp = outcome
        .processed_on
        .format(&ctx.config.output.file_date_format)
        .to_string();
    let files = export_files(
        &outcome,
        &ExportOptions {
            stamp,
            removal_date_format: ctx.config.output.removal_date_format.clone(),
        },
    )
    .with_context(|| "serialize outputs")?;

    if let Some(path) = &args.out {
        write_archive(path, &files)?;
    }
    if let Some(dir) = &args.out_dir {
        write_dir(dir, &files)?;
    }

    let upload = target.map(|(target, folders)| {
        let report = upload_all(target.as_ref(), &folders, &files);
        UploadSummary::new(target.target_name(), report)
    });

    let report = RunReport {
        summary: outcome.summary(),
        files: files
            .iter()
            .map(|file| FileReport {
                name: file.name.clone(),
                destination: file.destination.as_str(),
                rows: file.rows,
            })
            .collect(),
        archive: args.out.as_ref().map(|path| path.display().to_string()),
        out_dir: args.out_dir.as_ref().map(|path| path.display().to_string()),
        upload,
    };

    if ctx.json {
        print_json(&report)?;
    } else {
        print_summary(&report.summary);
        println!("Outputs:");
        for file in &report.files {
            println!("- {} ({} rows)", file.name, file.rows);
        }
        if let Some(archive) = &report.archive {
            println!("Archive: {archive}");
        }
        if let Some(dir) = &report.out_dir {
            println!("Directory: {dir}");
        }
        if let Some(upload) = &report.upload {
            println!(
                "Uploaded {} of {} files via {}",
                upload.uploaded.len(),
                report.files.len(),
                upload.target
            );
            for failure in &upload.failed {
                println!("- failed {}: {}", failure.file, failure.error);
            }
        }
    }

    if let Some(upload) = &report.upload {
        if !upload.failed.is_empty() {
            return Err(CliError::UploadFailed {
                failed: upload.failed.len(),
                total: report.files.len(),
            }
            .into());
        }
    }
    Ok(())
}

pub fn preview(ctx: &Context<'_>, args: PreviewArgs) -> Result<()> {
    let outcome = scrub_inputs(ctx.config, &args.input)?;
    let summary = outcome.summary();
    if ctx.json {
        return print_json(&summary);
    }
    print_summary(&summary);
    Ok(())
}

fn scrub_inputs(config: &AppConfig, input: &InputArgs) -> Result<ScrubOutcome> {
    let conditions = resolve_conditions(&input.conditions, config)?;
    let processed_on = parse_run_date(input.date.as_deref())?;
    let options = ReadOptions {
        null_markers: config.output.null_markers.clone(),
    };

    let list = read_table(&input.list, &options)
        .with_context(|| format!("read list {}", input.list.display()))?;
    debug!(file = %list.label, rows = list.len(), "list loaded");

    let mut logs = Vec::with_capacity(input.logs.len());
    for path in &input.logs {
        let log = read_table(path, &options)
            .with_context(|| format!("read log {}", path.display()))?;
        debug!(file = %log.label, rows = log.len(), "log loaded");
        logs.push(log);
    }

    let outcome = scrub(&list, &logs, &conditions, &config.scrub, processed_on)
        .with_context(|| "scrub datasets")?;
    for warning in &outcome.warnings {
        warn!("{warning}");
    }
    info!(
        exclusions = outcome.exclusions.len(),
        list_removed = outcome.list.removed.len(),
        "scrub complete"
    );
    Ok(outcome)
}

fn build_target(config: &UploadConfig) -> Result<Box<dyn UploadTarget>> {
    match &config.backend {
        UploadBackend::Directory { root } => Ok(Box::new(DirectoryTarget::new(root.clone()))),
        UploadBackend::WebDav {
            url,
            username,
            password_env,
        } => {
            let password = env::var(password_env).map_err(|_| {
                invalid_input(format!("environment variable {password_env} is not set"))
            })?;
            let target = WebDavTarget::new(url, username.clone(), password)
                .with_context(|| format!("configure webdav target {url}"))?;
            Ok(Box::new(target))
        }
    }
}

fn folders(config: &UploadConfig) -> Folders {
    Folders {
        removed: config.removed_folder.clone(),
        scrubbed: config.scrubbed_folder.clone(),
    }
}

fn write_archive(path: &Path, files: &[ExportFile]) -> Result<()> {
    let bytes = bundle_zip(files).with_context(|| "build zip archive")?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("write archive {}", path.display()))?;
    info!(path = %path.display(), files = files.len(), "archive written");
    Ok(())
}

fn write_dir(dir: &Path, files: &[ExportFile]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;
    for file in files {
        let path = dir.join(&file.name);
        fs::write(&path, &file.data).with_context(|| format!("write {}", path.display()))?;
        debug!(path = %path.display(), rows = file.rows, "output written");
    }
    Ok(())
}

fn print_summary(summary: &ScrubSummaryDto) {
    println!(
        "Processed {} on {}: {} rows, kept {}, removed {}",
        summary.list_label,
        summary.processed_on,
        summary.list_rows,
        summary.list_kept,
        summary.list_removed
    );
    if summary.exclusions.is_empty() {
        println!("No phone numbers met a threshold.");
    } else {
        println!("Excluded numbers: {}", summary.exclusions.len());
        for exclusion in &summary.exclusions {
            println!(
                "- {} ({} count {}, threshold {})",
                exclusion.phone, exclusion.log_type, exclusion.count, exclusion.threshold
            );
        }
    }
    for log in &summary.logs {
        if log.phone_columns.is_empty() {
            println!("{}: no phone columns, passed through", log.label);
        } else {
            println!(
                "{}: {} rows affected, {} cells blanked ({})",
                log.label,
                log.removed_rows,
                log.blanked_cells,
                log.phone_columns.join(", ")
            );
        }
    }
}
