use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use scrubber_core::domain::classify_phone_columns;
use scrubber_io::table::{read_table, ReadOptions};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// CSV files to inspect
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ColumnsReport {
    file: String,
    phone_columns: Vec<String>,
}

pub fn detect_columns(ctx: &Context<'_>, args: ColumnsArgs) -> Result<()> {
    let options = ReadOptions {
        null_markers: ctx.config.output.null_markers.clone(),
    };
    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let table = read_table(path, &options)
            .with_context(|| format!("read {}", path.display()))?;
        let found = classify_phone_columns(&table.columns, &ctx.config.scrub.phone_keywords);
        reports.push(ColumnsReport {
            file: table.label,
            phone_columns: found
                .as_slice()
                .iter()
                .map(|column| column.name.clone())
                .collect(),
        });
    }

    if ctx.json {
        return print_json(&reports);
    }

    for report in reports {
        if report.phone_columns.is_empty() {
            println!("{}: no phone columns found", report.file);
        } else {
            println!("{}: {}", report.file, report.phone_columns.join(", "));
        }
    }
    Ok(())
}
