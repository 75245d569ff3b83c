use crate::error::Result;
use crate::table::write_table;
use crate::upload::Destination;
use scrubber_core::domain::Table;
use scrubber_core::rules::ScrubOutcome;
use std::collections::HashSet;

const CSV_SUFFIX: &str = ".csv";

/// One serialized table ready to be written, archived, or uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub destination: Destination,
    pub rows: usize,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Stamp appended to every file name, usually the run date.
    pub stamp: String,
    pub removal_date_format: String,
}

/// Lays the outcome out as files: the updated list, the removed list records,
/// and a scrubbed plus removed file per log. Removed files are only produced
/// when something was removed.
pub fn export_files(outcome: &ScrubOutcome, options: &ExportOptions) -> Result<Vec<ExportFile>> {
    let mut names = UniqueNames::default();
    let mut files = Vec::new();
    let stamp = &options.stamp;

    files.push(export_file(
        names.claim(format!("Updated_List_File_{stamp}")),
        Destination::Removed,
        &outcome.list.kept,
    )?);

    if !outcome.list.removed.is_empty() {
        files.push(export_file(
            names.claim(format!("Removed_List_{stamp}")),
            Destination::Removed,
            &outcome.list_removed_table(),
        )?);
    }

    for (scrubbed, removed) in outcome.log_tables(&options.removal_date_format) {
        let base = base_name(&scrubbed.label);
        files.push(export_file(
            names.claim(format!("Scrubbed_{base}_{stamp}")),
            Destination::Scrubbed,
            scrubbed,
        )?);
        if !removed.is_empty() {
            files.push(export_file(
                names.claim(format!("Removed_Records_{base}_{stamp}")),
                Destination::Removed,
                &removed,
            )?);
        }
    }

    Ok(files)
}

fn export_file(name: String, destination: Destination, table: &Table) -> Result<ExportFile> {
    Ok(ExportFile {
        name,
        destination,
        rows: table.len(),
        data: write_table(table)?,
    })
}

/// File stem of a dataset label: `calls.csv` becomes `calls`.
pub fn base_name(label: &str) -> &str {
    let len = label.len();
    if len > CSV_SUFFIX.len()
        && label.is_char_boundary(len - CSV_SUFFIX.len())
        && label[len - CSV_SUFFIX.len()..].eq_ignore_ascii_case(CSV_SUFFIX)
    {
        &label[..len - CSV_SUFFIX.len()]
    } else {
        label
    }
}

pub fn with_csv_suffix(name: &str) -> String {
    if base_name(name).len() != name.len() {
        name.to_string()
    } else {
        format!("{name}{CSV_SUFFIX}")
    }
}

#[derive(Debug, Default)]
struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    fn claim(&mut self, stem: String) -> String {
        let mut candidate = with_csv_suffix(&stem);
        let mut n = 2;
        while !self.taken.insert(candidate.to_ascii_lowercase()) {
            candidate = format!("{stem}_{n}{CSV_SUFFIX}");
            n += 1;
        }
        candidate
    }
}
