use crate::domain::table::Table;
use crate::dto::{ExclusionDto, LogSummaryDto, ScrubSummaryDto};
use crate::rules::exclusions::ExclusionSet;
use crate::rules::list::ListScrub;
use crate::rules::log::LogScrub;
use chrono::NaiveDate;

/// Everything one scrubbing run produced, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrubOutcome {
    pub processed_on: NaiveDate,
    pub exclusions: ExclusionSet,
    pub list: ListScrub,
    pub logs: Vec<LogScrub>,
    pub warnings: Vec<String>,
}

pub fn assemble(
    processed_on: NaiveDate,
    exclusions: ExclusionSet,
    list: ListScrub,
    logs: Vec<LogScrub>,
) -> ScrubOutcome {
    let warnings = logs
        .iter()
        .filter(|log| !log.phone_columns.is_found())
        .map(|log| format!("No phone columns found in {}", log.label()))
        .collect();

    ScrubOutcome {
        processed_on,
        exclusions,
        list,
        logs,
        warnings,
    }
}

impl ScrubOutcome {
    pub fn list_removed_table(&self) -> Table {
        self.list.removed_table()
    }

    /// `(scrubbed, removed)` table pairs aligned with the input log order.
    pub fn log_tables(&self, date_format: &str) -> Vec<(&Table, Table)> {
        self.logs
            .iter()
            .map(|log| (&log.scrubbed, log.removed_table(date_format)))
            .collect()
    }

    pub fn summary(&self) -> ScrubSummaryDto {
        let list_kept = self.list.kept.len();
        let list_removed = self.list.removed.len();
        ScrubSummaryDto {
            processed_on: self.processed_on,
            list_label: self.list.kept.label.clone(),
            list_rows: list_kept + list_removed,
            list_kept,
            list_removed,
            exclusions: self
                .exclusions
                .iter()
                .map(|(phone, trigger)| ExclusionDto {
                    phone: phone.clone(),
                    log_type: trigger.log_type.to_string(),
                    count: trigger.count,
                    threshold: trigger.threshold,
                })
                .collect(),
            logs: self
                .logs
                .iter()
                .map(|log| LogSummaryDto {
                    label: log.label().to_string(),
                    rows: log.scrubbed.len(),
                    phone_columns: log
                        .phone_columns
                        .as_slice()
                        .iter()
                        .map(|column| column.name.clone())
                        .collect(),
                    removed_rows: log.removed.len(),
                    blanked_cells: log.blanked_cells(),
                })
                .collect(),
            warnings: self.warnings.clone(),
        }
    }
}
