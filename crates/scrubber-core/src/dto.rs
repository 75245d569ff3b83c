use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionDto {
    pub phone: String,
    pub log_type: String,
    pub count: usize,
    pub threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSummaryDto {
    pub label: String,
    pub rows: usize,
    pub phone_columns: Vec<String>,
    pub removed_rows: usize,
    pub blanked_cells: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubSummaryDto {
    pub processed_on: NaiveDate,
    pub list_label: String,
    pub list_rows: usize,
    pub list_kept: usize,
    pub list_removed: usize,
    pub exclusions: Vec<ExclusionDto>,
    pub logs: Vec<LogSummaryDto>,
    pub warnings: Vec<String>,
}
