pub mod assemble;
pub mod exclusions;
pub mod list;
pub mod log;
pub mod occurrences;
pub mod pipeline;

pub use assemble::{assemble, ScrubOutcome};
pub use exclusions::{build_exclusions, ExclusionSet, Trigger};
pub use list::{scrub_list, ListScrub, RemovedListRow, REMOVAL_REASON_COLUMN};
pub use log::{scrub_log, ColumnMatch, LogScrub, RemovedLogRow, REMOVAL_DATE_COLUMN};
pub use occurrences::{count_occurrences, OccurrenceTable};
pub use pipeline::scrub;

use crate::domain::columns::default_phone_keywords;
use crate::domain::phone::PhonePolicy;
use crate::domain::table::Table;
use crate::error::CoreError;

pub const DEFAULT_LOG_TYPE_COLUMN: &str = "LogType";
pub const DEFAULT_PHONE_COLUMN: &str = "Phone";
pub const DEFAULT_REMOVAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Engine settings. Everything the scrubbing rules consult lives here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubOptions {
    pub phone: PhonePolicy,
    pub phone_keywords: Vec<String>,
    pub list_columns: ListColumns,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        Self {
            phone: PhonePolicy::default(),
            phone_keywords: default_phone_keywords(),
            list_columns: ListColumns::default(),
        }
    }
}

/// Header names of the identity fields every list dataset must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListColumns {
    pub log_type: String,
    pub phone: String,
}

impl Default for ListColumns {
    fn default() -> Self {
        Self {
            log_type: DEFAULT_LOG_TYPE_COLUMN.to_string(),
            phone: DEFAULT_PHONE_COLUMN.to_string(),
        }
    }
}

impl ListColumns {
    pub fn resolve(&self, list: &Table) -> Result<ListLayout, CoreError> {
        Ok(ListLayout {
            log_type: list.require_column(&self.log_type)?,
            phone: list.require_column(&self.phone)?,
        })
    }
}

/// Column positions of the identity fields within one list dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLayout {
    pub log_type: usize,
    pub phone: usize,
}
