use crate::domain::columns::{classify_phone_columns, PhoneColumn, PhoneColumns};
use crate::domain::table::{Cell, Row, Table};
use crate::rules::exclusions::{ExclusionSet, Trigger};
use crate::rules::list::REMOVAL_REASON_COLUMN;
use crate::rules::ScrubOptions;
use chrono::NaiveDate;

pub const REMOVAL_DATE_COLUMN: &str = "Removal_Date";

const REASON_SEPARATOR: &str = " | ";

/// One phone cell that matched the exclusion set.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMatch {
    pub column: PhoneColumn,
    /// The cell as it appeared in the source, before normalization.
    pub value: Cell,
    pub phone: String,
    pub trigger: Trigger,
}

impl ColumnMatch {
    fn clause(&self) -> String {
        format!("{}: {}", self.column.name, self.trigger.reason())
    }
}

/// Audit copy of a triggered log record: every phone cell is blank except the
/// ones that matched, which keep their original value.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedLogRow {
    pub row: Row,
    pub matches: Vec<ColumnMatch>,
    pub removed_on: NaiveDate,
}

impl RemovedLogRow {
    pub fn reason(&self) -> String {
        self.matches
            .iter()
            .map(ColumnMatch::clause)
            .collect::<Vec<_>>()
            .join(REASON_SEPARATOR)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogScrub {
    pub phone_columns: PhoneColumns,
    /// Every source record, with matched cells blanked.
    pub scrubbed: Table,
    /// Only the triggered records.
    pub removed: Vec<RemovedLogRow>,
}

impl LogScrub {
    pub fn label(&self) -> &str {
        &self.scrubbed.label
    }

    pub fn blanked_cells(&self) -> usize {
        self.removed.iter().map(|removed| removed.matches.len()).sum()
    }

    /// Removed records in the log schema plus `Removal_Reason` and `Removal_Date`.
    pub fn removed_table(&self, date_format: &str) -> Table {
        let mut columns = self.scrubbed.columns.clone();
        columns.push(REMOVAL_REASON_COLUMN.to_string());
        columns.push(REMOVAL_DATE_COLUMN.to_string());
        let mut table = Table::new(self.scrubbed.label.clone(), columns);
        table.rows = self
            .removed
            .iter()
            .map(|removed| {
                let mut cells = removed.row.cells.clone();
                cells.push(Cell::Text(removed.reason()));
                cells.push(Cell::Text(
                    removed.removed_on.format(date_format).to_string(),
                ));
                Row {
                    index: removed.row.index,
                    cells,
                }
            })
            .collect();
        table
    }
}

/// Blanks excluded phones in one log dataset and collects audit copies of the
/// affected records. A dataset without phone columns passes through untouched.
pub fn scrub_log(
    log: &Table,
    exclusions: &ExclusionSet,
    options: &ScrubOptions,
    processed_on: NaiveDate,
) -> LogScrub {
    let phone_columns = classify_phone_columns(&log.columns, &options.phone_keywords);
    if !phone_columns.is_found() {
        return LogScrub {
            phone_columns,
            scrubbed: log.clone(),
            removed: Vec::new(),
        };
    }

    let mut scrubbed = log.empty_like();
    let mut removed = Vec::new();

    for row in &log.rows {
        let matches: Vec<ColumnMatch> = phone_columns
            .as_slice()
            .iter()
            .filter_map(|column| {
                let value = row.get(column.index);
                let phone = options.phone.key(value)?;
                let trigger = exclusions.get(&phone)?;
                Some(ColumnMatch {
                    column: column.clone(),
                    value: value.clone(),
                    phone,
                    trigger: trigger.clone(),
                })
            })
            .collect();

        if matches.is_empty() {
            scrubbed.rows.push(row.clone());
            continue;
        }

        let mut kept = row.clone();
        for matched in &matches {
            kept.blank(matched.column.index);
        }
        scrubbed.rows.push(kept);

        let mut audit = row.clone();
        for column in phone_columns.as_slice() {
            audit.blank(column.index);
        }
        for matched in &matches {
            audit.set(matched.column.index, matched.value.clone());
        }
        removed.push(RemovedLogRow {
            row: audit,
            matches,
            removed_on: processed_on,
        });
    }

    LogScrub {
        phone_columns,
        scrubbed,
        removed,
    }
}

#[cfg(test)]
mod tests {
    use super::{scrub_log, REMOVAL_DATE_COLUMN};
    use crate::domain::columns::PhoneColumns;
    use crate::domain::condition::{Condition, ConditionSet};
    use crate::domain::table::{Cell, Table};
    use crate::rules::exclusions::{build_exclusions, ExclusionSet};
    use crate::rules::occurrences::count_occurrences;
    use crate::rules::{ListColumns, ScrubOptions};
    use chrono::NaiveDate;

    fn exclusions(phone: &str, times: usize) -> ExclusionSet {
        let list = Table::from_rows(
            "list.csv",
            vec!["LogType".to_string(), "Phone".to_string()],
            (0..times).map(|_| vec![Cell::text("Voicemail"), Cell::text(phone)]),
        )
        .unwrap();
        let options = ScrubOptions::default();
        let layout = ListColumns::default().resolve(&list).unwrap();
        let occurrences = count_occurrences(&list, layout, &options.phone);
        let conditions =
            ConditionSet::new(vec![Condition::new("Voicemail", times as u32).unwrap()]).unwrap();
        build_exclusions(&occurrences, &conditions)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn log(rows: &[[&str; 3]]) -> Table {
        Table::from_rows(
            "calls.csv",
            vec![
                "Agent".to_string(),
                "Phone".to_string(),
                "Alt Mobile".to_string(),
            ],
            rows.iter().map(|row| row.map(Cell::text)),
        )
        .unwrap()
    }

    #[test]
    fn blanks_only_matching_cell() {
        let log = log(&[
            ["amy", "+1 (555) 111-2222", "555-999-0000"],
            ["bob", "5553334444", ""],
        ]);
        let result = scrub_log(&log, &exclusions("5551112222", 3), &ScrubOptions::default(), date());

        assert_eq!(result.scrubbed.len(), 2);
        assert_eq!(result.scrubbed.rows[0].cells[1], Cell::Empty);
        assert_eq!(result.scrubbed.rows[0].cells[2], Cell::text("555-999-0000"));
        assert_eq!(result.scrubbed.rows[1], log.rows[1]);

        assert_eq!(result.removed.len(), 1);
        let audit = &result.removed[0];
        assert_eq!(audit.row.index, 0);
        assert_eq!(audit.row.cells[0], Cell::text("amy"));
        assert_eq!(audit.row.cells[1], Cell::text("+1 (555) 111-2222"));
        assert_eq!(audit.row.cells[2], Cell::Empty);
        assert_eq!(audit.reason(), "Phone: Removed due to Voicemail count: 3");
    }

    #[test]
    fn joins_reasons_for_multiple_matching_columns() {
        let log = log(&[["amy", "5551112222", "1-555-111-2222"]]);
        let result = scrub_log(&log, &exclusions("5551112222", 2), &ScrubOptions::default(), date());

        assert_eq!(result.scrubbed.rows[0].cells[1], Cell::Empty);
        assert_eq!(result.scrubbed.rows[0].cells[2], Cell::Empty);
        let audit = &result.removed[0];
        assert_eq!(audit.row.cells[2], Cell::text("1-555-111-2222"));
        assert_eq!(
            audit.reason(),
            "Phone: Removed due to Voicemail count: 2 | Alt Mobile: Removed due to Voicemail count: 2"
        );
        assert_eq!(result.blanked_cells(), 2);
    }

    #[test]
    fn passes_through_without_phone_columns() {
        let log = Table::from_rows(
            "notes.csv",
            vec!["Agent".to_string(), "Outcome".to_string()],
            [[Cell::text("amy"), Cell::text("5551112222")]],
        )
        .unwrap();
        let result = scrub_log(&log, &exclusions("5551112222", 1), &ScrubOptions::default(), date());
        assert_eq!(result.phone_columns, PhoneColumns::NoneFound);
        assert_eq!(result.scrubbed, log);
        assert!(result.removed.is_empty());
    }

    #[test]
    fn removed_table_appends_reason_and_date() {
        let log = log(&[["amy", "5551112222", ""]]);
        let result = scrub_log(&log, &exclusions("5551112222", 1), &ScrubOptions::default(), date());
        let table = result.removed_table("%Y-%m-%d");
        assert_eq!(table.columns.len(), 5);
        assert_eq!(table.columns[4], REMOVAL_DATE_COLUMN);
        assert_eq!(table.rows[0].cells[4], Cell::text("2026-10-15"));
    }
}
