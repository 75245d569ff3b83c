use crate::domain::condition::LogType;
use crate::domain::phone::PhonePolicy;
use crate::domain::table::Table;
use crate::rules::ListLayout;
use std::collections::BTreeMap;

/// Counts per (log type, normalized phone), built from the list dataset only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceTable {
    counts: BTreeMap<(LogType, String), usize>,
}

impl OccurrenceTable {
    pub fn get(&self, log_type: &LogType, phone: &str) -> usize {
        self.counts
            .get(&(log_type.clone(), phone.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LogType, &str, usize)> {
        self.counts
            .iter()
            .map(|((log_type, phone), count)| (log_type, phone.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn record(&mut self, log_type: LogType, phone: String) {
        *self.counts.entry((log_type, phone)).or_insert(0) += 1;
    }
}

/// Tallies every list row independently; duplicate rows are the signal the
/// thresholds look for. Rows without a valid phone or a log type are skipped.
pub fn count_occurrences(list: &Table, layout: ListLayout, policy: &PhonePolicy) -> OccurrenceTable {
    let mut table = OccurrenceTable::default();
    for row in &list.rows {
        let Some(phone) = policy.key(row.get(layout.phone)) else {
            continue;
        };
        let Ok(log_type) = LogType::new(&row.get(layout.log_type).to_string()) else {
            continue;
        };
        table.record(log_type, phone);
    }
    table
}
