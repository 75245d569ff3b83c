use crate::domain::condition::{ConditionSet, LogType};
use crate::rules::occurrences::OccurrenceTable;
use serde::Serialize;
use std::collections::btree_map::{self, BTreeMap};

/// Which condition excluded a phone and the count that crossed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trigger {
    pub log_type: LogType,
    pub count: usize,
    pub threshold: u32,
}

impl Trigger {
    pub fn reason(&self) -> String {
        format!("Removed due to {} count: {}", self.log_type, self.count)
    }
}

/// Normalized phones to remove everywhere, each with one provenance record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    entries: BTreeMap<String, Trigger>,
}

impl ExclusionSet {
    pub fn get(&self, phone: &str) -> Option<&Trigger> {
        self.entries.get(phone)
    }

    pub fn contains(&self, phone: &str) -> bool {
        self.entries.contains_key(phone)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending phone order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Trigger> {
        self.entries.iter()
    }
}

/// Applies every condition to the occurrence table. When a phone qualifies
/// under several conditions, the first condition in input order is credited.
pub fn build_exclusions(occurrences: &OccurrenceTable, conditions: &ConditionSet) -> ExclusionSet {
    let mut entries = BTreeMap::new();
    for condition in conditions {
        for (log_type, phone, count) in occurrences.iter() {
            if log_type != &condition.log_type || count < condition.threshold as usize {
                continue;
            }
            entries.entry(phone.to_string()).or_insert_with(|| Trigger {
                log_type: log_type.clone(),
                count,
                threshold: condition.threshold,
            });
        }
    }
    ExclusionSet { entries }
}

#[cfg(test)]
mod tests {
    use super::build_exclusions;
    use crate::domain::condition::{Condition, ConditionSet};
    use crate::domain::phone::PhonePolicy;
    use crate::domain::table::{Cell, Table};
    use crate::rules::occurrences::{count_occurrences, OccurrenceTable};
    use crate::rules::ListColumns;

    fn occurrences(rows: &[(&str, &str)]) -> OccurrenceTable {
        let list = Table::from_rows(
            "list.csv",
            vec!["LogType".to_string(), "Phone".to_string()],
            rows.iter()
                .map(|(log_type, phone)| vec![Cell::text(*log_type), Cell::text(*phone)]),
        )
        .unwrap();
        let layout = ListColumns::default().resolve(&list).unwrap();
        count_occurrences(&list, layout, &PhonePolicy::default())
    }

    fn conditions(items: &[(&str, u32)]) -> ConditionSet {
        ConditionSet::new(
            items
                .iter()
                .map(|(log_type, threshold)| Condition::new(log_type, *threshold).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn threshold_is_inclusive() {
        let table = occurrences(&[
            ("Call", "5551112222"),
            ("Call", "5551112222"),
            ("Call", "5553334444"),
        ]);
        let set = build_exclusions(&table, &conditions(&[("call", 2)]));
        assert_eq!(set.len(), 1);
        let trigger = set.get("5551112222").unwrap();
        assert_eq!(trigger.count, 2);
        assert_eq!(trigger.threshold, 2);
        assert_eq!(trigger.reason(), "Removed due to Call count: 2");
    }

    #[test]
    fn first_condition_in_order_wins() {
        let table = occurrences(&[
            ("Call", "5551112222"),
            ("Voicemail", "5551112222"),
            ("Voicemail", "5551112222"),
        ]);
        let set = build_exclusions(&table, &conditions(&[("Voicemail", 2), ("Call", 1)]));
        assert_eq!(set.get("5551112222").unwrap().log_type.as_str(), "Voicemail");

        let set = build_exclusions(&table, &conditions(&[("Call", 1), ("Voicemail", 2)]));
        let trigger = set.get("5551112222").unwrap();
        assert_eq!(trigger.log_type.as_str(), "Call");
        assert_eq!(trigger.count, 1);
    }

    #[test]
    fn absent_log_type_matches_nothing() {
        let table = occurrences(&[("Call", "5551112222")]);
        let set = build_exclusions(&table, &conditions(&[("Text", 1)]));
        assert!(set.is_empty());
    }
}
