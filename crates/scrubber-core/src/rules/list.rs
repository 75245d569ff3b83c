use crate::domain::phone::PhonePolicy;
use crate::domain::table::{Cell, Row, Table};
use crate::rules::exclusions::{ExclusionSet, Trigger};
use crate::rules::ListLayout;

pub const REMOVAL_REASON_COLUMN: &str = "Removal_Reason";

#[derive(Debug, Clone, PartialEq)]
pub struct RemovedListRow {
    /// The original record, untouched.
    pub row: Row,
    pub phone: String,
    pub trigger: Trigger,
}

/// Kept and removed list records. Both sides keep source row identities and order.
#[derive(Debug, Clone, PartialEq)]
pub struct ListScrub {
    pub kept: Table,
    pub removed: Vec<RemovedListRow>,
}

impl ListScrub {
    /// Removed records in the list schema plus a `Removal_Reason` column.
    pub fn removed_table(&self) -> Table {
        let mut columns = self.kept.columns.clone();
        columns.push(REMOVAL_REASON_COLUMN.to_string());
        let mut table = Table::new(self.kept.label.clone(), columns);
        table.rows = self
            .removed
            .iter()
            .map(|removed| {
                let mut cells = removed.row.cells.clone();
                cells.push(Cell::Text(removed.trigger.reason()));
                Row {
                    index: removed.row.index,
                    cells,
                }
            })
            .collect();
        table
    }
}

/// Partitions the list: a record whose phone is excluded moves to the removed
/// side as-is; everything else, including records without a usable phone, is kept.
pub fn scrub_list(
    list: &Table,
    layout: ListLayout,
    exclusions: &ExclusionSet,
    policy: &PhonePolicy,
) -> ListScrub {
    let mut kept = list.empty_like();
    let mut removed = Vec::new();

    for row in &list.rows {
        let matched = policy
            .key(row.get(layout.phone))
            .and_then(|phone| exclusions.get(&phone).map(|trigger| (phone, trigger)));
        match matched {
            Some((phone, trigger)) => removed.push(RemovedListRow {
                row: row.clone(),
                phone,
                trigger: trigger.clone(),
            }),
            None => kept.rows.push(row.clone()),
        }
    }

    ListScrub { kept, removed }
}
