use crate::domain::condition::ConditionSet;
use crate::domain::table::Table;
use crate::error::CoreError;
use crate::rules::assemble::{assemble, ScrubOutcome};
use crate::rules::exclusions::build_exclusions;
use crate::rules::list::scrub_list;
use crate::rules::log::scrub_log;
use crate::rules::occurrences::count_occurrences;
use crate::rules::ScrubOptions;
use chrono::NaiveDate;
use rayon::prelude::*;

/// Runs counting, exclusion, and both scrubbers over the given datasets.
///
/// Counting finishes before exclusions are built, and exclusions are complete
/// before any scrubber starts. The list and each log dataset are then scrubbed
/// independently against the shared read-only exclusion set.
pub fn scrub(
    list: &Table,
    logs: &[Table],
    conditions: &ConditionSet,
    options: &ScrubOptions,
    processed_on: NaiveDate,
) -> Result<ScrubOutcome, CoreError> {
    let layout = options.list_columns.resolve(list)?;
    let occurrences = count_occurrences(list, layout, &options.phone);
    let exclusions = build_exclusions(&occurrences, conditions);

    let (list_scrub, log_scrubs) = rayon::join(
        || scrub_list(list, layout, &exclusions, &options.phone),
        || {
            logs.par_iter()
                .map(|log| scrub_log(log, &exclusions, options, processed_on))
                .collect::<Vec<_>>()
        },
    );

    Ok(assemble(processed_on, exclusions, list_scrub, log_scrubs))
}
