mod rules;
mod tally;

pub use tally::ResultTally;

use super::domain::{RecruitmentRecord, Stage};

/// Derive the pipeline stage of a record.
///
/// Result-driven rules are evaluated first in precedence order; when none match the stage
/// falls back to the latest milestone reached. Nothing is cached, so the answer always
/// reflects the current columns.
pub fn derive_stage(record: &RecruitmentRecord) -> Stage {
    let tally = ResultTally::from_record(record);

    rules::PRECEDENCE
        .iter()
        .find(|rule| (rule.applies)(record, &tally))
        .map(|rule| rule.stage)
        .unwrap_or_else(|| rules::chronological_stage(record))
}
