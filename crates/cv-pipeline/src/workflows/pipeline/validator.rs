use chrono::NaiveDate;

use super::domain::{DateField, FieldChange, RecruitmentRecord};

/// Decide whether setting `field` to `proposed` keeps the milestone dates chronological.
///
/// Clearing a field is always allowed. Otherwise the milestones of the edited record are
/// filtered down to the ones that are set and every adjacent pair must be non-decreasing.
/// Unset milestones are skipped rather than breaking the chain.
pub fn validate_date_order(
    record: &RecruitmentRecord,
    field: DateField,
    proposed: Option<NaiveDate>,
) -> bool {
    if proposed.is_none() {
        return true;
    }

    let candidate = record.with_change(FieldChange::Date {
        field,
        value: proposed,
    });
    is_chronological(&candidate)
}

/// Same check as [`validate_date_order`] for any kind of change; result edits always pass.
pub fn validate_change(record: &RecruitmentRecord, change: &FieldChange) -> bool {
    match *change {
        FieldChange::Date { field, value } => validate_date_order(record, field, value),
        FieldChange::Result { .. } => true,
    }
}

/// True when the present milestones of `record` are in non-decreasing order.
pub fn is_chronological(record: &RecruitmentRecord) -> bool {
    let present: Vec<NaiveDate> = record.milestones().into_iter().flatten().collect();
    present.windows(2).all(|pair| pair[0] <= pair[1])
}
