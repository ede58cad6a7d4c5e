use super::common::*;
use crate::workflows::pipeline::domain::{FieldChange, InterviewResult::*, Stage};
use crate::workflows::pipeline::stage::{derive_stage, ResultTally};

#[test]
fn empty_record_starts_at_application() {
    assert_eq!(derive_stage(&record()), Stage::Application);
}

#[test]
fn start_date_outranks_fair_second_interview() {
    let mut record = record_with_results(None, Some(Fair));
    record.start_date = Some(date("2025-05-01"));

    assert_eq!(derive_stage(&record), Stage::Hired);
}

#[test]
fn fair_second_interview_selects_regardless_of_first() {
    assert_eq!(
        derive_stage(&record_with_results(Some(Fair), Some(Fair))),
        Stage::Selected
    );
    assert_eq!(
        derive_stage(&record_with_results(Some(Good), Some(Fair))),
        Stage::Selected
    );
    assert_eq!(
        derive_stage(&record_with_results(None, Some(Fair))),
        Stage::Selected
    );
}

#[test]
fn fair_first_interview_alone_does_not_select() {
    assert_eq!(
        derive_stage(&record_with_results(Some(Fair), None)),
        Stage::Application
    );
}

#[test]
fn excellent_and_good_is_approved_not_hired() {
    assert_eq!(
        derive_stage(&record_with_results(Some(Excellent), Some(Good))),
        Stage::Approved
    );
}

#[test]
fn excellent_majority_hires() {
    assert_eq!(
        derive_stage(&record_with_results(Some(Excellent), Some(Excellent))),
        Stage::Hired
    );
    // One of one recorded result is a strict majority.
    assert_eq!(
        derive_stage(&record_with_results(Some(Excellent), None)),
        Stage::Hired
    );
}

#[test]
fn split_excellent_falls_through_to_fair_override() {
    // 1 of 2 Excellent is not a majority, so the Fair override applies.
    assert_eq!(
        derive_stage(&record_with_results(Some(Excellent), Some(Fair))),
        Stage::Selected
    );
}

#[test]
fn good_results_approve() {
    assert_eq!(
        derive_stage(&record_with_results(Some(Good), Some(Good))),
        Stage::Approved
    );
    assert_eq!(
        derive_stage(&record_with_results(None, Some(Good))),
        Stage::Approved
    );
}

#[test]
fn medium_blocks_the_all_good_branch() {
    let mut record = record_with_results(Some(Good), Some(Medium));
    record.interview1_date = Some(date("2025-03-10"));

    // One Good of two is not a majority and Medium is not "at least Good".
    assert_eq!(derive_stage(&record), Stage::Interview1);
    assert_eq!(
        derive_stage(&record_with_results(Some(Excellent), Some(Medium))),
        Stage::Application
    );
}

#[test]
fn falls_back_to_latest_milestone() {
    let mut record = record();
    record.application_date = Some(date("2025-03-03"));
    assert_eq!(derive_stage(&record), Stage::Application);

    record.interview1_date = Some(date("2025-03-10"));
    assert_eq!(derive_stage(&record), Stage::Interview1);

    record.challenge_sent_date = Some(date("2025-03-12"));
    assert_eq!(derive_stage(&record), Stage::Interview1);

    record.challenge_done_date = Some(date("2025-03-17"));
    assert_eq!(derive_stage(&record), Stage::Challenge);

    record.interview2_date = Some(date("2025-03-24"));
    assert_eq!(derive_stage(&record), Stage::Interview2);
}

#[test]
fn challenge_stage_survives_clearing_interview_one() {
    let mut record = record();
    record.apply(date_change("interview1Date", "2025-03-10"));
    assert_eq!(derive_stage(&record), Stage::Interview1);

    record.apply(date_change("challengeDoneDate", "2025-03-17"));
    assert_eq!(derive_stage(&record), Stage::Challenge);

    record.apply(FieldChange::parse("interview1Date", "").expect("clear parses"));
    assert_eq!(derive_stage(&record), Stage::Challenge);
}

#[test]
fn derivation_is_idempotent() {
    let mut record = progressed_record();
    record.interview1_result = Some(Good);
    record.interview2_result = Some(Medium);

    let first = derive_stage(&record);
    let second = derive_stage(&record);
    assert_eq!(first, second);
    assert_eq!(first, Stage::Interview2);
}

#[test]
fn tally_counts_only_recorded_results() {
    let tally = ResultTally::from_record(&record_with_results(Some(Excellent), Some(Medium)));
    assert_eq!(
        tally,
        ResultTally {
            present: 2,
            excellent: 1,
            good: 0,
        }
    );
    assert!(!tally.majority(tally.excellent));
    assert!(!tally.all_good_or_better());

    let empty = ResultTally::from_record(&record());
    assert!(!empty.majority(0));
    assert!(!empty.all_good_or_better());
}
