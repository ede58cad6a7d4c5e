use super::super::domain::{InterviewResult, RecruitmentRecord, Stage};
use super::tally::ResultTally;

pub(crate) struct StageRule {
    pub stage: Stage,
    pub applies: fn(&RecruitmentRecord, &ResultTally) -> bool,
}

/// First match wins. Order is part of the contract: a start date outranks a Fair second
/// interview, which outranks the Good-majority approval.
pub(crate) const PRECEDENCE: [StageRule; 3] = [
    StageRule {
        stage: Stage::Hired,
        applies: hired,
    },
    StageRule {
        stage: Stage::Selected,
        applies: selected,
    },
    StageRule {
        stage: Stage::Approved,
        applies: approved,
    },
];

fn hired(record: &RecruitmentRecord, tally: &ResultTally) -> bool {
    record.start_date.is_some() || tally.majority(tally.excellent)
}

fn selected(record: &RecruitmentRecord, _tally: &ResultTally) -> bool {
    record.interview2_result == Some(InterviewResult::Fair)
}

fn approved(_record: &RecruitmentRecord, tally: &ResultTally) -> bool {
    tally.majority(tally.good) || tally.all_good_or_better()
}

/// Latest milestone reached, checked from the end of the pipeline backwards.
pub(crate) fn chronological_stage(record: &RecruitmentRecord) -> Stage {
    if record.interview2_date.is_some() {
        Stage::Interview2
    } else if record.challenge_done_date.is_some() {
        Stage::Challenge
    } else if record.interview1_date.is_some() {
        Stage::Interview1
    } else {
        Stage::Application
    }
}
