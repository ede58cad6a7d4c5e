use serde::Serialize;

use super::super::domain::{InterviewResult, RecruitmentRecord};

/// Counts over the interview results that are actually recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResultTally {
    pub present: usize,
    pub excellent: usize,
    pub good: usize,
}

impl ResultTally {
    pub fn from_record(record: &RecruitmentRecord) -> Self {
        record
            .present_results()
            .fold(Self::default(), |mut tally, result| {
                tally.present += 1;
                match result {
                    InterviewResult::Excellent => tally.excellent += 1,
                    InterviewResult::Good => tally.good += 1,
                    // Fair and Medium count towards `present` only.
                    InterviewResult::Fair | InterviewResult::Medium => {}
                }
                tally
            })
    }

    /// Strictly more than half of the recorded results. Never true with nothing recorded.
    pub const fn majority(&self, count: usize) -> bool {
        count * 2 > self.present
    }

    /// Every recorded result is Good or Excellent, and there is at least one.
    pub const fn all_good_or_better(&self) -> bool {
        self.present > 0 && self.excellent + self.good == self.present
    }
}
