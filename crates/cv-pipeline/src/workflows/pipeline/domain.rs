use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper linking a pipeline row to a parsed candidate profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome recorded by an interviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewResult {
    Excellent,
    Good,
    Fair,
    Medium,
}

impl InterviewResult {
    pub const fn token(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Medium => "Medium",
        }
    }
}

impl FromStr for InterviewResult {
    type Err = FieldParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Excellent" => Ok(Self::Excellent),
            "Good" => Ok(Self::Good),
            "Fair" => Ok(Self::Fair),
            "Medium" => Ok(Self::Medium),
            other => Err(FieldParseError::InvalidResult(other.to_string())),
        }
    }
}

/// Date columns tracked per candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateField {
    #[serde(rename = "applicationDate")]
    Application,
    #[serde(rename = "interview1Date")]
    Interview1,
    #[serde(rename = "challengeSentDate")]
    ChallengeSent,
    #[serde(rename = "challengeDoneDate")]
    ChallengeDone,
    #[serde(rename = "interview2Date")]
    Interview2,
    #[serde(rename = "startDate")]
    Start,
}

impl DateField {
    /// The five milestones that must stay chronological, in pipeline order.
    /// `ChallengeDone` is tracked but takes no part in ordering.
    pub const MILESTONES: [Self; 5] = [
        Self::Application,
        Self::Interview1,
        Self::ChallengeSent,
        Self::Interview2,
        Self::Start,
    ];

    pub const fn ordered() -> [Self; 6] {
        [
            Self::Application,
            Self::Interview1,
            Self::ChallengeSent,
            Self::ChallengeDone,
            Self::Interview2,
            Self::Start,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Application => "applicationDate",
            Self::Interview1 => "interview1Date",
            Self::ChallengeSent => "challengeSentDate",
            Self::ChallengeDone => "challengeDoneDate",
            Self::Interview2 => "interview2Date",
            Self::Start => "startDate",
        }
    }
}

/// Result columns tracked per candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultField {
    #[serde(rename = "interview1Result")]
    Interview1,
    #[serde(rename = "interview2Result")]
    Interview2,
}

impl ResultField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Interview1 => "interview1Result",
            Self::Interview2 => "interview2Result",
        }
    }
}

/// Any editable column of a recruitment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineField {
    Date(DateField),
    Result(ResultField),
}

impl PipelineField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Date(field) => field.key(),
            Self::Result(field) => field.key(),
        }
    }
}

impl fmt::Display for PipelineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PipelineField {
    type Err = FieldParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim();
        if let Some(field) = DateField::ordered()
            .into_iter()
            .find(|field| field.key() == key)
        {
            return Ok(Self::Date(field));
        }

        match key {
            "interview1Result" => Ok(Self::Result(ResultField::Interview1)),
            "interview2Result" => Ok(Self::Result(ResultField::Interview2)),
            other => Err(FieldParseError::UnknownField(other.to_string())),
        }
    }
}

/// A single typed edit to one column. `None` clears the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange {
    Date {
        field: DateField,
        value: Option<NaiveDate>,
    },
    Result {
        field: ResultField,
        value: Option<InterviewResult>,
    },
}

impl FieldChange {
    /// Parse the `(field, value)` pair emitted by the UI. An empty value clears the field.
    pub fn parse(field: &str, value: &str) -> Result<Self, FieldParseError> {
        let field: PipelineField = field.parse()?;
        let value = value.trim();

        match field {
            PipelineField::Date(field) => Ok(Self::Date {
                field,
                value: parse_blank_date(value)?,
            }),
            PipelineField::Result(field) => Ok(Self::Result {
                field,
                value: if value.is_empty() {
                    None
                } else {
                    Some(value.parse()?)
                },
            }),
        }
    }

    pub const fn field(&self) -> PipelineField {
        match self {
            Self::Date { field, .. } => PipelineField::Date(*field),
            Self::Result { field, .. } => PipelineField::Result(*field),
        }
    }

    pub const fn is_clear(&self) -> bool {
        match self {
            Self::Date { value, .. } => value.is_none(),
            Self::Result { value, .. } => value.is_none(),
        }
    }
}

/// Malformed field names or values coming from the edit surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldParseError {
    #[error("unknown pipeline field '{0}'")]
    UnknownField(String),
    #[error("'{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("'{0}' is not one of Excellent, Good, Fair, Medium")]
    InvalidResult(String),
}

pub(crate) fn parse_blank_date(raw: &str) -> Result<Option<NaiveDate>, FieldParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FieldParseError::InvalidDate(raw.to_string()))
}

/// Per-candidate recruitment row. Stored columns only; the stage is always derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitmentRecord {
    pub candidate_id: CandidateId,
    #[serde(default, with = "blank_date")]
    pub application_date: Option<NaiveDate>,
    #[serde(default, with = "blank_date")]
    pub interview1_date: Option<NaiveDate>,
    #[serde(default, with = "blank_date")]
    pub challenge_sent_date: Option<NaiveDate>,
    #[serde(default, with = "blank_date")]
    pub challenge_done_date: Option<NaiveDate>,
    #[serde(default, with = "blank_date")]
    pub interview2_date: Option<NaiveDate>,
    #[serde(default, with = "blank_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "blank_result")]
    pub interview1_result: Option<InterviewResult>,
    #[serde(default, with = "blank_result")]
    pub interview2_result: Option<InterviewResult>,
}

impl RecruitmentRecord {
    /// Fresh row for a candidate entering the pipeline.
    pub fn new(candidate_id: CandidateId) -> Self {
        Self {
            candidate_id,
            application_date: None,
            interview1_date: None,
            challenge_sent_date: None,
            challenge_done_date: None,
            interview2_date: None,
            start_date: None,
            interview1_result: None,
            interview2_result: None,
        }
    }

    pub fn date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::Application => self.application_date,
            DateField::Interview1 => self.interview1_date,
            DateField::ChallengeSent => self.challenge_sent_date,
            DateField::ChallengeDone => self.challenge_done_date,
            DateField::Interview2 => self.interview2_date,
            DateField::Start => self.start_date,
        }
    }

    pub fn result(&self, field: ResultField) -> Option<InterviewResult> {
        match field {
            ResultField::Interview1 => self.interview1_result,
            ResultField::Interview2 => self.interview2_result,
        }
    }

    /// Milestone dates in pipeline order, unset entries included.
    pub fn milestones(&self) -> [Option<NaiveDate>; 5] {
        DateField::MILESTONES.map(|field| self.date(field))
    }

    /// Recorded interview results in interview order, unset entries skipped.
    pub fn present_results(&self) -> impl Iterator<Item = InterviewResult> {
        [self.interview1_result, self.interview2_result]
            .into_iter()
            .flatten()
    }

    /// Write a change without any ordering checks. Callers gate date edits through
    /// [`super::validator::validate_date_order`].
    pub fn apply(&mut self, change: FieldChange) {
        match change {
            FieldChange::Date { field, value } => {
                let slot = match field {
                    DateField::Application => &mut self.application_date,
                    DateField::Interview1 => &mut self.interview1_date,
                    DateField::ChallengeSent => &mut self.challenge_sent_date,
                    DateField::ChallengeDone => &mut self.challenge_done_date,
                    DateField::Interview2 => &mut self.interview2_date,
                    DateField::Start => &mut self.start_date,
                };
                *slot = value;
            }
            FieldChange::Result { field, value } => {
                let slot = match field {
                    ResultField::Interview1 => &mut self.interview1_result,
                    ResultField::Interview2 => &mut self.interview2_result,
                };
                *slot = value;
            }
        }
    }

    pub fn with_change(&self, change: FieldChange) -> Self {
        let mut next = self.clone();
        next.apply(change);
        next
    }
}

/// Denormalized candidate fields produced by CV parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u8>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Discrete pipeline stage shown on the tracker badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Application,
    Interview1,
    Challenge,
    Interview2,
    Selected,
    Approved,
    Hired,
}

impl Stage {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Application,
            Self::Interview1,
            Self::Challenge,
            Self::Interview2,
            Self::Selected,
            Self::Approved,
            Self::Hired,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Interview1 => "interview1",
            Self::Challenge => "challenge",
            Self::Interview2 => "interview2",
            Self::Selected => "selected",
            Self::Approved => "approved",
            Self::Hired => "hired",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::Interview1 => "Interview 1",
            Self::Challenge => "Challenge",
            Self::Interview2 => "Interview 2",
            Self::Selected => "Selected",
            Self::Approved => "Approved",
            Self::Hired => "Hired",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dates travel as `YYYY-MM-DD` strings, with `""` for unset.
mod blank_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
            None => serializer.serialize_str(""),
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        super::parse_blank_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Results travel as their token, with `""` for unset.
mod blank_result {
    use super::InterviewResult;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(
        value: &Option<InterviewResult>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.map(InterviewResult::token).unwrap_or(""))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<InterviewResult>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}
