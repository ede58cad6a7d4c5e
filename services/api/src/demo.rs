use crate::infra::{
    parse_date, parse_result, ConfiguredRepository, InMemoryCandidateDirectory,
    InMemoryPipelineRepository,
};
use chrono::NaiveDate;
use clap::Args;
use cv_pipeline::config::AppConfig;
use cv_pipeline::error::AppError;
use cv_pipeline::workflows::pipeline::{
    derive_stage, is_chronological, CandidateDirectory, CandidateId, CandidateProfile,
    InterviewResult, PipelineEntry, PipelineRepository, PipelineService, PipelineSummary,
    RecruitmentRecord,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct StageArgs {
    /// Application received (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) application_date: Option<NaiveDate>,
    /// First interview held (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) interview1_date: Option<NaiveDate>,
    /// Technical challenge sent (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) challenge_sent_date: Option<NaiveDate>,
    /// Technical challenge returned (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) challenge_done_date: Option<NaiveDate>,
    /// Second interview held (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) interview2_date: Option<NaiveDate>,
    /// Start date agreed (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// First interview outcome (Excellent, Good, Fair, Medium)
    #[arg(long, value_parser = parse_result)]
    pub(crate) interview1_result: Option<InterviewResult>,
    /// Second interview outcome (Excellent, Good, Fair, Medium)
    #[arg(long, value_parser = parse_result)]
    pub(crate) interview2_result: Option<InterviewResult>,
}

impl StageArgs {
    fn into_record(self) -> RecruitmentRecord {
        RecruitmentRecord {
            application_date: self.application_date,
            interview1_date: self.interview1_date,
            challenge_sent_date: self.challenge_sent_date,
            challenge_done_date: self.challenge_done_date,
            interview2_date: self.interview2_date,
            start_date: self.start_date,
            interview1_result: self.interview1_result,
            interview2_result: self.interview2_result,
            ..RecruitmentRecord::new(CandidateId("cli".to_string()))
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct ShowArgs {
    /// Pipeline JSON file to read (defaults to APP_PIPELINE_STORE)
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
    /// Print entries as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the snapshot taken at the end of the demo as JSON
    #[arg(long)]
    pub(crate) show_snapshot: bool,
}

pub(crate) fn run_stage(args: StageArgs) -> Result<(), AppError> {
    let record = args.into_record();
    let stage = derive_stage(&record);

    println!("Derived stage: {}", stage.label());
    if !is_chronological(&record) {
        println!("  Warning: milestone dates are out of order; the tracker would reject this row");
    }
    Ok(())
}

pub(crate) fn run_pipeline_show(args: ShowArgs) -> Result<(), AppError> {
    let store = match args.store {
        Some(path) => Some(path),
        None => AppConfig::load()?.storage.pipeline_store,
    };
    let Some(path) = store else {
        return Err(AppError::Input(
            "no pipeline store given; pass --store or set APP_PIPELINE_STORE".to_string(),
        ));
    };

    let repository = Arc::new(ConfiguredRepository::from_path(Some(path)));
    let directory = Arc::new(InMemoryCandidateDirectory::default());
    let service = PipelineService::open(repository.clone(), directory)?;
    let entries = service.entries();

    if args.json {
        match serde_json::to_string_pretty(&entries) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Pipeline payload unavailable: {}", err),
        }
        return Ok(());
    }

    println!("Pipeline store: {}", repository.describe());
    render_entries(&entries);
    render_summary(&service.summary());
    println!("Snapshots recorded: {}", service.history().len());
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Recruitment pipeline demo");

    let repository = Arc::new(InMemoryPipelineRepository::default());
    let directory = Arc::new(InMemoryCandidateDirectory::default());
    let service = PipelineService::open(repository.clone(), directory.clone())?;

    for (id, name, headline) in demo_candidates() {
        service.add_candidate(
            CandidateId(id.to_string()),
            Some(CandidateProfile {
                name: name.to_string(),
                headline: Some(headline.to_string()),
                skills: vec!["Rust".to_string(), "SQL".to_string()],
                ..CandidateProfile::default()
            }),
        )?;
    }

    for (id, field, value) in demo_edits() {
        let candidate = CandidateId(id.to_string());
        match service.apply_raw_edit(&candidate, field, value) {
            Ok(entry) => println!(
                "- {} {}={} -> {}",
                candidate,
                field,
                display_value(value),
                entry.stage.label()
            ),
            Err(err) => println!("- {} {}={} rejected: {}", candidate, field, value, err),
        }
    }

    println!();
    let entries = service.entries();
    render_entries(&entries);
    render_summary(&service.summary());

    let snapshot = service.take_snapshot()?;
    println!(
        "\nSnapshot {} captured {} candidates at {}",
        snapshot.id,
        snapshot.entries.len(),
        snapshot.taken_at.format("%Y-%m-%d %H:%M UTC")
    );
    for entry in &snapshot.entries {
        let name = directory
            .lookup(&entry.record.candidate_id)
            .ok()
            .flatten()
            .map(|profile| profile.name)
            .unwrap_or_else(|| "unknown".to_string());
        println!("  - {} ({}): {}", entry.record.candidate_id, name, entry.stage());
    }

    if args.show_snapshot {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Snapshot payload unavailable: {}", err),
        }
    }

    let persisted = repository.load()?;
    println!(
        "Persisted {} rows and {} snapshot(s)",
        persisted.records.len(),
        persisted.history.len()
    );

    Ok(())
}

fn demo_candidates() -> [(&'static str, &'static str, &'static str); 4] {
    [
        ("cv-001", "Amara Okafor", "Platform Engineer"),
        ("cv-002", "Jonas Lindqvist", "Data Engineer"),
        ("cv-003", "Mei Tanaka", "Frontend Engineer"),
        ("cv-004", "Diego Ramirez", "SRE"),
    ]
}

fn demo_edits() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("cv-001", "applicationDate", "2025-02-03"),
        ("cv-001", "interview1Date", "2025-02-10"),
        ("cv-001", "interview1Result", "Excellent"),
        ("cv-001", "interview2Date", "2025-02-24"),
        ("cv-001", "interview2Result", "Excellent"),
        ("cv-002", "applicationDate", "2025-02-05"),
        ("cv-002", "interview1Date", "2025-02-12"),
        ("cv-002", "challengeSentDate", "2025-02-13"),
        ("cv-002", "challengeDoneDate", "2025-02-18"),
        ("cv-002", "interview1Result", "Good"),
        ("cv-002", "interview2Result", "Fair"),
        ("cv-003", "applicationDate", "2025-02-07"),
        ("cv-003", "interview1Date", "2025-02-17"),
        // Earlier than the first interview; the tracker refuses it.
        ("cv-003", "challengeSentDate", "2025-02-14"),
        ("cv-003", "interview1Result", "Medium"),
        ("cv-004", "applicationDate", "2025-02-10"),
    ]
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(cleared)"
    } else {
        value
    }
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn result_cell(result: Option<InterviewResult>) -> &'static str {
    result.map(InterviewResult::token).unwrap_or("-")
}

pub(crate) fn render_entries(entries: &[PipelineEntry]) {
    if entries.is_empty() {
        println!("No candidates in the pipeline");
        return;
    }

    println!(
        "{:<10} {:<12} {:<11} {:<11} {:<11} {:<11} {:<11} {:<10} {:<10} {}",
        "candidate",
        "stage",
        "applied",
        "interview1",
        "chal.sent",
        "chal.done",
        "interview2",
        "result1",
        "result2",
        "start"
    );
    for entry in entries {
        let record = &entry.record;
        println!(
            "{:<10} {:<12} {:<11} {:<11} {:<11} {:<11} {:<11} {:<10} {:<10} {}",
            record.candidate_id.to_string(),
            entry.stage_label,
            date_cell(record.application_date),
            date_cell(record.interview1_date),
            date_cell(record.challenge_sent_date),
            date_cell(record.challenge_done_date),
            date_cell(record.interview2_date),
            result_cell(record.interview1_result),
            result_cell(record.interview2_result),
            date_cell(record.start_date)
        );
    }
}

pub(crate) fn render_summary(summary: &PipelineSummary) {
    println!("\nStage summary ({} candidates)", summary.total);
    for entry in &summary.stages {
        if entry.count > 0 {
            println!("  - {}: {}", entry.stage_label, entry.count);
        }
    }
}
