use crate::demo::{run_demo, run_pipeline_show, run_stage, DemoArgs, ShowArgs, StageArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cv_pipeline::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "CV Pipeline",
    about = "Track parsed candidates through the recruitment pipeline",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect pipeline records and derived stages
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommand,
    },
    /// Walk a sample pipeline end to end: edits, a rejected edit, summary, snapshot
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum PipelineCommand {
    /// Derive the stage for a single set of milestone dates and interview results
    Stage(StageArgs),
    /// Print the stored pipeline with derived stages and a per-stage summary
    Show(ShowArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Persist the pipeline to this JSON file instead of APP_PIPELINE_STORE
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Pipeline {
            command: PipelineCommand::Stage(args),
        } => run_stage(args),
        Command::Pipeline {
            command: PipelineCommand::Show(args),
        } => run_pipeline_show(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["cv-pipeline-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_stage_arguments() {
        let cli = Cli::try_parse_from([
            "cv-pipeline-api",
            "pipeline",
            "stage",
            "--interview1-date",
            "2025-03-10",
            "--interview2-result",
            "Fair",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Pipeline {
                command: PipelineCommand::Stage(args),
            }) => {
                assert!(args.interview1_date.is_some());
                assert!(args.start_date.is_none());
                assert!(args.interview2_result.is_some());
            }
            other => panic!("expected stage command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates_and_results() {
        assert!(Cli::try_parse_from([
            "cv-pipeline-api",
            "pipeline",
            "stage",
            "--start-date",
            "tomorrow",
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "cv-pipeline-api",
            "pipeline",
            "stage",
            "--interview1-result",
            "Stellar",
        ])
        .is_err());
    }

    #[test]
    fn serve_accepts_store_override() {
        let cli = Cli::try_parse_from([
            "cv-pipeline-api",
            "serve",
            "--port",
            "8080",
            "--store",
            "pipeline.json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.store, Some(PathBuf::from("pipeline.json")));
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }
}
