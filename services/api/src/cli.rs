use crate::demo::{run_demo, run_score_preview, DemoArgs, ScorePreviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scorecard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Profile Scorecard",
    about = "Run the profile readiness scoring service and its CLI tools",
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
    /// Score snapshots without storing anything
    Score {
        #[command(subcommand)]
        command: ScoreCommand,
    },
    /// Run an end-to-end CLI demo covering intake, scoring, and prompts
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ScoreCommand {
    /// Score a directory CSV export (or a built-in sample) and print the report
    Preview(ScorePreviewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score {
            command: ScoreCommand::Preview(args),
        } => run_score_preview(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
