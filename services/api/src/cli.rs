use crate::commands::{run_import, run_insights, run_rank, ImportArgs, InsightsArgs, RankArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hirerank::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "HireRank",
    about = "Score, rank and import job candidates from the command line",
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
    /// Import candidates for a job from a CSV export
    Import(ImportArgs),
    /// Print the ranked candidate list for a job
    Rank(RankArgs),
    /// Print score distribution and skill counts for a job
    Insights(InsightsArgs),
    /// Score a few synthetic candidates in memory, with evidence arriving out of order
    Demo(DemoArgs),
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
        Command::Import(args) => run_import(args),
        Command::Rank(args) => run_rank(args),
        Command::Insights(args) => run_insights(args),
        Command::Demo(args) => run_demo(args),
    }
}
