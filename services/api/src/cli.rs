use crate::rank::{run_rank, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use volunteer_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Volunteer Match",
    about = "Score volunteers against events and run the matching service",
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
    /// Print ranked matches for one event or one volunteer from CSV exports
    Rank(RankArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Volunteer CSV export used to seed the store
    #[arg(long)]
    pub(crate) volunteers: Option<PathBuf>,
    /// Event CSV export used to seed the store
    #[arg(long)]
    pub(crate) events: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
    }
}
