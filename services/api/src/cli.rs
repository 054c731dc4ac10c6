use crate::evaluate::{run_evaluation, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hiring_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hiring Engine",
    about = "Screen resumes and run the job-application lifecycle service",
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
    /// Score a single resume against a set of requirements without starting the server
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the directory uploaded resumes are written to
    #[arg(long)]
    pub(crate) resume_dir: Option<std::path::PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluation(args),
    }
}
