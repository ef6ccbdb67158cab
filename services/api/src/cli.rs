use crate::demo::{run_demo, run_eligible, run_quote, EligibleArgs, QuoteArgs};
use crate::server;
use campaign_desk::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Campaign Desk",
    about = "Run the influencer campaign desk or inspect eligibility and budgets from a snapshot",
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
    /// Show the budget a given influencer sees for a campaign
    Quote(QuoteArgs),
    /// List the applicants eligible for a campaign
    Eligible(EligibleArgs),
    /// Walk through apply and review against a built-in sample desk
    Demo,
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
        Command::Quote(args) => run_quote(args),
        Command::Eligible(args) => run_eligible(args),
        Command::Demo => run_demo(),
    }
}
