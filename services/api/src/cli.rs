use crate::planner::{run_admission_check, run_forecast, AdmissionCheckArgs, ForecastArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use classroom_planner::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Classroom Capacity Planner",
    about = "Check admission availability and forecast classroom occupancy",
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
    /// Evaluate enquiries against the current roster
    Admission {
        #[command(subcommand)]
        command: AdmissionCommand,
    },
    /// Project daily occupancy for one classroom
    Forecast(ForecastArgs),
}

#[derive(Subcommand, Debug)]
enum AdmissionCommand {
    /// Find the earliest admission date for an applicant
    Check(AdmissionCheckArgs),
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
        Command::Admission {
            command: AdmissionCommand::Check(args),
        } => run_admission_check(args),
        Command::Forecast(args) => run_forecast(args),
    }
}
