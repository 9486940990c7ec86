mod cli;
mod infra;
mod planner;
mod routes;
mod server;

use classroom_planner::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
