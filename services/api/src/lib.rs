mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use agri_match::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
