mod cli;
mod evaluate;
mod infra;
mod routes;
mod server;

use hiring_engine::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
