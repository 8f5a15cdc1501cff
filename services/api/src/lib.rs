//! Deployable surface of the viability judge: clap CLI, axum server wiring,
//! in-memory infrastructure, and the stdout demo.

mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use mortify::error::AppError;

/// Parses the command line and runs the selected subcommand (`serve` when
/// none is given).
pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
