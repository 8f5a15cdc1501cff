use crate::demo::{run_assess, run_demo, AssessArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mortify::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Mortify Viability Judge",
    about = "Run the repair-viability judge service or score appliances from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (the default when no subcommand is given)
    Serve(ServeArgs),
    /// Score one appliance from flags without persisting anything
    Assess(AssessArgs),
    /// Walk scoring, judge review, and verdicts against seeded data
    Demo(DemoArgs),
}

/// Flags for `serve`; unset flags defer to the `APP_*` variables.
#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Bind host, overriding APP_HOST
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Bind port, overriding APP_PORT
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Category reference CSV to hydrate the catalog (curated defaults otherwise)
    #[arg(long)]
    pub(crate) categories_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    match Cli::parse().command {
        Some(Command::Serve(args)) => server::run(args).await,
        Some(Command::Assess(args)) => run_assess(args),
        Some(Command::Demo(args)) => run_demo(args),
        None => server::run(ServeArgs::default()).await,
    }
}
