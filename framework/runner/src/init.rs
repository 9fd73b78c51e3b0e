use crate::cli::RenderBenchCli;
use clap::Parser;

/// Initialise the CLI and logging for the benchmark runner.
pub fn init() -> RenderBenchCli {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    RenderBenchCli::parse()
}
