use clap::Parser;
use nametidy::cli::{Cli, install_interrupt_handler, run_cli_with_config};
use nametidy::logging::init_logger;
use nametidy::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    init_logger();
    if let Err(e) = install_interrupt_handler() {
        tracing::warn!(error = %e, "cannot install Ctrl-C handler");
    }
    let cli = Cli::parse();

    OutputFormatter::header("=== nametidy ===");

    match run_cli_with_config(&cli.command, cli.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
