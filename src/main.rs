//! jsaudit CLI entry point.

use clap::Parser;
use jsaudit::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli::log_level(cli.verbose))
        .parse_default_env()
        .init();

    let exit_code = match cli.command {
        Commands::Inspect(args) => match cli::run_inspect(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
        Commands::Overview(args) => match cli::run_overview(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
    };

    std::process::exit(exit_code);
}
