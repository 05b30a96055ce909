//! devsite-refdocs CLI entry point.

use clap::Parser;
use devsite_refdocs::cli::{self, Cli, Commands, EXIT_ERROR};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Render(args) => {
            init_logging(args.verbose);
            match cli::run_render(&args) {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    EXIT_ERROR
                }
            }
        }
    };

    std::process::exit(exit_code);
}
