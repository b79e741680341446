//! Vimoji CLI binary.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vimoji::cli::args::*;
use vimoji::cli::commands::*;

fn main() {
    // Parse command line arguments using clap
    let args = VimojiArgs::parse();

    // RUST_LOG wins over the verbosity flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match args.verbosity() {
            0 => "error", // Quiet mode
            1 => "warn",  // Default
            2 => "info",  // Verbose
            _ => "debug", // Very verbose (3+)
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute the command
    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
