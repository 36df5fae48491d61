use clap::Parser;
use cluster_lint::cli::{Cli, Commands};
use cluster_lint::handlers::{handle_list, handle_run};
use std::process;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Returns whether the run passed.
fn run() -> cluster_lint::Result<bool> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    match cli.command {
        Commands::List { groups } => {
            print!("{}", handle_list(&groups)?);
            Ok(true)
        }
        Commands::Run { path, options } => {
            let (report, failed) = handle_run(path, options, cli.config.as_deref())?;
            if !cli.quiet {
                print!("{}", report);
            }
            Ok(!failed)
        }
    }
}
