mod cli;
mod error;
mod filter;
mod fmt;
mod importer;
mod logging;
mod models;
mod reconciler;
mod render;
mod settings;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::setup_logger(cli.verbose);

    let result = match cli.command {
        Commands::Reconcile {
            input,
            output,
            stash,
            account,
            item,
            regex,
        } => cli::reconcile::run(
            &input,
            &output,
            stash.as_deref(),
            account.as_deref(),
            item.as_deref(),
            regex,
        ),
        Commands::Movements { input, output } => cli::movements::run(&input, &output),
        Commands::Quantities {
            input,
            output,
            stash,
        } => cli::quantities::run(&input, &output, stash.as_deref()),
        Commands::Stashes { input } => cli::stashes::run(&input),
        Commands::Config {
            window,
            timezone,
            output_format,
        } => cli::config::run(window, timezone, output_format),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
