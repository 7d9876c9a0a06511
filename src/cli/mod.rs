pub mod config;
pub mod movements;
pub mod quantities;
pub mod reconcile;
pub mod stashes;

use clap::{Args, Parser, Subcommand};

use crate::settings::{OutputFormat, Settings, Timezone};

#[derive(Parser)]
#[command(name = "stashlog", about = "Reconcile guild stash changelogs: cancel item movements and replay running quantities.")]
pub struct Cli {
    /// Enable debug logging (overridden by STASHLOG_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the changelog comes from and how movements are matched.
#[derive(Args)]
pub struct InputArgs {
    /// Changelog file (JSON array, NDJSON or CSV); `-` reads stdin
    pub file: String,
    /// Input format: json, ndjson, csv (default: detect)
    #[arg(long = "input-format")]
    pub input_format: Option<String>,
    /// Movement window in minutes; zero or negative disables movement filtering
    #[arg(long, allow_negative_numbers = true)]
    pub window: Option<f64>,
}

impl InputArgs {
    pub fn window(&self, settings: &Settings) -> f64 {
        self.window.unwrap_or(settings.movement_window_minutes)
    }
}

#[derive(Args)]
pub struct OutputArgs {
    /// Output format (default from settings)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Timezone for rendered timestamps (default from settings)
    #[arg(long, value_enum)]
    pub timezone: Option<Timezone>,
}

impl OutputArgs {
    pub fn resolve(&self, settings: &Settings) -> (OutputFormat, Timezone) {
        (
            self.format.unwrap_or(settings.output_format),
            self.timezone.unwrap_or(settings.timezone),
        )
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cancel movements and annotate running quantities.
    Reconcile {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
        /// Only show entries in this stash (exact name)
        #[arg(long)]
        stash: Option<String>,
        /// Only show entries whose account contains this text
        #[arg(long)]
        account: Option<String>,
        /// Only show entries whose item contains this text
        #[arg(long)]
        item: Option<String>,
        /// Treat --account and --item as regular expressions
        #[arg(long)]
        regex: bool,
    },
    /// List the add/remove pairs that were cancelled as movements.
    Movements {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the final reconstructed quantity per stash and item.
    Quantities {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
        /// Only show this stash (exact name)
        #[arg(long)]
        stash: Option<String>,
    },
    /// List the distinct stash names left after movement filtering.
    Stashes {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Show or update saved settings.
    Config {
        /// Default movement window in minutes
        #[arg(long, allow_negative_numbers = true)]
        window: Option<f64>,
        /// Default timezone for timestamps
        #[arg(long, value_enum)]
        timezone: Option<Timezone>,
        /// Default output format
        #[arg(long = "output-format", value_enum)]
        output_format: Option<OutputFormat>,
    },
}
