//! CLI frontend for inspecting, applying and replaying stored schematics.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use sch_core::Coordinate;

#[derive(Parser)]
#[command(
    name = "sch",
    about = "Record, store and replay spatial edits and timed animations",
    version,
    propagate_version = true
)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where artifacts are read from.
#[derive(Args)]
struct Source {
    /// Directory holding `schematics/` and `animations/`
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Skip unreadable modification records instead of rejecting the schematic
    #[arg(long)]
    skip_invalid: bool,
}

impl Source {
    fn workspace(&self) -> commands::Workspace {
        commands::Workspace::new(&self.dir, self.skip_invalid)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load every stored artifact and report files that cannot be read
    Check {
        #[command(flatten)]
        source: Source,
    },

    /// List stored schematics and animations
    List {
        #[command(flatten)]
        source: Source,
    },

    /// Print one stored artifact as JSON
    Show {
        /// Artifact id
        id: String,

        #[command(flatten)]
        source: Source,
    },

    /// Apply a schematic to an empty sandbox and print the result
    Apply {
        /// Schematic id
        id: String,

        /// Anchor to apply at, as `x,y,z` (default: the schematic's initial position)
        #[arg(long, value_parser = commands::parse_coordinate)]
        at: Option<Coordinate>,

        /// Print the sandbox contents as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        source: Source,
    },

    /// Play an animation against an empty sandbox
    Play {
        /// Animation id
        id: String,

        /// Driver period in milliseconds
        #[arg(short, long, default_value = "50")]
        period: u64,

        /// Give up after this many pulses
        #[arg(long, default_value = "10000")]
        max_pulses: u64,

        /// Keep only the most recent events (0 = all)
        #[arg(long, default_value = "0")]
        max_events: usize,

        #[command(flatten)]
        source: Source,
    },

    /// Write an empty schematic
    New {
        /// Schematic id (letters, digits, `-` and `_`)
        id: String,

        /// Initial position, as `x,y,z`
        #[arg(long, value_parser = commands::parse_coordinate)]
        at: Option<Coordinate>,

        /// Replace an existing schematic with the same id
        #[arg(short, long)]
        force: bool,

        /// Directory holding `schematics/`
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Check { source } => commands::check::run(&source.workspace()),
        Commands::List { source } => commands::list::run(&source.workspace()),
        Commands::Show { id, source } => commands::show::run(&source.workspace(), &id),
        Commands::Apply {
            id,
            at,
            json,
            source,
        } => commands::apply::run(&source.workspace(), &id, at, json),
        Commands::Play {
            id,
            period,
            max_pulses,
            max_events,
            source,
        } => commands::play::run(&source.workspace(), &id, period, max_pulses, max_events),
        Commands::New { id, at, force, dir } => {
            commands::new::run(&commands::Workspace::new(&dir, false), &id, at, force)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
