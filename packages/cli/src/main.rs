mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, dump, init, normalize, CheckArgs, DumpArgs, InitArgs, NormalizeArgs};
use tracing::Level;

/// cnx - check and repair CNXML modules
#[derive(Parser, Debug)]
#[command(name = "cnx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new project
    Init(InitArgs),

    /// Report schema violations
    Check(CheckArgs),

    /// Repair schema violations in place
    Normalize(NormalizeArgs),

    /// Print the loaded tree of a module
    Dump(DumpArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Check(args) => check(args, &cwd),
            Command::Normalize(args) => normalize(args, &cwd),
            Command::Dump(args) => dump(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
