mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::allocate::AllocateArgs;

/// Equal-weight portfolio allocation with decimal precision
#[derive(Parser)]
#[command(
    name = "rebal",
    version,
    about = "Equal-weight portfolio allocation and mark-to-market evaluation",
    long_about = "Splits a cash amount evenly across instruments, buys whole shares \
                  at each cost-basis price, and reports per-instrument cost, value, \
                  P&L and rebalancing deltas with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate cash equally across instruments and mark to market
    Allocate(AllocateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Allocate(args) => commands::allocate::run_allocate(args),
        Commands::Version => {
            println!("rebal {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
