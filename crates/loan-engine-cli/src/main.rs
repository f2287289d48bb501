mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortize::{PaymentArgs, ScheduleArgs, SummaryArgs};

/// Loan amortization calculations
#[derive(Parser)]
#[command(
    name = "lam",
    version,
    about = "Loan amortization schedule calculations",
    long_about = "A CLI for level-payment loan amortization with decimal precision. \
                  Computes the level payment, the full month-by-month schedule, and \
                  the cumulative position after any month of the term."
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
    /// Calculate the level payment for a loan
    Payment(PaymentArgs),
    /// Produce the full amortization schedule
    Schedule(ScheduleArgs),
    /// Cumulative interest and principal through a given month
    Summary(SummaryArgs),
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
        Commands::Payment(args) => commands::amortize::run_payment(args),
        Commands::Schedule(args) => commands::amortize::run_schedule(args),
        Commands::Summary(args) => commands::amortize::run_summary(args),
        Commands::Version => {
            println!("lam {}", env!("CARGO_PKG_VERSION"));
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
