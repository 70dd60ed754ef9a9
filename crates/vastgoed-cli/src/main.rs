mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::investment::{AnalyzeArgs, MultiUnitArgs};
use commands::mortgage::{MortgageArgs, ScheduleArgs};
use commands::snowball::{CandidateArgs, SnowballArgs};
use commands::tax::{ImiArgs, ImtArgs, IrsArgs, TaxesArgs};

/// Real-estate investment analysis and Portuguese property taxes
#[derive(Parser)]
#[command(
    name = "vastgoed",
    version,
    about = "Real-estate investment analysis and Portuguese property taxes",
    long_about = "A CLI for rental property investment analysis with decimal precision. \
                  Supports mortgage payments and schedules, IMT/IMI/IRS taxes, \
                  single- and multi-unit cashflow projections, and debt snowball \
                  simulations."
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
    /// Monthly annuity payment for a loan
    Mortgage(MortgageArgs),
    /// Year-by-year amortization schedule
    Schedule(ScheduleArgs),
    /// Property transfer tax (IMT) and stamp duty
    Imt(ImtArgs),
    /// Municipal property tax (IMI)
    Imi(ImiArgs),
    /// Rental income tax (IRS)
    Irs(IrsArgs),
    /// IMT, IMI and IRS together
    Taxes(TaxesArgs),
    /// Single-property investment analysis
    Analyze(AnalyzeArgs),
    /// Multi-unit building analysis
    MultiUnit(MultiUnitArgs),
    /// Debt snowball payoff simulation
    Snowball(SnowballArgs),
    /// Snowball with and without a candidate property
    Candidate(CandidateArgs),
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

/// Logs go to stderr so stdout stays machine readable. `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Schedule(args) => commands::mortgage::run_schedule(args),
        Commands::Imt(args) => commands::tax::run_imt(args),
        Commands::Imi(args) => commands::tax::run_imi(args),
        Commands::Irs(args) => commands::tax::run_irs(args),
        Commands::Taxes(args) => commands::tax::run_taxes(args),
        Commands::Analyze(args) => commands::investment::run_analyze(args),
        Commands::MultiUnit(args) => commands::investment::run_multi_unit(args),
        Commands::Snowball(args) => commands::snowball::run_snowball(args),
        Commands::Candidate(args) => commands::snowball::run_candidate(args),
        Commands::Version => {
            println!("vastgoed {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
