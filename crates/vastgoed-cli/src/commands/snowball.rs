use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use vastgoed_core::snowball::{self, CandidateInput, SnowballInput, SnowballStrategy};

use crate::input;

/// Arguments for the snowball simulation
#[derive(Args)]
pub struct SnowballArgs {
    /// Path to JSON/YAML input file with the properties
    #[arg(long)]
    pub input: Option<String>,

    /// Override the strategy: smallest or avalanche
    #[arg(long)]
    pub strategy: Option<SnowballStrategy>,

    /// Override the extra monthly cash
    #[arg(long)]
    pub extra: Option<Decimal>,
}

/// Arguments for the candidate comparison
#[derive(Args)]
pub struct CandidateArgs {
    /// Path to JSON/YAML input file with properties and candidate
    #[arg(long)]
    pub input: Option<String>,

    /// Override the strategy: smallest or avalanche
    #[arg(long)]
    pub strategy: Option<SnowballStrategy>,
}

pub fn run_snowball(args: SnowballArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let doc: SnowballInput = input::read_document(args.input.as_deref(), "snowball")?;
    let result = snowball::simulate_snowball(
        &doc.properties,
        args.extra.unwrap_or(doc.extra_monthly_cash),
        args.strategy.unwrap_or(doc.strategy),
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_candidate(args: CandidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let doc: CandidateInput = input::read_document(args.input.as_deref(), "candidate")?;
    let result = snowball::compare_candidate(
        &doc.properties,
        &doc.candidate,
        doc.extra_monthly_cash,
        args.strategy.unwrap_or(doc.strategy),
    );
    Ok(serde_json::to_value(result)?)
}
