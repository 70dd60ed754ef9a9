use clap::Args;
use serde_json::Value;

use vastgoed_core::investment::multi_unit::{self, MultiUnitInputs};
use vastgoed_core::investment::single::{self, AnalysisInputs};

use crate::input;

/// Arguments for single-property analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Override the projection horizon in years
    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for multi-unit analysis
#[derive(Args)]
pub struct MultiUnitArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut inputs: AnalysisInputs = input::read_document(args.input.as_deref(), "analyze")?;
    if let Some(years) = args.years {
        inputs.years = years;
    }
    let result = single::analyze_investment(&inputs);
    Ok(serde_json::to_value(result)?)
}

pub fn run_multi_unit(args: MultiUnitArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: MultiUnitInputs = input::read_document(args.input.as_deref(), "multi-unit")?;
    let result = multi_unit::analyze_multi_unit(&inputs);
    Ok(serde_json::to_value(result)?)
}
