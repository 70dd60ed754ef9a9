use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use vastgoed_core::tax::imi::{self, MunicipalityType};
use vastgoed_core::tax::imt::{self, PropertyType};
use vastgoed_core::tax::irs::{self, ContractType, IrsInput};
use vastgoed_core::tax::summary::{self, TaxSummaryInput};

use crate::input;

/// Arguments for the transfer tax calculation
#[derive(Args)]
pub struct ImtArgs {
    /// Purchase price
    #[arg(long)]
    pub price: Decimal,

    /// woning, eigen-woning (own residence) or niet-woning
    #[arg(long, default_value = "woning")]
    pub property_type: PropertyType,
}

/// Arguments for the municipal property tax calculation
#[derive(Args)]
pub struct ImiArgs {
    /// Assessed value (VPT)
    #[arg(long)]
    pub value: Decimal,

    /// standaard, grote_stad or landelijk
    #[arg(long, default_value = "standaard")]
    pub municipality: MunicipalityType,

    /// Municipal rate in percent, overriding the default (e.g. 0.38)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Reference date for the next payment window (YYYY-MM-DD, default today)
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

/// Arguments for the rental income tax calculation
#[derive(Args)]
pub struct IrsArgs {
    /// Income year
    #[arg(long)]
    pub year: i32,

    /// Contract rent per month
    #[arg(long)]
    pub monthly_rent: Decimal,

    /// Annual rental income, when it differs from 12x the monthly rent
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// Contract duration in years
    #[arg(long, default_value_t = 0)]
    pub contract_years: u32,

    /// standard or long_term_habitation
    #[arg(long, default_value = "standard")]
    pub contract_type: ContractType,

    /// Aggregate rental income with other income
    #[arg(long)]
    pub aggregate: bool,
}

/// Arguments for the combined tax summary
#[derive(Args)]
pub struct TaxesArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_imt(args: ImtArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = imt::calculate_imt_2025(args.price, args.property_type);
    Ok(serde_json::to_value(result)?)
}

pub fn run_imi(args: ImiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let result = imi::calculate_imi(args.value, args.municipality, args.rate, today);
    Ok(serde_json::to_value(result)?)
}

pub fn run_irs(args: IrsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let irs_input = IrsInput {
        tax_year: args.year,
        monthly_rent: args.monthly_rent,
        annual_rental_income: args.annual_income,
        contract_years: args.contract_years,
        contract_type: args.contract_type,
        aggregate_with_other_income: args.aggregate,
    };
    let result = irs::calculate_irs(&irs_input);
    Ok(serde_json::to_value(result)?)
}

pub fn run_taxes(args: TaxesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let summary_input: TaxSummaryInput = input::read_document(args.input.as_deref(), "taxes")?;
    let result = summary::summarize_taxes(&summary_input);
    Ok(serde_json::to_value(result)?)
}
