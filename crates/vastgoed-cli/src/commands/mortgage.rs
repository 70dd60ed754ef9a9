use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use vastgoed_core::mortgage::{self, AmortizationYear};
use vastgoed_core::VastgoedError;

use crate::input;

/// Arguments for the monthly payment calculation
#[derive(Args)]
pub struct MortgageArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 3.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: MortgageArgs,

    /// Actual monthly payment when it differs from the annuity
    #[arg(long)]
    pub payment: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LoanInput {
    principal: Decimal,
    annual_rate_pct: Decimal,
    years: u32,
    #[serde(default)]
    monthly_payment: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct MortgageOutput {
    principal: Decimal,
    annual_rate_pct: Decimal,
    years: u32,
    monthly_payment: Decimal,
    total_paid: Decimal,
    total_interest: Decimal,
}

#[derive(Debug, Serialize)]
struct ScheduleOutput {
    principal: Decimal,
    annual_rate_pct: Decimal,
    monthly_payment: Decimal,
    total_interest: Decimal,
    schedule: Vec<AmortizationYear>,
}

fn loan_input(args: &MortgageArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_document(path);
    }
    if let (Some(principal), Some(rate), Some(years)) = (args.principal, args.rate, args.years) {
        return Ok(LoanInput {
            principal,
            annual_rate_pct: rate,
            years,
            monthly_payment: None,
        });
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Err(VastgoedError::InvalidInput {
        field: "--principal, --rate, --years".into(),
        reason: "all three are required (or provide --input)".into(),
    }
    .into())
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = loan_input(&args)?;
    let payment = mortgage::monthly_payment(loan.principal, loan.annual_rate_pct, loan.years);
    let total_paid = payment
        .saturating_mul(Decimal::from(loan.years))
        .saturating_mul(dec!(12));

    let output = MortgageOutput {
        principal: loan.principal,
        annual_rate_pct: loan.annual_rate_pct,
        years: loan.years,
        monthly_payment: payment.round_dp(2),
        total_paid: total_paid.round_dp(2),
        total_interest: total_paid
            .saturating_sub(loan.principal.max(Decimal::ZERO))
            .round_dp(2),
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = loan_input(&args.loan)?;
    let payment = args
        .payment
        .or(loan.monthly_payment)
        .unwrap_or_else(|| mortgage::monthly_payment(loan.principal, loan.annual_rate_pct, loan.years))
        .round_dp(2);

    let schedule =
        mortgage::amortization_schedule(loan.principal, loan.annual_rate_pct, payment, loan.years);

    let output = ScheduleOutput {
        principal: loan.principal,
        annual_rate_pct: loan.annual_rate_pct,
        monthly_payment: payment,
        total_interest: vastgoed_core::saturating_sum(schedule.iter().map(|y| y.interest)),
        schedule,
    };
    Ok(serde_json::to_value(output)?)
}
