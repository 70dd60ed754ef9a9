use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use vastgoed_core::tax::imi::MunicipalityType;
use vastgoed_core::tax::imt::PropertyType;
use vastgoed_core::{Money, Percent, VastgoedResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: DeserializeOwned>(input_json: &str) -> VastgoedResult<T> {
    Ok(serde_json::from_str(input_json)?)
}

fn run<I, O, F>(input_json: String, f: F) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
    F: FnOnce(I) -> O,
{
    let input: I = parse(&input_json).map_err(to_napi_error)?;
    serde_json::to_string(&f(input)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LoanInput {
    principal: Money,
    annual_rate_pct: Percent,
    years: u32,
    #[serde(default)]
    monthly_payment: Option<Money>,
}

#[derive(Serialize)]
struct PaymentOutput {
    monthly_payment: Money,
}

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    run(input_json, |loan: LoanInput| PaymentOutput {
        monthly_payment: vastgoed_core::mortgage::monthly_payment(
            loan.principal,
            loan.annual_rate_pct,
            loan.years,
        ),
    })
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    run(input_json, |loan: LoanInput| {
        let payment = loan.monthly_payment.unwrap_or_else(|| {
            vastgoed_core::mortgage::monthly_payment(loan.principal, loan.annual_rate_pct, loan.years)
        });
        vastgoed_core::mortgage::amortization_schedule(
            loan.principal,
            loan.annual_rate_pct,
            payment,
            loan.years,
        )
    })
}

// ---------------------------------------------------------------------------
// Taxes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ImtInput {
    price: Money,
    property_type: PropertyType,
}

#[derive(Deserialize)]
struct ImiInput {
    assessed_value: Money,
    municipality_type: MunicipalityType,
    #[serde(default)]
    custom_rate_pct: Option<Percent>,
    today: NaiveDate,
}

#[napi]
pub fn calculate_imt(input_json: String) -> NapiResult<String> {
    run(input_json, |i: ImtInput| {
        vastgoed_core::tax::imt::calculate_imt_2025(i.price, i.property_type)
    })
}

#[napi]
pub fn calculate_imi(input_json: String) -> NapiResult<String> {
    run(input_json, |i: ImiInput| {
        vastgoed_core::tax::imi::calculate_imi(
            i.assessed_value,
            i.municipality_type,
            i.custom_rate_pct,
            i.today,
        )
    })
}

#[napi]
pub fn calculate_irs(input_json: String) -> NapiResult<String> {
    run(input_json, |i: vastgoed_core::tax::irs::IrsInput| {
        vastgoed_core::tax::irs::calculate_irs(&i)
    })
}

#[napi]
pub fn summarize_taxes(input_json: String) -> NapiResult<String> {
    run(input_json, |i: vastgoed_core::tax::summary::TaxSummaryInput| {
        vastgoed_core::tax::summary::summarize_taxes(&i)
    })
}

// ---------------------------------------------------------------------------
// Investment analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_investment(input_json: String) -> NapiResult<String> {
    run(input_json, |i: vastgoed_core::investment::single::AnalysisInputs| {
        vastgoed_core::investment::single::analyze_investment(&i)
    })
}

#[napi]
pub fn analyze_multi_unit(input_json: String) -> NapiResult<String> {
    run(input_json, |i: vastgoed_core::investment::multi_unit::MultiUnitInputs| {
        vastgoed_core::investment::multi_unit::analyze_multi_unit(&i)
    })
}

// ---------------------------------------------------------------------------
// Debt snowball
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_snowball(input_json: String) -> NapiResult<String> {
    run(input_json, |i: vastgoed_core::snowball::SnowballInput| {
        vastgoed_core::snowball::simulate_snowball(&i.properties, i.extra_monthly_cash, i.strategy)
    })
}

#[napi]
pub fn compare_candidate(input_json: String) -> NapiResult<String> {
    run(input_json, |i: vastgoed_core::snowball::CandidateInput| {
        vastgoed_core::snowball::compare_candidate(
            &i.properties,
            &i.candidate,
            i.extra_monthly_cash,
            i.strategy,
        )
    })
}
