use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::mortgage::{Financing, ResolvedLoan};
use crate::time_value::{growth_factor, irr_pct};
use crate::types::{
    is_capped, pct_to_rate, ratio_pct, saturating_sum, with_metadata, ComputationOutput, Coverage,
    Money, Percent,
};

const DAYS_PER_YEAR: Decimal = dec!(365);
const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the property earns rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RentalModel {
    LongTerm {
        monthly_rent: Money,
    },
    ShortTerm {
        /// Booked nights / 365, 0–100
        occupancy_pct: Percent,
        average_daily_rate: Money,
    },
    /// Long-term lease plus short-stay income on top.
    Mixed {
        monthly_rent: Money,
        occupancy_pct: Percent,
        average_daily_rate: Money,
    },
}

impl RentalModel {
    /// Expected annual gross rent before growth.
    pub fn annual_rent(&self) -> Money {
        match self {
            RentalModel::LongTerm { monthly_rent } => monthly_rent.saturating_mul(MONTHS_PER_YEAR),
            RentalModel::ShortTerm {
                occupancy_pct,
                average_daily_rate,
            } => short_stay_rent(*occupancy_pct, *average_daily_rate),
            RentalModel::Mixed {
                monthly_rent,
                occupancy_pct,
                average_daily_rate,
            } => monthly_rent
                .saturating_mul(MONTHS_PER_YEAR)
                .saturating_add(short_stay_rent(*occupancy_pct, *average_daily_rate)),
        }
    }

    /// Annual rent at full occupancy.
    pub fn max_potential_rent(&self) -> Money {
        match self {
            RentalModel::LongTerm { monthly_rent } => monthly_rent.saturating_mul(MONTHS_PER_YEAR),
            RentalModel::ShortTerm {
                average_daily_rate, ..
            } => average_daily_rate.saturating_mul(DAYS_PER_YEAR),
            RentalModel::Mixed {
                monthly_rent,
                average_daily_rate,
                ..
            } => monthly_rent
                .saturating_mul(MONTHS_PER_YEAR)
                .saturating_add(average_daily_rate.saturating_mul(DAYS_PER_YEAR)),
        }
    }
}

fn short_stay_rent(occupancy_pct: Percent, average_daily_rate: Money) -> Money {
    pct_to_rate(occupancy_pct)
        .saturating_mul(average_daily_rate)
        .saturating_mul(DAYS_PER_YEAR)
}

/// Inputs for a single-property analysis. Every `_pct` field is 0–100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInputs {
    pub purchase_price: Money,
    /// IMT paid at acquisition
    #[serde(default)]
    pub transfer_tax: Money,
    #[serde(default)]
    pub notary_fees: Money,
    #[serde(default)]
    pub renovation_costs: Money,
    #[serde(default)]
    pub furnishing_costs: Money,
    pub financing: Financing,
    pub rental: RentalModel,
    /// Management fee as a share of gross rent
    #[serde(default)]
    pub management_pct: Percent,
    #[serde(default)]
    pub maintenance_yearly: Money,
    #[serde(default)]
    pub insurance_yearly: Money,
    #[serde(default)]
    pub condo_monthly: Money,
    #[serde(default)]
    pub utilities_monthly: Money,
    /// IMI
    #[serde(default)]
    pub property_tax_yearly: Money,
    #[serde(default)]
    pub rent_growth_pct: Percent,
    #[serde(default)]
    pub cost_growth_pct: Percent,
    #[serde(default)]
    pub value_growth_pct: Percent,
    /// Projection horizon
    pub years: u32,
}

impl AnalysisInputs {
    pub fn total_investment(&self) -> Money {
        saturating_sum([
            self.purchase_price,
            self.transfer_tax,
            self.notary_fees,
            self.renovation_costs,
            self.furnishing_costs,
        ])
    }

    /// Operating costs that do not scale with rent, year 1.
    pub fn fixed_costs_yearly(&self) -> Money {
        saturating_sum([
            self.maintenance_yearly,
            self.insurance_yearly,
            self.condo_monthly.saturating_mul(MONTHS_PER_YEAR),
            self.utilities_monthly.saturating_mul(MONTHS_PER_YEAR),
            self.property_tax_yearly,
        ])
    }
}

/// One projected year. Always ordered by `year` ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyCashflow {
    pub year: u32,
    pub gross_rent: Money,
    pub operating_expenses: Money,
    /// gross_rent - operating_expenses
    pub noi: Money,
    pub debt_service: Money,
    /// noi - debt_service
    pub net_cashflow: Money,
    /// Running sum of net_cashflow
    pub cumulative_cashflow: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitAnalysis {
    pub years: u32,
    /// Purchase price compounded at the value growth rate
    pub market_value: Money,
    pub remaining_debt: Money,
    /// market_value - remaining_debt
    pub net_exit_proceeds: Money,
    pub cumulative_cashflow: Money,
    /// net_exit_proceeds + cumulative_cashflow
    pub total_return: Money,
    /// total_return / own capital; zero without own capital
    pub equity_multiple: Decimal,
}

impl YearlyCashflow {
    fn is_capped(&self) -> bool {
        [self.gross_rent, self.operating_expenses, self.noi, self.net_cashflow, self.cumulative_cashflow]
            .into_iter()
            .any(is_capped)
    }
}

impl ExitAnalysis {
    fn is_capped(&self) -> bool {
        [self.market_value, self.remaining_debt, self.net_exit_proceeds, self.total_return]
            .into_iter()
            .any(is_capped)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentAnalysis {
    pub total_investment: Money,
    pub own_capital: Money,
    pub loan_amount: Money,
    pub monthly_payment: Money,
    /// Gross yield on purchase price
    pub bar_pct: Percent,
    /// Net yield (NOI) on purchase price
    pub nar_pct: Percent,
    pub cash_on_cash_pct: Percent,
    pub dscr: Coverage,
    pub irr_pct: Percent,
    pub break_even_occupancy_pct: Percent,
    pub cashflows: Vec<YearlyCashflow>,
    pub exit: ExitAnalysis,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project cashflows, KPIs and the exit position of a single property.
///
/// Total over all inputs: zero denominators resolve to 0 (or an unbounded
/// DSCR), a zero horizon yields an empty projection plus a warning, and
/// figures beyond the decimal range are capped at its bounds with a warning.
pub fn analyze_investment(inputs: &AnalysisInputs) -> ComputationOutput<InvestmentAnalysis> {
    let mut warnings: Vec<String> = Vec::new();

    let total_investment = inputs.total_investment();
    let loan = inputs.financing.resolve(inputs.purchase_price);
    let own_capital = total_investment.saturating_sub(loan.loan_amount);

    if inputs.years == 0 {
        warnings.push("Horizon of 0 years: no cashflows projected".into());
    }
    if own_capital <= Decimal::ZERO {
        warnings.push(format!(
            "Own capital is {own_capital}; cash-on-cash return and IRR are reported as 0"
        ));
    }
    if matches!(inputs.financing.payment, crate::mortgage::PaymentMode::Manual { .. })
        && loan.loan_amount.is_zero()
    {
        warnings.push("Manual mortgage payment given without a loan amount".into());
    }

    let cashflows = project_cashflows(inputs, &loan);

    // Year-1 figures drive the KPIs even when the horizon is empty
    let year_one = project_year(inputs, &loan, 1, Decimal::ZERO);

    let bar_pct = ratio_pct(year_one.gross_rent, inputs.purchase_price);
    let nar_pct = ratio_pct(year_one.noi, inputs.purchase_price);
    let cash_on_cash_pct = ratio_pct(year_one.net_cashflow, own_capital);
    let dscr = Coverage::of(year_one.noi, year_one.debt_service);

    let break_even_occupancy_pct = ratio_pct(
        inputs.fixed_costs_yearly().saturating_add(year_one.debt_service),
        inputs.rental.max_potential_rent(),
    );

    let exit = exit_analysis(inputs, &loan, own_capital, &cashflows);

    let irr_pct = if inputs.years == 0 || own_capital <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        let mut series = Vec::with_capacity(cashflows.len() + 1);
        series.push(-own_capital);
        series.extend(cashflows.iter().map(|c| c.net_cashflow));
        if let Some(last) = series.last_mut() {
            *last = last.saturating_add(exit.net_exit_proceeds);
        }
        irr_pct(&series)
    };

    if cashflows.iter().any(YearlyCashflow::is_capped) || year_one.is_capped() || exit.is_capped() {
        tracing::warn!(years = inputs.years, "projection exceeded the decimal range");
        warnings.push(format!(
            "Projected figures exceed the representable range and are capped at {}",
            Decimal::MAX
        ));
    }

    if let Coverage::Finite(ratio) = dscr {
        if ratio < Decimal::ONE {
            warnings.push(format!(
                "DSCR of {ratio:.2} is below 1.00; rent does not cover the mortgage"
            ));
        }
    }

    tracing::debug!(
        %total_investment,
        %own_capital,
        years = inputs.years,
        %irr_pct,
        "single-property analysis complete"
    );

    let analysis = InvestmentAnalysis {
        total_investment,
        own_capital,
        loan_amount: loan.loan_amount,
        monthly_payment: loan.monthly_payment,
        bar_pct,
        nar_pct,
        cash_on_cash_pct,
        dscr,
        irr_pct,
        break_even_occupancy_pct,
        cashflows,
        exit,
    };

    with_metadata(
        "Single-property investment analysis (yearly projection, Newton-Raphson IRR)",
        inputs,
        warnings,
        analysis,
    )
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

fn project_cashflows(inputs: &AnalysisInputs, loan: &ResolvedLoan) -> Vec<YearlyCashflow> {
    let mut rows = Vec::with_capacity(inputs.years as usize);
    let mut cumulative = Decimal::ZERO;

    for year in 1..=inputs.years {
        let row = project_year(inputs, loan, year, cumulative);
        cumulative = row.cumulative_cashflow;
        rows.push(row);
    }

    rows
}

/// Figures for `year` (1-based), given the cumulative cashflow before it.
fn project_year(
    inputs: &AnalysisInputs,
    loan: &ResolvedLoan,
    year: u32,
    cumulative_before: Money,
) -> YearlyCashflow {
    let elapsed = year.saturating_sub(1);
    let gross_rent = inputs
        .rental
        .annual_rent()
        .saturating_mul(growth_factor(inputs.rent_growth_pct, elapsed));
    let management = gross_rent.saturating_mul(pct_to_rate(inputs.management_pct));
    let fixed = inputs
        .fixed_costs_yearly()
        .saturating_mul(growth_factor(inputs.cost_growth_pct, elapsed));

    let operating_expenses = management.saturating_add(fixed);
    let noi = gross_rent.saturating_sub(operating_expenses);
    let debt_service = loan.debt_service_in_year(year);
    let net_cashflow = noi.saturating_sub(debt_service);

    YearlyCashflow {
        year,
        gross_rent,
        operating_expenses,
        noi,
        debt_service,
        net_cashflow,
        cumulative_cashflow: cumulative_before.saturating_add(net_cashflow),
    }
}

fn exit_analysis(
    inputs: &AnalysisInputs,
    loan: &ResolvedLoan,
    own_capital: Money,
    cashflows: &[YearlyCashflow],
) -> ExitAnalysis {
    let market_value = inputs
        .purchase_price
        .saturating_mul(growth_factor(inputs.value_growth_pct, inputs.years));
    let remaining_debt = loan.balance_after_years(inputs.years);
    let net_exit_proceeds = market_value.saturating_sub(remaining_debt);
    let cumulative_cashflow = cashflows
        .last()
        .map(|c| c.cumulative_cashflow)
        .unwrap_or(Decimal::ZERO);
    let total_return = net_exit_proceeds.saturating_add(cumulative_cashflow);

    let equity_multiple = if own_capital <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        total_return.checked_div(own_capital).unwrap_or(Decimal::ZERO)
    };

    ExitAnalysis {
        years: inputs.years,
        market_value,
        remaining_debt,
        net_exit_proceeds,
        cumulative_cashflow,
        total_return,
        equity_multiple,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
