use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{pct_to_rate, Money, Percent, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the loan amount is sized. The two modes are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LoanSizing {
    /// Loan = purchase price × LTV (0–100).
    Ltv { ltv_pct: Percent },
    /// Loan = purchase price − down payment, floored at zero.
    DownPayment { amount: Money },
}

/// Where the monthly mortgage payment comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PaymentMode {
    /// Fixed-payment annuity derived from loan, rate and term.
    #[default]
    Annuity,
    /// Payment taken as given, e.g. an existing mortgage whose real payment
    /// differs from the formula. Always wins over the annuity.
    Manual { monthly: Money },
}

/// Financing terms shared by the single- and multi-unit analyzers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    pub sizing: LoanSizing,
    /// Annual nominal interest rate, 0–100
    pub interest_rate_pct: Percent,
    pub term_years: u32,
    #[serde(default)]
    pub payment: PaymentMode,
}

impl Financing {
    /// No loan at all.
    pub fn cash_purchase() -> Self {
        Financing {
            sizing: LoanSizing::DownPayment {
                amount: Decimal::MAX,
            },
            interest_rate_pct: Decimal::ZERO,
            term_years: 0,
            payment: PaymentMode::Annuity,
        }
    }

    /// Resolve loan amount and monthly payment against a purchase price.
    pub fn resolve(&self, purchase_price: Money) -> ResolvedLoan {
        let loan_amount = match &self.sizing {
            LoanSizing::Ltv { ltv_pct } => {
                let ltv = (*ltv_pct).max(Decimal::ZERO);
                purchase_price
                    .max(Decimal::ZERO)
                    .checked_mul(pct_to_rate(ltv))
                    .unwrap_or(Decimal::ZERO)
            }
            LoanSizing::DownPayment { amount } => purchase_price
                .checked_sub(*amount)
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO),
        };

        let monthly_payment = match &self.payment {
            PaymentMode::Manual { monthly } => (*monthly).max(Decimal::ZERO),
            PaymentMode::Annuity => {
                monthly_payment(loan_amount, self.interest_rate_pct, self.term_years)
            }
        };

        ResolvedLoan {
            loan_amount,
            monthly_payment,
            annual_debt_service: monthly_payment.saturating_mul(dec!(12)),
            interest_rate_pct: self.interest_rate_pct,
            term_years: self.term_years,
        }
    }
}

/// Financing terms resolved against a concrete purchase price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLoan {
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub annual_debt_service: Money,
    pub interest_rate_pct: Percent,
    pub term_years: u32,
}

impl ResolvedLoan {
    /// Outstanding balance after `years` of payments. Zero once the term has
    /// run out, whatever the payment was.
    pub fn balance_after_years(&self, years: u32) -> Money {
        if self.term_years > 0 && years >= self.term_years {
            return Decimal::ZERO;
        }
        remaining_balance(
            self.loan_amount,
            self.interest_rate_pct,
            self.monthly_payment,
            years.saturating_mul(12),
        )
    }

    /// Debt service for a given projection year (1-based).
    ///
    /// Zero past the term when a term is set, and zero once the balance has
    /// been repaid at the start of the year. A manual payment on a loan
    /// without a term therefore runs until the loan is cleared.
    pub fn debt_service_in_year(&self, year: u32) -> Money {
        if self.term_years > 0 && year > self.term_years {
            return Decimal::ZERO;
        }
        if self.balance_after_years(year.saturating_sub(1)).is_zero() {
            return Decimal::ZERO;
        }
        self.annual_debt_service
    }
}

/// One year of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub opening_balance: Money,
    pub payments: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1)
///
/// * `principal <= 0` or `years == 0` → 0
/// * `annual_rate_pct <= 0` → straight-line `principal / (years*12)`
pub fn monthly_payment(principal: Money, annual_rate_pct: Percent, years: u32) -> Money {
    if principal <= Decimal::ZERO || years == 0 {
        return Decimal::ZERO;
    }

    let total_months = years.saturating_mul(12);
    let straight_line = principal / Decimal::from(total_months);

    if annual_rate_pct <= Decimal::ZERO {
        return straight_line;
    }

    let monthly_rate = monthly_rate(annual_rate_pct);
    let Some(compound) = compound(monthly_rate, total_months) else {
        return straight_line;
    };

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return straight_line;
    }

    principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(compound))
        .and_then(|v| v.checked_div(denominator))
        .unwrap_or(straight_line)
}

/// Outstanding balance after `months_paid` payments of `monthly_payment`.
///
/// Closed form `B_k = P(1+r)^k − M((1+r)^k − 1)/r`, floored at zero. Works
/// for any payment, so a manual override amortizes at its own pace.
pub fn remaining_balance(
    principal: Money,
    annual_rate_pct: Percent,
    monthly_payment: Money,
    months_paid: u32,
) -> Money {
    if principal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    if annual_rate_pct <= Decimal::ZERO {
        let paid = monthly_payment
            .checked_mul(Decimal::from(months_paid))
            .unwrap_or(Decimal::MAX);
        return (principal - paid.min(principal)).max(Decimal::ZERO);
    }

    let r = monthly_rate(annual_rate_pct);
    let grown_principal = compound(r, months_paid).and_then(|growth| {
        let paid_down = monthly_payment
            .checked_mul(growth - Decimal::ONE)?
            .checked_div(r)?;
        Some(principal.checked_mul(growth)?.saturating_sub(paid_down))
    });

    match grown_principal {
        Some(balance) => balance.max(Decimal::ZERO),
        None => saturated_balance(principal, r, monthly_payment),
    }
}

/// Where the balance heads after too many periods to represent: cleared when
/// the payment beats the first month's interest, capped when it falls short.
fn saturated_balance(principal: Money, r: Rate, monthly_payment: Money) -> Money {
    let first_interest = principal.saturating_mul(r);
    if monthly_payment > first_interest {
        Decimal::ZERO
    } else if monthly_payment == first_interest {
        principal
    } else {
        Decimal::MAX
    }
}

/// Year-by-year amortization for the first `years` years of a loan.
pub fn amortization_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    monthly_payment: Money,
    years: u32,
) -> Vec<AmortizationYear> {
    let r = if annual_rate_pct > Decimal::ZERO {
        monthly_rate(annual_rate_pct)
    } else {
        Decimal::ZERO
    };

    let mut rows = Vec::with_capacity(years as usize);
    let mut balance = principal.max(Decimal::ZERO);

    for year in 1..=years {
        let opening_balance = balance;
        let mut payments = Decimal::ZERO;
        let mut interest = Decimal::ZERO;

        for _ in 0..12 {
            if balance <= Decimal::ZERO {
                break;
            }
            // Saturates when the payment never covers the interest
            let month_interest = balance.saturating_mul(r).round_dp(2);
            let due = balance.saturating_add(month_interest);
            let paid = monthly_payment.min(due).max(Decimal::ZERO);
            balance = due - paid;
            interest = interest.saturating_add(month_interest);
            payments = payments.saturating_add(paid);
        }

        rows.push(AmortizationYear {
            year,
            opening_balance,
            payments,
            interest,
            principal: payments.saturating_sub(interest),
            closing_balance: balance,
        });
    }

    rows
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    pct_to_rate(annual_rate_pct) / dec!(12)
}

/// (1 + r)^n via iterative multiplication; `None` on overflow.
fn compound(rate: Rate, periods: u32) -> Option<Decimal> {
    let step = Decimal::ONE + rate;
    let mut value = Decimal::ONE;
    for _ in 0..periods {
        value = value.checked_mul(step)?;
    }
    Some(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
