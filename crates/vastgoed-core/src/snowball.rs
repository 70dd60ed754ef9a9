//! Debt snowball: pay off a portfolio's mortgages one after another by
//! pooling spare cashflow onto a single target debt at a time.
//!
//! The target order is ranked once, from the opening balances (or rates),
//! and kept for the whole run. It is not re-ranked each month by the
//! currently smallest remaining balance. With a fixed order, more pool cash
//! or a cash-positive extra property can never delay a payoff, which a
//! monthly re-rank does not guarantee.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::VastgoedError;
use crate::types::{is_capped, pct_to_rate, saturating_sum, with_metadata, ComputationOutput, Money, Percent};

/// Safety cap on the simulation length (100 years).
pub const MAX_SIMULATION_MONTHS: u32 = 1200;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Order in which the surplus pool is pointed at debts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnowballStrategy {
    /// Smallest outstanding balance first.
    #[default]
    Smallest,
    /// Highest interest rate first (avalanche).
    HighestInterest,
}

impl FromStr for SnowballStrategy {
    type Err = VastgoedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "smallest" | "snowball" => Ok(SnowballStrategy::Smallest),
            "highest_interest" | "highest-interest" | "avalanche" => {
                Ok(SnowballStrategy::HighestInterest)
            }
            other => Err(VastgoedError::UnknownVariant {
                kind: "snowball strategy".into(),
                value: other.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowballProperty {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Outstanding mortgage balance
    pub debt: Money,
    /// Required monthly mortgage payment
    pub monthly_payment: Money,
    /// Monthly surplus after all costs and the mortgage payment
    pub net_cashflow: Money,
    #[serde(default)]
    pub interest_rate_pct: Percent,
}

impl SnowballProperty {
    /// Only properties with a positive surplus feed the pool.
    fn contributes(&self) -> bool {
        self.net_cashflow > Decimal::ZERO
    }
}

/// Input document for a single simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnowballInput {
    pub properties: Vec<SnowballProperty>,
    #[serde(default)]
    pub extra_monthly_cash: Money,
    #[serde(default)]
    pub strategy: SnowballStrategy,
}

/// Input document for a with/without candidate comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateInput {
    pub properties: Vec<SnowballProperty>,
    pub candidate: SnowballProperty,
    #[serde(default)]
    pub extra_monthly_cash: Money,
    #[serde(default)]
    pub strategy: SnowballStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyPayoff {
    pub id: String,
    pub name: String,
    pub initial_debt: Money,
    /// Month in which the balance reached zero; the cap when it never did
    pub months_to_payoff: u32,
    pub paid_off: bool,
    pub interest_paid: Money,
    /// Position in the pool's priority order, 1-based
    pub priority: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowballResult {
    pub strategy: SnowballStrategy,
    /// One entry per property, in input order
    pub payoffs: Vec<PropertyPayoff>,
    pub months_to_debt_free: u32,
    pub all_paid_off: bool,
    pub total_interest: Money,
    /// Pool available in the first month
    pub initial_monthly_pool: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffDelta {
    pub id: String,
    pub name: String,
    pub months_without: u32,
    pub months_with: u32,
    /// Negative when the candidate accelerates the payoff
    pub delta_months: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateComparison {
    pub without_candidate: SnowballResult,
    pub with_candidate: SnowballResult,
    /// Existing properties only
    pub deltas: Vec<PayoffDelta>,
    pub debt_free_delta_months: i64,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Month-by-month payoff simulation.
///
/// Each month every unpaid debt accrues interest and receives its own
/// required payment. The pool (extra cash, surpluses of contributing
/// properties and the freed payments of contributing properties already paid
/// off) then goes to the first unpaid debt in priority order, with any
/// leftover cascading to the next one. The priority order is fixed at the
/// start of the run; ties keep input order.
pub fn simulate_snowball(
    properties: &[SnowballProperty],
    extra_monthly_cash: Money,
    strategy: SnowballStrategy,
) -> ComputationOutput<SnowballResult> {
    let mut warnings = Vec::new();
    if extra_monthly_cash < Decimal::ZERO {
        warnings.push("Negative extra monthly cash ignored".to_string());
    }

    let (result, capped) = run(properties, extra_monthly_cash.max(Decimal::ZERO), strategy);

    if capped {
        warnings.push(format!(
            "Unpaid interest outgrew the decimal range; balances are capped at {}",
            Decimal::MAX
        ));
    }

    if !result.all_paid_off {
        let stuck: Vec<&str> = result
            .payoffs
            .iter()
            .filter(|p| !p.paid_off)
            .map(|p| p.id.as_str())
            .collect();
        tracing::warn!(?stuck, "snowball hit the simulation cap");
        warnings.push(format!(
            "Not paid off within {} months: {}",
            MAX_SIMULATION_MONTHS,
            stuck.join(", ")
        ));
    }

    let assumptions = SnowballInput {
        properties: properties.to_vec(),
        extra_monthly_cash,
        strategy,
    };

    with_metadata(
        "Debt snowball simulation (monthly, fixed priority order)",
        &assumptions,
        warnings,
        result,
    )
}

/// Run the simulation with and without `candidate` appended.
pub fn compare_candidate(
    existing: &[SnowballProperty],
    candidate: &SnowballProperty,
    extra_monthly_cash: Money,
    strategy: SnowballStrategy,
) -> ComputationOutput<CandidateComparison> {
    let without = simulate_snowball(existing, extra_monthly_cash, strategy);

    let mut extended = existing.to_vec();
    extended.push(candidate.clone());
    let with = simulate_snowball(&extended, extra_monthly_cash, strategy);

    let deltas = without
        .result
        .payoffs
        .iter()
        .zip(with.result.payoffs.iter())
        .map(|(before, after)| PayoffDelta {
            id: before.id.clone(),
            name: before.name.clone(),
            months_without: before.months_to_payoff,
            months_with: after.months_to_payoff,
            delta_months: i64::from(after.months_to_payoff) - i64::from(before.months_to_payoff),
        })
        .collect();

    let debt_free_delta_months = i64::from(with.result.months_to_debt_free)
        - i64::from(without.result.months_to_debt_free);

    let mut warnings = without.warnings;
    warnings.extend(with.warnings.into_iter().map(|w| format!("With candidate: {w}")));

    let assumptions = CandidateInput {
        properties: existing.to_vec(),
        candidate: candidate.clone(),
        extra_monthly_cash,
        strategy,
    };

    with_metadata(
        "Debt snowball with/without candidate property",
        &assumptions,
        warnings,
        CandidateComparison {
            without_candidate: without.result,
            with_candidate: with.result,
            deltas,
            debt_free_delta_months,
        },
    )
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

struct DebtState {
    balance: Money,
    monthly_rate: Decimal,
    interest_paid: Money,
    paid_off_in: Option<u32>,
    capped: bool,
}

fn priority_order(properties: &[SnowballProperty], strategy: SnowballStrategy) -> Vec<usize> {
    let mut order: Vec<usize> = (0..properties.len()).collect();
    // sort_by is stable, so equal keys keep input order
    match strategy {
        SnowballStrategy::Smallest => order.sort_by(|&a, &b| properties[a].debt.cmp(&properties[b].debt)),
        SnowballStrategy::HighestInterest => order.sort_by(|&a, &b| {
            properties[b]
                .interest_rate_pct
                .cmp(&properties[a].interest_rate_pct)
        }),
    }
    order
}

/// Returns the result and whether any balance hit the decimal bounds.
fn run(
    properties: &[SnowballProperty],
    extra: Money,
    strategy: SnowballStrategy,
) -> (SnowballResult, bool) {
    let order = priority_order(properties, strategy);

    let mut states: Vec<DebtState> = properties
        .iter()
        .map(|p| {
            let balance = p.debt.max(Decimal::ZERO);
            DebtState {
                balance,
                monthly_rate: pct_to_rate(p.interest_rate_pct.max(Decimal::ZERO)) / Decimal::from(12),
                interest_paid: Decimal::ZERO,
                paid_off_in: if balance.is_zero() { Some(0) } else { None },
                capped: false,
            }
        })
        .collect();

    let initial_monthly_pool = monthly_pool(properties, &states, extra);
    let mut month = 0;

    while month < MAX_SIMULATION_MONTHS && states.iter().any(|s| s.paid_off_in.is_none()) {
        month += 1;

        // Released capacity is counted from debts cleared before this month
        let mut pool = monthly_pool(properties, &states, extra);

        for (property, state) in properties.iter().zip(states.iter_mut()) {
            if state.paid_off_in.is_some() {
                continue;
            }
            let interest = state.balance.saturating_mul(state.monthly_rate).round_dp(2);
            state.interest_paid = state.interest_paid.saturating_add(interest);
            state.balance = state.balance.saturating_add(interest);
            state.capped |= is_capped(state.balance) || is_capped(state.interest_paid);
            let payment = property.monthly_payment.max(Decimal::ZERO).min(state.balance);
            state.balance -= payment;
        }

        for &idx in &order {
            if pool.is_zero() {
                break;
            }
            let state = &mut states[idx];
            if state.paid_off_in.is_some() || state.balance.is_zero() {
                continue;
            }
            let paid = pool.min(state.balance);
            state.balance -= paid;
            pool -= paid;
        }

        for state in states.iter_mut() {
            if state.paid_off_in.is_none() && state.balance.is_zero() {
                state.paid_off_in = Some(month);
            }
        }
    }

    let priority_of = |idx: usize| order.iter().position(|&o| o == idx).map_or(0, |p| p + 1);

    let payoffs: Vec<PropertyPayoff> = properties
        .iter()
        .zip(states.iter())
        .enumerate()
        .map(|(idx, (p, s))| PropertyPayoff {
            id: p.id.clone(),
            name: p.name.clone(),
            initial_debt: p.debt.max(Decimal::ZERO),
            months_to_payoff: s.paid_off_in.unwrap_or(MAX_SIMULATION_MONTHS),
            paid_off: s.paid_off_in.is_some(),
            interest_paid: s.interest_paid,
            priority: priority_of(idx),
        })
        .collect();

    let result = SnowballResult {
        strategy,
        months_to_debt_free: payoffs.iter().map(|p| p.months_to_payoff).max().unwrap_or(0),
        all_paid_off: payoffs.iter().all(|p| p.paid_off),
        total_interest: saturating_sum(payoffs.iter().map(|p| p.interest_paid)),
        initial_monthly_pool,
        payoffs,
    };

    tracing::debug!(
        properties = properties.len(),
        months = result.months_to_debt_free,
        all_paid_off = result.all_paid_off,
        "snowball simulated"
    );

    let capped = states.iter().any(|s| s.capped) || is_capped(result.total_interest);
    (result, capped)
}

fn monthly_pool(properties: &[SnowballProperty], states: &[DebtState], extra: Money) -> Money {
    properties
        .iter()
        .zip(states.iter())
        .filter(|(p, _)| p.contributes())
        .map(|(p, s)| {
            let released = if s.paid_off_in.is_some() {
                p.monthly_payment.max(Decimal::ZERO)
            } else {
                Decimal::ZERO
            };
            p.net_cashflow.saturating_add(released)
        })
        .fold(extra, |acc, v| acc.saturating_add(v))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
