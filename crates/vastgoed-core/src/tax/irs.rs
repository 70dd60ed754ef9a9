use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::VastgoedError;
use crate::types::{pct_to_rate, Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    #[default]
    Standard,
    /// Long-term permanent-habitation lease; earns a 20% rate discount under
    /// the duration-based regime.
    LongTermHabitation,
}

impl FromStr for ContractType {
    type Err = VastgoedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(ContractType::Standard),
            "long_term_habitation" | "long-term-habitation" => {
                Ok(ContractType::LongTermHabitation)
            }
            other => Err(VastgoedError::UnknownVariant {
                kind: "contract type".into(),
                value: other.into(),
            }),
        }
    }
}

/// Rental income tax regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrsRegime {
    /// Autonomous rate decreasing with contract duration.
    DurationBased,
    /// Rate keyed off a monthly rent threshold.
    RentThreshold,
    /// Legislation not yet known; flat estimate.
    Fallback,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrsInput {
    /// Income year the tax applies to
    pub tax_year: i32,
    /// Contract rent per month
    pub monthly_rent: Money,
    /// Annual rental income; defaults to `monthly_rent * 12`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_rental_income: Option<Money>,
    /// Contract duration in whole years
    #[serde(default)]
    pub contract_years: u32,
    #[serde(default)]
    pub contract_type: ContractType,
    /// Opt into aggregation with other income (englobamento)
    #[serde(default)]
    pub aggregate_with_other_income: bool,
}

impl IrsInput {
    pub fn new(tax_year: i32, monthly_rent: Money) -> Self {
        IrsInput {
            tax_year,
            monthly_rent,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrsResult {
    pub tax_year: i32,
    pub regime: IrsRegime,
    /// Applied rate, 0–100
    pub rate_pct: Percent,
    pub gross_annual: Money,
    pub tax_annual: Money,
    pub net_annual: Money,
    pub gross_monthly: Money,
    pub tax_monthly: Money,
    pub net_monthly: Money,
    pub explanation: String,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Regime table
// ---------------------------------------------------------------------------

/// Inclusive year range mapped to a regime. Ordered; first match wins.
#[derive(Debug, Clone, Copy)]
pub struct RegimePeriod {
    pub from: Option<i32>,
    pub to: Option<i32>,
    pub regime: IrsRegime,
}

impl RegimePeriod {
    fn contains(&self, year: i32) -> bool {
        self.from.is_none_or(|f| year >= f) && self.to.is_none_or(|t| year <= t)
    }
}

pub const IRS_REGIMES: &[RegimePeriod] = &[
    RegimePeriod { from: None, to: Some(2025), regime: IrsRegime::DurationBased },
    RegimePeriod { from: Some(2026), to: Some(2029), regime: IrsRegime::RentThreshold },
    RegimePeriod { from: Some(2030), to: None, regime: IrsRegime::Fallback },
];

/// (minimum contract years, rate %), ascending by duration.
const DURATION_BANDS: [(u32, Percent); 5] = [
    (0, dec!(28)),
    (2, dec!(25)),
    (5, dec!(15)),
    (10, dec!(10)),
    (20, dec!(5)),
];

/// Multiplier applied to the duration rate for long-term habitation leases.
const LONG_TERM_HABITATION_FACTOR: Decimal = dec!(0.8);

/// Monthly rent from which the higher threshold-regime rate applies.
pub const RENT_THRESHOLD_MONTHLY: Money = dec!(2300);
const BELOW_THRESHOLD_RATE_PCT: Percent = dec!(10);
const ABOVE_THRESHOLD_RATE_PCT: Percent = dec!(25);
const AGGREGATED_RATE_PCT: Percent = dec!(30);

const FALLBACK_RATE_PCT: Percent = dec!(25);

/// Regime for a given income year.
pub fn regime_for_year(year: i32) -> IrsRegime {
    IRS_REGIMES
        .iter()
        .find(|p| p.contains(year))
        .map(|p| p.regime)
        .unwrap_or(IrsRegime::Fallback)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Personal income tax (IRS) on rental income.
pub fn calculate_irs(input: &IrsInput) -> IrsResult {
    let regime = regime_for_year(input.tax_year);
    let mut warnings = Vec::new();

    let (rate_pct, explanation) = match regime {
        IrsRegime::DurationBased => duration_rate(input),
        IrsRegime::RentThreshold => threshold_rate(input),
        IrsRegime::Fallback => {
            let msg = format!(
                "Rental income tax rules for {} are not yet enacted; \
                 {}% is an estimate and may change",
                input.tax_year, FALLBACK_RATE_PCT
            );
            tracing::warn!(tax_year = input.tax_year, "IRS fallback rate applied");
            warnings.push(msg);
            (
                FALLBACK_RATE_PCT,
                format!("Fallback estimate of {}% for {}", FALLBACK_RATE_PCT, input.tax_year),
            )
        }
    };

    let gross_annual = input
        .annual_rental_income
        .unwrap_or_else(|| input.monthly_rent.saturating_mul(dec!(12)));

    if gross_annual <= Decimal::ZERO {
        return IrsResult {
            tax_year: input.tax_year,
            regime,
            rate_pct,
            gross_annual: Decimal::ZERO,
            tax_annual: Decimal::ZERO,
            net_annual: Decimal::ZERO,
            gross_monthly: Decimal::ZERO,
            tax_monthly: Decimal::ZERO,
            net_monthly: Decimal::ZERO,
            explanation: "No rental income given; no IRS due".into(),
            warnings,
        };
    }

    let tax_annual = (gross_annual * pct_to_rate(rate_pct)).round_dp(2);
    let net_annual = gross_annual - tax_annual;

    IrsResult {
        tax_year: input.tax_year,
        regime,
        rate_pct,
        gross_annual,
        tax_annual,
        net_annual,
        gross_monthly: gross_annual / dec!(12),
        tax_monthly: tax_annual / dec!(12),
        net_monthly: net_annual / dec!(12),
        explanation,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Regime rules
// ---------------------------------------------------------------------------

fn duration_rate(input: &IrsInput) -> (Percent, String) {
    let base = DURATION_BANDS
        .iter()
        .rev()
        .find(|(min_years, _)| input.contract_years >= *min_years)
        .map(|(_, rate)| *rate)
        .unwrap_or(DURATION_BANDS[0].1);

    match input.contract_type {
        ContractType::LongTermHabitation => {
            let rate = base * LONG_TERM_HABITATION_FACTOR;
            (
                rate,
                format!(
                    "Duration-based regime: {}-year contract at {}%, 20% habitation discount gives {}%",
                    input.contract_years, base, rate
                ),
            )
        }
        ContractType::Standard => (
            base,
            format!(
                "Duration-based regime: {}-year contract at {}%",
                input.contract_years, base
            ),
        ),
    }
}

fn threshold_rate(input: &IrsInput) -> (Percent, String) {
    if input.aggregate_with_other_income {
        return (
            AGGREGATED_RATE_PCT,
            format!(
                "Rent-threshold regime, aggregated with other income: ~{}%",
                AGGREGATED_RATE_PCT
            ),
        );
    }

    if input.monthly_rent < RENT_THRESHOLD_MONTHLY {
        (
            BELOW_THRESHOLD_RATE_PCT,
            format!(
                "Rent-threshold regime: monthly rent {} below {} taxed at {}%",
                input.monthly_rent, RENT_THRESHOLD_MONTHLY, BELOW_THRESHOLD_RATE_PCT
            ),
        )
    } else {
        (
            ABOVE_THRESHOLD_RATE_PCT,
            format!(
                "Rent-threshold regime: monthly rent {} at or above {} taxed at {}%",
                input.monthly_rent, RENT_THRESHOLD_MONTHLY, ABOVE_THRESHOLD_RATE_PCT
            ),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_regime_table() {
        assert_eq!(regime_for_year(1999), IrsRegime::DurationBased);
        assert_eq!(regime_for_year(2025), IrsRegime::DurationBased);
        assert_eq!(regime_for_year(2026), IrsRegime::RentThreshold);
        assert_eq!(regime_for_year(2029), IrsRegime::RentThreshold);
        assert_eq!(regime_for_year(2030), IrsRegime::Fallback);
        assert_eq!(regime_for_year(2100), IrsRegime::Fallback);
    }

    #[test]
    fn test_threshold_below() {
        let r = calculate_irs(&IrsInput::new(2027, dec!(2000)));
        assert_eq!(r.regime, IrsRegime::RentThreshold);
        assert_eq!(r.rate_pct, dec!(10));
        assert_eq!(r.gross_annual, dec!(24000));
        assert_eq!(r.tax_annual, dec!(2400));
        assert_eq!(r.net_monthly, dec!(1800));
    }

    #[test]
    fn test_threshold_above() {
        let r = calculate_irs(&IrsInput::new(2027, dec!(2500)));
        assert_eq!(r.rate_pct, dec!(25));
    }

    #[test]
    fn test_threshold_at_boundary_is_higher_rate() {
        let r = calculate_irs(&IrsInput::new(2028, dec!(2300)));
        assert_eq!(r.rate_pct, dec!(25));
    }

    #[test]
    fn test_threshold_aggregated() {
        let input = IrsInput {
            aggregate_with_other_income: true,
            ..IrsInput::new(2027, dec!(1000))
        };
        assert_eq!(calculate_irs(&input).rate_pct, dec!(30));
    }

    #[test]
    fn test_duration_bands() {
        let rate = |years: u32| {
            let input = IrsInput {
                contract_years: years,
                ..IrsInput::new(2024, dec!(1000))
            };
            calculate_irs(&input).rate_pct
        };
        assert_eq!(rate(1), dec!(28));
        assert_eq!(rate(2), dec!(25));
        assert_eq!(rate(7), dec!(15));
        assert_eq!(rate(12), dec!(10));
        assert_eq!(rate(25), dec!(5));
    }

    #[test]
    fn test_long_term_habitation_discount() {
        let input = IrsInput {
            contract_years: 12,
            contract_type: ContractType::LongTermHabitation,
            ..IrsInput::new(2024, dec!(1000))
        };
        assert_eq!(calculate_irs(&input).rate_pct, dec!(8));
    }

    #[test]
    fn test_fallback_warns() {
        let r = calculate_irs(&IrsInput::new(2031, dec!(1000)));
        assert_eq!(r.regime, IrsRegime::Fallback);
        assert_eq!(r.rate_pct, dec!(25));
        assert_eq!(r.warnings.len(), 1);
    }

    #[test]
    fn test_explicit_annual_income() {
        let input = IrsInput {
            annual_rental_income: Some(dec!(10000)),
            ..IrsInput::new(2027, dec!(2000))
        };
        let r = calculate_irs(&input);
        assert_eq!(r.gross_annual, dec!(10000));
        assert_eq!(r.tax_annual, dec!(1000));
    }

    #[test]
    fn test_no_income() {
        let r = calculate_irs(&IrsInput::new(2027, Decimal::ZERO));
        assert_eq!(r.tax_annual, Decimal::ZERO);
        assert_eq!(r.rate_pct, dec!(10));
    }
}
