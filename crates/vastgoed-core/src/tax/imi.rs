use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::VastgoedError;
use crate::types::{pct_to_rate, Money, Percent};

/// Municipality classification used to pick a default IMI rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MunicipalityType {
    Standaard,
    GroteStad,
    Landelijk,
}

impl MunicipalityType {
    /// Default urban IMI rate, 0–100 (statutory range 0.3%–0.45%).
    pub fn default_rate_pct(&self) -> Percent {
        match self {
            MunicipalityType::Standaard => dec!(0.35),
            MunicipalityType::GroteStad => dec!(0.30),
            MunicipalityType::Landelijk => dec!(0.40),
        }
    }
}

impl FromStr for MunicipalityType {
    type Err = VastgoedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standaard" => Ok(MunicipalityType::Standaard),
            "grote_stad" | "grote-stad" => Ok(MunicipalityType::GroteStad),
            "landelijk" => Ok(MunicipalityType::Landelijk),
            other => Err(VastgoedError::UnknownVariant {
                kind: "municipality type".into(),
                value: other.into(),
            }),
        }
    }
}

/// Window in which the next IMI bill can be paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentWindow {
    pub year: i32,
    pub opens: NaiveDate,
    pub closes: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImiInstallment {
    pub month: u32,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImiResult {
    /// Valor patrimonial tributário
    pub assessed_value: Money,
    pub municipality_type: MunicipalityType,
    /// Applied rate, 0–100
    pub rate_pct: Percent,
    pub custom_rate: bool,
    pub annual_amount: Money,
    pub monthly_amount: Money,
    pub installments: Vec<ImiInstallment>,
    pub next_payment_window: PaymentWindow,
    pub explanation: String,
}

/// Bills up to this amount are paid in one installment.
const SINGLE_INSTALLMENT_LIMIT: Money = dec!(100);
/// Bills up to this amount are paid in two installments.
const TWO_INSTALLMENT_LIMIT: Money = dec!(500);

/// Annual municipal property tax (IMI) on an assessed value.
///
/// `custom_rate_pct` overrides the municipality default when given and not
/// negative. `today` anchors the next payment window.
pub fn calculate_imi(
    assessed_value: Money,
    municipality_type: MunicipalityType,
    custom_rate_pct: Option<Percent>,
    today: NaiveDate,
) -> ImiResult {
    let custom = custom_rate_pct.filter(|r| *r >= Decimal::ZERO);
    let rate_pct = custom.unwrap_or_else(|| municipality_type.default_rate_pct());
    let next_payment_window = next_payment_window(today);

    if assessed_value <= Decimal::ZERO {
        return ImiResult {
            assessed_value,
            municipality_type,
            rate_pct,
            custom_rate: custom.is_some(),
            annual_amount: Decimal::ZERO,
            monthly_amount: Decimal::ZERO,
            installments: Vec::new(),
            next_payment_window,
            explanation: "No assessed value given; no IMI due".into(),
        };
    }

    let annual_amount = assessed_value.saturating_mul(pct_to_rate(rate_pct)).round_dp(2);
    let source = if custom.is_some() {
        "custom rate".to_string()
    } else {
        format!("default rate for {:?}", municipality_type)
    };

    let explanation = format!(
        "{}% ({}) of assessed value {}; next payment window {} to {}",
        rate_pct, source, assessed_value, next_payment_window.opens, next_payment_window.closes
    );

    ImiResult {
        assessed_value,
        municipality_type,
        rate_pct,
        custom_rate: custom.is_some(),
        annual_amount,
        monthly_amount: (annual_amount / dec!(12)).round_dp(2),
        installments: split_installments(annual_amount),
        next_payment_window,
        explanation,
    }
}

/// May/June of the current year while May 31 has not passed, else next year.
pub fn next_payment_window(today: NaiveDate) -> PaymentWindow {
    let deadline = NaiveDate::from_ymd_opt(today.year(), 5, 31);
    let year = match deadline {
        Some(d) if today <= d => today.year(),
        _ => today.year() + 1,
    };

    PaymentWindow {
        year,
        opens: NaiveDate::from_ymd_opt(year, 5, 1).unwrap_or(today),
        closes: NaiveDate::from_ymd_opt(year, 6, 30).unwrap_or(today),
    }
}

/// May only; May + November; or May + August + November.
fn split_installments(annual: Money) -> Vec<ImiInstallment> {
    let months: &[u32] = if annual <= SINGLE_INSTALLMENT_LIMIT {
        &[5]
    } else if annual <= TWO_INSTALLMENT_LIMIT {
        &[5, 11]
    } else {
        &[5, 8, 11]
    };

    let count = Decimal::from(months.len() as u64);
    let share = (annual / count).round_dp(2);
    let mut remaining = annual;

    months
        .iter()
        .enumerate()
        .map(|(i, &month)| {
            let amount = if i + 1 == months.len() { remaining } else { share };
            remaining -= amount;
            ImiInstallment { month, amount }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_rate() {
        let r = calculate_imi(dec!(150000), MunicipalityType::GroteStad, None, date(2026, 3, 1));
        assert_eq!(r.rate_pct, dec!(0.30));
        assert_eq!(r.annual_amount, dec!(450));
        assert!(!r.custom_rate);
    }

    #[test]
    fn test_custom_rate_overrides() {
        let r = calculate_imi(
            dec!(150000),
            MunicipalityType::GroteStad,
            Some(dec!(0.45)),
            date(2026, 3, 1),
        );
        assert_eq!(r.annual_amount, dec!(675));
        assert!(r.custom_rate);
    }

    #[test]
    fn test_window_before_deadline_is_this_year() {
        let w = next_payment_window(date(2026, 5, 31));
        assert_eq!(w.year, 2026);
        assert_eq!(w.opens, date(2026, 5, 1));
        assert_eq!(w.closes, date(2026, 6, 30));
    }

    #[test]
    fn test_window_after_deadline_is_next_year() {
        let w = next_payment_window(date(2026, 6, 1));
        assert_eq!(w.year, 2027);
    }

    #[test]
    fn test_installments() {
        let one = split_installments(dec!(80));
        assert_eq!(one.len(), 1);
        let two = split_installments(dec!(450));
        assert_eq!(two.iter().map(|i| i.month).collect::<Vec<_>>(), vec![5, 11]);
        let three = split_installments(dec!(1000));
        assert_eq!(three.len(), 3);
        assert_eq!(three[0].amount, dec!(333.33));
        assert_eq!(three[2].amount, dec!(333.34));
        let total: Decimal = three.iter().map(|i| i.amount).sum();
        assert_eq!(total, dec!(1000));
    }

    #[test]
    fn test_no_value() {
        let r = calculate_imi(Decimal::ZERO, MunicipalityType::Standaard, None, date(2026, 1, 1));
        assert_eq!(r.annual_amount, Decimal::ZERO);
        assert!(r.installments.is_empty());
    }
}
