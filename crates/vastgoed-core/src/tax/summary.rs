use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::imi::{calculate_imi, ImiResult, MunicipalityType};
use super::imt::{calculate_imt_2025, ImtResult, PropertyType};
use super::irs::{calculate_irs, IrsInput, IrsResult};
use crate::types::{Money, Percent};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSummaryInput {
    pub purchase_price: Money,
    pub property_type: PropertyType,
    pub assessed_value: Money,
    pub municipality_type: MunicipalityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_imi_rate_pct: Option<Percent>,
    pub irs: IrsInput,
    /// Reference date for the IMI payment window
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSummary {
    pub imt: ImtResult,
    pub imi: ImiResult,
    pub irs: IrsResult,
    /// IMT + stamp duty, paid once at acquisition
    pub one_time_total: Money,
    /// IMI + IRS, due every year
    pub recurring_annual_total: Money,
}

/// Run the three tax calculations and split one-time from recurring costs.
pub fn summarize_taxes(input: &TaxSummaryInput) -> TaxSummary {
    let imt = calculate_imt_2025(input.purchase_price, input.property_type);
    let imi = calculate_imi(
        input.assessed_value,
        input.municipality_type,
        input.custom_imi_rate_pct,
        input.today,
    );
    let irs = calculate_irs(&input.irs);

    TaxSummary {
        one_time_total: imt.total,
        recurring_annual_total: imi.annual_amount.saturating_add(irs.tax_annual),
        imt,
        imi,
        irs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summary_is_plain_addition() {
        let input = TaxSummaryInput {
            purchase_price: dec!(250000),
            property_type: PropertyType::Woning,
            assessed_value: dec!(150000),
            municipality_type: MunicipalityType::GroteStad,
            custom_imi_rate_pct: None,
            irs: IrsInput::new(2027, dec!(1200)),
            today: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        };
        let s = summarize_taxes(&input);
        assert_eq!(s.one_time_total, s.imt.imt + s.imt.stamp_duty);
        // IMI 450 + IRS 10% of 14400
        assert_eq!(s.recurring_annual_total, dec!(1890));
    }
}
