use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::VastgoedError;
use crate::types::{pct_to_rate, ratio_pct, Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Usage of the acquired property, which selects the IMT table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    /// Residential, not the buyer's own permanent residence (rental/secondary).
    Woning,
    /// Residential, buyer's own permanent residence (HPP).
    EigenWoning,
    /// Commercial, land and other non-residential use.
    NietWoning,
}

impl FromStr for PropertyType {
    type Err = VastgoedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "woning" => Ok(PropertyType::Woning),
            "eigen-woning" | "eigen_woning" | "hpp" => Ok(PropertyType::EigenWoning),
            "niet-woning" | "niet_woning" => Ok(PropertyType::NietWoning),
            other => Err(VastgoedError::UnknownVariant {
                kind: "property type".into(),
                value: other.into(),
            }),
        }
    }
}

/// One marginal band: the rate applies to the slice of the price up to `upper`.
#[derive(Debug, Clone, Copy)]
struct MarginalBand {
    upper: Money,
    rate_pct: Percent,
}

/// Progressive bands followed by the two single-rate ("taxa única") bands,
/// where one rate applies to the whole price.
#[derive(Debug, Clone, Copy)]
struct ImtTable {
    marginal: &'static [MarginalBand],
    single_rate_upper: Money,
    single_rate_pct: Percent,
    top_rate_pct: Percent,
}

const SECONDARY_RESIDENCE_BANDS: [MarginalBand; 5] = [
    MarginalBand { upper: dec!(106346), rate_pct: dec!(1) },
    MarginalBand { upper: dec!(145470), rate_pct: dec!(2) },
    MarginalBand { upper: dec!(198347), rate_pct: dec!(5) },
    MarginalBand { upper: dec!(330539), rate_pct: dec!(7) },
    MarginalBand { upper: dec!(633931), rate_pct: dec!(8) },
];

const OWN_RESIDENCE_BANDS: [MarginalBand; 5] = [
    MarginalBand { upper: dec!(106346), rate_pct: dec!(0) },
    MarginalBand { upper: dec!(145470), rate_pct: dec!(2) },
    MarginalBand { upper: dec!(198347), rate_pct: dec!(5) },
    MarginalBand { upper: dec!(330539), rate_pct: dec!(7) },
    MarginalBand { upper: dec!(660982), rate_pct: dec!(8) },
];

const SECONDARY_RESIDENCE_TABLE: ImtTable = ImtTable {
    marginal: &SECONDARY_RESIDENCE_BANDS,
    single_rate_upper: dec!(1150853),
    single_rate_pct: dec!(6),
    top_rate_pct: dec!(7.5),
};

const OWN_RESIDENCE_TABLE: ImtTable = ImtTable {
    marginal: &OWN_RESIDENCE_BANDS,
    single_rate_upper: dec!(1150853),
    single_rate_pct: dec!(6),
    top_rate_pct: dec!(7.5),
};

/// Flat IMT for non-residential acquisitions.
pub const NON_RESIDENTIAL_RATE_PCT: Percent = dec!(6.5);

/// Stamp duty (Imposto do Selo, verba 1.1) on the acquisition price.
pub const STAMP_DUTY_RATE_PCT: Percent = dec!(0.8);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImtResult {
    pub price: Money,
    pub property_type: PropertyType,
    /// IMT due
    pub imt: Money,
    /// Stamp duty due on the same price
    pub stamp_duty: Money,
    /// IMT + stamp duty
    pub total: Money,
    /// True when a single rate was applied to the whole price
    pub flat_rate_applied: bool,
    /// Rate of the band the price falls into, 0–100
    pub marginal_rate_pct: Percent,
    /// IMT / price, 0–100
    pub average_rate_pct: Percent,
    pub explanation: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Portuguese property transfer tax (IMT) for a purchase at `price`.
///
/// A non-positive price yields a zero result with an explanation instead
/// of a failure.
pub fn calculate_imt_2025(price: Money, property_type: PropertyType) -> ImtResult {
    if price <= Decimal::ZERO {
        return ImtResult {
            price,
            property_type,
            imt: Decimal::ZERO,
            stamp_duty: Decimal::ZERO,
            total: Decimal::ZERO,
            flat_rate_applied: false,
            marginal_rate_pct: Decimal::ZERO,
            average_rate_pct: Decimal::ZERO,
            explanation: "No purchase price given; no IMT due".into(),
        };
    }

    let (imt, flat_rate_applied, marginal_rate_pct, explanation) = match property_type {
        PropertyType::NietWoning => (
            price * pct_to_rate(NON_RESIDENTIAL_RATE_PCT),
            true,
            NON_RESIDENTIAL_RATE_PCT,
            format!(
                "Non-residential acquisition: flat {}% of {}",
                NON_RESIDENTIAL_RATE_PCT, price
            ),
        ),
        PropertyType::Woning => apply_table(price, &SECONDARY_RESIDENCE_TABLE, "secondary residence"),
        PropertyType::EigenWoning => apply_table(price, &OWN_RESIDENCE_TABLE, "own permanent residence"),
    };

    let imt = imt.round_dp(2);
    let stamp_duty = (price * pct_to_rate(STAMP_DUTY_RATE_PCT)).round_dp(2);

    ImtResult {
        price,
        property_type,
        imt,
        stamp_duty,
        total: imt + stamp_duty,
        flat_rate_applied,
        marginal_rate_pct,
        average_rate_pct: ratio_pct(imt, price),
        explanation,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn apply_table(price: Money, table: &ImtTable, label: &str) -> (Money, bool, Percent, String) {
    let progressive_cap = table
        .marginal
        .last()
        .map(|b| b.upper)
        .unwrap_or(Decimal::ZERO);

    if price > table.single_rate_upper {
        return (
            price * pct_to_rate(table.top_rate_pct),
            true,
            table.top_rate_pct,
            format!(
                "Residential ({label}) above {}: single rate {}% on the whole price",
                table.single_rate_upper, table.top_rate_pct
            ),
        );
    }

    if price > progressive_cap {
        return (
            price * pct_to_rate(table.single_rate_pct),
            true,
            table.single_rate_pct,
            format!(
                "Residential ({label}) above {}: single rate {}% on the whole price",
                progressive_cap, table.single_rate_pct
            ),
        );
    }

    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;
    let mut marginal = Decimal::ZERO;

    for band in table.marginal {
        if price <= lower {
            break;
        }
        let slice = price.min(band.upper) - lower;
        tax += slice * pct_to_rate(band.rate_pct);
        marginal = band.rate_pct;
        lower = band.upper;
    }

    (
        tax,
        false,
        marginal,
        format!("Residential ({label}): progressive bands, marginal rate {marginal}%"),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
