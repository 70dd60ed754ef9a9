use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values (euro). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed 0–100 (3.5 = 3.5%). Every field of this type carries
/// a `_pct` suffix. Convert with [`pct_to_rate`] before multiplying.
pub type Percent = Decimal;

/// Rates expressed as fractions (0.035 = 3.5%). Only used internally.
pub type Rate = Decimal;

/// Convert a 0–100 percentage into a fraction.
pub fn pct_to_rate(pct: Percent) -> Rate {
    pct / dec!(100)
}

/// `numerator / denominator * 100`, or zero when the denominator is not positive.
pub fn ratio_pct(numerator: Money, denominator: Money) -> Percent {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(denominator)
        .and_then(|r| r.checked_mul(dec!(100)))
        .unwrap_or(Decimal::ZERO)
}

/// Sum that clamps at the decimal bounds instead of overflowing.
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// True when a figure sits at the decimal bounds, i.e. was clamped.
pub fn is_capped(value: Decimal) -> bool {
    value == Decimal::MAX || value == Decimal::MIN
}

/// Coverage ratio that may be unbounded (no debt to cover).
///
/// Serialises as `{"finite": "1.25"}` or `"unbounded"`; display layers show
/// the latter as "∞".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    Finite(Decimal),
    Unbounded,
}

impl Coverage {
    /// NOI / debt service. A zero (or negative) debt service means nothing to cover.
    pub fn of(noi: Money, debt_service: Money) -> Self {
        if debt_service <= Decimal::ZERO {
            return Coverage::Unbounded;
        }
        match noi.checked_div(debt_service) {
            Some(ratio) => Coverage::Finite(ratio),
            None => Coverage::Unbounded,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Coverage::Unbounded)
    }

    pub fn finite(&self) -> Option<Decimal> {
        match self {
            Coverage::Finite(v) => Some(*v),
            Coverage::Unbounded => None,
        }
    }
}

impl std::fmt::Display for Coverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Coverage::Finite(v) => write!(f, "{:.2}", v),
            Coverage::Unbounded => write!(f, "∞"),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation. Carries no wall-clock data so identical
/// inputs serialise to identical outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
